use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Runtime configuration. Every flag can also be set through the environment.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "dextui", version, about = "Browse the PokeAPI catalog from the terminal")]
pub struct Config {
    /// Base URL of the catalog API.
    #[arg(long, env = "DEXTUI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of entries requested per catalog page.
    #[arg(
        long,
        env = "DEXTUI_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = parse_page_size
    )]
    pub page_size: usize,

    /// HTTP timeout in seconds. Requests never time out when unset.
    #[arg(long, env = "DEXTUI_TIMEOUT")]
    pub timeout_secs: Option<u64>,

    /// Where tracing output goes; the terminal itself belongs to the UI.
    #[arg(long, env = "DEXTUI_LOG", default_value = "dextui.log")]
    pub log_file: PathBuf,

    /// Skip downloading and drawing official artwork on the detail screen.
    #[arg(long)]
    pub no_artwork: bool,

    /// Fetch the first page, print it to stdout and exit.
    #[arg(long)]
    pub print: bool,

    /// With `--print`, emit the page as JSON instead of a table.
    #[arg(long, requires = "print")]
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: None,
            log_file: PathBuf::from("dextui.log"),
            no_artwork: false,
            print: false,
            json: false,
        }
    }
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_PAGE_SIZE).contains(&n) {
        Ok(n)
    } else {
        Err(format!("page size must be between 1 and {MAX_PAGE_SIZE}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let config = Config::try_parse_from([
            "dextui",
            "--base-url",
            "http://localhost:8080/api",
            "--page-size",
            "5",
            "--timeout-secs",
            "3",
            "--no-artwork",
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.timeout_secs, Some(3));
        assert!(config.no_artwork);
        assert!(!config.print);
    }

    #[test]
    fn page_size_is_bounded() {
        assert!(Config::try_parse_from(["dextui", "--page-size", "0"]).is_err());
        assert!(Config::try_parse_from(["dextui", "--page-size", "101"]).is_err());
        assert!(Config::try_parse_from(["dextui", "--page-size", "many"]).is_err());
        assert_eq!(parse_page_size("100"), Ok(100));
    }

    #[test]
    fn json_output_needs_print_mode() {
        assert!(Config::try_parse_from(["dextui", "--json"]).is_err());
        let config = Config::try_parse_from(["dextui", "--print", "--json"]).unwrap();
        assert!(config.print && config.json);
    }

    #[test]
    fn default_matches_catalog_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.timeout_secs, None);
    }
}

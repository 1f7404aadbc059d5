use clap::Parser;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info};

use dextui::app::{spawn_command, App, Command};
use dextui::config::Config;
use dextui::fetch::{CatalogSource, PokeClient};
use dextui::ui::{draw_ui, list_viewport};
use dextui::{logging, utils};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    let _log_guard = logging::init(&config.log_file)?;
    info!(
        base_url = %config.base_url,
        page_size = config.page_size,
        "starting dextui"
    );

    let client = PokeClient::from_config(&config)?;

    // Print one page and exit (handy for checking connectivity).
    if config.print {
        return print_first_page(&client, config.json).await;
    }

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let source: Arc<dyn CatalogSource> = Arc::new(client);
    let result = run_app(&mut terminal, source, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "dextui exited with an error");
    }
    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    source: Arc<dyn CatalogSource>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(config.page_size, !config.no_artwork);

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        draw_ui(terminal, &app)?;

        // Pick up whatever fetches finished since the last frame.
        while let Ok(event) = rx.try_recv() {
            for command in app.apply(event) {
                spawn_command(command, source.clone(), tx.clone());
            }
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let viewport = list_viewport(terminal.size()?);
                    for command in app.handle_key(key.code, viewport) {
                        if command == Command::Quit {
                            info!("quit requested");
                            return Ok(());
                        }
                        spawn_command(command, source.clone(), tx.clone());
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

async fn print_first_page(client: &PokeClient, json: bool) -> Result<(), Box<dyn Error>> {
    eprintln!("Fetching first page (page size {})...", client.page_size());
    let page = client.fetch_page(0).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }
    for item in &page.items {
        println!(
            "#{:<5} {:<16} {}",
            item.id,
            utils::format_name(&item.name),
            item.types
        );
    }
    eprintln!(
        "{} Pokémon{}",
        page.items.len(),
        if page.has_next { ", more available" } else { "" }
    );
    Ok(())
}

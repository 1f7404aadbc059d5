use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{ListItem, Page, PokemonDetail, TypeSlot};

/// Placeholder shown in the list when a record carries no type list at all.
pub const MISSING_TYPES: &str = "—";

/// The three reads the screens need. `PokeClient` is the real implementation.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog page starting at `offset` and resolve every entry
    /// into a list item. Items come back in catalog order.
    async fn fetch_page(&self, offset: usize) -> Result<Page, FetchError>;

    async fn fetch_detail(&self, id: u32) -> Result<PokemonDetail, FetchError>;

    async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    next: Option<String>,
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    sprites: serde_json::Value,
    types: Option<Vec<TypeEntry>>,
    #[serde(default)]
    abilities: Vec<AbilityEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Debug, Deserialize)]
struct AbilityEntry {
    ability: NamedResource,
}

impl PokemonResponse {
    fn artwork(&self) -> Option<String> {
        self.sprites
            .pointer("/other/official-artwork/front_default")
            .and_then(|u| u.as_str())
            .map(|s| s.to_string())
    }

    /// Flatten into a list row. The display name comes from the catalog entry.
    fn into_list_item(self, name: &str) -> ListItem {
        let image = self.artwork();
        let types = self
            .types
            .map(|slots| {
                slots
                    .iter()
                    .map(|t| t.type_info.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|| MISSING_TYPES.to_string());
        ListItem {
            id: self.id,
            name: name.to_string(),
            image,
            types,
        }
    }

    fn into_detail(self) -> PokemonDetail {
        let artwork = self.artwork();
        PokemonDetail {
            id: self.id,
            name: self.name,
            height: self.height,
            weight: self.weight,
            types: self
                .types
                .unwrap_or_default()
                .into_iter()
                .map(|t| TypeSlot {
                    slot: t.slot,
                    name: t.type_info.name,
                })
                .collect(),
            abilities: self
                .abilities
                .into_iter()
                .map(|a| a.ability.name)
                .collect(),
            artwork,
        }
    }
}

/// HTTP client for the PokeAPI-shaped catalog.
#[derive(Debug, Clone)]
pub struct PokeClient {
    http: reqwest::Client,
    base_url: String,
    page_size: usize,
}

impl PokeClient {
    pub fn new(base_url: &str, page_size: usize) -> Result<Self, FetchError> {
        Self::build(base_url, page_size, None)
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::build(
            &config.base_url,
            config.page_size,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(
        base_url: &str,
        page_size: usize,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("dextui/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "GET");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.get(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_entry(&self, entry: &NamedResource) -> Result<ListItem, FetchError> {
        let record: PokemonResponse = self.get_json(&entry.url).await?;
        Ok(record.into_list_item(&entry.name))
    }
}

#[async_trait]
impl CatalogSource for PokeClient {
    async fn fetch_page(&self, offset: usize) -> Result<Page, FetchError> {
        let url = format!(
            "{}/pokemon?limit={}&offset={}",
            self.base_url, self.page_size, offset
        );
        let page: CatalogPage = self.get_json(&url).await?;

        // One request per entry, all in flight at once. try_join_all yields
        // results in request order regardless of completion order.
        let items = try_join_all(page.results.iter().map(|entry| self.fetch_entry(entry)))
            .await
            .map_err(|e| {
                warn!(offset, error = %e, "catalog page entry failed");
                e
            })?;
        debug!(offset, count = items.len(), has_next = page.next.is_some(), "catalog page loaded");

        Ok(Page {
            items,
            has_next: page.next.is_some(),
        })
    }

    async fn fetch_detail(&self, id: u32) -> Result<PokemonDetail, FetchError> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        let record: PokemonResponse = self.get_json(&url).await?;
        Ok(record.into_detail())
    }

    async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.get(url).await
    }
}

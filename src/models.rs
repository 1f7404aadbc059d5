use serde::Serialize;

/// One row of the catalog list, flattened from a full record.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: u32,
    pub name: String,
    /// Official artwork URL, when the record has one.
    pub image: Option<String>,
    /// Type names joined with `", "`.
    pub types: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSlot {
    pub slot: u8,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<String>,
    pub artwork: Option<String>,
}

impl PokemonDetail {
    pub fn type_names(&self) -> String {
        self.types
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One catalog page after its entries have been resolved into list items.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub items: Vec<ListItem>,
    /// Whether upstream reported a following page.
    pub has_next: bool,
}

/// Decoded artwork, one entry per terminal cell. `None` marks a transparent pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub w: u32,
    pub h: u32,
    pub rows: Vec<Vec<Option<(u8, u8, u8)>>>,
}

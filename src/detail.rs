//! Detail screen state.
//!
//! Every mount hands out a [`DetailTicket`]. A completion is only applied when
//! it presents the ticket of the current mount; anything older is dropped.

use tracing::{debug, warn};

use crate::error::{FetchError, Notice};
use crate::models::{Artwork, PokemonDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    generation: u64,
    pub id: u32,
}

/// What the caller should do after a detail fetch completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Applied,
    /// The screen was left or re-routed before the response arrived.
    Discarded,
    /// The fetch failed: go back to the previous screen and show the notice.
    NavigateBack(Notice),
}

#[derive(Debug, Clone, Default)]
pub struct DetailScreen {
    route: Option<u32>,
    generation: u64,
    mounted: bool,
    loading: bool,
    record: Option<PokemonDetail>,
    artwork: Option<Artwork>,
}

impl DetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Option<u32> {
        self.route
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn record(&self) -> Option<&PokemonDetail> {
        self.record.as_ref()
    }

    pub fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    /// Show the record for `id`. Called on first mount and on every route change;
    /// either way any outstanding fetch becomes stale.
    pub fn mount(&mut self, id: u32) -> DetailTicket {
        self.generation += 1;
        self.mounted = true;
        self.loading = true;
        if self.route != Some(id) {
            self.artwork = None;
        }
        self.route = Some(id);
        debug!(id, generation = self.generation, "detail mounted");
        DetailTicket {
            generation: self.generation,
            id,
        }
    }

    /// Leave the screen. The record is dropped and pending fetches go stale.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.loading = false;
        self.route = None;
        self.record = None;
        self.artwork = None;
    }

    fn is_current(&self, ticket: DetailTicket) -> bool {
        self.mounted && ticket.generation == self.generation
    }

    pub fn apply(
        &mut self,
        ticket: DetailTicket,
        result: Result<PokemonDetail, FetchError>,
    ) -> DetailOutcome {
        if !self.is_current(ticket) {
            debug!(id = ticket.id, "discarding detail response for a stale mount");
            return DetailOutcome::Discarded;
        }
        match result {
            Ok(record) => {
                self.record = Some(record);
                self.loading = false;
                DetailOutcome::Applied
            }
            Err(err) => {
                warn!(id = ticket.id, error = %err, "failed to fetch detail record");
                self.unmount();
                DetailOutcome::NavigateBack(Notice::detail_failed())
            }
        }
    }

    /// Attach decoded artwork. Failures only leave the artwork pane empty.
    pub fn apply_artwork(&mut self, ticket: DetailTicket, result: Result<Artwork, FetchError>) {
        if !self.is_current(ticket) {
            return;
        }
        match result {
            Ok(art) => self.artwork = Some(art),
            Err(err) => warn!(id = ticket.id, error = %err, "artwork unavailable"),
        }
    }
}

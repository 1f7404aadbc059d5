use std::sync::Arc;

use crossterm::event::KeyCode;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::detail::{DetailOutcome, DetailScreen, DetailTicket};
use crate::error::{FetchError, Notice};
use crate::fetch::CatalogSource;
use crate::list::{ListScreen, PageRequest};
use crate::models::{Artwork, Page, PokemonDetail};
use crate::utils::decode_artwork;

/// Artwork is shrunk to this many terminal cells. Cells are roughly twice as
/// tall as they are wide, so this keeps square art square.
pub const ARTWORK_W: u32 = 32;
pub const ARTWORK_H: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

/// Side effects requested by the UI. The runtime loop executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadPage(PageRequest),
    LoadDetail(DetailTicket),
    LoadArtwork { ticket: DetailTicket, url: String },
    Quit,
}

/// Completion of a spawned fetch, sent back to the UI loop.
#[derive(Debug)]
pub enum FetchEvent {
    Page {
        request: PageRequest,
        result: Result<Page, FetchError>,
    },
    Detail {
        ticket: DetailTicket,
        result: Result<PokemonDetail, FetchError>,
    },
    Artwork {
        ticket: DetailTicket,
        result: Result<Artwork, FetchError>,
    },
}

pub struct App {
    pub screen: Screen,
    pub list: ListScreen,
    pub detail: DetailScreen,
    pub notice: Option<Notice>,
    pub show_help: bool,
    pub show_artwork: bool,
}

impl App {
    pub fn new(page_size: usize, show_artwork: bool) -> Self {
        Self {
            screen: Screen::List,
            list: ListScreen::new(page_size),
            detail: DetailScreen::new(),
            notice: None,
            show_help: false,
            show_artwork,
        }
    }

    /// Translate a key press into state changes and commands.
    ///
    /// `viewport` is the number of list rows currently visible.
    pub fn handle_key(&mut self, code: KeyCode, viewport: usize) -> Vec<Command> {
        // notices block everything until dismissed
        if self.notice.take().is_some() {
            return vec![];
        }
        match code {
            KeyCode::Char('q') => return vec![Command::Quit],
            KeyCode::Char('h') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return vec![];
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return vec![];
            }
            _ => {}
        }

        match self.screen {
            Screen::List => self.handle_list_key(code, viewport),
            Screen::Detail => {
                if matches!(code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b')) {
                    self.back();
                }
                vec![]
            }
        }
    }

    fn handle_list_key(&mut self, code: KeyCode, viewport: usize) -> Vec<Command> {
        let request = match code {
            KeyCode::Char('l') => self.list.request_initial(),
            KeyCode::Enter if self.list.items().is_empty() => self.list.request_initial(),
            KeyCode::Enter => return self.open_selected(),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(viewport),
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_previous();
                None
            }
            _ => None,
        };
        request.map(Command::LoadPage).into_iter().collect()
    }

    fn open_selected(&mut self) -> Vec<Command> {
        let Some(id) = self.list.selected_item().map(|item| item.id) else {
            return vec![];
        };
        info!(id, "opening detail");
        self.screen = Screen::Detail;
        vec![Command::LoadDetail(self.detail.mount(id))]
    }

    fn back(&mut self) {
        self.detail.unmount();
        self.screen = Screen::List;
    }

    /// Route a completed fetch to the screen that asked for it.
    pub fn apply(&mut self, event: FetchEvent) -> Vec<Command> {
        match event {
            FetchEvent::Page { request, result } => {
                match result {
                    Ok(page) => self.list.apply_page(request, page),
                    Err(err) => self.notice = Some(self.list.fail(request, &err)),
                }
                vec![]
            }
            FetchEvent::Detail { ticket, result } => match self.detail.apply(ticket, result) {
                DetailOutcome::Applied => {
                    let url = self
                        .detail
                        .record()
                        .and_then(|r| r.artwork.clone())
                        .filter(|_| self.show_artwork);
                    url.map(|url| Command::LoadArtwork { ticket, url })
                        .into_iter()
                        .collect()
                }
                DetailOutcome::Discarded => vec![],
                DetailOutcome::NavigateBack(notice) => {
                    self.screen = Screen::List;
                    self.notice = Some(notice);
                    vec![]
                }
            },
            FetchEvent::Artwork { ticket, result } => {
                self.detail.apply_artwork(ticket, result);
                vec![]
            }
        }
    }
}

/// Run `command` on a background task; its completion arrives on `tx`.
///
/// `Command::Quit` is the caller's business and is ignored here.
pub fn spawn_command(
    command: Command,
    source: Arc<dyn CatalogSource>,
    tx: UnboundedSender<FetchEvent>,
) {
    debug!(?command, "spawning");
    match command {
        Command::LoadPage(request) => {
            tokio::spawn(async move {
                let result = source.fetch_page(request.offset).await;
                if tx.send(FetchEvent::Page { request, result }).is_err() {
                    debug!("receiver gone, dropping completion");
                }
            });
        }
        Command::LoadDetail(ticket) => {
            tokio::spawn(async move {
                let result = source.fetch_detail(ticket.id).await;
                if tx.send(FetchEvent::Detail { ticket, result }).is_err() {
                    debug!("receiver gone, dropping completion");
                }
            });
        }
        Command::LoadArtwork { ticket, url } => {
            tokio::spawn(async move {
                let result = match source.fetch_artwork(&url).await {
                    Ok(bytes) => {
                        decode_artwork(&bytes, ARTWORK_W, ARTWORK_H).map_err(FetchError::from)
                    }
                    Err(err) => Err(err),
                };
                if tx.send(FetchEvent::Artwork { ticket, result }).is_err() {
                    debug!("receiver gone, dropping completion");
                }
            });
        }
        Command::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListItem;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct CountingCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for CountingCatalog {
        async fn fetch_page(&self, _offset: usize) -> Result<Page, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(page(&[1, 2], true))
        }

        async fn fetch_detail(&self, id: u32) -> Result<PokemonDetail, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(detail(id, None))
        }

        async fn fetch_artwork(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn page(ids: &[u32], has_next: bool) -> Page {
        Page {
            items: ids
                .iter()
                .map(|&id| ListItem {
                    id,
                    name: format!("mon-{id}"),
                    image: None,
                    types: "water".into(),
                })
                .collect(),
            has_next,
        }
    }

    fn detail(id: u32, artwork: Option<&str>) -> PokemonDetail {
        PokemonDetail {
            id,
            name: format!("mon-{id}"),
            artwork: artwork.map(str::to_string),
            ..Default::default()
        }
    }

    fn loaded_app(ids: &[u32]) -> App {
        let mut app = App::new(ids.len(), true);
        let cmds = app.handle_key(KeyCode::Char('l'), 10);
        let Command::LoadPage(request) = cmds[0].clone() else {
            panic!("expected a page load, got {cmds:?}");
        };
        app.apply(FetchEvent::Page {
            request,
            result: Ok(page(ids, true)),
        });
        app
    }

    #[test]
    fn load_key_requests_first_page_once() {
        let mut app = App::new(20, true);
        assert_eq!(
            app.handle_key(KeyCode::Char('l'), 10),
            vec![Command::LoadPage(PageRequest { offset: 0 })]
        );
        assert_eq!(app.handle_key(KeyCode::Enter, 10), vec![]);
    }

    #[test]
    fn failed_page_shows_blocking_notice() {
        let mut app = loaded_app(&[1, 2]);
        let cmds = app.handle_key(KeyCode::Down, 10);
        let Command::LoadPage(request) = cmds[0].clone() else {
            panic!("expected a page load, got {cmds:?}");
        };
        app.apply(FetchEvent::Page {
            request,
            result: Err(FetchError::Status {
                url: "x".into(),
                status: 500,
            }),
        });
        assert_eq!(app.notice, Some(Notice::list_failed()));
        assert_eq!(app.list.items().len(), 2);

        // the first key only dismisses the notice
        assert_eq!(app.handle_key(KeyCode::Char('q'), 10), vec![]);
        assert!(app.notice.is_none());
        assert_eq!(app.handle_key(KeyCode::Char('q'), 10), vec![Command::Quit]);
    }

    #[test]
    fn enter_opens_detail_and_fetches_artwork() {
        let mut app = loaded_app(&[1, 2, 3]);
        app.handle_key(KeyCode::Down, 100);
        let cmds = app.handle_key(KeyCode::Enter, 100);
        assert_eq!(app.screen, Screen::Detail);
        let Command::LoadDetail(ticket) = cmds[0] else {
            panic!("expected a detail load, got {cmds:?}");
        };
        assert_eq!(ticket.id, 2);

        let cmds = app.apply(FetchEvent::Detail {
            ticket,
            result: Ok(detail(2, Some("http://art/2.png"))),
        });
        assert_eq!(
            cmds,
            vec![Command::LoadArtwork {
                ticket,
                url: "http://art/2.png".into()
            }]
        );
        assert_eq!(app.detail.record().map(|r| r.id), Some(2));
    }

    #[test]
    fn artwork_is_skipped_when_disabled() {
        let mut app = loaded_app(&[1]);
        app.show_artwork = false;
        let cmds = app.handle_key(KeyCode::Enter, 10);
        let Command::LoadDetail(ticket) = cmds[0] else {
            panic!("expected a detail load, got {cmds:?}");
        };
        let cmds = app.apply(FetchEvent::Detail {
            ticket,
            result: Ok(detail(1, Some("http://art/1.png"))),
        });
        assert!(cmds.is_empty());
    }

    #[test]
    fn failed_detail_goes_back_to_list_with_notice() {
        let mut app = loaded_app(&[1]);
        let cmds = app.handle_key(KeyCode::Enter, 10);
        let Command::LoadDetail(ticket) = cmds[0] else {
            panic!("expected a detail load, got {cmds:?}");
        };
        app.apply(FetchEvent::Detail {
            ticket,
            result: Err(FetchError::Status {
                url: "x".into(),
                status: 404,
            }),
        });
        assert_eq!(app.screen, Screen::List);
        assert_eq!(app.notice, Some(Notice::detail_failed()));
        assert!(!app.detail.is_mounted());
    }

    #[test]
    fn leaving_detail_discards_late_response() {
        let mut app = loaded_app(&[1]);
        let cmds = app.handle_key(KeyCode::Enter, 10);
        let Command::LoadDetail(ticket) = cmds[0] else {
            panic!("expected a detail load, got {cmds:?}");
        };
        app.handle_key(KeyCode::Esc, 10);
        assert_eq!(app.screen, Screen::List);

        let cmds = app.apply(FetchEvent::Detail {
            ticket,
            result: Ok(detail(1, Some("http://art/1.png"))),
        });
        assert!(cmds.is_empty());
        assert!(app.detail.record().is_none());

        // a late failure does not yank the user around either
        app.apply(FetchEvent::Detail {
            ticket,
            result: Err(FetchError::Status {
                url: "x".into(),
                status: 500,
            }),
        });
        assert!(app.notice.is_none());
        assert_eq!(app.screen, Screen::List);
    }

    #[test]
    fn help_toggles_and_list_keys_are_ignored_on_detail() {
        let mut app = loaded_app(&[1, 2]);
        app.handle_key(KeyCode::Char('h'), 10);
        assert!(app.show_help);
        app.handle_key(KeyCode::Esc, 10);
        assert!(!app.show_help);

        app.handle_key(KeyCode::Enter, 10);
        assert_eq!(app.handle_key(KeyCode::Down, 10), vec![]);
        assert_eq!(app.list.selected(), 0);
    }

    #[tokio::test]
    async fn completions_after_shutdown_are_dropped_quietly() {
        let catalog = Arc::new(CountingCatalog::default());
        let source: Arc<dyn CatalogSource> = catalog.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        spawn_command(
            Command::LoadPage(PageRequest { offset: 0 }),
            source.clone(),
            tx.clone(),
        );
        spawn_command(
            Command::LoadDetail(DetailScreen::new().mount(4)),
            source,
            tx,
        );

        // each task holds a clone of the catalog until it has finished sending
        tokio::time::timeout(Duration::from_secs(5), async {
            while Arc::strong_count(&catalog) > 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("spawned fetches should finish");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
    }
}

use crate::app::{App, Screen};
use crate::models::{Artwork, PokemonDetail};
use crate::utils::{format_name, prefers_dark_text, type_color};
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem as ListRow, ListState, Paragraph, Wrap,
};
use ratatui::{Frame, Terminal};
use std::io;

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;
/// Each catalog entry renders as a name line plus a type line.
const LINES_PER_ROW: u16 = 2;

const ACCENT: Color = Color::Rgb(255, 203, 5);
const TITLE_BLUE: Color = Color::Rgb(42, 117, 187);

/// Row markers: artwork available upstream, or the empty placeholder box.
const ARTWORK_MARK: &str = "▣";
const PLACEHOLDER_MARK: &str = "□";

/// Number of list entries visible for a terminal of `size`.
pub fn list_viewport(size: Rect) -> usize {
    let body = size
        .height
        .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT)
        .saturating_sub(2);
    (body / LINES_PER_ROW).max(1) as usize
}

// helper to compute a centered rect for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}

pub fn draw_ui<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> io::Result<()> {
    terminal.draw(|f| render(f, app)).map(|_| ())
}

pub fn render<B: Backend>(f: &mut Frame<B>, app: &App) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(size);

    let header = Paragraph::new(Spans::from(Span::styled(
        "Pokédex",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    match app.screen {
        Screen::List => render_list(f, app, chunks[1]),
        Screen::Detail => render_detail(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);

    if app.show_help {
        render_help(f, size);
    }
    // notices sit on top of everything, help included
    if let Some(notice) = &app.notice {
        let popup = centered_rect(50, 30, size);
        let para = Paragraph::new(vec![
            Spans::from(Span::raw(notice.message.clone())),
            Spans::from(Span::raw("")),
            Spans::from(Span::styled(
                "Press any key to continue",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(notice.title.clone()),
        )
        .wrap(Wrap { trim: true });
        f.render_widget(Clear, popup);
        f.render_widget(para, popup);
    }
}

fn render_list<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let list = &app.list;
    let block = Block::default().borders(Borders::ALL).title("Pokémon");

    if list.items().is_empty() {
        let text = if list.is_loading() {
            "Loading…"
        } else {
            "Press l or Enter to load Pokémon"
        };
        let para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let rows: Vec<ListRow> = list
        .items()
        .iter()
        .map(|item| {
            let marker = if item.image.is_some() {
                Span::styled(ARTWORK_MARK, Style::default().fg(ACCENT))
            } else {
                Span::styled(PLACEHOLDER_MARK, Style::default().fg(Color::DarkGray))
            };
            ListRow::new(vec![
                Spans::from(vec![
                    marker,
                    Span::raw(" "),
                    Span::styled(
                        format!("#{} - {}", item.id, item.name.to_uppercase()),
                        Style::default().fg(TITLE_BLUE).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Spans::from(Span::styled(
                    format!("    Type: {}", item.types),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let widget = List::new(rows)
        .block(block)
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(list.selected()));
    f.render_stateful_widget(widget, area, &mut state);
}

fn render_detail<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let detail = &app.detail;
    let block = Block::default().borders(Borders::ALL).title("Details");

    let record = match detail.record() {
        Some(record) if !detail.is_loading() => record,
        _ if detail.is_loading() => {
            f.render_widget(
                Paragraph::new("Loading…")
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        }
        _ => {
            f.render_widget(
                Paragraph::new("Pokémon not found.")
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(20)])
        .split(area);

    let art = if !app.show_artwork {
        Paragraph::new("(artwork off)")
    } else if let Some(artwork) = detail.artwork() {
        Paragraph::new(artwork_lines(artwork))
    } else if record.artwork.is_some() {
        Paragraph::new("Loading artwork…")
    } else {
        Paragraph::new("(no artwork)")
    };
    f.render_widget(
        art.block(Block::default().borders(Borders::ALL).title("Artwork")),
        chunks[0],
    );

    let info = Paragraph::new(info_lines(record))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(info, chunks[1]);
}

fn artwork_lines(artwork: &Artwork) -> Vec<Spans<'static>> {
    artwork
        .rows
        .iter()
        .map(|row| {
            Spans::from(
                row.iter()
                    .map(|px| match px {
                        Some((r, g, b)) => {
                            Span::styled(" ", Style::default().bg(Color::Rgb(*r, *g, *b)))
                        }
                        None => Span::raw(" "),
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn info_lines(p: &PokemonDetail) -> Vec<Spans<'static>> {
    let mut lines: Vec<Spans> = Vec::new();
    lines.push(Spans::from(Span::styled(
        format!("#{} - {}", p.id, p.name.to_uppercase()),
        Style::default().fg(TITLE_BLUE).add_modifier(Modifier::BOLD),
    )));
    lines.push(Spans::from(Span::raw("")));

    // types as colored badges
    let mut type_spans: Vec<Span> = vec![Span::raw("Type(s): ")];
    for (i, t) in p.types.iter().enumerate() {
        let (r, g, b) = type_color(&t.name);
        let fg = if prefers_dark_text((r, g, b)) {
            Color::Black
        } else {
            Color::White
        };
        type_spans.push(Span::styled(
            format!(" {} ", format_name(&t.name)),
            Style::default().fg(fg).bg(Color::Rgb(r, g, b)),
        ));
        if i + 1 < p.types.len() {
            type_spans.push(Span::raw(" "));
        }
    }
    lines.push(Spans::from(type_spans));
    lines.push(Spans::from(Span::raw(format!("Height: {}", p.height))));
    lines.push(Spans::from(Span::raw(format!("Weight: {}", p.weight))));
    lines.push(Spans::from(Span::raw("")));
    lines.push(Spans::from(Span::styled(
        "Abilities:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for ability in &p.abilities {
        lines.push(Spans::from(Span::raw(format!("• {}", format_name(ability)))));
    }
    lines
}

fn render_footer<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let list = &app.list;
    let text = match app.screen {
        Screen::List if list.is_loading() && !list.items().is_empty() => {
            format!("{} loaded · loading more…", list.items().len())
        }
        Screen::List if !list.items().is_empty() && !list.has_more() => {
            format!("{} loaded · end of catalog", list.items().len())
        }
        Screen::List => format!(
            "{} loaded · ↑/↓ move · Enter details · h help · q quit",
            list.items().len()
        ),
        Screen::Detail => "Esc back · h help · q quit".to_string(),
    };
    let para = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn render_help<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let popup = centered_rect(60, 50, area);
    let help_lines = vec![
        Spans::from(Span::styled(
            "Keybindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw("l / Enter   Load the catalog")),
        Spans::from(Span::raw("Up/Down     Navigate list (j/k too)")),
        Spans::from(Span::raw("Enter       Open details")),
        Spans::from(Span::raw("Esc / b     Back to the list")),
        Spans::from(Span::raw("h / F1      Toggle this help")),
        Spans::from(Span::raw("q           Quit")),
    ];
    let help_para = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(help_para, popup);
}

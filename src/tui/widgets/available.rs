// Available players widget: sortable/filterable table of undrafted players.
//
// Scrollable table: Rank, Name, Pos, $Value, $Adj, VOR, z-score total
// Filter by position_filter and filter_text from ViewState
// Highlight nominated player row
// Column headers bold

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::draft::pick::Position;
use crate::tui::ViewState;
use crate::valuation::zscore::PlayerValuation;

/// Render the available players table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let filtered = filter_players(
        &state.available_players,
        state.position_filter.as_ref(),
        &state.filter_text,
    );

    let nominated_name = state
        .current_nomination
        .as_ref()
        .map(|n| n.player_name.as_str());

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Pos"),
        Cell::from("$Val"),
        Cell::from("VOR"),
        Cell::from("zTotal"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(0);

    let rows: Vec<Row> = filtered
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let is_nominated = nominated_name.map_or(false, |name| name == p.name);
            let style = if is_nominated {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.name.clone()),
                Cell::from(format_positions(&p.positions)),
                Cell::from(format!("${:.0}", p.dollar_value)),
                Cell::from(format!("{:.1}", p.vor)),
                Cell::from(format!("{:.2}", p.total_zscore)),
            ])
            .style(style)
        })
        .collect();

    let title = build_title(state, filtered.len());

    let widths = [
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Min(16),
        ratatui::layout::Constraint::Length(8),
        ratatui::layout::Constraint::Length(6),
        ratatui::layout::Constraint::Length(6),
        ratatui::layout::Constraint::Length(7),
    ];

    let _scroll_offset = state.scroll_offset.get("available").copied().unwrap_or(0);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    frame.render_widget(table, area);
}

/// Filter players by position and text search.
pub fn filter_players<'a>(
    players: &'a [PlayerValuation],
    position_filter: Option<&Position>,
    filter_text: &str,
) -> Vec<&'a PlayerValuation> {
    let text_lower = filter_text.to_lowercase();

    players
        .iter()
        .filter(|p| {
            // Position filter
            if let Some(pos) = position_filter {
                if !p.positions.contains(pos) {
                    return false;
                }
            }
            // Text filter (match on name)
            if !text_lower.is_empty() && !p.name.to_lowercase().contains(&text_lower) {
                return false;
            }
            true
        })
        .collect()
}

/// Format position list as a compact string (e.g., "1B/OF").
pub fn format_positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "--".to_string();
    }
    positions
        .iter()
        .map(|p| p.display_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the title with filter info and pre-computed count.
fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Available Players");
    if let Some(ref pos) = state.position_filter {
        title.push_str(&format!(" [{}]", pos.display_str()));
    }
    if !state.filter_text.is_empty() {
        title.push_str(&format!(" \"{}\"", state.filter_text));
    }
    title.push_str(&format!(" ({})", filtered_count));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

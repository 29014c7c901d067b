// Teams widget: overview of all teams' rosters and remaining budgets.
//
// Summary table of all teams: name, budget remaining, slots filled.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the teams overview into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("Team"),
        Cell::from("Budget"),
        Cell::from("Filled"),
        Cell::from("Remaining"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(0);

    let rows: Vec<Row> = if state.team_summaries.is_empty() {
        vec![Row::new(vec![Cell::from("  No team data available")])]
    } else {
        state
            .team_summaries
            .iter()
            .map(|team| {
                let remaining_slots = team.total_slots.saturating_sub(team.slots_filled);
                Row::new(vec![
                    Cell::from(team.name.clone()),
                    Cell::from(format_budget(team.budget_remaining)),
                    Cell::from(format!("{}/{}", team.slots_filled, team.total_slots)),
                    Cell::from(format!("{}", remaining_slots)),
                ])
            })
            .collect()
    };

    let widths = [
        ratatui::layout::Constraint::Min(16),
        ratatui::layout::Constraint::Length(8),
        ratatui::layout::Constraint::Length(8),
        ratatui::layout::Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Teams"),
    );
    frame.render_widget(table, area);
}

/// Format a budget value for display.
pub fn format_budget(remaining: u32) -> String {
    format!("${}", remaining)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

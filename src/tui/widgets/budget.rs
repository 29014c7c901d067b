// Budget widget: remaining budget, inflation factor, and spending pace.
//
// Key-value display:
// Spent, Remaining, Inflation, Max bid, Avg/slot
// Inflation > 1.0 = green (others overspending), < 1.0 = red

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::{BudgetStatus, ViewState};

/// Render the budget display into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = build_budget_lines(&state.budget);

    let scroll_offset = state.scroll_offset.get("sidebar").copied().unwrap_or(0);
    let total_lines = lines.len();
    let visible_rows = (area.height as usize).saturating_sub(2);
    let max_offset = total_lines.saturating_sub(visible_rows);
    let scroll = (scroll_offset.min(max_offset)) as u16;

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Budget"),
        )
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Build the budget display lines.
fn build_budget_lines(budget: &BudgetStatus) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Spent
    lines.push(Line::from(vec![
        Span::styled(" Spent:     ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("${}", budget.spent),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(" / ${}", budget.cap),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    // Remaining
    lines.push(Line::from(vec![
        Span::styled(" Remaining: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("${}", budget.remaining),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    // Inflation
    let inflation_color = inflation_color(budget.inflation_rate);
    lines.push(Line::from(vec![
        Span::styled(" Inflation: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format_inflation(budget.inflation_rate),
            Style::default()
                .fg(inflation_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    // Max bid
    lines.push(Line::from(vec![
        Span::styled(" Max Bid:   ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("${}", budget.max_bid),
            Style::default().fg(Color::White),
        ),
    ]));

    // Avg per slot
    lines.push(Line::from(vec![
        Span::styled(" Avg/Slot:  ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("${:.1}", budget.avg_per_slot),
            Style::default().fg(Color::White),
        ),
    ]));

    lines
}

/// Return the color for the inflation rate.
///
/// Green if > 1.0 (others overspending, our values go up).
/// Red if < 1.0 (others underspending).
/// White at exactly 1.0.
pub fn inflation_color(rate: f64) -> Color {
    if rate > 1.0 {
        Color::Green
    } else if rate < 1.0 {
        Color::Red
    } else {
        Color::White
    }
}

/// Format the inflation rate for display.
pub fn format_inflation(rate: f64) -> String {
    format!("{:.3}x", rate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

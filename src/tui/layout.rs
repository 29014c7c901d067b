// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the draft dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Nomination Banner (4 rows)                        |
// +-------------------------+------------------------+
// | Main Panel (65%)         | Sidebar (35%)          |
// |                          | +- Roster (45%) ------+|
// |                          | +- Scarcity (35%) ----+|
// |                          | +- Budget (20%) ------+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: connection status, draft progress, pick counter.
    pub status_bar: Rect,
    /// Second row: current nomination details (player, bid, timer).
    pub nomination_banner: Rect,
    /// Left side of the middle section: tab-switched content area.
    pub main_panel: Rect,
    /// Right sidebar top: user's roster.
    pub roster: Rect,
    /// Right sidebar middle: positional scarcity index.
    pub scarcity: Rect,
    /// Right sidebar bottom: budget/inflation summary.
    pub budget: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
///
/// The layout uses fixed heights for the status bar, nomination banner,
/// and help bar, with the remaining space split between the main panel
/// and a sidebar column.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | nomination(4) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // status bar
            Constraint::Length(4),  // nomination banner
            Constraint::Min(10),   // middle section (main + sidebar)
            Constraint::Length(1),  // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let nomination_banner = vertical[1];
    let middle = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: main panel (65%) | sidebar (35%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65),
            Constraint::Percentage(35),
        ])
        .split(middle);

    let main_panel = horizontal[0];
    let sidebar = horizontal[1];

    // Sidebar vertical: roster (45%) | scarcity (35%) | budget (20%)
    let sidebar_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
        ])
        .split(sidebar);

    let roster = sidebar_sections[0];
    let scarcity = sidebar_sections[1];
    let budget = sidebar_sections[2];

    AppLayout {
        status_bar,
        nomination_banner,
        main_panel,
        roster,
        scarcity,
        budget,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

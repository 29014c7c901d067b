// Status bar widget: connection status, draft progress, tab indicator.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{ConnectionStatus, TabId};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [connection indicator] [pick counter] [tab bar]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    // Connection indicator
    let (dot, dot_color) = connection_indicator(state.connection_status);
    spans.push(Span::styled(
        format!(" {} ", dot),
        Style::default().fg(dot_color),
    ));

    // Pick counter
    spans.push(Span::styled(
        format!("Pick {}/{}", state.pick_number, state.total_picks),
        Style::default().fg(Color::White),
    ));

    // Separator
    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));

    // Tab bar
    let tabs = tab_spans(state.active_tab);
    spans.extend(tabs);

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the connection dot character and its color.
pub fn connection_indicator(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Disconnected => ("●", Color::Red),
    }
}

/// Build tab indicator spans with descriptive labels and active tab highlighted.
/// E.g. "[1:Analysis] [2:Plan] [3:Players] [4:Log] [5:Teams]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [
        (TabId::Analysis, "1:Analysis"),
        (TabId::NomPlan, "2:Plan"),
        (TabId::Available, "3:Players"),
        (TabId::DraftLog, "4:Log"),
        (TabId::Teams, "5:Teams"),
    ];

    let mut spans = Vec::new();
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Return the label for a tab.
pub fn tab_label(tab: TabId) -> &'static str {
    match tab {
        TabId::Analysis => "Analysis",
        TabId::NomPlan => "Nom Plan",
        TabId::Available => "Available",
        TabId::DraftLog => "Draft Log",
        TabId::Teams => "Teams",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

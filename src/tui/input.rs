// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (e.g. tab switching,
// scroll, filtering).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::draft::pick::Position;
use crate::protocol::{TabId, UserCommand};
use super::ViewState;

/// The ordered list of positions for cycling with the `p` key.
///
/// None -> C -> 1B -> 2B -> 3B -> SS -> LF -> CF -> RF -> UTIL -> SP -> RP -> None
const POSITION_CYCLE: &[Position] = &[
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
    Position::Utility,
    Position::StartingPitcher,
    Position::ReliefPitcher,
];

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (e.g. RefreshAnalysis, Quit). Returns `None` when the
/// key press was handled locally by mutating `ViewState` (e.g. tab switching,
/// scrolling, filtering).
pub fn handle_key(
    key_event: KeyEvent,
    view_state: &mut ViewState,
) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Filter mode: capture printable characters and special keys
    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    // Normal mode key dispatch
    match key_event.code {
        // Tab switching
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Analysis;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Available;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::DraftLog;
            None
        }
        KeyCode::Char('4') => {
            view_state.active_tab = TabId::Teams;
            None
        }

        // Scrolling (main panel)
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, page_size());
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, page_size());
            None
        }

        // Sidebar scrolling
        KeyCode::Char('[') => {
            sidebar_scroll_up(view_state, 1);
            None
        }
        KeyCode::Char(']') => {
            sidebar_scroll_down(view_state, 1);
            None
        }

        // Filter mode entry: only available on the Players tab where it is relevant
        KeyCode::Char('/') => {
            if view_state.active_tab == TabId::Available {
                view_state.filter_mode = true;
            }
            None
        }

        // Escape: clear filter text if any, otherwise no-op
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.position_filter = None;
            None
        }

        // Position filter cycling
        KeyCode::Char('p') => {
            cycle_position_filter(view_state);
            None
        }

        // LLM refresh commands
        KeyCode::Char('r') => Some(UserCommand::RefreshAnalysis),
        KeyCode::Char('n') => Some(UserCommand::RefreshPlan),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// In quit confirmation mode:
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(
    key_event: KeyEvent,
    view_state: &mut ViewState,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Handle key events while in filter mode.
///
/// In filter mode:
/// - Printable characters are appended to filter_text
/// - Backspace removes the last character
/// - Enter or Esc exits filter mode
fn handle_filter_mode(
    key_event: KeyEvent,
    view_state: &mut ViewState,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            // Clear filter text on Esc
            view_state.filter_text.clear();
            None
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
            // Keep the filter text on Enter
            None
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            None
        }
        _ => None,
    }
}

/// Cycle the position filter through the defined positions.
///
/// None -> C -> 1B -> 2B -> 3B -> SS -> LF -> CF -> RF -> UTIL -> SP -> RP -> None
fn cycle_position_filter(view_state: &mut ViewState) {
    view_state.position_filter = match &view_state.position_filter {
        None => Some(POSITION_CYCLE[0]),
        Some(current) => {
            // Find the current position in the cycle
            let idx = POSITION_CYCLE
                .iter()
                .position(|p| p == current);
            match idx {
                Some(i) if i + 1 < POSITION_CYCLE.len() => {
                    Some(POSITION_CYCLE[i + 1])
                }
                _ => None, // Last position or not found -> wrap to None
            }
        }
    };
}

/// Get the widget key for scroll state based on the active tab.
fn active_widget_key(view_state: &ViewState) -> &'static str {
    match view_state.active_tab {
        TabId::Analysis => "analysis",
        TabId::Available => "available",
        TabId::DraftLog => "draft_log",
        TabId::Teams => "teams",
    }
}

/// Scroll up by the given number of lines.
fn scroll_up(view_state: &mut ViewState, lines: usize) {
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

/// Scroll down by the given number of lines.
fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_add(lines);
}

/// Scroll the sidebar up by the given number of lines.
fn sidebar_scroll_up(view_state: &mut ViewState, lines: usize) {
    let offset = view_state.scroll_offset.entry("sidebar".to_string()).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

/// Scroll the sidebar down by the given number of lines.
fn sidebar_scroll_down(view_state: &mut ViewState, lines: usize) {
    let offset = view_state.scroll_offset.entry("sidebar".to_string()).or_insert(0);
    *offset = offset.saturating_add(lines);
}

/// Page size for PageUp/PageDown scrolling.
fn page_size() -> usize {
    20
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

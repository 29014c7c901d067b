// TUI widget modules for each dashboard panel.

pub mod available;
pub mod budget;
pub mod draft_log;
pub mod llm_analysis;
pub mod nomination_banner;
pub mod nomination_plan;
pub mod roster;
pub mod scarcity;
pub mod status_bar;
pub mod teams;

use console::Style;
use once_cell::sync::Lazy;
use outstanding::{rgb_to_ansi256, Theme};

/// Style names used by the templates.
pub mod names {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const LABEL: &str = "label";
    pub const HEADING: &str = "heading";
    pub const TIME: &str = "time";
    pub const DRAFT: &str = "status_draft";
    pub const COMPLETED: &str = "status_completed";
    pub const SENT: &str = "status_sent";
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
}

pub static MICROLAB_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add(names::ID, Style::new().color256(rgb_to_ansi256((138, 138, 138))))
        .add(names::TITLE, Style::new().bold())
        .add(names::LABEL, Style::new().dim())
        .add(names::HEADING, Style::new().bold().underlined())
        .add(
            names::TIME,
            Style::new()
                .color256(rgb_to_ansi256((154, 154, 154)))
                .italic(),
        )
        .add(names::DRAFT, Style::new().yellow())
        .add(names::COMPLETED, Style::new().cyan())
        .add(names::SENT, Style::new().green())
        .add(names::INFO, Style::new().dim())
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow())
        .add(names::ERROR, Style::new().red())
});

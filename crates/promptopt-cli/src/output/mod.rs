//! Output formatters

pub mod json;
pub mod terminal;

pub use terminal::TerminalDisplay;

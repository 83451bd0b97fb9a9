//! TUI Frontend (ratatui-based)
//!
//! Implements the Frontend trait using ratatui for terminal rendering and
//! crossterm for events. The toolbar, menu bar and command line are drawn by
//! their own widgets here; the core only sees them through its host traits.

pub mod app;
pub mod command_input;
pub mod menu_bar;
pub mod toolbar;

pub use app::TuiFrontend;

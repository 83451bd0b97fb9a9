//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal frontend implements.
//! The event loop in `app` only talks to this trait: poll, render, cleanup.

pub mod events;
pub mod tui;

use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

pub trait Frontend {
    /// Return all pending input events, converted to `FrontendEvent`
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Draw one frame.
    ///
    /// Widgets record their screen positions while drawing (for click
    /// hit-testing), so the application is borrowed mutably.
    fn render(&mut self, app: &mut dyn std::any::Any) -> Result<()>;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal size in cells
    fn size(&self) -> (u16, u16);
}

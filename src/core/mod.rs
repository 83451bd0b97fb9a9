//! Core toolbar logic
//!
//! Control catalogue, mode resolution, sensitivity, toggles and the command
//! session. NO imports from frontend/ or rendering code: the frontend reaches
//! the core through `host::ToolbarHost` and `host::ToggleObserver`.

pub mod commands;
pub mod control_mode;
pub mod controls;
pub mod host;
pub mod menu_actions;
pub mod sensitivity;
pub mod session;
pub mod state;
pub mod toolbar;

pub use session::Session;
pub use toolbar::{Activation, ToolbarContext, ToolbarState};

//! Terminal UI for the complaint form
//!
//! - `app` - Form session (current snapshot, background workflow tasks)
//! - `input` - Key mapping
//! - `view` - ratatui rendering

pub mod app;
pub mod input;
pub mod view;

pub use app::App;
pub use input::{map_key, Action};
pub use view::draw_ui;

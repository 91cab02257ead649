// Library root: exposes the app, store, and TUI modules so integration
// tests can drive them without a terminal.

pub mod app;
pub mod protocol;
pub mod store;
pub mod tui;

// TUI widget modules, one per screen region.

pub mod board_table;
pub mod help_bar;
pub mod quit_confirm;
pub mod status_bar;

// Library root: player data, the interactive board core, and configuration.

pub mod board;
pub mod config;
pub mod players;

// Player data model and CSV loading.

pub mod loader;
pub mod model;

pub use model::{ImportedRanks, Player, Position, POSITION_CYCLE};

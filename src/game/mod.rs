// Board state and win/draw detection

pub mod error;
pub mod grid;
pub mod matcher;
pub mod session;
pub mod tiles;

pub use error::{PlacementError, ResetError, SettingsError};
pub use grid::{Board, Grid, Slot};
pub use matcher::{find_word, Scan, TargetWord, WordMatch};
pub use session::{GameEvent, GameSession, GameSettings, SessionSnapshot};
pub use tiles::TilePool;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a placement was refused. A refused placement leaves the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum PlacementError {
    #[error("position is outside the board")]
    OutOfBounds,
    #[error("cell already holds a tile")]
    CellOccupied,
    #[error("tile is already on the board")]
    TileAlreadyPlaced,
    #[error("game has already ended")]
    GameAlreadyEnded,
    #[error("no such tile")]
    InvalidTile,
    #[error("no board cell under the pointer")]
    NoCoordinateResolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ResetError {
    #[error("game is still in progress; force the reset to abandon it")]
    GameInProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("target word must not be empty")]
    EmptyWord,
    #[error("'{0}' is not a tile letter")]
    UnknownLetter(char),
    #[error("malformed tile count entry '{0}'")]
    MalformedTileCount(String),
}

pub mod game;

pub use game::{
    // Board coordinates and steps
    Direction, Position,
    // Tiles and players
    GameMode, Letter, Player, TileId, TileRecord,
    // Result of a game
    GameOutcome,
};

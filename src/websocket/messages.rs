use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    game::{GameEvent, PlacementError, SessionSnapshot},
    models::{GameMode, GameOutcome, Letter, Player, Position, TileId},
};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateGame {
        mode: GameMode,
    },
    JoinGame {
        game_id: String,
    },
    LeaveGame,
    /// `position` is the cell under the pointer, absent on a miss
    PlaceTile {
        tile_id: TileId,
        #[serde(default)]
        position: Option<Position>,
    },
    ResetGame {
        #[serde(default)]
        force: bool,
    },
    RequestState,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameCreated {
        game_id: String,
        mode: GameMode,
        /// Shuffled tile ids for laying the pool out around the board
        tile_order: Vec<TileId>,
    },
    GameState {
        game_id: String,
        created_at: DateTime<Utc>,
        state: serde_json::Value,
    },
    TilePlaced {
        tile_id: TileId,
        letter: Letter,
        position: Position,
        player: Player,
    },
    PlacementRejected {
        tile_id: TileId,
        reason: PlacementError,
        message: String,
    },
    TurnUpdate {
        current_player: Player,
    },
    Highlight {
        positions: Vec<Position>,
    },
    GameOver {
        outcome: GameOutcome,
        message: String,
    },
    BoardReset,
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn game_state(game_id: &str, created_at: DateTime<Utc>, snapshot: &SessionSnapshot) -> Self {
        ServerMessage::GameState {
            game_id: game_id.to_string(),
            created_at,
            state: serde_json::to_value(snapshot).unwrap_or_default(),
        }
    }

    pub fn rejected(tile_id: TileId, reason: PlacementError) -> Self {
        ServerMessage::PlacementRejected {
            tile_id,
            reason,
            message: reason.to_string(),
        }
    }

    /// Translate a session event into what goes over the wire
    pub fn from_event(event: GameEvent, mode: GameMode) -> Self {
        match event {
            GameEvent::TilePlaced {
                tile_id,
                letter,
                position,
                player,
            } => ServerMessage::TilePlaced {
                tile_id,
                letter,
                position,
                player,
            },
            GameEvent::TurnChanged { player } => ServerMessage::TurnUpdate {
                current_player: player,
            },
            GameEvent::Highlight { positions } => ServerMessage::Highlight { positions },
            GameEvent::GameOver { outcome } => ServerMessage::GameOver {
                message: outcome.headline(mode).unwrap_or_default(),
                outcome,
            },
            GameEvent::BoardReset => ServerMessage::BoardReset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_tile_without_position_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"place_tile","tile_id":3}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::PlaceTile {
                tile_id: 3,
                position: None
            }
        ));
    }

    #[test]
    fn test_create_game_mode_is_snake_case() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"create_game","mode":"two_player"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::CreateGame {
                mode: GameMode::TwoPlayer
            }
        ));
    }

    #[test]
    fn test_rejection_carries_reason_code() {
        let json = serde_json::to_value(ServerMessage::rejected(
            7,
            PlacementError::CellOccupied,
        ))
        .unwrap();
        assert_eq!(json["type"], "placement_rejected");
        assert_eq!(json["reason"], "cell_occupied");
        assert_eq!(json["tile_id"], 7);
    }

    #[test]
    fn test_game_over_event_gets_headline() {
        let msg = ServerMessage::from_event(
            GameEvent::GameOver {
                outcome: GameOutcome::Draw,
            },
            GameMode::TwoPlayer,
        );
        match msg {
            ServerMessage::GameOver { message, .. } => assert_eq!(message, "It's a draw!"),
            other => panic!("Unexpected message {:?}", other),
        }
    }
}

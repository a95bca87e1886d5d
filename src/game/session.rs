use std::collections::VecDeque;

use serde::Serialize;

use crate::{
    game::{
        error::{PlacementError, ResetError, SettingsError},
        grid::Board,
        matcher::{find_word, Scan, TargetWord},
        tiles::TilePool,
    },
    models::{Direction, GameMode, GameOutcome, Letter, Player, Position, TileId, TileRecord},
    utils::letters::DEFAULT_TILE_COUNTS,
};

/// Everything a session is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub width: usize,
    pub height: usize,
    pub target: TargetWord,
    pub tile_counts: Vec<(Letter, usize)>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: 4,
            height: 4,
            target: TargetWord::default(),
            tile_counts: DEFAULT_TILE_COUNTS.clone(),
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        if self.target.is_empty() {
            return Err(SettingsError::EmptyWord);
        }
        Ok(())
    }
}

/// Notifications for the presentation layer, queued in the order they happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    TilePlaced {
        tile_id: TileId,
        letter: Letter,
        position: Position,
        player: Player,
    },
    TurnChanged {
        player: Player,
    },
    /// Cells to emphasise, the matched word in reading order
    Highlight {
        positions: Vec<Position>,
    },
    GameOver {
        outcome: GameOutcome,
    },
    BoardReset,
}

/// Read-only view of a session for renderers
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub width: usize,
    pub height: usize,
    pub target_word: String,
    /// `cells[row][col]`, `None` for an empty cell
    pub cells: Vec<Vec<Option<Letter>>>,
    pub tiles: Vec<TileRecord>,
    pub outcome: GameOutcome,
    pub current_turn: Option<Player>,
}

/// One game from first tile to win or draw.
///
/// Every command runs to completion before returning: board mutation, word
/// scan, outcome update. Events describing what changed are queued and
/// handed out by [`GameSession::drain_events`].
#[derive(Debug, Clone)]
pub struct GameSession {
    mode: GameMode,
    board: Board,
    pool: TilePool,
    target: TargetWord,
    outcome: GameOutcome,
    turn: Player,
    events: VecDeque<GameEvent>,
}

impl GameSession {
    pub fn new(mode: GameMode, settings: &GameSettings) -> Self {
        Self {
            mode,
            board: Board::new(settings.width, settings.height),
            pool: TilePool::create(&settings.tile_counts),
            target: settings.target.clone(),
            outcome: GameOutcome::Ongoing,
            turn: Player::One,
            events: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pool(&self) -> &TilePool {
        &self.pool
    }

    pub fn outcome(&self) -> &GameOutcome {
        &self.outcome
    }

    /// Player to move; single-player games have no turns
    pub fn current_turn(&self) -> Option<Player> {
        match self.mode {
            GameMode::SinglePlayer => None,
            GameMode::TwoPlayer => Some(self.turn),
        }
    }

    pub fn tile_at(&self, pos: Position) -> Option<Letter> {
        self.board.tile_at(pos)
    }

    /// Play `tile_id`.
    ///
    /// Single-player ignores `target` and drops the tile into the first empty
    /// cell. Two-player needs the cell the pointer resolved to. A rejected
    /// placement changes nothing, not even the turn.
    pub fn place_tile(
        &mut self,
        tile_id: TileId,
        target: Option<Position>,
    ) -> Result<&GameOutcome, PlacementError> {
        if let Err(e) = self.try_place(tile_id, target) {
            tracing::warn!("Rejected placement of tile {}: {}", tile_id, e);
            return Err(e);
        }
        Ok(&self.outcome)
    }

    fn try_place(&mut self, tile_id: TileId, target: Option<Position>) -> Result<(), PlacementError> {
        if self.outcome.is_terminal() {
            return Err(PlacementError::GameAlreadyEnded);
        }
        if self.pool.get(tile_id).is_none() {
            return Err(PlacementError::InvalidTile);
        }

        let position = match (self.mode, target) {
            (GameMode::SinglePlayer, _) => self
                .board
                .first_empty_cell()
                .ok_or(PlacementError::CellOccupied)?,
            (GameMode::TwoPlayer, Some(pos)) => pos,
            (GameMode::TwoPlayer, None) => return Err(PlacementError::NoCoordinateResolved),
        };

        let mover = self.turn;
        let tile = self
            .pool
            .tile_mut(tile_id)
            .ok_or(PlacementError::InvalidTile)?;
        let letter = tile.letter;
        self.board.place(position, tile, mover)?;

        tracing::debug!(
            "Player {} placed {} (tile {}) at {}",
            mover.number(),
            letter,
            tile_id,
            position
        );
        self.events.push_back(GameEvent::TilePlaced {
            tile_id,
            letter,
            position,
            player: mover,
        });

        self.resolve(mover);
        Ok(())
    }

    /// Scan the board after a placement and move the state machine on
    fn resolve(&mut self, mover: Player) {
        let (directions, wrap): (&[Direction], bool) = match self.mode {
            GameMode::SinglePlayer => (&Direction::STRAIGHT[..], false),
            GameMode::TwoPlayer => (&Direction::ALL[..], true),
        };

        match find_word(&self.board, self.target.letters(), directions, wrap) {
            Scan::Found(found) => {
                // Any new match runs through the tile just placed
                let player = found.player_hint.unwrap_or(mover);
                tracing::info!(
                    "Player {} completed '{}' at {:?}",
                    player.number(),
                    self.target,
                    found.path
                );
                self.events.push_back(GameEvent::Highlight {
                    positions: found.path.clone(),
                });
                self.finish(GameOutcome::Won {
                    player,
                    word: self.target.to_string(),
                    path: found.path,
                });
            }
            Scan::Draw => {
                tracing::info!("Board filled without '{}': draw", self.target);
                self.finish(GameOutcome::Draw);
            }
            Scan::Continue => {
                if self.mode == GameMode::TwoPlayer {
                    self.turn = self.turn.opponent();
                    self.events
                        .push_back(GameEvent::TurnChanged { player: self.turn });
                }
            }
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.outcome = outcome;
        self.events.push_back(GameEvent::GameOver {
            outcome: self.outcome.clone(),
        });
    }

    /// Start over with an empty board and every tile back in the pool.
    /// An unfinished game is only abandoned when `force` is set.
    pub fn reset(&mut self, force: bool) -> Result<(), ResetError> {
        if !self.outcome.is_terminal() && !force {
            return Err(ResetError::GameInProgress);
        }

        self.board.reset();
        self.pool.reset_all();
        self.outcome = GameOutcome::Ongoing;
        self.turn = Player::One;
        self.events.push_back(GameEvent::BoardReset);

        tracing::info!("Session reset (forced: {})", force);
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let grid = self.board.grid();
        let cells = (0..grid.height())
            .map(|row| {
                (0..grid.width())
                    .map(|col| self.tile_at(Position::new(row, col)))
                    .collect()
            })
            .collect();

        SessionSnapshot {
            mode: self.mode,
            width: grid.width(),
            height: grid.height(),
            target_word: self.target.to_string(),
            cells,
            tiles: self.pool.tiles().to_vec(),
            outcome: self.outcome.clone(),
            current_turn: self.current_turn(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One player, tiles drop into the first free cell
    SinglePlayer,
    /// Two players alternate, each tile goes where the pointer resolved
    TwoPlayer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    F,
    O,
    X,
}

impl Letter {
    pub const ALL: [Letter; 3] = [Letter::F, Letter::O, Letter::X];

    pub fn as_char(self) -> char {
        match self {
            Letter::F => 'F',
            Letter::O => 'O',
            Letter::X => 'X',
        }
    }
}

impl TryFrom<char> for Letter {
    type Error = char;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch.to_ascii_uppercase() {
            'F' => Ok(Letter::F),
            'O' => Ok(Letter::O),
            'X' => Ok(Letter::X),
            _ => Err(ch),
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Player {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1-based player number used in banners
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

pub type TileId = usize;

/// A letter tile handed out by the pool.
/// `placed` flips to true once the tile sits on a board cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileRecord {
    pub id: TileId,
    pub letter: Letter,
    pub placed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Unit step on the grid, (row delta, col delta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dr: isize,
    pub dc: isize,
}

impl Direction {
    pub const RIGHT: Direction = Direction { dr: 0, dc: 1 };
    pub const DOWN: Direction = Direction { dr: 1, dc: 0 };
    pub const DOWN_RIGHT: Direction = Direction { dr: 1, dc: 1 };
    pub const DOWN_LEFT: Direction = Direction { dr: 1, dc: -1 };
    pub const LEFT: Direction = Direction { dr: 0, dc: -1 };
    pub const UP: Direction = Direction { dr: -1, dc: 0 };
    pub const UP_RIGHT: Direction = Direction { dr: -1, dc: 1 };
    pub const UP_LEFT: Direction = Direction { dr: -1, dc: -1 };

    /// Straight lines scanned in single-player; reverse reading covers the rest
    pub const STRAIGHT: [Direction; 4] = [
        Direction::RIGHT,
        Direction::DOWN,
        Direction::DOWN_RIGHT,
        Direction::DOWN_LEFT,
    ];

    /// Scan order for the two-player board
    pub const ALL: [Direction; 8] = [
        Direction::RIGHT,
        Direction::DOWN,
        Direction::DOWN_RIGHT,
        Direction::DOWN_LEFT,
        Direction::LEFT,
        Direction::UP,
        Direction::UP_RIGHT,
        Direction::UP_LEFT,
    ];

    pub fn is_diagonal(self) -> bool {
        self.dr != 0 && self.dc != 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameOutcome {
    Ongoing,
    Won {
        player: Player,
        word: String,
        path: Vec<Position>,
    },
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }

    /// Game-over banner text.
    ///
    /// In single-player the word is the trap: spelling it ends the run,
    /// filling the board without it is the win.
    pub fn headline(&self, mode: GameMode) -> Option<String> {
        match (mode, self) {
            (_, GameOutcome::Ongoing) => None,
            (GameMode::SinglePlayer, GameOutcome::Won { .. }) => {
                Some("You've found a Fox \nGame Over!".to_string())
            }
            (GameMode::SinglePlayer, GameOutcome::Draw) => Some("You won!".to_string()),
            (GameMode::TwoPlayer, GameOutcome::Won { player, .. }) => {
                Some(format!("Player {} Wins!", player.number()))
            }
            (GameMode::TwoPlayer, GameOutcome::Draw) => Some("It's a draw!".to_string()),
        }
    }
}

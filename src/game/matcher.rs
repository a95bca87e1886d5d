//! Word detection on a filled or partially filled board.
//!
//! Two scanning policies exist. The single-player board is read along
//! straight lines only, forwards and backwards, and never wraps. The
//! two-player board is read in all eight directions starting from every
//! anchor (a cell holding the word's first letter) and wraps around the
//! edges like a torus, except along diagonals too short to be worth wrapping.

use std::{fmt, str::FromStr};

use crate::{
    game::{
        error::SettingsError,
        grid::{Board, Grid},
    },
    models::{Direction, Letter, Player, Position},
    utils::letters::DEFAULT_TARGET_WORD,
};

/// The word a session is hunting for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetWord(Vec<Letter>);

impl TargetWord {
    pub fn letters(&self) -> &[Letter] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for TargetWord {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters = s
            .trim()
            .chars()
            .map(|ch| Letter::try_from(ch).map_err(SettingsError::UnknownLetter))
            .collect::<Result<Vec<_>, _>>()?;

        if letters.is_empty() {
            return Err(SettingsError::EmptyWord);
        }

        Ok(Self(letters))
    }
}

impl Default for TargetWord {
    fn default() -> Self {
        Self(
            DEFAULT_TARGET_WORD
                .chars()
                .filter_map(|ch| Letter::try_from(ch).ok())
                .collect(),
        )
    }
}

impl fmt::Display for TargetWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|l| write!(f, "{}", l))
    }
}

/// Cells spelling the word, `path[i]` holding the word's i-th letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatch {
    /// Whoever placed the most recent tile on the path
    pub player_hint: Option<Player>,
    pub path: Vec<Position>,
}

impl WordMatch {
    fn on(board: &Board, path: Vec<Position>) -> Self {
        let player_hint = path
            .iter()
            .filter_map(|pos| board.get(*pos))
            .max_by_key(|slot| slot.seq)
            .map(|slot| slot.placed_by);

        Self { player_hint, path }
    }
}

/// Result of one scan of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    Found(WordMatch),
    Draw,
    Continue,
}

/// Look for `word` on the board.
///
/// With `wrap` unset this is the straight-line scan; with it set the
/// toroidal anchor scan.
pub fn find_word(board: &Board, word: &[Letter], directions: &[Direction], wrap: bool) -> Scan {
    if word.is_empty() {
        return Scan::Continue;
    }

    let scan = if wrap {
        toroidal_scan(board, word, directions)
    } else {
        linear_scan(board, word, directions)
    };

    tracing::debug!("Scanned board for word (wrap: {}): {:?}", wrap, scan);
    scan
}

/// Row-major sweep trying the word and its reversal from every cell.
///
/// The draw test rides along with the sweep: after each cursor position
/// that matched nothing, an occupied bottom-right cell ends the sweep as a
/// draw. A word starting further along is then never reached.
fn linear_scan(board: &Board, word: &[Letter], directions: &[Direction]) -> Scan {
    let reversed: Vec<Letter> = word.iter().rev().copied().collect();
    let grid = board.grid();
    let last = grid.last();
    let last_filled = board.get(last).is_some();

    for start in grid.positions() {
        for (letters, is_reversed) in [(word, false), (reversed.as_slice(), true)] {
            for &dir in directions {
                if let Some(mut path) = straight_path(board, start, dir, letters) {
                    if is_reversed {
                        path.reverse();
                    }
                    return Scan::Found(WordMatch::on(board, path));
                }
            }
        }

        if last_filled {
            return Scan::Draw;
        }
    }

    Scan::Continue
}

fn straight_path(
    board: &Board,
    start: Position,
    dir: Direction,
    letters: &[Letter],
) -> Option<Vec<Position>> {
    let grid = board.grid();
    let mut path = Vec::with_capacity(letters.len());

    for (i, &letter) in letters.iter().enumerate() {
        let row = start.row as isize + i as isize * dir.dr;
        let col = start.col as isize + i as isize * dir.dc;
        if !grid.contains_signed(row, col) {
            return None;
        }

        let pos = Position::new(row as usize, col as usize);
        if board.tile_at(pos) != Some(letter) {
            return None;
        }
        path.push(pos);
    }

    Some(path)
}

fn toroidal_scan(board: &Board, word: &[Letter], directions: &[Direction]) -> Scan {
    let grid = board.grid();
    let anchors: Vec<Position> = grid
        .positions()
        .filter(|pos| board.tile_at(*pos) == Some(word[0]))
        .collect();

    for anchor in anchors {
        for &dir in directions {
            let run = if dir.is_diagonal() {
                let run = diagonal_run_length(grid, anchor, dir);
                if run <= 2 {
                    continue;
                }
                Some(run)
            } else {
                None
            };

            if let Some(path) = wrapped_path(board, anchor, dir, run, word) {
                return Scan::Found(WordMatch::on(board, path));
            }
        }
    }

    if board.is_full() {
        Scan::Draw
    } else {
        Scan::Continue
    }
}

/// Number of in-bounds cells from `anchor` to the edge along a diagonal,
/// the anchor included.
pub fn diagonal_run_length(grid: &Grid, anchor: Position, dir: Direction) -> usize {
    let steps = |delta: isize, at: usize, extent: usize| {
        if delta > 0 {
            extent - 1 - at
        } else {
            at
        }
    };

    let row_steps = steps(dir.dr, anchor.row, grid.height());
    let col_steps = steps(dir.dc, anchor.col, grid.width());

    row_steps.min(col_steps) + 1
}

fn wrapped_path(
    board: &Board,
    anchor: Position,
    dir: Direction,
    run: Option<usize>,
    letters: &[Letter],
) -> Option<Vec<Position>> {
    let grid = board.grid();
    let mut path = Vec::with_capacity(letters.len());

    for (i, &letter) in letters.iter().enumerate() {
        let mut row = anchor.row as isize + i as isize * dir.dr;
        let mut col = anchor.col as isize + i as isize * dir.dc;

        // Long diagonals fold back onto themselves before the torus reduction
        if let Some(run) = run {
            if !grid.contains_signed(row, col) {
                row -= run as isize * dir.dr;
                col -= run as isize * dir.dc;
            }
        }

        let pos = grid.wrap(row, col);
        if board.tile_at(pos) != Some(letter) {
            return None;
        }
        path.push(pos);
    }

    Some(path)
}

use crate::{
    game::error::PlacementError,
    models::{Letter, Player, Position, TileId, TileRecord},
};

/// Shape of the board: addressing and bounds, no contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    /// Bounds check for a coordinate that may have stepped off the edge
    pub fn contains_signed(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Row-major index of a cell
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.width + pos.col)
    }

    /// Every cell, row by row, left to right
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
    }

    /// Bottom-right cell, the last one visited in row-major order
    pub fn last(&self) -> Position {
        Position::new(self.height.saturating_sub(1), self.width.saturating_sub(1))
    }

    /// Reduce a coordinate onto the torus
    pub fn wrap(&self, row: isize, col: isize) -> Position {
        Position::new(
            row.rem_euclid(self.height as isize) as usize,
            col.rem_euclid(self.width as isize) as usize,
        )
    }
}

/// What a board cell remembers about the tile resting on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub tile_id: TileId,
    pub letter: Letter,
    pub placed_by: Player,
    /// Placement order on this board, starting at 1
    pub seq: u32,
}

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    // Cells laid out row-major (row * width + col)
    cells: Vec<Option<Slot>>,
    placements: u32,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        let grid = Grid::new(width, height);
        Self {
            grid,
            cells: vec![None; grid.cell_count()],
            placements: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get(&self, pos: Position) -> Option<Slot> {
        self.grid.index(pos).and_then(|idx| self.cells[idx])
    }

    pub fn tile_at(&self, pos: Position) -> Option<Letter> {
        self.get(pos).map(|slot| slot.letter)
    }

    /// Put `tile` on `pos`. Occupied cells are never overwritten and the
    /// tile's `placed` flag is the only thing touched outside the board.
    pub fn place(
        &mut self,
        pos: Position,
        tile: &mut TileRecord,
        player: Player,
    ) -> Result<(), PlacementError> {
        let idx = self.grid.index(pos).ok_or(PlacementError::OutOfBounds)?;

        if self.cells[idx].is_some() {
            return Err(PlacementError::CellOccupied);
        }
        if tile.placed {
            return Err(PlacementError::TileAlreadyPlaced);
        }

        self.placements += 1;
        tile.placed = true;
        self.cells[idx] = Some(Slot {
            tile_id: tile.id,
            letter: tile.letter,
            placed_by: player,
            seq: self.placements,
        });

        Ok(())
    }

    pub fn first_empty_cell(&self) -> Option<Position> {
        self.grid.positions().find(|pos| self.get(*pos).is_none())
    }

    /// Empty every cell. Tile flags belong to the pool and are left alone.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.placements = 0;
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

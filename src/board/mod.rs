//! Board topology: squares, colors, adjacency, pathfinding
//!
//! The board is a hub-and-spokes layout. Rows `0..inner_rows` form the
//! inner circle where lateral movement wraps freely around the whole
//! circumference; the remaining rows belong to radial arms of
//! `arm_width` columns each, and a step with a horizontal component
//! between two arm-row squares is only legal inside a single arm.

pub mod color;
pub mod config;
pub mod pathfinding;
mod square;

pub use color::{Color, ColorSet};
pub use config::BoardConfig;
pub use square::{Coord, Square};

use crate::error::{Result, RondelError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const LINE_OFFSETS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL_OFFSETS: [(i64, i64); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// The game board
///
/// Topology is fixed at construction; only square colors and occupancy
/// mutate afterwards. Squares live in a row-major arena indexed by
/// coordinate, so a square keeps its identity while its color changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    arm_count: u32,
    arm_width: u32,
    inner_rows: u32,
    height: u32,
    circumference: u32,
    squares: Vec<Square>,
}

impl Board {
    pub fn new(config: &BoardConfig) -> Result<Board> {
        if config.arm_count < 2 || config.arm_count % 2 != 0 {
            return Err(RondelError::InvalidConfig(format!(
                "arm count must be even and at least 2, got {}",
                config.arm_count
            )));
        }
        if config.arm_width == 0 {
            return Err(RondelError::InvalidConfig("arm width must be positive".into()));
        }
        if config.inner_circle_rows.is_empty() || config.arm_rows.is_empty() {
            return Err(RondelError::InvalidConfig(
                "need at least one inner-circle row and one arm row".into(),
            ));
        }

        let circumference = config.circumference();
        let mut squares = Vec::with_capacity((circumference * config.height()) as usize);
        let rows = config.inner_circle_rows.iter().chain(config.arm_rows.iter());
        for (y, pattern) in rows.enumerate() {
            if pattern.is_empty() || circumference as usize % pattern.len() != 0 {
                return Err(RondelError::InvalidConfig(format!(
                    "row {} pattern of length {} does not tile a circumference of {}",
                    y,
                    pattern.len(),
                    circumference
                )));
            }
            if pattern.contains(&Color::All) {
                return Err(RondelError::InvalidConfig(format!(
                    "row {} pattern contains the All pseudo-color",
                    y
                )));
            }
            for x in 0..circumference {
                let color = pattern[x as usize % pattern.len()];
                squares.push(Square::new(x, y as u32, color));
            }
        }

        let board = Board {
            arm_count: config.arm_count,
            arm_width: config.arm_width,
            inner_rows: config.inner_circle_rows.len() as u32,
            height: config.height(),
            circumference,
            squares,
        };

        for start in &config.start_squares {
            if board.square_at(*start).is_none() {
                return Err(RondelError::InvalidConfig(format!(
                    "start square {} is not on the board",
                    start
                )));
            }
        }
        Ok(board)
    }

    pub fn circumference(&self) -> u32 {
        self.circumference
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }

    pub fn arm_width(&self) -> u32 {
        self.arm_width
    }

    /// Wrap an x coordinate onto the circumference
    pub fn wrap_x(&self, x: i64) -> u32 {
        x.rem_euclid(self.circumference as i64) as u32
    }

    /// The arm a column belongs to
    pub fn arm_of(&self, x: u32) -> u32 {
        x / self.arm_width
    }

    /// True for rows outside the inner circle
    pub fn is_arm_row(&self, y: u32) -> bool {
        y >= self.inner_rows
    }

    /// Number of inner-circle rows
    pub fn inner_rows(&self) -> u32 {
        self.inner_rows
    }

    /// Look up a square; x wraps, an out-of-range y is a dead end
    pub fn square(&self, x: i64, y: i64) -> Option<&Square> {
        if y < 0 || y >= self.height as i64 {
            return None;
        }
        let x = self.wrap_x(x);
        Some(&self.squares[(y as u32 * self.circumference + x) as usize])
    }

    pub fn square_at(&self, coord: Coord) -> Option<&Square> {
        self.square(coord.x as i64, coord.y as i64)
    }

    /// The square at a caller-supplied coordinate, without wrapping
    ///
    /// Wire input must already be canonical; anything out of range is
    /// a recoverable `InvalidSquare`, never an alias of another
    /// square.
    pub fn canonical_square(&self, coord: Coord) -> Result<&Square> {
        if coord.x >= self.circumference || coord.y >= self.height {
            return Err(RondelError::InvalidSquare {
                x: coord.x,
                y: coord.y,
            });
        }
        Ok(&self.squares[(coord.y * self.circumference + coord.x) as usize])
    }

    /// Dense arena index of a valid coordinate
    pub fn index_of(&self, coord: Coord) -> usize {
        debug_assert!(coord.x < self.circumference && coord.y < self.height);
        (coord.y * self.circumference + coord.x) as usize
    }

    pub fn square_count(&self) -> usize {
        self.squares.len()
    }

    fn square_mut(&mut self, coord: Coord) -> Result<&mut Square> {
        if coord.y >= self.height || coord.x >= self.circumference {
            return Err(RondelError::Internal(format!(
                "no square at {} in a {}x{} board",
                coord, self.circumference, self.height
            )));
        }
        let idx = (coord.y * self.circumference + coord.x) as usize;
        Ok(&mut self.squares[idx])
    }

    /// Move one board hop from `from`, honoring wraparound and the arm
    /// rule; colors and occupancy are not consulted.
    pub fn hop(&self, from: Coord, dx: i64, dy: i64) -> Option<Coord> {
        let to = self.square(from.x as i64 + dx, from.y as i64 + dy)?.coord();
        if dx != 0
            && self.is_arm_row(from.y)
            && self.is_arm_row(to.y)
            && self.arm_of(from.x) != self.arm_of(to.x)
        {
            return None;
        }
        Some(to)
    }

    fn neighbors(
        &self,
        from: Coord,
        offsets: &[(i64, i64); 4],
        colors: &ColorSet,
    ) -> SmallVec<[Coord; 4]> {
        let mut result = SmallVec::new();
        for (dx, dy) in offsets {
            if let Some(to) = self.hop(from, *dx, *dy) {
                let square = &self.squares[(to.y * self.circumference + to.x) as usize];
                if !square.occupied && colors.contains(square.color) {
                    result.push(to);
                }
            }
        }
        result
    }

    /// The up/down/left/right neighbors a pawn may step to, filtered
    /// by the legal color set and occupancy
    pub fn line_neighbors(&self, from: Coord, colors: &ColorSet) -> SmallVec<[Coord; 4]> {
        self.neighbors(from, &LINE_OFFSETS, colors)
    }

    /// The four diagonal neighbors, same filter
    pub fn diagonal_neighbors(&self, from: Coord, colors: &ColorSet) -> SmallVec<[Coord; 4]> {
        self.neighbors(from, &DIAGONAL_OFFSETS, colors)
    }

    /// Every topologically adjacent square, ignoring colors and
    /// occupancy; this is the relation the pathfinder searches
    pub fn adjacent(&self, from: Coord) -> SmallVec<[Coord; 8]> {
        let mut result = SmallVec::new();
        result.extend(self.line_adjacent(from));
        result.extend(self.diagonal_adjacent(from));
        result
    }

    /// Orthogonally adjacent squares, topology only
    pub fn line_adjacent(&self, from: Coord) -> SmallVec<[Coord; 4]> {
        let mut result = SmallVec::new();
        for (dx, dy) in LINE_OFFSETS {
            if let Some(to) = self.hop(from, dx, dy) {
                result.push(to);
            }
        }
        result
    }

    /// Diagonally adjacent squares, topology only
    pub fn diagonal_adjacent(&self, from: Coord) -> SmallVec<[Coord; 4]> {
        let mut result = SmallVec::new();
        for (dx, dy) in DIAGONAL_OFFSETS {
            if let Some(to) = self.hop(from, dx, dy) {
                result.push(to);
            }
        }
        result
    }

    /// Landing squares of an L-shaped jump from `from`: two hops along
    /// one axis then one hop perpendicular, every sub-step resolved on
    /// the board so wraparound and the arm rule apply. Colors and
    /// occupancy are not consulted.
    pub fn knight_jumps(&self, from: Coord) -> SmallVec<[Coord; 8]> {
        let mut result = SmallVec::new();
        for (dx, dy) in LINE_OFFSETS {
            let first = match self.hop(from, dx, dy) {
                Some(c) => c,
                None => continue,
            };
            let second = match self.hop(first, dx, dy) {
                Some(c) => c,
                None => continue,
            };
            let (px, py) = (dy.abs(), dx.abs());
            for sign in [-1, 1] {
                if let Some(landing) = self.hop(second, px * sign, py * sign) {
                    result.push(landing);
                }
            }
        }
        result
    }

    pub fn occupy(&mut self, coord: Coord) -> Result<()> {
        let square = self.square_mut(coord)?;
        if square.occupied {
            return Err(RondelError::Internal(format!(
                "square {} is already occupied",
                coord
            )));
        }
        square.occupied = true;
        Ok(())
    }

    pub fn free(&mut self, coord: Coord) -> Result<()> {
        let square = self.square_mut(coord)?;
        if !square.occupied {
            return Err(RondelError::Internal(format!(
                "square {} is not occupied",
                coord
            )));
        }
        square.occupied = false;
        Ok(())
    }

    pub fn change_color(&mut self, coord: Coord, color: Color) -> Result<()> {
        if color == Color::All {
            return Err(RondelError::Internal(
                "a square cannot be recolored to All".into(),
            ));
        }
        self.square_mut(coord)?.color = color;
        Ok(())
    }

    pub fn reset_color(&mut self, coord: Coord) -> Result<()> {
        let square = self.square_mut(coord)?;
        square.color = square.original_color;
        Ok(())
    }

    /// Squares whose color currently differs from the built one, in
    /// row-major order; this is the diff clients replay
    pub fn updated_squares(&self) -> Vec<&Square> {
        self.squares.iter().filter(|s| s.is_recolored()).collect()
    }

    /// The aim squares of a pawn starting at `start`: the whole last
    /// row of the opposite arm
    pub fn aim_for(&self, start: Coord) -> FxHashSet<Coord> {
        let opposite = (self.arm_of(start.x) + self.arm_count / 2) % self.arm_count;
        let last_row = self.height - 1;
        (opposite * self.arm_width..(opposite + 1) * self.arm_width)
            .map(|x| Coord::new(x, last_row))
            .collect()
    }

    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }
}

//! Board squares and coordinates

use crate::board::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A board coordinate
///
/// `x` runs around the circumference (wraps), `y` runs from the inner
/// circle (0) outward to the arm tips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub y: u32,
    pub x: u32,
}

impl Coord {
    pub fn new(x: u32, y: u32) -> Self {
        Coord { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One square of the board
///
/// Identity is `(x, y, original_color)` and never changes; `color` and
/// `occupied` mutate during play. Squares are addressed through the
/// board's coordinate arena, never by hashing this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub x: u32,
    pub y: u32,
    pub original_color: Color,
    pub color: Color,
    pub occupied: bool,
}

impl Square {
    pub fn new(x: u32, y: u32, color: Color) -> Self {
        Square {
            x,
            y,
            original_color: color,
            color,
            occupied: false,
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// True once a trump changed this square's color
    pub fn is_recolored(&self) -> bool {
        self.color != self.original_color
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}", self.x, self.y, self.color)
    }
}

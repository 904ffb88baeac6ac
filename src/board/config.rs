//! Declarative board descriptions

use crate::board::{Color, Coord};
use serde::{Deserialize, Serialize};

/// Everything needed to build a board
///
/// Row color patterns are listed innermost first and are cycled around
/// the full circumference (`arm_count * arm_width`), which must be a
/// multiple of each pattern length. `start_squares` holds one starting
/// coordinate per seat, in seat order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub arm_count: u32,
    pub arm_width: u32,
    pub inner_circle_rows: Vec<Vec<Color>>,
    pub arm_rows: Vec<Vec<Color>>,
    pub start_squares: Vec<Coord>,
}

/// Stripe palette of the standard boards; square color is
/// `palette[(x + y) % 4]`.
const PALETTE: [Color; 4] = [Color::Blue, Color::Yellow, Color::Black, Color::Red];

fn striped_row(y: usize) -> Vec<Color> {
    (0..PALETTE.len()).map(|x| PALETTE[(x + y) % 4]).collect()
}

impl BoardConfig {
    /// The standard four-arm board: 8 columns per arm, 2 inner-circle
    /// rows, 6 arm rows, two seats facing each pair of opposite arms.
    pub fn standard() -> Self {
        BoardConfig {
            arm_count: 4,
            arm_width: 8,
            inner_circle_rows: (0..2).map(striped_row).collect(),
            arm_rows: (2..8).map(striped_row).collect(),
            start_squares: [(6, 7), (2, 7), (14, 7), (10, 7), (22, 7), (18, 7), (30, 7), (26, 7)]
                .into_iter()
                .map(|(x, y)| Coord::new(x, y))
                .collect(),
        }
    }

    /// An eight-arm variant with the same circumference, one seat per
    /// arm, seats spread so neighbors sit as far apart as possible.
    pub fn eight_arms() -> Self {
        let seat_arms = [0u32, 4, 2, 6, 1, 5, 3, 7];
        BoardConfig {
            arm_count: 8,
            arm_width: 4,
            inner_circle_rows: (0..2).map(striped_row).collect(),
            arm_rows: (2..8).map(striped_row).collect(),
            start_squares: seat_arms
                .into_iter()
                .map(|arm| Coord::new(arm * 4 + 1, 7))
                .collect(),
        }
    }

    pub fn circumference(&self) -> u32 {
        self.arm_count * self.arm_width
    }

    /// Total number of rows, inner circle plus arms
    pub fn height(&self) -> u32 {
        (self.inner_circle_rows.len() + self.arm_rows.len()) as u32
    }

    pub fn arm_length(&self) -> u32 {
        self.arm_rows.len() as u32
    }

    pub fn seat_count(&self) -> usize {
        self.start_squares.len()
    }
}

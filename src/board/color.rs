//! Square and card colors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colors used by squares, cards and trumps
///
/// `All` is an absorbing pseudo-color: inserting it into a `ColorSet`
/// expands to every playable color, and it never appears on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    Blue,
    Red,
    Yellow,
    All,
}

impl Color {
    /// The playable colors, in canonical order
    pub const PLAYABLE: [Color; 4] = [Color::Black, Color::Blue, Color::Red, Color::Yellow];

    fn bit(self) -> Option<u8> {
        match self {
            Color::Black => Some(1 << 0),
            Color::Blue => Some(1 << 1),
            Color::Red => Some(1 << 2),
            Color::Yellow => Some(1 << 3),
            Color::All => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::Blue => write!(f, "Blue"),
            Color::Red => write!(f, "Red"),
            Color::Yellow => write!(f, "Yellow"),
            Color::All => write!(f, "All"),
        }
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::Black),
            "blue" => Ok(Color::Blue),
            "red" => Ok(Color::Red),
            "yellow" => Ok(Color::Yellow),
            "all" => Ok(Color::All),
            _ => Err(format!("unknown color: {}", s)),
        }
    }
}

/// A small set of playable colors
///
/// Backed by a 4-bit mask. `Color::All` expands on insert and remove;
/// it is never stored as a member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSet(u8);

const ALL_BITS: u8 = 0b1111;

impl ColorSet {
    pub fn empty() -> Self {
        ColorSet(0)
    }

    /// The set of every playable color
    pub fn all() -> Self {
        ColorSet(ALL_BITS)
    }

    pub fn insert(&mut self, color: Color) {
        match color.bit() {
            Some(bit) => self.0 |= bit,
            None => self.0 = ALL_BITS,
        }
    }

    pub fn remove(&mut self, color: Color) {
        match color.bit() {
            Some(bit) => self.0 &= !bit,
            None => self.0 = 0,
        }
    }

    /// Membership test; `contains(All)` asks whether every playable
    /// color is present.
    pub fn contains(&self, color: Color) -> bool {
        match color.bit() {
            Some(bit) => self.0 & bit != 0,
            None => self.0 == ALL_BITS,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        let mask = self.0;
        Color::PLAYABLE
            .into_iter()
            .filter(move |c| c.bit().is_some_and(|bit| mask & bit != 0))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        let mut set = ColorSet::empty();
        for color in iter {
            set.insert(color);
        }
        set
    }
}

impl Extend<Color> for ColorSet {
    fn extend<T: IntoIterator<Item = Color>>(&mut self, iter: T) {
        for color in iter {
            self.insert(color);
        }
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, color) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", color)?;
        }
        write!(f, "}}")
    }
}

//! Movement cards and reachable-square generation

use crate::board::{Board, Color, ColorSet, Coord};
use crate::trumps::SpecialActionSpec;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// The three ways a card can move a pawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    Line,
    Diagonal,
    Knight,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::Line => write!(f, "line"),
            MovementKind::Diagonal => write!(f, "diagonal"),
            MovementKind::Knight => write!(f, "knight"),
        }
    }
}

/// A movement card
///
/// `colors` and `steps` are the live values trump effects edit;
/// `default_colors` and `default_steps` are the printed ones restored
/// by `revert_to_default` at turn boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,

    /// The color this card belongs to in its deck
    pub color: Color,

    pub default_colors: ColorSet,
    pub colors: ColorSet,

    pub default_steps: u32,
    pub steps: u32,

    /// Weight used for AI tie-breaking and discard choices
    pub cost: u32,

    pub movements: SmallVec<[MovementKind; 3]>,

    /// Special actions unlocked by playing this card
    pub special_actions: Vec<SpecialActionSpec>,

    /// Extra actions granted by trump effects; wiped whenever the
    /// card reverts to default
    pub granted_actions: Vec<SpecialActionSpec>,
}

impl Card {
    pub fn new(
        name: impl Into<String>,
        color: Color,
        colors: ColorSet,
        steps: u32,
        cost: u32,
        movements: impl IntoIterator<Item = MovementKind>,
    ) -> Self {
        Card {
            name: name.into(),
            color,
            default_colors: colors,
            colors,
            default_steps: steps,
            steps,
            cost,
            movements: movements.into_iter().collect(),
            special_actions: Vec::new(),
            granted_actions: Vec::new(),
        }
    }

    pub fn with_special_actions(mut self, actions: Vec<SpecialActionSpec>) -> Self {
        self.special_actions = actions;
        self
    }

    /// Restore the printed colors, step count and action list
    pub fn revert_to_default(&mut self) {
        self.colors = self.default_colors;
        self.steps = self.default_steps;
        self.granted_actions.clear();
    }

    /// Printed and effect-granted special actions together
    pub fn all_special_actions(&self) -> impl Iterator<Item = &SpecialActionSpec> {
        self.special_actions.iter().chain(self.granted_actions.iter())
    }

    pub fn is_knight(&self) -> bool {
        self.movements.contains(&MovementKind::Knight)
    }

    fn landable(&self, board: &Board, coord: Coord) -> bool {
        board
            .square_at(coord)
            .is_some_and(|square| !square.occupied && self.colors.contains(square.color))
    }

    /// Every square this card can move a pawn to from `origin`
    ///
    /// Breadth expansion over `steps` levels; each level applies every
    /// movement kind from every square newly reached in the previous
    /// level and the results of all levels are unioned. Line and
    /// diagonal steps pass only through unoccupied squares of a legal
    /// color. Knight jumps resolve their sub-steps on the board (so
    /// wraparound and the arm rule hold) but ignore the color and
    /// occupancy of everything except the landing square. The origin
    /// is never part of the result.
    pub fn reachable_squares(&self, board: &Board, origin: Coord) -> FxHashSet<Coord> {
        let mut reached: FxHashSet<Coord> = FxHashSet::default();
        let mut frontier: Vec<Coord> = vec![origin];

        for _ in 0..self.steps {
            let mut next_frontier: Vec<Coord> = Vec::new();
            for &from in &frontier {
                for kind in &self.movements {
                    let candidates: SmallVec<[Coord; 8]> = match kind {
                        MovementKind::Line => {
                            board.line_neighbors(from, &self.colors).into_iter().collect()
                        }
                        MovementKind::Diagonal => board
                            .diagonal_neighbors(from, &self.colors)
                            .into_iter()
                            .collect(),
                        MovementKind::Knight => board
                            .knight_jumps(from)
                            .into_iter()
                            .filter(|&landing| self.landable(board, landing))
                            .collect(),
                    };
                    for to in candidates {
                        if to != origin && reached.insert(to) {
                            next_frontier.push(to);
                        }
                    }
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }
        reached
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardConfig;

    fn standard_board() -> Board {
        Board::new(&BoardConfig::standard()).unwrap()
    }

    fn blue_only() -> ColorSet {
        [Color::Blue].into_iter().collect()
    }

    #[test]
    fn test_blue_line_card_from_the_start_square() {
        let board = standard_board();
        let card = Card::new("Warrior", Color::Blue, blue_only(), 1, 100, [MovementKind::Line]);

        let mut reached: Vec<Coord> = card
            .reachable_squares(&board, Coord::new(6, 7))
            .into_iter()
            .collect();
        reached.sort();
        assert_eq!(reached, vec![Coord::new(6, 6), Coord::new(5, 7)]);
    }

    #[test]
    fn test_occupied_squares_are_excluded() {
        let mut board = standard_board();
        board.occupy(Coord::new(5, 7)).unwrap();
        let card = Card::new("Warrior", Color::Blue, blue_only(), 1, 100, [MovementKind::Line]);

        let reached = card.reachable_squares(&board, Coord::new(6, 7));
        assert_eq!(reached.len(), 1);
        assert!(reached.contains(&Coord::new(6, 6)));
    }

    #[test]
    fn test_origin_is_never_reachable() {
        let board = standard_board();
        let card = Card::new(
            "Queen",
            Color::Blue,
            ColorSet::all(),
            3,
            300,
            [MovementKind::Line, MovementKind::Diagonal],
        );

        let reached = card.reachable_squares(&board, Coord::new(6, 7));
        assert!(!reached.contains(&Coord::new(6, 7)));
        assert!(reached
            .iter()
            .all(|c| !board.square_at(*c).unwrap().occupied));
    }

    #[test]
    fn test_reach_grows_with_steps() {
        let board = standard_board();
        let origin = Coord::new(6, 7);
        let mut previous = 0;

        for steps in 1..=5 {
            let card = Card::new(
                "Queen",
                Color::Blue,
                ColorSet::all(),
                steps,
                300,
                [MovementKind::Line, MovementKind::Diagonal],
            );
            let count = card.reachable_squares(&board, origin).len();
            assert!(count >= previous, "steps {} shrank the reach", steps);
            previous = count;
        }
    }

    #[test]
    fn test_knight_filters_only_the_landing_square() {
        let board = standard_board();
        let card = Card::new("Knight", Color::Blue, blue_only(), 1, 200, [MovementKind::Knight]);

        // (5,5) and (4,6) are black, (7,5) is blue; the black squares
        // the jump passes over do not matter.
        let reached = card.reachable_squares(&board, Coord::new(6, 7));
        assert_eq!(reached.len(), 1);
        assert!(reached.contains(&Coord::new(7, 5)));
    }

    #[test]
    fn test_knight_jumps_over_occupied_squares() {
        let mut board = standard_board();
        board.occupy(Coord::new(6, 6)).unwrap();
        board.occupy(Coord::new(6, 5)).unwrap();
        let card = Card::new("Knight", Color::Blue, blue_only(), 1, 200, [MovementKind::Knight]);

        let reached = card.reachable_squares(&board, Coord::new(6, 7));
        assert!(reached.contains(&Coord::new(7, 5)));

        board.occupy(Coord::new(7, 5)).unwrap();
        let reached = card.reachable_squares(&board, Coord::new(6, 7));
        assert!(reached.is_empty());
    }

    #[test]
    fn test_empty_color_set_reaches_nothing() {
        let board = standard_board();
        let mut card = Card::new(
            "Queen",
            Color::Blue,
            ColorSet::all(),
            2,
            300,
            [MovementKind::Line, MovementKind::Diagonal, MovementKind::Knight],
        );
        card.colors = ColorSet::empty();

        assert!(card.reachable_squares(&board, Coord::new(6, 7)).is_empty());

        card.revert_to_default();
        assert!(!card.reachable_squares(&board, Coord::new(6, 7)).is_empty());
    }
}

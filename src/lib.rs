//! Rondel - rules engine for a radial-board dueling game
//!
//! Pawns race from the rim of one arm to the rim of the opposite one
//! across a hub-and-spokes board, spending movement cards and trumps.
//! The crate owns the full rules: boards, decks, trumps, hero powers,
//! the turn machine and a greedy controller for AI seats.

pub mod board;
pub mod cards;
pub mod config;
pub mod error;
pub mod game;
pub mod trumps;

pub use error::{Result, RondelError};
pub use game::{Game, PlayOutcome};

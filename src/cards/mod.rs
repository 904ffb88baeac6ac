//! Movement cards and per-player decks

pub mod card;
pub mod deck;

pub use card::{Card, MovementKind};
pub use deck::Deck;

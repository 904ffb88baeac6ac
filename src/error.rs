//! Error types for Rondel

use thiserror::Error;

use crate::board::Color;

#[derive(Error, Debug)]
pub enum RondelError {
    #[error("it is not this player's turn")]
    NotYourTurn,

    #[error("the game is over")]
    GameOver,

    #[error("card not in hand: {name} ({color})")]
    CardNotInHand { name: String, color: Color },

    #[error("trump not available: {name}")]
    TrumpNotFound { name: String },

    #[error("square ({x}, {y}) is out of reach")]
    SquareOutOfReach { x: u32, y: u32 },

    #[error("no square at ({x}, {y})")]
    InvalidSquare { x: u32, y: u32 },

    #[error("this trump must target a player")]
    MissingTargetPlayer,

    #[error("no player at seat {index}")]
    InvalidTargetPlayer { index: usize },

    #[error("missing or invalid context field: {field}")]
    MissingContext { field: &'static str },

    #[error("invalid board configuration: {0}")]
    InvalidConfig(String),

    #[error("no special action named {name} is pending")]
    SpecialActionNotPending { name: String },

    #[error("special action {name} must be played or cancelled first")]
    SpecialActionPending { name: String },

    #[error("gauge too low: cost {cost}, gauge {gauge}")]
    GaugeTooLow { cost: u32, gauge: u32 },

    #[error("no moves left this turn (budget {max})")]
    MaxNumberMovesPlayed { max: u32 },

    #[error("already played the maximum of {max} trump(s) this turn")]
    MaxNumberTrumpsPlayed { max: u32 },

    #[error("target already affected by the maximum of {max} trumps")]
    MaxNumberAffectingTrumps { max: u32 },

    #[error("trump {name} has no effect on this target")]
    TrumpHasNoEffect { name: String },

    #[error("internal invariant broken: {0}")]
    Internal(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RondelError {
    /// Fatal errors mean the game state itself is corrupt; everything
    /// else is a rejected request and the state is untouched.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RondelError::Internal(_) | RondelError::Serialization(_) | RondelError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RondelError>;

//! Game state, turn structure, and the operations players invoke

pub mod actions;
pub mod ai;
pub mod log;
pub mod player;
pub mod state;
pub mod view;

use crate::cards::MovementKind;

pub use actions::PlayOutcome;
pub use ai::AiMove;
pub use log::{ActionLog, ActionRecord, GameLogger, OutputMode, VerbosityLevel};
pub use player::{ConnectionState, Gauge, Player, SeatConfig};
pub use state::Game;
pub use view::{GameView, PlayerView};

/// Movement kinds a pawn can always fall back on, used to price a
/// move for the gauge and to measure progress toward the aim row.
pub(crate) const WALK: [MovementKind; 2] = [MovementKind::Line, MovementKind::Diagonal];

//! Trumps, powers and special actions: timed modifiers played
//! against players and the board

pub mod effect;
pub mod power;
pub mod spec;

pub use effect::{Effect, PlayContext};
pub use power::{Power, PowerSpec, PowerState};
pub use spec::{SpecialActionKind, SpecialActionSpec, TrumpKind, TrumpSpec};

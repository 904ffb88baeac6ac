//! Hero powers and the power-theft state machine

use crate::trumps::spec::TrumpSpec;
use serde::{Deserialize, Serialize};

/// A hero-bound power: a trump that is never discarded
///
/// Passive powers re-apply automatically at every turn start of their
/// owner and their `prevents` list shields the owner permanently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerSpec {
    pub trump: TrumpSpec,
    pub passive: bool,
}

impl PowerSpec {
    pub fn new(trump: TrumpSpec, passive: bool) -> Self {
        PowerSpec { trump, passive }
    }
}

/// Whether a power is currently its own or wearing a stolen one
///
/// Impersonation is an explicit state, not an in-place overwrite, so
/// reverting is a plain transition back to `Own`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    Own,
    Impersonating {
        stolen: TrumpSpec,
        passive: bool,
        /// Stealth turns left; the owner's turn teardown counts down
        remaining: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    pub spec: PowerSpec,
    pub state: PowerState,
}

impl Power {
    pub fn new(spec: PowerSpec) -> Self {
        Power {
            spec,
            state: PowerState::Own,
        }
    }

    /// The spec this power currently presents: its own, or the stolen
    /// one while impersonating
    pub fn current_spec(&self) -> &TrumpSpec {
        match &self.state {
            PowerState::Own => &self.spec.trump,
            PowerState::Impersonating { stolen, .. } => stolen,
        }
    }

    pub fn is_passive(&self) -> bool {
        match &self.state {
            PowerState::Own => self.spec.passive,
            PowerState::Impersonating { passive, .. } => *passive,
        }
    }

    /// What activating this power costs right now; a stolen power is
    /// free for the stealth window
    pub fn effective_cost(&self) -> u32 {
        match &self.state {
            PowerState::Own => self.spec.trump.cost,
            PowerState::Impersonating { .. } => 0,
        }
    }

    pub fn is_impersonating(&self) -> bool {
        matches!(self.state, PowerState::Impersonating { .. })
    }

    pub fn stealth_remaining(&self) -> Option<u32> {
        match &self.state {
            PowerState::Own => None,
            PowerState::Impersonating { remaining, .. } => Some(*remaining),
        }
    }

    /// Snapshot the victim's currently presented power and wear it
    pub fn steal_from(&mut self, victim: &Power, stealth_duration: u32) {
        self.state = PowerState::Impersonating {
            stolen: victim.current_spec().clone(),
            passive: victim.is_passive(),
            remaining: stealth_duration,
        };
    }

    /// Owner's turn-teardown hook; returns true when the stealth
    /// window lapsed and the power reverted to its own spec
    pub fn turn_teardown(&mut self) -> bool {
        if let PowerState::Impersonating { remaining, .. } = &mut self.state {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.state = PowerState::Own;
                return true;
            }
        }
        false
    }
}

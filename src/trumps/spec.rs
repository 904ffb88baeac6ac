//! Immutable trump and special-action descriptors
//!
//! Behavior is a closed tagged union dispatched by pattern match; the
//! full roster lives in static configuration tables, never in a
//! name-to-type registry.

use crate::board::{Color, ColorSet};
use crate::cards::MovementKind;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What a trump does when it takes effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrumpKind {
    /// Shift the target's per-turn move budget, clamped at zero
    ModifyNumberMoves { delta: i32 },

    /// Remove colors from the matching cards' legal sets; an empty
    /// name filter matches every card
    RemoveColors { colors: ColorSet, card_names: Vec<String> },

    /// Add colors to the matching cards' legal sets
    AddColors { colors: ColorSet, card_names: Vec<String> },

    /// Recolor one board square; the play context carries the
    /// coordinates and the new color, the expiry restores the square
    ChangeSquare,

    /// Grant extra special actions to the matching cards
    AddSpecialActions {
        card_names: Vec<String>,
        actions: Vec<SpecialActionSpec>,
    },

    /// Shift the remaining duration of the target's active effects
    /// whose trump name is listed; fails when nothing matches
    ModifyTrumpDurations { trump_names: Vec<String>, delta: i32 },

    /// Shift the owner's trump costs while active (powers only)
    ModifyTrumpCosts { delta: i32 },

    /// Capture the target's power for a stealth window (powers only)
    StealPower { stealth_duration: u32 },

    /// No behavior of its own; the protection lives in `prevents`
    CannotBeAffected,
}

/// An immutable trump description
///
/// `prevents` names the trumps and special actions this one blocks
/// while it affects a player (or is their passive power).
/// `overrides` names the blockers it may punch through; that standoff
/// resolves by a uniform random draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrumpSpec {
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub duration: u32,
    pub must_target_player: bool,
    pub colors: ColorSet,
    pub kind: TrumpKind,
    pub prevents: Vec<String>,
    pub overrides: Vec<String>,
}

impl TrumpSpec {
    pub fn new(name: impl Into<String>, cost: u32, duration: u32, kind: TrumpKind) -> Self {
        TrumpSpec {
            name: name.into(),
            description: String::new(),
            cost,
            duration,
            must_target_player: false,
            colors: ColorSet::empty(),
            kind,
            prevents: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    pub fn targeting_player(mut self) -> Self {
        self.must_target_player = true;
        self
    }

    pub fn preventing(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.prevents = names.into_iter().map(String::from).collect();
        self
    }

    pub fn overriding(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.overrides = names.into_iter().map(String::from).collect();
        self
    }
}

/// What a special action does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialActionKind {
    /// Move the target's pawn to any unoccupied square within
    /// `distance` board hops, regardless of square colors
    Teleport {
        distance: u32,
        movements: SmallVec<[MovementKind; 2]>,
    },
}

/// A special action unlocked by playing a movement card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialActionSpec {
    pub name: String,
    pub description: String,
    pub color: Color,
    pub kind: SpecialActionKind,
}

impl SpecialActionSpec {
    pub fn new(name: impl Into<String>, color: Color, kind: SpecialActionKind) -> Self {
        SpecialActionSpec {
            name: name.into(),
            description: String::new(),
            color,
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Whether a card-name filter matches; an empty filter matches all
pub fn name_filter_matches(filter: &[String], name: &str) -> bool {
    filter.is_empty() || filter.iter().any(|n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let spec = TrumpSpec::new(
            "Blizzard",
            6,
            1,
            TrumpKind::ModifyNumberMoves { delta: -1 },
        )
        .with_description("The target loses one move next turn")
        .with_colors([Color::Blue])
        .targeting_player();

        assert_eq!(spec.name, "Blizzard");
        assert_eq!(spec.cost, 6);
        assert!(spec.must_target_player);
        assert!(spec.colors.contains(Color::Blue));
        assert!(spec.prevents.is_empty());
    }

    #[test]
    fn test_empty_name_filter_matches_everything() {
        assert!(name_filter_matches(&[], "Warrior"));

        let filter = vec!["Queen".to_string(), "King".to_string()];
        assert!(name_filter_matches(&filter, "King"));
        assert!(!name_filter_matches(&filter, "Warrior"));
    }
}

//! Live effects and their application
//!
//! An `Effect` is the decrementing instance a trump leaves on its
//! target. Application is a free-function dispatch over `TrumpKind`;
//! eligibility is checked first so a rejected play never mutates
//! anything.

use crate::board::{Board, Color, Coord};
use crate::error::{Result, RondelError};
use crate::game::player::Player;
use crate::trumps::spec::{name_filter_matches, TrumpKind, TrumpSpec};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Caller-supplied context for plays that need coordinates or a color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayContext {
    pub square: Option<Coord>,
    pub color: Option<Color>,
}

impl PlayContext {
    pub fn for_square(coord: Coord) -> Self {
        PlayContext {
            square: Some(coord),
            color: None,
        }
    }

    pub fn for_square_color(coord: Coord, color: Color) -> Self {
        PlayContext {
            square: Some(coord),
            color: Some(color),
        }
    }
}

/// A trump in effect against a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub spec: TrumpSpec,
    pub initiator: usize,
    pub target: usize,
    pub context: PlayContext,
    /// Turns left; decremented at each of the target's turn ends
    pub remaining: i32,
}

impl Effect {
    pub fn new(spec: TrumpSpec, initiator: usize, target: usize, context: PlayContext) -> Self {
        let remaining = spec.duration as i32;
        Effect {
            spec,
            initiator,
            target,
            context,
            remaining,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0
    }
}

/// One-shot kinds mutate once when played and are not re-applied at
/// the target's turn starts
pub fn is_one_shot(kind: &TrumpKind) -> bool {
    matches!(
        kind,
        TrumpKind::ChangeSquare | TrumpKind::ModifyTrumpDurations { .. }
    )
}

/// Validate a play without mutating anything
pub fn check_eligibility(
    spec: &TrumpSpec,
    context: &PlayContext,
    target: &Player,
    board: &Board,
) -> Result<()> {
    match &spec.kind {
        TrumpKind::ChangeSquare => {
            let coord = context
                .square
                .ok_or(RondelError::MissingContext { field: "square" })?;
            board.canonical_square(coord)?;
            match context.color {
                Some(color) if color != Color::All => Ok(()),
                _ => Err(RondelError::MissingContext { field: "color" }),
            }
        }
        TrumpKind::ModifyTrumpDurations { trump_names, .. } => {
            let eligible = target
                .effects
                .iter()
                .any(|e| name_filter_matches(trump_names, &e.spec.name));
            if eligible {
                Ok(())
            } else {
                Err(RondelError::TrumpHasNoEffect {
                    name: spec.name.clone(),
                })
            }
        }
        _ => Ok(()),
    }
}

/// Apply a kind's mutation to its target
///
/// `StealPower` never reaches this function; the power machinery in
/// the game actions resolves it.
pub fn apply(
    kind: &TrumpKind,
    context: &PlayContext,
    target: &mut Player,
    board: &mut Board,
) -> Result<()> {
    match kind {
        TrumpKind::ModifyNumberMoves { delta } => {
            target.adjust_moves_allowed(*delta);
            Ok(())
        }
        TrumpKind::RemoveColors { colors, card_names } => {
            for card in target.deck.cards_mut() {
                if name_filter_matches(card_names, &card.name) {
                    for color in colors.iter() {
                        card.colors.remove(color);
                    }
                }
            }
            Ok(())
        }
        TrumpKind::AddColors { colors, card_names } => {
            for card in target.deck.cards_mut() {
                if name_filter_matches(card_names, &card.name) {
                    card.colors.extend(colors.iter());
                }
            }
            Ok(())
        }
        TrumpKind::ChangeSquare => {
            let coord = context
                .square
                .ok_or(RondelError::MissingContext { field: "square" })?;
            let color = context
                .color
                .ok_or(RondelError::MissingContext { field: "color" })?;
            board.change_color(coord, color)
        }
        TrumpKind::AddSpecialActions {
            card_names,
            actions,
        } => {
            for card in target.deck.cards_mut() {
                if !name_filter_matches(card_names, &card.name) {
                    continue;
                }
                for action in actions {
                    let held = card
                        .special_actions
                        .iter()
                        .chain(card.granted_actions.iter())
                        .any(|a| a.name == action.name);
                    if !held {
                        card.granted_actions.push(action.clone());
                    }
                }
            }
            Ok(())
        }
        TrumpKind::ModifyTrumpDurations { trump_names, delta } => {
            for effect in &mut target.effects {
                if name_filter_matches(trump_names, &effect.spec.name) {
                    effect.remaining += delta;
                }
            }
            Ok(())
        }
        // Cost shifts are read straight off the live power state.
        TrumpKind::ModifyTrumpCosts { .. } => Ok(()),
        TrumpKind::CannotBeAffected => Ok(()),
        TrumpKind::StealPower { .. } => Err(RondelError::Internal(
            "steal power cannot be applied as a plain effect".into(),
        )),
    }
}

/// Undo whatever must not outlive an expired effect
///
/// `survivors` is every effect still running anywhere in the game;
/// a square another recolor still covers falls back to that effect's
/// color, not its original one.
pub fn expire<'a>(
    effect: &Effect,
    survivors: impl IntoIterator<Item = &'a Effect>,
    board: &mut Board,
) -> Result<()> {
    match &effect.spec.kind {
        TrumpKind::ChangeSquare => {
            let coord = effect
                .context
                .square
                .ok_or_else(|| RondelError::Internal("square recolor without a square".into()))?;
            let covering = survivors.into_iter().find_map(|other| match &other.spec.kind {
                TrumpKind::ChangeSquare if other.context.square == Some(coord) => {
                    other.context.color
                }
                _ => None,
            });
            match covering {
                Some(color) => board.change_color(coord, color),
                None => board.reset_color(coord),
            }
        }
        _ => Ok(()),
    }
}

/// Whether `target`'s active effects or passive power block a play
///
/// A blocker the incoming trump overrides wins the standoff half the
/// time, drawn from the game RNG.
pub fn is_blocked(
    incoming: &str,
    overrides: &[String],
    target: &Player,
    rng: &mut impl Rng,
) -> bool {
    let effect_specs = target.effects.iter().map(|e| &e.spec);
    let passive_power = target
        .power
        .is_passive()
        .then(|| target.power.current_spec());

    for blocker in effect_specs.chain(passive_power) {
        if blocker.prevents.iter().any(|n| n == incoming) {
            let overridable = overrides.iter().any(|n| n == &blocker.name);
            if !overridable || rng.gen_bool(0.5) {
                return true;
            }
        }
    }
    false
}

/// All special-action names a teleport-style play must check against
pub fn is_special_action_blocked(
    incoming: &str,
    target: &Player,
    rng: &mut impl Rng,
) -> bool {
    is_blocked(incoming, &[], target, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_classification() {
        assert!(is_one_shot(&TrumpKind::ChangeSquare));
        assert!(is_one_shot(&TrumpKind::ModifyTrumpDurations {
            trump_names: Vec::new(),
            delta: -1,
        }));
        assert!(!is_one_shot(&TrumpKind::ModifyNumberMoves { delta: 1 }));
        assert!(!is_one_shot(&TrumpKind::RemoveColors {
            colors: crate::board::ColorSet::all(),
            card_names: Vec::new(),
        }));
    }

    #[test]
    fn test_effect_duration_from_spec() {
        let spec = TrumpSpec::new("Blizzard", 6, 1, TrumpKind::ModifyNumberMoves { delta: -1 });
        let effect = Effect::new(spec, 0, 1, PlayContext::default());

        assert_eq!(effect.remaining, 1);
        assert!(!effect.is_expired());
    }
}

//! Player-facing operations on a running game
//!
//! Every operation validates first and mutates only once nothing can
//! fail, so a rejected request leaves the game untouched. Public
//! entry points resolve any AI turns that follow before returning, so
//! a transport always gets the game back waiting on a human or over.

use crate::board::pathfinding::distance;
use crate::board::{Color, Coord};
use crate::error::{Result, RondelError};
use crate::game::ai::{self, AiMove};
use crate::game::log::{log_if_verbose, ActionRecord};
use crate::game::state::{seat, seat_mut, Game};
use crate::game::WALK;
use crate::trumps::{effect, Effect, PlayContext, SpecialActionKind, SpecialActionSpec, TrumpKind};
use serde::{Deserialize, Serialize};

/// Where a successful operation left the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    /// Seat the game is now waiting on
    pub player: usize,
    pub turn_number: u32,
    pub moves_remaining: u32,
    /// Special actions still queued for that seat
    pub pending_actions: Vec<String>,
    pub game_over: bool,
}

impl Game {
    fn outcome(&self) -> PlayOutcome {
        let (moves_remaining, pending_actions) = match self.player(self.current) {
            Some(player) => (
                player.moves_remaining(),
                player
                    .pending_actions
                    .iter()
                    .map(|action| action.name.clone())
                    .collect(),
            ),
            None => (0, Vec::new()),
        };
        PlayOutcome {
            player: self.current,
            turn_number: self.turn_number,
            moves_remaining,
            pending_actions,
            game_over: self.over,
        }
    }

    fn ensure_actor(&self, player: usize) -> Result<()> {
        if self.over {
            return Err(RondelError::GameOver);
        }
        if player != self.current {
            return Err(RondelError::NotYourTurn);
        }
        Ok(())
    }

    fn ensure_no_pending(&self, player: usize) -> Result<()> {
        if let Some(action) = self.seat_ref(player)?.pending_actions.first() {
            return Err(RondelError::SpecialActionPending {
                name: action.name.clone(),
            });
        }
        Ok(())
    }

    /// A turn completes on its own once the budget is spent and no
    /// special action is waiting.
    fn maybe_complete_turn(&mut self) -> Result<()> {
        let seat = self.seat_ref(self.current)?;
        if seat.moves_remaining() == 0 && !seat.has_pending_actions() {
            self.finish_turn()?;
        }
        Ok(())
    }

    /// Every square `name`/`color` could land on from the player's
    /// position, sorted row-major for stable output
    pub fn view_possible_squares(
        &self,
        player: usize,
        name: &str,
        color: Color,
    ) -> Result<Vec<Coord>> {
        if self.over {
            return Err(RondelError::GameOver);
        }
        let seat = self.seat_ref(player)?;
        let card = seat
            .deck
            .find_in_hand(name, color)
            .ok_or_else(|| RondelError::CardNotInHand {
                name: name.to_string(),
                color,
            })?;
        let mut squares: Vec<Coord> = card
            .reachable_squares(&self.board, seat.position)
            .into_iter()
            .collect();
        squares.sort_unstable();
        Ok(squares)
    }

    /// Move the pawn by playing a hand card onto `destination`
    ///
    /// A regular move earns gauge worth the walking distance covered;
    /// a knight jump earns the flat knight increment instead.
    pub fn play_card(
        &mut self,
        player: usize,
        name: &str,
        color: Color,
        destination: Coord,
    ) -> Result<PlayOutcome> {
        self.play_card_inner(player, name, color, destination)?;
        self.resolve_ai_turns()?;
        Ok(self.outcome())
    }

    pub(crate) fn play_card_inner(
        &mut self,
        player: usize,
        name: &str,
        color: Color,
        destination: Coord,
    ) -> Result<()> {
        self.ensure_actor(player)?;
        self.ensure_no_pending(player)?;
        let seat = self.seat_ref(player)?;
        if seat.moves_remaining() == 0 {
            return Err(RondelError::MaxNumberMovesPlayed {
                max: seat.moves_allowed,
            });
        }
        let card = seat
            .deck
            .find_in_hand(name, color)
            .ok_or_else(|| RondelError::CardNotInHand {
                name: name.to_string(),
                color,
            })?;
        let origin = seat.position;
        if !card
            .reachable_squares(&self.board, origin)
            .contains(&destination)
        {
            return Err(RondelError::SquareOutOfReach {
                x: destination.x,
                y: destination.y,
            });
        }
        let granted: Vec<SpecialActionSpec> = card.all_special_actions().cloned().collect();
        let earned = if card.is_knight() {
            self.config.knight_gauge_increment
        } else {
            distance(&self.board, origin, destination, &WALK).ok_or_else(|| {
                RondelError::Internal("no walking route between two reachable squares".into())
            })?
        };

        self.board.free(origin)?;
        self.board.occupy(destination)?;
        let seat = seat_mut(&mut self.players, player)?;
        seat.position = destination;
        seat.deck.play(name, color)?;
        seat.moves_played += 1;
        seat.gauge.earn(earned);
        seat.queue_actions(granted);

        self.actions.record(ActionRecord::CardPlayed {
            player,
            name: name.to_string(),
            color,
            from: origin,
            to: destination,
        });
        log_if_verbose!(
            self.logger,
            "seat {} plays {} {} to ({}, {})",
            player,
            color,
            name,
            destination.x,
            destination.y
        );
        self.maybe_complete_turn()
    }

    /// Spend a move to send a hand card to the graveyard unplayed
    pub fn discard(&mut self, player: usize, name: &str, color: Color) -> Result<PlayOutcome> {
        self.discard_inner(player, name, color)?;
        self.resolve_ai_turns()?;
        Ok(self.outcome())
    }

    pub(crate) fn discard_inner(&mut self, player: usize, name: &str, color: Color) -> Result<()> {
        self.ensure_actor(player)?;
        self.ensure_no_pending(player)?;
        let seat = self.seat_ref(player)?;
        if seat.moves_remaining() == 0 {
            return Err(RondelError::MaxNumberMovesPlayed {
                max: seat.moves_allowed,
            });
        }
        if seat.deck.find_in_hand(name, color).is_none() {
            return Err(RondelError::CardNotInHand {
                name: name.to_string(),
                color,
            });
        }
        let seat = seat_mut(&mut self.players, player)?;
        seat.deck.play(name, color)?;
        seat.moves_played += 1;

        self.actions.record(ActionRecord::CardDiscarded {
            player,
            name: name.to_string(),
            color,
        });
        log_if_verbose!(self.logger, "seat {} discards {} {}", player, color, name);
        self.maybe_complete_turn()
    }

    /// Give up the rest of the turn
    pub fn pass_turn(&mut self, player: usize) -> Result<PlayOutcome> {
        self.pass_turn_inner(player)?;
        self.resolve_ai_turns()?;
        Ok(self.outcome())
    }

    pub(crate) fn pass_turn_inner(&mut self, player: usize) -> Result<()> {
        self.ensure_actor(player)?;
        self.ensure_no_pending(player)?;
        self.actions.record(ActionRecord::TurnPassed { player });
        log_if_verbose!(self.logger, "seat {} passes", player);
        self.finish_turn()
    }

    /// Play a trump or activate the hero power
    ///
    /// `name` resolves against the player's trumps first, then the
    /// power. Failure order is fixed: unknown name, target
    /// resolution, gauge, per-turn cap, per-target cap, immunity,
    /// then kind eligibility.
    pub fn play_trump(
        &mut self,
        player: usize,
        name: &str,
        target: Option<usize>,
        context: PlayContext,
    ) -> Result<PlayOutcome> {
        self.play_trump_inner(player, name, target, context)?;
        self.resolve_ai_turns()?;
        Ok(self.outcome())
    }

    pub(crate) fn play_trump_inner(
        &mut self,
        player: usize,
        name: &str,
        target: Option<usize>,
        context: PlayContext,
    ) -> Result<()> {
        self.ensure_actor(player)?;
        self.ensure_no_pending(player)?;

        let actor = self.seat_ref(player)?;
        let (spec, cost) = match actor.find_trump(name) {
            Some(found) => (found.clone(), actor.effective_trump_cost(found.cost)),
            None if actor.power.current_spec().name == name => {
                if actor.power.is_passive() {
                    // Passive powers are always on; there is nothing
                    // to activate.
                    return Err(RondelError::TrumpHasNoEffect {
                        name: name.to_string(),
                    });
                }
                (
                    actor.power.current_spec().clone(),
                    actor.power.effective_cost(),
                )
            }
            None => {
                return Err(RondelError::TrumpNotFound {
                    name: name.to_string(),
                })
            }
        };

        let target_index = match (spec.must_target_player, target) {
            (true, None) => return Err(RondelError::MissingTargetPlayer),
            (_, Some(index)) => {
                self.seat_ref(index)?;
                index
            }
            (false, None) => player,
        };

        let actor = self.seat_ref(player)?;
        if !actor.gauge.can_play(cost) {
            return Err(RondelError::GaugeTooLow {
                cost,
                gauge: actor.gauge.value(),
            });
        }
        if actor.trumps_played >= self.config.max_trumps_per_turn {
            return Err(RondelError::MaxNumberTrumpsPlayed {
                max: self.config.max_trumps_per_turn,
            });
        }
        if self.seat_ref(target_index)?.effects.len() >= self.config.max_affecting_effects {
            return Err(RondelError::MaxNumberAffectingTrumps {
                max: self.config.max_affecting_effects as u32,
            });
        }

        let blocked = {
            let target_player = seat(&self.players, target_index)?;
            effect::is_blocked(&spec.name, &spec.overrides, target_player, &mut self.rng)
        };
        if blocked {
            return Err(RondelError::TrumpHasNoEffect {
                name: spec.name.clone(),
            });
        }

        match &spec.kind {
            TrumpKind::StealPower { stealth_duration } => {
                if target_index == player {
                    return Err(RondelError::TrumpHasNoEffect {
                        name: spec.name.clone(),
                    });
                }
                let stealth = *stealth_duration;
                let victim_power = seat(&self.players, target_index)?.power.clone();
                let actor = seat_mut(&mut self.players, player)?;
                actor.power.steal_from(&victim_power, stealth);
                if actor.power.is_passive() {
                    let kind = actor.power.current_spec().kind.clone();
                    effect::apply(&kind, &PlayContext::default(), actor, &mut self.board)?;
                }
                actor.gauge.spend(cost)?;
                actor.trumps_played += 1;
            }
            _ => {
                {
                    let target_player = seat(&self.players, target_index)?;
                    effect::check_eligibility(&spec, &context, target_player, &self.board)?;
                }
                let dead = {
                    let target_player = seat_mut(&mut self.players, target_index)?;
                    effect::apply(&spec.kind, &context, target_player, &mut self.board)?;
                    // A duration shift can kill running effects on the spot.
                    let (dead, alive): (Vec<Effect>, Vec<Effect>) =
                        std::mem::take(&mut target_player.effects)
                            .into_iter()
                            .partition(Effect::is_expired);
                    target_player.effects = alive;
                    target_player
                        .effects
                        .push(Effect::new(spec.clone(), player, target_index, context));
                    dead
                };
                for finished in &dead {
                    let survivors = self.players.iter().flatten().flat_map(|p| p.effects.iter());
                    effect::expire(finished, survivors, &mut self.board)?;
                }
                let actor = seat_mut(&mut self.players, player)?;
                actor.gauge.spend(cost)?;
                actor.trumps_played += 1;
            }
        }

        self.actions.record(ActionRecord::TrumpPlayed {
            player,
            target: target_index,
            name: spec.name.clone(),
        });
        log_if_verbose!(
            self.logger,
            "seat {} plays {} on seat {}",
            player,
            spec.name,
            target_index
        );
        self.maybe_complete_turn()
    }

    /// Resolve a queued special action, teleporting the target's pawn
    pub fn play_special_action(
        &mut self,
        player: usize,
        name: &str,
        target: Option<usize>,
        context: PlayContext,
    ) -> Result<PlayOutcome> {
        self.play_special_action_inner(player, name, target, context)?;
        self.resolve_ai_turns()?;
        Ok(self.outcome())
    }

    pub(crate) fn play_special_action_inner(
        &mut self,
        player: usize,
        name: &str,
        target: Option<usize>,
        context: PlayContext,
    ) -> Result<()> {
        self.ensure_actor(player)?;
        let action = self
            .seat_ref(player)?
            .pending_actions
            .iter()
            .find(|pending| pending.name == name)
            .cloned()
            .ok_or_else(|| RondelError::SpecialActionNotPending {
                name: name.to_string(),
            })?;
        let target_index = target.ok_or(RondelError::MissingTargetPlayer)?;
        let destination = context
            .square
            .ok_or(RondelError::MissingContext { field: "square" })?;
        let square = self.board.canonical_square(destination)?;
        if square.occupied {
            return Err(RondelError::SquareOutOfReach {
                x: destination.x,
                y: destination.y,
            });
        }
        let from = seat(&self.players, target_index)?.position;
        match &action.kind {
            SpecialActionKind::Teleport {
                distance: range,
                movements,
            } => {
                let hops = distance(&self.board, from, destination, movements).ok_or(
                    RondelError::SquareOutOfReach {
                        x: destination.x,
                        y: destination.y,
                    },
                )?;
                if hops > *range {
                    return Err(RondelError::SquareOutOfReach {
                        x: destination.x,
                        y: destination.y,
                    });
                }
            }
        }

        let blocked = {
            let target_player = seat(&self.players, target_index)?;
            effect::is_special_action_blocked(&action.name, target_player, &mut self.rng)
        };
        if blocked {
            return Err(RondelError::TrumpHasNoEffect {
                name: action.name.clone(),
            });
        }

        self.board.free(from)?;
        self.board.occupy(destination)?;
        seat_mut(&mut self.players, target_index)?.position = destination;
        seat_mut(&mut self.players, player)?.take_pending_action(name);

        self.actions.record(ActionRecord::SpecialActionPlayed {
            player,
            target: target_index,
            name: action.name.clone(),
            to: destination,
        });
        log_if_verbose!(
            self.logger,
            "seat {} plays {} moving seat {} to ({}, {})",
            player,
            action.name,
            target_index,
            destination.x,
            destination.y
        );
        self.maybe_complete_turn()
    }

    /// Drop a queued special action without resolving it
    pub fn cancel_special_action(&mut self, player: usize, name: &str) -> Result<PlayOutcome> {
        self.cancel_special_action_inner(player, name)?;
        self.resolve_ai_turns()?;
        Ok(self.outcome())
    }

    pub(crate) fn cancel_special_action_inner(&mut self, player: usize, name: &str) -> Result<()> {
        self.ensure_actor(player)?;
        let action = seat_mut(&mut self.players, player)?
            .take_pending_action(name)
            .ok_or_else(|| RondelError::SpecialActionNotPending {
                name: name.to_string(),
            })?;
        self.actions.record(ActionRecord::SpecialActionCanceled {
            player,
            name: action.name,
        });
        self.maybe_complete_turn()
    }

    /// Play out AI turns until the game waits on a human again
    ///
    /// Runs only while a human seat is still in the running; an
    /// all-AI match is stepped from outside instead.
    pub(crate) fn resolve_ai_turns(&mut self) -> Result<()> {
        while !self.over && self.has_eligible_human() && self.current_player()?.is_ai {
            self.play_one_ai_turn()?;
        }
        Ok(())
    }

    /// Run the current AI seat through one full turn
    ///
    /// External driver for all-AI matches; the human-facing entry
    /// points resolve trailing AI turns on their own.
    pub fn step_ai_turn(&mut self) -> Result<PlayOutcome> {
        if self.over {
            return Err(RondelError::GameOver);
        }
        if !self.current_player()?.is_ai {
            return Err(RondelError::NotYourTurn);
        }
        self.play_one_ai_turn()?;
        Ok(self.outcome())
    }

    fn play_one_ai_turn(&mut self) -> Result<()> {
        let seat_index = self.current;
        // Bounded: every iteration spends a move, resolves a queued
        // action, or passes.
        while !self.over && self.current == seat_index {
            if let Some(pending) = self.current_player()?.pending_actions.first() {
                let name = pending.name.clone();
                self.cancel_special_action_inner(seat_index, &name)?;
                continue;
            }
            match ai::choose_move(self)? {
                AiMove::Play {
                    name,
                    color,
                    destination,
                } => self.play_card_inner(seat_index, &name, color, destination)?,
                AiMove::Discard { name, color } => {
                    self.discard_inner(seat_index, &name, color)?
                }
                AiMove::Pass => self.pass_turn_inner(seat_index)?,
            }
        }
        Ok(())
    }
}

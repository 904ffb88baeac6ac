//! Game state and the turn machine
//!
//! `Game` owns the board, the seats and the RNG; everything random in
//! a match flows through that one generator, so a seed fixes the whole
//! game. Turn flow runs through `finish_turn`: completion bookkeeping
//! for the seat that just acted, then an advance that skips empty and
//! finished seats, passes for disconnected ones inside their grace
//! window and drops them past it.

use crate::board::{Board, Coord};
use crate::cards::Deck;
use crate::config::GameConfig;
use crate::error::{Result, RondelError};
use crate::game::log::{log_if_verbose, ActionLog, ActionRecord, GameLogger};
use crate::game::player::{Player, SeatConfig};
use crate::trumps::{effect, Effect, PlayContext, Power, TrumpKind};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A full match in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub config: GameConfig,

    pub board: Board,

    /// One slot per seat in turn order; `None` where nobody sits
    pub players: Vec<Option<Player>>,

    /// Seat whose turn it is
    pub current: usize,

    /// Counts every seat turn, auto-passed ones included
    pub turn_number: u32,

    /// Everything that happened, for replays and spectators
    pub actions: ActionLog,

    pub over: bool,

    /// Next finish position to hand out
    next_rank: u32,

    pub rng: ChaCha12Rng,

    pub logger: GameLogger,
}

impl Game {
    /// Set up a match from a seat roster
    ///
    /// The roster is positional: entry `i` takes seat `i` and its
    /// start square. Empty slots stay empty for the whole match.
    pub fn new(config: &GameConfig, roster: &[Option<SeatConfig>], seed: u64) -> Result<Game> {
        if roster.iter().flatten().count() < 2 {
            return Err(RondelError::InvalidConfig(
                "a match needs at least two seated players".into(),
            ));
        }
        if roster.len() > config.board.start_squares.len() {
            return Err(RondelError::InvalidConfig(format!(
                "{} seats but only {} start squares",
                roster.len(),
                config.board.start_squares.len()
            )));
        }

        let mut board = Board::new(&config.board)?;
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let trumps = config.trumps();

        let mut players = Vec::with_capacity(roster.len());
        for (index, slot) in roster.iter().enumerate() {
            let Some(seat) = slot else {
                players.push(None);
                continue;
            };
            let power = config
                .power_for_hero(&seat.hero)
                .ok_or_else(|| RondelError::InvalidConfig(format!("unknown hero: {}", seat.hero)))?;
            let position = config.board.start_squares[index];
            board.occupy(position)?;
            let deck = Deck::deal(config.deck_cards(), config.hand_size, &mut rng);
            players.push(Some(Player::new(
                index,
                seat,
                position,
                deck,
                trumps.clone(),
                Power::new(power),
                config,
            )));
        }

        let first = players
            .iter()
            .position(|slot| slot.is_some())
            .ok_or_else(|| RondelError::InvalidConfig("empty roster".into()))?;

        let mut game = Game {
            config: config.clone(),
            board,
            players,
            current: first,
            turn_number: 1,
            actions: ActionLog::new(),
            over: false,
            next_rank: 1,
            rng,
            logger: GameLogger::new(),
        };

        // Passive powers shape hands from the very first deal.
        for index in 0..game.players.len() {
            game.apply_passive_power(index)?;
        }
        game.begin_turn(first)?;
        game.resolve_ai_turns()?;
        Ok(game)
    }

    /// The seated player at `index`, if any
    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index).and_then(|slot| slot.as_ref())
    }

    /// The player whose turn it is
    pub fn current_player(&self) -> Result<&Player> {
        self.player(self.current)
            .ok_or_else(|| RondelError::Internal(format!("current seat {} is empty", self.current)))
    }

    pub(crate) fn seat_ref(&self, index: usize) -> Result<&Player> {
        self.player(index)
            .ok_or(RondelError::InvalidTargetPlayer { index })
    }

    /// Seats still in the running
    pub fn eligible_seats(&self) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .flatten()
            .filter(|player| player.can_play)
    }

    pub(crate) fn has_eligible_human(&self) -> bool {
        self.eligible_seats().any(|player| !player.is_ai)
    }

    /// The squares seat `index` must hold across two of its own turn
    /// completions to win
    pub fn aim_squares(&self, index: usize) -> Result<FxHashSet<Coord>> {
        self.seat_ref(index)?;
        let start = self.config.board.start_squares[index];
        Ok(self.board.aim_for(start))
    }

    /// Transport callback: this seat stopped answering
    ///
    /// If it was the absent player's own turn, their queued special
    /// actions are discarded and the turn passes immediately.
    pub fn mark_disconnected(&mut self, index: usize) -> Result<()> {
        seat_mut(&mut self.players, index)?.disconnect();
        self.logger.normal(&format!("seat {index} disconnected"));
        if !self.over && index == self.current {
            seat_mut(&mut self.players, index)?.pending_actions.clear();
            self.actions
                .record(ActionRecord::TurnPassed { player: index });
            self.finish_turn()?;
            self.resolve_ai_turns()?;
        }
        Ok(())
    }

    /// Transport callback: this seat is back
    ///
    /// Clears the missed-turn tally. A seat already dropped stays out.
    pub fn mark_reconnected(&mut self, index: usize) -> Result<()> {
        seat_mut(&mut self.players, index)?.reconnect();
        self.logger.normal(&format!("seat {index} reconnected"));
        Ok(())
    }

    /// Serialize the whole match, RNG included, so `restore` resumes
    /// an identical game.
    pub fn snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn restore(snapshot: &str) -> Result<Game> {
        Ok(serde_json::from_str(snapshot)?)
    }

    /// Turn-start bookkeeping: budget and deck reset, then the passive
    /// power and every running effect shape the fresh turn.
    pub(crate) fn begin_turn(&mut self, index: usize) -> Result<()> {
        let budget = self.config.move_budget;
        let player = seat_mut(&mut self.players, index)?;
        player.reset_for_turn(budget);

        let mut pending: Vec<(TrumpKind, PlayContext)> = Vec::new();
        if player.power.is_passive() {
            pending.push((
                player.power.current_spec().kind.clone(),
                PlayContext::default(),
            ));
        }
        pending.extend(
            player
                .effects
                .iter()
                .filter(|e| !effect::is_one_shot(&e.spec.kind))
                .map(|e| (e.spec.kind.clone(), e.context)),
        );
        for (kind, context) in &pending {
            effect::apply(kind, context, player, &mut self.board)?;
        }
        log_if_verbose!(
            self.logger,
            "seat {} begins turn {}",
            index,
            self.turn_number
        );
        Ok(())
    }

    fn apply_passive_power(&mut self, index: usize) -> Result<()> {
        let Some(player) = self.players.get_mut(index).and_then(|slot| slot.as_mut()) else {
            return Ok(());
        };
        if !player.power.is_passive() {
            return Ok(());
        }
        let kind = player.power.current_spec().kind.clone();
        effect::apply(&kind, &PlayContext::default(), player, &mut self.board)
    }

    /// Turn-end bookkeeping for the current seat: win check, hand
    /// refill, effect countdown and the power teardown hook.
    fn complete_current_seat(&mut self) -> Result<()> {
        let index = self.current;
        let hand_size = self.config.hand_size;
        let start = self.config.board.start_squares[index];

        let player = seat_mut(&mut self.players, index)?;
        let on_aim = self.board.aim_for(start).contains(&player.position);
        if on_aim && player.on_aim_last_turn {
            let rank = self.next_rank;
            self.next_rank += 1;
            player.mark_won(rank);
            self.actions
                .record(ActionRecord::PlayerWon { player: index, rank });
            self.logger
                .minimal(&format!("{} wins with rank {}", player.name, rank));
        } else {
            player.on_aim_last_turn = on_aim;
        }

        player.deck.refill(hand_size, &mut self.rng);

        for running in &mut player.effects {
            running.remaining -= 1;
        }
        let (expired, alive): (Vec<Effect>, Vec<Effect>) = std::mem::take(&mut player.effects)
            .into_iter()
            .partition(Effect::is_expired);
        player.effects = alive;
        for finished in &expired {
            let survivors = self.players.iter().flatten().flat_map(|p| p.effects.iter());
            effect::expire(finished, survivors, &mut self.board)?;
            log_if_verbose!(
                self.logger,
                "{} wore off seat {}",
                finished.spec.name,
                index
            );
        }

        let reverted = seat_mut(&mut self.players, index)?.power.turn_teardown();
        if reverted {
            log_if_verbose!(self.logger, "seat {} reverts to their own power", index);
        }

        self.actions.record(ActionRecord::TurnCompleted {
            player: index,
            turn_number: self.turn_number,
        });
        Ok(())
    }

    /// Close the current seat's turn and hand the next one out
    ///
    /// Returns with `current` on a connected seat, or with the game
    /// over when fewer than two seats remain in the running.
    pub(crate) fn finish_turn(&mut self) -> Result<()> {
        self.complete_current_seat()?;
        loop {
            if self.update_game_over()? {
                return Ok(());
            }
            let next = self.next_seat_candidate()?;
            self.current = next;

            if !self.seat_ref(next)?.is_connected() {
                let missed = seat_mut(&mut self.players, next)?.record_missed_turn();
                if missed > self.config.disconnected_grace_turns {
                    let player = seat_mut(&mut self.players, next)?;
                    player.can_play = false;
                    player.pending_actions.clear();
                    self.actions
                        .record(ActionRecord::SeatDropped { player: next });
                    self.logger
                        .minimal(&format!("seat {next} dropped after {missed} missed turns"));
                    continue;
                }
                self.turn_number += 1;
                self.begin_turn(next)?;
                self.actions
                    .record(ActionRecord::TurnPassed { player: next });
                self.complete_current_seat()?;
                continue;
            }

            self.turn_number += 1;
            self.begin_turn(next)?;
            // Stacked slowdowns can open a turn with nothing left to
            // spend; such a turn closes on its own.
            let seat = self.seat_ref(next)?;
            if seat.moves_remaining() == 0 && !seat.has_pending_actions() {
                self.actions
                    .record(ActionRecord::TurnPassed { player: next });
                log_if_verbose!(self.logger, "seat {} opens with no moves left", next);
                self.complete_current_seat()?;
                continue;
            }
            return Ok(());
        }
    }

    fn next_seat_candidate(&self) -> Result<usize> {
        let len = self.players.len();
        for offset in 1..=len {
            let index = (self.current + offset) % len;
            if let Some(player) = self.players[index].as_ref() {
                if player.can_play {
                    return Ok(index);
                }
            }
        }
        Err(RondelError::Internal("no seat left to take a turn".into()))
    }

    /// Flip `over` once fewer than two seats can still play; a single
    /// un-won survivor takes the next rank.
    fn update_game_over(&mut self) -> Result<bool> {
        let eligible: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().filter(|p| p.can_play).map(|_| i))
            .collect();
        if eligible.len() >= 2 {
            return Ok(false);
        }
        if let [last] = eligible[..] {
            let rank = self.next_rank;
            self.next_rank += 1;
            let player = seat_mut(&mut self.players, last)?;
            if player.rank.is_none() {
                player.rank = Some(rank);
            }
            player.can_play = false;
            self.logger
                .minimal(&format!("{} finishes with rank {}", player.name, rank));
        }
        self.over = true;
        self.actions.record(ActionRecord::GameEnded {
            turn_number: self.turn_number,
        });
        self.logger.minimal("game over");
        Ok(true)
    }
}

/// Seat access kept free-standing so callers can hold the board, the
/// RNG and a player at the same time.
pub(crate) fn seat(players: &[Option<Player>], index: usize) -> Result<&Player> {
    players
        .get(index)
        .and_then(|slot| slot.as_ref())
        .ok_or(RondelError::InvalidTargetPlayer { index })
}

pub(crate) fn seat_mut(players: &mut [Option<Player>], index: usize) -> Result<&mut Player> {
    players
        .get_mut(index)
        .and_then(|slot| slot.as_mut())
        .ok_or(RondelError::InvalidTargetPlayer { index })
}

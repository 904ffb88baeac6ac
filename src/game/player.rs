//! Player state: pawn, deck, gauge, trumps and live effects

use crate::board::Coord;
use crate::cards::Deck;
use crate::config::GameConfig;
use crate::error::{Result, RondelError};
use crate::trumps::{Effect, Power, SpecialActionSpec, TrumpKind, TrumpSpec};
use serde::{Deserialize, Serialize};

/// The bounded resource gauge trump plays spend.
///
/// Earned by moving pawns, saturating at `max`; never goes negative
/// because every spend is validated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gauge {
    value: u32,
    max: u32,
}

impl Gauge {
    pub fn new(max: u32) -> Self {
        Gauge { value: 0, max }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn can_play(&self, cost: u32) -> bool {
        self.value >= cost
    }

    pub fn earn(&mut self, amount: u32) {
        self.value = (self.value + amount).min(self.max);
    }

    pub fn spend(&mut self, cost: u32) -> Result<()> {
        if self.value < cost {
            return Err(RondelError::GaugeTooLow {
                cost,
                gauge: self.value,
            });
        }
        self.value -= cost;
        Ok(())
    }
}

/// Whether a seat is live on the transport side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Connected,
    Disconnected { missed_turns: u32 },
}

/// One roster entry handed to `Game::new`.
///
/// `id` is the external identity the transport layer reconnects by;
/// the engine treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub id: String,
    pub name: String,
    pub hero: String,
    pub is_ai: bool,
}

impl SeatConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, hero: impl Into<String>) -> Self {
        SeatConfig {
            id: id.into(),
            name: name.into(),
            hero: hero.into(),
            is_ai: false,
        }
    }

    pub fn ai(mut self) -> Self {
        self.is_ai = true;
        self
    }
}

/// Represents a player in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat number; also this player's index into the game roster
    pub index: usize,

    /// External identity, opaque to the engine
    pub id: String,

    pub name: String,

    pub hero: String,

    pub is_ai: bool,

    /// Where this player's pawn stands
    pub position: Coord,

    pub deck: Deck,

    pub gauge: Gauge,

    /// The trumps this player may play, never consumed
    pub trumps: Vec<TrumpSpec>,

    pub power: Power,

    /// Effects currently affecting this player
    pub effects: Vec<Effect>,

    /// Special actions queued by a card play, each to be played or
    /// canceled before the turn can complete
    pub pending_actions: Vec<SpecialActionSpec>,

    pub moves_allowed: u32,
    pub moves_played: u32,
    pub trumps_played: u32,

    /// False once this seat is out of the running (won or dropped)
    pub can_play: bool,

    pub has_won: bool,

    /// Finish position, assigned in win order
    pub rank: Option<u32>,

    /// Whether the pawn sat on an aim square when the previous turn
    /// completed; two in a row wins
    pub on_aim_last_turn: bool,

    pub connection: ConnectionState,
}

impl Player {
    pub fn new(
        index: usize,
        seat: &SeatConfig,
        position: Coord,
        deck: Deck,
        trumps: Vec<TrumpSpec>,
        power: Power,
        config: &GameConfig,
    ) -> Self {
        Player {
            index,
            id: seat.id.clone(),
            name: seat.name.clone(),
            hero: seat.hero.clone(),
            is_ai: seat.is_ai,
            position,
            deck,
            gauge: Gauge::new(config.gauge_max),
            trumps,
            power,
            effects: Vec::new(),
            pending_actions: Vec::new(),
            moves_allowed: config.move_budget,
            moves_played: 0,
            trumps_played: 0,
            can_play: true,
            has_won: false,
            rank: None,
            on_aim_last_turn: false,
            connection: ConnectionState::Connected,
        }
    }

    /// Shift the move budget, clamped at zero.
    pub fn adjust_moves_allowed(&mut self, delta: i32) {
        self.moves_allowed = (self.moves_allowed as i64 + delta as i64).max(0) as u32;
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_allowed.saturating_sub(self.moves_played)
    }

    /// A trump's cost for this player, after the passive cost shift
    /// their power may carry. Floored at zero.
    pub fn effective_trump_cost(&self, base: u32) -> u32 {
        if self.power.is_passive() {
            if let TrumpKind::ModifyTrumpCosts { delta } = self.power.current_spec().kind {
                return (base as i64 + delta as i64).max(0) as u32;
            }
        }
        base
    }

    pub fn find_trump(&self, name: &str) -> Option<&TrumpSpec> {
        self.trumps.iter().find(|t| t.name == name)
    }

    /// Zero the per-turn counters and restore the deck's printed
    /// values; active effects are re-applied by the caller afterwards.
    pub fn reset_for_turn(&mut self, move_budget: u32) {
        self.moves_allowed = move_budget;
        self.moves_played = 0;
        self.trumps_played = 0;
        self.deck.revert_to_default();
    }

    pub fn queue_actions(&mut self, actions: impl IntoIterator<Item = SpecialActionSpec>) {
        self.pending_actions.extend(actions);
    }

    /// Remove and return the first queued action with this name.
    pub fn take_pending_action(&mut self, name: &str) -> Option<SpecialActionSpec> {
        let index = self.pending_actions.iter().position(|a| a.name == name)?;
        Some(self.pending_actions.remove(index))
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.pending_actions.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, ConnectionState::Connected)
    }

    /// Count one skipped turn against the disconnection grace; returns
    /// the new tally.
    pub fn record_missed_turn(&mut self) -> u32 {
        match &mut self.connection {
            ConnectionState::Disconnected { missed_turns } => {
                *missed_turns += 1;
                *missed_turns
            }
            ConnectionState::Connected => 0,
        }
    }

    pub fn disconnect(&mut self) {
        if self.is_connected() {
            self.connection = ConnectionState::Disconnected { missed_turns: 0 };
        }
    }

    pub fn reconnect(&mut self) {
        self.connection = ConnectionState::Connected;
    }

    pub fn mark_won(&mut self, rank: u32) {
        self.has_won = true;
        self.can_play = false;
        self.rank = Some(rank);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trumps::PowerSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn test_player(hero_power: Power) -> Player {
        let config = GameConfig::standard();
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let deck = Deck::deal(config.deck_cards(), config.hand_size, &mut rng);
        let seat = SeatConfig::new("u-1", "Alice", "Earthshaper");
        Player::new(
            0,
            &seat,
            Coord::new(6, 7),
            deck,
            config.trumps(),
            hero_power,
            &config,
        )
    }

    fn plain_power() -> Power {
        let spec = TrumpSpec::new("Terraforming", 8, 2, TrumpKind::ChangeSquare);
        Power::new(PowerSpec::new(spec, false))
    }

    #[test]
    fn test_gauge_bounds() {
        let mut gauge = Gauge::new(40);
        gauge.earn(25);
        gauge.earn(25);
        assert_eq!(gauge.value(), 40);

        gauge.spend(12).unwrap();
        assert_eq!(gauge.value(), 28);

        let err = gauge.spend(29).unwrap_err();
        assert!(matches!(
            err,
            RondelError::GaugeTooLow { cost: 29, gauge: 28 }
        ));
        assert_eq!(gauge.value(), 28);
    }

    #[test]
    fn test_move_budget_clamps_at_zero() {
        let mut player = test_player(plain_power());
        assert_eq!(player.moves_allowed, 2);

        player.adjust_moves_allowed(-1);
        player.adjust_moves_allowed(-5);
        assert_eq!(player.moves_allowed, 0);

        player.adjust_moves_allowed(1);
        assert_eq!(player.moves_allowed, 1);
    }

    #[test]
    fn test_passive_cost_shift() {
        let ruse = TrumpSpec::new(
            "Inveterate Ruse",
            0,
            0,
            TrumpKind::ModifyTrumpCosts { delta: -2 },
        );
        let player = test_player(Power::new(PowerSpec::new(ruse, true)));

        assert_eq!(player.effective_trump_cost(7), 5);
        assert_eq!(player.effective_trump_cost(1), 0);

        let plain = test_player(plain_power());
        assert_eq!(plain.effective_trump_cost(7), 7);
    }

    #[test]
    fn test_pending_action_queue() {
        let mut player = test_player(plain_power());
        assert!(!player.has_pending_actions());

        let card = player
            .deck
            .cards()
            .find(|c| c.name == "Assassin")
            .cloned()
            .unwrap();
        player.queue_actions(card.special_actions.clone());
        assert!(player.has_pending_actions());

        assert!(player.take_pending_action("Teleportation").is_none());
        let taken = player.take_pending_action("Assassination").unwrap();
        assert_eq!(taken.name, "Assassination");
        assert!(!player.has_pending_actions());
    }

    #[test]
    fn test_disconnection_tally() {
        let mut player = test_player(plain_power());
        assert_eq!(player.record_missed_turn(), 0);

        player.disconnect();
        assert_eq!(player.record_missed_turn(), 1);
        assert_eq!(player.record_missed_turn(), 2);

        player.reconnect();
        assert!(player.is_connected());
        assert_eq!(player.record_missed_turn(), 0);
    }

    #[test]
    fn test_turn_reset_restores_deck() {
        let mut player = test_player(plain_power());
        player.moves_played = 2;
        player.trumps_played = 1;
        for card in player.deck.cards_mut() {
            card.colors = crate::board::ColorSet::empty();
        }

        player.reset_for_turn(2);
        assert_eq!(player.moves_remaining(), 2);
        assert_eq!(player.trumps_played, 0);
        assert!(player.deck.cards().all(|c| !c.colors.is_empty()));
    }
}

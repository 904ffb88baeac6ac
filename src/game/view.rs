//! Client-facing snapshots of the live game
//!
//! Two shapes: `GameView` is broadcast to every seat and hides hands,
//! stocks and the rng; `PlayerView` is the private slice one seat
//! sees. Both are plain data, ready to serialize and ship.

use crate::board::{Color, ColorSet, Coord};
use crate::cards::MovementKind;
use crate::error::Result;
use crate::game::player::Player;
use crate::game::state::{seat, Game};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One recolored square, shipped as a diff against the built board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareView {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

/// An effect as every seat may see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectView {
    pub name: String,
    pub initiator: usize,
    pub remaining: i32,
}

/// A power as every seat may see it
///
/// While a power impersonates a stolen one, this shows the mask; the
/// thief's own spec stays hidden until the stealth window lapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerView {
    pub name: String,
    pub description: String,
    pub passive: bool,
    pub cost: u32,
}

/// What every seat may know about a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPublicView {
    pub index: usize,
    pub name: String,
    pub hero: String,
    pub is_ai: bool,
    pub position: Coord,
    pub gauge: u32,
    pub hand_count: usize,
    pub moves_remaining: u32,
    pub effects: Vec<EffectView>,
    pub power: PowerView,
    pub has_won: bool,
    pub rank: Option<u32>,
    pub connected: bool,
    pub can_play: bool,
}

/// The broadcast snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub turn_number: u32,
    pub current: usize,
    pub over: bool,
    pub changed_squares: Vec<SquareView>,
    pub players: Vec<Option<PlayerPublicView>>,
}

/// One hand card with its live legal colors and step count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub name: String,
    pub color: Color,
    pub colors: ColorSet,
    pub steps: u32,
    pub cost: u32,
    pub movements: SmallVec<[MovementKind; 3]>,
    pub special_actions: Vec<String>,
}

/// A trump priced for the seat that owns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrumpView {
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub duration: u32,
    pub needs_target: bool,
}

/// The private per-seat snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub index: usize,
    pub your_turn: bool,
    pub hand: Vec<CardView>,
    pub trumps: Vec<TrumpView>,
    pub power: PowerView,
    pub impersonating: bool,
    pub stealth_remaining: Option<u32>,
    pub gauge: u32,
    pub gauge_max: u32,
    pub moves_remaining: u32,
    pub trumps_played: u32,
    pub pending_actions: Vec<String>,
    pub has_won: bool,
    pub rank: Option<u32>,
}

impl PlayerPublicView {
    fn of(player: &Player) -> Self {
        PlayerPublicView {
            index: player.index,
            name: player.name.clone(),
            hero: player.hero.clone(),
            is_ai: player.is_ai,
            position: player.position,
            gauge: player.gauge.value(),
            hand_count: player.deck.hand.len(),
            moves_remaining: player.moves_remaining(),
            effects: player
                .effects
                .iter()
                .map(|e| EffectView {
                    name: e.spec.name.clone(),
                    initiator: e.initiator,
                    remaining: e.remaining,
                })
                .collect(),
            power: PowerView::of(player),
            has_won: player.has_won,
            rank: player.rank,
            connected: player.is_connected(),
            can_play: player.can_play,
        }
    }
}

impl PowerView {
    fn of(player: &Player) -> Self {
        let spec = player.power.current_spec();
        PowerView {
            name: spec.name.clone(),
            description: spec.description.clone(),
            passive: player.power.is_passive(),
            cost: player.power.effective_cost(),
        }
    }
}

impl Game {
    /// The snapshot broadcast to every seat after each operation
    pub fn view(&self) -> GameView {
        GameView {
            turn_number: self.turn_number,
            current: self.current,
            over: self.over,
            changed_squares: self
                .board
                .updated_squares()
                .into_iter()
                .map(|s| SquareView {
                    x: s.x,
                    y: s.y,
                    color: s.color,
                })
                .collect(),
            players: self
                .players
                .iter()
                .map(|slot| slot.as_ref().map(PlayerPublicView::of))
                .collect(),
        }
    }

    /// The private snapshot for one seat
    pub fn player_view(&self, index: usize) -> Result<PlayerView> {
        let player = seat(&self.players, index)?;
        Ok(PlayerView {
            index,
            your_turn: !self.over && index == self.current,
            hand: player
                .deck
                .hand
                .iter()
                .map(|card| CardView {
                    name: card.name.clone(),
                    color: card.color,
                    colors: card.colors,
                    steps: card.steps,
                    cost: card.cost,
                    movements: card.movements.clone(),
                    special_actions: card
                        .all_special_actions()
                        .map(|a| a.name.clone())
                        .collect(),
                })
                .collect(),
            trumps: player
                .trumps
                .iter()
                .map(|spec| TrumpView {
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    cost: player.effective_trump_cost(spec.cost),
                    duration: spec.duration,
                    needs_target: spec.must_target_player,
                })
                .collect(),
            power: PowerView::of(player),
            impersonating: player.power.is_impersonating(),
            stealth_remaining: player.power.stealth_remaining(),
            gauge: player.gauge.value(),
            gauge_max: player.gauge.max(),
            moves_remaining: player.moves_remaining(),
            trumps_played: player.trumps_played,
            pending_actions: player.pending_actions.iter().map(|a| a.name.clone()).collect(),
            has_won: player.has_won,
            rank: player.rank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::error::RondelError;
    use crate::game::player::SeatConfig;

    fn sample_game() -> Game {
        let config = GameConfig::standard();
        let roster = vec![
            Some(SeatConfig::new("p0", "Ada", "Nightbringer")),
            Some(SeatConfig::new("p1", "Ben", "Trickster")),
        ];
        Game::new(&config, &roster, 7).unwrap()
    }

    #[test]
    fn test_broadcast_view_hides_hands() {
        let game = sample_game();
        let view = game.view();

        assert_eq!(view.turn_number, 1);
        assert_eq!(view.current, 0);
        assert!(!view.over);
        assert!(view.changed_squares.is_empty());
        assert_eq!(view.players.len(), 2);

        let ada = view.players[0].as_ref().unwrap();
        assert_eq!(ada.hand_count, 5);
        assert_eq!(ada.hero, "Nightbringer");
        assert_eq!(ada.power.name, "Night Mist");
        assert!(ada.connected);
    }

    #[test]
    fn test_broadcast_view_carries_square_diffs() {
        let mut game = sample_game();
        game.board.change_color(Coord::new(3, 3), Color::Red).unwrap();

        let view = game.view();
        assert_eq!(
            view.changed_squares,
            vec![SquareView {
                x: 3,
                y: 3,
                color: Color::Red,
            }]
        );
    }

    #[test]
    fn test_private_view_prices_trumps_for_the_seat() {
        let game = sample_game();

        let ada = game.player_view(0).unwrap();
        let blizzard = ada.trumps.iter().find(|t| t.name == "Blizzard").unwrap();
        assert_eq!(blizzard.cost, 6);

        // The trickster's passive shaves two off every trump.
        let ben = game.player_view(1).unwrap();
        let blizzard = ben.trumps.iter().find(|t| t.name == "Blizzard").unwrap();
        assert_eq!(blizzard.cost, 4);
    }

    #[test]
    fn test_private_view_flags_the_active_seat() {
        let game = sample_game();

        assert!(game.player_view(0).unwrap().your_turn);
        assert!(!game.player_view(1).unwrap().your_turn);
        assert_eq!(game.player_view(0).unwrap().hand.len(), 5);
    }

    #[test]
    fn test_view_rejects_vacant_seat() {
        let config = GameConfig::standard();
        let roster = vec![
            Some(SeatConfig::new("p0", "Ada", "Nightbringer")),
            None,
            Some(SeatConfig::new("p2", "Cleo", "Warlord")),
        ];
        let game = Game::new(&config, &roster, 7).unwrap();

        let err = game.player_view(1).unwrap_err();
        assert!(matches!(err, RondelError::InvalidTargetPlayer { index: 1 }));
    }

    #[test]
    fn test_views_serialize_round_trip() {
        let game = sample_game();

        let broadcast = game.view();
        let json = serde_json::to_string(&broadcast).unwrap();
        let back: GameView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, broadcast);

        let private = game.player_view(0).unwrap();
        let json = serde_json::to_string(&private).unwrap();
        let back: PlayerView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, private);
    }
}

//! Match configuration and the static content tables
//!
//! The whole roster of cards, trumps and heroes lives here as plain
//! constructor tables. Constructors receive an explicit `GameConfig`;
//! there is no process-wide registry to consult.

use crate::board::{BoardConfig, Color, ColorSet};
use crate::cards::{Card, MovementKind};
use crate::trumps::{PowerSpec, SpecialActionKind, SpecialActionSpec, TrumpKind, TrumpSpec};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

/// Rule constants and the board layout for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub board: BoardConfig,

    /// Cards every refill tops the hand back up to.
    pub hand_size: usize,

    /// Card plays and discards per turn, before effect deltas.
    pub move_budget: u32,

    /// Trump or power activations allowed per turn.
    pub max_trumps_per_turn: u32,

    /// Active effects one player can be under at once.
    pub max_affecting_effects: usize,

    /// Upper bound of the resource gauge.
    pub gauge_max: u32,

    /// Flat gauge credit for a knight-card move.
    pub knight_gauge_increment: u32,

    /// Missed turns before a disconnected seat stops being waited on.
    pub disconnected_grace_turns: u32,
}

impl GameConfig {
    /// The standard ruleset on the four-arm board.
    pub fn standard() -> Self {
        GameConfig {
            board: BoardConfig::standard(),
            hand_size: 5,
            move_budget: 2,
            max_trumps_per_turn: 1,
            max_affecting_effects: 4,
            gauge_max: 40,
            knight_gauge_increment: 2,
            disconnected_grace_turns: 2,
        }
    }

    /// The standard ruleset on the eight-arm board.
    pub fn eight_arms() -> Self {
        GameConfig {
            board: BoardConfig::eight_arms(),
            ..Self::standard()
        }
    }

    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    /// One fresh deck: seven archetypes in each playable color.
    ///
    /// Every player receives their own copy at game start.
    pub fn deck_cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(Color::PLAYABLE.len() * 7);
        for &color in &Color::PLAYABLE {
            let own = only(color);
            cards.push(Card::new("Warrior", color, own, 1, 100, [MovementKind::Line]));
            cards.push(Card::new(
                "Wizard",
                color,
                own,
                1,
                200,
                [MovementKind::Line, MovementKind::Diagonal],
            ));
            cards.push(Card::new("Knight", color, own, 1, 200, [MovementKind::Knight]));
            cards.push(Card::new(
                "Bishop",
                color,
                ColorSet::from_iter([color, companion_color(color)]),
                2,
                200,
                [MovementKind::Diagonal],
            ));
            cards.push(
                Card::new(
                    "Assassin",
                    color,
                    own,
                    1,
                    250,
                    [MovementKind::Line, MovementKind::Diagonal],
                )
                .with_special_actions(vec![assassination(color)]),
            );
            cards.push(Card::new(
                "Queen",
                color,
                own,
                3,
                300,
                [MovementKind::Line, MovementKind::Diagonal],
            ));
            cards.push(Card::new("King", color, own, 3, 250, [MovementKind::Line]));
        }
        cards
    }

    /// The trumps every player starts with.
    pub fn trumps(&self) -> Vec<TrumpSpec> {
        let mut roster: Vec<TrumpSpec> =
            Color::PLAYABLE.iter().map(|&color| tower(color)).collect();
        roster.push(fortress(Color::Blue));
        roster.push(fortress(Color::Black));
        roster.push(ram());
        roster.push(
            TrumpSpec::new("Blizzard", 6, 1, TrumpKind::ModifyNumberMoves { delta: -1 })
                .with_description("The target loses one move per turn")
                .targeting_player(),
        );
        roster.push(
            TrumpSpec::new("Reinforcements", 8, 1, TrumpKind::ModifyNumberMoves { delta: 1 })
                .with_description("Gain one extra move this turn"),
        );
        roster.push(phantom_blades());
        roster
    }

    /// The selectable heroes, each with their bound power.
    pub fn heroes(&self) -> Vec<HeroSpec> {
        vec![
            HeroSpec::new("Nightbringer", PowerSpec::new(night_mist(), true)),
            HeroSpec::new("Trickster", PowerSpec::new(inveterate_ruse(), true)),
            HeroSpec::new("Earthshaper", PowerSpec::new(terraforming(), false)),
            HeroSpec::new("Shapeshifter", PowerSpec::new(metamorphosis(), false)),
            HeroSpec::new("Warlord", PowerSpec::new(domination(), true)),
            HeroSpec::new("Tempest", PowerSpec::new(force_of_nature(), false)),
        ]
    }

    pub fn power_for_hero(&self, hero: &str) -> Option<PowerSpec> {
        self.heroes().into_iter().find(|h| h.name == hero).map(|h| h.power)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// A selectable hero and the power bound to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSpec {
    pub name: String,
    pub power: PowerSpec,
}

impl HeroSpec {
    pub fn new(name: impl Into<String>, power: PowerSpec) -> Self {
        HeroSpec {
            name: name.into(),
            power,
        }
    }
}

fn only(color: Color) -> ColorSet {
    ColorSet::from_iter([color])
}

/// The next stripe color clockwise; the Bishop's second legal color.
fn companion_color(color: Color) -> Color {
    match color {
        Color::Blue => Color::Yellow,
        Color::Yellow => Color::Black,
        Color::Black => Color::Red,
        Color::Red => Color::Blue,
        Color::All => Color::All,
    }
}

/// The Assassin card's printed action.
fn assassination(color: Color) -> SpecialActionSpec {
    SpecialActionSpec::new(
        "Assassination",
        color,
        SpecialActionKind::Teleport {
            distance: 2,
            movements: smallvec![MovementKind::Line, MovementKind::Diagonal],
        },
    )
    .with_description("Move the target's pawn to a free square within two hops")
}

fn tower(color: Color) -> TrumpSpec {
    TrumpSpec::new(
        format!("{color} Tower"),
        4,
        1,
        TrumpKind::RemoveColors {
            colors: only(color),
            card_names: Vec::new(),
        },
    )
    .with_description(format!("The target's cards lose {color} for one turn"))
    .with_colors([color])
    .targeting_player()
}

fn fortress(color: Color) -> TrumpSpec {
    TrumpSpec::new(
        format!("{color} Fortress"),
        7,
        2,
        TrumpKind::RemoveColors {
            colors: only(color),
            card_names: Vec::new(),
        },
    )
    .with_description(format!("The target's cards lose {color} for two turns"))
    .with_colors([color])
    .targeting_player()
    .preventing(["Ram"])
}

fn ram() -> TrumpSpec {
    let walls: Vec<String> = Color::PLAYABLE
        .iter()
        .map(|color| format!("{color} Tower"))
        .chain([String::from("Blue Fortress"), String::from("Black Fortress")])
        .collect();
    TrumpSpec::new(
        "Ram",
        4,
        1,
        TrumpKind::ModifyTrumpDurations {
            trump_names: walls,
            delta: -1,
        },
    )
    .with_description("Knock one turn off the target's towers and fortresses")
    .targeting_player()
    .overriding(["Blue Fortress", "Black Fortress"])
}

fn phantom_blades() -> TrumpSpec {
    TrumpSpec::new(
        "Phantom Blades",
        5,
        1,
        TrumpKind::AddSpecialActions {
            card_names: vec![String::from("Warrior"), String::from("Wizard")],
            actions: vec![assassination(Color::All)],
        },
    )
    .with_description("Your Warriors and Wizards carry Assassination for one turn")
}

fn night_mist() -> TrumpSpec {
    TrumpSpec::new("Night Mist", 0, 0, TrumpKind::CannotBeAffected)
        .with_description("Hostile trumps and assassinations cannot touch you")
        .preventing([
            "Black Tower",
            "Blue Tower",
            "Red Tower",
            "Yellow Tower",
            "Black Fortress",
            "Blue Fortress",
            "Blizzard",
            "Assassination",
        ])
}

fn inveterate_ruse() -> TrumpSpec {
    TrumpSpec::new("Inveterate Ruse", 0, 0, TrumpKind::ModifyTrumpCosts { delta: -2 })
        .with_description("Your trumps cost two less")
}

fn terraforming() -> TrumpSpec {
    TrumpSpec::new("Terraforming", 8, 2, TrumpKind::ChangeSquare)
        .with_description("Repaint one square for two turns")
}

fn metamorphosis() -> TrumpSpec {
    TrumpSpec::new("Metamorphosis", 10, 2, TrumpKind::StealPower { stealth_duration: 2 })
        .with_description("Wear the target's power for two turns")
        .targeting_player()
}

fn domination() -> TrumpSpec {
    TrumpSpec::new(
        "Domination",
        0,
        0,
        TrumpKind::AddColors {
            colors: ColorSet::all(),
            card_names: Vec::new(),
        },
    )
    .with_description("Your cards move on every color")
}

fn force_of_nature() -> TrumpSpec {
    TrumpSpec::new(
        "Force of Nature",
        12,
        1,
        TrumpKind::RemoveColors {
            colors: ColorSet::all(),
            card_names: Vec::new(),
        },
    )
    .with_description("Strip every color from the target's cards for one turn")
    .targeting_player()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_shape() {
        let config = GameConfig::standard();
        let cards = config.deck_cards();
        assert_eq!(cards.len(), 28);

        for &color in &Color::PLAYABLE {
            assert_eq!(cards.iter().filter(|c| c.color == color).count(), 7);
        }

        let bishop = cards
            .iter()
            .find(|c| c.name == "Bishop" && c.color == Color::Blue)
            .unwrap();
        assert_eq!(bishop.colors.len(), 2);
        assert!(bishop.colors.contains(Color::Blue));
        assert!(bishop.colors.contains(Color::Yellow));

        let assassin = cards
            .iter()
            .find(|c| c.name == "Assassin" && c.color == Color::Red)
            .unwrap();
        assert_eq!(assassin.special_actions.len(), 1);
        assert_eq!(assassin.special_actions[0].name, "Assassination");
        assert_eq!(assassin.special_actions[0].color, Color::Red);
    }

    #[test]
    fn test_trump_roster_name_integrity() {
        let config = GameConfig::standard();
        let roster = config.trumps();
        assert_eq!(roster.len(), 10);

        let names: Vec<&str> = roster.iter().map(|t| t.name.as_str()).collect();

        // Every name the Ram filters on or punches through must exist.
        let ram = roster.iter().find(|t| t.name == "Ram").unwrap();
        match &ram.kind {
            TrumpKind::ModifyTrumpDurations { trump_names, delta } => {
                assert_eq!(*delta, -1);
                assert_eq!(trump_names.len(), 6);
                for name in trump_names {
                    assert!(names.contains(&name.as_str()), "unknown trump {name}");
                }
            }
            other => panic!("unexpected kind {other:?}"),
        }
        for name in &ram.overrides {
            assert!(names.contains(&name.as_str()));
        }

        for fortress in roster.iter().filter(|t| t.name.ends_with("Fortress")) {
            assert_eq!(fortress.cost, 7);
            assert_eq!(fortress.duration, 2);
            assert_eq!(fortress.prevents, vec!["Ram".to_string()]);
        }
        for tower in roster.iter().filter(|t| t.name.ends_with("Tower")) {
            assert_eq!(tower.cost, 4);
            assert_eq!(tower.duration, 1);
            assert!(tower.must_target_player);
        }

        // Phantom Blades grants the printed Assassination to cards the
        // deck actually deals.
        let blades = roster.iter().find(|t| t.name == "Phantom Blades").unwrap();
        assert!(!blades.must_target_player);
        match &blades.kind {
            TrumpKind::AddSpecialActions { card_names, actions } => {
                let deck_names: Vec<String> =
                    config.deck_cards().into_iter().map(|c| c.name).collect();
                for name in card_names {
                    assert!(deck_names.contains(name), "unknown card {name}");
                }
                assert_eq!(actions.len(), 1);
                assert_eq!(actions[0].name, "Assassination");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_hero_roster() {
        let config = GameConfig::standard();
        let heroes = config.heroes();
        assert_eq!(heroes.len(), 6);

        let mut names: Vec<&str> = heroes.iter().map(|h| h.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6, "hero names must be unique");

        let shapeshifter = config.power_for_hero("Shapeshifter").unwrap();
        assert!(!shapeshifter.passive);
        assert_eq!(
            shapeshifter.trump.kind,
            TrumpKind::StealPower { stealth_duration: 2 }
        );

        let trickster = config.power_for_hero("Trickster").unwrap();
        assert!(trickster.passive);
        assert_eq!(trickster.trump.cost, 0);

        assert!(config.power_for_hero("Nobody").is_none());
    }

    #[test]
    fn test_night_mist_prevents_known_names() {
        let config = GameConfig::standard();
        let trump_names: Vec<String> =
            config.trumps().iter().map(|t| t.name.clone()).collect();

        let mist = config.power_for_hero("Nightbringer").unwrap();
        assert!(mist.passive);
        assert_eq!(mist.trump.prevents.len(), 8);
        for name in &mist.trump.prevents {
            let known = trump_names.contains(name) || name == "Assassination";
            assert!(known, "unknown prevented name {name}");
        }
    }

    #[test]
    fn test_rule_constants() {
        let config = GameConfig::default();
        assert_eq!(config.move_budget, 2);
        assert_eq!(config.max_trumps_per_turn, 1);
        assert_eq!(config.max_affecting_effects, 4);
        assert_eq!(config.gauge_max, 40);
        assert_eq!(config.hand_size, 5);

        let eight = GameConfig::eight_arms();
        assert_eq!(eight.board.arm_count, 8);
        assert_eq!(eight.move_budget, 2);
    }
}

//! Greedy controller for AI seats
//!
//! One policy: walk the shortest path to the aim row. Each decision
//! scores every (card, destination) pair by the walking distance left
//! from the destination to the nearest aim square, keeps the best
//! strict improvement when one exists, and otherwise falls back to
//! the cheapest playable card, the cheapest discard, or a pass. No
//! trumps and no teleports; queued actions are canceled by the turn
//! driver.

use crate::board::pathfinding::distance;
use crate::board::{Color, Coord};
use crate::error::Result;
use crate::game::state::Game;
use crate::game::WALK;
use rustc_hash::FxHashSet;

/// What the controller wants to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiMove {
    Play {
        name: String,
        color: Color,
        destination: Coord,
    },
    Discard {
        name: String,
        color: Color,
    },
    Pass,
}

/// Decide the current seat's next move
pub fn choose_move(game: &Game) -> Result<AiMove> {
    let player = game.current_player()?;
    if player.moves_remaining() == 0 {
        return Ok(AiMove::Pass);
    }
    let aim = game.aim_squares(player.index)?;
    let here = walking_distance(game, player.position, &aim);
    if here == 0 {
        // Standing on an aim square; holding it is the win condition.
        return Ok(AiMove::Pass);
    }

    // Keys carry (primary, secondary, hand slot, destination) so ties
    // resolve the same way on every run.
    let mut improvement: Option<(u32, u32, usize, Coord)> = None;
    let mut fallback: Option<(u32, u32, usize, Coord)> = None;
    for (slot, card) in player.deck.hand.iter().enumerate() {
        let mut destinations: Vec<Coord> = card
            .reachable_squares(&game.board, player.position)
            .into_iter()
            .collect();
        destinations.sort_unstable();
        for destination in destinations {
            let left = walking_distance(game, destination, &aim);
            if left < here {
                let key = (left, card.cost, slot, destination);
                if improvement.is_none_or(|held| key < held) {
                    improvement = Some(key);
                }
            } else {
                let key = (card.cost, left, slot, destination);
                if fallback.is_none_or(|held| key < held) {
                    fallback = Some(key);
                }
            }
        }
    }

    if let Some((_, _, slot, destination)) = improvement.or(fallback) {
        let card = &player.deck.hand[slot];
        return Ok(AiMove::Play {
            name: card.name.clone(),
            color: card.color,
            destination,
        });
    }

    // Nothing playable: shed the cheapest card, or pass empty-handed.
    let cheapest = player
        .deck
        .hand
        .iter()
        .enumerate()
        .min_by_key(|(slot, card)| (card.cost, *slot));
    Ok(match cheapest {
        Some((_, card)) => AiMove::Discard {
            name: card.name.clone(),
            color: card.color,
        },
        None => AiMove::Pass,
    })
}

/// Walking hops to the nearest aim square
fn walking_distance(game: &Game, from: Coord, aim: &FxHashSet<Coord>) -> u32 {
    aim.iter()
        .filter_map(|goal| distance(&game.board, from, *goal, &WALK))
        .min()
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::config::GameConfig;
    use crate::game::player::SeatConfig;

    fn sample_game() -> Game {
        let config = GameConfig::standard();
        let roster = vec![
            Some(SeatConfig::new("p0", "Ada", "Nightbringer")),
            Some(SeatConfig::new("p1", "Ben", "Earthshaper")),
        ];
        Game::new(&config, &roster, 5).unwrap()
    }

    fn card_from_roster(name: &str, color: Color) -> Card {
        GameConfig::standard()
            .deck_cards()
            .into_iter()
            .find(|card| card.name == name && card.color == color)
            .unwrap()
    }

    #[test]
    fn test_passes_while_holding_an_aim_square() {
        let mut game = sample_game();
        let aim = *game.aim_squares(0).unwrap().iter().min().unwrap();
        let start = game.player(0).unwrap().position;
        game.board.free(start).unwrap();
        game.board.occupy(aim).unwrap();
        game.players[0].as_mut().unwrap().position = aim;

        assert_eq!(choose_move(&game).unwrap(), AiMove::Pass);
    }

    #[test]
    fn test_plays_the_only_legal_move() {
        let mut game = sample_game();
        // A black warrior at the standard start square has exactly one
        // line neighbor of its color.
        let card = card_from_roster("Warrior", Color::Black);
        game.players[0].as_mut().unwrap().deck.hand = vec![card];

        let chosen = choose_move(&game).unwrap();
        assert_eq!(
            chosen,
            AiMove::Play {
                name: "Warrior".into(),
                color: Color::Black,
                destination: Coord::new(7, 7),
            }
        );
    }

    #[test]
    fn test_discards_cheapest_dead_card() {
        let mut game = sample_game();
        // Neither card can move off the start square: no red or
        // yellow line neighbors exist there.
        let king = card_from_roster("King", Color::Yellow);
        let warrior = card_from_roster("Warrior", Color::Red);
        game.players[0].as_mut().unwrap().deck.hand = vec![king, warrior];

        let chosen = choose_move(&game).unwrap();
        assert_eq!(
            chosen,
            AiMove::Discard {
                name: "Warrior".into(),
                color: Color::Red,
            }
        );
    }

    #[test]
    fn test_passes_on_empty_hand() {
        let mut game = sample_game();
        game.players[0].as_mut().unwrap().deck.hand.clear();
        assert_eq!(choose_move(&game).unwrap(), AiMove::Pass);
    }

    #[test]
    fn test_improving_move_shrinks_distance() {
        let game = sample_game();
        let player = game.player(0).unwrap();
        let aim = game.aim_squares(0).unwrap();
        let here = walking_distance(&game, player.position, &aim);

        if let AiMove::Play { name, color, destination } = choose_move(&game).unwrap() {
            let card = player.deck.find_in_hand(&name, color).unwrap();
            assert!(card
                .reachable_squares(&game.board, player.position)
                .contains(&destination));
            assert!(walking_distance(&game, destination, &aim) <= here);
        }
    }
}

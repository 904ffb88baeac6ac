//! A player's deck: hand, stock, graveyard

use crate::board::Color;
use crate::cards::Card;
use crate::error::{Result, RondelError};
use serde::{Deserialize, Serialize};

/// The three-way card partition owned by one player
///
/// A card is always in exactly one of the lists. Drawing reshuffles
/// the graveyard back into the stock once the stock runs out, so only
/// the cards currently in hand are ever unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub hand: Vec<Card>,
    pub stock: Vec<Card>,
    pub graveyard: Vec<Card>,
}

impl Deck {
    /// Shuffle `cards` and deal an opening hand
    pub fn deal(cards: Vec<Card>, hand_size: usize, rng: &mut impl rand::Rng) -> Self {
        let mut deck = Deck {
            hand: Vec::with_capacity(hand_size),
            stock: cards,
            graveyard: Vec::new(),
        };
        deck.shuffle_stock(rng);
        deck.refill(hand_size, rng);
        deck
    }

    fn shuffle_stock(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.stock.shuffle(rng);
    }

    pub fn find_in_hand(&self, name: &str, color: Color) -> Option<&Card> {
        self.hand.iter().find(|c| c.name == name && c.color == color)
    }

    /// Move a card from hand to graveyard
    pub fn play(&mut self, name: &str, color: Color) -> Result<()> {
        let pos = self
            .hand
            .iter()
            .position(|c| c.name == name && c.color == color)
            .ok_or_else(|| RondelError::CardNotInHand {
                name: name.to_string(),
                color,
            })?;
        // Keep removal order-preserving so controllers iterate hands
        // deterministically.
        let card = self.hand.remove(pos);
        self.graveyard.push(card);
        Ok(())
    }

    /// Draw from the stock until the hand holds `hand_size` cards,
    /// reshuffling the graveyard into the stock when it runs dry
    pub fn refill(&mut self, hand_size: usize, rng: &mut impl rand::Rng) {
        while self.hand.len() < hand_size {
            if self.stock.is_empty() {
                if self.graveyard.is_empty() {
                    break;
                }
                self.stock.append(&mut self.graveyard);
                self.shuffle_stock(rng);
            }
            if let Some(card) = self.stock.pop() {
                self.hand.push(card);
            }
        }
    }

    /// Restore every card's printed colors and steps
    pub fn revert_to_default(&mut self) {
        for card in self.cards_mut() {
            card.revert_to_default();
        }
    }

    /// Iterate every card in the deck, hand first
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.hand
            .iter()
            .chain(self.stock.iter())
            .chain(self.graveyard.iter())
    }

    /// Mutable iteration over every card; trump effects use this so a
    /// freshly drawn card carries them too
    pub fn cards_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.hand
            .iter_mut()
            .chain(self.stock.iter_mut())
            .chain(self.graveyard.iter_mut())
    }

    pub fn total_cards(&self) -> usize {
        self.hand.len() + self.stock.len() + self.graveyard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ColorSet;
    use crate::cards::MovementKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn small_pool() -> Vec<Card> {
        let mut cards = Vec::new();
        for color in Color::PLAYABLE {
            let colors: ColorSet = [color].into_iter().collect();
            cards.push(Card::new("Warrior", color, colors, 1, 100, [MovementKind::Line]));
            cards.push(Card::new(
                "Wizard",
                color,
                colors,
                1,
                200,
                [MovementKind::Line, MovementKind::Diagonal],
            ));
        }
        cards
    }

    #[test]
    fn test_deal_partitions_the_pool() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let deck = Deck::deal(small_pool(), 5, &mut rng);

        assert_eq!(deck.hand.len(), 5);
        assert_eq!(deck.stock.len(), 3);
        assert!(deck.graveyard.is_empty());
        assert_eq!(deck.total_cards(), 8);
    }

    #[test]
    fn test_play_moves_hand_to_graveyard() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut deck = Deck::deal(small_pool(), 5, &mut rng);
        let card = deck.hand[0].clone();

        deck.play(&card.name, card.color).unwrap();
        assert_eq!(deck.hand.len(), 4);
        assert_eq!(deck.graveyard.len(), 1);
        assert_eq!(deck.total_cards(), 8);

        let missing = deck.play("Assassin", Color::Red).unwrap_err();
        assert!(matches!(missing, RondelError::CardNotInHand { .. }));
    }

    #[test]
    fn test_refill_reshuffles_the_graveyard() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut deck = Deck::deal(small_pool(), 5, &mut rng);

        // Burn through the whole stock.
        for _ in 0..5 {
            let card = deck.hand[0].clone();
            deck.play(&card.name, card.color).unwrap();
            deck.refill(5, &mut rng);
        }
        assert_eq!(deck.hand.len(), 5);
        assert_eq!(deck.total_cards(), 8);
        // Stock and graveyard together hold the other three cards.
        assert_eq!(deck.stock.len() + deck.graveyard.len(), 3);
    }

    #[test]
    fn test_refill_with_everything_in_hand() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut deck = Deck::deal(small_pool(), 8, &mut rng);

        deck.refill(10, &mut rng);
        assert_eq!(deck.hand.len(), 8);
    }
}

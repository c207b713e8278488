use std::collections::VecDeque;

use super::globals::*;
use super::rng::GameRng;

#[derive(Clone, Debug)]
/// A shuffled pile of event cards. Drawn cards go back to the bottom,
/// so the deck never runs out.
pub struct EventDeck {
    kind: DeckKind,
    cards: VecDeque<Card>,
}

impl EventDeck {
    /// Return the printed cards of `kind`, shuffled.
    pub fn shuffled(kind: DeckKind, rng: &mut GameRng) -> Self {
        let mut cards = deck_cards(kind).to_vec();
        rng.shuffle(&mut cards);

        Self {
            kind,
            cards: cards.into(),
        }
    }

    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Take the top card and put it back at the bottom.
    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.pop_front()?;
        self.cards.push_back(card);
        Some(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_cycles() {
        let mut deck = EventDeck::shuffled(DeckKind::CommunityChest, &mut GameRng::new(3));
        let first_pass: Vec<Card> = (0..16).filter_map(|_| deck.draw()).collect();
        let second_pass: Vec<Card> = (0..16).filter_map(|_| deck.draw()).collect();

        assert_eq!(deck.len(), 16);
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_shuffle_keeps_every_card() {
        let mut deck = EventDeck::shuffled(DeckKind::Chance, &mut GameRng::new(11));
        let mut drawn: Vec<&str> = (0..16).filter_map(|_| deck.draw()).map(|c| c.text).collect();
        let mut printed: Vec<&str> = CHANCE_CARDS.iter().map(|c| c.text).collect();

        drawn.sort_unstable();
        printed.sort_unstable();
        assert_eq!(drawn, printed);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = EventDeck::shuffled(DeckKind::Chance, &mut GameRng::new(5));
        let mut b = EventDeck::shuffled(DeckKind::Chance, &mut GameRng::new(5));

        for _ in 0..16 {
            assert_eq!(a.draw(), b.draw());
        }
        assert_eq!(a.kind(), DeckKind::Chance);
    }
}

mod details;
pub use details::*;

use lazy_static::lazy_static;

/// The number of tiles around the board.
pub const BOARD_SIZE: usize = 40;

/// Position of the 'Go' tile.
pub const GO_POSITION: usize = 0;

/// Position of the jail tile. Players sent to jail land here directly.
pub const JAIL_POSITION: usize = 10;

/// The number of consecutive doubles that sends a player to jail.
pub const MAX_DOUBLES: u8 = 3;

/// The lap every player starts on.
pub const FIRST_LAP: u32 = 1;

/// Balance each player starts the game with.
pub const DEFAULT_STARTING_BALANCE: Money = 1500;

/// Salary paid by the bank whenever a player passes 'Go'.
pub const DEFAULT_GO_SALARY: Money = 2000;

/// Fine paid to leave jail when the player has no favor card.
pub const DEFAULT_JAIL_FINE: Money = 500;

/// The Singapore-edition board, as a JSON schema.
pub const STANDARD_SCHEMA_JSON: &str = include_str!("standard_board.json");

lazy_static! {
    /// The 16 Chance cards, in their printed order.
    pub static ref CHANCE_CARDS: Vec<Card> = vec![
        Card::new("Advance to Go", CardEffect::AdvanceTo(0)),
        Card::new("Advance to Grange Road", CardEffect::AdvanceTo(24)),
        Card::new("Advance to Tiong Bahru Road", CardEffect::AdvanceTo(11)),
        Card::new("Advance to the Electricity Board", CardEffect::AdvanceTo(12)),
        Card::new("Take a trip to Tanjong Pagar Station", CardEffect::AdvanceTo(5)),
        Card::new("Advance to Marina Bay", CardEffect::AdvanceTo(39)),
        Card::new("Advance to Keppel Station", CardEffect::AdvanceTo(15)),
        Card::new("Bank pays you a dividend", CardEffect::Collect(500)),
        Card::new("Get out of jail free", CardEffect::GetOutOfJail),
        Card::new("Go back three spaces", CardEffect::MoveBack(3)),
        Card::new("Go directly to jail", CardEffect::GoToJail),
        Card::new(
            "Make general repairs on all your property",
            CardEffect::Repairs { per_house: 250, per_hotel: 1000 },
        ),
        Card::new("Speeding fine", CardEffect::Pay(150)),
        Card::new("You have been elected chairman of the board", CardEffect::PayEachPlayer(500)),
        Card::new("Your building loan matures", CardEffect::Collect(1500)),
        Card::new("You have won a crossword competition", CardEffect::Collect(1000)),
    ];

    /// The 16 Community Chest cards, in their printed order.
    pub static ref COMMUNITY_CHEST_CARDS: Vec<Card> = vec![
        Card::new("Advance to Go", CardEffect::AdvanceTo(0)),
        Card::new("Bank error in your favor", CardEffect::Collect(2000)),
        Card::new("Doctor's fee", CardEffect::Pay(500)),
        Card::new("From sale of stock you get", CardEffect::Collect(500)),
        Card::new("Get out of jail free", CardEffect::GetOutOfJail),
        Card::new("Go directly to jail", CardEffect::GoToJail),
        Card::new("Holiday fund matures", CardEffect::Collect(1000)),
        Card::new("Income tax refund", CardEffect::Collect(200)),
        Card::new("It is your birthday", CardEffect::CollectFromEachPlayer(100)),
        Card::new("Life insurance matures", CardEffect::Collect(1000)),
        Card::new("Pay hospital fees", CardEffect::Pay(1000)),
        Card::new("Pay school fees", CardEffect::Pay(500)),
        Card::new("Receive consultancy fee", CardEffect::Collect(250)),
        Card::new(
            "You are assessed for street repairs",
            CardEffect::Repairs { per_house: 400, per_hotel: 1150 },
        ),
        Card::new("You have won second prize in a beauty contest", CardEffect::Collect(100)),
        Card::new("You inherit", CardEffect::Collect(1000)),
    ];
}

/// Return the printed cards of the specified deck.
pub fn deck_cards(kind: DeckKind) -> &'static [Card] {
    match kind {
        DeckKind::Chance => &CHANCE_CARDS,
        DeckKind::CommunityChest => &COMMUNITY_CHEST_CARDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_deck_has_sixteen_cards() {
        assert_eq!(deck_cards(DeckKind::Chance).len(), 16);
        assert_eq!(deck_cards(DeckKind::CommunityChest).len(), 16);
    }

    #[test]
    fn test_advance_targets_are_on_the_board() {
        for card in CHANCE_CARDS.iter().chain(COMMUNITY_CHEST_CARDS.iter()) {
            if let CardEffect::AdvanceTo(target) = card.effect {
                assert!(target < BOARD_SIZE, "{} points off the board", card.text);
            }
        }
    }
}

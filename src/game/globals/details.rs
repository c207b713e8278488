use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An amount of money. Signed because a balance may dip below
/// zero until the ledger liquidates enough assets to cover it.
pub type Money = i64;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// The unique identifier of a player's token on the board.
pub struct Token(String);

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The color sets of purchasable tiles. Railroads and utilities
/// form their own groups so that their rent scales the same way.
pub enum Color {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    Blue,
    Railroad,
    Utility,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// A construct that can be built on a property tile.
pub enum ConstructKind {
    House,
    Hotel,
}

impl ConstructKind {
    /// The maximum number of this construct a single property can hold.
    pub fn capacity(self) -> u8 {
        match self {
            ConstructKind::House => 4,
            ConstructKind::Hotel => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The two event card decks.
pub enum DeckKind {
    Chance,
    CommunityChest,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// What happens to the player who draws an event card.
pub enum CardEffect {
    /// Receive money from the bank.
    Collect(Money),
    /// Pay money to the bank.
    Pay(Money),
    /// Move forward to a specific tile, collecting the salary if 'Go' is passed.
    AdvanceTo(usize),
    /// Move backwards by a number of tiles. Never passes 'Go'.
    MoveBack(usize),
    /// Go directly to jail.
    GoToJail,
    /// Keep a favor card that gets the player out of jail.
    GetOutOfJail,
    /// Pay every other player still in the game.
    PayEachPlayer(Money),
    /// Collect from every other player still in the game.
    CollectFromEachPlayer(Money),
    /// Pay the bank for every construct the player owns.
    Repairs { per_house: Money, per_hotel: Money },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// An event card.
pub struct Card {
    pub text: &'static str,
    pub effect: CardEffect,
}

impl Card {
    pub const fn new(text: &'static str, effect: CardEffect) -> Card {
        Card { text, effect }
    }
}

#[derive(Clone, Debug)]
/// A player playing the game.
pub struct Player {
    /// The token identifying this player.
    pub token: Token,
    /// The amount of money the player has.
    pub balance: Money,
    /// Positions of the tiles the player owns, grouped by their color set.
    pub assets: BTreeMap<Color, BTreeSet<usize>>,
    /// The number of "get out of jail" favor cards the player holds.
    pub favors: u32,
    /// Whether the player is currently in jail.
    pub in_jail: bool,
    /// Whether the player has gone bankrupt and left the rotation.
    pub bankrupt: bool,
}

impl Player {
    /// Create a player with the specified starting balance.
    pub fn new(token: Token, balance: Money) -> Player {
        Player {
            token,
            balance,
            assets: BTreeMap::new(),
            favors: 0,
            in_jail: false,
            bankrupt: false,
        }
    }

    /// Reduce the balance of this player.
    pub fn pay(&mut self, amount: Money) {
        self.balance -= amount;
    }

    /// Increase the balance of this player.
    pub fn receive(&mut self, amount: Money) {
        self.balance += amount;
    }

    /// Record a tile as one of this player's assets.
    pub fn asset_acquire(&mut self, color: Color, position: usize) {
        self.assets.entry(color).or_default().insert(position);
    }

    /// Remove a tile from this player's assets. Return whether the player owned it.
    pub fn asset_liquidate(&mut self, color: Color, position: usize) -> bool {
        let Some(group) = self.assets.get_mut(&color) else {
            return false;
        };
        let removed = group.remove(&position);

        // Drop empty color sets so `assets` only lists colors the player actually holds
        if group.is_empty() {
            self.assets.remove(&color);
        }

        removed
    }

    /// Positions of every tile the player owns, in board order.
    pub fn asset_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.assets.values().flatten().copied().collect();
        positions.sort_unstable();
        positions
    }

    /// The number of tiles the player owns.
    pub fn asset_count(&self) -> usize {
        self.assets.values().map(BTreeSet::len).sum()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.bankrupt {
            "bankrupt"
        } else if self.in_jail {
            "jailed"
        } else {
            "free"
        };

        write!(
            f,
            "{} ${} {} tiles {} favors ({})",
            self.token,
            self.balance,
            self.asset_count(),
            self.favors,
            status
        )
    }
}

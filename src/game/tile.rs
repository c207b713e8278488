use serde::{Deserialize, Serialize};

use super::error::{GameError, GameResult};
use super::globals::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Amounts keyed by what they apply to. Used both for what a deed costs
/// and for what it charges visitors.
pub struct Schedule {
    /// For costs, the price of the title. For fees, the rent charged
    /// per same-color tile owned by the tile's owner.
    pub title: Money,
    #[serde(default)]
    pub house: Money,
    #[serde(default)]
    pub hotel: Money,
}

impl Schedule {
    /// The amount this schedule lists for a construct.
    pub fn construct(&self, kind: ConstructKind) -> Money {
        match kind {
            ConstructKind::House => self.house,
            ConstructKind::Hotel => self.hotel,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Houses and hotels standing on a property.
pub struct Constructs {
    pub houses: u8,
    pub hotels: u8,
}

impl Constructs {
    /// The number of constructs of the specified kind.
    pub fn count(&self, kind: ConstructKind) -> u8 {
        match kind {
            ConstructKind::House => self.houses,
            ConstructKind::Hotel => self.hotels,
        }
    }

    /// Whether nothing has been built.
    pub fn is_empty(&self) -> bool {
        self.houses == 0 && self.hotels == 0
    }
}

#[derive(Clone, Debug)]
/// The title deed of a purchasable tile.
pub struct Deed {
    /// The color set that the tile belongs to.
    pub color: Color,
    /// What the title and each construct cost.
    pub cost: Schedule,
    /// What a visitor is charged.
    pub fees: Schedule,
    /// The player who owns this tile, if any.
    pub owner: Option<Token>,
    /// `None` for infrastructure, which can't be built on.
    constructs: Option<Constructs>,
}

impl Deed {
    /// Return an unowned property deed.
    pub fn property(color: Color, cost: Schedule, fees: Schedule) -> Deed {
        Deed {
            color,
            cost,
            fees,
            owner: None,
            constructs: Some(Constructs::default()),
        }
    }

    /// Return an unowned railroad or utility deed.
    pub fn infrastructure(color: Color, cost: Schedule, fees: Schedule) -> Deed {
        Deed {
            color,
            cost,
            fees,
            owner: None,
            constructs: None,
        }
    }

    /// The constructs standing on this deed's tile, or `None` for infrastructure.
    pub fn constructs(&self) -> Option<Constructs> {
        self.constructs
    }

    /// What selling every construct on this deed returns.
    fn constructs_value(&self) -> Money {
        self.constructs.map_or(0, |c| {
            Money::from(c.houses) * self.cost.house + Money::from(c.hotels) * self.cost.hotel
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Tiles that don't involve money.
pub enum StaticKind {
    Go,
    JustVisiting,
    FreeParking,
    GoToJail,
}

#[derive(Clone, Debug)]
/// What a tile is and what it can do.
pub enum TileKind {
    /// A street that can hold houses and hotels.
    Property(Deed),
    /// A railroad or utility.
    Infrastructure(Deed),
    /// Landing here draws a card from the deck.
    Event(DeckKind),
    /// Landing here pays a flat amount to the bank.
    Tax(Money),
    Static(StaticKind),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Something a player can, or must, do after landing on a tile.
pub enum Action {
    /// Do nothing.
    Pass,
    /// Buy the title of an unowned tile from the bank.
    Acquire { tile: usize, price: Money },
    /// Build on a property the player owns.
    AddConstruct {
        tile: usize,
        kind: ConstructKind,
        price: Money,
    },
    /// Pay rent to the owner of the tile.
    PayRent {
        tile: usize,
        owner: Token,
        amount: Money,
    },
    /// Pay a flat tax to the bank.
    PayTax { tile: usize, amount: Money },
    /// Draw the top card of a deck.
    DrawCard(DeckKind),
    GoToJail,
}

impl Action {
    /// Whether the action happens regardless of what the player chooses.
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            Action::PayRent { .. } | Action::PayTax { .. } | Action::DrawCard(_) | Action::GoToJail
        )
    }
}

#[derive(Clone, Debug)]
/// A tile on the board.
pub struct Tile {
    pub name: String,
    /// The tile's position around the board. 'Go' is at 0.
    pub index: usize,
    pub kind: TileKind,
}

impl Tile {
    /*********        GETTERS        *********/

    /// The deed of a purchasable tile.
    pub fn deed(&self) -> Option<&Deed> {
        match &self.kind {
            TileKind::Property(deed) | TileKind::Infrastructure(deed) => Some(deed),
            _ => None,
        }
    }

    fn deed_mut(&mut self) -> Option<&mut Deed> {
        match &mut self.kind {
            TileKind::Property(deed) | TileKind::Infrastructure(deed) => Some(deed),
            _ => None,
        }
    }

    pub fn is_purchasable(&self) -> bool {
        self.deed().is_some()
    }

    /// The color set of a purchasable tile.
    pub fn color(&self) -> Option<Color> {
        self.deed().map(|deed| deed.color)
    }

    pub fn owner(&self) -> Option<&Token> {
        self.deed().and_then(|deed| deed.owner.as_ref())
    }

    /// Constructs on a property tile. `None` for every other kind of tile.
    pub fn constructs(&self) -> Option<Constructs> {
        self.deed().and_then(Deed::constructs)
    }

    /// What the bank pays for this tile and everything built on it.
    pub fn liquidation_value(&self) -> Money {
        self.deed()
            .map_or(0, |deed| deed.cost.title + deed.constructs_value())
    }

    /*********        CHARGES        *********/

    /// Calculate the charges upon a visitor. `n_tile` is the number of same-color
    /// tiles owned by the owner of this tile, which only the board knows.
    pub fn get_charges(&self, n_tile: u32) -> Money {
        match &self.kind {
            TileKind::Property(deed) | TileKind::Infrastructure(deed) => {
                // Charges on the title
                let title_fee = deed.fees.title * Money::from(n_tile);

                // Charges on the constructed properties
                let construct_fee = deed.constructs.map_or(0, |c| {
                    Money::from(c.houses) * deed.fees.house + Money::from(c.hotels) * deed.fees.hotel
                });

                title_fee + construct_fee
            }
            TileKind::Tax(amount) => *amount,
            TileKind::Event(_) | TileKind::Static(_) => 0,
        }
    }

    /*********        OWNERSHIP        *********/

    /// Purchase this tile. Return the cost of the title.
    pub fn acquire(&mut self, token: &Token) -> GameResult<Money> {
        let index = self.index;
        let deed = self.deed_mut().ok_or(GameError::NotPurchasable(index))?;

        if let Some(owner) = &deed.owner {
            return Err(GameError::AlreadyOwned {
                tile: index,
                owner: owner.clone(),
            });
        }

        deed.owner = Some(token.clone());
        Ok(deed.cost.title)
    }

    /// Sell the title of this tile back to the bank. Return the proceeds.
    /// Constructs have to be sold first.
    pub fn liquidate(&mut self) -> GameResult<Money> {
        let index = self.index;
        let deed = self.deed_mut().ok_or(GameError::NotPurchasable(index))?;

        if deed.constructs.map_or(false, |c| !c.is_empty()) {
            return Err(GameError::InvalidConstructOperation {
                tile: index,
                reason: "constructs must be sold before the title",
            });
        }

        deed.owner = None;
        Ok(deed.cost.title)
    }

    /// Sell every construct on this tile, hotel first. Return the proceeds.
    pub fn sell_constructs(&mut self) -> Money {
        let Some(deed) = self.deed_mut() else {
            return 0;
        };

        let proceeds = deed.constructs_value();
        if let Some(constructs) = deed.constructs.as_mut() {
            *constructs = Constructs::default();
        }

        proceeds
    }

    /*********        CONSTRUCTS        *********/

    /// Check whether a construct of the specified kind can be added to this tile.
    /// Rules:
    ///     1. House capacity: 4. Hotel capacity: 1.
    ///     2. House capacity needs to be maxed first before a hotel can be built.
    pub fn can_add_construct(&self, kind: ConstructKind) -> GameResult<()> {
        let invalid = |reason| GameError::InvalidConstructOperation {
            tile: self.index,
            reason,
        };

        let constructs = match &self.kind {
            TileKind::Property(deed) => deed.constructs.unwrap_or_default(),
            TileKind::Infrastructure(_) => return Err(invalid("infrastructure cannot hold constructs")),
            _ => return Err(GameError::NotPurchasable(self.index)),
        };

        if constructs.count(kind) >= kind.capacity() {
            return Err(invalid(match kind {
                ConstructKind::House => "house capacity reached",
                ConstructKind::Hotel => "hotel capacity reached",
            }));
        }

        if kind == ConstructKind::Hotel && constructs.houses < ConstructKind::House.capacity() {
            return Err(invalid("houses must be maxed before a hotel"));
        }

        Ok(())
    }

    /// Add a house or hotel to this tile. Return the cost of construction.
    /// Nothing changes when the construct is rejected.
    pub fn add_construct(&mut self, kind: ConstructKind) -> GameResult<Money> {
        self.can_add_construct(kind)?;

        let index = self.index;
        let deed = self.deed_mut().ok_or(GameError::NotPurchasable(index))?;
        let constructs = deed.constructs.get_or_insert_with(Constructs::default);

        match kind {
            ConstructKind::House => constructs.houses += 1,
            ConstructKind::Hotel => constructs.hotels += 1,
        }

        Ok(deed.cost.construct(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geylang_road() -> Tile {
        Tile {
            name: "Geylang Road".to_owned(),
            index: 1,
            kind: TileKind::Property(Deed::property(
                Color::Brown,
                Schedule { title: 600, house: 500, hotel: 500 },
                Schedule { title: 20, house: 100, hotel: 2500 },
            )),
        }
    }

    fn keppel_station() -> Tile {
        Tile {
            name: "Keppel Station".to_owned(),
            index: 15,
            kind: TileKind::Infrastructure(Deed::infrastructure(
                Color::Railroad,
                Schedule { title: 2000, ..Schedule::default() },
                Schedule { title: 250, ..Schedule::default() },
            )),
        }
    }

    #[test]
    fn test_acquire_and_liquidate() {
        let mut tile = geylang_road();
        let apple = Token::from("apple");

        assert_eq!(tile.acquire(&apple).unwrap(), 600);
        assert_eq!(tile.owner(), Some(&apple));

        let err = tile.acquire(&Token::from("boot")).unwrap_err();
        assert!(matches!(err, GameError::AlreadyOwned { tile: 1, .. }));

        assert_eq!(tile.liquidate().unwrap(), 600);
        assert_eq!(tile.owner(), None);
    }

    #[test]
    fn test_fifth_house_is_rejected() {
        let mut tile = geylang_road();

        for _ in 0..4 {
            assert_eq!(tile.add_construct(ConstructKind::House).unwrap(), 500);
        }

        let err = tile.add_construct(ConstructKind::House).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidConstructOperation {
                reason: "house capacity reached",
                ..
            }
        ));
        assert_eq!(tile.constructs().unwrap().houses, 4);
    }

    #[test]
    fn test_hotel_needs_four_houses() {
        let mut tile = geylang_road();
        tile.add_construct(ConstructKind::House).unwrap();

        let err = tile.add_construct(ConstructKind::Hotel).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidConstructOperation {
                reason: "houses must be maxed before a hotel",
                ..
            }
        ));
        assert_eq!(tile.constructs(), Some(Constructs { houses: 1, hotels: 0 }));

        for _ in 0..3 {
            tile.add_construct(ConstructKind::House).unwrap();
        }
        assert_eq!(tile.add_construct(ConstructKind::Hotel).unwrap(), 500);
        assert!(tile.add_construct(ConstructKind::Hotel).is_err());
    }

    #[test]
    fn test_infrastructure_cannot_build() {
        let mut tile = keppel_station();
        assert!(matches!(
            tile.add_construct(ConstructKind::House),
            Err(GameError::InvalidConstructOperation { tile: 15, .. })
        ));
        assert_eq!(tile.constructs(), None);
    }

    #[test]
    fn test_charges_scale_with_color_count_and_constructs() {
        let mut tile = geylang_road();
        assert_eq!(tile.get_charges(1), 20);
        assert_eq!(tile.get_charges(2), 40);

        tile.add_construct(ConstructKind::House).unwrap();
        tile.add_construct(ConstructKind::House).unwrap();
        assert_eq!(tile.get_charges(2), 40 + 200);

        assert_eq!(keppel_station().get_charges(3), 750);
    }

    #[test]
    fn test_title_sale_waits_for_constructs() {
        let mut tile = geylang_road();
        tile.acquire(&Token::from("apple")).unwrap();
        tile.add_construct(ConstructKind::House).unwrap();

        assert_eq!(tile.liquidation_value(), 1100);
        assert!(matches!(
            tile.liquidate(),
            Err(GameError::InvalidConstructOperation { .. })
        ));
        assert!(tile.owner().is_some());

        assert_eq!(tile.sell_constructs(), 500);
        assert_eq!(tile.liquidate().unwrap(), 600);
    }

    #[test]
    fn test_static_tiles_charge_nothing() {
        let tile = Tile {
            name: "Free Parking".to_owned(),
            index: 20,
            kind: TileKind::Static(StaticKind::FreeParking),
        };
        assert_eq!(tile.get_charges(4), 0);
        assert!(!tile.is_purchasable());

        let tax = Tile {
            name: "Income Tax".to_owned(),
            index: 4,
            kind: TileKind::Tax(2000),
        };
        assert_eq!(tax.get_charges(0), 2000);
    }

    #[test]
    fn test_mandatory_actions() {
        assert!(Action::GoToJail.is_mandatory());
        assert!(Action::DrawCard(DeckKind::Chance).is_mandatory());
        assert!(!Action::Pass.is_mandatory());
        assert!(!Action::Acquire { tile: 1, price: 600 }.is_mandatory());
    }
}

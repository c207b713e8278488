use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::error::{GameError, GameResult};
use super::globals::*;
use super::schema::BoardSchema;
use super::tile::{Action, StaticKind, Tile, TileKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// The result of moving a token.
pub struct Movement {
    pub from: usize,
    pub to: usize,
    /// Whether the move went past 'Go', which also starts a new lap.
    pub passed_go: bool,
}

#[derive(Clone, Debug)]
/// The tiles of the board, where every token stands on them, and who owns what.
pub struct Board {
    tiles: Vec<Tile>,
    /// `HashMap<token, position>` for every player still on the board.
    positions: HashMap<Token, usize>,
    /// `HashMap<token, lap>`. Every token starts on lap 1.
    laps: HashMap<Token, u32>,
    /// `HashMap<color, HashMap<token, tiles_owned>>`, kept in step with tile ownership.
    color_groups: HashMap<Color, HashMap<Token, u32>>,
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens: Vec<&Token> = self.positions.keys().collect();
        tokens.sort();

        for token in tokens {
            let position = self.positions[token];
            writeln!(
                f,
                "{} [\x1b[36m{:02}\x1b[0m] {} (lap \x1b[33m{}\x1b[0m)",
                token, position, self.tiles[position].name, self.laps[token]
            )?;
        }

        Ok(())
    }
}

impl Board {
    /*********        INITIALISATION INTERFACES        *********/

    /// Return a new board built from `schema`, with every token on 'Go'.
    pub fn new(tokens: &[Token], schema: &BoardSchema) -> GameResult<Self> {
        let tiles = schema.build()?;

        Ok(Self {
            tiles,
            positions: tokens.iter().map(|t| (t.clone(), GO_POSITION)).collect(),
            laps: tokens.iter().map(|t| (t.clone(), FIRST_LAP)).collect(),
            color_groups: HashMap::new(),
        })
    }

    /// Return a new Singapore-edition board.
    pub fn standard(tokens: &[Token]) -> GameResult<Self> {
        Board::new(tokens, &BoardSchema::standard()?)
    }

    /*********        GETTERS        *********/

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> GameResult<&Tile> {
        self.tiles.get(index).ok_or(GameError::InvalidPosition(index))
    }

    fn tile_mut(&mut self, index: usize) -> GameResult<&mut Tile> {
        self.tiles
            .get_mut(index)
            .ok_or(GameError::InvalidPosition(index))
    }

    /// The position of a token around the board.
    pub fn position(&self, token: &Token) -> GameResult<usize> {
        self.positions
            .get(token)
            .copied()
            .ok_or_else(|| GameError::UnknownPlayer(token.clone()))
    }

    /// The lap a token is on.
    pub fn lap(&self, token: &Token) -> GameResult<u32> {
        self.laps
            .get(token)
            .copied()
            .ok_or_else(|| GameError::UnknownPlayer(token.clone()))
    }

    /// The number of tiles of the specified color owned by `token`.
    pub fn color_count(&self, color: Color, token: &Token) -> u32 {
        self.color_groups
            .get(&color)
            .and_then(|owners| owners.get(token))
            .copied()
            .unwrap_or(0)
    }

    /// The number of owned tiles of the specified color, across all players.
    pub fn owned_in_color(&self, color: Color) -> u32 {
        self.color_groups
            .get(&color)
            .map_or(0, |owners| owners.values().sum())
    }

    /// What a visitor to the specified tile owes its owner, or the bank for taxes.
    pub fn rent_due(&self, index: usize) -> GameResult<Money> {
        let tile = self.tile(index)?;

        Ok(match (tile.color(), tile.owner()) {
            (Some(color), Some(owner)) => tile.get_charges(self.color_count(color, owner)),
            // Nobody collects rent on an unowned title
            (Some(_), None) => 0,
            _ => tile.get_charges(0),
        })
    }

    /*********        MOVEMENT        *********/

    /// Move a token forward by the specified amount of tiles.
    pub fn move_by_steps(&mut self, token: &Token, steps: u32) -> GameResult<Movement> {
        let from = self.position(token)?;
        let travelled = from + steps as usize;

        let movement = Movement {
            from,
            to: travelled % BOARD_SIZE,
            passed_go: travelled / BOARD_SIZE > 0,
        };
        self.apply(token, movement);

        Ok(movement)
    }

    /// Move a token forward to the specified tile. Wrapping around to
    /// a lower index means the token went past 'Go'.
    pub fn move_to_index(&mut self, token: &Token, index: usize) -> GameResult<Movement> {
        if index >= BOARD_SIZE {
            return Err(GameError::InvalidPosition(index));
        }
        let from = self.position(token)?;

        let movement = Movement {
            from,
            to: index,
            passed_go: index < from,
        };
        self.apply(token, movement);

        Ok(movement)
    }

    /// Move a token backwards. Going backwards never counts as passing 'Go'.
    pub fn move_back(&mut self, token: &Token, steps: usize) -> GameResult<Movement> {
        let from = self.position(token)?;

        let movement = Movement {
            from,
            to: (from + BOARD_SIZE - steps % BOARD_SIZE) % BOARD_SIZE,
            passed_go: false,
        };
        self.apply(token, movement);

        Ok(movement)
    }

    /// Put a token straight onto the jail tile without passing 'Go'.
    pub fn send_to_jail(&mut self, token: &Token) -> GameResult<Movement> {
        let from = self.position(token)?;

        let movement = Movement {
            from,
            to: JAIL_POSITION,
            passed_go: false,
        };
        self.apply(token, movement);

        Ok(movement)
    }

    fn apply(&mut self, token: &Token, movement: Movement) {
        self.positions.insert(token.clone(), movement.to);

        // A lap is counted exactly once per move that wraps past 'Go'
        if movement.passed_go {
            *self.laps.entry(token.clone()).or_insert(FIRST_LAP) += 1;
        }

        debug!(
            %token,
            from = movement.from,
            to = movement.to,
            passed_go = movement.passed_go,
            "token moved"
        );
    }

    /*********        OWNERSHIP        *********/

    /// Hand the title of a tile to `token`. Return the price of the title.
    pub fn assign_owner(&mut self, index: usize, token: &Token) -> GameResult<Money> {
        let tile = self.tile_mut(index)?;
        let price = tile.acquire(token)?;

        if let Some(color) = tile.color() {
            *self
                .color_groups
                .entry(color)
                .or_default()
                .entry(token.clone())
                .or_insert(0) += 1;
        }

        Ok(price)
    }

    /// Sell a tile owned by `token` back to the bank: constructs first, then the
    /// title. Return the total proceeds.
    pub fn release(&mut self, index: usize, token: &Token) -> GameResult<Money> {
        self.check_owner(index, token)?;

        let tile = self.tile_mut(index)?;
        let proceeds = tile.sell_constructs() + tile.liquidate()?;

        self.uncount(index, token)?;
        Ok(proceeds)
    }

    /// Sell only the title of a tile owned by `token`. Rejected while
    /// constructs are still standing on it.
    pub fn sell_title(&mut self, index: usize, token: &Token) -> GameResult<Money> {
        self.check_owner(index, token)?;

        let proceeds = self.tile_mut(index)?.liquidate()?;

        self.uncount(index, token)?;
        Ok(proceeds)
    }

    /// Build a construct on a property owned by `token`. Return the cost of the construct.
    pub fn add_construct(
        &mut self,
        index: usize,
        token: &Token,
        kind: ConstructKind,
    ) -> GameResult<Money> {
        self.check_owner(index, token)?;
        self.tile_mut(index)?.add_construct(kind)
    }

    /// Take a token off the board, returning everything it still owns to the bank.
    pub fn remove_player(&mut self, token: &Token) {
        for tile in &mut self.tiles {
            if tile.owner() == Some(token) {
                tile.sell_constructs();
                // Constructs were just cleared, so the title sale can't fail
                let _ = tile.liquidate();
            }
        }

        for owners in self.color_groups.values_mut() {
            owners.remove(token);
        }
        self.positions.remove(token);
        self.laps.remove(token);
    }

    fn check_owner(&self, index: usize, token: &Token) -> GameResult<()> {
        let tile = self.tile(index)?;

        if !tile.is_purchasable() {
            return Err(GameError::NotPurchasable(index));
        }
        if tile.owner() != Some(token) {
            return Err(GameError::NotOwner {
                tile: index,
                token: token.clone(),
            });
        }

        Ok(())
    }

    /// Decrement the color count of a tile that `token` no longer owns.
    fn uncount(&mut self, index: usize, token: &Token) -> GameResult<()> {
        let Some(color) = self.tile(index)?.color() else {
            return Ok(());
        };

        if let Some(owners) = self.color_groups.get_mut(&color) {
            if let Some(count) = owners.get_mut(token) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    owners.remove(token);
                }
            }
        }

        Ok(())
    }

    /*********        LANDING        *********/

    /// Return every action available to `token` on the tile it stands on.
    /// Mandatory actions come first; `Action::Pass` is always offered.
    pub fn landing_actions(&self, token: &Token) -> GameResult<Vec<Action>> {
        let index = self.position(token)?;
        let tile = self.tile(index)?;
        let mut actions = vec![];

        match &tile.kind {
            TileKind::Property(deed) | TileKind::Infrastructure(deed) => match &deed.owner {
                None => actions.push(Action::Acquire {
                    tile: index,
                    price: deed.cost.title,
                }),
                Some(owner) if owner == token => {
                    for kind in [ConstructKind::House, ConstructKind::Hotel] {
                        if tile.can_add_construct(kind).is_ok() {
                            actions.push(Action::AddConstruct {
                                tile: index,
                                kind,
                                price: deed.cost.construct(kind),
                            });
                        }
                    }
                }
                Some(owner) => {
                    let amount = self.rent_due(index)?;
                    if amount > 0 {
                        actions.push(Action::PayRent {
                            tile: index,
                            owner: owner.clone(),
                            amount,
                        });
                    }
                }
            },
            TileKind::Event(deck) => actions.push(Action::DrawCard(*deck)),
            TileKind::Tax(amount) => actions.push(Action::PayTax {
                tile: index,
                amount: *amount,
            }),
            TileKind::Static(StaticKind::GoToJail) => actions.push(Action::GoToJail),
            TileKind::Static(_) => (),
        }

        // Mandatory actions first, then the choices, with doing nothing as the default choice
        actions.sort_by_key(|action| !action.is_mandatory());
        let first_choice = actions.iter().position(|a| !a.is_mandatory()).unwrap_or(actions.len());
        actions.insert(first_choice, Action::Pass);

        Ok(actions)
    }
}

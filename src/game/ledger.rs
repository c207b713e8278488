use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, warn};

use super::agent::Strategy;
use super::board::Board;
use super::error::{GameError, GameResult};
use super::globals::*;
use super::liquidation::Asset;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One side of a transaction.
pub enum Party {
    /// The bank never runs out of money.
    Bank,
    Player(Token),
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Bank => f.write_str("bank"),
            Party::Player(token) => write!(f, "{}", token),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// What a completed transaction did.
pub struct Receipt {
    pub amount: Money,
    /// Tiles the payer had to sell, one liquidation pass each, in the order they were sold.
    pub sold: Vec<usize>,
}

#[derive(Debug)]
/// A player and the strategy making their decisions.
pub struct Seat {
    pub player: Player,
    pub agent: Box<dyn Strategy>,
}

#[derive(Debug, Default)]
/// Every player's money and titles, and the only way to move either.
pub struct Ledger {
    seats: BTreeMap<Token, Seat>,
}

impl Ledger {
    /*********        INITIALISATION INTERFACES        *********/

    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a player with a starting balance and the strategy that plays for them.
    pub fn seat(&mut self, token: Token, balance: Money, agent: Box<dyn Strategy>) {
        let player = Player::new(token.clone(), balance);
        self.seats.insert(token, Seat { player, agent });
    }

    /*********        GETTERS        *********/

    pub fn player(&self, token: &Token) -> GameResult<&Player> {
        self.seats
            .get(token)
            .map(|seat| &seat.player)
            .ok_or_else(|| GameError::UnknownPlayer(token.clone()))
    }

    pub fn player_mut(&mut self, token: &Token) -> GameResult<&mut Player> {
        self.seat_mut(token).map(|seat| &mut seat.player)
    }

    pub fn agent_mut(&mut self, token: &Token) -> GameResult<&mut dyn Strategy> {
        let seat = self.seat_mut(token)?;
        Ok(seat.agent.as_mut())
    }

    /// Replace the strategy playing for `token`.
    pub fn set_agent(&mut self, token: &Token, agent: Box<dyn Strategy>) -> GameResult<()> {
        self.seat_mut(token)?.agent = agent;
        Ok(())
    }

    fn seat_mut(&mut self, token: &Token) -> GameResult<&mut Seat> {
        self.seats
            .get_mut(token)
            .ok_or_else(|| GameError::UnknownPlayer(token.clone()))
    }

    /// Every seated player, ordered by token.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.seats.values().map(|seat| &seat.player)
    }

    pub fn balance(&self, token: &Token) -> GameResult<Money> {
        self.player(token).map(|p| p.balance)
    }

    /// The tiles `token` could sell, with what the bank would pay for each.
    pub fn assets_for_sale(&self, board: &Board, token: &Token) -> GameResult<Vec<Asset>> {
        self.player(token)?
            .asset_positions()
            .into_iter()
            .map(|id| {
                Ok(Asset {
                    id,
                    value: board.tile(id)?.liquidation_value(),
                })
            })
            .collect()
    }

    /// A player's cash plus what every asset they hold would sell for.
    pub fn net_worth(&self, board: &Board, token: &Token) -> GameResult<Money> {
        let assets: Money = self
            .assets_for_sale(board, token)?
            .iter()
            .map(|a| a.value)
            .sum();

        Ok(self.balance(token)? + assets)
    }

    /*********        TRANSACTIONS        *********/

    /// Move `amount` from `payer` to `payee`. If the payer ends up short, their agent
    /// is asked for assets to sell until the balance is covered.
    ///
    /// Fails with `GameError::Bankruptcy` when the payer runs out of assets first.
    /// The player is then marked bankrupt and everything they owned goes back to the bank.
    pub fn transact(
        &mut self,
        board: &mut Board,
        payer: &Party,
        payee: &Party,
        amount: Money,
    ) -> GameResult<Receipt> {
        // Check both sides before touching any balance
        if amount < 0 {
            return Err(GameError::NegativeAmount(amount));
        }
        for party in [payer, payee] {
            if let Party::Player(token) = party {
                self.player(token)?;
            }
        }

        if let Party::Player(token) = payee {
            self.player_mut(token)?.receive(amount);
        }

        let mut receipt = Receipt {
            amount,
            sold: vec![],
        };

        if let Party::Player(token) = payer {
            match self.debit(token, amount) {
                Ok(()) => (),
                Err(GameError::InsufficientFunds { shortfall, .. }) => {
                    info!(%token, shortfall, to = %payee, "liquidating to cover a payment");
                    receipt.sold = self.cover_shortfall(board, token)?;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(receipt)
    }

    /// Take money from a player. Fails with `GameError::InsufficientFunds`
    /// (after the debit) when their balance goes negative.
    fn debit(&mut self, token: &Token, amount: Money) -> GameResult<()> {
        let player = self.player_mut(token)?;
        player.pay(amount);

        if player.balance < 0 {
            return Err(GameError::InsufficientFunds {
                token: token.clone(),
                shortfall: -player.balance,
            });
        }

        Ok(())
    }

    /// Sell assets chosen by the player's agent until their balance is non-negative.
    /// Return the tiles sold.
    fn cover_shortfall(&mut self, board: &mut Board, token: &Token) -> GameResult<Vec<usize>> {
        let mut sold = vec![];

        loop {
            let balance = self.balance(token)?;
            if balance >= 0 {
                return Ok(sold);
            }

            let assets = self.assets_for_sale(board, token)?;
            if assets.is_empty() {
                return Err(self.declare_bankrupt(board, token));
            }

            let selection = self.agent_mut(token)?.select_assets_to_sell(&assets, -balance);
            let selection = match selection {
                Some(selection) if !selection.is_empty() => selection,
                _ => return Err(self.declare_bankrupt(board, token)),
            };

            // A selection naming an unoffered or repeated tile is a refusal
            if !is_valid_selection(&assets, &selection) {
                warn!(%token, ?selection, "rejected liquidation selection");
                return Err(self.declare_bankrupt(board, token));
            }

            for id in selection {
                // Stop as soon as the debt is covered, even if the agent picked more
                if self.balance(token)? >= 0 {
                    break;
                }

                let color = board.tile(id)?.color();
                let proceeds = board.release(id, token)?;

                let player = self.player_mut(token)?;
                if let Some(color) = color {
                    player.asset_liquidate(color, id);
                }
                player.receive(proceeds);

                info!(%token, tile = id, proceeds, balance = player.balance, "asset liquidated");
                sold.push(id);
            }
        }
    }

    /// Mark a player bankrupt and return their titles to the bank.
    /// Return the error describing the uncovered debt.
    pub fn declare_bankrupt(&mut self, board: &mut Board, token: &Token) -> GameError {
        board.remove_player(token);

        let shortfall = match self.player_mut(token) {
            Ok(player) => {
                player.bankrupt = true;
                player.assets.clear();
                -player.balance.min(0)
            }
            Err(err) => return err,
        };

        warn!(%token, shortfall, "player is bankrupt");
        GameError::Bankruptcy {
            token: token.clone(),
            shortfall,
        }
    }

    /*********        TITLES AND CONSTRUCTS        *********/

    /// Buy an unowned title from the bank. Voluntary purchases never trigger
    /// liquidation: a player who can't afford the title gets `InsufficientFunds`
    /// and nothing changes.
    pub fn acquire(&mut self, board: &mut Board, token: &Token, index: usize) -> GameResult<Receipt> {
        let tile = board.tile(index)?;
        let deed = tile.deed().ok_or(GameError::NotPurchasable(index))?;
        if let Some(owner) = &deed.owner {
            return Err(GameError::AlreadyOwned {
                tile: index,
                owner: owner.clone(),
            });
        }
        let (color, price) = (deed.color, deed.cost.title);

        self.check_affordable(token, price)?;
        board.assign_owner(index, token)?;

        let player = self.player_mut(token)?;
        player.pay(price);
        player.asset_acquire(color, index);

        info!(%token, tile = index, price, "title acquired");
        Ok(Receipt {
            amount: price,
            sold: vec![],
        })
    }

    /// Build a house or hotel on a property `token` owns. Rejected without
    /// any change when the construct breaks the building rules or isn't affordable.
    pub fn build(
        &mut self,
        board: &mut Board,
        token: &Token,
        index: usize,
        kind: ConstructKind,
    ) -> GameResult<Receipt> {
        let tile = board.tile(index)?;
        if tile.owner() != Some(token) {
            return Err(GameError::NotOwner {
                tile: index,
                token: token.clone(),
            });
        }
        tile.can_add_construct(kind)?;
        let price = tile
            .deed()
            .map_or(0, |deed| deed.cost.construct(kind));

        self.check_affordable(token, price)?;
        board.add_construct(index, token, kind)?;
        self.player_mut(token)?.pay(price);

        info!(%token, tile = index, ?kind, price, "construct built");
        Ok(Receipt {
            amount: price,
            sold: vec![],
        })
    }

    /// Sell the title of a tile back to the bank. Return the proceeds.
    pub fn sell_title(&mut self, board: &mut Board, token: &Token, index: usize) -> GameResult<Money> {
        self.player(token)?;
        let color = board.tile(index)?.color();
        let proceeds = board.sell_title(index, token)?;

        let player = self.player_mut(token)?;
        if let Some(color) = color {
            player.asset_liquidate(color, index);
        }
        player.receive(proceeds);

        Ok(proceeds)
    }

    fn check_affordable(&self, token: &Token, price: Money) -> GameResult<()> {
        let balance = self.balance(token)?;
        if balance < price {
            return Err(GameError::InsufficientFunds {
                token: token.clone(),
                shortfall: price - balance,
            });
        }

        Ok(())
    }
}

/// Whether every id in `selection` names a distinct asset from `assets`.
fn is_valid_selection(assets: &[Asset], selection: &[usize]) -> bool {
    selection.iter().enumerate().all(|(i, id)| {
        assets.iter().any(|a| a.id == *id) && !selection[..i].contains(id)
    })
}

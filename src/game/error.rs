use super::globals::{Money, Token};

/// Everything that can go wrong while setting up or playing a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A debit left the player short. The ledger recovers from this by liquidating
    /// assets, so it only escapes when the caller debits outside of `transact`.
    #[error("player {token} is short by {shortfall}")]
    InsufficientFunds { token: Token, shortfall: Money },

    /// Liquidation ran out of assets before the shortfall was covered.
    #[error("player {token} is bankrupt with {shortfall} left uncovered")]
    Bankruptcy { token: Token, shortfall: Money },

    /// Building beyond capacity, a hotel before four houses, or selling a title
    /// that still carries constructs.
    #[error("invalid construct operation on tile {tile}: {reason}")]
    InvalidConstructOperation { tile: usize, reason: &'static str },

    /// The board schema or game configuration is malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot transfer a negative amount ({0})")]
    NegativeAmount(Money),

    #[error("unknown player {0}")]
    UnknownPlayer(Token),

    #[error("position {0} is off the board")]
    InvalidPosition(usize),

    #[error("tile {0} cannot be purchased")]
    NotPurchasable(usize),

    #[error("tile {tile} is already owned by {owner}")]
    AlreadyOwned { tile: usize, owner: Token },

    #[error("tile {tile} is not owned by {token}")]
    NotOwner { tile: usize, token: Token },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the game engine.
pub type GameResult<T> = Result<T, GameError>;

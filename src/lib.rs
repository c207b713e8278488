//! Turn resolution, rent exposure, and forced liquidation for games of Monopoly.

pub mod game;

pub use game::globals::{Money, Token};
pub use game::{
    AgentKind, BoardSchema, Game, GameConfig, GameError, GameResult, Standing, TurnReport,
};

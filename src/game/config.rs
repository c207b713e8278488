use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::agent::AgentKind;
use super::error::{GameError, GameResult};
use super::globals::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A seat at the table.
pub struct PlayerConfig {
    pub token: Token,
    #[serde(default)]
    pub agent: AgentKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Everything about a game that isn't on the board. Missing fields take
/// their defaults, so `{}` is a valid configuration.
pub struct GameConfig {
    pub starting_balance: Money,
    pub go_salary: Money,
    pub jail_fine: Money,
    pub dice_faces: u8,
    pub dice_count: u8,
    /// Seed for the dice and the deck shuffles.
    pub seed: u64,
    /// Stop after this many rounds even if several players are left.
    pub max_rounds: u32,
    /// Players in turn order.
    pub players: Vec<PlayerConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
            go_salary: DEFAULT_GO_SALARY,
            jail_fine: DEFAULT_JAIL_FINE,
            dice_faces: 6,
            dice_count: 2,
            seed: 0,
            max_rounds: 200,
            players: ["apple", "boot", "car", "dog"]
                .into_iter()
                .map(|token| PlayerConfig {
                    token: Token::from(token),
                    agent: AgentKind::Naive,
                })
                .collect(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> GameResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GameResult<Self> {
        let json = fs::read_to_string(path)?;
        GameConfig::from_json(&json)
    }

    /// The tokens of every player, in turn order.
    pub fn tokens(&self) -> Vec<Token> {
        self.players.iter().map(|p| p.token.clone()).collect()
    }

    /// Reject configurations no game can be played with.
    pub fn validate(&self) -> GameResult<()> {
        if self.players.len() < 2 {
            return Err(GameError::Configuration(
                "a game needs at least two players".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for player in &self.players {
            if !seen.insert(&player.token) {
                return Err(GameError::Configuration(format!(
                    "token {} is seated twice",
                    player.token
                )));
            }
        }

        for (name, amount) in [
            ("starting_balance", self.starting_balance),
            ("go_salary", self.go_salary),
            ("jail_fine", self.jail_fine),
        ] {
            if amount < 0 {
                return Err(GameError::Configuration(format!(
                    "{} can't be negative",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_the_default() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.starting_balance, 1500);
        assert_eq!(config.tokens().len(), 4);
    }

    #[test]
    fn test_partial_json() {
        let config = GameConfig::from_json(
            r#"{
                "seed": 42,
                "players": [
                    { "token": "hat" },
                    { "token": "ship", "agent": "passive" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.go_salary, 2000);
        assert_eq!(config.players[0].agent, AgentKind::Naive);
        assert_eq!(config.players[1].agent, AgentKind::Passive);
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "players": [{ "token": "hat" }] }"#),
            Err(GameError::Configuration(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "players": [{ "token": "hat" }, { "token": "hat" }] }"#),
            Err(GameError::Configuration(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "jail_fine": -1 }"#),
            Err(GameError::Configuration(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "players": 3 }"#),
            Err(GameError::Json(_))
        ));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::GameError;
use super::globals::Money;
use super::liquidation::{select_assets_to_sell, Asset};
use super::tile::Action;

/// The "brains" of a player: every decision the rules leave up to them.
pub trait Strategy: fmt::Debug {
    /// Pick the assets to sell to raise at least `shortfall`, or `None` to give up.
    fn select_assets_to_sell(&mut self, assets: &[Asset], shortfall: Money) -> Option<Vec<usize>>;

    /// Return the index of the chosen action from `actions`.
    /// `actions` never includes payments, which happen regardless.
    fn choose_action(&mut self, actions: &[Action]) -> usize;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The strategies a player can be seated with.
pub enum AgentKind {
    /// Buys and builds whenever it's offered.
    #[default]
    Naive,
    /// Never buys or builds.
    Passive,
}

impl FromStr for AgentKind {
    type Err = GameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "naive" | "default" => Ok(AgentKind::Naive),
            "passive" => Ok(AgentKind::Passive),
            other => Err(GameError::Configuration(format!("unknown agent {:?}", other))),
        }
    }
}

/// Return a new agent of the specified kind.
pub fn create_agent(kind: AgentKind) -> Box<dyn Strategy> {
    match kind {
        AgentKind::Naive => Box::new(NaiveAgent),
        AgentKind::Passive => Box::new(PassiveAgent),
    }
}

/*********        NAIVE AGENT        *********/

#[derive(Copy, Clone, Debug, Default)]
/// Buys anything it's offered. Sells the fewest assets it can to cover a shortfall.
pub struct NaiveAgent;

impl Strategy for NaiveAgent {
    fn select_assets_to_sell(&mut self, assets: &[Asset], shortfall: Money) -> Option<Vec<usize>> {
        select_assets_to_sell(assets, shortfall)
    }

    fn choose_action(&mut self, actions: &[Action]) -> usize {
        // Buying comes before building
        let acquire = actions
            .iter()
            .position(|a| matches!(a, Action::Acquire { .. }));
        let construct = actions
            .iter()
            .position(|a| matches!(a, Action::AddConstruct { .. }));

        acquire
            .or(construct)
            .or_else(|| actions.iter().position(|a| *a == Action::Pass))
            .unwrap_or(0)
    }
}

/*********        PASSIVE AGENT        *********/

#[derive(Copy, Clone, Debug, Default)]
/// Never spends money unless it has to.
pub struct PassiveAgent;

impl Strategy for PassiveAgent {
    fn select_assets_to_sell(&mut self, assets: &[Asset], shortfall: Money) -> Option<Vec<usize>> {
        select_assets_to_sell(assets, shortfall)
    }

    fn choose_action(&mut self, actions: &[Action]) -> usize {
        actions
            .iter()
            .position(|a| *a == Action::Pass)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::globals::ConstructKind;

    fn offered() -> Vec<Action> {
        vec![
            Action::Pass,
            Action::AddConstruct {
                tile: 3,
                kind: ConstructKind::House,
                price: 500,
            },
            Action::Acquire { tile: 1, price: 600 },
        ]
    }

    #[test]
    fn test_naive_agent_buys_first() {
        let mut agent = create_agent(AgentKind::Naive);
        assert_eq!(agent.choose_action(&offered()), 2);
        assert_eq!(agent.choose_action(&offered()[..2]), 1);
        assert_eq!(agent.choose_action(&[Action::Pass]), 0);
    }

    #[test]
    fn test_passive_agent_passes() {
        let mut agent = create_agent(AgentKind::Passive);
        assert_eq!(agent.choose_action(&offered()), 0);
    }

    #[test]
    fn test_agents_sell_the_fewest_assets() {
        let assets = [Asset { id: 1, value: 600 }, Asset { id: 24, value: 2400 }];

        for kind in [AgentKind::Naive, AgentKind::Passive] {
            let mut agent = create_agent(kind);
            assert_eq!(agent.select_assets_to_sell(&assets, 2000), Some(vec![24]));
            assert_eq!(agent.select_assets_to_sell(&assets, 5000), None);
        }
    }

    #[test]
    fn test_agent_kind_from_str() {
        assert_eq!("default".parse::<AgentKind>().unwrap(), AgentKind::Naive);
        assert_eq!("naive".parse::<AgentKind>().unwrap(), AgentKind::Naive);
        assert_eq!("passive".parse::<AgentKind>().unwrap(), AgentKind::Passive);
        assert!(matches!(
            "minimax".parse::<AgentKind>(),
            Err(GameError::Configuration(_))
        ));
    }
}

use tracing::debug;

use super::dice::Dice;
use super::globals::MAX_DOUBLES;
use super::rng::GameRng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Where a turn's roll phase is at.
pub enum TurnPhase {
    /// Nothing has been rolled yet.
    AwaitRoll,
    /// The last roll was a double, so the player rolls again.
    Rolling {
        /// Consecutive doubles rolled so far.
        doubles: u8,
        /// Steps accumulated by those doubles.
        steps: u32,
    },
    /// The player moves `steps` tiles.
    Resolved { steps: u32 },
    /// Too many doubles in a row. The player goes to jail instead of moving.
    Jailed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// How a finished roll phase moves the player.
pub enum TurnOutcome {
    Move { steps: u32 },
    Jail,
}

#[derive(Clone, Debug)]
/// Drives the roll phase of one player's turn: roll, roll again on a double,
/// and go to jail on the `MAX_DOUBLES`th double in a row.
pub struct TurnResolver {
    phase: TurnPhase,
    /// Every roll made this turn, in order.
    rolls: Vec<Vec<u8>>,
}

impl Default for TurnResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnResolver {
    /*********        PUBLIC INTERFACES        *********/

    pub fn new() -> Self {
        Self {
            phase: TurnPhase::AwaitRoll,
            rolls: vec![],
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn rolls(&self) -> &[Vec<u8>] {
        &self.rolls
    }

    /// Whether the roll phase is over.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, TurnPhase::Resolved { .. } | TurnPhase::Jailed)
    }

    /// The result of the roll phase, once it's over.
    pub fn outcome(&self) -> Option<TurnOutcome> {
        match self.phase {
            TurnPhase::Resolved { steps } => Some(TurnOutcome::Move { steps }),
            TurnPhase::Jailed => Some(TurnOutcome::Jail),
            _ => None,
        }
    }

    /// Feed one roll into the state machine. Rolls made after the
    /// phase is over are ignored. Return the new phase.
    pub fn advance(&mut self, roll: Vec<u8>) -> TurnPhase {
        let (doubles, steps) = match self.phase {
            TurnPhase::AwaitRoll => (0, 0),
            TurnPhase::Rolling { doubles, steps } => (doubles, steps),
            TurnPhase::Resolved { .. } | TurnPhase::Jailed => return self.phase,
        };

        let sum: u32 = roll.iter().map(|&d| u32::from(d)).sum();
        let is_double = Dice::is_double(&roll);
        self.rolls.push(roll);

        self.phase = if !is_double {
            TurnPhase::Resolved { steps: steps + sum }
        } else if doubles + 1 >= MAX_DOUBLES {
            // The accumulated steps are forfeited
            TurnPhase::Jailed
        } else {
            TurnPhase::Rolling {
                doubles: doubles + 1,
                steps: steps + sum,
            }
        };

        self.phase
    }

    /// Roll with `roll` until the roll phase is over.
    pub fn resolve_with(&mut self, mut roll: impl FnMut() -> Vec<u8>) -> TurnOutcome {
        loop {
            if let Some(outcome) = self.outcome() {
                debug!(rolls = ?self.rolls, ?outcome, "roll phase resolved");
                return outcome;
            }

            self.advance(roll());
        }
    }

    /// Roll `dice` until the roll phase is over.
    pub fn resolve(&mut self, dice: &Dice, rng: &mut GameRng) -> TurnOutcome {
        self.resolve_with(|| dice.roll(rng))
    }
}

use std::collections::BTreeMap;

use super::error::{GameError, GameResult};
use super::globals::MAX_DOUBLES;
use super::rng::GameRng;

/// The largest number of face combinations `Dice::new` will enumerate.
const MAX_COMBINATIONS: u64 = 1_000_000;

#[derive(Debug, Copy, Clone, PartialEq)]
/// A possible outcome of rolling the dice once.
pub struct DiceRoll {
    /// The probability of rolling this specific dice configuration.
    pub probability: f64,
    /// The sum of the dice.
    pub sum: u32,
    /// Whether every die resulted in the same number.
    pub is_double: bool,
}

#[derive(Clone, Debug)]
/// Probabilities of every cumulative move a turn can produce, once rerolls on
/// doubles are accounted for.
pub struct DiceDistribution {
    /// `steps -> probability` for turns that end in a movement.
    moves: BTreeMap<u32, f64>,
    /// Probability of rolling doubles `MAX_DOUBLES` times in a row.
    jail: f64,
}

impl DiceDistribution {
    /// The probability that a turn moves the player exactly `steps` tiles.
    pub fn probability(&self, steps: u32) -> f64 {
        self.moves.get(&steps).copied().unwrap_or(0.)
    }

    /// The probability that a turn ends in jail instead of a movement.
    pub fn jail_probability(&self) -> f64 {
        self.jail
    }

    /// The smallest achievable move.
    pub fn min_move(&self) -> u32 {
        self.moves.keys().next().copied().unwrap_or(0)
    }

    /// The largest achievable move.
    pub fn max_move(&self) -> u32 {
        self.moves.keys().next_back().copied().unwrap_or(0)
    }

    /// Iterate over `(steps, probability)` pairs in increasing order of steps.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.moves.iter().map(|(&steps, &p)| (steps, p))
    }

    /// Total probability mass, movement and jail combined.
    pub fn total(&self) -> f64 {
        self.moves.values().sum::<f64>() + self.jail
    }
}

#[derive(Clone, Debug)]
/// A set of identical dice.
pub struct Dice {
    faces: u8,
    count: u8,
    /// Every distinct single-roll outcome. Doubles are listed individually
    /// and non-doubles are merged by their sum.
    significant_rolls: Vec<DiceRoll>,
    distribution: DiceDistribution,
}

impl Dice {
    /*********        INITIALISATION INTERFACES        *********/

    /// Return `count` dice with faces numbered `1..=faces`.
    pub fn new(faces: u8, count: u8) -> GameResult<Self> {
        if faces < 2 {
            return Err(GameError::Configuration(format!(
                "dice need at least 2 faces, got {}",
                faces
            )));
        }
        if count < 2 {
            return Err(GameError::Configuration(format!(
                "doubles need at least 2 dice, got {}",
                count
            )));
        }
        let combinations = u64::from(faces).checked_pow(u32::from(count));
        if combinations.map_or(true, |n| n > MAX_COMBINATIONS) {
            return Err(GameError::Configuration(format!(
                "{} dice with {} faces have too many combinations",
                count, faces
            )));
        }

        Ok(Dice::build(faces, count))
    }

    /// Return a pair of six-sided dice.
    pub fn standard() -> Self {
        Dice::build(6, 2)
    }

    /// Precompute the rolls and distribution of dice already known to be valid.
    fn build(faces: u8, count: u8) -> Self {
        let significant_rolls = Dice::significant_rolls_for(faces, count);
        let distribution = Dice::compute_distribution(&significant_rolls);

        Self {
            faces,
            count,
            significant_rolls,
            distribution,
        }
    }

    /*********        GETTERS        *********/

    pub fn faces(&self) -> u8 {
        self.faces
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn significant_rolls(&self) -> &[DiceRoll] {
        &self.significant_rolls
    }

    /// The precomputed distribution of cumulative moves per turn.
    pub fn distribution(&self) -> &DiceDistribution {
        &self.distribution
    }

    /*********        ROLLING        *********/

    /// Roll every die once.
    pub fn roll(&self, rng: &mut GameRng) -> Vec<u8> {
        (0..self.count).map(|_| rng.roll_die(self.faces)).collect()
    }

    /// Whether a roll came up with the same number on every die.
    /// Fewer than two dice never make a double.
    pub fn is_double(roll: &[u8]) -> bool {
        roll.len() >= 2 && roll.windows(2).all(|pair| pair[0] == pair[1])
    }

    /*********        DISTRIBUTION        *********/

    /// Return every distinct outcome of a single roll.
    fn significant_rolls_for(faces: u8, count: u8) -> Vec<DiceRoll> {
        let mut sig_rolls: Vec<DiceRoll> = vec![];
        let combinations = u32::from(faces).pow(u32::from(count));
        let probability = 1. / f64::from(combinations);

        // Loop through all possible dice results, reading
        // `combination` as a `count`-digit number in base `faces`
        for combination in 0..combinations {
            let mut rest = combination;
            let mut dice = Vec::with_capacity(count.into());
            for _ in 0..count {
                dice.push(rest % u32::from(faces) + 1);
                rest /= u32::from(faces);
            }

            let sum = dice.iter().sum();

            // There's only one way to get each double, so keep it as its own roll
            if dice.windows(2).all(|pair| pair[0] == pair[1]) {
                sig_rolls.push(DiceRoll {
                    probability,
                    sum,
                    is_double: true,
                });
                continue;
            }

            match sig_rolls.iter().position(|r| !r.is_double && r.sum == sum) {
                // If a roll with the same sum already exists, merge their probabilities
                Some(i) => sig_rolls[i].probability += probability,
                // This is a new roll
                None => sig_rolls.push(DiceRoll {
                    probability,
                    sum,
                    is_double: false,
                }),
            }
        }

        sig_rolls
    }

    /// Combine single rolls into the per-turn move distribution.
    fn compute_distribution(sig_rolls: &[DiceRoll]) -> DiceDistribution {
        /*
         *  A turn is a run of doubles followed by one non-double, unless the run
         *  reaches MAX_DOUBLES, in which case the player goes to jail instead.
         *  For MAX_DOUBLES == 3 the movement paths are S, DS and DDS, and the
         *  DDD path carries P(D)^3 of jail mass.
         *
         *  `prefix` holds the distribution of steps accumulated by the doubles
         *  rolled so far. Each iteration ends the turn with a single (adding
         *  `prefix * singles` to the moves) or extends the run with another
         *  double (`prefix = prefix * doubles`). Whatever is left in `prefix`
         *  after MAX_DOUBLES iterations is the jail mass.
         */
        let singles: Vec<(u32, f64)> = sig_rolls
            .iter()
            .filter(|r| !r.is_double)
            .map(|r| (r.sum, r.probability))
            .collect();
        let doubles: Vec<(u32, f64)> = sig_rolls
            .iter()
            .filter(|r| r.is_double)
            .map(|r| (r.sum, r.probability))
            .collect();

        let mut moves = BTreeMap::new();
        let mut prefix = BTreeMap::from([(0_u32, 1.0_f64)]);

        for _ in 0..MAX_DOUBLES {
            for (&steps, &p) in &prefix {
                for &(sum, q) in &singles {
                    *moves.entry(steps + sum).or_insert(0.) += p * q;
                }
            }
            prefix = convolve(&prefix, &doubles);
        }

        DiceDistribution {
            moves,
            jail: prefix.values().sum(),
        }
    }
}

/// Add every roll in `rolls` to every step count in `prefix`.
fn convolve(prefix: &BTreeMap<u32, f64>, rolls: &[(u32, f64)]) -> BTreeMap<u32, f64> {
    let mut next = BTreeMap::new();
    for (&steps, &p) in prefix {
        for &(sum, q) in rolls {
            *next.entry(steps + sum).or_insert(0.) += p * q;
        }
    }
    next
}

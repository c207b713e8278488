//! Property-based tests for dice, liquidation, and movement.
//!
//! Run with: cargo test --release prop_game

use proptest::prelude::*;

use monopoly_sim::game::board::Board;
use monopoly_sim::game::dice::Dice;
use monopoly_sim::game::globals::{BOARD_SIZE, JAIL_POSITION};
use monopoly_sim::game::liquidation::{select_assets_to_sell, Asset};
use monopoly_sim::game::{TurnOutcome, TurnResolver};
use monopoly_sim::Token;

/// The fewest assets any selection needs to cover `shortfall`, by brute force.
fn fewest_assets_needed(values: &[i64], shortfall: i64) -> Option<usize> {
    (0u32..1 << values.len())
        .filter(|mask| {
            let total: i64 = (0..values.len())
                .filter(|&i| mask & (1 << i) != 0)
                .map(|i| values[i])
                .sum();
            total >= shortfall
        })
        .map(|mask| mask.count_ones() as usize)
        .min()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Movement and jail mass always add up to one.
    #[test]
    fn prop_distribution_sums_to_one(faces in 2u8..=12, count in 2u8..=4) {
        let dice = Dice::new(faces, count).unwrap();
        let distribution = dice.distribution();

        prop_assert!((distribution.total() - 1.).abs() < 1e-9);
        prop_assert!(distribution.jail_probability() > 0.);
        // The smallest roll that isn't a double is all ones and a two
        prop_assert_eq!(distribution.min_move(), u32::from(count) + 1);
        prop_assert!(distribution.iter().all(|(_, p)| p > 0.));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A selection covers the shortfall and uses no more assets than needed.
    #[test]
    fn prop_liquidation_is_minimal(
        values in prop::collection::vec(1i64..5_000, 0..10),
        shortfall in 1i64..20_000
    ) {
        let assets: Vec<Asset> = values
            .iter()
            .enumerate()
            .map(|(id, &value)| Asset { id, value })
            .collect();

        match (select_assets_to_sell(&assets, shortfall), fewest_assets_needed(&values, shortfall)) {
            (Some(selection), Some(fewest)) => {
                let raised: i64 = selection.iter().map(|&id| values[id]).sum();
                prop_assert!(raised >= shortfall);
                prop_assert_eq!(selection.len(), fewest);

                let mut unique = selection.clone();
                unique.sort_unstable();
                unique.dedup();
                prop_assert_eq!(unique.len(), selection.len());
            }
            (None, None) => (),
            (selection, fewest) => prop_assert!(
                false,
                "selection {:?} disagrees with brute force {:?}",
                selection,
                fewest
            ),
        }
    }

    /// Positions stay on the board and laps only grow on a wrap past 'Go'.
    #[test]
    fn prop_movement_stays_on_board(steps in prop::collection::vec(0u32..200, 1..40)) {
        let apple = Token::from("apple");
        let mut board = Board::standard(&[apple.clone()]).unwrap();

        for step in steps {
            let lap = board.lap(&apple).unwrap();
            let movement = board.move_by_steps(&apple, step).unwrap();

            prop_assert!(movement.to < BOARD_SIZE);
            prop_assert_eq!(board.position(&apple).unwrap(), movement.to);

            let expected = if movement.passed_go { lap + 1 } else { lap };
            prop_assert_eq!(board.lap(&apple).unwrap(), expected);
            prop_assert_eq!(
                movement.passed_go,
                movement.from + step as usize >= BOARD_SIZE
            );
        }
    }

    /// Three doubles in a row always end the roll phase in jail.
    #[test]
    fn prop_three_doubles_jail(doubles in prop::collection::vec(1u8..=6, 3), start in 0usize..40) {
        let apple = Token::from("apple");
        let mut board = Board::standard(&[apple.clone()]).unwrap();
        board.move_to_index(&apple, start).unwrap();

        let mut rolls = doubles.iter().map(|&d| vec![d, d]);
        let outcome = TurnResolver::new().resolve_with(|| rolls.next().unwrap_or_else(|| vec![1, 2]));
        prop_assert_eq!(outcome, TurnOutcome::Jail);

        let lap = board.lap(&apple).unwrap();
        board.send_to_jail(&apple).unwrap();
        prop_assert_eq!(board.position(&apple).unwrap(), JAIL_POSITION);
        prop_assert_eq!(board.lap(&apple).unwrap(), lap);
    }
}

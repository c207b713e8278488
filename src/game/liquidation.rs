//! Choosing which assets to sell when a player can't cover a payment.
//!
//! The search is exhaustive over combinations of a given size, so its cost grows
//! with `C(n, k)`. A full board has at most 28 purchasable tiles, and sizes that
//! can't possibly reach the shortfall are skipped, but a player holding most of the
//! board and needing to sell about half of it is still tens of millions of
//! combinations. Callers simulating many games should keep that in mind.

use super::globals::Money;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Something a player can sell to the bank.
pub struct Asset {
    /// Position of the tile on the board.
    pub id: usize,
    /// What the bank pays for the tile and everything built on it.
    pub value: Money,
}

/// Return the ids of the assets to sell to raise at least `shortfall`.
///
/// The fewest assets win. Among selections of the same size, the one with the
/// smallest surplus over `shortfall` wins, and an exact match is always accepted.
/// Ties keep the first selection in lexicographic order of `assets`. Larger sizes
/// are only searched when no smaller size can cover the shortfall.
///
/// Return `None` when selling everything still wouldn't be enough.
pub fn select_assets_to_sell(assets: &[Asset], shortfall: Money) -> Option<Vec<usize>> {
    // Nothing needs to be sold
    if shortfall <= 0 {
        return Some(vec![]);
    }

    let total: Money = assets.iter().map(|a| a.value).sum();
    if total < shortfall {
        return None;
    }

    // Values from largest to smallest, to bound what each size can reach
    let mut descending: Vec<Money> = assets.iter().map(|a| a.value).collect();
    descending.sort_unstable_by(|a, b| b.cmp(a));

    let n = assets.len();
    let mut reachable = 0;

    for k in 1..=n {
        // The k most valuable assets are the best any k-sized selection can do
        reachable += descending[k - 1];
        if reachable < shortfall {
            continue;
        }

        let mut best: Option<(Money, Vec<usize>)> = None;
        let mut combination: Vec<usize> = (0..k).collect();

        loop {
            let value: Money = combination.iter().map(|&i| assets[i].value).sum();
            let surplus = value - shortfall;

            if surplus >= 0 && best.as_ref().map_or(true, |(s, _)| surplus < *s) {
                best = Some((surplus, combination.clone()));

                // Can't do better than an exact match
                if surplus == 0 {
                    break;
                }
            }

            if !next_combination(&mut combination, n) {
                break;
            }
        }

        if let Some((_, combination)) = best {
            return Some(combination.iter().map(|&i| assets[i].id).collect());
        }
    }

    None
}

/// Advance `combination` (sorted indices into `0..n`) to the next combination of the
/// same size in lexicographic order. Return `false` once every combination has been seen.
fn next_combination(combination: &mut [usize], n: usize) -> bool {
    let k = combination.len();

    // Find the rightmost index that can still move right
    for i in (0..k).rev() {
        if combination[i] < n - k + i {
            combination[i] += 1;
            for j in i + 1..k {
                combination[j] = combination[j - 1] + 1;
            }
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(values: &[(usize, Money)]) -> Vec<Asset> {
        values.iter().map(|&(id, value)| Asset { id, value }).collect()
    }

    #[test]
    fn test_single_asset_with_smallest_surplus() {
        let owned = assets(&[(1, 600), (8, 1000), (24, 2400), (34, 3200)]);
        assert_eq!(select_assets_to_sell(&owned, 2400), Some(vec![24]));
        assert_eq!(select_assets_to_sell(&owned, 700), Some(vec![8]));
    }

    #[test]
    fn test_fewest_assets_beat_smaller_surplus() {
        // {600, 400} covers 1000 exactly, but one 1500 is fewer assets
        let owned = assets(&[(1, 600), (3, 400), (5, 1500)]);
        assert_eq!(select_assets_to_sell(&owned, 1000), Some(vec![5]));
    }

    #[test]
    fn test_falls_back_to_pairs() {
        let owned = assets(&[(3, 600), (9, 1200), (14, 1600), (19, 2000)]);
        // No single asset covers 3000; 1200 + 2000 has the smallest surplus
        assert_eq!(select_assets_to_sell(&owned, 3000), Some(vec![9, 19]));
    }

    #[test]
    fn test_ties_keep_the_first_combination() {
        let owned = assets(&[(5, 2000), (15, 2000), (25, 2000)]);
        assert_eq!(select_assets_to_sell(&owned, 1500), Some(vec![5]));
    }

    #[test]
    fn test_cannot_cover() {
        let owned = assets(&[(1, 600), (3, 600)]);
        assert_eq!(select_assets_to_sell(&owned, 1201), None);
        assert_eq!(select_assets_to_sell(&[], 1), None);
    }

    #[test]
    fn test_everything_when_needed() {
        let owned = assets(&[(1, 600), (3, 600), (6, 1000)]);
        assert_eq!(select_assets_to_sell(&owned, 2200), Some(vec![1, 3, 6]));
    }

    #[test]
    fn test_nothing_owed() {
        let owned = assets(&[(1, 600)]);
        assert_eq!(select_assets_to_sell(&owned, 0), Some(vec![]));
        assert_eq!(select_assets_to_sell(&owned, -50), Some(vec![]));
    }

    #[test]
    fn test_next_combination_order() {
        let mut combination = vec![0, 1];
        let mut seen = vec![combination.clone()];
        while next_combination(&mut combination, 4) {
            seen.push(combination.clone());
        }

        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }
}

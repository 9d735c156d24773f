//! Fairness statistics over a co-occurrence matrix.
//!
//! `mean` and `std_dev` count every one of the `N(N-1)/2` pairs, with pairs
//! that never met contributing 0. `met_mean` and `met_std_dev` only look at
//! pairs that met at least once, which is how the notebook evaluation reports
//! them.

use std::collections::BTreeMap;

use crate::cooccurrence::CoOccurrenceMatrix;

/// Summary of how evenly pairings were spread.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PairStats {
    /// Meeting count → number of pairs with exactly that count.
    pub distribution: BTreeMap<u32, usize>,
    pub mean: f64,
    /// Population standard deviation of the pair counts.
    pub std_dev: f64,
    /// Mean over pairs that met at least once.
    pub met_mean: f64,
    pub met_std_dev: f64,
    pub max: u32,
    /// Pairs that met two or more times.
    pub repeated_pairs: usize,
}

impl PairStats {
    /// Compute statistics for a request of `participants` people.
    pub fn from_matrix(matrix: &CoOccurrenceMatrix, participants: usize) -> Self {
        let all_pairs = participants * participants.saturating_sub(1) / 2;

        let mut distribution = BTreeMap::new();
        for (_, count) in matrix.pairs() {
            *distribution.entry(count).or_insert(0) += 1;
        }
        let unseen = all_pairs.saturating_sub(matrix.distinct_pairs());
        if unseen > 0 {
            distribution.insert(0, unseen);
        }

        if all_pairs == 0 {
            return Self {
                distribution,
                mean: 0.0,
                std_dev: 0.0,
                met_mean: 0.0,
                met_std_dev: 0.0,
                max: 0,
                repeated_pairs: 0,
            };
        }

        let (mean, std_dev) = moments(distribution.iter(), all_pairs);
        let (met_mean, met_std_dev) =
            moments(distribution.range(1..), matrix.distinct_pairs());

        Self {
            mean,
            std_dev,
            met_mean,
            met_std_dev,
            max: matrix.max_count(),
            repeated_pairs: distribution
                .range(2..)
                .map(|(_, &pairs)| pairs)
                .sum(),
            distribution,
        }
    }
}

/// Mean and population standard deviation of a `count → pairs` histogram.
fn moments<'a, I>(buckets: I, pairs: usize) -> (f64, f64)
where
    I: Iterator<Item = (&'a u32, &'a usize)> + Clone,
{
    if pairs == 0 {
        return (0.0, 0.0);
    }
    let n = pairs as f64;
    let mean = buckets
        .clone()
        .map(|(&count, &k)| k as f64 * count as f64)
        .sum::<f64>()
        / n;
    let variance = buckets
        .map(|(&count, &k)| k as f64 * (count as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

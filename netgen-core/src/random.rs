//! Seeded random source threaded explicitly through every generator.
//!
//! A [`RandomSource`] owns its generator state, so sharing one between two
//! concurrent generations is ruled out by the borrow checker. Batch
//! generation derives one decorrelated source per graph with
//! [`RandomSource::for_worker`].

use rand::{
    Rng, SeedableRng,
    distributions::{Distribution, Standard, WeightedError, WeightedIndex},
    rngs::SmallRng,
    seq::index,
};

use crate::error::{NetgenError, Result};

/// SplitMix64 increment (the 64-bit golden ratio) used for per-worker seed
/// derivation.
const WORKER_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
fn mix_worker_seed(base_seed: u64, worker_index: usize) -> u64 {
    splitmix64(base_seed ^ ((worker_index as u64 + 1).wrapping_mul(WORKER_SEED_SPACING)))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(WORKER_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Pseudo-random generator handed to every generator call.
///
/// Two sources created from the same seed yield the same sequence of draws,
/// so the same seed and parameters always reproduce the same graph.
///
/// # Examples
/// ```
/// use netgen_core::RandomSource;
///
/// let mut first = RandomSource::seed_from_u64(7);
/// let mut second = RandomSource::seed_from_u64(7);
/// assert_eq!(first.uniform(), second.uniform());
/// ```
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: SmallRng,
}

impl RandomSource {
    /// Creates a deterministic source from `seed`.
    #[must_use]
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Derives the source for worker `worker_index` of a batch seeded with
    /// `base_seed`.
    ///
    /// Seeds are mixed with SplitMix64 so neighbouring workers do not share
    /// correlated streams.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::RandomSource;
    ///
    /// let mut a = RandomSource::for_worker(11, 0);
    /// let mut b = RandomSource::for_worker(11, 1);
    /// assert_ne!(a.uniform(), b.uniform());
    /// ```
    #[must_use]
    pub fn for_worker(base_seed: u64, worker_index: usize) -> Self {
        Self::seed_from_u64(mix_worker_seed(base_seed, worker_index))
    }

    /// Draws a float uniformly from `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.sample(Standard)
    }

    /// Returns `true` with probability `probability`.
    ///
    /// Implemented as `uniform() < probability`, so `1.0` always succeeds and
    /// `0.0` never does.
    pub fn bernoulli(&mut self, probability: f64) -> bool {
        self.uniform() < probability
    }

    /// Draws an integer uniformly from `0..bound`.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidDistribution`] when `bound` is zero.
    pub fn index(&mut self, bound: usize) -> Result<usize> {
        if bound == 0 {
            return Err(NetgenError::distribution(
                "cannot draw an index from an empty range",
            ));
        }
        Ok(self.rng.gen_range(0..bound))
    }

    /// Picks `k` distinct indices from `0..population`.
    ///
    /// Without `weights` every subset is equally likely. With `weights`
    /// (one entry per index) indices are drawn one at a time with probability
    /// proportional to the weights of the indices not yet chosen.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidDistribution`] when `k` exceeds the
    /// population, when the weight slice length differs from `population`, or
    /// when the weights are negative, non-finite, sum to zero or contain fewer
    /// than `k` positive entries.
    ///
    /// # Examples
    /// ```
    /// use netgen_core::RandomSource;
    ///
    /// let mut rng = RandomSource::seed_from_u64(3);
    /// let picked = rng.choose_without_replacement(4, 2, Some(&[0.0, 1.0, 0.0, 2.0]))?;
    /// let mut sorted = picked.clone();
    /// sorted.sort_unstable();
    /// assert_eq!(sorted, [1, 3]);
    /// # Ok::<(), netgen_core::NetgenError>(())
    /// ```
    pub fn choose_without_replacement(
        &mut self,
        population: usize,
        k: usize,
        weights: Option<&[f64]>,
    ) -> Result<Vec<usize>> {
        match weights {
            None => self.choose_uniform(population, k),
            Some(weights) if weights.len() == population => self.choose_weighted(weights, k),
            Some(weights) => Err(NetgenError::distribution(format!(
                "expected {population} weights, got {}",
                weights.len()
            ))),
        }
    }

    /// Picks `k` distinct indices uniformly from `0..population`.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidDistribution`] when `k > population`.
    pub fn choose_uniform(&mut self, population: usize, k: usize) -> Result<Vec<usize>> {
        if k > population {
            return Err(NetgenError::distribution(format!(
                "cannot choose {k} distinct items from a population of {population}"
            )));
        }
        Ok(index::sample(&mut self.rng, population, k).into_vec())
    }

    /// Picks `k` distinct indices with probability proportional to `weights`.
    ///
    /// # Errors
    /// See [`RandomSource::choose_without_replacement`].
    pub fn choose_weighted(&mut self, weights: &[f64], k: usize) -> Result<Vec<usize>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let positive = check_weights(weights)?;
        if positive < k {
            return Err(NetgenError::distribution(format!(
                "cannot choose {k} distinct items when only {positive} have positive weight"
            )));
        }

        let mut distribution = WeightedIndex::new(weights).map_err(weighted_error)?;
        let mut chosen = Vec::with_capacity(k);
        for draw in 0..k {
            let picked = distribution.sample(&mut self.rng);
            chosen.push(picked);
            if draw + 1 < k {
                distribution
                    .update_weights(&[(picked, &0.0)])
                    .map_err(weighted_error)?;
            }
        }
        Ok(chosen)
    }

    /// Draws `k` indices independently with probability proportional to
    /// `weights`; repeats are allowed.
    ///
    /// # Errors
    /// Returns [`NetgenError::InvalidDistribution`] for negative, non-finite
    /// or all-zero weights.
    pub fn choose_with_replacement(&mut self, weights: &[f64], k: usize) -> Result<Vec<usize>> {
        check_weights(weights)?;
        let distribution = WeightedIndex::new(weights).map_err(weighted_error)?;
        Ok((0..k).map(|_| distribution.sample(&mut self.rng)).collect())
    }
}

/// Validates sampling weights and returns how many are strictly positive.
fn check_weights(weights: &[f64]) -> Result<usize> {
    if weights.is_empty() {
        return Err(NetgenError::distribution("no weights supplied"));
    }
    let mut positive = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(NetgenError::distribution(format!(
                "weight {weight} at index {index} is negative or not finite"
            )));
        }
        if weight > 0.0 {
            positive += 1;
        }
    }
    if positive == 0 {
        return Err(NetgenError::distribution("weights sum to zero"));
    }
    Ok(positive)
}

fn weighted_error(err: WeightedError) -> NetgenError {
    NetgenError::distribution(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::negative(vec![1.0, -0.5, 2.0])]
    #[case::all_zero(vec![0.0, 0.0, 0.0])]
    #[case::nan(vec![1.0, f64::NAN])]
    #[case::empty(vec![])]
    fn weighted_sampling_rejects_bad_weights(#[case] weights: Vec<f64>) {
        let mut rng = RandomSource::seed_from_u64(1);
        let err = rng
            .choose_weighted(&weights, 1)
            .expect_err("invalid weights must be rejected");
        assert!(matches!(err, NetgenError::InvalidDistribution { .. }));
    }

    #[test]
    fn weighted_sampling_needs_enough_positive_weights() {
        let mut rng = RandomSource::seed_from_u64(1);
        let err = rng
            .choose_weighted(&[1.0, 0.0, 1.0], 3)
            .expect_err("only two entries are selectable");
        assert!(matches!(err, NetgenError::InvalidDistribution { .. }));
    }

    #[rstest]
    #[case(0)]
    #[case(17)]
    #[case(123_456)]
    fn weighted_sampling_returns_distinct_positive_indices(#[case] seed: u64) {
        let mut rng = RandomSource::seed_from_u64(seed);
        let weights = [0.5, 0.0, 3.0, 1.0, 0.0, 2.0];
        let picked = rng.choose_weighted(&weights, 4).expect("four positive weights");
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 2, 3, 5]);
    }

    #[test]
    fn uniform_sampling_is_distinct_and_in_range() {
        let mut rng = RandomSource::seed_from_u64(99);
        let mut picked = rng.choose_uniform(10, 10).expect("k equals population");
        picked.sort_unstable();
        assert_eq!(picked, (0..10).collect::<Vec<_>>());
        assert!(rng.choose_uniform(3, 4).is_err());
    }

    #[test]
    fn weighted_sampling_mismatched_length_is_rejected() {
        let mut rng = RandomSource::seed_from_u64(5);
        let err = rng
            .choose_without_replacement(3, 1, Some(&[1.0, 1.0]))
            .expect_err("length mismatch");
        assert!(matches!(err, NetgenError::InvalidDistribution { .. }));
    }

    #[test]
    fn weighted_sampling_favours_heavy_entries() {
        let mut rng = RandomSource::seed_from_u64(2024);
        let draws = rng
            .choose_with_replacement(&[1.0, 9.0], 2_000)
            .expect("valid weights");
        let heavy = draws.iter().filter(|&&index| index == 1).count();
        assert!((1_700..=1_900).contains(&heavy), "heavy draws: {heavy}");
    }

    #[test]
    fn same_seed_reproduces_sequence() {
        let mut first = RandomSource::seed_from_u64(42);
        let mut second = RandomSource::seed_from_u64(42);
        let a: Vec<f64> = (0..16).map(|_| first.uniform()).collect();
        let b: Vec<f64> = (0..16).map(|_| second.uniform()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn bernoulli_extremes_are_exact() {
        let mut rng = RandomSource::seed_from_u64(8);
        assert!((0..100).all(|_| rng.bernoulli(1.0)));
        assert!((0..100).all(|_| !rng.bernoulli(0.0)));
    }

    #[test]
    fn index_rejects_empty_range() {
        let mut rng = RandomSource::seed_from_u64(8);
        assert!(rng.index(0).is_err());
        assert!(rng.index(3).expect("non-empty") < 3);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(0, 1)]
    #[case(42, 7)]
    fn worker_seeds_differ_from_base(#[case] base: u64, #[case] worker: usize) {
        assert_ne!(mix_worker_seed(base, worker), base);
        assert_ne!(mix_worker_seed(base, worker), mix_worker_seed(base, worker + 1));
    }
}

//! Uniform outcome selection shared by every visualizer.

use rand::Rng;

/// Draw a winning index uniformly from `0..n`.
///
/// `random_range` samples by rejection, so no index is favoured when `n`
/// does not divide the generator's range.
///
/// # Panics
/// Panics if `n` is zero.
pub fn choose_index<R: Rng + ?Sized>(rng: &mut R, n: usize) -> usize {
    assert!(n >= 1, "Cannot choose an index among zero options");
    rng.random_range(0..n)
}

/// [`choose_index`] backed by the thread-local generator.
pub fn choose_index_thread(n: usize) -> usize {
    choose_index(&mut rand::rng(), n)
}

/// Pearson chi-square statistic of observed counts against a uniform
/// expectation. Used to audit draws; returns 0.0 for empty input.
pub fn chi_square_uniform(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if counts.is_empty() || total == 0 {
        return 0.0;
    }
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_option_always_wins() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(choose_index(&mut rng, 1), 0);
        }
    }

    #[test]
    #[should_panic(expected = "zero options")]
    fn zero_options_fail_fast() {
        let mut rng = StdRng::seed_from_u64(1);
        choose_index(&mut rng, 0);
    }

    #[test]
    fn chi_square_of_perfectly_even_counts_is_zero() {
        assert_eq!(chi_square_uniform(&[10, 10, 10]), 0.0);
        assert_eq!(chi_square_uniform(&[]), 0.0);
        assert!((chi_square_uniform(&[20, 0]) - 20.0).abs() < 1e-9);
    }
}

use num_traits::Float;

use crate::{Corridor, Error, PairedSums, Result};

/// Finds the point of stability of one study.
///
/// The first `sample_size_max` pairs of `x` and `y` are read in draw order.
/// Starting from the full sample, the last participant is dropped one at a
/// time and the correlation is updated from the running sums in constant
/// time. The scan stops at the first size (going down) whose correlation is
/// outside `corridor` or undefined, or when `sample_size_min` is reached, and
/// that size is returned.
///
/// If the correlation of the full sample is already outside the corridor (or
/// undefined) there is no point of stability and `None` is returned.
///
/// # Arguments
///
/// * `x` - First variable of the study, in draw order
/// * `y` - Second variable of the study, in draw order
/// * `sample_size_min` - Smallest sample size to consider
/// * `sample_size_max` - Full sample size
/// * `corridor` - The corridor of stability
///
/// # Returns
///
/// * `Result<Option<usize>>` - The point of stability, `None` if none exists
///   within `[sample_size_min, sample_size_max]`, or an error if the inputs
///   are inconsistent
///
/// # Examples
///
/// ```
/// use fastpos::{Corridor, find_stability_point};
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let y = [1.1, 1.9, 3.2, 3.9, 5.1, 5.0];
/// let corridor = Corridor::new(0.9, 1.0).unwrap();
///
/// assert_eq!(find_stability_point(&x, &y, 3, 6, &corridor), Ok(Some(3)));
///
/// let corridor = Corridor::new(0.0, 0.5).unwrap();
/// assert_eq!(find_stability_point(&x, &y, 3, 6, &corridor), Ok(None));
/// ```
pub fn find_stability_point<T>(
    x: &[T],
    y: &[T],
    sample_size_min: usize,
    sample_size_max: usize,
    corridor: &Corridor<T>,
) -> Result<Option<usize>>
where
    T: Default + Clone + Float,
{
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if sample_size_min == 0 || sample_size_min > sample_size_max {
        return Err(Error::InvalidSampleSizes {
            min: sample_size_min,
            max: sample_size_max,
        });
    }
    if x.len() < sample_size_max {
        return Err(Error::PopulationTooSmall {
            population: x.len(),
            required: sample_size_max,
        });
    }

    Ok(scan(
        &x[..sample_size_max],
        &y[..sample_size_max],
        sample_size_min,
        corridor,
    ))
}

/// Shrinking scan over a validated study; `x` and `y` hold exactly
/// `sample_size_max` values and `0 < sample_size_min <= x.len()`.
pub(crate) fn scan<T>(x: &[T], y: &[T], sample_size_min: usize, corridor: &Corridor<T>) -> Option<usize>
where
    T: Default + Clone + Float,
{
    let mut sums = PairedSums::from_pairs(x.iter().copied().zip(y.iter().copied()));
    let mut n = x.len();

    if !corridor.admits(sums.corr()) {
        return None;
    }

    while n > sample_size_min {
        sums.pop((x[n - 1], y[n - 1]));
        n -= 1;
        if !corridor.admits(sums.corr()) {
            break;
        }
    }
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn corridor(lower: f64, upper: f64) -> Corridor<f64> {
        Corridor::new(lower, upper).unwrap()
    }

    #[test]
    fn outside_at_full_sample_is_not_found() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [4.0, 3.0, 2.0, 1.0];
        assert_eq!(find_stability_point(&x, &y, 2, 4, &corridor(0.0, 1.0)), Ok(None));
    }

    #[test]
    fn identical_vectors_reach_minimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let x: Vec<f64> = (0..100).map(|_| rng.gen_range(-1.0..1.0)).collect();
        assert_eq!(
            find_stability_point(&x, &x, 2, 100, &corridor(0.9, 1.0)),
            Ok(Some(2))
        );
        // r = 1 exceeds any corridor capped below 1
        assert_eq!(
            find_stability_point(&x, &x, 2, 100, &corridor(0.1, 0.99)),
            Ok(None)
        );
    }

    #[test]
    fn reports_first_size_outside_corridor() {
        let x = [0.496714, -0.138264, 0.647689, 1.523030, -0.234153, -0.234137, 1.579213, 0.767435, -0.469474, 0.542560];
        let y = [0.115991, -0.329650, 0.574363, 0.109481, -1.026366, -0.445040, 0.599033, 0.694328, -0.782644, -0.326360];

        // r(10) = 0.778, r(9) = 0.793, r(8) = 0.744, r(7) = 0.776, r(6) = 0.689
        assert_eq!(find_stability_point(&x, &y, 2, 10, &corridor(0.7, 0.8)), Ok(Some(6)));
        // the scan stops at r(8) < 0.75
        assert_eq!(find_stability_point(&x, &y, 2, 10, &corridor(0.75, 0.8)), Ok(Some(8)));
        // minimum reached before any exit
        assert_eq!(find_stability_point(&x, &y, 7, 10, &corridor(0.7, 0.8)), Ok(Some(7)));
        // only the first sample_size_max pairs are used
        assert_eq!(find_stability_point(&x, &y, 2, 9, &corridor(0.75, 0.8)), Ok(Some(8)));
    }

    #[test]
    fn min_equal_max_checks_full_sample_only() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 2.0];
        assert_eq!(find_stability_point(&x, &y, 3, 3, &corridor(0.0, 1.0)), Ok(Some(3)));
        assert_eq!(find_stability_point(&x, &y, 3, 3, &corridor(0.6, 1.0)), Ok(None));
    }

    #[test]
    fn degenerate_variance_stops_scan() {
        // the first two pairs share x, so r(2) is undefined
        let x = [1.0, 1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(find_stability_point(&x, &y, 1, 4, &corridor(0.5, 1.0)), Ok(Some(2)));

        let constant = [5.0; 10];
        let y: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(
            find_stability_point(&constant, &y, 2, 10, &corridor(-1.0, 1.0)),
            Ok(None)
        );
    }

    #[test]
    fn rejects_inconsistent_inputs() {
        let c = corridor(0.0, 1.0);
        assert_eq!(
            find_stability_point(&[1.0, 2.0], &[1.0], 1, 1, &c),
            Err(Error::LengthMismatch { x: 2, y: 1 })
        );
        assert_eq!(
            find_stability_point(&[1.0, 2.0], &[1.0, 2.0], 0, 2, &c),
            Err(Error::InvalidSampleSizes { min: 0, max: 2 })
        );
        assert_eq!(
            find_stability_point(&[1.0, 2.0], &[1.0, 2.0], 3, 2, &c),
            Err(Error::InvalidSampleSizes { min: 3, max: 2 })
        );
        assert_eq!(
            find_stability_point(&[1.0, 2.0], &[1.0, 2.0], 1, 3, &c),
            Err(Error::PopulationTooSmall {
                population: 2,
                required: 3
            })
        );
    }

    fn brute_force(x: &[f64], y: &[f64], n_min: usize, corridor: &Corridor<f64>) -> Option<usize> {
        let r = |n: usize| PairedSums::from_pairs(x[..n].iter().copied().zip(y[..n].iter().copied())).corr();
        let mut n = x.len();
        if !corridor.admits(r(n)) {
            return None;
        }
        while n > n_min {
            n -= 1;
            if !corridor.admits(r(n)) {
                break;
            }
        }
        Some(n)
    }

    proptest! {
        #[test]
        fn prop_scan_matches_recomputed_prefixes(
            pairs in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 3..60),
            lower in -1.0f64..0.5,
            width in 0.0f64..1.0,
            n_min_frac in 0.0f64..1.0,
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let n_max = x.len();
            let n_min = 2 + ((n_max - 2) as f64 * n_min_frac) as usize;
            let corridor = Corridor::new(lower, (lower + width).min(1.0)).unwrap();

            let found = find_stability_point(&x, &y, n_min, n_max, &corridor).unwrap();
            prop_assert_eq!(found, brute_force(&x, &y, n_min, &corridor));
            if let Some(n) = found {
                prop_assert!(n >= n_min && n <= n_max);
            }
        }
    }
}

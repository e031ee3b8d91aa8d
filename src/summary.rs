use alloc::vec::Vec;

use tracing::warn;

use num_traits::Float;

use crate::{AbortSignal, BatchConfig, Error, Result, helper::quantile_from_sorted_slice, run_batch};

/// Confidence levels reported when none are given
pub const DEFAULT_CONFIDENCE_LEVELS: [f64; 3] = [0.8, 0.9, 0.95];

/// Critical points of stability of a batch.
///
/// The critical point at confidence level `p` is the `p`-quantile of the
/// points of stability over all studies that found one: with that sample
/// size, a share `p` of studies had already settled inside the corridor.
/// Studies without a point of stability are excluded and counted separately.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPoints {
    levels: Vec<f64>,
    sample_sizes: Vec<Option<f64>>,
    n_studies: usize,
    n_not_found: usize,
}

impl CriticalPoints {
    /// Computes the critical points of `points` at each confidence level
    ///
    /// # Arguments
    ///
    /// * `points` - Per-study points of stability, `None` where none was found
    /// * `confidence_levels` - Quantiles to report, each in `[0, 1]`
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The critical points, or
    ///   [`Error::InvalidConfidenceLevel`]
    ///
    /// # Examples
    ///
    /// ```
    /// use fastpos::CriticalPoints;
    /// use assert_approx_eq::assert_approx_eq;
    ///
    /// let points = [Some(40), Some(10), None, Some(30), Some(20), Some(50)];
    /// let critical = CriticalPoints::from_points(&points, &[0.5, 0.8]).unwrap();
    ///
    /// assert_eq!(critical.n_studies(), 6);
    /// assert_eq!(critical.n_not_found(), 1);
    /// assert_approx_eq!(critical.sample_sizes()[0].unwrap(), 30.0);
    /// assert_approx_eq!(critical.sample_sizes()[1].unwrap(), 42.0);
    /// ```
    pub fn from_points(points: &[Option<usize>], confidence_levels: &[f64]) -> Result<Self> {
        if let Some(&level) = confidence_levels
            .iter()
            .find(|level| !(0.0..=1.0).contains(*level))
        {
            return Err(Error::InvalidConfidenceLevel(level));
        }
        Ok(Self::compute(points, confidence_levels))
    }

    /// Computes the critical points at [`DEFAULT_CONFIDENCE_LEVELS`]
    pub fn with_default_levels(points: &[Option<usize>]) -> Self {
        Self::compute(points, &DEFAULT_CONFIDENCE_LEVELS)
    }

    fn compute(points: &[Option<usize>], confidence_levels: &[f64]) -> Self {
        let mut found: Vec<f64> = points.iter().flatten().map(|&n| n as f64).collect();
        found.sort_unstable_by(f64::total_cmp);

        let n_not_found = points.len() - found.len();
        if n_not_found > 0 {
            warn!(
                n_not_found,
                n_studies = points.len(),
                "studies did not reach the corridor of stability; increase sample_size_max"
            );
        }

        Self {
            levels: confidence_levels.to_vec(),
            sample_sizes: confidence_levels
                .iter()
                .map(|&q| quantile_from_sorted_slice(&found, q))
                .collect(),
            n_studies: points.len(),
            n_not_found,
        }
    }

    /// Returns the confidence levels
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Returns the critical sample size at each level, `None` if no study
    /// found a point of stability
    pub fn sample_sizes(&self) -> &[Option<f64>] {
        &self.sample_sizes
    }

    /// Returns `(level, sample size)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, Option<f64>)> + '_ {
        self.levels.iter().copied().zip(self.sample_sizes.iter().copied())
    }

    /// Returns the number of studies
    pub const fn n_studies(&self) -> usize {
        self.n_studies
    }

    /// Returns the number of studies without a point of stability
    pub const fn n_not_found(&self) -> usize {
        self.n_not_found
    }
}

/// Simulates a batch and summarizes it into critical points of stability
///
/// # Returns
///
/// * `Result<Option<CriticalPoints>>` - The critical points, `None` if the
///   batch was aborted, or an error if the configuration or a confidence
///   level is invalid
///
/// # Examples
///
/// ```
/// use fastpos::{BatchConfig, Corridor, NeverAbort, find_critical_points};
///
/// let x: Vec<f64> = (0..5000).map(|i| (i as f64 * 0.61).sin()).collect();
/// let y: Vec<f64> = x.iter().enumerate().map(|(i, v)| v + 0.5 * (i as f64 * 1.37).cos()).collect();
/// let config = BatchConfig::new(Corridor::new(0.6, 1.0).unwrap())
///     .with_n_studies(100)
///     .with_sample_sizes(20, 500);
///
/// let critical = find_critical_points(&x, &y, config, &[0.8, 0.9], &NeverAbort)
///     .unwrap()
///     .unwrap();
/// assert_eq!(critical.n_studies(), 100);
/// assert!(critical.iter().flat_map(|(_, n)| n).all(|n| (20.0..=500.0).contains(&n)));
/// ```
pub fn find_critical_points<T, A>(
    x_pop: &[T],
    y_pop: &[T],
    config: BatchConfig<T>,
    confidence_levels: &[f64],
    abort: &A,
) -> Result<Option<CriticalPoints>>
where
    T: Default + Clone + Float,
    A: AbortSignal,
{
    // reject bad levels before spending time on the batch
    CriticalPoints::from_points(&[], confidence_levels)?;
    run_batch(x_pop, y_pop, config, abort)?
        .points()
        .map(|points| CriticalPoints::from_points(points, confidence_levels))
        .transpose()
}

use num_traits::Float;

use crate::{Corridor, Error, Result};

/// Studies simulated between two polls of the abort signal
pub const DEFAULT_CHECK_INTERVAL: usize = 5000;

/// Parameters of a batch of simulated studies.
///
/// Defaults follow common practice for correlational stability research:
/// 10 000 studies, sample sizes from 20 to 1000 and drawing with
/// replacement. The corridor has no sensible default and must be supplied.
///
/// # Examples
///
/// ```
/// use fastpos::{BatchConfig, Corridor};
///
/// let config = BatchConfig::new(Corridor::around(0.5, 0.1).unwrap())
///     .with_n_studies(2000)
///     .with_sample_sizes(20, 500)
///     .with_replace(false)
///     .with_seed(17);
///
/// assert!(config.validate(10_000).is_ok());
/// assert!(config.validate(100).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig<T> {
    /// Number of studies to simulate
    pub n_studies: usize,
    /// Smallest sample size a study can stabilize at
    pub sample_size_min: usize,
    /// Number of participants drawn per study
    pub sample_size_max: usize,
    /// Whether participants are drawn with replacement
    pub replace: bool,
    /// Corridor of stability
    pub corridor: Corridor<T>,
    /// Studies simulated between two polls of the abort signal
    pub check_interval: usize,
    /// Seed of the per-study random streams
    pub seed: u64,
    /// Whether progress is logged while the batch runs
    pub show_progress: bool,
}

impl<T: Float> BatchConfig<T> {
    /// Creates a configuration with default parameters around `corridor`
    pub const fn new(corridor: Corridor<T>) -> Self {
        Self {
            n_studies: 10_000,
            sample_size_min: 20,
            sample_size_max: 1000,
            replace: true,
            corridor,
            check_interval: DEFAULT_CHECK_INTERVAL,
            seed: 0,
            show_progress: false,
        }
    }

    /// Sets the number of studies
    pub const fn with_n_studies(mut self, n_studies: usize) -> Self {
        self.n_studies = n_studies;
        self
    }

    /// Sets the minimum and maximum sample sizes
    pub const fn with_sample_sizes(mut self, min: usize, max: usize) -> Self {
        self.sample_size_min = min;
        self.sample_size_max = max;
        self
    }

    /// Sets whether participants are drawn with replacement
    pub const fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Sets the corridor of stability
    pub fn with_corridor(mut self, corridor: Corridor<T>) -> Self {
        self.corridor = corridor;
        self
    }

    /// Sets how many studies run between two polls of the abort signal
    pub const fn with_check_interval(mut self, check_interval: usize) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// Sets the seed of the per-study random streams
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets whether progress is logged
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Checks the configuration against a population of `population_len` pairs
    ///
    /// # Returns
    ///
    /// * `Result<()>` - An error describing the first violated constraint
    pub fn validate(&self, population_len: usize) -> Result<()> {
        if self.sample_size_min == 0 || self.sample_size_min > self.sample_size_max {
            return Err(Error::InvalidSampleSizes {
                min: self.sample_size_min,
                max: self.sample_size_max,
            });
        }
        if i32::try_from(self.sample_size_max).is_err() {
            return Err(Error::SampleSizeTooLarge {
                max: self.sample_size_max,
            });
        }
        if self.check_interval == 0 {
            return Err(Error::InvalidCheckInterval);
        }
        if population_len == 0 {
            return Err(Error::EmptyPopulation);
        }
        if !self.replace && population_len < self.sample_size_max {
            return Err(Error::PopulationTooSmall {
                population: population_len,
                required: self.sample_size_max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BatchConfig<f64> {
        BatchConfig::new(Corridor::new(0.4, 0.6).unwrap())
    }

    #[test]
    fn defaults() {
        let config = config();
        assert_eq!(config.n_studies, 10_000);
        assert_eq!(config.sample_size_min, 20);
        assert_eq!(config.sample_size_max, 1000);
        assert!(config.replace);
        assert_eq!(config.check_interval, 5000);
        assert!(!config.show_progress);
    }

    #[test]
    fn validate_sample_sizes() {
        assert_eq!(
            config().with_sample_sizes(0, 10).validate(100),
            Err(Error::InvalidSampleSizes { min: 0, max: 10 })
        );
        assert_eq!(
            config().with_sample_sizes(11, 10).validate(100),
            Err(Error::InvalidSampleSizes { min: 11, max: 10 })
        );
        assert!(config().with_sample_sizes(10, 10).validate(100).is_ok());
    }

    #[test]
    fn validate_population_size() {
        let config = config().with_sample_sizes(5, 50);
        assert_eq!(config.validate(0), Err(Error::EmptyPopulation));
        assert!(config.validate(10).is_ok());
        assert_eq!(
            config.clone().with_replace(false).validate(10),
            Err(Error::PopulationTooSmall {
                population: 10,
                required: 50
            })
        );
        assert!(config.with_replace(false).validate(50).is_ok());
    }

    #[test]
    fn validate_check_interval() {
        assert_eq!(
            config().with_check_interval(0).validate(10_000),
            Err(Error::InvalidCheckInterval)
        );
    }
}

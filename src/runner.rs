use alloc::vec::Vec;

use num_traits::Float;
use tracing::{debug, instrument};

use crate::{
    AbortSignal, BatchConfig, Error, IndexSampler, LogProgress, NoProgress, Progress, Result,
    RngSampler, stability::scan,
};

/// Raw marker returned in place of a batch that was aborted
pub const ABORTED: i32 = -1;

/// Raw marker of a study without a point of stability (the integer NA)
pub const NOT_FOUND: i32 = i32::MIN;

/// A bivariate population borrowed for the duration of a batch.
#[derive(Debug, Clone, Copy)]
pub struct Population<'a, T> {
    x: &'a [T],
    y: &'a [T],
}

impl<'a, T> Population<'a, T> {
    /// Pairs two equally long vectors
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The population, or [`Error::LengthMismatch`]
    pub fn new(x: &'a [T], y: &'a [T]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Returns the number of pairs
    pub const fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the population holds no pairs
    pub const fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns the first variable
    pub const fn x(&self) -> &'a [T] {
        self.x
    }

    /// Returns the second variable
    pub const fn y(&self) -> &'a [T] {
        self.y
    }
}

/// Result of a batch of studies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every study ran; one entry per study in study order, `None` where no
    /// point of stability was found
    Completed(Vec<Option<usize>>),
    /// The batch was cancelled and its partial results discarded
    Aborted,
}

impl BatchOutcome {
    /// Returns `true` if the batch was cancelled
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Returns the per-study points of stability of a completed batch
    pub fn points(&self) -> Option<&[Option<usize>]> {
        match self {
            Self::Completed(points) => Some(points),
            Self::Aborted => None,
        }
    }

    /// Consumes the outcome, returning the points of a completed batch
    pub fn into_points(self) -> Option<Vec<Option<usize>>> {
        match self {
            Self::Completed(points) => Some(points),
            Self::Aborted => None,
        }
    }

    /// Flattens the outcome into plain integers
    ///
    /// Studies without a point of stability become [`NOT_FOUND`]; an aborted
    /// batch becomes the single element `[ABORTED]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastpos::{ABORTED, BatchOutcome, NOT_FOUND};
    ///
    /// let outcome = BatchOutcome::Completed(vec![Some(120), None, Some(87)]);
    /// assert_eq!(outcome.into_raw(), vec![120, NOT_FOUND, 87]);
    ///
    /// assert_eq!(BatchOutcome::Aborted.into_raw(), vec![ABORTED]);
    /// assert!(BatchOutcome::Completed(vec![]).into_raw().is_empty());
    /// ```
    pub fn into_raw(self) -> Vec<i32> {
        match self {
            Self::Completed(points) => points
                .into_iter()
                .map(|point| point.and_then(|n| i32::try_from(n).ok()).unwrap_or(NOT_FOUND))
                .collect(),
            Self::Aborted => vec![ABORTED],
        }
    }
}

/// Per-worker buffers reused from one study to the next
#[derive(Debug)]
struct StudyBuffers<T> {
    index: Vec<usize>,
    x: Vec<T>,
    y: Vec<T>,
}

impl<T> StudyBuffers<T> {
    fn new(capacity: usize) -> Self {
        Self {
            index: Vec::with_capacity(capacity),
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
        }
    }
}

/// Simulates batches of studies drawn from a population.
///
/// Each study draws `sample_size_max` participants from the population,
/// and records the sample size at which its correlation settles inside the
/// corridor of stability. The population is shared read-only; every study
/// owns its draws and running sums.
///
/// # Examples
///
/// ```
/// use fastpos::{BatchConfig, Corridor, NeverAbort, Population, StudyBatchRunner};
///
/// let x: Vec<f64> = (0..2000).map(|i| (i as f64 * 0.61).sin()).collect();
/// let y: Vec<f64> = x.iter().enumerate().map(|(i, v)| v + 0.5 * (i as f64 * 1.37).cos()).collect();
///
/// let config = BatchConfig::new(Corridor::new(0.5, 1.0).unwrap())
///     .with_n_studies(50)
///     .with_sample_sizes(10, 200)
///     .with_seed(3);
/// let runner = StudyBatchRunner::new(Population::new(&x, &y).unwrap(), config).unwrap();
///
/// let points = runner.run(&NeverAbort).into_points().unwrap();
/// assert_eq!(points.len(), 50);
/// assert!(points.iter().flatten().all(|&n| (10..=200).contains(&n)));
/// ```
#[derive(Debug, Clone)]
pub struct StudyBatchRunner<'a, T> {
    population: Population<'a, T>,
    config: BatchConfig<T>,
}

impl<'a, T> StudyBatchRunner<'a, T>
where
    T: Default + Clone + Float,
{
    /// Validates `config` against `population` and creates a runner
    pub fn new(population: Population<'a, T>, config: BatchConfig<T>) -> Result<Self> {
        config.validate(population.len())?;
        Ok(Self { population, config })
    }

    /// Returns the batch configuration
    pub const fn config(&self) -> &BatchConfig<T> {
        &self.config
    }

    /// Simulates a single study with positions drawn by `sampler`
    ///
    /// # Returns
    ///
    /// * `Option<usize>` - The point of stability, or `None` if none exists
    pub fn run_one<S: IndexSampler>(&self, sampler: &mut S) -> Option<usize> {
        let mut buffers = StudyBuffers::new(self.config.sample_size_max);
        self.study(sampler, &mut buffers)
    }

    /// Runs the batch with seeded per-study random streams
    ///
    /// Study `k` draws from [`RngSampler::for_study`]`(seed, k)`, so the
    /// result only depends on the population and the configuration.
    pub fn run<A: AbortSignal>(&self, abort: &A) -> BatchOutcome {
        let seed = self.config.seed;
        self.dispatch(abort, |buffers, k| {
            self.study(&mut RngSampler::for_study(seed, k), buffers)
        })
    }

    /// Runs the batch drawing every study, in order, from one `sampler`
    pub fn run_with<S, A>(&self, sampler: &mut S, abort: &A) -> BatchOutcome
    where
        S: IndexSampler,
        A: AbortSignal,
    {
        self.dispatch(abort, |buffers, _| self.study(&mut *sampler, buffers))
    }

    fn dispatch<A, F>(&self, abort: &A, study: F) -> BatchOutcome
    where
        A: AbortSignal,
        F: FnMut(&mut StudyBuffers<T>, usize) -> Option<usize>,
    {
        if self.config.show_progress {
            self.sequential(&LogProgress::new(self.config.n_studies), abort, study)
        } else {
            self.sequential(&NoProgress, abort, study)
        }
    }

    #[instrument(level = "debug", skip_all, fields(n_studies = self.config.n_studies))]
    fn sequential<P, A, F>(&self, progress: &P, abort: &A, mut study: F) -> BatchOutcome
    where
        P: Progress,
        A: AbortSignal,
        F: FnMut(&mut StudyBuffers<T>, usize) -> Option<usize>,
    {
        let n_studies = self.config.n_studies;
        let mut buffers = StudyBuffers::new(self.config.sample_size_max);
        let mut points = Vec::with_capacity(n_studies);

        for k in 0..n_studies {
            if k % self.config.check_interval == 0 && abort.should_abort() {
                debug!(completed = k, "batch aborted");
                return BatchOutcome::Aborted;
            }
            progress.advance(1);
            points.push(study(&mut buffers, k));
        }

        debug!(
            not_found = points.iter().filter(|p| p.is_none()).count(),
            "batch completed"
        );
        BatchOutcome::Completed(points)
    }

    /// Draws one study into `buffers` and scans it
    fn study<S: IndexSampler>(&self, sampler: &mut S, buffers: &mut StudyBuffers<T>) -> Option<usize> {
        let StudyBuffers { index, x, y } = buffers;
        sampler.sample(
            self.population.len(),
            self.config.sample_size_max,
            self.config.replace,
            index,
        );

        x.clear();
        y.clear();
        x.extend(index.iter().map(|&i| self.population.x[i]));
        y.extend(index.iter().map(|&i| self.population.y[i]));

        scan(x, y, self.config.sample_size_min, &self.config.corridor)
    }
}

#[cfg(feature = "parallel")]
impl<T> StudyBatchRunner<'_, T>
where
    T: Default + Clone + Float + Send + Sync,
{
    /// Runs the batch across the rayon thread pool
    ///
    /// Studies are scheduled in blocks of `check_interval`; the abort signal
    /// is polled before each block and an abort discards every result
    /// computed so far. The outcome is identical to [`run`](Self::run).
    pub fn run_parallel<A: AbortSignal>(&self, abort: &A) -> BatchOutcome {
        if self.config.show_progress {
            self.parallel(&LogProgress::new(self.config.n_studies), abort)
        } else {
            self.parallel(&NoProgress, abort)
        }
    }

    #[instrument(level = "debug", skip_all, fields(n_studies = self.config.n_studies))]
    fn parallel<P: Progress, A: AbortSignal>(&self, progress: &P, abort: &A) -> BatchOutcome {
        use rayon::prelude::*;

        let n_studies = self.config.n_studies;
        let seed = self.config.seed;
        let mut points = Vec::with_capacity(n_studies);

        for start in (0..n_studies).step_by(self.config.check_interval) {
            if abort.should_abort() {
                debug!(completed = start, "batch aborted");
                return BatchOutcome::Aborted;
            }
            let end = (start + self.config.check_interval).min(n_studies);
            points.par_extend((start..end).into_par_iter().map_init(
                || StudyBuffers::new(self.config.sample_size_max),
                |buffers, k| {
                    progress.advance(1);
                    self.study(&mut RngSampler::for_study(seed, k), buffers)
                },
            ));
        }

        debug!(
            not_found = points.iter().filter(|p| p.is_none()).count(),
            "batch completed"
        );
        BatchOutcome::Completed(points)
    }
}

/// Runs a seeded batch over two population vectors
///
/// # Arguments
///
/// * `x_pop` - First variable of the population
/// * `y_pop` - Second variable of the population
/// * `config` - The batch configuration
/// * `abort` - Polled every `config.check_interval` studies
///
/// # Returns
///
/// * `Result<BatchOutcome>` - The outcome, or an error if the configuration
///   does not fit the population
pub fn run_batch<T, A>(x_pop: &[T], y_pop: &[T], config: BatchConfig<T>, abort: &A) -> Result<BatchOutcome>
where
    T: Default + Clone + Float,
    A: AbortSignal,
{
    let runner = StudyBatchRunner::new(Population::new(x_pop, y_pop)?, config)?;
    Ok(runner.run(abort))
}

#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[macro_use]
extern crate alloc;

#[cfg(any(test, feature = "parallel"))]
extern crate std;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::helper;

mod error;
pub use error::{Error, Result};

mod paired_sums;
pub use paired_sums::PairedSums;

mod corridor;
pub use corridor::Corridor;

mod stability;
pub use stability::find_stability_point;

mod sampler;
pub use sampler::{IndexSampler, RngSampler, mix_seed};

mod progress;
pub use progress::{AbortSignal, CancelToken, LogProgress, NeverAbort, NoProgress, Progress};

mod config;
pub use config::{BatchConfig, DEFAULT_CHECK_INTERVAL};

mod runner;
pub use runner::{ABORTED, BatchOutcome, NOT_FOUND, Population, StudyBatchRunner, run_batch};

mod summary;
pub use summary::{CriticalPoints, DEFAULT_CONFIDENCE_LEVELS, find_critical_points};

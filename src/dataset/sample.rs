//! Uniform random sampling of records.

use std::fmt;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Dataset, DatasetError};

/// Smallest accepted sample size.
pub const MIN_SAMPLE_SIZE: usize = 1;
/// Largest accepted sample size. Each sampled row costs one LLM call.
pub const MAX_SAMPLE_SIZE: usize = 20;

/// A validated number of records to sample, in `1..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SampleSize(usize);

impl SampleSize {
    /// The smallest valid sample.
    pub const MIN: SampleSize = SampleSize(MIN_SAMPLE_SIZE);

    pub fn new(n: usize) -> Result<Self, DatasetError> {
        if (MIN_SAMPLE_SIZE..=MAX_SAMPLE_SIZE).contains(&n) {
            Ok(Self(n))
        } else {
            Err(DatasetError::InvalidSampleSize(n))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for SampleSize {
    type Error = DatasetError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<SampleSize> for usize {
    fn from(size: SampleSize) -> usize {
        size.0
    }
}

impl fmt::Display for SampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Dataset {
    /// Uniformly sample records without replacement.
    ///
    /// Asking for more records than exist returns every record in random order.
    pub fn sample<R: Rng + ?Sized>(&self, size: SampleSize, rng: &mut R) -> Dataset {
        let amount = size.get().min(self.len());
        if amount < size.get() {
            warn!(
                "Requested {} records but dataset only has {}",
                size,
                self.len()
            );
        }
        let records = rand::seq::index::sample(rng, self.len(), amount)
            .iter()
            .map(|i| self.records[i].clone())
            .collect();
        self.with_records(records)
    }

    /// Load a delimited file and keep a random sample of it.
    pub fn load_sample(
        path: &Path,
        delimiter: u8,
        size: SampleSize,
    ) -> Result<Dataset, DatasetError> {
        let full = Self::load_with_delimiter(path, delimiter)?;
        Ok(full.sample(size, &mut rand::rng()))
    }
}

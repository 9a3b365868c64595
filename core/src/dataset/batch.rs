use crate::dataset::provider::{Fetched, HemorrhageDataset, Sample};
use crate::error::Result;
use log::debug;
use rayon::prelude::*;

/// Samples of one batch, with the ids left out of it
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Ready samples in request order
    pub samples: Vec<Sample>,

    /// Ids whose pixel data could not be used
    pub skipped: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl HemorrhageDataset {
    /// Fetches `indices` in parallel
    ///
    /// Skipped samples are collected by id; any other failure aborts the
    /// whole batch.
    pub fn fetch_batch(&self, indices: &[usize]) -> Result<Batch> {
        let fetched: Vec<Fetched> = indices
            .par_iter()
            .map(|&index| self.get(index))
            .collect::<Result<_>>()?;

        let mut batch = Batch::default();
        for item in fetched {
            match item {
                Fetched::Ready(sample) => batch.samples.push(sample),
                Fetched::Skipped { id, .. } => batch.skipped.push(id),
            }
        }
        debug!(
            "batch of {}: {} ready, {} skipped",
            indices.len(),
            batch.samples.len(),
            batch.skipped.len()
        );
        Ok(batch)
    }
}

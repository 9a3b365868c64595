//! Record index, dataset policies and the sample provider

mod batch;
mod labels;
mod policy;
mod provider;
mod record;

pub use batch::Batch;
pub use labels::{build_target, LabelVocabulary, RSNA_LABELS};
pub use policy::apply_dataset_policy;
pub use provider::{
    DicomDirectory, Fetched, HemorrhageDataset, Identity, Sample, SliceSource, Transform,
};
pub use record::{load_index, Record};

pub mod api;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod extraction;
pub mod types;
pub mod windowing;

pub use api::{MetadataExtractor, RecordMetadata};
pub use cli::report::{SampleReport, SummaryReport, TextReport};
pub use dataset::{
    apply_dataset_policy, build_target, load_index, Batch, DicomDirectory, Fetched,
    HemorrhageDataset, LabelVocabulary, Record, Sample, SliceSource, Transform,
};
pub use error::{HemoprepError, Result};
pub use extraction::{dicom_raw, fix_pixel_representation, RawSlice};
pub use types::*;
pub use windowing::{apply_window, apply_window_policy, rescale_image, HistogramBins};

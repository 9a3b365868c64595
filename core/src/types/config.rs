use crate::error::{HemoprepError, Result};
use crate::types::{DatasetPolicy, WindowPolicy};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Configuration consumed by [`HemorrhageDataset`](crate::HemorrhageDataset)
///
/// Policy fields are kept in their raw configuration spelling and validated
/// when the dataset is constructed, so a typo fails before any sample is read.
///
/// # Example
///
/// ```
/// use hemoprep_core::{DatasetConfig, DatasetPolicy, WindowPolicy};
///
/// let config = DatasetConfig::default()
///     .with_imgdir("/data/stage_2_train")
///     .with_dataset_policy("pos==neg")
///     .with_window_policy(3)
///     .with_spread_diagnosis(0.3)
///     .with_seed(7);
///
/// assert_eq!(config.dataset_policy().unwrap(), DatasetPolicy::PosEqNeg);
/// assert_eq!(config.window_policy().unwrap(), WindowPolicy::Histogram);
/// assert_eq!(config.spread_weight(), Some(0.3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Record index (`.csv` or `.json`)
    pub annotations: PathBuf,

    /// Histogram bin-edge table (`.json` or `.csv`)
    pub bins: PathBuf,

    /// Directory holding `<ID>.dcm` files
    pub imgdir: PathBuf,

    /// Optional label vocabulary (JSON list of names); RSNA order otherwise
    pub labels: Option<PathBuf>,

    /// `all` or `pos==neg`
    pub dataset_policy: String,

    /// 1, 2 or 3
    pub window_policy: u32,

    /// Spread left/right sub-labels onto the target
    pub spread_diagnosis: bool,

    /// Weight added per spread sub-label
    pub propagate_diagnosis: f32,

    /// Keep only records from these folds
    pub folds: Option<Vec<u32>>,

    /// Seed for the `pos==neg` sampler; entropy-seeded when absent
    pub seed: Option<u64>,

    /// Correct unsigned pixel data before rescaling; off unless requested
    pub fix_pixel_representation: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            annotations: PathBuf::from("annotations.csv"),
            bins: PathBuf::from("bins.json"),
            imgdir: PathBuf::from("images"),
            labels: None,
            dataset_policy: DatasetPolicy::All.simple_name().to_string(),
            window_policy: WindowPolicy::Bone.id(),
            spread_diagnosis: false,
            propagate_diagnosis: 0.0,
            folds: None,
            seed: None,
            fix_pixel_representation: false,
        }
    }
}

impl DatasetConfig {
    /// Loads a configuration from a JSON file
    ///
    /// Missing keys fall back to [`DatasetConfig::default`]. Malformed
    /// files and ill-typed values are configuration errors.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|e| {
            HemoprepError::Configuration(format!("{}: {}", path.display(), e))
        })
    }

    /// Validated dataset policy
    pub fn dataset_policy(&self) -> Result<DatasetPolicy> {
        self.dataset_policy.parse()
    }

    /// Validated window policy
    pub fn window_policy(&self) -> Result<WindowPolicy> {
        WindowPolicy::from_id(self.window_policy)
    }

    /// Propagation weight, present only when spreading is enabled
    pub fn spread_weight(&self) -> Option<f32> {
        self.spread_diagnosis.then_some(self.propagate_diagnosis)
    }

    /// Builder: Set the record index path
    pub fn with_annotations(mut self, path: impl Into<PathBuf>) -> Self {
        self.annotations = path.into();
        self
    }

    /// Builder: Set the bin table path
    pub fn with_bins(mut self, path: impl Into<PathBuf>) -> Self {
        self.bins = path.into();
        self
    }

    /// Builder: Set the image directory
    pub fn with_imgdir(mut self, path: impl Into<PathBuf>) -> Self {
        self.imgdir = path.into();
        self
    }

    /// Builder: Set the label vocabulary path
    pub fn with_labels(mut self, path: impl Into<PathBuf>) -> Self {
        self.labels = Some(path.into());
        self
    }

    /// Builder: Set the dataset policy spelling
    pub fn with_dataset_policy(mut self, policy: impl Into<String>) -> Self {
        self.dataset_policy = policy.into();
        self
    }

    /// Builder: Set the window policy identifier
    pub fn with_window_policy(mut self, policy: u32) -> Self {
        self.window_policy = policy;
        self
    }

    /// Builder: Enable diagnosis spreading with the given weight
    pub fn with_spread_diagnosis(mut self, weight: f32) -> Self {
        self.spread_diagnosis = true;
        self.propagate_diagnosis = weight;
        self
    }

    /// Builder: Restrict to the given folds
    pub fn with_folds(mut self, folds: Vec<u32>) -> Self {
        self.folds = Some(folds);
        self
    }

    /// Builder: Seed the `pos==neg` sampler
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: Toggle the pixel representation fix-up
    pub fn fix_pixel_representation(mut self, enabled: bool) -> Self {
        self.fix_pixel_representation = enabled;
        self
    }
}

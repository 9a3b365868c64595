use crate::dataset::labels::{build_target, LabelVocabulary};
use crate::dataset::policy::apply_dataset_policy;
use crate::dataset::record::{load_index, Record};
use crate::error::{HemoprepError, Result};
use crate::extraction::{fix_pixel_representation, RawSlice};
use crate::types::{DatasetConfig, DatasetPolicy, WindowPolicy};
use crate::windowing::{apply_window_policy, rescale_image, HistogramBins};
use dicom_object::open_file;
use log::{debug, info, warn};
use ndarray::{Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

/// Source of stored pixel data, addressed by record id
pub trait SliceSource: Send + Sync {
    /// Loads the slice of record `id`
    ///
    /// Undecodable pixel data must be reported as `MalformedPixelData`;
    /// the provider turns exactly that error into a skipped sample.
    fn load(&self, id: &str) -> Result<RawSlice>;
}

/// DICOM files laid out as `<root>/<ID>.dcm`
#[derive(Debug, Clone)]
pub struct DicomDirectory {
    root: PathBuf,
}

impl DicomDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file holding record `id`
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.dcm", id))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SliceSource for DicomDirectory {
    fn load(&self, id: &str) -> Result<RawSlice> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(HemoprepError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no DICOM file at {}", path.display()),
            )));
        }
        let dcm = open_file(&path)?;
        RawSlice::from_dicom(&dcm)
    }
}

/// Augmentation applied to each normalized image
pub trait Transform: Send + Sync {
    fn apply(&self, image: Array3<f32>) -> Array3<f32>;
}

/// Returns the image unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, image: Array3<f32>) -> Array3<f32> {
        image
    }
}

impl<F> Transform for F
where
    F: Fn(Array3<f32>) -> Array3<f32> + Send + Sync,
{
    fn apply(&self, image: Array3<f32>) -> Array3<f32> {
        self(image)
    }
}

/// One training sample
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// `(H, W, 3)` image, channel-last
    pub image: Array3<f32>,

    /// Soft target over the label vocabulary
    pub target: Array1<f32>,

    pub id: String,
}

/// Outcome of fetching one index
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Ready(Sample),
    /// The slice's pixel data could not be used; leave it out of this pass
    Skipped { id: String, reason: String },
}

impl Fetched {
    pub fn id(&self) -> &str {
        match self {
            Fetched::Ready(sample) => &sample.id,
            Fetched::Skipped { id, .. } => id,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Fetched::Skipped { .. })
    }

    /// The sample, if one was produced
    pub fn ready(self) -> Option<Sample> {
        match self {
            Fetched::Ready(sample) => Some(sample),
            Fetched::Skipped { .. } => None,
        }
    }
}

/// Fixed-size indexable sequence of hemorrhage training samples
///
/// The record list is filtered and resampled once at construction and is
/// read-only afterwards, so [`get`](Self::get) can be called from many
/// threads at once. Every call re-reads its slice from the source.
pub struct HemorrhageDataset {
    records: Vec<Record>,
    bins: HistogramBins,
    vocabulary: LabelVocabulary,
    dataset_policy: DatasetPolicy,
    window_policy: WindowPolicy,
    spread_weight: Option<f32>,
    fix_pixels: bool,
    source: Box<dyn SliceSource>,
    transform: Box<dyn Transform>,
}

impl HemorrhageDataset {
    /// Builds a dataset from on-disk inputs named by `config`
    ///
    /// Policies are validated before any file is read.
    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        config.dataset_policy()?;
        config.window_policy()?;

        let records = load_index(&config.annotations)?;
        let bins = HistogramBins::load(&config.bins)?;
        let vocabulary = match &config.labels {
            Some(path) => LabelVocabulary::from_json_file(path)?,
            None => LabelVocabulary::rsna(),
        };
        debug!(
            "loaded {} bin edges and {} labels",
            bins.len(),
            vocabulary.len()
        );

        Self::from_parts(
            config,
            records,
            bins,
            vocabulary,
            DicomDirectory::new(&config.imgdir),
        )
    }

    /// Builds a dataset from already loaded parts
    ///
    /// Applies the fold filter and then the dataset policy. Without a
    /// configured seed the `pos==neg` draw is not reproducible.
    pub fn from_parts(
        config: &DatasetConfig,
        records: Vec<Record>,
        bins: HistogramBins,
        vocabulary: LabelVocabulary,
        source: impl SliceSource + 'static,
    ) -> Result<Self> {
        let dataset_policy = config.dataset_policy()?;
        let window_policy = config.window_policy()?;

        let records = match &config.folds {
            Some(folds) => records
                .into_iter()
                .filter(|r| folds.contains(&r.fold))
                .collect(),
            None => records,
        };
        info!("read dataset ({} records)", records.len());

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                if dataset_policy == DatasetPolicy::PosEqNeg {
                    warn!("no seed configured; pos==neg sampling is not reproducible");
                }
                StdRng::from_entropy()
            }
        };
        let records = apply_dataset_policy(records, dataset_policy, &mut rng)?;
        info!(
            "applied dataset_policy {} ({} records)",
            dataset_policy,
            records.len()
        );

        Ok(Self {
            records,
            bins,
            vocabulary,
            dataset_policy,
            window_policy,
            spread_weight: config.spread_weight(),
            fix_pixels: config.fix_pixel_representation,
            source: Box::new(source),
            transform: Box::new(Identity),
        })
    }

    /// Replaces the augmentation applied after windowing
    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of active records carrying at least one label
    pub fn positives(&self) -> usize {
        self.records.iter().filter(|r| r.is_positive()).count()
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    pub fn dataset_policy(&self) -> DatasetPolicy {
        self.dataset_policy
    }

    pub fn window_policy(&self) -> WindowPolicy {
        self.window_policy
    }

    /// Fetches the sample at `index`
    ///
    /// # Errors
    ///
    /// `OutOfBounds` past the end, I/O and DICOM errors from the source,
    /// and `UnknownLabel` from target construction. Undecodable pixel data
    /// is not an error: it yields [`Fetched::Skipped`].
    pub fn get(&self, index: usize) -> Result<Fetched> {
        let record = self.records.get(index).ok_or(HemoprepError::OutOfBounds {
            index,
            len: self.records.len(),
        })?;

        let raw = match self.source.load(&record.id) {
            Ok(raw) => raw,
            Err(HemoprepError::MalformedPixelData(reason)) => {
                warn!("Skipping {}: {}", record.id, reason);
                return Ok(Fetched::Skipped {
                    id: record.id.clone(),
                    reason,
                });
            }
            Err(e) => return Err(e),
        };

        let (pixels, intercept) = self.stored_values(record, &raw);
        let hu = rescale_image(&pixels, record.rescale_slope, intercept);
        let image = apply_window_policy(&hu, record.window(), self.window_policy, &self.bins)?;
        let image = self.transform.apply(image);
        let target = build_target(record, &self.vocabulary, self.spread_weight)?;

        Ok(Fetched::Ready(Sample {
            image,
            target,
            id: record.id.clone(),
        }))
    }

    /// Stored values as floats with the intercept to rescale them by
    fn stored_values(&self, record: &Record, raw: &RawSlice) -> (Array2<f32>, f32) {
        if self.fix_pixels {
            if let Cow::Owned(fixed) = fix_pixel_representation(raw) {
                debug!(
                    "{}: pixel representation fixed, intercept {}",
                    record.id, fixed.rescale_intercept
                );
                return (fixed.to_f32(), fixed.rescale_intercept);
            }
        }
        (raw.to_f32(), record.rescale_intercept)
    }
}

use crate::error::{HemoprepError, Result};
use ndarray::Array2;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Spatial size the histogram channel is expected to have
pub const EXPECTED_SHAPE: (usize, usize) = (512, 512);

/// Ordered bin edges for histogram scaling
///
/// Loaded once per dataset and shared read-only across samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    edges: Vec<f32>,
}

impl HistogramBins {
    /// Creates a bin table from edges
    ///
    /// # Errors
    ///
    /// Returns `IndexError` if `edges` is empty, contains a non-finite
    /// value, or is not sorted in non-decreasing order.
    pub fn new(edges: Vec<f32>) -> Result<Self> {
        if edges.is_empty() {
            return Err(HemoprepError::IndexError("bin table is empty".to_string()));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(HemoprepError::IndexError(format!(
                "bin edge {} is not finite",
                bad
            )));
        }
        if let Some(pos) = edges.windows(2).position(|w| w[1] < w[0]) {
            return Err(HemoprepError::IndexError(format!(
                "bin edges decrease at position {}",
                pos + 1
            )));
        }
        Ok(Self { edges })
    }

    /// Loads bin edges from `.json` (array of numbers) or `.csv`
    /// (headerless, one value per line)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let edges = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let reader = BufReader::new(File::open(path)?);
                serde_json::from_reader::<_, Vec<f32>>(reader)?
            }
            Some("csv") => {
                let mut reader = csv::ReaderBuilder::new()
                    .has_headers(false)
                    .from_path(path)?;
                let mut edges = Vec::new();
                for row in reader.deserialize::<(f32,)>() {
                    edges.push(row?.0);
                }
                edges
            }
            _ => {
                return Err(HemoprepError::IndexError(format!(
                    "unsupported bin table format: {}",
                    path.display()
                )))
            }
        };
        Self::new(edges)
    }

    /// Bin edges in order
    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Maps one intensity onto `[0, 1]`
    ///
    /// Edge `i` maps to `i / (n - 1)`, with linear interpolation between
    /// edges. Values below the first edge give 0, above the last give 1.
    pub fn scale_value(&self, value: f32) -> f32 {
        let n = self.edges.len();
        if value.is_nan() {
            return value;
        }
        if n == 1 {
            return 0.0;
        }
        let first = self.edges[0];
        let last = self.edges[n - 1];
        if value <= first {
            return 0.0;
        }
        if value >= last {
            return 1.0;
        }

        // first edge strictly greater than value; 1 <= upper <= n - 1
        let upper = self.edges.partition_point(|&e| e <= value);
        let lo = self.edges[upper - 1];
        let hi = self.edges[upper];
        let t = (value - lo) / (hi - lo);
        (((upper - 1) as f32 + t) / (n - 1) as f32).clamp(0.0, 1.0)
    }

    /// Histogram-scales a whole image, keeping its shape
    pub fn scale(&self, image: &Array2<f32>) -> Array2<f32> {
        image.mapv(|v| self.scale_value(v))
    }
}

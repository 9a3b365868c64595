use crate::error::{HemoprepError, Result};
use crate::types::WindowParams;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One row of the record index
///
/// Field names follow the index columns (`ID`, `fold`, `labels`,
/// `LeftLabel`, ...). Rows are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ID")]
    pub id: String,

    pub fold: u32,

    /// Space-separated label tokens; empty for negatives
    #[serde(default)]
    pub labels: String,

    #[serde(rename = "LeftLabel", default)]
    pub left_label: Option<String>,

    #[serde(rename = "RightLabel", default)]
    pub right_label: Option<String>,

    #[serde(rename = "RescaleSlope")]
    pub rescale_slope: f32,

    #[serde(rename = "RescaleIntercept")]
    pub rescale_intercept: f32,

    #[serde(rename = "WindowCenter")]
    pub window_center: f32,

    #[serde(rename = "WindowWidth")]
    pub window_width: f32,
}

impl Record {
    /// Label tokens of the main label string
    pub fn label_tokens(&self) -> impl Iterator<Item = &str> {
        self.labels.split_whitespace()
    }

    /// Label tokens of the left and right sub-labels, left first
    pub fn lateral_tokens(&self) -> impl Iterator<Item = &str> {
        self.left_label
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .chain(self.right_label.as_deref().unwrap_or_default().split_whitespace())
    }

    /// Whether the record carries at least one label
    pub fn is_positive(&self) -> bool {
        self.label_tokens().next().is_some()
    }

    /// The record's own display window
    pub fn window(&self) -> WindowParams {
        WindowParams::new(self.window_center, self.window_width)
    }
}

/// Loads the record index from `.csv` or `.json`
///
/// JSON indexes are an array of row objects with the same column names.
pub fn load_index(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => load_index_csv(path),
        Some("json") => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
        _ => Err(HemoprepError::IndexError(format!(
            "unsupported index format: {}",
            path.display()
        ))),
    }
}

fn load_index_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

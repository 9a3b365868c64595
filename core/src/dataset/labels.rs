use crate::dataset::Record;
use crate::error::{HemoprepError, Result};
use ndarray::Array1;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Hemorrhage subtypes in target order
pub const RSNA_LABELS: [&str; 6] = [
    "any",
    "epidural",
    "intraparenchymal",
    "intraventricular",
    "subarachnoid",
    "subdural",
];

/// Closed mapping from label name to target index
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVocabulary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self::rsna()
    }
}

impl LabelVocabulary {
    /// Builds a vocabulary from ordered names
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty list or duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(HemoprepError::Configuration(
                "label vocabulary is empty".to_string(),
            ));
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(HemoprepError::Configuration(format!(
                    "duplicate label '{}' in vocabulary",
                    name
                )));
            }
        }
        Ok(Self { names, index })
    }

    /// The RSNA hemorrhage vocabulary
    pub fn rsna() -> Self {
        let names: Vec<String> = RSNA_LABELS.iter().map(|s| s.to_string()).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, index }
    }

    /// Loads a vocabulary from a JSON list of names
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let names: Vec<String> = serde_json::from_reader(reader)?;
        Self::new(names)
    }

    /// Target index of a label
    ///
    /// # Errors
    ///
    /// Returns `UnknownLabel` when the label is not in the vocabulary.
    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| HemoprepError::UnknownLabel(label.to_string()))
    }

    /// Label names in target order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Builds the soft target vector of a record
///
/// Every main label sets its entry to 1. With a spread weight, each left or
/// right sub-label adds the weight to its entry. The result is clipped to
/// `[0, 1]`.
///
/// # Errors
///
/// Returns `UnknownLabel` for any token outside the vocabulary.
pub fn build_target(
    record: &Record,
    vocabulary: &LabelVocabulary,
    spread_weight: Option<f32>,
) -> Result<Array1<f32>> {
    let mut target = Array1::<f32>::zeros(vocabulary.len());

    for label in record.label_tokens() {
        target[vocabulary.index_of(label)?] = 1.0;
    }

    if let Some(weight) = spread_weight {
        for label in record.lateral_tokens() {
            target[vocabulary.index_of(label)?] += weight;
        }
    }

    Ok(target.mapv_into(|v| v.clamp(0.0, 1.0)))
}

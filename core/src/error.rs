use thiserror::Error;

/// Result type for hemoprep operations
pub type Result<T> = std::result::Result<T, HemoprepError>;

/// Error types for hemoprep operations
#[derive(Error, Debug)]
pub enum HemoprepError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Tag not found in DICOM file
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// Pixel data could not be decoded into a 2D intensity array
    #[error("Malformed pixel data: {0}")]
    MalformedPixelData(String),

    /// Unrecognized policy or otherwise unusable configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Label token missing from the label vocabulary
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Record index or bin table could not be parsed
    #[error("Index error: {0}")]
    IndexError(String),

    /// Not enough negative records to balance against the positives
    #[error("cannot sample {positives} negatives from {negatives} negative records")]
    InsufficientNegatives { positives: usize, negatives: usize },

    /// Sample index past the end of the dataset
    #[error("index {index} out of bounds for dataset of {len} records")]
    OutOfBounds { index: usize, len: usize },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HemoprepError {
    /// Returns whether this error stems from misconfiguration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HemoprepError::Configuration(_) | HemoprepError::InsufficientNegatives { .. }
        )
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for HemoprepError {
    fn from(e: dicom_object::ReadError) -> Self {
        HemoprepError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for HemoprepError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        HemoprepError::InvalidValue(format!("{}", e))
    }
}

impl From<csv::Error> for HemoprepError {
    fn from(e: csv::Error) -> Self {
        HemoprepError::IndexError(format!("{}", e))
    }
}

impl From<serde_json::Error> for HemoprepError {
    fn from(e: serde_json::Error) -> Self {
        HemoprepError::IndexError(format!("{}", e))
    }
}

impl From<ndarray::ShapeError> for HemoprepError {
    fn from(e: ndarray::ShapeError) -> Self {
        HemoprepError::MalformedPixelData(format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        assert!(HemoprepError::Configuration("window_policy 7".into()).is_configuration());
        assert!(HemoprepError::InsufficientNegatives {
            positives: 3,
            negatives: 1
        }
        .is_configuration());
        assert!(!HemoprepError::UnknownLabel("foo".into()).is_configuration());
    }

    #[test]
    fn test_error_messages() {
        let err = HemoprepError::OutOfBounds { index: 12, len: 10 };
        assert_eq!(
            err.to_string(),
            "index 12 out of bounds for dataset of 10 records"
        );

        let err = HemoprepError::UnknownLabel("epi".into());
        assert_eq!(err.to_string(), "Unknown label: epi");
    }
}

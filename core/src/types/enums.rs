use crate::error::HemoprepError;
use std::fmt;
use std::str::FromStr;

/// Multi-channel normalization strategy applied to a rescaled slice
///
/// Every policy emits the brain and subdural windows as the first two
/// channels; they differ in the third channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowPolicy {
    /// Third channel: the record's own window, min-max normalized
    RecordWindow,
    /// Third channel: bone window with fixed normalization constants
    Bone,
    /// Third channel: histogram-scaled intensities, min-max normalized
    Histogram,
}

impl WindowPolicy {
    /// All policies in identifier order
    pub const ALL: [WindowPolicy; 3] = [
        WindowPolicy::RecordWindow,
        WindowPolicy::Bone,
        WindowPolicy::Histogram,
    ];

    /// Parses the numeric policy identifier (1, 2 or 3)
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any other value
    pub fn from_id(id: u32) -> Result<Self, HemoprepError> {
        match id {
            1 => Ok(WindowPolicy::RecordWindow),
            2 => Ok(WindowPolicy::Bone),
            3 => Ok(WindowPolicy::Histogram),
            other => Err(HemoprepError::Configuration(format!(
                "unrecognized window_policy {}",
                other
            ))),
        }
    }

    /// Numeric policy identifier
    pub fn id(&self) -> u32 {
        match self {
            WindowPolicy::RecordWindow => 1,
            WindowPolicy::Bone => 2,
            WindowPolicy::Histogram => 3,
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            WindowPolicy::RecordWindow => "brain/subdural/record-window",
            WindowPolicy::Bone => "brain/subdural/bone",
            WindowPolicy::Histogram => "brain/subdural/histogram",
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.simple_name())
    }
}

/// Resampling strategy applied once to the record index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatasetPolicy {
    /// Keep every record
    #[default]
    All,
    /// Keep all positives and an equally sized random subset of negatives
    PosEqNeg,
}

impl DatasetPolicy {
    /// Returns the configuration spelling of the policy
    pub fn simple_name(&self) -> &'static str {
        match self {
            DatasetPolicy::All => "all",
            DatasetPolicy::PosEqNeg => "pos==neg",
        }
    }
}

impl FromStr for DatasetPolicy {
    type Err = HemoprepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(DatasetPolicy::All),
            "pos==neg" => Ok(DatasetPolicy::PosEqNeg),
            other => Err(HemoprepError::Configuration(format!(
                "unrecognized dataset_policy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DatasetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_policy_ids_round_trip() {
        for policy in WindowPolicy::ALL {
            assert_eq!(WindowPolicy::from_id(policy.id()).unwrap(), policy);
        }
    }

    #[test]
    fn test_unknown_window_policy_is_configuration_error() {
        for id in [0, 4, 42] {
            let err = WindowPolicy::from_id(id).unwrap_err();
            assert!(matches!(err, HemoprepError::Configuration(_)));
        }
    }

    #[test]
    fn test_dataset_policy_parse() {
        assert_eq!("all".parse::<DatasetPolicy>().unwrap(), DatasetPolicy::All);
        assert_eq!(
            "pos==neg".parse::<DatasetPolicy>().unwrap(),
            DatasetPolicy::PosEqNeg
        );
        assert!(matches!(
            "balanced".parse::<DatasetPolicy>(),
            Err(HemoprepError::Configuration(_))
        ));
    }

    #[test]
    fn test_dataset_policy_display() {
        assert_eq!(DatasetPolicy::PosEqNeg.to_string(), "pos==neg");
        assert_eq!(DatasetPolicy::default().to_string(), "all");
    }
}

pub mod report;

use crate::error::Result;
use crate::types::DatasetConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for hemoprep
#[derive(Parser, Debug)]
#[command(name = "hemoprep")]
#[command(about = "Head CT windowing and dataset preparation tool")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the record metadata of one DICOM file
    Inspect {
        /// Path to DICOM file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dump every standard attribute instead of the typed record
        #[arg(long)]
        raw: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Build the dataset and print its record counts
    Summary {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Fetch one sample and print its statistics
    Sample {
        #[command(flatten)]
        config: ConfigArgs,

        /// Sample index
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
}

/// Dataset configuration: a JSON file, overridden by individual flags
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Record index (.csv or .json)
    #[arg(long)]
    pub annotations: Option<PathBuf>,

    /// Histogram bin table (.json or .csv)
    #[arg(long)]
    pub bins: Option<PathBuf>,

    /// Directory of <ID>.dcm files
    #[arg(long)]
    pub imgdir: Option<PathBuf>,

    /// Label vocabulary (JSON list of names)
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Dataset policy: all or pos==neg
    #[arg(long)]
    pub dataset_policy: Option<String>,

    /// Window policy: 1, 2 or 3
    #[arg(long)]
    pub window_policy: Option<u32>,

    /// Spread left/right sub-labels with this weight
    #[arg(long, value_name = "WEIGHT")]
    pub spread_diagnosis: Option<f32>,

    /// Keep only these folds
    #[arg(long, value_delimiter = ',')]
    pub folds: Option<Vec<u32>>,

    /// Seed for pos==neg sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Correct unsigned slices with a mis-encoded intercept
    #[arg(long)]
    pub fix_pixels: bool,
}

impl ConfigArgs {
    /// Resolves the effective dataset configuration
    pub fn resolve(&self) -> Result<DatasetConfig> {
        let mut config = match &self.config {
            Some(path) => DatasetConfig::from_json_file(path)?,
            None => DatasetConfig::default(),
        };

        if let Some(path) = &self.annotations {
            config = config.with_annotations(path);
        }
        if let Some(path) = &self.bins {
            config = config.with_bins(path);
        }
        if let Some(path) = &self.imgdir {
            config = config.with_imgdir(path);
        }
        if let Some(path) = &self.labels {
            config = config.with_labels(path);
        }
        if let Some(policy) = &self.dataset_policy {
            config = config.with_dataset_policy(policy.as_str());
        }
        if let Some(policy) = self.window_policy {
            config = config.with_window_policy(policy);
        }
        if let Some(weight) = self.spread_diagnosis {
            config = config.with_spread_diagnosis(weight);
        }
        if let Some(folds) = &self.folds {
            config = config.with_folds(folds.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.fix_pixels {
            config = config.fix_pixel_representation(true);
        }

        Ok(config)
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DatasetPolicy, WindowPolicy};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::parse_from(["hemoprep", "inspect", "slice.dcm", "--raw", "-f", "json"]);
        match cli.command {
            Command::Inspect { file, raw, format } => {
                assert_eq!(file, PathBuf::from("slice.dcm"));
                assert!(raw);
                assert!(matches!(format, OutputFormat::Json));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"imgdir": "/data/train", "window_policy": 1, "seed": 5}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from([
            "hemoprep",
            "summary",
            "--config",
            path.as_str(),
            "--dataset-policy",
            "pos==neg",
            "--folds",
            "0,2",
            "-v",
        ]);
        assert!(cli.verbose);

        let Command::Summary { config } = cli.command else {
            panic!("expected summary");
        };
        let config = config.resolve().unwrap();
        assert_eq!(config.imgdir, PathBuf::from("/data/train"));
        assert_eq!(config.window_policy().unwrap(), WindowPolicy::RecordWindow);
        assert_eq!(config.dataset_policy().unwrap(), DatasetPolicy::PosEqNeg);
        assert_eq!(config.folds, Some(vec![0, 2]));
        assert_eq!(config.seed, Some(5));
        assert!(!config.fix_pixel_representation);
    }

    #[test]
    fn test_sample_defaults() {
        let cli = Cli::parse_from([
            "hemoprep",
            "sample",
            "--spread-diagnosis",
            "0.3",
            "--fix-pixels",
        ]);
        let Command::Sample { config, index } = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(index, 0);
        let config = config.resolve().unwrap();
        assert_eq!(config.spread_weight(), Some(0.3));
        assert!(config.fix_pixel_representation);
    }
}

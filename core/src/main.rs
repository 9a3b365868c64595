use clap::Parser;
use dicom_object::open_file;
use hemoprep_core::cli::{Cli, Command, ConfigArgs, OutputFormat};
use hemoprep_core::{
    dicom_raw, Fetched, HemoprepError, HemorrhageDataset, MetadataExtractor, Result, SampleReport,
    SummaryReport, TextReport,
};
use log::{error, info};
use std::path::Path;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let outcome = match &cli.command {
        Command::Inspect { file, raw, format } => inspect(file, *raw, format),
        Command::Summary { config } => summary(config),
        Command::Sample { config, index } => sample(config, *index),
    };

    if let Err(e) = outcome {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(exit_code(&e));
    }
}

/// 2 for misconfiguration, 1 for everything else
fn exit_code(e: &HemoprepError) -> i32 {
    if e.is_configuration() {
        2
    } else {
        1
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn inspect(file: &Path, raw: bool, format: &OutputFormat) -> Result<()> {
    let dcm = open_file(file)?;

    if raw {
        let dump = dicom_raw(&dcm);
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dump)?),
            OutputFormat::Text => {
                for (keyword, value) in &dump {
                    println!("{}: {}", keyword, serde_json::to_string(value)?);
                }
            }
        }
        return Ok(());
    }

    let metadata = MetadataExtractor::extract(&dcm)?;
    match format {
        OutputFormat::Text => println!("{}", TextReport::new(&metadata)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metadata)?),
    }
    Ok(())
}

fn load_dataset(args: &ConfigArgs) -> Result<HemorrhageDataset> {
    let config = args.resolve()?;
    info!(
        "Building dataset from {} (images in {})",
        config.annotations.display(),
        config.imgdir.display()
    );
    HemorrhageDataset::from_config(&config)
}

fn summary(args: &ConfigArgs) -> Result<()> {
    let dataset = load_dataset(args)?;
    println!("{}", SummaryReport::new(&dataset));
    Ok(())
}

fn sample(args: &ConfigArgs, index: usize) -> Result<()> {
    let dataset = load_dataset(args)?;
    match dataset.get(index)? {
        Fetched::Ready(sample) => {
            println!(
                "{}",
                SampleReport::new(&sample, dataset.vocabulary().names())
            );
        }
        Fetched::Skipped { id, reason } => {
            println!("Sample {} skipped: {}", id, reason);
        }
    }
    Ok(())
}

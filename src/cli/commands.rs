use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::download::{summarise_downloads, Downloader, HttpFetcher};
use crate::error::{ProcessingError, Result};
use crate::processors::CleaningPipeline;
use crate::utils::constants::{INSPECT_SAMPLE_ROWS, JOURNEY_FILES};
use crate::utils::progress::ProgressReporter;
use crate::utils::structure_report_path_for;
use crate::writers::{write_json_report, TripWriter};
use std::path::Path;
use tracing::{error, info};

pub fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Download { workers } => {
            download(&config, workers)?;
        }

        Commands::Inspect { input_dir, no_save } => {
            let input_dir = input_dir.unwrap_or_else(|| config.raw_dir());
            let pipeline = CleaningPipeline::new();
            let files = pipeline.discover_input_files(&input_dir)?;
            println!(
                "Inspecting {} files in {}",
                files.len(),
                input_dir.display()
            );

            let spinner = ProgressReporter::new_spinner("Reading file headers...", false);
            let report = pipeline.inspect(&files);
            spinner.finish_with_message(&format!("Inspected {} files", report.files.len()));
            println!("\n{}", report.display_summary());

            if !no_save {
                let report_path = config.structure_report_path();
                write_json_report(&report, &report_path)?;
                println!("Structure report saved to {}", report_path.display());
            }
        }

        Commands::Clean {
            input_dir,
            output_file,
            top_n,
        } => {
            let input_dir = input_dir.unwrap_or_else(|| config.raw_dir());
            let output_file = output_file.unwrap_or_else(|| config.clean_trips_path());
            clean(&config, &input_dir, &output_file, top_n)?;
        }

        Commands::Run { workers } => {
            download(&config, workers)?;
            clean(&config, &config.raw_dir(), &config.clean_trips_path(), None)?;
        }
    }

    Ok(())
}

fn download(config: &PipelineConfig, workers: Option<usize>) -> Result<()> {
    let workers = workers.unwrap_or(config.download_workers);
    let raw_dir = config.raw_dir();
    println!(
        "Downloading {} files to {} ({} workers)",
        JOURNEY_FILES.len(),
        raw_dir.display(),
        workers
    );

    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let downloader = Downloader::new(fetcher, &config.base_url, &raw_dir, workers);

    let progress = ProgressReporter::for_files(JOURNEY_FILES.len(), "Downloading", false);
    let report = downloader.download_all(JOURNEY_FILES, &progress)?;
    progress.finish_with_message("Downloads complete");

    println!("\n{}", report.display_summary());

    let summary_path = config.download_summary_path();
    if summarise_downloads(&report, &raw_dir, &summary_path)? {
        println!("Download summary saved to {}", summary_path.display());
    } else {
        println!("No files downloaded; no download summary written");
    }
    Ok(())
}

fn clean(
    config: &PipelineConfig,
    input_dir: &Path,
    output_file: &Path,
    top_n: Option<usize>,
) -> Result<()> {
    let pipeline = CleaningPipeline::new().with_top_n(top_n.unwrap_or(config.top_n));
    let files = pipeline.discover_input_files(input_dir)?;
    println!(
        "Cleaning {} files from {}",
        files.len(),
        input_dir.display()
    );

    let spinner = ProgressReporter::new_spinner("Checking column layouts...", false);
    let structure = pipeline.inspect(&files);
    spinner.finish_with_message("Column layouts checked");
    if !structure.is_consistent() {
        info!(
            layouts = structure.groups.len(),
            "input files use more than one column layout"
        );
    }

    let progress = ProgressReporter::for_files(files.len(), "Cleaning", false);
    let outcome = match pipeline.run(&files, &progress) {
        Ok(outcome) => outcome,
        Err(ProcessingError::NoUsableInput(reason)) => {
            error!(%reason, "no usable input, nothing written");
            println!("No usable input files; no output written");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("\n{}", outcome.display_summary());

    let written = TripWriter::new().write_records(outcome.records(), output_file)?;
    println!("{}", written.summary());

    let report_path = structure_report_path_for(output_file);
    write_json_report(&structure, &report_path)?;
    println!("Structure report saved to {}", report_path.display());

    let sample = outcome.records().iter().take(INSPECT_SAMPLE_ROWS);
    println!("\nSample trips:");
    for (i, trip) in sample.enumerate() {
        println!(
            "{}. {} -> {} ({}s, {})",
            i + 1,
            trip.start_station_name,
            trip.end_station_name,
            trip.duration_seconds.unwrap_or_default(),
            trip.start_date.as_deref().unwrap_or("unknown start")
        );
    }

    println!("Cleaning complete!");
    Ok(())
}

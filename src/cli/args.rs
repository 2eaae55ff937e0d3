use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bikeshare-pipeline")]
#[command(about = "Download and clean London cycle hire journey extracts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: bikeshare.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the journey extracts into the raw data directory
    Download {
        #[arg(short, long, help = "Concurrent downloads [default: from config]")]
        workers: Option<usize>,
    },

    /// Report the column layout of every raw extract
    Inspect {
        #[arg(short, long, help = "Directory of raw CSV files [default: <data_dir>/raw]")]
        input_dir: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Print the report without saving it")]
        no_save: bool,
    },

    /// Normalise, combine and filter raw extracts into one clean table
    Clean {
        #[arg(short, long, help = "Directory of raw CSV files [default: <data_dir>/raw]")]
        input_dir: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: <data_dir>/processed/clean_trips.csv]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Rows in the busiest-station tables [default: from config]")]
        top_n: Option<usize>,
    },

    /// Download, then clean
    Run {
        #[arg(short, long, help = "Concurrent downloads [default: from config]")]
        workers: Option<usize>,
    },
}

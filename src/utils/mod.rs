pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{
    alternate_journey_filename, file_name_of, partial_path, structure_report_path_for,
};
pub use progress::ProgressReporter;

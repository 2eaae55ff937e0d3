pub mod trip_writer;

pub use trip_writer::{write_json_report, TripWriter, WrittenFileInfo};

pub mod trip_reader;

pub use trip_reader::TripReader;

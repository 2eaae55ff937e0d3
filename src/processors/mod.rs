pub mod aggregator;
pub mod duration;
pub mod normalizer;
pub mod pipeline;
pub mod summary;

pub use aggregator::{parse_canonical_datetime, AggregationResult, Aggregator};
pub use duration::{parse_duration, parse_duration_field, DurationValue};
pub use normalizer::SchemaNormalizer;
pub use pipeline::{CleaningOutcome, CleaningPipeline, ProcessedFile, SkipReason, SkippedFile};
pub use summary::{EntitySummary, StationConsistency, StationCount, TripSummary};

pub mod raw;
pub mod structure;
pub mod trip;

pub use raw::{RawTripRecord, RawTripTable};
pub use structure::{FileStructureInfo, StructureGroup, StructureReport};
pub use trip::{month_name, CanonicalTripRecord, CANONICAL_COLUMNS};

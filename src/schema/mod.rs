pub mod inspector;

pub use inspector::StructureInspector;

use serde::{Deserialize, Serialize};

/// Column names of the journey extracts published from late 2022 onwards
pub mod new_format {
    pub const MARKER: &str = "Number";
    pub const START_DATE: &str = "Start date";
    pub const END_DATE: &str = "End date";
    pub const START_STATION_ID: &str = "Start station number";
    pub const START_STATION_NAME: &str = "Start station";
    pub const END_STATION_ID: &str = "End station number";
    pub const END_STATION_NAME: &str = "End station";
    pub const BIKE_ID: &str = "Bike number";
    pub const DURATION: &str = "Total duration";
}

/// Column names of the earlier rental-id keyed extracts
pub mod old_format {
    pub const MARKER: &str = "Rental Id";
    pub const START_DATE: &str = "Start Date";
    pub const END_DATE: &str = "End Date";
    pub const START_STATION_ID: &str = "StartStation Id";
    pub const START_STATION_NAME: &str = "StartStation Name";
    pub const END_STATION_ID: &str = "EndStation Id";
    pub const END_STATION_NAME: &str = "EndStation Name";
    pub const BIKE_ID: &str = "Bike Id";
    pub const DURATION: &str = "Duration";
}

/// Historical column layout of a journey extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVariant {
    NewFormat,
    OldFormat,
    Unknown,
}

impl SchemaVariant {
    pub fn display_name(&self) -> &'static str {
        match self {
            SchemaVariant::NewFormat => "new format (Number)",
            SchemaVariant::OldFormat => "old format (Rental Id)",
            SchemaVariant::Unknown => "unknown format",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SchemaVariant::Unknown)
    }
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Classify a column set by marker-column presence.
///
/// `Number` is checked before `Rental Id`, so a file carrying both is new format.
pub fn detect_variant<S: AsRef<str>>(columns: &[S]) -> SchemaVariant {
    let has = |name: &str| columns.iter().any(|c| c.as_ref() == name);

    if has(new_format::MARKER) {
        SchemaVariant::NewFormat
    } else if has(old_format::MARKER) {
        SchemaVariant::OldFormat
    } else {
        SchemaVariant::Unknown
    }
}

use crate::utils::constants::{
    ALTERNATE_JOURNEY_MARKER, JOURNEY_MARKER, PARTIAL_SUFFIX, STRUCTURE_REPORT_FILE,
};
use std::path::{Path, PathBuf};

/// Alternate name tried when a journey extract is not found under its primary name,
/// e.g. `195JourneyDataExtract01Jan2020-07Jan2020.csv` -> `195-Journey-Data-Extract-01Jan2020-07Jan2020.csv`
pub fn alternate_journey_filename(filename: &str) -> Option<String> {
    if filename.contains(JOURNEY_MARKER) && !filename.starts_with('0') {
        Some(filename.replace(JOURNEY_MARKER, ALTERNATE_JOURNEY_MARKER))
    } else {
        None
    }
}

/// Base name of a path as an owned string, used as the provenance tag of every row
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sibling path an in-flight write goes to before being renamed into place
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Structure report location for a cleaned table: same directory as the table
pub fn structure_report_path_for(output_file: &Path) -> PathBuf {
    output_file.with_file_name(STRUCTURE_REPORT_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternate_journey_filename() {
        assert_eq!(
            alternate_journey_filename("195JourneyDataExtract01Jan2020-07Jan2020.csv").as_deref(),
            Some("195-Journey-Data-Extract-01Jan2020-07Jan2020.csv")
        );

        // Leading zero and non-journey names have no alternate
        assert_eq!(alternate_journey_filename("01JourneyDataExtract.csv"), None);
        assert_eq!(alternate_journey_filename("stations.csv"), None);

        // The alternate name itself has no further alternate
        let alt = alternate_journey_filename("206JourneyDataExtract18Mar2020-24Mar2020.csv").unwrap();
        assert_eq!(alternate_journey_filename(&alt), None);
    }

    #[test]
    fn test_file_name_of() {
        let path = Path::new("bicycle_data/raw/195JourneyDataExtract01Jan2020-07Jan2020.csv");
        assert_eq!(file_name_of(path), "195JourneyDataExtract01Jan2020-07Jan2020.csv");
    }

    #[test]
    fn test_partial_path() {
        let path = Path::new("out/clean_trips.csv");
        assert_eq!(partial_path(path), PathBuf::from("out/clean_trips.csv.part"));
    }

    #[test]
    fn test_structure_report_follows_output_file() {
        assert_eq!(
            structure_report_path_for(Path::new("elsewhere/trips.csv")),
            PathBuf::from("elsewhere/structure_report.json")
        );
        assert_eq!(
            structure_report_path_for(Path::new("trips.csv")),
            PathBuf::from("structure_report.json")
        );
    }
}

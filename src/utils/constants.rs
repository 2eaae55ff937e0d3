/// Data host
pub const BASE_URL: &str = "https://cycling.data.tfl.gov.uk/usage-stats/";

/// Directory names
pub const DATA_DIR: &str = "bicycle_data";
pub const RAW_SUBDIR: &str = "raw";
pub const PROCESSED_SUBDIR: &str = "processed";

/// File names
pub const DOWNLOAD_SUMMARY_FILE: &str = "download_summary.csv";
pub const CLEAN_TRIPS_FILE: &str = "clean_trips.csv";
pub const STRUCTURE_REPORT_FILE: &str = "structure_report.json";
pub const DEFAULT_CONFIG_FILE: &str = "bikeshare.toml";
pub const PARTIAL_SUFFIX: &str = ".part";

/// Download defaults
pub const DEFAULT_DOWNLOAD_WORKERS: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Filename fragment rewritten when the primary download fails
pub const JOURNEY_MARKER: &str = "JourneyDataExtract";
pub const ALTERNATE_JOURNEY_MARKER: &str = "-Journey-Data-Extract-";

/// Reporting defaults
pub const DEFAULT_TOP_N: usize = 15;
pub const TOP_STATIONS: usize = 5;
pub const INSPECT_SAMPLE_ROWS: usize = 5;

/// Canonical timestamp layout and the layouts accepted when reading it back
pub const CANONICAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const OLD_FORMAT_DATETIME: &str = "%d/%m/%Y %H:%M";
pub const ACCEPTED_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Journey extracts sampled quarterly from 2020 through early 2025
pub const JOURNEY_FILES: &[&str] = &[
    // 2020
    "195JourneyDataExtract01Jan2020-07Jan2020.csv",
    "206JourneyDataExtract18Mar2020-24Mar2020.csv",
    "212JourneyDataExtract29Apr2020-05May2020.csv",
    "221JourneyDataExtract01Jul2020-07Jul2020.csv",
    "232JourneyDataExtract16Sep2020-22Sep2020.csv",
    "238JourneyDataExtract28Oct2020-03Nov2020.csv",
    // 2021
    "251JourneyDataExtract03Feb2021-09Feb2021.csv",
    "258JourneyDataExtract24Mar2021-30Mar2021.csv",
    "267JourneyDataExtract26May2021-01Jun2021.csv",
    "273JourneyDataExtract07Jul2021-13Jul2021.csv",
    "282JourneyDataExtract08Sep2021-14Sep2021.csv",
    "292JourneyDataExtract17Nov2021-23Nov2021.csv",
    // 2022
    "302JourneyDataExtract02Feb2022-08Feb2022.csv",
    "313JourneyDataExtract20Apr2022-26Apr2022.csv",
    "322JourneyDataExtract15Jun2022-21Jun2022.csv",
    "331JourneyDataExtract17Aug2022-23Aug2022.csv",
    "340JourneyDataExtract19Oct2022-25Oct2022.csv",
    "348JourneyDataExtract14Dec2022-20Dec2022.csv",
    // 2023
    "356JourneyDataExtract08Feb2023-14Feb2023.csv",
    "366JourneyDataExtract19Apr2023-25Apr2023.csv",
    "375JourneyDataExtract19Jun2023-30Jun2023.csv",
    "379JourneyDataExtract15Sep2023-30Sep2023.csv",
    "383JourneyDataExtract15Oct2023-31Oct2023.csv",
    "386JourneyDataExtract15Dec2023-31Dec2023.csv",
    // 2024 and the most recent extract
    "388JourneyDataExtract15Jan2024-31Jan2024.csv",
    "392JourneyDataExtract15Mar2024-31Mar2024.csv",
    "396JourneyDataExtract15May2024-31May2024.csv",
    "400JourneyDataExtract15Jul2024-31Jul2024.csv",
    "406JourneyDataExtract15Nov2024-30Nov2024.csv",
    "412JourneyDataExtract15Jan2025-31Jan2025.csv",
];

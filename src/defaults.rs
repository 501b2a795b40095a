// src/defaults.rs

// Pipeline Constants
//
// The trim coordinates tell the alignment-padding rule where the reference
// coding region starts and ends. The compressed model size is how we
// recognize a gzip-compressed classifier shipped by the data package.
pub const TRIM_START: u32 = 265;
pub const TRIM_END: u32 = 29674;
pub const COMPRESSED_MODEL_SIZE: u64 = 569_253;
pub const MODEL_SIZE_TOLERANCE: u64 = 10;

// QC Constants
pub const DEFAULT_MIN_LENGTH: usize = 10_000;
pub const DEFAULT_MAX_AMBIG: f64 = 0.5;

// Report Constants
pub const DEFAULT_OUTFILE: &str = "lineage_report.csv";
pub const REPORT_HEADER: [&str; 6] = [
    "taxon",
    "lineage",
    "probability",
    "pangoLEARN_version",
    "status",
    "note",
];

// Version reported for a data package with no version metadata
pub const UNKNOWN_VERSION: &str = "unknown";

// Phone Catalog - Core Library
// Exposes catalog I/O, reporting, and merging for the CLI and tests

pub mod error;
pub mod catalog;
pub mod report;
pub mod merge;
pub mod logging;

// Re-export commonly used types
pub use error::{CatalogError, DocumentError, RecordError};
pub use catalog::{Catalog, Phone, PhoneId, load_candidates};
pub use report::{
    CatalogReport, BracketCount, PriceBracket, ReportConfig, ReportFormat,
    PRICE_BRACKETS, DEFAULT_CATALOG_PATH, bracket_for,
};
pub use merge::{
    MergeConfig, MergeOutcome, MergeDecision, MergeAction, CandidateBatch,
    DEFAULT_CANDIDATE_PATHS, load_batches, merge_phones,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

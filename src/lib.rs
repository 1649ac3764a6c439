// NEO Explorer - Core Library
// Exposes all modules for use in the CLI and tests

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod filters;
pub mod helpers;
pub mod models;
pub mod write;

// Re-export commonly used types
pub use config::DataConfig;
pub use database::NeoDatabase;
pub use error::NeoError;
pub use extract::{load_approaches, load_neos};
pub use filters::{create_filters, limit, ApproachFilter, Comparison, FilterOptions, FilterValue};
pub use models::{
    ApproachId, ApproachRecord, ApproachRow, CloseApproach, LinkedApproach, NearEarthObject,
    NeoId, NeoRecord,
};
pub use write::{write_results, write_to_csv, write_to_json, OutputFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

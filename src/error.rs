// ⚠️ Domain errors
//
// Field-level problems never reach this type: loaders coerce them to sentinels.
// Only structural faults (asking for an NEO that was never linked) surface here.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NeoError {
    /// A close approach references a designation with no loaded NEO,
    /// and the caller asked for a view that needs that NEO.
    #[error("close approach references unknown NEO designation '{designation}'")]
    UnresolvedReference { designation: String },

    /// Output path extension is neither `.csv` nor `.json`
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
}

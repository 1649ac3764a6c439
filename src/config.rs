// ⚙️ Configuration - where the data files live
//
// Defaults point at ./data; the CLI overrides them with flags or the
// NEO_FILE / CAD_FILE environment variables.

use crate::database::NeoDatabase;
use crate::extract::{load_approaches, load_neos};
use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_NEO_FILE: &str = "data/neos.csv";
pub const DEFAULT_CAD_FILE: &str = "data/cad.json";

pub const NEO_FILE_ENV: &str = "NEO_FILE";
pub const CAD_FILE_ENV: &str = "CAD_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    /// NEO catalog (CSV)
    pub neo_file: PathBuf,

    /// Close-approach data (JSON)
    pub cad_file: PathBuf,
}

impl DataConfig {
    pub fn new(neo_file: impl Into<PathBuf>, cad_file: impl Into<PathBuf>) -> Self {
        DataConfig {
            neo_file: neo_file.into(),
            cad_file: cad_file.into(),
        }
    }

    /// Load both files and link them into a database
    pub fn load_database(&self) -> Result<NeoDatabase> {
        let neos = load_neos(&self.neo_file)?;
        let approaches = load_approaches(&self.cad_file)?;
        Ok(NeoDatabase::new(neos, approaches))
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig::new(DEFAULT_NEO_FILE, DEFAULT_CAD_FILE)
    }
}

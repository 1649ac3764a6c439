// 📥 Extract - Load NEOs (CSV) and close approaches (JSON)
//
// Whole-file problems (missing file, not CSV/JSON at all) are errors.
// Row-level problems are not: a bad row degrades its own fields to
// sentinels, the batch keeps going.

use crate::models::{CloseApproach, NearEarthObject};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

// ============================================================================
// NEO CSV
// ============================================================================

/// One row of the NEO catalog. Only the known columns are mapped;
/// every other column in the file is ignored.
#[derive(Debug, Default, Deserialize)]
struct RawNeo {
    #[serde(default)]
    pdes: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    diameter: Option<String>,
    #[serde(default)]
    pha: Option<String>,
}

impl RawNeo {
    fn into_neo(self) -> NearEarthObject {
        NearEarthObject::from_raw(
            self.pdes.as_deref(),
            self.name.as_deref(),
            self.diameter.as_deref(),
            self.pha.as_deref(),
        )
    }
}

/// Read near-Earth objects from a headered CSV file
pub fn load_neos(neo_csv_path: &Path) -> Result<Vec<NearEarthObject>> {
    use csv::{ReaderBuilder, Trim};

    let file = File::open(neo_csv_path)
        .with_context(|| format!("Failed to open NEO file: {}", neo_csv_path.display()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header in {}", neo_csv_path.display()))?;
    if !headers.iter().any(|h| h == "pdes") {
        warn!(path = %neo_csv_path.display(), "NEO file has no 'pdes' column, designations will be empty");
    }

    let mut neos = Vec::new();
    for (line_num, result) in reader.deserialize::<RawNeo>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                // +2: 1-indexed + header row
                warn!(line = line_num + 2, error = %e, "unreadable NEO row, using empty record");
                RawNeo::default()
            }
        };
        neos.push(raw.into_neo());
    }

    info!(count = neos.len(), path = %neo_csv_path.display(), "loaded NEOs");
    Ok(neos)
}

// ============================================================================
// CLOSE APPROACH JSON
// ============================================================================

/// The close-approach data file: a header of field names plus rows of values
#[derive(Debug, Deserialize)]
struct CadFile {
    #[serde(default)]
    fields: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// Where the interesting values sit inside each data row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CadColumns {
    designation: usize,
    time: usize,
    distance: usize,
    velocity: usize,
}

impl Default for CadColumns {
    fn default() -> Self {
        CadColumns {
            designation: 0,
            time: 3,
            distance: 4,
            velocity: 7,
        }
    }
}

impl CadColumns {
    /// Use the file's own field names when present, fixed positions otherwise
    fn from_fields(fields: &[String]) -> Self {
        let defaults = CadColumns::default();
        let position = |name: &str, fallback: usize| {
            fields.iter().position(|f| f == name).unwrap_or(fallback)
        };

        CadColumns {
            designation: position("des", defaults.designation),
            time: position("cd", defaults.time),
            distance: position("dist", defaults.distance),
            velocity: position("v_rel", defaults.velocity),
        }
    }
}

/// JSON cell → text. Numbers are kept as their literal text, null is missing.
fn cell_text(row: &[Value], index: usize) -> Option<String> {
    match row.get(index)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => {
            debug!(value = %other, "unexpected close-approach cell type");
            None
        }
    }
}

/// Read close approaches from a CAD JSON file
pub fn load_approaches(cad_json_path: &Path) -> Result<Vec<CloseApproach>> {
    let file = File::open(cad_json_path)
        .with_context(|| format!("Failed to open close-approach file: {}", cad_json_path.display()))?;

    let cad: CadFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse close-approach JSON: {}", cad_json_path.display()))?;

    let columns = CadColumns::from_fields(&cad.fields);
    debug!(?columns, "close-approach column layout");

    let approaches: Vec<CloseApproach> = cad
        .data
        .iter()
        .map(|row| {
            CloseApproach::from_raw(
                cell_text(row, columns.designation).as_deref(),
                cell_text(row, columns.time).as_deref(),
                cell_text(row, columns.distance).as_deref(),
                cell_text(row, columns.velocity).as_deref(),
            )
        })
        .collect();

    info!(count = approaches.len(), path = %cad_json_path.display(), "loaded close approaches");
    Ok(approaches)
}

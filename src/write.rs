// 📤 Write - Export query results as CSV or JSON
//
// CSV uses the flat row view (NEO fields inline), JSON the nested record view.
// Both need every approach to be linked; an unlinked one aborts the export.

use crate::error::NeoError;
use crate::models::{ApproachRecord, ApproachRow, LinkedApproach};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Output format, picked from the output file's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, NeoError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(NeoError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Write results to `path`, format chosen by extension. Returns rows written.
pub fn write_results<'a, I>(results: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    match OutputFormat::from_path(path)? {
        OutputFormat::Csv => write_to_csv(results, path),
        OutputFormat::Json => write_to_json(results, path),
    }
}

/// One header row, then one row per close approach
pub fn write_to_csv<'a, I>(results: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let rows = results
        .into_iter()
        .map(|r| r.to_row())
        .collect::<Result<Vec<ApproachRow>, NeoError>>()?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    if rows.is_empty() {
        // serialize() only emits the header alongside the first row
        writer.write_record(ApproachRow::HEADER)?;
    }
    for row in &rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    writer.flush()?;

    info!(rows = rows.len(), path = %path.display(), "wrote CSV results");
    Ok(rows.len())
}

/// A pretty-printed JSON array of close-approach records
pub fn write_to_json<'a, I>(results: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let records = results
        .into_iter()
        .map(|r| r.to_record())
        .collect::<Result<Vec<ApproachRecord>, NeoError>>()?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(records = records.len(), path = %path.display(), "wrote JSON results");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::cd_to_datetime;
    use crate::models::{CloseApproach, NearEarthObject};
    use tempfile::tempdir;

    fn fixtures() -> (Vec<NearEarthObject>, Vec<CloseApproach>) {
        let neos = vec![
            NearEarthObject::from_raw(Some("99942"), Some("Apophis"), Some("0.37"), Some("Y")),
            NearEarthObject::from_raw(Some("2020 AB"), None, None, None),
        ];
        let approaches = vec![
            CloseApproach::new(cd_to_datetime("2029-Apr-13 21:46"), 0.025, 7.42)
                .with_designation("99942"),
            CloseApproach::new(None, 0.3, 4.5).with_designation("2020 AB"),
        ];
        (neos, approaches)
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")).unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("OUT.JSON")).unwrap(), OutputFormat::Json);
        assert!(matches!(
            OutputFormat::from_path(Path::new("out.txt")),
            Err(NeoError::UnsupportedFormat(_))
        ));
        assert!(OutputFormat::from_path(Path::new("out")).is_err());
    }

    #[test]
    fn test_write_to_csv() {
        let (neos, approaches) = fixtures();
        let results = vec![
            LinkedApproach::new(&approaches[0], Some(&neos[0])),
            LinkedApproach::new(&approaches[1], Some(&neos[1])),
        ];
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let written = write_to_csv(results, &path).unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "datetime_utc,distance_au,velocity_km_s,designation,name,diameter_km,potentially_hazardous"
        );
        assert_eq!(lines[1], "2029-04-13 21:46,0.025,7.42,99942,Apophis,0.37,True");
        assert_eq!(lines[2], "unknown time,0.3,4.5,2020 AB,,nan,False");
    }

    #[test]
    fn test_write_empty_csv_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        assert_eq!(write_to_csv(Vec::<LinkedApproach>::new(), &path).unwrap(), 0);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("datetime_utc,distance_au"));
    }

    #[test]
    fn test_write_to_json() {
        let (neos, approaches) = fixtures();
        let results = vec![
            LinkedApproach::new(&approaches[0], Some(&neos[0])),
            LinkedApproach::new(&approaches[1], Some(&neos[1])),
        ];
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");

        write_results(results, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["datetime_utc"], "2029-04-13 21:46");
        assert_eq!(array[0]["neo"]["name"], "Apophis");
        assert_eq!(array[0]["neo"]["potentially_hazardous"], true);
        assert!(array[1]["neo"]["name"].is_null());
        assert!(array[1]["neo"]["diameter_km"].is_null());
    }

    #[test]
    fn test_write_unlinked_fails() {
        let (_, approaches) = fixtures();
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");

        let err = write_to_json(vec![LinkedApproach::new(&approaches[0], None)], &path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NeoError>(),
            Some(NeoError::UnresolvedReference { .. })
        ));
    }
}

//! Catalog CSV loading and cleaning.
//!
//! Reads the catalog export, checks that the expected columns exist and
//! turns every row into a [`CatalogEntry`] with derived calendar fields
//! and defaulted categorical columns.

use crate::models::{CatalogEntry, RawRecord, UNKNOWN};
use chrono::{DateTime, Datelike, NaiveDate};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "type",
    "country",
    "listed_in",
    "director",
    "title",
    "date_added",
];

/// Date layouts tried in order when parsing `date_added`.
const DATE_FORMATS: [&str; 5] = ["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y", "%d-%b-%y"];

/// Errors that abort loading a catalog.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV header: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Result of loading a catalog file.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    /// Cleaned rows in file order.
    pub entries: Vec<CatalogEntry>,
    /// Rows that could not be parsed and were left out.
    pub rows_skipped: usize,
}

impl LoadedCatalog {
    /// Rows whose `date_added` was missing or unparsable.
    pub fn undated_rows(&self) -> usize {
        self.entries.iter().filter(|e| e.date_added.is_none()).count()
    }
}

/// Load and clean the catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, DataError> {
    info!("Loading catalog from {}", path.display());

    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_catalog(file)
}

/// Load and clean a catalog from any reader.
pub fn read_catalog<R: Read>(reader: R) -> Result<LoadedCatalog, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DataError::MissingColumns(missing));
    }

    let mut entries = Vec::new();
    let mut rows_skipped = 0;

    for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(record) => entries.push(clean_record(record)),
            Err(e) => {
                // +2: header line plus 1-based numbering
                warn!("Skipping row at line {}: {}", idx + 2, e);
                rows_skipped += 1;
            }
        }
    }

    debug!(
        "Loaded {} rows ({} skipped)",
        entries.len(),
        rows_skipped
    );

    Ok(LoadedCatalog {
        entries,
        rows_skipped,
    })
}

/// Turn a raw row into a cleaned entry.
pub fn clean_record(record: RawRecord) -> CatalogEntry {
    let date_added = record.date_added.as_deref().and_then(parse_date_added);

    CatalogEntry {
        title: record.title,
        kind: record.kind.unwrap_or_else(|| UNKNOWN.to_string()),
        director: record.director,
        country: record.country.unwrap_or_else(|| UNKNOWN.to_string()),
        year_added: date_added.map(|d| d.year()),
        month_added: date_added.map(|d| d.format("%B").to_string()),
        date_added,
        listed_in: record.listed_in.unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Parse a `date_added` cell, returning `None` when no layout matches.
pub fn parse_date_added(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "show_id,type,title,director,cast,country,date_added,release_year,listed_in";

    fn csv_with(rows: &[&str]) -> String {
        let mut data = String::from(HEADER);
        data.push('\n');
        for row in rows {
            data.push_str(row);
            data.push('\n');
        }
        data
    }

    #[test]
    fn test_parse_date_added_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 9, 25).unwrap();
        assert_eq!(parse_date_added("September 25, 2021"), Some(expected));
        assert_eq!(parse_date_added(" September 25, 2021 "), Some(expected));
        assert_eq!(parse_date_added("Sep 25, 2021"), Some(expected));
        assert_eq!(parse_date_added("2021-09-25"), Some(expected));
        assert_eq!(parse_date_added("09/25/2021"), Some(expected));
        assert_eq!(parse_date_added("25-Sep-21"), Some(expected));
        assert_eq!(parse_date_added("2021-09-25T10:00:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_date_added_coerces_garbage() {
        assert_eq!(parse_date_added(""), None);
        assert_eq!(parse_date_added("   "), None);
        assert_eq!(parse_date_added("not a date"), None);
        assert_eq!(parse_date_added("February 30, 2020"), None);
    }

    #[test]
    fn test_clean_record_defaults_categoricals() {
        let entry = clean_record(RawRecord {
            title: Some("Dick Johnson Is Dead".to_string()),
            ..RawRecord::default()
        });

        assert_eq!(entry.kind, UNKNOWN);
        assert_eq!(entry.country, UNKNOWN);
        assert_eq!(entry.listed_in, UNKNOWN);
        assert_eq!(entry.director, None);
        assert_eq!(entry.title.as_deref(), Some("Dick Johnson Is Dead"));
        assert_eq!(entry.year_added, None);
        assert_eq!(entry.month_added, None);
    }

    #[test]
    fn test_clean_record_derives_calendar_fields() {
        let entry = clean_record(RawRecord {
            title: Some("Blood & Water".to_string()),
            kind: Some("TV Show".to_string()),
            date_added: Some("September 24, 2021".to_string()),
            ..RawRecord::default()
        });

        assert_eq!(entry.year_added, Some(2021));
        assert_eq!(entry.month_added.as_deref(), Some("September"));
        assert_eq!(
            entry.date_added,
            NaiveDate::from_ymd_opt(2021, 9, 24)
        );
    }

    #[test]
    fn test_read_catalog() {
        let data = csv_with(&[
            r#"s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,"September 25, 2021",2020,Documentaries"#,
            r#"s2,TV Show,Blood & Water,,"Ama Qamata, Khosi Ngema","South Africa","September 24, 2021",2021,"International TV Shows, TV Dramas""#,
            r#"s3,Movie,Undated,,,,,2019,"#,
        ]);

        let catalog = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(catalog.entries.len(), 3);
        assert_eq!(catalog.rows_skipped, 0);
        assert_eq!(catalog.undated_rows(), 1);

        let undated = &catalog.entries[2];
        assert_eq!(undated.country, UNKNOWN);
        assert_eq!(undated.listed_in, UNKNOWN);
        assert_eq!(undated.year_added, None);

        for entry in &catalog.entries {
            assert!(!entry.kind.is_empty());
            assert!(!entry.country.is_empty());
            assert!(!entry.listed_in.is_empty());
        }
    }

    #[test]
    fn test_read_catalog_missing_columns() {
        let data = "title,type\nA,Movie\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();

        match err {
            DataError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["country", "listed_in", "director", "date_added"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_catalog_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("titles.csv");
        std::fs::write(
            &path,
            csv_with(&[r#"s1,Movie,Sankofa,Haile Gerima,,"United States, Ghana","September 24, 2021",1993,"Dramas, Independent Movies""#]),
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.entries.len(), 1);
        assert_eq!(catalog.entries[0].country, "United States, Ghana");
        assert_eq!(catalog.entries[0].director.as_deref(), Some("Haile Gerima"));
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/titles.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/titles.csv"));
    }
}

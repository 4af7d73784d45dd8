//! Static lookup tables that feed the author/status filter choices.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Option shown first in every filter list; selecting it means "no filter".
pub const NO_FILTER: &str = "None";

pub const AUTHORS_FILE: &str = "authors.csv";
pub const STATUS_FILE: &str = "status.csv";
pub const AUTHOR_COLUMN: &str = "author";
pub const STATUS_COLUMN: &str = "status";

/// Distinct, sorted, non-empty values of `column` in `csv_text`.
pub fn read_distinct_column(csv_text: &str, column: &str) -> Result<Vec<String>, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let idx = rdr
        .headers()
        .map_err(|e| {
            AppError::new("LOOKUP_CSV_HEADERS_FAILED", "Failed to read lookup CSV headers")
                .with_details(e.to_string())
        })?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| {
            AppError::new("LOOKUP_COLUMN_MISSING", "Lookup CSV is missing the expected column")
                .with_details(format!("column={column}"))
        })?;

    let mut values = BTreeSet::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result.map_err(|e| {
            AppError::new("LOOKUP_CSV_PARSE_FAILED", "Failed to parse lookup CSV row")
                .with_details(format!("row={}; err={e}", i + 1))
        })?;
        if let Some(v) = row.get(idx).map(str::trim) {
            if !v.is_empty() && v != NO_FILTER {
                values.insert(v.to_string());
            }
        }
    }

    Ok(values.into_iter().collect())
}

/// Load the distinct values of `column` from a CSV file. A missing file yields no values.
pub fn load_lookup_values(path: &Path, column: &str) -> Result<Vec<String>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new("LOOKUP_READ_FAILED", "Failed to read lookup CSV")
            .with_details(format!("path={}; err={e}", path.display()))
    })?;
    read_distinct_column(&text, column)
}

/// `["None", ...values]`.
pub fn options_from_values(values: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(NO_FILTER.to_string());
    out.extend(values);
    out
}

/// Choice lists for the two filter dimensions, loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub authors: Vec<String>,
    pub statuses: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            authors: options_from_values(Vec::new()),
            statuses: options_from_values(Vec::new()),
        }
    }
}

impl FilterOptions {
    /// Load both tables from `assets_dir`. Any failure degrades that list to `["None"]`.
    pub fn load(assets_dir: &Path) -> Self {
        Self {
            authors: load_options(&assets_dir.join(AUTHORS_FILE), AUTHOR_COLUMN),
            statuses: load_options(&assets_dir.join(STATUS_FILE), STATUS_COLUMN),
        }
    }

    pub fn resolve_author(&self, choice: Option<&str>) -> Result<Option<String>, AppError> {
        resolve_choice(&self.authors, choice, "author")
    }

    pub fn resolve_status(&self, choice: Option<&str>) -> Result<Option<String>, AppError> {
        resolve_choice(&self.statuses, choice, "status")
    }
}

fn load_options(path: &Path, column: &str) -> Vec<String> {
    match load_lookup_values(path, column) {
        Ok(values) => {
            if values.is_empty() {
                tracing::debug!(path = %path.display(), "no lookup values; filter disabled");
            }
            options_from_values(values)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "lookup table unusable; filter disabled");
            options_from_values(Vec::new())
        }
    }
}

/// Map a user choice onto a filter value. `None` and the `"None"` option both mean no filter;
/// anything else must be one of the loaded options.
fn resolve_choice(
    options: &[String],
    choice: Option<&str>,
    dimension: &str,
) -> Result<Option<String>, AppError> {
    let Some(choice) = choice.map(str::trim) else {
        return Ok(None);
    };
    if choice.is_empty() || choice == NO_FILTER {
        return Ok(None);
    }
    if options.iter().any(|o| o == choice) {
        return Ok(Some(choice.to_string()));
    }
    Err(
        AppError::new("LOOKUP_UNKNOWN_CHOICE", format!("Unknown {dimension} filter value"))
            .with_details(format!("{dimension}={choice}")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn distinct_values_are_sorted_and_blank_free() {
        let csv = "id,author\n1,Zoe\n2,Adam\n3,\n4,Zoe\n5, Mia \n";
        assert_eq!(
            read_distinct_column(csv, "author").unwrap(),
            vec!["Adam".to_string(), "Mia".to_string(), "Zoe".to_string()]
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = read_distinct_column("name\nx\n", "status").unwrap_err();
        assert_eq!(err.code, "LOOKUP_COLUMN_MISSING");
    }

    #[test]
    fn none_option_maps_to_no_filter() {
        let opts = FilterOptions {
            authors: options_from_values(vec!["Dana".to_string()]),
            statuses: options_from_values(Vec::new()),
        };
        assert_eq!(opts.resolve_author(None).unwrap(), None);
        assert_eq!(opts.resolve_author(Some("None")).unwrap(), None);
        assert_eq!(opts.resolve_author(Some("Dana")).unwrap(), Some("Dana".to_string()));
        assert_eq!(
            opts.resolve_status(Some("Done")).unwrap_err().code,
            "LOOKUP_UNKNOWN_CHOICE"
        );
    }
}

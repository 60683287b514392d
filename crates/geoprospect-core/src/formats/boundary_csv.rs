//! Heuristic CSV boundary import.
//!
//! Operators upload whatever coordinate export they have, so the reader guesses
//! the delimiter and the latitude/longitude columns instead of asking. Detection
//! is total: it returns coordinates plus the [`ColumnMapping`] it chose, or a
//! typed [`ImportError`]. Rows that do not yield a valid coordinate are skipped
//! and counted, never reported individually.

use std::path::Path;

use serde::Serialize;

use crate::error::ImportError;
use crate::models::coordinate::{is_valid_lat, is_valid_lng};
use crate::models::{Boundary, Coordinate};

/// Default upload ceiling (5 MiB)
pub const DEFAULT_MAX_IMPORT_BYTES: u64 = 5 * 1024 * 1024;

const LAT_KEYWORDS: [&str; 3] = ["lat", "north", "y"];
const LNG_KEYWORDS: [&str; 4] = ["lon", "lng", "east", "x"];
const QUOTES: [char; 2] = ['"', '\''];

/// Field separator detected from the first line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    /// Comma if present, else semicolon if present, else tab
    pub fn detect(first_line: &str) -> Self {
        if first_line.contains(',') {
            Delimiter::Comma
        } else if first_line.contains(';') {
            Delimiter::Semicolon
        } else {
            Delimiter::Tab
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
        }
    }
}

/// How the first row was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderDetection {
    /// Header cells named the latitude and longitude columns
    Matched,
    /// No header; the first row already holds numeric data in columns 0/1
    NumericFirstRow,
    /// Unrecognised, non-numeric first row; skipped and columns 0/1 assumed
    AssumedHeader,
}

/// Column mapping chosen by the importer, exposed so callers can show it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub delimiter: Delimiter,
    pub lat_column: usize,
    pub lng_column: usize,
    pub header: HeaderDetection,
}

/// Successful import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryImport {
    /// Accepted coordinates in file order
    pub coordinates: Vec<Coordinate>,
    pub mapping: ColumnMapping,
    /// Data rows that were skipped because they did not hold a valid coordinate
    pub skipped_rows: usize,
}

impl BoundaryImport {
    pub fn into_boundary(self) -> Boundary {
        Boundary::new(self.coordinates)
    }
}

/// Caller-side upload checks: `.csv` extension (any case) and size ceiling
pub fn check_upload(file_name: &str, size: u64, max_bytes: u64) -> Result<(), ImportError> {
    let is_csv = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if !is_csv {
        return Err(ImportError::WrongExtension { file_name: file_name.to_string() });
    }

    if size > max_bytes {
        return Err(ImportError::TooLarge { size, limit: max_bytes });
    }

    Ok(())
}

/// Parse delimited text into an ordered coordinate list
pub fn import_boundary(text: &str) -> Result<BoundaryImport, ImportError> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let first_line = lines.first().ok_or(ImportError::EmptyInput)?;

    let delimiter = Delimiter::detect(first_line);
    let first_fields = split_fields(first_line, delimiter);
    let header_tokens: Vec<String> = first_fields.iter().map(|f| f.to_lowercase()).collect();

    let (lat_column, lng_column, header) = match detect_header_columns(&header_tokens) {
        Some((lat, lng)) => (lat, lng, HeaderDetection::Matched),
        None if first_two_numeric(&first_fields) => (0, 1, HeaderDetection::NumericFirstRow),
        None => (0, 1, HeaderDetection::AssumedHeader),
    };

    let data_start = match header {
        HeaderDetection::NumericFirstRow => 0,
        HeaderDetection::Matched | HeaderDetection::AssumedHeader => 1,
    };

    let mut coordinates = Vec::new();
    let mut skipped_rows = 0;
    for line in &lines[data_start..] {
        let fields = split_fields(line, delimiter);
        match parse_row(&fields, lat_column, lng_column) {
            Some(coordinate) => coordinates.push(coordinate),
            None => skipped_rows += 1,
        }
    }

    if coordinates.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    if skipped_rows > 0 {
        tracing::debug!(skipped_rows, accepted = coordinates.len(), "Skipped invalid boundary rows");
    }

    Ok(BoundaryImport {
        coordinates,
        mapping: ColumnMapping { delimiter, lat_column, lng_column, header },
        skipped_rows,
    })
}

fn split_fields(line: &str, delimiter: Delimiter) -> Vec<String> {
    line.split(delimiter.as_char()).map(clean_field).collect()
}

fn clean_field(field: &str) -> String {
    field.replace(QUOTES, "").trim().to_string()
}

/// Find the latitude and longitude columns among lower-cased header tokens.
///
/// A token that equals or starts with a keyword beats one that merely contains
/// it, so `city,lat,lng` maps latitude to `lat` rather than to `city`.
fn detect_header_columns(tokens: &[String]) -> Option<(usize, usize)> {
    let lat = find_keyword_column(tokens, &LAT_KEYWORDS, None)?;
    let lng = find_keyword_column(tokens, &LNG_KEYWORDS, Some(lat))?;
    Some((lat, lng))
}

fn find_keyword_column(tokens: &[String], keywords: &[&str], exclude: Option<usize>) -> Option<usize> {
    let candidates = || tokens.iter().enumerate().filter(|(i, _)| Some(*i) != exclude);

    candidates()
        .find(|(_, t)| keywords.iter().any(|k| t.starts_with(k)))
        .or_else(|| candidates().find(|(_, t)| keywords.iter().any(|k| t.contains(k))))
        .map(|(i, _)| i)
}

fn first_two_numeric(fields: &[String]) -> bool {
    fields.len() >= 2 && fields[..2].iter().all(|f| f.parse::<f64>().is_ok())
}

fn parse_row(fields: &[String], lat_column: usize, lng_column: usize) -> Option<Coordinate> {
    let lat: f64 = fields.get(lat_column)?.parse().ok()?;
    let lng: f64 = fields.get(lng_column)?.parse().ok()?;
    if !is_valid_lat(lat) || !is_valid_lng(lng) {
        return None;
    }
    Coordinate::new(lat, lng).ok()
}

//! Reading raw listing tables and writing cleaned ones.
//!
//! CSV files are read with a header row; empty fields become nulls. When the
//! standard read fails, the file is read again without quote handling and
//! finally from a pre-cleaned copy with doubled quotes and blank lines
//! removed. Parquet files are chosen by extension.

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows sampled to infer CSV column types.
pub const INFER_SCHEMA_ROWS: usize = 10_000;

/// Load a table from a CSV or Parquet file.
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());

    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    let (mut table, blank_headers) = if is_parquet {
        let file = File::open(path)?;
        let table = ParquetReader::new(file)
            .finish()
            .context(format!("Reading {}", path.display()))?;
        (table, Vec::new())
    } else {
        (load_csv_with_fallbacks(path)?, csv_blank_headers(path)?)
    };

    name_unnamed_columns(&mut table, &blank_headers)?;
    info!("Dataset loaded successfully: {:?}", table.shape());
    Ok(table)
}

fn load_csv_with_fallbacks(path: &Path) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading without quotes failed: {}", e);
        }
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path)?;
    let cursor = Cursor::new(clean_csv_content(&content));
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()
        .context(format!("Reading {}", path.display()))
}

fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Which header cells of a CSV file are empty, in column order.
///
/// The CSV reader invents `column_{position}` names for empty header cells,
/// so the header row is parsed again as data to tell those apart from real
/// columns that happen to carry the same name.
fn csv_blank_headers(path: &Path) -> Result<Vec<bool>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(Vec::new());
        }
        if !header.trim().is_empty() {
            break;
        }
    }

    let cells = match CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(header.into_bytes()))
        .finish()
    {
        Ok(cells) => cells,
        Err(e) => {
            debug!("Header row could not be parsed on its own: {}", e);
            return Ok(Vec::new());
        }
    };

    let blank = cells
        .get_columns()
        .iter()
        .map(|column| {
            column
                .as_materialized_series()
                .str()
                .map(|cells| cells.get(0).is_none_or(|cell| cell.trim().is_empty()))
        })
        .collect::<PolarsResult<Vec<bool>>>()?;
    Ok(blank)
}

/// Give columns with a blank header the `Unnamed: {index}` name a dataframe
/// tool would use, so an exported index column can be dropped by name.
fn name_unnamed_columns(table: &mut DataFrame, blank_headers: &[bool]) -> Result<()> {
    let names: Vec<String> = table
        .get_column_names()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let blank = blank_headers.get(index).copied().unwrap_or(false);
            if blank || name.trim().is_empty() {
                format!("Unnamed: {}", index)
            } else {
                name.to_string()
            }
        })
        .collect();

    let renamed = names
        .iter()
        .zip(table.get_column_names())
        .any(|(new, old)| new.as_str() != old.as_str());
    if renamed {
        debug!("Renaming blank column headers");
        table.set_column_names(names)?;
    }
    Ok(())
}

/// Write a table as CSV with a header row, creating parent directories.
pub fn write_csv(table: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let mut table = table.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut table)?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

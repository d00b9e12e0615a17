//! CSV ingestion into [`Frame`].

use super::{Column, ColumnData, Frame};
use crate::error::Result;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Cell values read as missing (compared case-insensitively after trimming).
const MISSING_TOKENS: [&str; 5] = ["", "na", "nan", "null", "none"];

fn is_missing_token(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

impl Frame {
    /// Read a comma-separated table with a header row.
    ///
    /// A column is numeric when every non-missing cell parses as a float,
    /// categorical otherwise.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Frame> {
        Self::from_csv_reader_with_delimiter(reader, b',')
    }

    /// Read a delimited table with a header row.
    pub fn from_csv_reader_with_delimiter<R: Read>(reader: R, delimiter: u8) -> Result<Frame> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for result in rdr.records() {
            let record = result?;
            for (col, cell) in record.iter().enumerate() {
                let value = if is_missing_token(cell) {
                    None
                } else {
                    Some(cell.trim().to_string())
                };
                cells[col].push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, infer_column(values)))
            .collect();

        let frame = Frame::new(columns)?;
        tracing::debug!(
            rows = frame.n_rows(),
            cols = frame.n_cols(),
            "loaded frame from csv"
        );
        Ok(frame)
    }

    /// Read a comma-separated file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Frame> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }
}

fn infer_column(values: Vec<Option<String>>) -> ColumnData {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|v| match v {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();

    match parsed {
        Some(numbers) if values.iter().any(Option::is_some) => ColumnData::numeric(numbers),
        _ => ColumnData::Categorical(values),
    }
}

//! Minimal tabular containers.
//!
//! [`Frame`] holds the raw explanatory columns (numeric or categorical, with
//! missing values) and [`NumericFrame`] holds treated, missing-free output.
//! Columns are addressed by name, rows by position.
//!
//! Non-finite numeric input (`NaN`, `±inf`) is normalized to missing when a
//! column is constructed, so downstream code only ever has to check `None`.

mod ingest;
pub mod outcome;
#[cfg(feature = "polars")]
pub mod polars_adapter;

use crate::error::{Result, TreatmentError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

pub use outcome::{Outcome, OutcomeKind};

/// Declared kind of a source column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Real-valued column.
    Numeric,
    /// String-valued (or numeric treated as levels) column.
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

/// Column storage.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    /// Build numeric storage, mapping non-finite values to missing.
    pub fn numeric<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        ColumnData::Numeric(
            values
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect(),
        )
    }

    /// Build numeric storage from plain floats, treating `NaN` as missing.
    pub fn from_f64(values: &[f64]) -> Self {
        Self::numeric(values.iter().map(|&v| Some(v)))
    }

    /// Build categorical storage.
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    /// Storage kind.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the value at `row` is missing.
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(v) => v[row].is_none(),
            ColumnData::Categorical(v) => v[row].is_none(),
        }
    }

    /// Number of missing values.
    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&r| self.is_missing(r)).count()
    }

    /// Value at `row` as a categorical level.
    ///
    /// Numeric values are rendered with [`format_level`] so that `3.0` and `3`
    /// name the same level.
    pub fn level_at(&self, row: usize) -> Option<Cow<'_, str>> {
        match self {
            ColumnData::Numeric(v) => v[row].map(|x| Cow::Owned(format_level(x))),
            ColumnData::Categorical(v) => v[row].as_deref().map(Cow::Borrowed),
        }
    }

    /// Value at `row` as a number.
    ///
    /// Categorical values are parsed; unparseable text reads as missing.
    pub fn numeric_at(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Numeric(v) => v[row],
            ColumnData::Categorical(v) => v[row]
                .as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|x| x.is_finite()),
        }
    }
}

/// Formats a number as a categorical level without trailing zeros.
///
/// ```
/// use crossframe::frame::format_level;
///
/// assert_eq!(format_level(1.0), "1");
/// assert_eq!(format_level(1.50), "1.5");
/// assert_eq!(format_level(-0.0), "0");
/// ```
pub fn format_level(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// A named source column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Descriptor with the storage kind and observed nullability.
    pub fn descriptor(&self) -> ColumnDescriptor {
        ColumnDescriptor {
            name: self.name.clone(),
            kind: self.data.kind(),
            nullable: self.data.missing_count() > 0,
        }
    }
}

/// Name, declared kind, and nullability of a source column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

/// Raw input table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Create a frame, checking that all columns share a length and names are unique.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if col.data.len() != n_rows {
                return Err(TreatmentError::InvalidFrame(format!(
                    "column '{}' has {} rows, expected {}",
                    col.name,
                    col.data.len(),
                    n_rows
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(TreatmentError::InvalidFrame(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Start building a frame column by column.
    pub fn builder() -> FrameBuilder {
        FrameBuilder::default()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        self.columns.iter().map(Column::descriptor).collect()
    }

    /// Copy of the frame restricted to `rows`, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let data = match &c.data {
                    ColumnData::Numeric(v) => {
                        ColumnData::Numeric(rows.iter().map(|&r| v[r]).collect())
                    }
                    ColumnData::Categorical(v) => {
                        ColumnData::Categorical(rows.iter().map(|&r| v[r].clone()).collect())
                    }
                };
                Column::new(c.name.clone(), data)
            })
            .collect();
        Frame {
            columns,
            n_rows: rows.len(),
        }
    }
}

/// Fluent builder for [`Frame`].
#[derive(Clone, Debug, Default)]
pub struct FrameBuilder {
    columns: Vec<Column>,
}

impl FrameBuilder {
    /// Add a numeric column; `None` and non-finite values are missing.
    pub fn numeric(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.columns.push(Column::new(name, ColumnData::numeric(values)));
        self
    }

    /// Add a numeric column from plain floats; `NaN` is missing.
    pub fn numeric_f64(mut self, name: impl Into<String>, values: &[f64]) -> Self {
        self.columns.push(Column::new(name, ColumnData::from_f64(values)));
        self
    }

    /// Add a categorical column.
    pub fn categorical<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<S>>,
    ) -> Self {
        self.columns
            .push(Column::new(name, ColumnData::categorical(values)));
        self
    }

    /// Add a fully-present categorical column.
    pub fn categorical_str(mut self, name: impl Into<String>, values: &[&str]) -> Self {
        self.columns.push(Column::new(
            name,
            ColumnData::categorical(values.iter().map(|s| Some(*s))),
        ));
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn build(self) -> Result<Frame> {
        Frame::new(self.columns)
    }
}

/// Treated, numeric, missing-free table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericFrame {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl NumericFrame {
    /// Empty frame with a fixed row count.
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            n_rows,
        }
    }

    /// Build from named columns, checking lengths.
    pub fn from_columns(n_rows: usize, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let mut frame = Self::with_rows(n_rows);
        for (name, values) in columns {
            frame.push_column(name, values)?;
        }
        Ok(frame)
    }

    /// Append a column.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.n_rows {
            return Err(TreatmentError::InvalidFrame(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.n_rows
            )));
        }
        if self.names.contains(&name) {
            return Err(TreatmentError::InvalidFrame(format!(
                "duplicate column name '{name}'"
            )));
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate `(name, values)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .zip(self.columns.iter())
            .map(|(n, c)| (n.as_str(), c.as_slice()))
    }

    /// One row as a vector in column order.
    pub fn row(&self, row: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[row]).collect()
    }

    /// Whether any cell is non-finite.
    pub fn has_missing(&self) -> bool {
        self.columns.iter().flatten().any(|v| !v.is_finite())
    }

    /// Row-major `(n_rows, n_cols)` matrix for downstream learners.
    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n_rows, self.columns.len()), |(r, c)| self.columns[c][r])
    }
}

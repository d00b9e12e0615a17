//! Conversions between polars `DataFrame`s and the crate's frames.
//!
//! Enabled with the `polars` feature.

use super::{Column, ColumnData, Frame, NumericFrame};
use crate::error::{Result, TreatmentError};
use ::polars::prelude::Column as PlColumn;
use ::polars::prelude::{AnyValue, DataFrame, DataType, PolarsError};

impl From<PolarsError> for TreatmentError {
    fn from(err: PolarsError) -> Self {
        TreatmentError::InvalidFrame(err.to_string())
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        _ => None,
    }
}

fn any_to_level(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Boolean(b) => Some(b.to_string()),
        other => {
            let s = other.to_string();
            let s = s.trim_matches('"');
            Some(s.to_string())
        }
    }
}

impl Frame {
    /// Convert a polars `DataFrame`; numeric dtypes become numeric columns, all
    /// other dtypes become categorical.
    pub fn from_polars(df: &DataFrame) -> Result<Frame> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let len = col.len();
            let data = if is_numeric_dtype(col.dtype()) {
                let mut values = Vec::with_capacity(len);
                for idx in 0..len {
                    values.push(any_to_f64(col.get(idx)?));
                }
                ColumnData::numeric(values)
            } else {
                let mut values = Vec::with_capacity(len);
                for idx in 0..len {
                    values.push(any_to_level(col.get(idx)?));
                }
                ColumnData::Categorical(values)
            };
            columns.push(Column::new(col.name().to_string(), data));
        }
        Frame::new(columns)
    }
}

impl NumericFrame {
    /// Convert into a polars `DataFrame` of `Float64` columns.
    pub fn to_polars(&self) -> Result<DataFrame> {
        let columns: Vec<PlColumn> = self
            .iter()
            .map(|(name, values)| PlColumn::new(name.into(), values.to_vec()))
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_polars() {
        let df = DataFrame::new(vec![
            PlColumn::new("x".into(), vec![Some(1.0f64), None, Some(3.0)]),
            PlColumn::new("c".into(), vec![Some("a"), Some("b"), None]),
        ])
        .unwrap();

        let frame = Frame::from_polars(&df).unwrap();
        assert_eq!(frame.n_rows(), 3);
        assert!(frame.column("x").unwrap().data().is_missing(1));
        assert_eq!(
            frame.column("c").unwrap().data().level_at(1).as_deref(),
            Some("b")
        );

        let numeric =
            NumericFrame::from_columns(2, vec![("a".to_string(), vec![1.0, 2.0])]).unwrap();
        let out = numeric.to_polars().unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(out.width(), 1);
    }
}

// External crates
use ndarray::Array1;
use polars::prelude::*;

// Internal modules
use crate::constants::DATETIME_COLUMN;
use crate::error::{PrepError, PrepResult};

/// Checks that the `datetime` column is present, so row order can be trusted
pub fn ensure_datetime(df: &DataFrame) -> PrepResult<()> {
    if df.get_column_index(DATETIME_COLUMN).is_none() {
        return Err(PrepError::MissingColumn(DATETIME_COLUMN.to_string()));
    }
    Ok(())
}

/// Whether a dtype holds plain numbers that can be standardized
pub fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric()
}

fn is_temporal(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Reads a column as `f64`, rejecting nulls, NaN and non-numeric dtypes
///
/// Temporal columns are read through their physical integer representation,
/// so a millisecond datetime column yields epoch milliseconds.
pub fn column_values(column: &Column) -> PrepResult<Vec<f64>> {
    let dtype = column.dtype();
    if !is_numeric(dtype) && !is_temporal(dtype) {
        return Err(PrepError::NonNumericColumn {
            column: column.name().to_string(),
            dtype: dtype.to_string(),
        });
    }

    let physical = column.as_materialized_series().to_physical_repr();
    let values = physical.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let missing = values.null_count() + values.iter().flatten().filter(|v| v.is_nan()).count();
    if missing > 0 {
        return Err(PrepError::MissingValues {
            column: column.name().to_string(),
            count: missing,
        });
    }

    Ok(values.iter().flatten().collect())
}

/// Same as [`column_values`], as an ndarray vector
pub fn column_array(column: &Column) -> PrepResult<Array1<f64>> {
    column_values(column).map(Array1::from_vec)
}

/// Reads a numeric column as optional `f64`, keeping nulls
pub fn optional_values(column: &Column) -> PrepResult<Vec<Option<f64>>> {
    if !is_numeric(column.dtype()) {
        return Err(PrepError::NonNumericColumn {
            column: column.name().to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    let values = column.cast(&DataType::Float64)?;
    Ok(values.f64()?.iter().collect())
}

/// Epoch milliseconds of a datetime column, keeping nulls
pub fn timestamps_ms(column: &Column) -> PrepResult<Vec<Option<i64>>> {
    let divisor = match column.dtype() {
        DataType::Datetime(TimeUnit::Milliseconds, _) => None,
        DataType::Datetime(TimeUnit::Microseconds, _) => Some(1_000),
        DataType::Datetime(TimeUnit::Nanoseconds, _) => Some(1_000_000),
        other => {
            return Err(PrepError::NonNumericColumn {
                column: column.name().to_string(),
                dtype: other.to_string(),
            })
        }
    };

    let physical = column.cast(&DataType::Int64)?;
    let values = physical.i64()?.iter();
    Ok(match divisor {
        None => values.collect(),
        Some(divisor) => values
            .map(|v| v.map(|t| t.div_euclid(divisor)))
            .collect(),
    })
}

/// Builds a naive (UTC-normalized) millisecond datetime series
pub fn datetime_series(name: &str, millis: Vec<Option<i64>>) -> Series {
    let physical: Int64Chunked = millis.into_iter().collect();
    physical
        .with_name(name.into())
        .into_datetime(TimeUnit::Milliseconds, None)
        .into_series()
}

// External crates
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

// Internal modules
use crate::constants::{DATETIME_COLUMN, STAGE_PRE_PROCESSOR};
use crate::error::{PrepError, PrepResult};
use crate::util::column_utils::{
    datetime_series, ensure_datetime, is_numeric, optional_values, timestamps_ms,
};
use crate::util::diagnostics::Diagnostics;
use crate::windowing::step_1_train_test_split::{ColumnStats, ScalerParams};

/// Outcome of looking up the source column of a datetime cast
#[derive(Debug, Clone)]
pub enum DatetimeCast {
    /// The column existed; the new table has `datetime` first
    Found(DataFrame),
    /// The column was missing; the input table is untouched
    NotFound,
}

impl DatetimeCast {
    pub fn is_found(&self) -> bool {
        matches!(self, DatetimeCast::Found(_))
    }

    /// The cast table, or a clone of `original` when the column was missing
    pub fn unwrap_or_original(self, original: &DataFrame) -> DataFrame {
        match self {
            DatetimeCast::Found(df) => df,
            DatetimeCast::NotFound => original.clone(),
        }
    }
}

/// Supported interpolation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMethod {
    /// Linear in elapsed time between the surrounding observations
    Time,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];

/// Parses a timestamp string into UTC epoch milliseconds
///
/// Offsets are honored; strings without one are taken as UTC.
pub fn parse_timestamp_ms(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.timestamp_millis());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Casts `column` to a UTC `datetime` column, drops the source and moves `datetime` first
///
/// # Arguments
///
/// * `df` - Input DataFrame
/// * `column` - Name of the column holding timestamps (strings or datetimes)
/// * `diagnostics` - Receives an error entry when the column is missing
///
/// # Returns
///
/// `DatetimeCast::Found` with the new table, or `DatetimeCast::NotFound`
pub fn to_datetime(
    df: &DataFrame,
    column: &str,
    diagnostics: &mut Diagnostics,
) -> PrepResult<DatetimeCast> {
    let Some(source) = df.get_columns().iter().find(|c| c.name().as_str() == column) else {
        diagnostics.error(
            STAGE_PRE_PROCESSOR,
            format!("column `{}` missing in provided table", column),
        );
        return Ok(DatetimeCast::NotFound);
    };

    let millis = match source.dtype() {
        DataType::String => source
            .str()?
            .iter()
            .map(|value| match value {
                None => Ok(None),
                Some(text) => parse_timestamp_ms(text).map(Some).ok_or_else(|| {
                    PrepError::InvalidTimestamp {
                        column: column.to_string(),
                        value: text.to_string(),
                    }
                }),
            })
            .collect::<PrepResult<Vec<_>>>()?,
        _ => timestamps_ms(source)?,
    };

    let mut out = df.clone();
    if column != DATETIME_COLUMN {
        out = out.drop(column)?;
    }
    out.with_column(datetime_series(DATETIME_COLUMN, millis))?;

    Ok(DatetimeCast::Found(rearrange_datetime_first(&out)?))
}

/// Returns the table with `datetime` as its first column
pub fn rearrange_datetime_first(df: &DataFrame) -> PrepResult<DataFrame> {
    ensure_datetime(df)?;
    let mut order: Vec<PlSmallStr> = vec![DATETIME_COLUMN.into()];
    order.extend(
        df.get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != DATETIME_COLUMN)
            .cloned(),
    );
    Ok(df.select(order)?)
}

/// Splits the table into its `datetime` column and the remaining columns
pub fn pop_datetime(df: &DataFrame) -> PrepResult<(Column, DataFrame)> {
    ensure_datetime(df)?;
    let datetime = df.column(DATETIME_COLUMN)?.clone();
    Ok((datetime, df.drop(DATETIME_COLUMN)?))
}

/// Drops rows where every column is null; with `any_null`, then drops rows holding any null
pub fn try_drop_shared_nulls(
    df: &DataFrame,
    any_null: bool,
    diagnostics: &mut Diagnostics,
) -> PrepResult<DataFrame> {
    let mut keep = BooleanChunked::full("keep".into(), false, df.height());
    for column in df.get_columns() {
        keep = &keep | &column.as_materialized_series().is_not_null();
    }
    let mut out = df.filter(&keep)?;

    let removed = df.height() - out.height();
    if removed > 0 {
        diagnostics.info(
            STAGE_PRE_PROCESSOR,
            format!("dropped {} rows made only of nulls", removed),
        );
    }

    let remaining_nulls: usize = out.get_columns().iter().map(|c| c.null_count()).sum();
    if any_null && remaining_nulls > 0 {
        let before = out.height();
        out = out.drop_nulls::<String>(None)?;
        diagnostics.info(
            STAGE_PRE_PROCESSOR,
            format!("dropped {} rows holding at least one null", before - out.height()),
        );
    }

    Ok(out)
}

/// Drops columns made only of nulls
pub fn drop_full_nulls(df: &DataFrame) -> PrepResult<DataFrame> {
    let height = df.height();
    let kept: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| height == 0 || c.null_count() < height)
        .map(|c| c.name().clone())
        .collect();
    Ok(df.select(kept)?)
}

/// Drops feature columns made only of zeros, keeping `datetime` first
///
/// A column with at least one null or non-zero value is kept.
pub fn drop_full_zero(df: &DataFrame) -> PrepResult<DataFrame> {
    let (datetime, features) = pop_datetime(df)?;

    let mut kept: Vec<Column> = vec![datetime];
    for column in features.get_columns() {
        if !is_numeric(column.dtype()) {
            kept.push(column.clone());
            continue;
        }
        let has_non_zero = optional_values(column)?
            .into_iter()
            .any(|v| v != Some(0.0));
        if has_non_zero {
            kept.push(column.clone());
        }
    }

    Ok(DataFrame::new(kept)?)
}

/// Fills nulls in numeric columns
///
/// With `InterpolationMethod::Time`, a gap is filled linearly in elapsed
/// time between the observations around it. Leading nulls stay null and
/// trailing nulls take the last observed value.
pub fn interpolate(
    df: &DataFrame,
    method: InterpolationMethod,
    diagnostics: &mut Diagnostics,
) -> PrepResult<DataFrame> {
    let (datetime, features) = pop_datetime(df)?;
    let times = timestamps_ms(&datetime)?;
    let null_times = times.iter().filter(|t| t.is_none()).count();
    if null_times > 0 {
        return Err(PrepError::MissingValues {
            column: DATETIME_COLUMN.to_string(),
            count: null_times,
        });
    }
    let times: Vec<i64> = times.into_iter().flatten().collect();

    let mut columns: Vec<Column> = vec![datetime];
    for column in features.get_columns() {
        if !is_numeric(column.dtype()) || column.null_count() == 0 {
            columns.push(column.clone());
            continue;
        }
        let filled = match method {
            InterpolationMethod::Time => interpolate_time(&times, &optional_values(column)?),
        };
        columns.push(Series::new(column.name().clone(), filled).into_column());
    }
    let out = DataFrame::new(columns)?;

    let remaining: usize = out.get_columns().iter().map(|c| c.null_count()).sum();
    if remaining > 0 {
        diagnostics.warn(
            STAGE_PRE_PROCESSOR,
            format!("not all rows have been imputed, {} nulls remain", remaining),
        );
    }

    Ok(out)
}

fn interpolate_time(times: &[i64], values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    let known: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();

    for pair in known.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if right - left < 2 {
            continue;
        }
        let (Some(v_left), Some(v_right)) = (values[left], values[right]) else {
            continue;
        };
        let span = (times[right] - times[left]) as f64;
        for i in left + 1..right {
            let fraction = if span == 0.0 {
                0.0
            } else {
                (times[i] - times[left]) as f64 / span
            };
            out[i] = Some(v_left + fraction * (v_right - v_left));
        }
    }

    if let Some(&last) = known.last() {
        out[last + 1..].fill(values[last]);
    }

    out
}

/// Standardizes every feature column with its own mean and population std
///
/// Zero-variance columns keep a scale of 1, so they become all zeros.
/// Unlike the train/test splitter this fits on the whole table.
///
/// # Returns
///
/// The standardized table with `datetime` first, and the fitted parameters
pub fn gauss_normalize(df: &DataFrame) -> PrepResult<(DataFrame, ScalerParams)> {
    let (datetime, features) = pop_datetime(df)?;
    let mut params = ScalerParams::default();

    let mut columns: Vec<Column> = vec![datetime];
    for column in features.get_columns() {
        if !is_numeric(column.dtype()) {
            return Err(PrepError::NonNumericColumn {
                column: column.name().to_string(),
                dtype: column.dtype().to_string(),
            });
        }
        let cast = column.cast(&DataType::Float64)?;
        let values = cast.f64()?;
        let mean = values.mean().unwrap_or(0.0);
        let std = values.std(0).filter(|std| *std > 0.0).unwrap_or(1.0);

        let scaled: Vec<Option<f64>> = values
            .iter()
            .map(|v| v.map(|v| (v - mean) / std))
            .collect();
        columns.push(Series::new(column.name().clone(), scaled).into_column());
        params
            .columns
            .insert(column.name().to_string(), ColumnStats { mean, std });
    }

    Ok((DataFrame::new(columns)?, params))
}

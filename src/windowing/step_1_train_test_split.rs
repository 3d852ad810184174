// External crates
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Internal modules
use crate::config::{DegeneratePolicy, SplitConfig};
use crate::constants::{DATETIME_COLUMN, STAGE_SPLIT, STD_EPSILON};
use crate::error::{PrepError, PrepResult};
use crate::util::column_utils::{is_numeric, optional_values};
use crate::util::diagnostics::Diagnostics;

/// Mean and sample standard deviation of one training column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

/// Standardization parameters fitted on the training partition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub columns: BTreeMap<String, ColumnStats>,
    /// Columns left unnormalized because their variance was zero
    pub skipped: Vec<String>,
}

impl ScalerParams {
    /// Standardizes a raw value of `column`, `None` if the column was not fitted
    pub fn transform(&self, column: &str, value: f64) -> Option<f64> {
        self.columns
            .get(column)
            .map(|stats| (value - stats.mean) / stats.std)
    }

    /// Maps a standardized value of `column` back to its original scale
    pub fn inverse_transform(&self, column: &str, value: f64) -> Option<f64> {
        self.columns
            .get(column)
            .map(|stats| value * stats.std + stats.mean)
    }

    pub fn to_json(&self) -> PrepResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PrepResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Result of a train/test split
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub train: DataFrame,
    pub test: DataFrame,
    /// First row index of the test partition
    pub boundary: usize,
    /// Present when normalization was requested
    pub scaler: Option<ScalerParams>,
}

/// Boundary row index for a temporal split, `round(rows * ratio)` with ties to even
pub fn split_boundary(rows: usize, ratio: f64) -> usize {
    let boundary = (rows as f64 * ratio).round_ties_even();
    (boundary.max(0.0) as usize).min(rows)
}

/// Splits the DataFrame in time order into training and test partitions
///
/// Training rows are `[0, k)` and test rows `[k, rows)` with
/// `k = round(rows * ratio)`; nothing is shuffled. With normalization on,
/// every column except `datetime` is standardized in both partitions with
/// the mean and sample standard deviation of the training rows only.
///
/// # Arguments
///
/// * `df` - Input DataFrame, sorted by time
/// * `config` - Ratio, normalization flag and zero-variance policy
/// * `diagnostics` - Receives the partition sizes and any skipped columns
///
/// # Returns
///
/// The two partitions, the boundary index and the fitted scaler
pub fn train_test_split(
    df: &DataFrame,
    config: &SplitConfig,
    diagnostics: &mut Diagnostics,
) -> PrepResult<SplitOutput> {
    config.validate()?;

    let rows = df.height();
    let boundary = split_boundary(rows, config.ratio);
    let mut train = df.slice(0, boundary);
    let mut test = df.slice(boundary as i64, rows - boundary);

    let scaler = if config.normalize {
        Some(normalize_partitions(
            &mut train,
            &mut test,
            config.degenerate_policy,
            diagnostics,
        )?)
    } else {
        None
    };

    diagnostics.info(
        STAGE_SPLIT,
        format!(
            "train size: ({}, {}), test size: ({}, {})",
            train.height(),
            train.width(),
            test.height(),
            test.width()
        ),
    );

    Ok(SplitOutput {
        train,
        test,
        boundary,
        scaler,
    })
}

/// Fits statistics on `train` and rewrites the feature columns of both partitions
fn normalize_partitions(
    train: &mut DataFrame,
    test: &mut DataFrame,
    policy: DegeneratePolicy,
    diagnostics: &mut Diagnostics,
) -> PrepResult<ScalerParams> {
    let mut params = ScalerParams::default();

    let feature_names: Vec<String> = train
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != DATETIME_COLUMN)
        .map(|name| name.to_string())
        .collect();

    for name in feature_names {
        let train_column = train.column(&name)?;
        if !is_numeric(train_column.dtype()) {
            return Err(PrepError::NonNumericColumn {
                column: name,
                dtype: train_column.dtype().to_string(),
            });
        }

        let cast = train_column.cast(&DataType::Float64)?;
        let values = cast.f64()?;
        let mean = values.mean();
        let std = values.std(1);

        let stats = match (mean, std) {
            (Some(mean), Some(std)) if std.is_finite() && std >= STD_EPSILON => {
                ColumnStats { mean, std }
            }
            (_, std) => {
                let std = std.unwrap_or(f64::NAN);
                match policy {
                    DegeneratePolicy::Fail => {
                        return Err(PrepError::DegenerateColumn { column: name, std });
                    }
                    DegeneratePolicy::PassThrough => {
                        diagnostics.warn(
                            STAGE_SPLIT,
                            format!(
                                "column `{}` has zero variance (std = {}), left unnormalized",
                                name, std
                            ),
                        );
                        params.skipped.push(name);
                        continue;
                    }
                }
            }
        };

        let train_scaled = standardize(train.column(&name)?, stats)?;
        let test_scaled = standardize(test.column(&name)?, stats)?;
        train.replace(&name, train_scaled)?;
        test.replace(&name, test_scaled)?;

        params.columns.insert(name, stats);
    }

    Ok(params)
}

fn standardize(column: &Column, stats: ColumnStats) -> PrepResult<Series> {
    let scaled: Vec<Option<f64>> = optional_values(column)?
        .into_iter()
        .map(|v| v.map(|v| (v - stats.mean) / stats.std))
        .collect();
    Ok(Series::new(column.name().clone(), scaled))
}

// External crates
use log::info;
use polars::prelude::*;

// Internal modules
use super::step_1_train_test_split::{train_test_split, ScalerParams};
use super::step_2_sequences::{build_sequences, Sequences};
use super::step_3_batches::{build_batches, BatchMap};
use crate::config::PipelineConfig;
use crate::constants::{DATETIME_COLUMN, STAGE_PIPELINE};
use crate::error::PrepResult;
use crate::util::column_utils::ensure_datetime;
use crate::util::diagnostics::Diagnostics;

/// One partition with its windows
#[derive(Debug, Clone)]
pub struct PreparedPartition {
    /// Partition table, `datetime` included
    pub table: DataFrame,
    /// Windows of every feature column (`datetime` excluded)
    pub sequences: Sequences,
}

impl PreparedPartition {
    pub fn observation_batches(&self, batch_size: usize) -> PrepResult<BatchMap<'_>> {
        build_batches(&self.sequences.observations, batch_size)
    }

    pub fn target_batches(&self, batch_size: usize) -> PrepResult<BatchMap<'_>> {
        build_batches(&self.sequences.targets, batch_size)
    }
}

/// Output of a full preparation run
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub train: PreparedPartition,
    pub test: PreparedPartition,
    pub scaler: Option<ScalerParams>,
    pub config: PipelineConfig,
    pub diagnostics: Diagnostics,
}

impl PreparedData {
    /// Observation and target batches of the training partition
    pub fn train_batches(&self) -> PrepResult<(BatchMap<'_>, BatchMap<'_>)> {
        Ok((
            self.train.observation_batches(self.config.batch_size)?,
            self.train.target_batches(self.config.batch_size)?,
        ))
    }

    /// Observation and target batches of the test partition
    pub fn test_batches(&self) -> PrepResult<(BatchMap<'_>, BatchMap<'_>)> {
        Ok((
            self.test.observation_batches(self.config.batch_size)?,
            self.test.target_batches(self.config.batch_size)?,
        ))
    }
}

/// The feature columns of a partition, without `datetime`
pub fn feature_frame(df: &DataFrame) -> PrepResult<DataFrame> {
    Ok(df.drop(DATETIME_COLUMN)?)
}

/// Split, normalize and window a cleaned table
///
/// # Arguments
///
/// * `df` - Cleaned table with a `datetime` column and numeric features
/// * `config` - Pipeline configuration, validated before anything runs
///
/// # Returns
///
/// Both partitions with their sequences, the fitted scaler and diagnostics
pub fn prepare(df: &DataFrame, config: &PipelineConfig) -> PrepResult<PreparedData> {
    config.validate()?;
    ensure_datetime(df)?;

    let mut diagnostics = Diagnostics::new();

    info!("Splitting {} rows into training and test partitions", df.height());
    let split = train_test_split(df, &config.split, &mut diagnostics)?;

    info!("Building training sequences");
    let train_sequences =
        build_sequences(&feature_frame(&split.train)?, &config.window, &mut diagnostics)?;

    info!("Building test sequences");
    let test_sequences =
        build_sequences(&feature_frame(&split.test)?, &config.window, &mut diagnostics)?;

    diagnostics.info(
        STAGE_PIPELINE,
        format!(
            "prepared {} training and {} test sequences",
            train_sequences.len(),
            test_sequences.len()
        ),
    );

    Ok(PreparedData {
        train: PreparedPartition {
            table: split.train,
            sequences: train_sequences,
        },
        test: PreparedPartition {
            table: split.test,
            sequences: test_sequences,
        },
        scaler: split.scaler,
        config: *config,
        diagnostics,
    })
}

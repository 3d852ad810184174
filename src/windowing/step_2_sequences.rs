// External crates
use ndarray::{s, Array1};
use polars::prelude::*;
use std::collections::HashMap;
use std::ops::Range;

// Internal modules
use crate::config::WindowConfig;
use crate::constants::STAGE_SEQUENCES;
use crate::error::{ConfigError, PrepResult};
use crate::util::column_utils::column_array;
use crate::util::diagnostics::Diagnostics;

/// One fixed-length window of a single feature
pub type Window = Array1<f64>;

/// Ordered windows per feature name
pub type SequenceMap = HashMap<String, Vec<Window>>;

/// Row accounting shared by every feature of a partition
///
/// ```text
/// | dropped | observations | offset | targets | observations | offset | targets | ...
///           <---------- sequence 0 ----------> <---------- sequence 1 ---------->
/// ```
///
/// The oldest `rows % block` rows are dropped so that the most recent rows
/// always end a complete block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLayout {
    pub rows: usize,
    pub observations: usize,
    pub offset: usize,
    pub targets: usize,
    pub block: usize,
    /// Number of complete sequences
    pub count: usize,
    /// Number of leading rows left out
    pub dropped: usize,
}

impl SequenceLayout {
    /// Computes the layout for `rows` rows, validating `config` first
    pub fn new(rows: usize, config: &WindowConfig) -> Result<Self, ConfigError> {
        let block = config.validated_block_len()?;
        Ok(Self {
            rows,
            observations: config.observations,
            offset: config.offset,
            targets: config.targets,
            block,
            count: rows / block,
            dropped: rows % block,
        })
    }

    /// First row of sequence `index`
    pub fn block_start(&self, index: usize) -> usize {
        self.dropped + index * self.block
    }

    /// Absolute rows of the observation window of sequence `index`
    pub fn observation_range(&self, index: usize) -> Range<usize> {
        let start = self.block_start(index);
        start..start + self.observations
    }

    /// Absolute rows of the target window of sequence `index`
    pub fn target_range(&self, index: usize) -> Range<usize> {
        let start = self.block_start(index) + self.observations + self.offset;
        start..start + self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Observation and target windows of one partition
#[derive(Debug, Clone, PartialEq)]
pub struct Sequences {
    pub observations: SequenceMap,
    pub targets: SequenceMap,
    pub layout: SequenceLayout,
}

impl Sequences {
    pub fn len(&self) -> usize {
        self.layout.count
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }
}

/// Cuts every column into block-aligned (observation, target) window pairs
///
/// The layout is computed once from the row count, so sequence `i` covers
/// the same absolute rows in every feature. Every column of `df` is a
/// feature, `datetime` included when present.
///
/// # Arguments
///
/// * `df` - Partition to slice, sorted by time
/// * `config` - Observation, offset and target lengths
/// * `diagnostics` - Receives the dropped row range and sequence count
///
/// # Returns
///
/// Observation and target maps keyed by column name, plus the layout used
pub fn build_sequences(
    df: &DataFrame,
    config: &WindowConfig,
    diagnostics: &mut Diagnostics,
) -> PrepResult<Sequences> {
    let layout = SequenceLayout::new(df.height(), config)?;

    let mut observations = SequenceMap::with_capacity(df.width());
    let mut targets = SequenceMap::with_capacity(df.width());

    for column in df.get_columns() {
        let values = column_array(column)?;
        let (obs, tgt): (Vec<Window>, Vec<Window>) = (0..layout.count)
            .map(|index| {
                let obs = layout.observation_range(index);
                let tgt = layout.target_range(index);
                (
                    values.slice(s![obs.start..obs.end]).to_owned(),
                    values.slice(s![tgt.start..tgt.end]).to_owned(),
                )
            })
            .unzip();

        let name = column.name().to_string();
        observations.insert(name.clone(), obs);
        targets.insert(name, tgt);
    }

    if layout.is_empty() {
        diagnostics.warn(
            STAGE_SEQUENCES,
            format!(
                "not enough rows for a single sequence: {} rows, block of {}",
                layout.rows, layout.block
            ),
        );
    }
    diagnostics.info(
        STAGE_SEQUENCES,
        format!(
            "To have uniform sequences, rows dropped: [0:{}]",
            layout.dropped
        ),
    );
    diagnostics.info(
        STAGE_SEQUENCES,
        format!("Number of sequences: {}", layout.count),
    );

    Ok(Sequences {
        observations,
        targets,
        layout,
    })
}

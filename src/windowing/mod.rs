//! # Windowing Module
//!
//! Turns a cleaned, time-ordered table into supervised-learning windows.
//!
//! ## Module Structure:
//!
//! 1. **step_1_train_test_split**: Temporal split with leakage-free standardization
//! 2. **step_2_sequences**: Block-aligned observation/target windows per feature
//! 3. **step_3_batches**: Fixed-size batches of windows, last one possibly short
//! 4. **step_4_pipeline**: Runs the three steps on one table
//!
//! Normalization statistics only ever come from the training rows, and every
//! feature of a partition shares one row layout, so sequence `i` means the
//! same time span whichever column it is read from.

pub mod step_1_train_test_split;
pub mod step_2_sequences;
pub mod step_3_batches;
pub mod step_4_pipeline;

pub use step_1_train_test_split::{
    split_boundary, train_test_split, ColumnStats, ScalerParams, SplitOutput,
};
pub use step_2_sequences::{build_sequences, SequenceLayout, SequenceMap, Sequences, Window};
pub use step_3_batches::{batch_count, build_batches, BatchMap};
pub use step_4_pipeline::{prepare, PreparedData, PreparedPartition};

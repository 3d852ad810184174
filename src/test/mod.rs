/// Test modules for the windowing pipeline
///
/// * `test_train_test_split` - Temporal split boundaries and leakage-free standardization
/// * `test_sequences` - Block layout, cross-feature alignment and the short-table warning
/// * `test_batches` - Batch sizes and lossless regrouping
/// * `test_pipeline` - End-to-end preparation of a cleaned table
/// * `test_pre_processor` - Datetime casting, null and zero pruning, interpolation
pub mod test_batches;
pub mod test_pipeline;

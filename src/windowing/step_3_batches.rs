// External crates
use std::collections::HashMap;

// Internal modules
use crate::config::validate_batch_size;
use crate::error::PrepResult;
use crate::windowing::step_2_sequences::Window;

/// Ordered batches per feature name. Batches borrow the windows they group.
pub type BatchMap<'a, T = Window> = HashMap<String, Vec<&'a [T]>>;

/// Number of batches needed for `sequences` items, `ceil(sequences / batch_size)`
pub fn batch_count(sequences: usize, batch_size: usize) -> usize {
    sequences.div_ceil(batch_size)
}

/// Groups each feature's sequences into consecutive batches of `batch_size`
///
/// ```text
/// | sequence 1 | sequence 2 | sequence 3 | sequence 4 | ...
///  <-------------- batch 1 -------------> <------- batch 2 ----
/// ```
///
/// The last batch holds the remainder and may be shorter. Nothing is
/// copied, reordered or dropped.
pub fn build_batches<T>(
    sequences: &HashMap<String, Vec<T>>,
    batch_size: usize,
) -> PrepResult<BatchMap<'_, T>> {
    validate_batch_size(batch_size)?;

    Ok(sequences
        .iter()
        .map(|(feature, items)| (feature.clone(), items.chunks(batch_size).collect()))
        .collect())
}

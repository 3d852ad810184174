use crate::config::WindowConfig;
use crate::constants::DATETIME_COLUMN;
use crate::error::{ConfigError, PrepError};
use crate::util::diagnostics::Diagnostics;
use crate::util::test_utils::sequential_dataframe;
use crate::windowing::step_2_sequences::{build_sequences, SequenceMap, Window};
use crate::windowing::step_3_batches::{batch_count, build_batches};
use anyhow::Result;
use std::collections::HashMap;

fn hundred_row_sequences() -> Result<SequenceMap> {
    let df = sequential_dataframe(100, &["load", "temp"])?.drop(DATETIME_COLUMN)?;
    let sequences = build_sequences(&df, &WindowConfig::new(5, 1, 1), &mut Diagnostics::new())?;
    Ok(sequences.observations)
}

#[test]
fn test_fourteen_sequences_in_batches_of_three() -> Result<()> {
    let sequences = hundred_row_sequences()?;
    let batches = build_batches(&sequences, 3)?;

    for feature in ["load", "temp"] {
        let sizes: Vec<usize> = batches[feature].iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 3, 2]);
    }
    assert_eq!(batch_count(14, 3), 5);
    Ok(())
}

#[test]
fn test_flattened_batches_reproduce_sequences() -> Result<()> {
    let sequences = hundred_row_sequences()?;

    for batch_size in [1, 2, 5, 14, 20] {
        let batches = build_batches(&sequences, batch_size)?;
        assert_eq!(batches.len(), sequences.len());
        for (feature, items) in &sequences {
            let feature_batches = &batches[feature];
            assert_eq!(feature_batches.len(), batch_count(items.len(), batch_size));
            assert!(feature_batches.iter().all(|b| !b.is_empty() && b.len() <= batch_size));

            let flattened: Vec<Window> = feature_batches
                .iter()
                .flat_map(|b| b.iter().cloned())
                .collect();
            assert_eq!(&flattened, items);
        }
    }
    Ok(())
}

#[test]
fn test_batches_borrow_sequences() -> Result<()> {
    let sequences = hundred_row_sequences()?;
    let batches = build_batches(&sequences, 4)?;

    let first = &batches["load"][0][0];
    assert!(std::ptr::eq(first, &sequences["load"][0]));
    Ok(())
}

#[test]
fn test_last_batch_may_hold_one_sequence() -> Result<()> {
    let sequences: HashMap<String, Vec<u32>> = HashMap::from([("x".to_string(), (0..7).collect())]);
    let batches = build_batches(&sequences, 3)?;
    assert_eq!(batches["x"], vec![&[0, 1, 2][..], &[3, 4, 5][..], &[6][..]]);
    Ok(())
}

#[test]
fn test_empty_sequences_give_no_batches() -> Result<()> {
    let sequences: SequenceMap = HashMap::from([("load".to_string(), Vec::new())]);
    let batches = build_batches(&sequences, 8)?;
    assert!(batches["load"].is_empty());
    assert_eq!(batch_count(0, 8), 0);
    Ok(())
}

#[test]
fn test_zero_batch_size_is_rejected() -> Result<()> {
    let sequences = hundred_row_sequences()?;
    let err = build_batches(&sequences, 0).unwrap_err();
    assert!(matches!(err, PrepError::Config(ConfigError::ZeroBatchSize)));
    Ok(())
}

#[test]
fn test_rebatching_is_idempotent() -> Result<()> {
    let sequences = hundred_row_sequences()?;
    assert_eq!(build_batches(&sequences, 4)?, build_batches(&sequences, 4)?);
    Ok(())
}

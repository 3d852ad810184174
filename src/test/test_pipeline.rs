use crate::config::{PipelineConfig, SplitConfig, WindowConfig};
use crate::constants::DATETIME_COLUMN;
use crate::error::{ConfigError, PrepError};
use crate::util::test_utils::{generate_test_dataframe, sequential_dataframe};
use crate::windowing::step_3_batches::batch_count;
use crate::windowing::step_4_pipeline::prepare;
use anyhow::Result;
use ndarray::arr1;

fn config(ratio: f64, normalize: bool, window: WindowConfig, batch_size: usize) -> PipelineConfig {
    PipelineConfig {
        split: SplitConfig::new(ratio, normalize),
        window,
        batch_size,
    }
}

#[test]
fn test_prepare_windows_each_partition() -> Result<()> {
    let df = sequential_dataframe(100, &["load", "temp"])?;
    let prepared = prepare(&df, &config(0.8, false, WindowConfig::new(5, 1, 1), 3))?;

    assert_eq!(prepared.train.table.height(), 80);
    assert_eq!(prepared.test.table.height(), 20);
    assert!(prepared.scaler.is_none());

    // 80 rows: 11 blocks of 7, 3 dropped. 20 rows: 2 blocks, 6 dropped.
    assert_eq!(prepared.train.sequences.len(), 11);
    assert_eq!(prepared.train.sequences.layout.dropped, 3);
    assert_eq!(prepared.test.sequences.len(), 2);
    assert_eq!(prepared.test.sequences.layout.dropped, 6);

    // Test windows index the partition, so they start after the boundary
    assert_eq!(
        prepared.test.sequences.observations["load"][0],
        arr1(&[86.0, 87.0, 88.0, 89.0, 90.0])
    );
    assert_eq!(prepared.test.sequences.targets["temp"][1], arr1(&[1099.0]));

    assert!(!prepared.train.sequences.observations.contains_key(DATETIME_COLUMN));
    assert!(prepared.train.table.column(DATETIME_COLUMN).is_ok());
    Ok(())
}

#[test]
fn test_prepare_batches_match_sequence_counts() -> Result<()> {
    let df = generate_test_dataframe(24 * 20, 7)?;
    let prepared = prepare(&df, &config(0.75, true, WindowConfig::new(24, 0, 1), 4))?;

    let (train_obs, train_tgt) = prepared.train_batches()?;
    let (test_obs, _) = prepared.test_batches()?;
    for feature in ["total_load", "price", "temp"] {
        assert_eq!(
            train_obs[feature].len(),
            batch_count(prepared.train.sequences.len(), 4)
        );
        assert_eq!(train_obs[feature].len(), train_tgt[feature].len());
        assert_eq!(
            test_obs[feature].len(),
            batch_count(prepared.test.sequences.len(), 4)
        );
        assert!(train_obs[feature][0][0].len() == 24);
        assert!(train_tgt[feature][0][0].len() == 1);
    }
    assert!(prepared.scaler.is_some());
    Ok(())
}

#[test]
fn test_prepare_requires_datetime_column() -> Result<()> {
    let df = sequential_dataframe(30, &["load"])?.drop(DATETIME_COLUMN)?;
    let err = prepare(&df, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PrepError::MissingColumn(ref name) if name == DATETIME_COLUMN));
    Ok(())
}

#[test]
fn test_prepare_validates_config_first() -> Result<()> {
    let df = sequential_dataframe(30, &["load"])?.drop(DATETIME_COLUMN)?;
    let err = prepare(&df, &config(0.8, true, WindowConfig::new(4, 0, 1), 0)).unwrap_err();
    assert!(matches!(err, PrepError::Config(ConfigError::ZeroBatchSize)));
    Ok(())
}

#[test]
fn test_short_test_partition_warns_without_failing() -> Result<()> {
    let df = sequential_dataframe(40, &["load"])?;
    let prepared = prepare(&df, &config(0.9, true, WindowConfig::new(5, 1, 1), 2))?;

    assert_eq!(prepared.test.table.height(), 4);
    assert!(prepared.test.sequences.is_empty());
    assert!(prepared.test.sequences.observations["load"].is_empty());
    assert_eq!(prepared.diagnostics.warnings().count(), 1);
    let (test_obs, _) = prepared.test_batches()?;
    assert!(test_obs["load"].is_empty());
    Ok(())
}

// External crates
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;

// Local crate
use gridcast_prep::constants::DATETIME_COLUMN;
use gridcast_prep::util::column_utils::datetime_series;
use gridcast_prep::util::inspection::inspect_std_iqr;
use gridcast_prep::windowing::{batch_count, prepare, PreparedPartition};
use gridcast_prep::PipelineConfig;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Hourly synthetic load and temperature series, two weeks long by default
fn generate_hourly_dataframe(num_rows: usize, seed: u64) -> Result<DataFrame> {
    let base = NaiveDateTime::parse_from_str("2015-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
        .context("Invalid base timestamp")?
        .and_utc();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut times = Vec::with_capacity(num_rows);
    let mut load = Vec::with_capacity(num_rows);
    let mut temp = Vec::with_capacity(num_rows);
    for i in 0..num_rows {
        let cycle = (i as f64 / 24.0 * std::f64::consts::TAU).sin();
        times.push(Some((base + Duration::hours(i as i64)).timestamp_millis()));
        load.push(28_000.0 + 4_000.0 * cycle + rng.random::<f64>() * 500.0);
        temp.push(283.0 + 6.0 * cycle + rng.random::<f64>());
    }

    Ok(DataFrame::new(vec![
        datetime_series(DATETIME_COLUMN, times).into_column(),
        Column::new("total_load".into(), load),
        Column::new("temp".into(), temp),
    ])?)
}

fn describe_partition(label: &str, partition: &PreparedPartition, batch_size: usize) -> Result<()> {
    let layout = partition.sequences.layout;
    println!(
        "{} partition: {} rows, {} sequences of block {} ({} rows dropped)",
        label,
        partition.table.height(),
        layout.count,
        layout.block,
        layout.dropped
    );

    let batches = partition.observation_batches(batch_size)?;
    for (feature, feature_batches) in &batches {
        println!(
            "  {}: {} batches (expected {})",
            feature,
            feature_batches.len(),
            batch_count(layout.count, batch_size)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    // Accept an optional JSON config path and row count as command-line arguments
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => PipelineConfig::default(),
    };
    let num_rows = match args.get(2) {
        Some(rows) => rows.parse::<usize>().context("Row count must be an integer")?,
        None => 24 * 14,
    };

    println!(
        "{} {} (rustc {})",
        build_info::PKG_NAME,
        build_info::PKG_VERSION,
        build_info::RUSTC_VERSION
    );
    println!("Using config: {}", config.to_json()?);

    let df = generate_hourly_dataframe(num_rows, 42)?;
    println!("Feature spread:\n{}", inspect_std_iqr(&df)?);

    let prepared = prepare(&df, &config)?;
    describe_partition("Training", &prepared.train, config.batch_size)?;
    describe_partition("Testing", &prepared.test, config.batch_size)?;

    if let Some(scaler) = &prepared.scaler {
        println!("Scaler parameters: {}", scaler.to_json()?);
    }

    println!("Diagnostics:");
    for diagnostic in prepared.diagnostics.events() {
        println!("  {}", diagnostic);
    }

    Ok(())
}

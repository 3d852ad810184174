// External imports
use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Internal imports
use crate::constants::DATETIME_COLUMN;
use crate::util::column_utils::datetime_series;

fn hourly_millis(num_rows: usize) -> Vec<Option<i64>> {
    let base = NaiveDateTime::parse_from_str("2015-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
        .unwrap()
        .and_utc();
    (0..num_rows)
        .map(|i| Some((base + Duration::hours(i as i64)).timestamp_millis()))
        .collect()
}

/// A frame whose value at row `r` of feature `k` is `r + 1000 * k`
///
/// Windows built from it reveal the absolute rows they were cut from.
pub fn sequential_dataframe(num_rows: usize, features: &[&str]) -> Result<DataFrame> {
    let mut columns = vec![datetime_series(DATETIME_COLUMN, hourly_millis(num_rows)).into_column()];
    for (k, name) in features.iter().enumerate() {
        let values: Vec<f64> = (0..num_rows).map(|r| (r + 1000 * k) as f64).collect();
        columns.push(Column::new((*name).into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Random-walk load/price/temperature frame, reproducible from `seed`
pub fn generate_test_dataframe(num_rows: usize, seed: u64) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut load = Vec::with_capacity(num_rows);
    let mut price = Vec::with_capacity(num_rows);
    let mut temp = Vec::with_capacity(num_rows);

    let mut current_load = 25_000.0 + rng.random::<f64>() * 5_000.0;
    let mut current_price = 50.0 + rng.random::<f64>() * 20.0;
    for i in 0..num_rows {
        current_load *= 1.0 + (rng.random::<f64>() * 2.0 - 1.0) * 0.02;
        current_price *= 1.0 + (rng.random::<f64>() * 2.0 - 1.0) * 0.05;
        let daily_cycle = (i as f64 / 24.0 * std::f64::consts::TAU).sin();

        load.push(current_load);
        price.push(current_price);
        temp.push(285.0 + 5.0 * daily_cycle + rng.random::<f64>());
    }

    Ok(DataFrame::new(vec![
        datetime_series(DATETIME_COLUMN, hourly_millis(num_rows)).into_column(),
        Column::new("total_load".into(), load),
        Column::new("price".into(), price),
        Column::new("temp".into(), temp),
    ])?)
}

/// Values of a numeric column, panicking on nulls
pub fn values_of(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .iter()
        .map(|v| v.unwrap())
        .collect()
}

pub fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

// External crates
use polars::prelude::*;

// Internal modules
use crate::error::PrepResult;
use crate::util::column_utils::optional_values;
use crate::util::pre_processor::pop_datetime;

/// Percentage of nulls per column
///
/// # Returns
///
/// A DataFrame with `column` and `null_pct` columns, one row per input column
pub fn inspect_nulls(df: &DataFrame) -> PrepResult<DataFrame> {
    let height = df.height().max(1) as f64;
    let (names, pcts): (Vec<String>, Vec<f64>) = df
        .get_columns()
        .iter()
        .map(|c| (c.name().to_string(), c.null_count() as f64 / height * 100.0))
        .unzip();

    Ok(DataFrame::new(vec![
        Column::new("column".into(), names),
        Column::new("null_pct".into(), pcts),
    ])?)
}

/// Linear-interpolated quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Spread statistics of every feature column
///
/// `std_iqr` is the sample standard deviation over the interquartile range,
/// `std_avg` the sample standard deviation over the mean (coefficient of
/// variation). Nulls are ignored; undefined ratios are null.
pub fn inspect_std_iqr(df: &DataFrame) -> PrepResult<DataFrame> {
    let (_, features) = pop_datetime(df)?;

    let mut names = Vec::with_capacity(features.width());
    let mut std_iqr = Vec::with_capacity(features.width());
    let mut std_avg = Vec::with_capacity(features.width());

    for column in features.get_columns() {
        let mut values: Vec<f64> = optional_values(column)?.into_iter().flatten().collect();
        let cast = column.cast(&DataType::Float64)?;
        let (mean, std) = if values.len() < 2 {
            (None, None)
        } else {
            let chunked = cast.f64()?;
            (chunked.mean(), chunked.std(1))
        };
        values.sort_by(|a, b| a.total_cmp(b));
        let iqr = quantile(&values, 0.75).zip(quantile(&values, 0.25)).map(|(q3, q1)| q3 - q1);

        names.push(column.name().to_string());
        std_iqr.push(ratio(std, iqr));
        std_avg.push(ratio(std, mean));
    }

    Ok(DataFrame::new(vec![
        Column::new("column".into(), names),
        Column::new("std_iqr".into(), std_iqr),
        Column::new("std_avg".into(), std_avg),
    ])?)
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

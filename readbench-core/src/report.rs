// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Report rendering.
//!
//! The text report is a tab-separated table ranked by cost, with every row
//! compared against the cheapest one (the bench).

use std::fmt::Write;

use crate::error::{ReadBenchError, ReadBenchResult};
use crate::result::ResultSet;

/// Header line of the text report.
pub const HEADER: &str = "name\tcost(ms)\tbufferSize(byte)\tfileSize(MB)\ttimes\tcompare";

/// Ratio of `cost` to `bench`.
///
/// A zero bench only happens when nothing was timed; equal zero costs compare
/// as 1.0 and anything above it as infinitely slower.
pub fn multiplier(cost: u64, bench: u64) -> f64 {
    if bench == 0 {
        return if cost == 0 { 1.0 } else { f64::INFINITY };
    }
    cost as f64 / bench as f64
}

/// Format a multiplier to two decimals, rounding ties away from zero.
///
/// Rounding works on the shortest decimal form of `ratio`, so 1.125 renders
/// as `1.13` and 1.005 as `1.01`.
pub fn format_multiplier(ratio: f64) -> String {
    if !ratio.is_finite() {
        return format!("{ratio:.2}");
    }

    let shortest = ratio.to_string();
    let (whole, fraction) = shortest
        .split_once('.')
        .unwrap_or((shortest.as_str(), ""));
    let digits = fraction.as_bytes();
    let digit = |i: usize| digits.get(i).map_or(0, |d| u128::from(d - b'0'));

    match whole.parse::<u128>() {
        Ok(whole) => {
            let mut hundredths = whole * 100 + digit(0) * 10 + digit(1);
            if digit(2) >= 5 {
                hundredths += 1;
            }
            format!("{}.{:02}", hundredths / 100, hundredths % 100)
        }
        Err(_) => format!("{ratio:.2}"),
    }
}

/// Render the ranked, tab-separated comparison table.
pub fn render(results: &ResultSet) -> ReadBenchResult<String> {
    let bench = results.bench().ok_or(ReadBenchError::NoResults)?;

    let mut out = String::from(HEADER);
    for result in results.ranked() {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "\n{}\t{}\t{}\t{}\t{}\tx{}",
            result.name,
            result.cost_millis(),
            result.buffer_size,
            result.file_size_bytes / crate::types::BYTES_PER_MB,
            result.repetitions,
            format_multiplier(multiplier(result.cost_nanos, bench)),
        );
    }
    Ok(out)
}

/// Render the results, in sweep order, as pretty-printed JSON.
pub fn render_json(results: &ResultSet) -> ReadBenchResult<String> {
    if results.is_empty() {
        return Err(ReadBenchError::NoResults);
    }
    Ok(serde_json::to_string_pretty(results)?)
}

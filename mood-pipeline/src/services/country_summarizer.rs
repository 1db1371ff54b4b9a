//! Per-country mood summary with coverage accounting
//!
//! One summary row per (country, date) group:
//! - `n_matched`: processed rows in the group
//! - `n_chart`: resolved-metadata rows for the same run, when known
//! - `match_rate`: `n_matched / n_chart`, absent when `n_chart` is 0 or unknown
//! - mean, median and quartiles over the non-missing mood values
//! - `w_mean_pop`: weight `clamp(track_popularity, 0, 100) / 100`
//! - `w_mean_streams`: weight `max(streams_chart, 0)`
//!
//! A group whose mood values are all missing still gets a row with its
//! coverage filled in and every statistic absent.

use super::mood_statistics::{mean, median, percentile, weighted_mean};
use crate::models::{CountrySummary, MergedRecord, RunKey};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Summarize every non-empty group, sorted by (date, country)
pub fn summarize(
    groups: &BTreeMap<RunKey, Vec<MergedRecord>>,
    chart_population: &HashMap<RunKey, u64>,
) -> Vec<CountrySummary> {
    let mut rows: Vec<CountrySummary> = groups
        .iter()
        .filter(|(_, records)| !records.is_empty())
        .map(|(key, records)| summarize_group(key, records, chart_population.get(key).copied()))
        .collect();

    rows.sort_by(|a, b| (&a.date, &a.country).cmp(&(&b.date, &b.country)));
    rows
}

/// Summary row for one (country, date) group
pub fn summarize_group(key: &RunKey, records: &[MergedRecord], n_chart: Option<u64>) -> CountrySummary {
    let n_matched = records.len() as u64;
    let match_rate = n_chart
        .filter(|&n| n > 0)
        .map(|n| n_matched as f64 / n as f64);

    let mut summary = CountrySummary {
        country: key.country.clone(),
        date: key.date.clone(),
        n_chart,
        n_matched,
        match_rate,
        ..Default::default()
    };

    let moods: Vec<f64> = records.iter().filter_map(|r| r.mood_index).collect();
    if moods.is_empty() {
        debug!(run = %key, n_matched, "No mood values in group");
        return summary;
    }

    summary.mean = mean(&moods);
    summary.median = median(&moods);
    summary.p25 = percentile(&moods, 0.25);
    summary.p75 = percentile(&moods, 0.75);

    let by_popularity: Vec<(Option<f64>, Option<f64>)> = records
        .iter()
        .map(|r| (r.mood_index, r.track_popularity.map(popularity_weight)))
        .collect();
    summary.w_mean_pop = weighted_mean(&by_popularity);

    let by_streams: Vec<(Option<f64>, Option<f64>)> = records
        .iter()
        .map(|r| (r.mood_index, r.streams_chart.map(|s| s.max(0.0))))
        .collect();
    summary.w_mean_streams = weighted_mean(&by_streams);

    debug!(
        run = %key,
        n_matched,
        mean = summary.mean.unwrap_or(f64::NAN),
        "Group summarized"
    );

    summary
}

fn popularity_weight(popularity: i64) -> f64 {
    popularity.clamp(0, 100) as f64 / 100.0
}

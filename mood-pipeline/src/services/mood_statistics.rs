//! Descriptive statistics over mood values
//!
//! Missing values are filtered by the callers; every function returns
//! `None` instead of NaN when there is nothing to aggregate.

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile `q` (0.0-1.0) with linear interpolation between closest ranks
///
/// Position `q * (n - 1)` in the sorted values; the result lies on the
/// segment between the two neighbouring ranks.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Median, the 0.5 percentile
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 0.5)
}

/// Weighted mean `Σ vᵢwᵢ / Σ wᵢ` over pairs where both value and weight exist
///
/// `None` when no pair is complete or the weights sum to zero.
pub fn weighted_mean(pairs: &[(Option<f64>, Option<f64>)]) -> Option<f64> {
    let (weighted_sum, weight_sum) = pairs
        .iter()
        .filter_map(|(v, w)| Some((v.as_ref()?, w.as_ref()?)))
        .fold((0.0, 0.0), |(ws, wt), (v, w)| (ws + v * w, wt + w));

    if weight_sum > 0.0 {
        Some(weighted_sum / weight_sum)
    } else {
        None
    }
}

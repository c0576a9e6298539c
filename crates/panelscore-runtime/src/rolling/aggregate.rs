//! Window aggregators
//!
//! Every function takes the non-missing values of one window. Results that
//! are undefined (too few values, non-finite outcome) are `None`.

use panelscore_core::StatFunction;

/// Apply a registered stat function to the values of a window
pub fn aggregate(function: StatFunction, values: &[f64]) -> Option<f64> {
    if values.len() < function.min_values() {
        return None;
    }

    let result = match function {
        StatFunction::Mean => compute_mean(values),
        StatFunction::Median => compute_quantile(values, 0.5),
        StatFunction::Sd => compute_variance(values).sqrt(),
        StatFunction::Var => compute_variance(values),
        StatFunction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        StatFunction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        StatFunction::Sum => values.iter().sum(),
        StatFunction::Count => values.len() as f64,
        StatFunction::Range => {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            max - min
        }
        StatFunction::Quantile(p) => compute_quantile(values, f64::from(p) / 100.0),
    };

    result.is_finite().then_some(result)
}

fn compute_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator)
fn compute_variance(values: &[f64]) -> f64 {
    let mean = compute_mean(values);
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Quantile by linear interpolation between order statistics:
/// `h = (n - 1) * q`, result `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`
fn compute_quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    sorted[lower] + (h - lower as f64) * (sorted[upper] - sorted[lower])
}

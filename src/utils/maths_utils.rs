use argminmax::ArgMinMax;

/// Arithmetic mean. Empty input yields 0.0 rather than NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the trailing `n` values (or of all of them if fewer are available).
pub fn mean_of_last(values: &[f64], n: usize) -> f64 {
    let start = values.len().saturating_sub(n);
    mean(&values[start..])
}

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

pub fn get_min_max(vec: &[f64]) -> (f64, f64) {
    (get_min(vec), get_max(vec))
}

/// Spread of `prices` relative to their mean, in percent: `(max - min) / mean * 100`.
/// Fewer than two prices, or a zero mean, has no spread.
pub fn spread_pct(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    let avg = mean(prices);
    if avg == 0.0 {
        return 0.0;
    }
    let (min, max) = get_min_max(prices);
    (max - min) / avg * 100.0
}

/// Round half away from zero to `decimals` places.
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

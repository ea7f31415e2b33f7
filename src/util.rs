/// Mean of a run of millisecond samples, `None` when there are none
pub fn mean_ms(samples: &[u64]) -> Option<f64> {
    let sum = samples.iter().map(|&ms| ms as f64).sum::<f64>();
    let count = samples.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Words per minute rendered as a zero-padded, rounded two-digit figure
pub fn format_wpm(wpm: f64) -> String {
    if !wpm.is_finite() || wpm < 0.0 {
        return "00".to_string();
    }
    format!("{wpm:02.0}")
}

/// The trailing `window` entries of a slice (all of it when shorter)
pub fn tail<T>(data: &[T], window: usize) -> &[T] {
    &data[data.len().saturating_sub(window)..]
}

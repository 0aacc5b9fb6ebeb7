pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Share of `part` in `whole` as a percentage, `None` for an empty whole
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    match whole {
        0 => None,
        _ => Some(part as f64 / whole as f64 * 100.0),
    }
}

/// Round half up to the nearest integer for display
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

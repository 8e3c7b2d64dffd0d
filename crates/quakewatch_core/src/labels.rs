//! Display label for the active magnitude range.

/// Shortest form: 3.0 -> "3", 2.5 -> "2.5".
fn fmt_mag(m: f64) -> String {
    format!("{}", m)
}

pub fn magnitude_label(min_mag: Option<f64>, max_mag: Option<f64>) -> String {
    match (min_mag, max_mag) {
        (Some(min), Some(max)) => format!("{}–{}", fmt_mag(min), fmt_mag(max)),
        (Some(min), None) => format!("{}+", fmt_mag(min)),
        (None, Some(max)) => format!("<{}", fmt_mag(max)),
        (None, None) => "All Magnitudes".to_string(),
    }
}

//! Display formatting for elapsed times and paces

/// Pace in seconds per km as `MM:SS`
///
/// Minutes are not wrapped into hours (a 75-minute km reads `75:00`).
/// Fractional seconds are truncated.
pub fn format_pace(pace_seconds: f64) -> Option<String> {
    if !pace_seconds.is_finite() || pace_seconds < 0.0 {
        return None;
    }

    let total = pace_seconds as u64;
    Some(format!("{:02}:{:02}", total / 60, total % 60))
}

/// Elapsed seconds as `H:MM:SS`, truncating fractional seconds
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "-".to_string();
    }

    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

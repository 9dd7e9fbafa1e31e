//! Duration formatting for progress output.

use std::time::Duration;

/// Format a duration for display: `850ms`, `2.1s`, `3.5m`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_second_is_millis() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
    }

    #[test]
    fn seconds_have_one_decimal() {
        assert_eq!(format_duration(Duration::from_millis(2100)), "2.1s");
    }

    #[test]
    fn minutes_have_one_decimal() {
        assert_eq!(format_duration(Duration::from_secs(210)), "3.5m");
    }
}

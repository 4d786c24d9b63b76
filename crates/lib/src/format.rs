//! Human-readable relative times ("5m ago") for file and session metadata.

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Relative time of `ms` as seen from `now`. Zero means "never" and renders as `n/a`.
pub fn format_ago(ms: i64, now: i64) -> String {
    if ms == 0 {
        return "n/a".to_string();
    }
    let diff = now - ms;
    if diff < 0 {
        return "just now".to_string();
    }
    let sec = round_div(diff, 1000);
    if sec < 60 {
        return format!("{}s ago", sec);
    }
    let min = round_div(sec, 60);
    if min < 60 {
        return format!("{}m ago", min);
    }
    let hr = round_div(min, 60);
    if hr < 48 {
        return format!("{}h ago", hr);
    }
    format!("{}d ago", round_div(hr, 24))
}

fn round_div(n: i64, d: i64) -> i64 {
    (n + d / 2) / d
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn buckets() {
        assert_eq!(format_ago(0, NOW), "n/a");
        assert_eq!(format_ago(NOW + 10, NOW), "just now");
        assert_eq!(format_ago(NOW - 4_400, NOW), "4s ago");
        assert_eq!(format_ago(NOW - 5 * 60_000, NOW), "5m ago");
        assert_eq!(format_ago(NOW - 3 * 3_600_000, NOW), "3h ago");
        assert_eq!(format_ago(NOW - 47 * 3_600_000, NOW), "47h ago");
        assert_eq!(format_ago(NOW - 3 * 86_400_000, NOW), "3d ago");
    }

    #[test]
    fn rounding_moves_to_next_unit() {
        // 59.6s rounds to 60s, which is reported in minutes
        assert_eq!(format_ago(NOW - 59_600, NOW), "1m ago");
    }
}

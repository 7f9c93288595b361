/// ISO-8601 duration formatting for video metadata
use regex::Regex;

/// Convert a YouTube ISO-8601 duration (`PT1H2M3S`) into a display label.
///
/// Hours present: `H:MM:SS`. Otherwise `M:SS` with zero-padded seconds.
/// Missing or unparseable input yields the literal `"Unknown"`.
pub fn format_duration(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Unknown".to_string();
    };

    let re = match Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$") {
        Ok(re) => re,
        Err(_) => return "Unknown".to_string(),
    };

    let Some(caps) = re.captures(raw.trim()) else {
        return "Unknown".to_string();
    };

    let component = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let hours = component(1);
    let minutes = component(2);
    let seconds = component(3);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_duration() {
        assert_eq!(format_duration(Some("PT1H2M3S")), "1:02:03");
    }

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(format_duration(Some("PT5M7S")), "5:07");
        assert_eq!(format_duration(Some("PT12M30S")), "12:30");
    }

    #[test]
    fn test_seconds_only() {
        assert_eq!(format_duration(Some("PT45S")), "0:45");
    }

    #[test]
    fn test_hours_only() {
        assert_eq!(format_duration(Some("PT2H")), "2:00:00");
    }

    #[test]
    fn test_missing_input() {
        assert_eq!(format_duration(None), "Unknown");
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(format_duration(Some("not-a-duration")), "Unknown");
        assert_eq!(format_duration(Some("1h30m")), "Unknown");
        assert_eq!(format_duration(Some("")), "Unknown");
    }
}

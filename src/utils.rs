//! Utility functions for timestamps, filenames, and run directories

use chrono::{DateTime, Utc};

/// Format a duration in seconds as a tracklist timestamp
///
/// Hours are included only when non-zero: `3725` becomes `"1:02:05"` while
/// `245` becomes `"4:05"`.
///
/// # Examples
///
/// ```
/// use mixforge::utils::format_timestamp;
///
/// assert_eq!(format_timestamp(0), "0:00");
/// assert_eq!(format_timestamp(245), "4:05");
/// assert_eq!(format_timestamp(3725), "1:02:05");
/// ```
#[must_use]
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Reduce a track title to a filesystem-safe stem
///
/// Whitespace, `:` and `/` become underscores (common in AI titles, and the
/// word boundary stays visible); anything else outside ASCII alphanumerics,
/// `-`, and `_` is dropped. Runs of separators collapse to one underscore.
/// Titles that sanitize to nothing become `"untitled"`.
///
/// # Examples
///
/// ```
/// use mixforge::utils::sanitize_title;
///
/// assert_eq!(sanitize_title("Neon Highway Drive"), "Neon_Highway_Drive");
/// assert_eq!(sanitize_title("Ghost: Sector/7"), "Ghost_Sector_7");
/// ```
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    for c in title.chars() {
        let mapped = if c.is_whitespace() || c == ':' || c == '/' {
            Some('_')
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            Some(c)
        } else {
            None
        };
        if let Some(ch) = mapped {
            if ch == '_' && sanitized.ends_with('_') {
                continue;
            }
            sanitized.push(ch);
        }
    }

    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the download filename for a track
///
/// `index` is zero-based; filenames are numbered from 01 so they sort in
/// playlist order.
#[must_use]
pub fn track_filename(index: usize, title: &str) -> String {
    format!("{:02}_{}.mp3", index + 1, sanitize_title(title))
}

/// Build the per-run directory name, e.g. `focus_dark_synthwave_20260825_143000`
#[must_use]
pub fn run_dir_name(mood: &str, genre: &str, when: &DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}",
        mood.to_lowercase(),
        genre,
        when.format("%Y%m%d_%H%M%S")
    )
}

/// Format a float for an ffmpeg filter argument.
///
/// Fixed four decimals with trailing zeros trimmed, which keeps float noise
/// (`0.8000000000000001`) out of filter strings.
#[must_use]
pub(crate) fn filter_num(value: f64) -> String {
    let fixed = format!("{value:.4}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

// Error bodies can be large JSON blobs; keep only enough to diagnose
pub(crate) fn truncate_detail(detail: &str) -> String {
    const MAX: usize = 300;
    if detail.len() > MAX {
        let mut end = MAX;
        while !detail.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &detail[..end])
    } else {
        detail.to_string()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_under_an_hour_omit_hours() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(5), "0:05");
        assert_eq!(format_timestamp(59), "0:59");
        assert_eq!(format_timestamp(60), "1:00");
        assert_eq!(format_timestamp(245), "4:05");
        assert_eq!(format_timestamp(3599), "59:59");
    }

    #[test]
    fn timestamps_over_an_hour_pad_minutes_and_seconds() {
        assert_eq!(format_timestamp(3600), "1:00:00");
        assert_eq!(format_timestamp(3725), "1:02:05");
        assert_eq!(format_timestamp(7322), "2:02:02");
        assert_eq!(format_timestamp(36_001), "10:00:01");
    }

    #[test]
    fn sanitize_replaces_spaces_and_drops_punctuation() {
        assert_eq!(sanitize_title("Neon Highway Drive"), "Neon_Highway_Drive");
        assert_eq!(sanitize_title("Ghost: Sector/7"), "Ghost_Sector_7");
        assert_eq!(sanitize_title("Signal (Reprise)"), "Signal_Reprise");
        assert_eq!(sanitize_title("already_safe-01"), "already_safe-01");
    }

    #[test]
    fn sanitize_collapses_separator_runs() {
        assert_eq!(sanitize_title("Night  Drive"), "Night_Drive");
        assert_eq!(sanitize_title("A: B / C"), "A_B_C");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_title(""), "untitled");
        assert_eq!(sanitize_title("???"), "untitled");
        assert_eq!(sanitize_title("   "), "untitled");
    }

    #[test]
    fn track_filenames_number_from_one() {
        assert_eq!(track_filename(0, "Neon Highway Drive"), "01_Neon_Highway_Drive.mp3");
        assert_eq!(track_filename(9, "Void Sector Pulse"), "10_Void_Sector_Pulse.mp3");
    }

    #[test]
    fn run_dir_name_combines_mood_genre_and_timestamp() {
        let when = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            run_dir_name("FOCUS", "dark_synthwave", &when),
            "focus_dark_synthwave_20260314_092653"
        );
    }

    #[test]
    fn filter_numbers_are_trimmed() {
        assert_eq!(filter_num(180.0), "180");
        assert_eq!(filter_num(-2.0), "-2");
        assert_eq!(filter_num(2.5), "2.5");
        assert_eq!(filter_num(0.08 * 10.0), "0.8");
        assert_eq!(filter_num(0.0), "0");
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(1000);
        let truncated = truncate_detail(&long);
        assert!(truncated.chars().count() <= 301);
        assert!(truncated.ends_with('…'));

        assert_eq!(truncate_detail("short"), "short");
    }
}

//! Conversion between `HH:MM:SS,mmm` timecodes and seconds offsets.

/// Seconds offset on the media timeline.
pub type Seconds = f64;

/// Canonical zero timecode, also the fallback for unrepresentable offsets.
pub const ZERO_TIMECODE: &str = "00:00:00,000";

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Outcome of a lenient timecode parse.
///
/// Parsing never fails: malformed text yields [`TimecodeParse::Defaulted`],
/// which reads as offset zero. Callers that care can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimecodeParse {
    Parsed(Seconds),
    Defaulted,
}

impl TimecodeParse {
    /// Best-effort offset in seconds.
    pub fn seconds(self) -> Seconds {
        match self {
            Self::Parsed(seconds) => seconds,
            Self::Defaulted => 0.0,
        }
    }

    /// Returns true when the text was a well-formed four-component timecode.
    pub fn is_clean(self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Parses `HH:MM:SS,mmm` into seconds.
///
/// The text must split on `:` and `,` into exactly four non-negative integer
/// components. Component ranges are not checked, so `00:99:99,999` is accepted
/// arithmetically.
///
/// # Example
/// ```
/// use engine::time::{TimecodeParse, parse_timecode};
///
/// assert_eq!(parse_timecode("00:01:02,500"), TimecodeParse::Parsed(62.5));
/// assert_eq!(parse_timecode("garbage"), TimecodeParse::Defaulted);
/// ```
pub fn parse_timecode(text: &str) -> TimecodeParse {
    if text.trim().is_empty() {
        return TimecodeParse::Defaulted;
    }

    let parts: Vec<&str> = text.split([':', ',']).collect();
    let [hours, minutes, seconds, millis] = parts.as_slice() else {
        return TimecodeParse::Defaulted;
    };

    let components = (
        parse_component(hours),
        parse_component(minutes),
        parse_component(seconds),
        parse_component(millis),
    );
    let (Some(hours), Some(minutes), Some(seconds), Some(millis)) = components else {
        return TimecodeParse::Defaulted;
    };

    TimecodeParse::Parsed(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}

/// Lossy shorthand for `parse_timecode(text).seconds()`.
pub fn timecode_to_seconds(text: &str) -> Seconds {
    parse_timecode(text).seconds()
}

/// Formats seconds as `HH:MM:SS,mmm`.
///
/// NaN, negative and infinite offsets format as [`ZERO_TIMECODE`]. The offset
/// is rounded to the nearest millisecond before it is split into fields, so a
/// value such as `1.9996` carries into the seconds field instead of producing
/// a four-digit millisecond field.
///
/// # Example
/// ```
/// use engine::time::format_timecode;
///
/// assert_eq!(format_timecode(3_725.25), "01:02:05,250");
/// assert_eq!(format_timecode(1.9996), "00:00:02,000");
/// assert_eq!(format_timecode(f64::NAN), "00:00:00,000");
/// ```
pub fn format_timecode(seconds: Seconds) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return ZERO_TIMECODE.to_string();
    }

    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / MILLIS_PER_HOUR;
    let minutes = (total_ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let secs = (total_ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    let millis = total_ms % MILLIS_PER_SECOND;

    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

fn parse_component(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u64>().ok().map(|value| value as f64)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{TimecodeParse, ZERO_TIMECODE, format_timecode, parse_timecode};

    #[test]
    fn parse_accepts_out_of_range_fields_arithmetically() {
        let parsed = parse_timecode("00:99:99,999").seconds();
        assert!((parsed - (99.0 * 60.0 + 99.999)).abs() < 1e-9);
    }

    #[test]
    fn parse_defaults_on_wrong_component_count() {
        assert_eq!(parse_timecode(""), TimecodeParse::Defaulted);
        assert_eq!(parse_timecode("00:00:01"), TimecodeParse::Defaulted);
        assert_eq!(parse_timecode("00:00:00:01,000"), TimecodeParse::Defaulted);
        assert_eq!(parse_timecode("00:00:01.000"), TimecodeParse::Defaulted);
    }

    #[test]
    fn parse_defaults_on_non_numeric_component() {
        let parsed = parse_timecode("00:aa:01,000");
        assert!(!parsed.is_clean());
        assert_eq!(parsed.seconds(), 0.0);
    }

    #[test]
    fn parse_tolerates_padding_around_components() {
        assert_eq!(parse_timecode(" 00:00:02,500 "), TimecodeParse::Parsed(2.5));
    }

    #[test]
    fn format_rejects_negative_and_nan() {
        assert_eq!(format_timecode(-1.0), ZERO_TIMECODE);
        assert_eq!(format_timecode(f64::NAN), ZERO_TIMECODE);
        assert_eq!(format_timecode(f64::INFINITY), ZERO_TIMECODE);
    }

    #[test]
    fn format_carries_millisecond_rollover() {
        assert_eq!(format_timecode(59.9999), "00:01:00,000");
        assert_eq!(format_timecode(3_599.9996), "01:00:00,000");
    }

    #[test]
    fn format_keeps_hours_beyond_two_digits() {
        assert_eq!(format_timecode(360_000.0), "100:00:00,000");
    }

    proptest! {
        #[test]
        fn formatted_offsets_parse_back_within_one_millisecond(offset in 0.0..1e7f64) {
            let recovered = parse_timecode(&format_timecode(offset)).seconds();
            prop_assert!(
                (recovered - offset).abs() <= 0.001,
                "{} came back as {}",
                offset,
                recovered
            );
        }

        #[test]
        fn formatted_timecodes_always_parse_clean(offset in proptest::num::f64::ANY) {
            prop_assert!(parse_timecode(&format_timecode(offset)).is_clean());
        }
    }
}

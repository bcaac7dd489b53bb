//! Race-time text codec.
//!
//! Accepts `M:SS.hh` or `SS.hh`; minutes and hundredths are optional. The
//! fractional part is read as a decimal fraction of a second, so `5.3` is
//! five seconds and thirty hundredths. Formatting always zero-pads seconds
//! and hundredths and omits the minutes segment when it is zero.

use crate::error::{CoreError, Result};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;
const MS_PER_HUNDREDTH: i64 = 10;

pub fn parse_time(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let invalid = || CoreError::InvalidFormat(text.to_string());

    let (minutes, rest) = match trimmed.split_once(':') {
        Some((minutes, rest)) => (Some(parse_segment(minutes).ok_or_else(invalid)?), rest),
        None => (None, trimmed),
    };

    let (seconds, fraction) = match rest.split_once('.') {
        Some((seconds, fraction)) => (seconds, Some(fraction)),
        None => (rest, None),
    };

    let seconds = parse_segment(seconds).ok_or_else(invalid)?;
    if minutes.is_some() && seconds >= 60 {
        return Err(invalid());
    }

    let hundredths = match fraction {
        None => 0,
        Some(digits) if (1..=2).contains(&digits.len()) => {
            let value = parse_segment(digits).ok_or_else(invalid)?;
            if digits.len() == 1 { value * 10 } else { value }
        }
        Some(_) => return Err(invalid()),
    };

    Ok(minutes.unwrap_or(0) * MS_PER_MINUTE + seconds * MS_PER_SECOND + hundredths * MS_PER_HUNDREDTH)
}

fn parse_segment(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Formats milliseconds as race-time text. Sub-hundredth remainders are
/// truncated.
pub fn format_time(time_ms: i64) -> Result<String> {
    if time_ms < 0 {
        return Err(CoreError::InvalidValue(time_ms));
    }

    let minutes = time_ms / MS_PER_MINUTE;
    let seconds = (time_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let hundredths = (time_ms % MS_PER_SECOND) / MS_PER_HUNDREDTH;

    if minutes > 0 {
        Ok(format!("{}:{:02}.{:02}", minutes, seconds, hundredths))
    } else {
        Ok(format!("{:02}.{:02}", seconds, hundredths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_with_minutes() {
        assert_eq!(parse_time("1:02.45").unwrap(), 62_450);
        assert_eq!(parse_time("12:00.00").unwrap(), 720_000);
        assert_eq!(parse_time(" 2:27.75 ").unwrap(), 147_750);
    }

    #[test]
    fn test_parse_without_minutes() {
        assert_eq!(parse_time("31.20").unwrap(), 31_200);
        assert_eq!(parse_time("31").unwrap(), 31_000);
        assert_eq!(parse_time("5.3").unwrap(), 5_300);
        assert_eq!(parse_time("75.00").unwrap(), 75_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "abc", "1:xx.00", "1:2:3", "31.", ".45", "31.456", "-1.00", "1:60.00", "3 1.00"] {
            assert!(
                matches!(parse_time(text), Err(CoreError::InvalidFormat(_))),
                "expected InvalidFormat for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_format_suppresses_zero_minutes() {
        assert_eq!(format_time(31_200).unwrap(), "31.20");
        assert_eq!(format_time(5_300).unwrap(), "05.30");
        assert_eq!(format_time(62_450).unwrap(), "1:02.45");
        assert_eq!(format_time(0).unwrap(), "00.00");
    }

    #[test]
    fn test_format_truncates_sub_hundredths() {
        assert_eq!(format_time(31_119).unwrap(), "31.11");
    }

    #[test]
    fn test_format_rejects_negative() {
        assert!(matches!(format_time(-10), Err(CoreError::InvalidValue(-10))));
    }

    #[test]
    fn test_non_canonical_input_formats_canonically() {
        let ms = parse_time("5.3").unwrap();
        assert_eq!(format_time(ms).unwrap(), "05.30");
    }

    proptest! {
        #[test]
        fn prop_canonical_text_round_trips(m in 0i64..60, s in 0i64..60, h in 0i64..100) {
            let text = if m > 0 {
                format!("{}:{:02}.{:02}", m, s, h)
            } else {
                format!("{:02}.{:02}", s, h)
            };
            prop_assert_eq!(format_time(parse_time(&text).unwrap()).unwrap(), text);
        }

        #[test]
        fn prop_hundredth_values_round_trip(hundredths in 0i64..600_000) {
            let ms = hundredths * 10;
            prop_assert_eq!(parse_time(&format_time(ms).unwrap()).unwrap(), ms);
        }
    }
}

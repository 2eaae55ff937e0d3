use once_cell::sync::Lazy;
use regex::Regex;

static MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)m").expect("minutes pattern"));
static SECONDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)s").expect("seconds pattern"));
static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").expect("digit pattern"));

/// A duration cell before interpretation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationValue<'a> {
    Missing,
    Seconds(f64),
    Text(&'a str),
}

impl<'a> From<Option<&'a str>> for DurationValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => DurationValue::Missing,
            Some(text) => DurationValue::Text(text),
        }
    }
}

/// Interpret a duration as seconds.
///
/// Accepts `"14m 30s"`, `"5m"` and plain numbers. Anything unreadable is
/// `None`; this never fails, since the aggregator's filter treats null as invalid.
pub fn parse_duration(value: DurationValue<'_>) -> Option<f64> {
    match value {
        DurationValue::Missing => None,
        DurationValue::Seconds(seconds) if seconds.is_nan() => None,
        DurationValue::Seconds(seconds) => Some(seconds),
        DurationValue::Text(text) => parse_duration_text(text),
    }
}

/// Convenience for a raw CSV cell
pub fn parse_duration_field(value: Option<&str>) -> Option<f64> {
    parse_duration(DurationValue::from(value))
}

fn parse_duration_text(text: &str) -> Option<f64> {
    if text.contains('m') && text.contains('s') {
        let minutes = capture_number(&MINUTES, text);
        let seconds = capture_number(&SECONDS, text);
        return Some(minutes * 60.0 + seconds);
    }

    if text.contains('m') {
        return Some(capture_number(&MINUTES, text) * 60.0);
    }

    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// First captured run of decimal digits in any script, 0 when absent
fn capture_number(pattern: &Regex, text: &str) -> f64 {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .chars()
                .filter_map(digit_value)
                .fold(0.0, |acc, d| acc * 10.0 + f64::from(d))
        })
        .unwrap_or(0.0)
}

/// Value of a Unicode decimal digit.
///
/// Non-ASCII digits are encoded in contiguous ascending runs of ten, so the
/// value is the offset from the start of the run modulo 10.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

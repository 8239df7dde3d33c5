//! Cumulative CPU time strings as printed by `ps` (`[DD-][[HH:]MM:]SS[.ff]`)

use crate::error::ParseError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Sum a colon-delimited time string into seconds.
///
/// The rightmost segment is seconds and may be fractional; every segment to
/// its left is worth 60 times the one after it, so any number of segments is
/// accepted. An optional `<days>-` prefix is added on top.
pub fn parse_cpu_time(input: &str) -> Result<f64, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyTime);
    }

    let (days, clock) = match trimmed.split_once('-') {
        Some((prefix, rest)) => {
            let days: u64 = prefix.parse().map_err(|_| ParseError::DayPrefix {
                input: trimmed.to_string(),
                prefix: prefix.to_string(),
            })?;
            (days as f64, rest)
        }
        None => (0.0, trimmed),
    };

    let mut total = days * SECONDS_PER_DAY;
    let mut weight = 1.0;
    for segment in clock.rsplit(':') {
        total += parse_segment(trimmed, segment)? * weight;
        weight *= 60.0;
    }
    if !total.is_finite() {
        return Err(ParseError::TimeOverflow(trimmed.to_string()));
    }
    Ok(total)
}

fn parse_segment(input: &str, segment: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::TimeSegment {
        input: input.to_string(),
        segment: segment.to_string(),
    };
    // f64::from_str accepts "inf", "nan" and signs; none of those are clock digits
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }
    segment.parse::<f64>().map_err(|_| invalid())
}

//! Duration parsing for recipe times.
//!
//! Accepts ISO 8601 durations (`PT1H30M`) as found in JSON-LD as well as the
//! loose phrasing of hand-written recipes (`"50-55 minutes"`, `"~20 min"`).
//! Everything resolves to whole minutes.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_8601: Regex = Regex::new(
        r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$"
    )
    .expect("ISO 8601 pattern should be valid");
    static ref FILLER: Regex =
        Regex::new(r"(?i)\b(?:about|approximately|approx\.?|roughly)\b|[~≈]")
            .expect("filler pattern should be valid");
    static ref RANGE: Regex =
        Regex::new(r"(\d+)\s*(?:-|–|to)\s*(\d+)").expect("range pattern should be valid");
    static ref HOURS: Regex =
        Regex::new(r"(\d+)\s*(?:hours?|hrs?|h)").expect("hours pattern should be valid");
    static ref MINUTES: Regex =
        Regex::new(r"(\d+)\s*(?:minutes?|mins?|m)").expect("minutes pattern should be valid");
}

/// Parses a duration into whole minutes.
///
/// Returns `None` when nothing parses or the total is zero; a zero duration
/// is treated as missing, never as "instant".
pub fn parse_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let minutes = parse_iso_8601(text).unwrap_or_else(|| parse_natural(text));
    if minutes > 0 {
        Some(minutes)
    } else {
        None
    }
}

fn parse_iso_8601(text: &str) -> Option<u32> {
    let caps = ISO_8601.captures(text)?;
    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let total = part(1) * 24.0 * 60.0 + part(2) * 60.0 + part(3) + part(4) / 60.0;
    Some(total.round() as u32)
}

fn parse_natural(text: &str) -> u32 {
    let lower = text.to_lowercase();
    let clean = FILLER.replace_all(&lower, " ");

    if let Some(caps) = RANGE.captures(&clean) {
        if let (Ok(low), Ok(high)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            let mean = (f64::from(low) + f64::from(high)) / 2.0;
            let minutes = mean.round() as u32;
            // A range given in hours ("1-2 hours") still has to become minutes
            if HOURS.is_match(&clean) && !MINUTES.is_match(&clean) {
                return ((f64::from(low) + f64::from(high)) * 30.0).round() as u32;
            }
            return minutes;
        }
    }

    let total = sum_matches(&HOURS, &clean)
        .saturating_mul(60)
        .saturating_add(sum_matches(&MINUTES, &clean));
    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Sum of every number captured by `pattern`, saturating instead of
/// overflowing on absurd inputs.
fn sum_matches(pattern: &Regex, text: &str) -> u64 {
    pattern
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<u64>().ok())
        .fold(0u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_hours_and_minutes() {
        assert_eq!(parse_duration("PT1H30M"), Some(90));
        assert_eq!(parse_duration("PT45M"), Some(45));
        assert_eq!(parse_duration("pt2h"), Some(120));
    }

    #[test]
    fn test_iso_seconds_and_days() {
        assert_eq!(parse_duration("PT5400.0S"), Some(90));
        assert_eq!(parse_duration("P1DT2H"), Some(1560));
    }

    #[test]
    fn test_iso_zero_is_none() {
        assert_eq!(parse_duration("PT0M"), None);
        assert_eq!(parse_duration("PT"), None);
    }

    #[test]
    fn test_range_uses_rounded_mean() {
        assert_eq!(parse_duration("50-55 minutes"), Some(53));
        assert_eq!(parse_duration("10 – 15 min"), Some(13));
        assert_eq!(parse_duration("1-2 hours"), Some(90));
    }

    #[test]
    fn test_natural_language() {
        assert_eq!(parse_duration("~20 min"), Some(20));
        assert_eq!(parse_duration("about 1 hour"), Some(60));
        assert_eq!(parse_duration("1 hr 15 mins"), Some(75));
        assert_eq!(parse_duration("roughly 2 hours"), Some(120));
        assert_eq!(parse_duration("1h30m"), Some(90));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_duration("garnish only"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("0 minutes"), None);
    }

    #[test]
    fn test_huge_values_saturate() {
        assert_eq!(parse_duration("99999999 hours"), Some(u32::MAX));
        assert_eq!(parse_duration("99999999999999999999999 minutes"), None);
        assert_eq!(parse_duration("4294967295 hours 10 min"), Some(u32::MAX));
        assert_eq!(parse_duration("PT99999999999H"), Some(u32::MAX));
    }
}

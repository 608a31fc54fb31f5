// Parsing and number helpers.
//
// Dataset cells arrive as optional text; everything here turns them into
// typed values or a short message the loader can attach to a row error.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Trim a cell and treat blank as absent.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Parse an optional non-negative quantity.
///
/// - Blank or missing cells are `Ok(None)`; absence is a normal state.
/// - Thousands separators like `","` are stripped before parsing.
/// - Text, NaN, infinities and negative values are rejected.
pub fn parse_optional_f64(s: Option<&str>) -> Result<Option<f64>, String> {
    let Some(s) = non_blank(s) else {
        return Ok(None);
    };
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(format!("'{}' is not a number", s));
    }
    let v: f64 = s
        .replace(',', "")
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !v.is_finite() {
        return Err(format!("'{}' is not a finite number", s));
    }
    if v < 0.0 {
        return Err(format!("{} is negative", s));
    }
    Ok(Some(v))
}

/// Parse an optional non-negative head count. Whole-valued decimals such as
/// `300.0` are accepted since spreadsheet exports often write them that way.
pub fn parse_optional_count(s: Option<&str>) -> Result<Option<u32>, String> {
    let Some(v) = parse_optional_f64(s)? else {
        return Ok(None);
    };
    if v.fract() != 0.0 || v > u32::MAX as f64 {
        return Err(format!("{} is not a whole count", v));
    }
    Ok(Some(v as u32))
}

pub fn days_diff(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// `count / total * 100`, or 0 for an empty total.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Mean of the present values; `None` when nothing is present.
pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

/// `n` rounded to `decimals` places with `en` thousands separators,
/// e.g. `1,234,567.89`. Values that round to zero carry no sign.
pub fn format_number(n: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, n.abs());
    let (whole, frac) = match fixed.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = match whole.parse::<u64>() {
        Ok(w) => w.to_formatted_string(&Locale::en),
        Err(_) => whole.to_string(),
    };
    let sign = if n < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };
    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Counts and other integers with `en` thousands separators.
pub fn format_int(n: impl ToFormattedString) -> String {
    n.to_formatted_string(&Locale::en)
}

pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p)
}

/// Empty string for an absent value, the number otherwise.
pub fn format_optional(v: Option<f64>, decimals: usize) -> String {
    v.map(|v| format_number(v, decimals)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_f64_blank_is_absent() {
        assert_eq!(parse_optional_f64(None), Ok(None));
        assert_eq!(parse_optional_f64(Some("   ")), Ok(None));
    }

    #[test]
    fn test_parse_optional_f64_strips_separators() {
        assert_eq!(parse_optional_f64(Some(" 1,200 ")), Ok(Some(1200.0)));
        assert_eq!(parse_optional_f64(Some("16.5")), Ok(Some(16.5)));
    }

    #[test]
    fn test_parse_optional_f64_rejects_bad_values() {
        assert!(parse_optional_f64(Some("-5")).is_err());
        assert!(parse_optional_f64(Some("TBD")).is_err());
        assert!(parse_optional_f64(Some("NaN")).is_err());
        assert!(parse_optional_f64(Some("1..2")).is_err());
    }

    #[test]
    fn test_parse_optional_count() {
        assert_eq!(parse_optional_count(Some("300.0")), Ok(Some(300)));
        assert_eq!(parse_optional_count(Some("")), Ok(None));
        assert!(parse_optional_count(Some("12.5")).is_err());
    }

    #[test]
    fn test_percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert!((percentage(1, 3) - 33.333_333_333).abs() < 1e-6);
    }

    #[test]
    fn test_mean_present_skips_absent() {
        assert_eq!(mean_present(vec![Some(2.0), None, Some(4.0)]), Some(3.0));
        assert_eq!(mean_present(vec![None, None]), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(3000.0, 0), "3,000");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(0.0, 1), "0.0");
        assert_eq!(format_number(-0.004, 2), "0.00");
        assert_eq!(format_number(12_345_678_901.5, 1), "12,345,678,901.5");
        assert_eq!(format_int(1_800u64), "1,800");
    }

    #[test]
    fn test_days_diff() {
        let a = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(days_diff(a, b), 61);
    }
}

/// Round `value` to `decimals` places, resolving exact midpoints to the even
/// neighbour.
///
/// Midpoints are judged on the binary value, so `0.125` (exactly
/// representable) rounds down to `0.12` while `2.675` (stored slightly
/// below the midpoint) rounds to `2.67`.
///
/// # Examples
///
/// ```
/// use wrapped_core::formatting::round_half_even;
///
/// assert_eq!(round_half_even(0.125, 2), 0.12);
/// assert_eq!(round_half_even(0.375, 2), 0.38);
/// assert_eq!(round_half_even(1.0 / 3.0, 2), 0.33);
/// ```
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Convert a minute count into hours rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use wrapped_core::formatting::minutes_to_hours;
///
/// assert_eq!(minutes_to_hours(90), 1.5);
/// assert_eq!(minutes_to_hours(100), 1.67);
/// assert_eq!(minutes_to_hours(0), 0.0);
/// ```
pub fn minutes_to_hours(minutes: u64) -> f64 {
    round_half_even(minutes as f64 / 60.0, 2)
}

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use wrapped_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    let factor = 10_f64.powi(decimals as i32);
    let rounded = (abs_value * factor).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", rounded - rounded.trunc(), prec = decimals as usize);
        // `frac_str` is "0.xx"; keep ".xx".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an hour figure for report sentences: two decimals, trailing zeros
/// dropped.
///
/// # Examples
///
/// ```
/// use wrapped_core::formatting::format_hours;
///
/// assert_eq!(format_hours(2.0), "2");
/// assert_eq!(format_hours(2.5), "2.5");
/// assert_eq!(format_hours(1234.25), "1,234.25");
/// ```
pub fn format_hours(hours: f64) -> String {
    let formatted = format_number(hours, 2);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Join items into an English list: `"A"`, `"A and B"`, `"A, B, and C"`.
///
/// # Examples
///
/// ```
/// use wrapped_core::formatting::join_list;
///
/// assert_eq!(join_list(&["Alpha"]), "Alpha");
/// assert_eq!(join_list(&["Alpha", "Beta"]), "Alpha and Beta");
/// assert_eq!(join_list(&["Alpha", "Beta", "Gamma"]), "Alpha, Beta, and Gamma");
/// ```
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use wrapped_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_half_even((part / whole) * 100.0, decimal_places)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── round_half_even ──────────────────────────────────────────────────────

    #[test]
    fn test_round_half_even_midpoints() {
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.625, 2), 0.62);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
    }

    #[test]
    fn test_round_half_even_non_midpoint() {
        assert_eq!(round_half_even(0.126, 2), 0.13);
        assert_eq!(round_half_even(41.666_666, 2), 41.67);
    }

    #[test]
    fn test_total_days_matches_floor_then_round() {
        for minutes in [0u64, 59, 60, 180, 1_439, 1_440, 10_000, 123_457] {
            let hours = minutes / 60;
            let days = round_half_even(hours as f64 / 24.0, 2);
            assert!((days - (hours as f64 / 24.0)).abs() <= 0.005 + 1e-9);
        }
    }

    // ── minutes_to_hours ─────────────────────────────────────────────────────

    #[test]
    fn test_minutes_to_hours_whole() {
        assert_eq!(minutes_to_hours(60), 1.0);
        assert_eq!(minutes_to_hours(120), 2.0);
    }

    #[test]
    fn test_minutes_to_hours_fraction() {
        assert_eq!(minutes_to_hours(45), 0.75);
        assert_eq!(minutes_to_hours(50), 0.83);
    }

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_000.0, 0), "1,000");
        assert_eq!(format_number(999.0, 0), "999");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    // ── format_hours ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_hours_trims_zeros() {
        assert_eq!(format_hours(0.0), "0");
        assert_eq!(format_hours(12.1), "12.1");
        assert_eq!(format_hours(12.34), "12.34");
    }

    #[test]
    fn test_format_hours_keeps_integer_zeros() {
        assert_eq!(format_hours(10.0), "10");
        assert_eq!(format_hours(1_000.0), "1,000");
    }

    // ── join_list ────────────────────────────────────────────────────────────

    #[test]
    fn test_join_list_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(join_list(&empty), "");
    }

    #[test]
    fn test_join_list_owned_strings() {
        let items = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];
        assert_eq!(join_list(&items), "A, B, C, and D");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1.0, 3.0, 2);
        assert!((p - 33.33).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
    }
}

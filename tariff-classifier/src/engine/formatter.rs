//! Code Formatter
//!
//! Converts raw digit strings into the canonical dotted presentation:
//!
//! | Digits | Output         |
//! |--------|----------------|
//! | 4      | `XX.XX`        |
//! | 6-7    | `XXXX.XX`      |
//! | 8+     | `XXXX.XX.XX`   |
//! | other  | zero-padded to 6, then `XXXX.XX` |
//!
//! Formatting is total and idempotent: re-formatting the digits of a
//! formatted code yields the same string.

/// Strip everything but ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a raw code into canonical dotted form
pub fn format_code(raw: &str) -> String {
    let digits = digits_only(raw);

    match digits.len() {
        4 => format!("{}.{}", &digits[..2], &digits[2..4]),
        6 | 7 => format!("{}.{}", &digits[..4], &digits[4..6]),
        n if n >= 8 => format!("{}.{}.{}", &digits[..4], &digits[4..6], &digits[6..8]),
        _ => {
            let padded = format!("{:0>6}", digits);
            format!("{}.{}", &padded[..4], &padded[4..6])
        }
    }
}

/// Four-digit heading of a code as a number, e.g. "8413.70" → 8413
///
/// Returns `None` when the code has fewer than four digits.
pub fn heading_number(code: &str) -> Option<u32> {
    let digits = digits_only(code);
    digits.get(..4)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_digit_heading() {
        assert_eq!(format_code("8413"), "84.13");
    }

    #[test]
    fn test_six_and_seven_digits() {
        assert_eq!(format_code("841370"), "8413.70");
        assert_eq!(format_code("8413701"), "8413.70");
    }

    #[test]
    fn test_eight_and_ten_digits() {
        assert_eq!(format_code("84137010"), "8413.70.10");
        assert_eq!(format_code("8413701090"), "8413.70.10");
    }

    #[test]
    fn test_dotted_input_is_normalized() {
        assert_eq!(format_code("8413.70"), "8413.70");
        assert_eq!(format_code("HS 8413-70-10"), "8413.70.10");
    }

    #[test]
    fn test_short_codes_are_padded() {
        assert_eq!(format_code(""), "0000.00");
        assert_eq!(format_code("12"), "0000.12");
        assert_eq!(format_code("12345"), "0123.45");
    }

    #[test]
    fn test_idempotent_on_awkward_lengths() {
        for raw in ["", "1", "123", "12345", "8413", "841370", "8413701", "8413701090"] {
            let once = format_code(raw);
            assert_eq!(format_code(&digits_only(&once)), once, "raw={}", raw);
        }
    }

    #[test]
    fn test_heading_number() {
        assert_eq!(heading_number("8413.70"), Some(8413));
        assert_eq!(heading_number("0101"), Some(101));
        assert_eq!(heading_number("84"), None);
    }
}

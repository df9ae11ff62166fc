//! Masked `DD/MM/YYYY` date entry.
//!
//! The form keeps only the typed digits; the mask is a rendering concern and the
//! calendar check happens once, at submit time.

use chrono::NaiveDate;

use crate::error::ValidationError;

pub const DATE_DIGITS: usize = 8;
const MASK_CHAR: char = '_';

/// Keeps the digits of `raw`, capped at the template length.
pub fn filter_digits(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(DATE_DIGITS)
        .collect()
}

/// Renders stored digits against the `##/##/####` pattern, `_` for unfilled slots.
pub fn masked(digits: &str) -> String {
    let mut digits = digits.chars().filter(char::is_ascii_digit);
    let mut out = String::with_capacity(DATE_DIGITS + 2);
    for position in 0..DATE_DIGITS {
        if position == 2 || position == 4 {
            out.push('/');
        }
        out.push(digits.next().unwrap_or(MASK_CHAR));
    }
    out
}

/// Interprets `raw` as `DDMMYYYY` after dropping every non-digit character.
pub fn parse_ddmmyyyy(raw: &str) -> Result<NaiveDate, ValidationError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != DATE_DIGITS {
        return Err(ValidationError::DateLength {
            digits: digits.len(),
        });
    }

    // ASCII digits only, so byte slicing is on char boundaries.
    let day: u32 = parse_component(&digits[0..2]);
    let month: u32 = parse_component(&digits[2..4]);
    let year: i32 = parse_component(&digits[4..8]);

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ValidationError::DateValue { day, month, year })
}

fn parse_component<T: std::str::FromStr + Default>(digits: &str) -> T {
    digits.parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystrokes_keep_at_most_eight_digits() {
        assert_eq!(filter_digits("25/12/2024"), "25122024");
        assert_eq!(filter_digits("2a5-1"), "251");
        assert_eq!(filter_digits("251220241999"), "25122024");
    }

    #[test]
    fn mask_fills_unfilled_positions() {
        assert_eq!(masked(""), "__/__/____");
        assert_eq!(masked("251"), "25/1_/____");
        assert_eq!(masked("25122024"), "25/12/2024");
    }

    #[test]
    fn parses_valid_calendar_date() {
        assert_eq!(
            parse_ddmmyyyy("25122024"),
            Ok(NaiveDate::from_ymd_opt(2024, 12, 25).expect("date"))
        );
        assert_eq!(
            parse_ddmmyyyy("29/02/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).expect("date"))
        );
    }

    #[test]
    fn wrong_length_is_rejected_before_calendar_check() {
        assert_eq!(
            parse_ddmmyyyy("2512202"),
            Err(ValidationError::DateLength { digits: 7 })
        );
        assert_eq!(parse_ddmmyyyy(""), Err(ValidationError::DateLength { digits: 0 }));
    }

    #[test]
    fn impossible_dates_are_rejected() {
        for raw in ["99992024", "31042024", "29022023", "00012024", "01132024"] {
            assert!(
                matches!(parse_ddmmyyyy(raw), Err(ValidationError::DateValue { .. })),
                "{raw} should be rejected"
            );
        }
    }
}

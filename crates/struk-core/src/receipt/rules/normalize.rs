//! Locale-aware normalization of amounts and dates.

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::patterns::{DATE_DMY, DATE_MONTH_NAME, DATE_YMD};

/// Normalize a rupiah amount string to a whole-rupiah integer.
///
/// Both `.` and `,` appear as thousand separators on Indonesian
/// receipts, never as decimal markers, so all of them are stripped.
/// Returns `0` when the cleaned string does not parse; callers must
/// treat `0` as "not found", never as a real total.
pub fn normalize_amount(raw: &str) -> u64 {
    let cleaned: String = raw.chars().filter(|c| *c != '.' && *c != ',').collect();
    cleaned.parse().unwrap_or(0)
}

/// Surface forms a receipt date can take, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateForm {
    /// `DD/MM/YYYY`, `DD-MM-YY` and mixes thereof.
    DayFirst,
    /// `YYYY/MM/DD` or `YYYY-MM-DD`.
    YearFirst,
    /// `DD <IndonesianMonth> YYYY|YY`.
    MonthName,
}

impl DateForm {
    fn to_date(self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let (day, month, year) = match self {
            DateForm::DayFirst => (
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                expand_year(&caps[3])?,
            ),
            DateForm::YearFirst => (
                caps[3].parse().ok()?,
                caps[2].parse().ok()?,
                caps[1].parse().ok()?,
            ),
            DateForm::MonthName => (
                caps[1].parse().ok()?,
                month_to_number(&caps[2])?,
                expand_year(&caps[3])?,
            ),
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// The ordered `(form, pattern)` table. First matching form wins;
/// within a form, earlier matches win unless calendar-invalid.
pub fn date_patterns() -> [(DateForm, &'static Regex); 3] {
    [
        (DateForm::DayFirst, &DATE_DMY),
        (DateForm::YearFirst, &DATE_YMD),
        (DateForm::MonthName, &DATE_MONTH_NAME),
    ]
}

/// Find the first recognizable date anywhere in `raw`.
///
/// Tries the three surface forms in fixed order and returns the first
/// candidate that is a valid calendar date. Returns `None` when no
/// pattern matches; never guesses.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    for (form, pattern) in date_patterns() {
        for caps in pattern.captures_iter(raw) {
            if let Some(date) = form.to_date(&caps) {
                return Some(date);
            }
        }
    }
    None
}

/// Two-digit years are always expanded into the 2000s.
fn expand_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 { Some(2000 + year) } else { Some(year) }
}

fn month_to_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "mei" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "agu" => Some(8),
        "sep" => Some(9),
        "okt" => Some(10),
        "nov" => Some(11),
        "des" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_amount_strips_separators() {
        assert_eq!(normalize_amount("12.345"), 12345);
        assert_eq!(normalize_amount("12,345"), 12345);
        assert_eq!(normalize_amount("1.234.567"), 1234567);
        assert_eq!(normalize_amount("55000"), 55000);
    }

    #[test]
    fn test_normalize_amount_unparseable_is_zero() {
        assert_eq!(normalize_amount(""), 0);
        assert_eq!(normalize_amount("abc"), 0);
        assert_eq!(normalize_amount("Rp 500"), 0);
    }

    #[test]
    fn test_day_first_wins_over_iso() {
        // An ambiguous two-digit-year date must be read DD-MM-YY.
        assert_eq!(
            normalize_date("12/05/24"),
            NaiveDate::from_ymd_opt(2024, 5, 12)
        );
    }

    #[test]
    fn test_iso_date_passthrough() {
        assert_eq!(
            normalize_date("2024-05-12"),
            NaiveDate::from_ymd_opt(2024, 5, 12)
        );
        assert_eq!(
            normalize_date("2024/5/3"),
            NaiveDate::from_ymd_opt(2024, 5, 3)
        );
    }

    #[test]
    fn test_month_name_parsing() {
        assert_eq!(
            normalize_date("5 Mei 2024"),
            NaiveDate::from_ymd_opt(2024, 5, 5)
        );
        assert_eq!(
            normalize_date("03 Des 23"),
            NaiveDate::from_ymd_opt(2023, 12, 3)
        );
        // Full month names share the abbreviation prefix.
        assert_eq!(
            normalize_date("17 Agustus 2024"),
            NaiveDate::from_ymd_opt(2024, 8, 17)
        );
    }

    #[test]
    fn test_invalid_calendar_date_falls_through() {
        // 31/02 is impossible; the later valid date must win instead.
        assert_eq!(
            normalize_date("31/02/2024 dan 15/03/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_no_pattern_returns_none() {
        assert_eq!(normalize_date("tidak ada tanggal di sini"), None);
    }
}

//! Date resolution for the first line of an expense report.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:tgl|tanggal|date)[.:]?\s+)?(\d{1,2})\s+([a-z]+)\.?(?:\s+(\d{4}))?$")
        .expect("hardcoded regex should be valid")
});

/// Numeric formats tried after the day + month-name form.
const NUMERIC_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Resolves a date line relative to `reference`.
///
/// Accepts `20 jan`, `20 januari 2025`, `tgl 3 agu`, `2025-01-20` and `20/01/2025`.
/// A date without a year takes the reference year, or the year before when
/// that would put it after the reference date.
pub(crate) fn resolve_date(line: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let normalized = line.trim().trim_end_matches([':', ',']).trim().to_lowercase();

    if let Some(caps) = DAY_MONTH.captures(&normalized) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        return match caps.get(3) {
            Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day),
            None => without_year(day, month, reference),
        };
    }

    NUMERIC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
}

fn without_year(day: u32, month: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(reference.year(), month, day)?;
    if date > reference {
        NaiveDate::from_ymd_opt(reference.year() - 1, month, day)
    } else {
        Some(date)
    }
}

/// Maps Indonesian and English month names and abbreviations to 1..=12.
fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "jan" | "januari" | "january" => 1,
        "feb" | "peb" | "februari" | "february" => 2,
        "mar" | "maret" | "march" => 3,
        "apr" | "april" => 4,
        "mei" | "may" => 5,
        "jun" | "juni" | "june" => 6,
        "jul" | "juli" | "july" => 7,
        "agu" | "agt" | "ags" | "aug" | "agustus" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "okt" | "oct" | "oktober" | "october" => 10,
        "nov" | "nop" | "november" => 11,
        "des" | "dec" | "desember" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("20 jan", ymd(2026, 1, 20))]
    #[case("20 Jan", ymd(2026, 1, 20))]
    #[case("  3 agu  ", ymd(2026, 8, 3))]
    #[case("tgl 5 mei", ymd(2026, 5, 5))]
    #[case("Tanggal 12 Oktober:", ymd(2026, 10, 12))]
    #[case("20 januari 2025", ymd(2025, 1, 20))]
    #[case("1 des 2024", ymd(2024, 12, 1))]
    #[case("2025-01-20", ymd(2025, 1, 20))]
    #[case("20/01/2025", ymd(2025, 1, 20))]
    #[case("20-01-2025", ymd(2025, 1, 20))]
    fn test_resolves_supported_forms(#[case] line: &str, #[case] expected: NaiveDate) {
        assert_eq!(resolve_date(line, reference()), Some(expected));
    }

    #[test]
    fn test_future_date_without_year_rolls_back() {
        assert_eq!(resolve_date("25 des", reference()), Some(ymd(2025, 12, 25)));
        assert_eq!(resolve_date("19 okt", reference()), Some(ymd(2026, 10, 19)));
        assert_eq!(resolve_date("20 okt", reference()), Some(ymd(2025, 10, 20)));
    }

    #[rstest]
    #[case("")]
    #[case("cabe merah 5kg 500k")]
    #[case("32 jan")]
    #[case("20 foo")]
    #[case("31 feb 2025")]
    #[case("2025-13-01")]
    fn test_rejects_non_dates(#[case] line: &str) {
        assert_eq!(resolve_date(line, reference()), None);
    }
}

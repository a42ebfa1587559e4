use chrono::NaiveDate;

use crate::util::text::ParseError;

/// 摘要頁上的日期，例如 `05/17/18`
pub const SHORT_DATE_PATTERN: &str = "%m/%d/%y";
/// 股利歷史表上的日期，例如 `Nov 17, 1987`
pub const LONG_DATE_PATTERN: &str = "%b %d, %Y";

/// Parses a snapshot date written as `MM/DD/YY`.
///
/// Two-digit years follow chrono's pivot: `00`-`68` are 20xx, `69`-`99` are 19xx.
pub fn parse_short_date(s: &str) -> Result<NaiveDate, ParseError> {
    parse_with(s, SHORT_DATE_PATTERN)
}

/// Parses a history row date written as `Mon DD, YYYY`.
pub fn parse_long_date(s: &str) -> Result<NaiveDate, ParseError> {
    parse_with(s, LONG_DATE_PATTERN)
}

fn parse_with(s: &str, pattern: &'static str) -> Result<NaiveDate, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    NaiveDate::parse_from_str(trimmed, pattern).map_err(|_| ParseError::Date {
        text: trimmed.to_string(),
        pattern,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_date() {
        assert_eq!(
            parse_short_date("05/17/18").unwrap(),
            NaiveDate::from_ymd_opt(2018, 5, 17).unwrap()
        );
        assert_eq!(
            parse_short_date(" 12/01/99 ").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_long_date() {
        assert_eq!(
            parse_long_date("Nov 17, 1987").unwrap(),
            NaiveDate::from_ymd_opt(1987, 11, 17).unwrap()
        );
        assert_eq!(
            parse_long_date("Feb 09, 2018").unwrap(),
            NaiveDate::from_ymd_opt(2018, 2, 9).unwrap()
        );
    }

    #[test]
    fn test_patterns_are_not_interchangeable() {
        assert!(matches!(
            parse_short_date("Nov 17, 1987"),
            Err(ParseError::Date { pattern: SHORT_DATE_PATTERN, .. })
        ));
        assert!(matches!(
            parse_long_date("05/17/18"),
            Err(ParseError::Date { pattern: LONG_DATE_PATTERN, .. })
        ));
        assert_eq!(parse_long_date("  "), Err(ParseError::Empty));
        assert!(parse_short_date("02/30/18").is_err());
    }
}

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// 頁面上代表「刻意不提供」的字樣
const NOT_AVAILABLE: &str = "N/A";
/// 金額前的貨幣符號
const CURRENCY_MARKER: char = '$';
/// 千分位
const DIGIT_GROUP_SEPARATOR: char = ',';

/// 單一欄位的文字無法轉成預期型別。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("the text is empty")]
    Empty,
    #[error("'{text}' is not a decimal: {reason}")]
    Decimal { text: String, reason: String },
    #[error("'{text}' is not a number: {reason}")]
    Number { text: String, reason: String },
    #[error("'{text}' does not match the date pattern '{pattern}'")]
    Date { text: String, pattern: &'static str },
}

/// `N/A`（不分大小寫）代表來源刻意沒有這個值，不算解析失敗
pub fn is_not_available(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case(NOT_AVAILABLE)
}

/// Parses a currency amount such as `$1,234.50` into an exact `Decimal`.
///
/// The currency marker is removed wherever it appears; the scale written on the
/// page is kept, so `$0.080` parses to `0.080`.
pub fn parse_currency(s: &str) -> Result<Decimal, ParseError> {
    parse_decimal(&clean_escape_chars(s, &[CURRENCY_MARKER]))
}

/// Parses a plain decimal such as a P/E ratio. Only surrounding whitespace is removed.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseError> {
    let cleaned = non_empty(s)?;
    Decimal::from_str(cleaned).map_err(|why| ParseError::Decimal {
        text: cleaned.to_string(),
        reason: why.to_string(),
    })
}

/// Parses a count such as a traded volume (`25,104,800`) after removing digit-group separators.
///
/// Negative and non-finite values are rejected.
pub fn parse_count(s: &str) -> Result<f64, ParseError> {
    let cleaned = clean_escape_chars(s, &[DIGIT_GROUP_SEPARATOR]);
    let cleaned = non_empty(&cleaned)?;
    let number = cleaned.parse::<f64>().map_err(|why| ParseError::Number {
        text: cleaned.to_string(),
        reason: why.to_string(),
    })?;

    if !number.is_finite() || number < 0.0 {
        return Err(ParseError::Number {
            text: cleaned.to_string(),
            reason: "a count must be a finite non-negative number".to_string(),
        });
    }

    Ok(number)
}

/// Parses a non-negative integer such as the number of years a dividend has been paid.
pub fn parse_u32(s: &str) -> Result<u32, ParseError> {
    let cleaned = non_empty(s)?;
    u32::from_str(cleaned).map_err(|why| ParseError::Number {
        text: cleaned.to_string(),
        reason: why.to_string(),
    })
}

fn non_empty(s: &str) -> Result<&str, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err(ParseError::Empty)
    } else {
        Ok(trimmed)
    }
}

/// Removes every occurrence of the given characters from `s`.
///
/// # Example
///
/// ```
/// let clean_s = clean_escape_chars("$1,234", &['$', ',']);
/// assert_eq!(clean_s, "1234");
/// ```
pub(crate) fn clean_escape_chars(s: &str, escape_chars: &[char]) -> String {
    s.chars().filter(|c| !escape_chars.contains(c)).collect()
}

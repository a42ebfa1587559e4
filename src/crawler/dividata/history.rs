use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;

use crate::{
    crawler::dividata::Dividata,
    declare::Lookup,
    logging,
    util::{
        datetime,
        http::element,
        text::{self, ParseError},
    },
};

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to parse table selector"));

static TABLE_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to parse tr selector"));

/// 配息日期所在的欄位
const DATE_COLUMN: usize = 0;
/// 配息金額所在的欄位
const AMOUNT_COLUMN: usize = 1;

/// 單次配息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DividendPayment {
    pub date: NaiveDate,
    #[serde(rename = "dividend")]
    pub amount: Decimal,
}

/// 歷年配息紀錄，依日期由新到舊排列
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DividendHistory {
    dividends: Vec<DividendPayment>,
}

impl DividendHistory {
    pub fn new(mut dividends: Vec<DividendPayment>) -> Self {
        dividends.sort_by(|a, b| b.date.cmp(&a.date));
        DividendHistory { dividends }
    }

    pub fn dividends(&self) -> &[DividendPayment] {
        &self.dividends
    }
}

/// 配息表無法使用，整份歷史作廢
#[derive(Error, Debug, PartialEq)]
pub enum HistoryError {
    #[error("the dividend table is missing")]
    TableMissing,
    #[error("row {0} of the dividend table is malformed: {1}")]
    Row(usize, ParseError),
}

/// 抓取股利歷史頁
///
/// 表格的第一列是標題，其餘每列一筆配息。任一列無法解析代表表格版面已變更，
/// 這時整份歷史視為不存在，不會回傳部分資料。
pub async fn visit(site: &Dividata, stock_symbol: &str) -> Lookup<DividendHistory> {
    site.fetch(&site.dividend_url(stock_symbol))
        .await
        .and_then(|text| match parse(&text) {
            Ok(history) => Lookup::Found(history),
            Err(why) => {
                logging::error_file_async(format!(
                    "Failed to parse the dividend history of {} because {}",
                    stock_symbol, why
                ));
                Lookup::Absent
            }
        })
}

pub(crate) fn parse(text: &str) -> Result<DividendHistory, HistoryError> {
    let document = Html::parse_document(text);
    let table = document
        .select(&TABLE)
        .next()
        .ok_or(HistoryError::TableMissing)?;

    let dividends = table
        .select(&TABLE_ROW)
        .enumerate()
        .skip(1)
        .map(|(index, row)| parse_row(&row).map_err(|why| HistoryError::Row(index, why)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DividendHistory::new(dividends))
}

fn parse_row(row: &ElementRef) -> Result<DividendPayment, ParseError> {
    let date = element::cell_text(row, DATE_COLUMN).ok_or(ParseError::Empty)?;
    let amount = element::cell_text(row, AMOUNT_COLUMN).ok_or(ParseError::Empty)?;
    let amount = text::parse_currency(&amount)?;
    if amount <= Decimal::ZERO {
        return Err(ParseError::Decimal {
            text: amount.to_string(),
            reason: "the dividend must be positive".to_string(),
        });
    }

    Ok(DividendPayment {
        date: datetime::parse_long_date(&date)?,
        amount,
    })
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use scraper::Html;
use serde::Serialize;

use crate::{
    calculation::dividend_yield,
    crawler::dividata::{read_field, Dividata, Field},
    declare::Lookup,
    util::{datetime, text},
};

/// 股利摘要
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DividendSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_dividend: Option<Decimal>,
    /// 近 52 週股利合計，作為未來一年股利的估計
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_forward_annual_dividend: Option<Decimal>,
    /// 以最近收盤價重新計算的殖利率(%)，小數兩位
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_forward_annual_yield: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ex_dividend_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pay_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_paying: Option<u32>,
}

/// 抓取股利摘要
pub async fn visit(site: &Dividata, stock_symbol: &str) -> Lookup<DividendSnapshot> {
    site.fetch(&site.stock_url(stock_symbol))
        .await
        .map(|text| parse(stock_symbol, &text))
}

pub(crate) fn parse(stock_symbol: &str, text: &str) -> DividendSnapshot {
    let document = Html::parse_document(text);
    let forward_dividend = read_field(
        &document,
        stock_symbol,
        Field::ForwardAnnualDividend,
        text::parse_currency,
    );
    // 頁面上的殖利率精度不足，改用收盤價自行計算
    let last_close = read_field(&document, stock_symbol, Field::LastClose, text::parse_currency);
    let forward_yield = match (forward_dividend, last_close) {
        (Some(dividend), Some(price)) => dividend_yield::forward_annual_yield(dividend, price),
        _ => None,
    };

    DividendSnapshot {
        last_dividend: read_field(
            &document,
            stock_symbol,
            Field::LastDividend,
            text::parse_currency,
        ),
        estimated_forward_annual_dividend: forward_dividend,
        estimated_forward_annual_yield: forward_yield,
        last_ex_dividend_date: read_field(
            &document,
            stock_symbol,
            Field::LastExDividendDate,
            datetime::parse_short_date,
        ),
        last_pay_date: read_field(
            &document,
            stock_symbol,
            Field::LastPayDate,
            datetime::parse_short_date,
        ),
        years_paying: read_field(&document, stock_symbol, Field::YearsPaying, text::parse_u32),
    }
}

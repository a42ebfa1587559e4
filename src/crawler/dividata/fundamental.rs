use rust_decimal::Decimal;
use scraper::Html;
use serde::Serialize;

use crate::{
    crawler::dividata::{read_field, Dividata, Field},
    declare::Lookup,
    util::text,
};

/// 基本面
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_open: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_close: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<Decimal>,
    /// 成交量(股)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

pub async fn visit(site: &Dividata, stock_symbol: &str) -> Lookup<FundamentalSnapshot> {
    site.fetch(&site.stock_url(stock_symbol))
        .await
        .map(|text| parse(stock_symbol, &text))
}

pub(crate) fn parse(stock_symbol: &str, text: &str) -> FundamentalSnapshot {
    let document = Html::parse_document(text);

    FundamentalSnapshot {
        last_open: read_field(&document, stock_symbol, Field::LastOpen, text::parse_currency),
        last_close: read_field(&document, stock_symbol, Field::LastClose, text::parse_currency),
        pe_ratio: read_field(&document, stock_symbol, Field::PeRatio, text::parse_decimal),
        volume: read_field(&document, stock_symbol, Field::Volume, text::parse_count),
    }
}

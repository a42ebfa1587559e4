use scraper::Html;
use serde::Serialize;

use crate::{
    crawler::dividata::{read_text, Dividata, Field},
    declare::Lookup,
};

/// 公司概況
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StockOverview {
    /// 股票代碼（大寫）
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

impl StockOverview {
    pub fn new(symbol: String) -> Self {
        StockOverview {
            symbol,
            ..Default::default()
        }
    }
}

/// 抓取公司概況。頁面存在時至少會帶回股票代碼，其餘欄位找不到就留空
pub async fn visit(site: &Dividata, stock_symbol: &str) -> Lookup<StockOverview> {
    site.fetch(&site.stock_url(stock_symbol))
        .await
        .map(|text| parse(stock_symbol, &text))
}

pub(crate) fn parse(stock_symbol: &str, text: &str) -> StockOverview {
    let document = Html::parse_document(text);

    StockOverview {
        symbol: stock_symbol.to_string(),
        name: read_text(&document, Field::Name),
        sector: read_text(&document, Field::Sector),
        industry: read_text(&document, Field::Industry),
        exchange: read_text(&document, Field::Exchange),
    }
}

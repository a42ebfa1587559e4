//! # Dividata 採集模組
//!
//! 從 Dividata 的個股頁抓取股利與基本面資料。網站只替有配息的股票建立頁面，
//! 其他代碼會回應 404。
//!
//! ## 支援的功能
//!
//! - **公司概況 (`overview`)**：名稱、產業類別、產業、交易所。
//! - **股利摘要 (`dividend`)**：最近一次股利、除息日、發放日、連續配息年數與預估殖利率。
//! - **股利歷史 (`history`)**：`/{symbol}/dividend` 頁面上的配息表。
//! - **基本面 (`fundamental`)**：收盤價、開盤價、本益比、成交量。
//!
//! ## 欄位定位
//!
//! 頁面元素沒有 id，全部靠相鄰的標籤文字定位，這些文字集中在 [`LOCATORS`]。
//! 網站改版時只需要調整這張表。部分標籤前面的空白是刻意保留的，
//! 網站用它來區分名稱相近的標籤。

use std::sync::Arc;

use concat_string::concat_string;
use scraper::Html;
use strum::{Display, EnumIter};
use urlencoding::encode;

use crate::{
    declare::Lookup,
    logging,
    util::{
        http::{
            element::{self, Locator},
            FetchError, PageFetcher,
        },
        text::{self, ParseError},
    },
};

/// 股利摘要
pub mod dividend;
/// 基本面
pub mod fundamental;
/// 股利歷史
pub mod history;
/// 公司概況
pub mod overview;

/// 頁面上會被擷取的欄位
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Field {
    Name,
    Sector,
    Industry,
    Exchange,
    ForwardAnnualDividend,
    LastDividend,
    LastExDividendDate,
    LastPayDate,
    YearsPaying,
    LastClose,
    LastOpen,
    PeRatio,
    Volume,
}

/// 欄位與其在頁面上位置的對照表
pub const LOCATORS: [(Field, Locator); 13] = [
    (Field::Name, Locator::FirstElement("h2")),
    (Field::Sector, Locator::ListItemSpan("Sector")),
    (Field::Industry, Locator::ListItemSpan("Industry")),
    (Field::Exchange, Locator::ListItemSpan(" Exchange")),
    (
        Field::ForwardAnnualDividend,
        Locator::AbbrSiblingSpan("52 Week Dividend"),
    ),
    (Field::LastDividend, Locator::AbbrSiblingSpan("Last Dividend")),
    (
        Field::LastExDividendDate,
        Locator::AbbrSiblingSpan("Last Ex-Dividend Date"),
    ),
    (Field::LastPayDate, Locator::AbbrSiblingSpan("Pay Date")),
    (Field::YearsPaying, Locator::AbbrSiblingSpan("Years Paying")),
    (Field::LastClose, Locator::ListItemSpan(" Last Close")),
    (Field::LastOpen, Locator::ListItemSpan(" Last Open")),
    (Field::PeRatio, Locator::ListItemSpan(" P/E Ratio")),
    (Field::Volume, Locator::ListItemSpan(" Volume")),
];

pub fn locator(field: Field) -> Option<Locator> {
    LOCATORS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, locator)| *locator)
}

/// Dividata 站點：負責組出網址並透過 [`PageFetcher`] 取得頁面
pub struct Dividata {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl Dividata {
    /// `base_url` 例如 `https://dividata.com/stock`
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Self {
        Dividata {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 摘要頁，概況、股利摘要與基本面都取自這一頁
    pub fn stock_url(&self, stock_symbol: &str) -> String {
        concat_string!(self.base_url, "/", encode(stock_symbol))
    }

    /// 股利歷史頁
    pub fn dividend_url(&self, stock_symbol: &str) -> String {
        concat_string!(self.stock_url(stock_symbol), "/dividend")
    }

    /// 抓取頁面；查無頁面與傳輸錯誤都視為沒有資料，差別只在記錄的等級
    pub(crate) async fn fetch(&self, url: &str) -> Lookup<String> {
        match self.fetcher.fetch(url).await {
            Ok(text) => Lookup::Found(text),
            Err(FetchError::NotFound(_)) => {
                logging::debug_file_async(format!("{} does not exist", url));
                Lookup::Absent
            }
            Err(why) => {
                logging::error_file_async(format!("{:?}", why));
                Lookup::Absent
            }
        }
    }
}

/// 讀取一個欄位並轉型。找不到、`N/A` 或轉型失敗都回傳 `None`，失敗會記錄下來
pub(crate) fn read_field<T>(
    document: &Html,
    stock_symbol: &str,
    field: Field,
    parse: impl Fn(&str) -> Result<T, ParseError>,
) -> Option<T> {
    let raw = read_text(document, field)?;
    match parse(&raw) {
        Ok(value) => Some(value),
        Err(why) => {
            logging::warn_file_async(format!(
                "Failed to parse {} of {} from '{}' because {}",
                field, stock_symbol, raw, why
            ));
            None
        }
    }
}

/// 讀取一個文字欄位，`N/A` 視為沒有值
pub(crate) fn read_text(document: &Html, field: Field) -> Option<String> {
    let raw = element::extract(document, &locator(field)?)?;
    if text::is_not_available(&raw) {
        return None;
    }

    Some(raw)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use crate::util::http::fixture::{FixtureFetcher, BASE_URL};

    use super::*;

    #[test]
    fn test_every_field_has_one_locator() {
        for field in Field::iter() {
            let count = LOCATORS.iter().filter(|(f, _)| *f == field).count();
            assert_eq!(count, 1, "{} must appear exactly once", field);
        }
    }

    #[test]
    fn test_urls() {
        let site = Dividata::new(Arc::new(FixtureFetcher::new()), "https://dividata.com/stock/");
        assert_eq!(site.stock_url("AAPL"), "https://dividata.com/stock/AAPL");
        assert_eq!(
            site.dividend_url("AAPL"),
            "https://dividata.com/stock/AAPL/dividend"
        );
        assert_eq!(site.stock_url("BRK/B"), "https://dividata.com/stock/BRK%2FB");
    }

    #[test]
    fn test_read_field() {
        let document = Html::parse_document(
            r#"<ul>
                <li><abbr>Years Paying</abbr><span>n/a</span></li>
                <li> P/E Ratio<span>abc</span></li>
                <li> Volume<span>1,000</span></li>
            </ul>"#,
        );
        assert_eq!(
            read_field(&document, "T", Field::YearsPaying, text::parse_u32),
            None
        );
        assert_eq!(
            read_field(&document, "T", Field::PeRatio, text::parse_decimal),
            None
        );
        assert_eq!(
            read_field(&document, "T", Field::Volume, text::parse_count),
            Some(1000.0)
        );
        assert_eq!(
            read_field(&document, "T", Field::LastOpen, text::parse_currency),
            None
        );
    }

    #[tokio::test]
    async fn test_fetch_outcomes() {
        let site = Dividata::new(Arc::new(FixtureFetcher::dividata_aapl()), BASE_URL);
        assert!(site.fetch(&site.stock_url("AAPL")).await.is_found());
        assert_eq!(site.fetch(&site.stock_url("AAAPL")).await, Lookup::Absent);

        let site = Dividata::new(Arc::new(FixtureFetcher::failing()), BASE_URL);
        assert_eq!(site.fetch(&site.stock_url("AAPL")).await, Lookup::Absent);
    }
}

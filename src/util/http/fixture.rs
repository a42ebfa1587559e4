use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use crate::util::http::{FetchError, PageFetcher};

pub(crate) const BASE_URL: &str = "https://dividata.com/stock";
pub(crate) const AAPL_PAGE: &str = include_str!("../../../fixtures/dividata/AAPL.html");
pub(crate) const AAPL_DIVIDEND_PAGE: &str =
    include_str!("../../../fixtures/dividata/AAPL_dividend.html");

/// 以預先錄好的頁面回應的 [`PageFetcher`]，未登記的網址一律回應 NotFound。
#[derive(Default)]
pub(crate) struct FixtureFetcher {
    pages: HashMap<String, String>,
    transport_failure: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FixtureFetcher {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    /// AAPL 的摘要頁與股利歷史頁
    pub(crate) fn dividata_aapl() -> Self {
        Self::new()
            .with_page(&format!("{}/AAPL", BASE_URL), AAPL_PAGE)
            .with_page(&format!("{}/AAPL/dividend", BASE_URL), AAPL_DIVIDEND_PAGE)
    }

    /// 每次抓取都回應傳輸錯誤
    pub(crate) fn failing() -> Self {
        FixtureFetcher {
            transport_failure: true,
            ..Default::default()
        }
    }

    pub(crate) fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.transport_failure {
            return Err(FetchError::Transport {
                url: url.to_string(),
                reason: "connection reset by fixture".to_string(),
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

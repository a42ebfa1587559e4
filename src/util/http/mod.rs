use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::{logging::Logger, util};

pub mod element;
#[cfg(test)]
pub(crate) mod fixture;
pub mod user_agent;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// 抓取頁面失敗的分類，呼叫端依此決定回應「查無資料」或記錄傳輸錯誤。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// 目標網站回應 404/410，通常是沒有配息的股票
    #[error("{0} was not found")]
    NotFound(String),
    /// 連線、逾時、非預期的狀態碼或讀取內容失敗
    #[error("Failed to fetch {url} because {reason}")]
    Transport { url: String, reason: String },
}

impl FetchError {
    fn transport(url: &str, reason: impl ToString) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Fetches the raw HTML of a page.
///
/// This is the seam between the extraction code and the network; tests plug in
/// canned pages instead of hitting the upstream site.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `reqwest::Client`.
///
/// No retry is attempted: a failed fetch is reported once and the caller decides.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the client with `timeout` as the budget of a whole request.
    pub fn new(timeout: Duration) -> Result<Self> {
        util::ensure_rustls_crypto_provider();

        let client = Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            .zstd(true)
            // ===== 超時設置 =====
            .connect_timeout(timeout.min(Duration::from_secs(3)))
            .timeout(timeout)
            .tcp_nodelay(true)
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            // ===== Cookie 和重定向 =====
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .referer(true)
            .user_agent(user_agent::gen_random_ua())
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(why) => {
                LOGGER.error(format!(
                    "GET:{} failed because {:?}. {} ms",
                    url,
                    why,
                    start.elapsed().as_millis()
                ));
                return Err(FetchError::transport(url, why));
            }
        };

        let status = response.status();
        LOGGER.info(format!(
            "GET:{} {} {} ms",
            url,
            status,
            start.elapsed().as_millis()
        ));

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(FetchError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(FetchError::transport(
                url,
                format!("unexpected status {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|why| FetchError::transport(url, format!("Error reading body: {:?}", why)))
    }
}

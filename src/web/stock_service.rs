use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    cache::CacheManager,
    crawler::dividata::{
        dividend::{self, DividendSnapshot},
        fundamental::{self, FundamentalSnapshot},
        history::{self, DividendHistory},
        overview::{self, StockOverview},
        Dividata,
    },
    declare::Lookup,
};

/// 對外提供四種資料，全部經過每日快取
pub struct StockService {
    cache: Arc<CacheManager>,
    site: Dividata,
}

impl StockService {
    pub fn new(cache: Arc<CacheManager>, site: Dividata) -> Self {
        StockService { cache, site }
    }

    pub async fn stock_overview(&self, symbol: &str) -> Lookup<Arc<StockOverview>> {
        let Some(symbol) = normalize(symbol) else {
            return Lookup::Absent;
        };
        self.cache
            .get_or_compute(&symbol, || overview::visit(&self.site, &symbol))
            .await
    }

    pub async fn dividend_snapshot(&self, symbol: &str) -> Lookup<Arc<DividendSnapshot>> {
        let Some(symbol) = normalize(symbol) else {
            return Lookup::Absent;
        };
        self.cache
            .get_or_compute(&symbol, || dividend::visit(&self.site, &symbol))
            .await
    }

    pub async fn dividend_history(&self, symbol: &str) -> Lookup<Arc<DividendHistory>> {
        let Some(symbol) = normalize(symbol) else {
            return Lookup::Absent;
        };
        self.cache
            .get_or_compute(&symbol, || history::visit(&self.site, &symbol))
            .await
    }

    pub async fn fundamentals(&self, symbol: &str) -> Lookup<Arc<FundamentalSnapshot>> {
        let Some(symbol) = normalize(symbol) else {
            return Lookup::Absent;
        };
        self.cache
            .get_or_compute(&symbol, || fundamental::visit(&self.site, &symbol))
            .await
    }

    pub fn uncached_use_count(&self) -> u64 {
        self.cache.uncached_use_count()
    }
}

/// 去除空白並轉大寫，空字串代表沒有這檔股票
fn normalize(symbol: &str) -> Option<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return None;
    }

    Some(symbol.to_uppercase())
}

fn respond<T: Serialize>(outcome: Lookup<Arc<T>>) -> Response {
    match outcome {
        Lookup::Found(record) => Json(&*record).into_response(),
        Lookup::Absent => StatusCode::NOT_FOUND.into_response(),
    }
}

pub(super) async fn get_stock_overview(
    State(service): State<Arc<StockService>>,
    Path(symbol): Path<String>,
) -> Response {
    respond(service.stock_overview(&symbol).await)
}

pub(super) async fn get_dividend_snapshot(
    State(service): State<Arc<StockService>>,
    Path(symbol): Path<String>,
) -> Response {
    respond(service.dividend_snapshot(&symbol).await)
}

pub(super) async fn get_dividend_history(
    State(service): State<Arc<StockService>>,
    Path(symbol): Path<String>,
) -> Response {
    respond(service.dividend_history(&symbol).await)
}

pub(super) async fn get_fundamentals(
    State(service): State<Arc<StockService>>,
    Path(symbol): Path<String>,
) -> Response {
    respond(service.fundamentals(&symbol).await)
}

pub(super) async fn get_uncached_use_count(
    State(service): State<Arc<StockService>>,
) -> Json<u64> {
    Json(service.uncached_use_count())
}

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;

use crate::{logging, web::stock_service::StockService};

pub mod stock_service;

pub fn router(service: Arc<StockService>) -> Router {
    Router::new()
        .route("/stocks/{symbol}", get(stock_service::get_stock_overview))
        .route(
            "/stocks/{symbol}/dividends/data",
            get(stock_service::get_dividend_snapshot),
        )
        .route(
            "/stocks/{symbol}/dividends/history",
            get(stock_service::get_dividend_history),
        )
        .route(
            "/stocks/{symbol}/fundamentals",
            get(stock_service::get_fundamentals),
        )
        .route(
            "/uncachedUseCount",
            get(stock_service::get_uncached_use_count),
        )
        .with_state(service)
}

/// 啟動 HTTP 服務，直到收到 Ctrl-C 才返回
pub async fn serve(service: Arc<StockService>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    logging::info_file_async(format!("HTTP 服務開始在 {:?} 監聽", addr));

    let result = axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match &result {
        Ok(_) => logging::info_file_async(format!("HTTP 服務在 {:?} 正常停止", addr)),
        Err(why) => logging::error_file_async(format!("HTTP 服務運行中斷 ({:?}): {}", addr, why)),
    }

    Ok(result?)
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        logging::error_file_async(format!("Failed to listen for ctrl-c because {:?}", why));
    }
}

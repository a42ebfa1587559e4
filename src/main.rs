use std::{env, sync::Arc, time::Duration};

use anyhow::Result;
use tokio_cron_scheduler::JobScheduler;

use crate::{
    cache::{CacheManager, UsageCounter},
    config::SETTINGS,
    crawler::dividata::Dividata,
    util::http::HttpFetcher,
    web::stock_service::StockService,
};

pub mod cache;
pub mod calculation;
pub mod config;
pub mod crawler;
pub mod declare;
pub mod logging;
pub mod scheduler;
pub mod util;
pub mod web;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    logging::info_console(format!(
        "DividendStockService 啟動中 Rust OS/Arch: {}/{}",
        env::consts::OS,
        env::consts::ARCH
    ));

    let fetcher = HttpFetcher::new(Duration::from_secs(SETTINGS.dividata.timeout_secs))?;
    let site = Dividata::new(Arc::new(fetcher), &SETTINGS.dividata.base_url);
    let cache = Arc::new(CacheManager::new(Arc::new(UsageCounter::default())));

    let mut sched = JobScheduler::new().await?;
    scheduler::start(&sched, &cache).await?;

    let service = Arc::new(StockService::new(cache, site));
    let served = web::serve(service, SETTINGS.system.http_port).await;

    if let Err(why) = sched.shutdown().await {
        logging::error_console(format!("Failed to shutdown the scheduler because {:?}", why));
    }

    served
}

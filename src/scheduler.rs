use std::{future::Future, sync::Arc};

use anyhow::{Error, Result};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{cache::CacheManager, config::SETTINGS, logging};

/// 啟動排程
pub async fn start(sched: &JobScheduler, cache: &Arc<CacheManager>) -> Result<()> {
    //                 sec  min   hour   day of month   month   day of week
    // UTC 時間
    // 00:01 清空前一天的快取
    cache
        .schedule_daily_reset(sched, &SETTINGS.system.cache_reset_cron)
        .await?;

    sched.start().await?;

    Ok(())
}

pub(crate) fn create_job<F, Fut>(cron_expr: &str, task: F) -> Result<Job>
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send,
{
    let expr = cron_expr.to_string();
    Ok(Job::new_async(cron_expr, move |_uuid, _l| {
        let task = task.clone();
        let expr = expr.clone();
        Box::pin(async move {
            if let Err(why) = task().await {
                logging::error_file_async(format!(
                    "Failed to execute task({}) because {:?}",
                    expr, why
                ));
            }
        })
    })?)
}

//! 每日快取模組。
//!
//! 上游資料最多一天更新一次，所以同一檔股票的同一種資料在一天之內只抓一次，
//! 之後直接回傳快取。查無資料 (`Absent`) 也會被快取，隔天才會再查。
//!
//! - 鍵為「大寫股票代碼 + 資料種類」。
//! - 同一個鍵同時發生多次未命中時只會執行一次抓取，其他呼叫端等待同一個結果。
//! - 每次真正執行抓取時 [`UsageCounter`] 加一，命中快取時不會變動。
//! - 每天在固定時間由排程呼叫 [`CacheManager::reset_daily`] 清空全部資料。

use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use anyhow::Result;
use chrono::{DateTime, Local};
use moka::future::Cache;
use tokio_cron_scheduler::JobScheduler;

use crate::{
    crawler::dividata::{
        dividend::DividendSnapshot, fundamental::FundamentalSnapshot, history::DividendHistory,
        overview::StockOverview,
    },
    declare::{Lookup, RecordKind},
    logging, scheduler,
};

/// 快取可容納的項目上限
const MAX_CAPACITY: u64 = 100_000;

/// 未命中快取（實際執行抓取）的累計次數
#[derive(Debug, Default)]
pub struct UsageCounter(AtomicU64);

impl UsageCounter {
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub kind: RecordKind,
}

impl CacheKey {
    pub fn new(symbol: &str, kind: RecordKind) -> Self {
        CacheKey {
            symbol: symbol.trim().to_uppercase(),
            kind,
        }
    }
}

/// 已組裝完成的資料，建立後不再變動
#[derive(Debug, Clone)]
pub enum Record {
    StockOverview(Arc<StockOverview>),
    DividendSnapshot(Arc<DividendSnapshot>),
    DividendHistory(Arc<DividendHistory>),
    Fundamentals(Arc<FundamentalSnapshot>),
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub outcome: Lookup<Record>,
    /// 只在每日清除時使用，項目本身不會個別過期
    pub created_at: DateTime<Local>,
}

impl CacheEntry {
    fn new(outcome: Lookup<Record>) -> Self {
        CacheEntry {
            outcome,
            created_at: Local::now(),
        }
    }
}

/// 可以放進快取的資料種類
pub trait CachedRecord: Send + Sync + Sized + 'static {
    const KIND: RecordKind;

    fn into_record(record: Arc<Self>) -> Record;

    fn from_record(record: &Record) -> Option<Arc<Self>>;
}

macro_rules! cached_record {
    ($record:ty, $variant:ident) => {
        impl CachedRecord for $record {
            const KIND: RecordKind = RecordKind::$variant;

            fn into_record(record: Arc<Self>) -> Record {
                Record::$variant(record)
            }

            fn from_record(record: &Record) -> Option<Arc<Self>> {
                match record {
                    Record::$variant(record) => Some(Arc::clone(record)),
                    _ => None,
                }
            }
        }
    };
}

cached_record!(StockOverview, StockOverview);
cached_record!(DividendSnapshot, DividendSnapshot);
cached_record!(DividendHistory, DividendHistory);
cached_record!(FundamentalSnapshot, Fundamentals);

pub struct CacheManager {
    entries: Cache<CacheKey, CacheEntry>,
    counter: Arc<UsageCounter>,
}

impl CacheManager {
    pub fn new(counter: Arc<UsageCounter>) -> Self {
        CacheManager {
            entries: Cache::builder().max_capacity(MAX_CAPACITY).build(),
            counter,
        }
    }

    /// 取得 `symbol` 的 `T` 資料。
    ///
    /// 本日第一次查詢時執行 `compute` 並保存結果（包含 `Absent`），之後直接回傳保存的結果。
    pub async fn get_or_compute<T, F, Fut>(&self, symbol: &str, compute: F) -> Lookup<Arc<T>>
    where
        T: CachedRecord,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Lookup<T>>,
    {
        let key = CacheKey::new(symbol, T::KIND);
        let symbol = key.symbol.clone();
        let counter = Arc::clone(&self.counter);
        let entry = self
            .entries
            .get_with(key, async move {
                let uses = counter.increment();
                logging::info_file_async(format!(
                    "computing {} for {} (uncached use #{})",
                    T::KIND,
                    symbol,
                    uses
                ));
                CacheEntry::new(compute().await.map(|record| T::into_record(Arc::new(record))))
            })
            .await;

        entry
            .outcome
            .and_then(|record| T::from_record(&record).into())
    }

    /// 清空全部資料，回傳清除的項目數。與清除同時寫入的項目可能被保留或清除
    pub async fn reset_daily(&self) -> u64 {
        let created: Vec<DateTime<Local>> = self
            .entries
            .iter()
            .map(|(_, entry)| entry.created_at)
            .collect();
        let discarded = created.len() as u64;
        let oldest = created.into_iter().min();

        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;

        match oldest {
            Some(oldest) => logging::info_file_async(format!(
                "the daily cache reset discarded {} entries, the oldest was created at {}",
                discarded,
                oldest.format("%F %X")
            )),
            None => {
                logging::info_file_async("the daily cache reset found nothing to discard".to_string())
            }
        }

        discarded
    }

    pub fn uncached_use_count(&self) -> u64 {
        self.counter.get()
    }

    /// 將每日清除登記到排程，`cron` 為 6 欄位 (秒 分 時 日 月 星期)，以 UTC 計算
    pub async fn schedule_daily_reset(
        self: &Arc<Self>,
        sched: &JobScheduler,
        cron: &str,
    ) -> Result<()> {
        let cache = Arc::clone(self);
        let job = scheduler::create_job(cron, move || {
            let cache = Arc::clone(&cache);
            async move {
                cache.reset_daily().await;
                Ok(())
            }
        })?;
        sched.add(job).await?;

        logging::info_file_async(format!("the daily cache reset is scheduled at '{}'", cron));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        crawler::dividata::{fundamental, history, overview, Dividata},
        util::http::fixture::{FixtureFetcher, BASE_URL},
    };

    use super::*;

    fn manager() -> (CacheManager, Arc<UsageCounter>) {
        let counter = Arc::new(UsageCounter::default());
        (CacheManager::new(Arc::clone(&counter)), counter)
    }

    #[test]
    fn test_cache_key_uppercases() {
        assert_eq!(
            CacheKey::new(" aapl ", RecordKind::Fundamentals),
            CacheKey::new("AAPL", RecordKind::Fundamentals)
        );
        assert_ne!(
            CacheKey::new("AAPL", RecordKind::Fundamentals),
            CacheKey::new("AAPL", RecordKind::StockOverview)
        );
    }

    #[tokio::test]
    async fn test_computes_once_per_key() {
        let fetcher = Arc::new(FixtureFetcher::dividata_aapl());
        let site = Dividata::new(fetcher.clone(), BASE_URL);
        let (cache, counter) = manager();

        let first = cache
            .get_or_compute("AAPL", || overview::visit(&site, "AAPL"))
            .await;
        let second = cache
            .get_or_compute("AAPL", || overview::visit(&site, "AAPL"))
            .await;

        assert_eq!(first, second);
        assert_eq!(
            first.found().unwrap().name.as_deref(),
            Some("Apple Inc")
        );
        assert_eq!(counter.get(), 1);
        assert_eq!(cache.uncached_use_count(), 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_record_kinds_are_cached_separately() {
        let site = Dividata::new(Arc::new(FixtureFetcher::dividata_aapl()), BASE_URL);
        let (cache, counter) = manager();

        assert!(cache
            .get_or_compute("AAPL", || overview::visit(&site, "AAPL"))
            .await
            .is_found());
        assert!(cache
            .get_or_compute("AAPL", || fundamental::visit(&site, "AAPL"))
            .await
            .is_found());
        assert!(cache
            .get_or_compute("AAPL", || history::visit(&site, "AAPL"))
            .await
            .is_found());
        assert_eq!(counter.get(), 3);
    }

    #[tokio::test]
    async fn test_absent_is_cached() {
        let fetcher = Arc::new(FixtureFetcher::dividata_aapl());
        let site = Dividata::new(fetcher.clone(), BASE_URL);
        let (cache, counter) = manager();

        for _ in 0..3 {
            let outcome = cache
                .get_or_compute("AAAPL", || overview::visit(&site, "AAAPL"))
                .await;
            assert_eq!(outcome, Lookup::Absent);
        }
        assert_eq!(counter.get(), 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_computation() {
        let fetcher = Arc::new(FixtureFetcher::dividata_aapl().with_delay(Duration::from_millis(50)));
        let site = Dividata::new(fetcher.clone(), BASE_URL);
        let (cache, counter) = manager();

        let (a, b, c) = tokio::join!(
            cache.get_or_compute("AAPL", || overview::visit(&site, "AAPL")),
            cache.get_or_compute("AAPL", || overview::visit(&site, "AAPL")),
            cache.get_or_compute("aapl", || overview::visit(&site, "AAPL")),
        );

        assert!(a.is_found());
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(counter.get(), 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_reset_daily() {
        let fetcher = Arc::new(FixtureFetcher::dividata_aapl());
        let site = Dividata::new(fetcher.clone(), BASE_URL);
        let (cache, counter) = manager();

        cache
            .get_or_compute("AAPL", || overview::visit(&site, "AAPL"))
            .await;
        cache
            .get_or_compute("AAAPL", || overview::visit(&site, "AAAPL"))
            .await;
        assert_eq!(cache.reset_daily().await, 2);

        cache
            .get_or_compute("AAPL", || overview::visit(&site, "AAPL"))
            .await;
        assert_eq!(counter.get(), 3);
        assert_eq!(fetcher.calls(), 3);
        assert!(cache.reset_daily().await >= 1);
    }

    #[tokio::test]
    async fn test_schedule_daily_reset() {
        let sched = JobScheduler::new().await.unwrap();
        let (cache, _) = manager();
        let cache = Arc::new(cache);

        assert!(cache
            .schedule_daily_reset(&sched, crate::config::DEFAULT_CACHE_RESET_CRON)
            .await
            .is_ok());
        assert!(cache
            .schedule_daily_reset(&sched, "every day")
            .await
            .is_err());
    }
}

//! 非阻塞的檔案日誌。
//!
//! 每個等級各自有一條背景執行緒負責寫檔，呼叫端只把字串丟進 channel，
//! 不會因為磁碟 I/O 卡住處理 HTTP 請求的 task。檔案以日期命名並由
//! [`rotate::Rotate`] 負責依日期、大小輪轉與清除過期檔案。

use std::{fmt::Write as _, thread};

use chrono::{format::DelayedFormat, Local};
use log::Level;
use once_cell::sync::Lazy;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::logging::rotate::Rotate;

pub mod rotate;

/// 累積到這個大小或 channel 已清空時才寫入檔案
const FLUSH_THRESHOLD: usize = 2048;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

pub struct Logger {
    info_writer: UnboundedSender<String>,
    warn_writer: UnboundedSender<String>,
    error_writer: UnboundedSender<String>,
    debug_writer: UnboundedSender<String>,
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        Logger {
            info_writer: Self::create_writer(log_name, Level::Info),
            warn_writer: Self::create_writer(log_name, Level::Warn),
            error_writer: Self::create_writer(log_name, Level::Error),
            debug_writer: Self::create_writer(log_name, Level::Debug),
        }
    }

    pub fn info(&self, log: String) {
        self.send(Level::Info, log);
    }

    pub fn warn(&self, log: String) {
        self.send(Level::Warn, log);
    }

    pub fn error(&self, log: String) {
        self.send(Level::Error, log);
    }

    pub fn debug(&self, log: String) {
        self.send(Level::Debug, log);
    }

    fn send(&self, level: Level, msg: String) {
        let writer = match level {
            Level::Info => &self.info_writer,
            Level::Warn => &self.warn_writer,
            Level::Error => &self.error_writer,
            Level::Debug | Level::Trace => &self.debug_writer,
        };

        if let Err(why) = writer.send(msg) {
            error_console(format!("Failed to send {} log because {}", level, why));
        }
    }

    fn create_writer(log_name: &str, level: Level) -> UnboundedSender<String> {
        let (tx, mut rx) = unbounded_channel::<String>();
        let pattern = format!(
            "log/%Y-%m-%d_{}_{}.log",
            log_name,
            level.as_str().to_lowercase()
        );

        // 寫入檔案的操作使用另一個線程處理
        let spawned = thread::Builder::new()
            .name(format!("log-{}-{}", log_name, level))
            .spawn(move || {
                let mut rotate = Rotate::new(pattern);
                let mut line = String::with_capacity(FLUSH_THRESHOLD);

                while let Some(received) = rx.blocking_recv() {
                    let now = Local::now();
                    if writeln!(&mut line, "{} {} {}", now.format("%F %X%.6f"), level, received)
                        .is_err()
                    {
                        continue;
                    }

                    if rx.is_empty() || line.len() >= FLUSH_THRESHOLD {
                        if let Err(why) = rotate.write_msg(now, line.as_bytes()) {
                            error_console(format!(
                                "Failed to write to log file. because:{:#?}\r\nmsg:{}",
                                why, line
                            ));
                        }

                        rotate.flush();
                        line.clear();
                    }
                }
            });

        if let Err(why) = spawned {
            error_console(format!("Failed to spawn log writer because {:?}", why));
        }

        tx
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: String) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: String) {
    LOGGER.debug(log);
}

pub fn info_console(log: String) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}

pub fn error_console(log: String) {
    println!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_file_async() {
        info_file_async("info from test_file_async".to_string());
        warn_file_async("warn from test_file_async".to_string());
        error_file_async("error from test_file_async".to_string());
        debug_file_async("debug from test_file_async".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

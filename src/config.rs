use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub system: System,
    #[serde(default)]
    pub dividata: Dividata,
}

const SYSTEM_HTTP_PORT: &str = "SYSTEM_HTTP_PORT";
const SYSTEM_CACHE_RESET_CRON: &str = "SYSTEM_CACHE_RESET_CRON";

/// 每天 00:01:00 清空快取 (sec min hour day month weekday)
pub const DEFAULT_CACHE_RESET_CRON: &str = "0 1 0 * * *";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct System {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_cache_reset_cron")]
    pub cache_reset_cron: String,
}

impl Default for System {
    fn default() -> Self {
        System {
            http_port: default_http_port(),
            cache_reset_cron: default_cache_reset_cron(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_cache_reset_cron() -> String {
    DEFAULT_CACHE_RESET_CRON.to_string()
}

const DIVIDATA_BASE_URL: &str = "DIVIDATA_BASE_URL";
const DIVIDATA_TIMEOUT_SECS: &str = "DIVIDATA_TIMEOUT_SECS";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dividata {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 單次抓取頁面的逾時秒數
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Dividata {
    fn default() -> Self {
        Dividata {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://dividata.com/stock".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| {
    App::get().unwrap_or_else(|why| {
        logging::error_console(format!(
            "Failed to read {} because {:?}, fall back to env",
            CONFIG_PATH, why
        ));
        App::from_env()
    })
});

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::from_env())
    }

    /// 從 env 中讀取設定值，未設定的欄位使用預設值
    fn from_env() -> Self {
        App::default().override_with_env()
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(port) = env::var(SYSTEM_HTTP_PORT) {
            match u16::from_str(&port) {
                Ok(port) => self.system.http_port = port,
                Err(why) => logging::error_console(format!(
                    "Ignore {}={} because {:?}",
                    SYSTEM_HTTP_PORT, port, why
                )),
            }
        }

        if let Ok(cron) = env::var(SYSTEM_CACHE_RESET_CRON) {
            if !cron.trim().is_empty() {
                self.system.cache_reset_cron = cron;
            }
        }

        if let Ok(base_url) = env::var(DIVIDATA_BASE_URL) {
            if !base_url.trim().is_empty() {
                self.dividata.base_url = base_url.trim_end_matches('/').to_string();
            }
        }

        if let Ok(secs) = env::var(DIVIDATA_TIMEOUT_SECS) {
            self.dividata.timeout_secs = u64::from_str(&secs).unwrap_or(default_timeout_secs());
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let app = App::default();
        assert_eq!(app.system.http_port, 8080);
        assert_eq!(app.system.cache_reset_cron, "0 1 0 * * *");
        assert_eq!(app.dividata.base_url, "https://dividata.com/stock");
        assert_eq!(app.dividata.timeout_secs, 5);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let app: App =
            serde_json::from_str(r#"{"system":{"http_port":9090},"dividata":{}}"#).unwrap();
        assert_eq!(app.system.http_port, 9090);
        assert_eq!(app.system.cache_reset_cron, DEFAULT_CACHE_RESET_CRON);
        assert_eq!(app.dividata.timeout_secs, 5);
    }
}

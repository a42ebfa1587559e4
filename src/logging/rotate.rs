use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, TimeDelta};
use rayon::prelude::*;

use crate::logging;

/// 預設單檔最大大小：10 MB
const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;
/// 預設保留天數：7 天
const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// 依日期與大小輪轉的日誌檔。
///
/// 只由單一寫檔執行緒擁有，所以不需要額外的鎖。
pub struct Rotate {
    /// 檔名模式，例如 "log/%Y-%m-%d_default_info.log"
    fn_pattern: String,
    /// 由日期決定的基礎檔名（不含 generation）
    cur_base_fn: String,
    /// 目前開啟中的完整檔名
    cur_fn: PathBuf,
    out_fh: Option<BufWriter<File>>,
    /// 同一天內因大小超限而輪轉的次數，只增不減
    generation: u32,
    max_size: u64,
    current_size: u64,
    max_age: TimeDelta,
}

impl Rotate {
    pub fn new(fn_pattern: String) -> Self {
        Self::with_options(fn_pattern, DEFAULT_MAX_SIZE, DEFAULT_MAX_AGE_DAYS)
    }

    pub fn with_options(fn_pattern: String, max_size: u64, max_age_days: i64) -> Self {
        Rotate {
            fn_pattern,
            cur_base_fn: String::new(),
            cur_fn: PathBuf::new(),
            out_fh: None,
            generation: 0,
            max_size,
            current_size: 0,
            max_age: TimeDelta::try_days(max_age_days).unwrap_or(TimeDelta::days(7)),
        }
    }

    /// 寫入日誌訊息，跨日時換檔並清除過期檔案，超過大小時換到下一個 generation
    pub fn write_msg(&mut self, now: DateTime<Local>, msg: &[u8]) -> Result<()> {
        let base_fn = now.format(&self.fn_pattern).to_string();
        if base_fn != self.cur_base_fn || self.out_fh.is_none() {
            if base_fn != self.cur_base_fn {
                self.generation = 0;
            }
            self.cur_base_fn = base_fn;
            self.open_new_file()?;
            self.cleanup_old_files(now);
        }

        if self.current_size > 0 && self.current_size + msg.len() as u64 > self.max_size {
            self.generation += 1;
            self.open_new_file()?;
        }

        let writer = self
            .out_fh
            .as_mut()
            .ok_or_else(|| anyhow!("The log file {} is not opened", self.cur_fn.display()))?;
        writer.write_all(msg)?;
        self.current_size += msg.len() as u64;

        Ok(())
    }

    pub fn flush(&mut self) {
        if let Some(writer) = self.out_fh.as_mut() {
            if let Err(why) = writer.flush() {
                logging::error_console(format!("Failed to flush log file. because:{:#?}", why));
            }
        }
    }

    pub fn current_file(&self) -> &Path {
        &self.cur_fn
    }

    /// generation = 0: "log/2025-02-03_app.log"
    /// generation = 1: "log/2025-02-03_app.1.log"
    fn generate_full_fn(&self) -> PathBuf {
        let path = Path::new(&self.cur_base_fn);
        if self.generation == 0 {
            return path.to_path_buf();
        }

        let parent = path.parent().unwrap_or(Path::new(""));
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("log");
        parent.join(format!("{}.{}.{}", stem, self.generation, ext))
    }

    fn open_new_file(&mut self) -> Result<()> {
        self.flush();

        let filename = self.generate_full_fn();
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&filename)?;

        self.current_size = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.out_fh = Some(BufWriter::with_capacity(4096, file));
        self.cur_fn = filename;

        Ok(())
    }

    /// 刪除同目錄下修改時間早於 max_age 的 .log 檔
    fn cleanup_old_files(&self, now: DateTime<Local>) {
        let files = match Self::log_files_beside(&self.cur_fn) {
            Ok(files) => files,
            Err(why) => {
                logging::error_console(format!(
                    "Failed to list log files beside {} because {:?}",
                    self.cur_fn.display(),
                    why
                ));
                return;
            }
        };

        let cut_off = (now - self.max_age).timestamp().max(0) as u64;
        files
            .par_iter()
            .with_min_len(num_cpus::get())
            .filter(|file| {
                fs::metadata(file)
                    .and_then(|metadata| metadata.modified())
                    .ok()
                    .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
                    .is_some_and(|since| since.as_secs() <= cut_off)
            })
            .for_each(|unlink| {
                if let Err(why) = fs::remove_file(unlink) {
                    logging::error_console(format!(
                        "couldn't remove the file({}). because {:?}",
                        unlink.display(),
                        why
                    ));
                }
            });
    }

    fn log_files_beside(file_path: &Path) -> Result<Vec<PathBuf>, io::Error> {
        let parent_dir = match file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(parent_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "log") {
                files.push(path);
            }
        }

        Ok(files)
    }
}

impl Drop for Rotate {
    fn drop(&mut self) {
        self.flush();
    }
}

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};

use crate::domain::MatchRecord;

/// 结果列表之后的分隔线
pub const SEPARATOR: &str = "----------------------------------------";

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 单条结果的展示文本，摘要自带结尾换行
pub fn format_match(index: usize, record: &MatchRecord, show_path: bool) -> String {
    if show_path {
        format!("{} | {}: {}", index, record.path().display(), record.excerpt())
    } else {
        format!("{} | {}", index, record.excerpt())
    }
}

/// 输出编号后的结果列表和分隔线
pub fn print_matches<W: Write>(out: &mut W, records: &[MatchRecord], show_path: bool) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        writeln!(out, "{}", format_match(index, record, show_path))?;
    }
    writeln!(out, "{}", SEPARATOR)?;
    Ok(())
}

/// 输出笔记全文
pub fn print_note<W: Write>(out: &mut W, path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("无法读取文件: {}", path.display()))?;

    writeln!(
        out,
        "\x1b[1;32m{}\x1b[0m ({})",
        path.display(),
        format_size(bytes.len() as u64, BINARY)
    )?;
    writeln!(out, "{}", String::from_utf8_lossy(&bytes))?;
    Ok(())
}

/// 搜索摘要
pub struct SearchSummary {
    pub start_time: Instant,
    pub candidates: u64,
    pub matches: usize,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            candidates: 0,
            matches: 0,
        }
    }

    pub fn print<W: Write>(&self, out: &mut W) -> Result<()> {
        let duration = self.start_time.elapsed();

        writeln!(out, "\n搜索摘要:")?;
        writeln!(out, "----------------------------")?;
        writeln!(out, "总用时: {}", format_duration(duration))?;
        writeln!(out, "检查文件: {}", self.candidates)?;
        writeln!(out, "匹配文件: {}", self.matches)?;

        Ok(())
    }
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self::new()
    }
}

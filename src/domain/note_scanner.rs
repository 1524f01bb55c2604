use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::{DirEntry, WalkBuilder};
use indicatif::ProgressBar;
use thiserror::Error;

use crate::domain::search::{
    is_excluded, is_supported_extension, join_excerpt, read_excerpt_lines, MatchRecord,
    SearchPattern,
};
use crate::infrastructure::LoggerTrait;

/// 扫描错误
#[derive(Debug, Error)]
pub enum ScanError {
    /// 遍历目录失败（根目录不存在、目录项不可读等）
    #[error("遍历目录失败 {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// 读取笔记摘要失败
    #[error("读取文件失败 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 写入调试日志失败
    #[error("写入日志失败: {0}")]
    Log(String),
}

/// 一次扫描的参数
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub pattern: SearchPattern,
    pub root: PathBuf,
    pub include_path: bool,
}

impl ScanRequest {
    /// 以普通文本搜索词创建请求
    pub fn new(search_term: &str, root: impl Into<PathBuf>, include_path: bool) -> Self {
        Self {
            pattern: SearchPattern::Text(search_term.to_lowercase()),
            root: root.into(),
            include_path,
        }
    }

    pub fn with_pattern(pattern: SearchPattern, root: impl Into<PathBuf>, include_path: bool) -> Self {
        Self {
            pattern,
            root: root.into(),
            include_path,
        }
    }
}

/// 扫描结果及统计
#[derive(Debug, Default)]
pub struct ScanReport {
    pub matches: Vec<MatchRecord>,
    /// 读取过摘要的候选文件数
    pub candidates: u64,
}

/// 笔记扫描器
///
/// 单线程深度优先遍历，每层目录按文件名字典序访问，因此同一目录树的结果顺序固定。
/// 遇到第一个遍历或读取错误即中止，不返回部分结果。
pub struct NoteScanner {
    logger: Arc<dyn LoggerTrait>,
    progress: ProgressBar,
}

impl NoteScanner {
    pub fn new(logger: Arc<dyn LoggerTrait>) -> Self {
        Self {
            logger,
            progress: ProgressBar::hidden(),
        }
    }

    /// 每检查一个候选文件就推进一次进度条
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn scan(&self, request: &ScanRequest) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport::default();
        self.log(&format!("开始扫描目录: {}", request.root.display()))?;

        for result in build_walker(&request.root) {
            let entry = result.map_err(|source| ScanError::Walk {
                root: request.root.clone(),
                source,
            })?;

            if !is_candidate(&entry)? {
                continue;
            }

            let path = entry.path();
            report.candidates += 1;
            self.progress
                .set_message(format!("已检查 {} 个文件", report.candidates));
            self.progress.tick();

            let lines = read_excerpt_lines(path).map_err(|source| ScanError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            if request.pattern.matches(&join_excerpt(&lines)) {
                self.log_file(path, "匹配")?;
                report.matches.push(MatchRecord::new(
                    path.to_path_buf(),
                    lines,
                    request.include_path,
                ));
            } else {
                self.log_file(path, "未匹配")?;
            }
        }

        self.progress.finish_with_message(format!(
            "完成! 已检查 {} 个文件, 匹配 {} 个",
            report.candidates,
            report.matches.len()
        ));
        self.log(&format!(
            "扫描结束: 候选文件 {} 个, 匹配 {} 个",
            report.candidates,
            report.matches.len()
        ))?;

        Ok(report)
    }

    fn log(&self, message: &str) -> Result<(), ScanError> {
        if !self.logger.is_enabled() {
            return Ok(());
        }
        self.logger
            .log_message(message)
            .map_err(|err| ScanError::Log(err.to_string()))
    }

    fn log_file(&self, path: &Path, status: &str) -> Result<(), ScanError> {
        if !self.logger.is_enabled() {
            return Ok(());
        }
        self.logger
            .log_file(path, status)
            .map_err(|err| ScanError::Log(err.to_string()))
    }
}

/// 按给定参数扫描笔记目录
pub fn scan(search_term: &str, root: &Path, include_path: bool) -> Result<Vec<MatchRecord>, ScanError> {
    let scanner = NoteScanner::new(Arc::new(crate::infrastructure::Logger::disabled()));
    let report = scanner.scan(&ScanRequest::new(search_term, root, include_path))?;
    Ok(report.matches)
}

fn build_walker(root: &Path) -> ignore::Walk {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false) // 不读取 .gitignore，也不跳过隐藏文件
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        // 根目录本身不经过此过滤，由 is_candidate 兜底
        .filter_entry(|entry| !is_excluded(entry.path()));
    builder.build()
}

/// 候选文件：未被排除、扩展名受支持，且是普通文件或指向普通文件的符号链接
///
/// 符号链接的目标无法读取（例如已被删除）时返回错误。
fn is_candidate(entry: &DirEntry) -> Result<bool, ScanError> {
    let path = entry.path();
    if is_excluded(path) || !is_supported_extension(path) {
        return Ok(false);
    }

    match entry.file_type() {
        Some(ft) if ft.is_file() => Ok(true),
        Some(ft) if ft.is_symlink() => fs::metadata(path)
            .map(|meta| meta.is_file())
            .map_err(|source| ScanError::Read {
                path: path.to_path_buf(),
                source,
            }),
        _ => Ok(false),
    }
}

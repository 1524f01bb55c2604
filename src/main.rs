use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use find_notes::{
    print_matches, Config, EditorOpener, Logger, LoggerTrait, NoteScanner, ScanRequest,
    SearchPattern, SearchSummary, Session,
};

/// 在笔记目录中搜索关键字，并交互式地打开或查看命中的笔记
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 要搜索的关键字（只匹配每个笔记的前两行，不区分大小写）
    #[clap(required = true)]
    term: String,

    /// 笔记根目录，覆盖配置文件中的 notes.directory
    #[clap(short, long)]
    dir: Option<PathBuf>,

    /// 在结果中显示文件路径
    #[clap(short = 'v', long)]
    show_path: bool,

    /// 将关键字作为正则表达式
    #[clap(long)]
    regex: bool,

    /// 启用调试日志
    #[clap(long)]
    log: bool,

    /// 配置文件路径，默认为程序同级目录下的 config.toml
    #[clap(long)]
    config: Option<PathBuf>,
}

fn spinner() -> Result<ProgressBar> {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("无效的进度条模板")?,
    );
    Ok(progress)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config = Config::load_or_create(&config_path)?;
    config.validate()?;

    let logger = Arc::new(Logger::new(
        args.log || config.logging.enabled,
        &config.logging.directory,
    )?);

    let root = args.dir.clone().unwrap_or_else(|| config.notes.directory.clone());
    let show_path = args.show_path || config.display.show_path;
    let pattern = SearchPattern::from_input(&args.term, args.regex)?;

    if logger.is_enabled() {
        logger.log_message(&format!("配置文件: {}", config_path.display()))?;
        logger.log_message(&format!("搜索关键字: {}", args.term))?;
        logger.log_message(&format!("使用正则表达式: {}", args.regex))?;
    }

    let mut summary = SearchSummary::new();
    let scanner = NoteScanner::new(logger.clone()).with_progress(spinner()?);
    let report = scanner
        .scan(&ScanRequest::with_pattern(pattern, &root, show_path))
        .with_context(|| format!("搜索笔记目录失败: {}", root.display()))?;

    summary.candidates = report.candidates;
    summary.matches = report.matches.len();
    logger.finalize(
        summary.candidates,
        summary.matches as u64,
        summary.start_time.elapsed(),
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if report.matches.is_empty() {
        writeln!(out, "未找到匹配的笔记。")?;
        summary.print(&mut out)?;
        return Ok(());
    }

    print_matches(&mut out, &report.matches, show_path)?;
    summary.print(&mut out)?;

    let opener = EditorOpener::new(config.editor.command.clone());
    let stdin = io::stdin();
    Session::new(stdin.lock(), out, &opener).run(&report.matches)?;

    if logger.is_enabled() {
        println!("完整日志已保存到: {}", logger.log_path().display());
    }

    Ok(())
}

// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{scan, MatchRecord, NoteScanner, ScanError, ScanRequest, SearchPattern};
pub use application::{Config, Session};
pub use infrastructure::{EditorOpener, Logger, LoggerTrait};
pub use presentation::{print_matches, SearchSummary};

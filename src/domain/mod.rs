pub mod search;
pub mod note_scanner;

pub use search::{MatchRecord, SearchPattern, SUPPORTED_EXTENSIONS};
pub use note_scanner::{scan, NoteScanner, ScanError, ScanReport, ScanRequest};

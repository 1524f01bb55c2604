pub mod display;

pub use display::{format_match, print_matches, print_note, SearchSummary};

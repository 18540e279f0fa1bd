pub mod file_filter;
pub mod message_scanner;

pub use file_filter::FileFilter;
pub use message_scanner::{MessageFile, MessageScanner, ScanStatistics};

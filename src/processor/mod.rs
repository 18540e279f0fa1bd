pub mod file_processor;

pub use file_processor::{FileOutcome, FileProcessor, FileRecord, ProcessingProgress};

use crate::error::Result;
use crate::generator::DependencyGenerator;
use crate::scanner::MessageFile;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Generator succeeded and its output was persisted.
    Written { bytes: u64 },
    /// Generator or filesystem failed; nothing was written for this file.
    Failed { notice: String },
}

/// What happened to one message file, reported to the caller as soon as
/// the file is done.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub relative_path: PathBuf,
    pub destination_path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileRecord {
    pub fn is_written(&self) -> bool {
        matches!(self.outcome, FileOutcome::Written { .. })
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingProgress {
    pub files_processed: usize,
    pub files_written: usize,
    pub files_failed: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ProcessingProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            files_written: 0,
            files_failed: 0,
            total_files,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn record_written(&mut self, filename: String, bytes: u64) {
        self.files_processed += 1;
        self.files_written += 1;
        self.bytes_written += bytes;
        self.current_file = Some(filename);
    }

    pub fn record_failure(&mut self, filename: String, notice: &str) {
        self.files_processed += 1;
        self.files_failed += 1;
        self.errors
            .push(format!("Error processing {}: {}", filename, notice));
        self.current_file = Some(filename);
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let rate = self.files_processed as f64 / elapsed.as_secs_f64();
        let remaining_files = self.total_files - self.files_processed;

        if rate > 0.0 {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Runs the generator over a batch of message files and mirrors each
/// captured output into the destination tree.
///
/// One file failing never aborts the batch; the failure is recorded and
/// the loop moves on.
pub struct FileProcessor<'a> {
    generator: &'a dyn DependencyGenerator,
}

impl<'a> FileProcessor<'a> {
    pub fn new(generator: &'a dyn DependencyGenerator) -> Self {
        Self { generator }
    }

    pub fn process_files(
        &self,
        messages: &[MessageFile],
        source_root: &Path,
        destination_root: &Path,
        progress_callback: Option<&dyn Fn(&FileRecord, &ProcessingProgress)>,
    ) -> Result<ProcessingProgress> {
        let mut progress = ProcessingProgress::new(messages.len());

        for message in messages {
            let record = self.process_single(message, source_root, destination_root);

            match &record.outcome {
                FileOutcome::Written { bytes } => {
                    progress.record_written(message.display_path(), *bytes);
                }
                FileOutcome::Failed { notice } => {
                    progress.record_failure(message.display_path(), notice);
                }
            }

            if let Some(callback) = progress_callback {
                callback(&record, &progress);
            }
        }

        Ok(progress)
    }

    fn process_single(
        &self,
        message: &MessageFile,
        source_root: &Path,
        destination_root: &Path,
    ) -> FileRecord {
        let destination_path = destination_root.join(&message.relative_path);

        let outcome = match self.generate_and_write(message, source_root, &destination_path) {
            Ok(bytes) => FileOutcome::Written { bytes },
            Err(err) => FileOutcome::Failed {
                notice: err.notice_text(),
            },
        };

        FileRecord {
            relative_path: message.relative_path.clone(),
            destination_path,
            outcome,
        }
    }

    fn generate_and_write(
        &self,
        message: &MessageFile,
        source_root: &Path,
        destination_path: &Path,
    ) -> Result<u64> {
        let output = self.generator.generate(source_root, &message.source_path)?;

        // The destination directory is created only after the generator
        // succeeds; failed files must not leave empty directories behind.
        if let Some(parent) = destination_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(destination_path, &output.stdout)?;

        Ok(output.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MsgDepsError;
    use crate::generator::GeneratorOutput;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Test double keyed by file name: known names succeed with canned
    /// stdout, everything else fails with a fixed stderr.
    struct StubGenerator {
        outputs: HashMap<String, Vec<u8>>,
        stderr: String,
    }

    impl StubGenerator {
        fn new(outputs: &[(&str, &[u8])]) -> Self {
            Self {
                outputs: outputs
                    .iter()
                    .map(|(name, bytes)| (name.to_string(), bytes.to_vec()))
                    .collect(),
                stderr: "generator exploded".to_string(),
            }
        }
    }

    impl DependencyGenerator for StubGenerator {
        fn generate(&self, _source_root: &Path, source_file: &Path) -> Result<GeneratorOutput> {
            let name = source_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();

            match self.outputs.get(&name) {
                Some(bytes) => Ok(GeneratorOutput {
                    stdout: bytes.clone(),
                }),
                None => Err(MsgDepsError::GeneratorFailed {
                    path: source_file.display().to_string(),
                    stderr: self.stderr.clone(),
                }),
            }
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    fn message(relative: &str) -> MessageFile {
        let relative_path = PathBuf::from(relative);
        MessageFile::new(
            PathBuf::from("/src").join(&relative_path),
            relative_path,
            0,
        )
    }

    #[test]
    fn test_mixed_batch_isolates_failures() {
        let dest = TempDir::new().unwrap();
        let generator = StubGenerator::new(&[("b.msg", b"OUT_B")]);
        let processor = FileProcessor::new(&generator);

        let messages = vec![message("a/b.msg"), message("c.msg")];
        let progress = processor
            .process_files(&messages, Path::new("/src"), dest.path(), None)
            .unwrap();

        assert_eq!(progress.files_processed, 2);
        assert_eq!(progress.files_written, 1);
        assert_eq!(progress.files_failed, 1);
        assert_eq!(progress.bytes_written, 5);

        assert_eq!(
            fs::read(dest.path().join("a").join("b.msg")).unwrap(),
            b"OUT_B"
        );
        assert!(!dest.path().join("c.msg").exists());

        assert_eq!(progress.errors.len(), 1);
        assert!(progress.errors[0].contains("c.msg"));
        assert!(progress.errors[0].contains("generator exploded"));
    }

    #[test]
    fn test_failed_file_creates_no_directories() {
        let dest = TempDir::new().unwrap();
        let generator = StubGenerator::new(&[]);
        let processor = FileProcessor::new(&generator);

        let messages = vec![message("pkg/Broken.msg")];
        let progress = processor
            .process_files(&messages, Path::new("/src"), dest.path(), None)
            .unwrap();

        assert_eq!(progress.files_failed, 1);
        assert!(!dest.path().join("pkg").exists());
    }

    #[test]
    fn test_successful_rerun_overwrites_existing_output() {
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(dest.path().join("a")).unwrap();
        fs::write(dest.path().join("a").join("b.msg"), b"OLD").unwrap();

        let generator = StubGenerator::new(&[("b.msg", b"NEW")]);
        let processor = FileProcessor::new(&generator);

        processor
            .process_files(&[message("a/b.msg")], Path::new("/src"), dest.path(), None)
            .unwrap();

        assert_eq!(fs::read(dest.path().join("a").join("b.msg")).unwrap(), b"NEW");
    }

    #[test]
    fn test_failure_leaves_existing_output_untouched() {
        let dest = TempDir::new().unwrap();
        fs::write(dest.path().join("c.msg"), b"KEEP").unwrap();

        let generator = StubGenerator::new(&[]);
        let processor = FileProcessor::new(&generator);

        processor
            .process_files(&[message("c.msg")], Path::new("/src"), dest.path(), None)
            .unwrap();

        assert_eq!(fs::read(dest.path().join("c.msg")).unwrap(), b"KEEP");
    }

    #[test]
    fn test_callback_sees_each_record() {
        let dest = TempDir::new().unwrap();
        let generator = StubGenerator::new(&[("Good.msg", b"ok")]);
        let processor = FileProcessor::new(&generator);

        let seen = std::cell::RefCell::new(Vec::new());
        let callback = |record: &FileRecord, progress: &ProcessingProgress| {
            seen.borrow_mut()
                .push((record.display_path(), record.is_written(), progress.files_processed));
        };

        let messages = vec![message("Good.msg"), message("Bad.msg")];
        processor
            .process_files(&messages, Path::new("/src"), dest.path(), Some(&callback))
            .unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("Good.msg".to_string(), true, 1));
        assert_eq!(seen[1], ("Bad.msg".to_string(), false, 2));
    }

    #[test]
    fn test_empty_batch() {
        let dest = TempDir::new().unwrap();
        let generator = StubGenerator::new(&[]);
        let processor = FileProcessor::new(&generator);

        let progress = processor
            .process_files(&[], Path::new("/src"), dest.path(), None)
            .unwrap();

        assert_eq!(progress.files_processed, 0);
        assert_eq!(progress.percentage(), 0.0);
    }

    #[test]
    fn test_record_destination_mirrors_relative_path() {
        let dest = TempDir::new().unwrap();
        let generator = StubGenerator::new(&[("b.msg", b"x")]);
        let processor = FileProcessor::new(&generator);

        let captured = std::cell::RefCell::new(None);
        let callback = |record: &FileRecord, _: &ProcessingProgress| {
            *captured.borrow_mut() = Some(record.clone());
        };

        processor
            .process_files(&[message("a/b.msg")], Path::new("/src"), dest.path(), Some(&callback))
            .unwrap();

        let record = captured.into_inner().unwrap();
        assert_eq!(record.destination_path, dest.path().join("a").join("b.msg"));
        assert!(record.is_written());
    }

    #[test]
    fn test_progress_tracking() {
        let mut progress = ProcessingProgress::new(10);

        assert_eq!(progress.percentage(), 0.0);

        progress.record_written("a.msg".to_string(), 100);
        assert_eq!(progress.percentage(), 10.0);
        assert_eq!(progress.bytes_written, 100);
        assert_eq!(progress.files_written, 1);

        progress.record_failure("b.msg".to_string(), "boom");
        assert_eq!(progress.files_failed, 1);
        assert_eq!(progress.errors.len(), 1);
        assert_eq!(progress.errors[0], "Error processing b.msg: boom");
    }
}

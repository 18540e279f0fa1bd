pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod processor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DiscoveryConfig, GeneratorConfig};
pub use error::{MsgDepsError, Result, UserFriendlyError};

// Core functionality re-exports
pub use generator::{CommandGenerator, DependencyGenerator, GeneratorOutput};
pub use processor::{FileOutcome, FileProcessor, FileRecord, ProcessingProgress};
pub use scanner::{FileFilter, MessageFile, MessageScanner, ScanStatistics};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface for dependency generation
pub struct MsgDeps {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl MsgDeps {
    /// Create a new MsgDeps instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new MsgDeps instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create MsgDeps instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Run the generator over every message file under `source` and mirror
    /// the captured output into `destination`.
    ///
    /// Individual file failures are reported and counted but never abort
    /// the run; the returned progress carries the final tallies.
    pub fn generate(&self, source: &Path, destination: &Path) -> Result<ProcessingProgress> {
        // Validate the operation can proceed
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .start_operation("Starting dependency generation");

        let source_root = resolve_source_root(source)?;
        let destination_root = resolve_destination_root(destination)?;

        // Step 1: Discover message files
        let messages = self.scan_messages(&source_root)?;
        self.shutdown.check_shutdown()?;

        if messages.is_empty() {
            self.output_formatter.warning(&format!(
                "No *{} files found under {}",
                MessageScanner::new(&self.config.discovery).file_suffix(),
                source_root.display()
            ));
            return Ok(ProcessingProgress::new(0));
        }

        self.output_formatter
            .info(&format!("Found {} message files", messages.len()));

        // Step 2: Run the generator per file
        let progress = self.process_messages(&messages, &source_root, &destination_root)?;
        self.shutdown.check_shutdown()?;

        // Display summary
        self.output_formatter.print_run_summary(&progress);

        Ok(progress)
    }

    /// Discover message files without processing them (dry-run support).
    pub fn discover(&self, source: &Path) -> Result<Vec<MessageFile>> {
        let source_root = resolve_source_root(source)?;
        self.scan_messages(&source_root)
    }

    /// Scan for message files
    fn scan_messages(&self, source_root: &Path) -> Result<Vec<MessageFile>> {
        self.output_formatter
            .start_operation("Scanning for message files");

        let spinner = self.progress_manager.create_spinner("Scanning source tree");

        let scanner = MessageScanner::new(&self.config.discovery);
        let messages = scanner.scan_directory(source_root);

        spinner.finish_and_clear();

        let messages = messages?;

        // Display scan statistics if verbose
        let stats = scanner.get_statistics(&messages);
        self.output_formatter.debug(&stats.display_summary());

        Ok(messages)
    }

    /// Process files with progress tracking
    fn process_messages(
        &self,
        messages: &[MessageFile],
        source_root: &Path,
        destination_root: &Path,
    ) -> Result<ProcessingProgress> {
        self.output_formatter
            .start_operation("Generating dependency files");

        let generator = CommandGenerator::new(&self.config.generator.command)?;
        self.output_formatter
            .debug(&format!("Generator command: {}", generator.describe()));

        let file_progress = self
            .progress_manager
            .create_file_progress(messages.len() as u64);

        let progress_callback = {
            let pb = file_progress.clone();
            move |record: &FileRecord, progress: &ProcessingProgress| {
                self.progress_manager.suspend(|| match &record.outcome {
                    FileOutcome::Written { .. } => self.output_formatter.file_written(record),
                    FileOutcome::Failed { notice } => {
                        self.output_formatter.file_failed(record, notice)
                    }
                });
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let processor = FileProcessor::new(&generator);
        let progress = processor.process_files(
            messages,
            source_root,
            destination_root,
            Some(&progress_callback),
        )?;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Generated {} files", progress.files_written),
            progress.elapsed(),
        );

        Ok(progress)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(MsgDepsError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Get progress manager reference
    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &MsgDepsError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// The source root must be an existing directory; anything else is the
/// caller passing a bad tree and is rejected before any discovery runs.
fn resolve_source_root(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(MsgDepsError::InvalidSource {
            path: path.display().to_string(),
        });
    }

    path.canonicalize().map_err(MsgDepsError::Io)
}

/// The destination root need not exist yet; it is only materialized when
/// the first generated file is written beneath it.
fn resolve_destination_root(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

use crate::error::{MsgDepsError, UserFriendlyError};
use crate::processor::{FileRecord, ProcessingProgress};
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Unicode glyphs that degrade to plain ASCII markers
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

/// Notice severity; decides styling and the output stream.
#[derive(Clone, Copy)]
enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Success => "SUCCESS",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
        }
    }

    fn json_level(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
        }
    }

    fn emoji(self) -> Emoji<'static, 'static> {
        match self {
            Level::Success => CHECKMARK,
            Level::Error => CROSS,
            Level::Warning => WARNING,
            Level::Info => INFO,
        }
    }

    fn ascii_prefix(self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Error => "✗",
            Level::Warning => "!",
            Level::Info => "i",
        }
    }

    fn paint(self, message: &str) -> console::StyledObject<&str> {
        match self {
            Level::Success => style(message).green().bold(),
            Level::Error => style(message).red().bold(),
            Level::Warning => style(message).yellow().bold(),
            Level::Info => style(message).cyan(),
        }
    }

    /// Errors go to stderr so stdout stays machine-consumable.
    fn to_stderr(self) -> bool {
        matches!(self, Level::Error)
    }
}

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors =
            mode == OutputMode::Human && !quiet && Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Leveled notices
    pub fn success(&self, message: &str) {
        self.notice(Level::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.notice(Level::Error, message);
    }

    pub fn warning(&self, message: &str) {
        if self.should_show(0) {
            self.notice(Level::Warning, message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show(1) {
            self.notice(Level::Info, message);
        }
    }

    pub fn debug(&self, message: &str) {
        if !self.should_show(2) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("  {}", style(message).dim());
                } else {
                    println!("  DEBUG: {}", message);
                }
            }
            OutputMode::Json => self.json_message("debug", message),
            OutputMode::Plain => println!("DEBUG: {}", message),
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if !self.should_show(1) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}{}", ROCKET, style(operation).bold());
                } else {
                    println!("> {}", operation);
                }
            }
            OutputMode::Json => self.json_message("operation_start", operation),
            OutputMode::Plain => println!("STARTING: {}", operation),
        }
    }

    /// One generated file was persisted. The `Processed: <relative> ->
    /// <destination>` line is the tool's primary stdout contract and keeps
    /// the same shape in every non-JSON mode.
    pub fn file_written(&self, record: &FileRecord) {
        if !self.should_show(0) {
            return;
        }

        match self.mode {
            OutputMode::Json => self.json_line(serde_json::json!({
                "type": "file",
                "status": "written",
                "path": record.display_path(),
                "destination": record.destination_path.display().to_string(),
            })),
            _ => println!(
                "Processed: {} -> {}",
                record.display_path(),
                record.destination_path.display()
            ),
        }
    }

    /// One file failed; the diagnostic goes to stderr so batch output
    /// stays machine-consumable.
    pub fn file_failed(&self, record: &FileRecord, notice: &str) {
        match self.mode {
            OutputMode::Json => self.json_line(serde_json::json!({
                "type": "file",
                "status": "failed",
                "path": record.display_path(),
                "error": notice,
            })),
            _ => eprintln!("Error processing {}: {}", record.display_path(), notice),
        }
    }

    pub fn print_user_friendly_error(&self, error: &MsgDepsError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    println!();
                    if self.use_colors {
                        let text = format!("Suggestion: {}", suggestion);
                        println!("{}{}", INFO, style(&text).cyan());
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => self.json_line(serde_json::json!({
                    "type": "suggestion",
                    "message": suggestion,
                })),
                OutputMode::Plain => println!("SUGGESTION: {}", suggestion),
            }
        }
    }

    pub fn print_run_summary(&self, progress: &ProcessingProgress) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(progress),
            OutputMode::Json => self.print_json_summary(progress),
            OutputMode::Plain => self.print_plain_summary(progress),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => self.json_line(serde_json::json!({
                "type": "header",
                "title": title,
            })),
            OutputMode::Plain => println!("=== {} ===", title),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    fn should_show(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn notice(&self, level: Level, message: &str) {
        let line = match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    format!("{}{}", level.emoji(), level.paint(message))
                } else {
                    format!("{} {}", level.ascii_prefix(), message)
                }
            }
            OutputMode::Json => {
                self.json_message(level.json_level(), message);
                return;
            }
            OutputMode::Plain => format!("{}: {}", level.tag(), message),
        };

        if level.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn json_message(&self, level: &str, message: &str) {
        self.json_line(serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));
    }

    fn json_line(&self, value: serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, progress: &ProcessingProgress) {
        println!();
        self.print_separator();

        let headline = "Dependency generation completed!";
        if self.use_colors {
            println!("{} {}", style(headline).green().bold(), CHECKMARK);
        } else {
            println!("✓ {}", headline);
        }
        println!();

        let rows = [
            ("Files processed:", progress.files_processed.to_string()),
            ("Files written:  ", progress.files_written.to_string()),
            ("Bytes written:  ", format_bytes(progress.bytes_written)),
            ("Time taken:     ", format_duration(progress.elapsed())),
        ];
        for (label, value) in rows {
            if self.use_colors {
                println!("  {} {}", label, style(value).cyan().bold());
            } else {
                println!("  {} {}", label, value);
            }
        }

        if progress.files_failed > 0 {
            println!("  Failures:        {}", progress.files_failed);
        }

        self.print_separator();
    }

    fn print_json_summary(&self, progress: &ProcessingProgress) {
        let summary = serde_json::json!({
            "type": "summary",
            "files_processed": progress.files_processed,
            "files_written": progress.files_written,
            "files_failed": progress.files_failed,
            "bytes_written": progress.bytes_written,
            "duration_ms": progress.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_plain_summary(&self, progress: &ProcessingProgress) {
        println!("COMPLETED: Dependency generation");
        println!("Files processed: {}", progress.files_processed);
        println!("Files written: {}", progress.files_written);
        println!("Bytes written: {}", progress.bytes_written);
        println!("Duration: {:?}", progress.elapsed());
        if progress.files_failed > 0 {
            println!("Failures: {}", progress.files_failed);
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    match bytes {
        b if b >= 1 << 30 => format!("{:.1} GB", b as f64 / (1u64 << 30) as f64),
        b if b >= 1 << 20 => format!("{:.1} MB", b as f64 / (1u64 << 20) as f64),
        b if b >= 1 << 10 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{} B", b),
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{}ms", duration.as_millis()),
        1..=59 => format!("{}s", secs),
        _ => format!("{}m {}s", secs / 60, secs % 60),
    }
}

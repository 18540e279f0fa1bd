use crate::processor::ProcessingProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Owns the terminal progress bars. Disabled bars are hidden stand-ins,
/// so callers never branch on quiet mode themselves.
pub struct ProgressManager {
    bars: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            bars: MultiProgress::new(),
            enabled,
        }
    }

    /// Bar covering the per-file processing phase.
    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style =
            ProgressStyle::with_template("{msg} [{bar:36.cyan/blue}] {pos}/{len} files ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");

        let pb = self.bars.add(ProgressBar::new(total_files));
        pb.set_style(style);
        pb.set_message("Generating dependencies");
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    /// Spinner for the discovery phase, which has no known length.
    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.bars.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    /// Run `f` with all bars hidden so its output lands on clean lines.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.bars.suspend(f)
        } else {
            f()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_file_progress(pb: &ProgressBar, progress: &ProcessingProgress) {
    pb.set_position(progress.files_processed as u64);

    match progress.current_file {
        Some(ref current_file) => {
            pb.set_message(format!("{}{}", current_file, eta_hint(progress)))
        }
        None => pb.set_message("Generating dependencies"),
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    pb.finish_with_message(format!("{} in {}", message, format_duration(duration)));
}

fn eta_hint(progress: &ProcessingProgress) -> String {
    if progress.files_processed == 0 {
        return String::new();
    }

    let remaining = progress.estimated_remaining();
    if remaining.as_secs() == 0 {
        return String::new();
    }

    format!(" (ETA {})", format_duration(remaining))
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{}ms", duration.as_millis()),
        1..=59 => format!("{}s", secs),
        _ => format!("{}m {}s", secs / 60, secs % 60),
    }
}

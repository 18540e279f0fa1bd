use crate::config::DiscoveryConfig;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    suffix: String,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &DiscoveryConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            suffix: format!(".{}", config.extension.to_lowercase()),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        }
    }

    /// A qualifying file is one whose name ends with the configured
    /// extension. Comparison is case-insensitive, so `Pose.MSG` matches
    /// when scanning for `msg`.
    pub fn is_message_file(&self, path: &Path) -> bool {
        if let Some(filename) = path.file_name().and_then(|s| s.to_str()) {
            return filename.to_lowercase().ends_with(&self.suffix);
        }

        false
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        if let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) {
            let dir_name_lower = dir_name.to_lowercase();

            // Check against excluded directories
            if self
                .exclude_dirs
                .iter()
                .any(|exclude| exclude.to_lowercase() == dir_name_lower)
            {
                return false;
            }

            // Check against exclude patterns
            let path_str = path.to_string_lossy();
            for pattern in &self.exclude_patterns {
                if pattern.is_match(&path_str) {
                    return false;
                }
            }
        }

        true
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    /// The suffix qualifying files must carry, including the leading dot.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn exclude_dirs(&self) -> &Vec<String> {
        &self.exclude_dirs
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        let config = DiscoveryConfig::default();
        Self::new(&config)
    }
}

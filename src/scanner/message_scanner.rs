use crate::config::DiscoveryConfig;
use crate::error::{MsgDepsError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct MessageFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl MessageFile {
    pub fn new(source_path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            source_path,
            relative_path,
            filename,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }

    /// Directory the file lives in, relative to the source root.
    /// Top-level files report ".".
    pub fn parent_dir(&self) -> String {
        self.relative_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ".".to_string())
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

pub struct MessageScanner {
    filter: FileFilter,
    max_depth: Option<usize>,
}

impl MessageScanner {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            max_depth: config.max_depth,
        }
    }

    pub fn file_suffix(&self) -> &str {
        self.filter.suffix()
    }

    /// Walk the tree under `root` and collect every qualifying file.
    /// An empty result is not an error; the caller decides how to report
    /// a tree with nothing to process.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<MessageFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(MsgDepsError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(MsgDepsError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut messages = Vec::new();
        let mut scan_errors = Vec::new();

        let mut walker = WalkDir::new(root_path).follow_links(false);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker.into_iter().filter_entry(|e| self.should_traverse(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // Log permission errors but continue scanning
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        scan_errors.push(format!("Permission denied: {}", err));
                    } else {
                        scan_errors.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            if entry.file_type().is_file() {
                match self.process_file(&entry, root_path) {
                    Ok(Some(message)) => messages.push(message),
                    Ok(None) => {} // File filtered out
                    Err(err) => {
                        scan_errors.push(format!(
                            "Error reading {}: {}",
                            entry.path().display(),
                            err
                        ));
                    }
                }
            }
        }

        // Surface scan errors only when they left us with nothing at all
        if !scan_errors.is_empty() && messages.is_empty() {
            return Err(MsgDepsError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("Multiple scan errors: {}", scan_errors.join(", ")),
            )));
        }

        // Sort by relative path for consistent output
        messages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(messages)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        // Always allow traversing files
        if entry.file_type().is_file() {
            return true;
        }

        // Always allow traversing the root directory (depth 0)
        if entry.depth() == 0 {
            return true;
        }

        if entry.file_type().is_dir() {
            return self.filter.should_traverse_directory(entry.path());
        }

        true
    }

    fn process_file(&self, entry: &DirEntry, root_path: &Path) -> Result<Option<MessageFile>> {
        let path = entry.path();

        if !self.filter.is_message_file(path) {
            return Ok(None);
        }

        let metadata = entry.metadata().map_err(|e| MsgDepsError::Io(e.into()))?;
        let relative_path = self.calculate_relative_path(path, root_path)?;

        Ok(Some(MessageFile::new(
            path.to_path_buf(),
            relative_path,
            metadata.len(),
        )))
    }

    fn calculate_relative_path(&self, file_path: &Path, root_path: &Path) -> Result<PathBuf> {
        let relative =
            file_path
                .strip_prefix(root_path)
                .map_err(|_| MsgDepsError::InvalidPath {
                    path: format!(
                        "Cannot calculate relative path for {} from root {}",
                        file_path.display(),
                        root_path.display()
                    ),
                })?;

        // Security: Ensure the relative path doesn't contain parent directory references
        if relative
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(MsgDepsError::InvalidPath {
                path: format!(
                    "Path contains parent directory references: {}",
                    relative.display()
                ),
            });
        }

        Ok(relative.to_path_buf())
    }

    pub fn get_statistics(&self, messages: &[MessageFile]) -> ScanStatistics {
        let total_files = messages.len();
        let total_size = messages.iter().map(|m| m.size).sum();

        // Group by containing directory
        let mut files_by_directory = std::collections::HashMap::new();
        for message in messages {
            *files_by_directory.entry(message.parent_dir()).or_insert(0) += 1;
        }

        // Find largest file
        let (largest_file_size, largest_file_path) = messages
            .iter()
            .max_by_key(|m| m.size)
            .map(|m| (m.size, m.relative_path.clone()))
            .unwrap_or((0, PathBuf::new()));

        ScanStatistics {
            total_files,
            total_size,
            files_by_directory,
            largest_file_size,
            largest_file_path,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_directory: std::collections::HashMap<String, usize>,
    pub largest_file_size: u64,
    pub largest_file_path: PathBuf,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if !self.files_by_directory.is_empty() {
            summary.push_str("  Files by directory:\n");
            let mut directories: Vec<_> = self.files_by_directory.iter().collect();
            directories.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (directory, count) in directories {
                summary.push_str(&format!("    {}: {} files\n", directory, count));
            }
        }

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                self.largest_file_path.display(),
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config() -> DiscoveryConfig {
        DiscoveryConfig {
            extension: "msg".to_string(),
            exclude_dirs: vec![],
            exclude_patterns: vec![],
            max_depth: None,
        }
    }

    #[test]
    fn test_message_file_creation() {
        let message = MessageFile::new(
            PathBuf::from("/src/geometry/Pose.msg"),
            PathBuf::from("geometry/Pose.msg"),
            64,
        );

        assert_eq!(message.filename, "Pose.msg");
        assert_eq!(message.size, 64);
        assert_eq!(message.parent_dir(), "geometry");
        assert_eq!(message.display_path(), "geometry/Pose.msg");
    }

    #[test]
    fn test_top_level_parent_dir() {
        let message = MessageFile::new(
            PathBuf::from("/src/Status.msg"),
            PathBuf::from("Status.msg"),
            10,
        );

        assert_eq!(message.parent_dir(), ".");
    }

    #[test]
    fn test_scan_finds_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("a")).unwrap();
        fs::write(root.join("a").join("b.msg"), "string data").unwrap();
        fs::write(root.join("c.msg"), "int32 x").unwrap();
        fs::write(root.join("ignored.txt"), "not a message").unwrap();

        let scanner = MessageScanner::new(&create_test_config());
        let messages = scanner.scan_directory(root).unwrap();

        let paths: Vec<String> = messages.iter().map(|m| m.display_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("a").join("b.msg").display().to_string(),
                "c.msg".to_string()
            ]
        );
    }

    #[test]
    fn test_scan_is_case_insensitive_on_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("UPPER.MSG"), "bool flag").unwrap();

        let scanner = MessageScanner::new(&create_test_config());
        let messages = scanner.scan_directory(root).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].filename, "UPPER.MSG");
    }

    #[test]
    fn test_scan_respects_excluded_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("build")).unwrap();
        fs::write(root.join("build").join("Generated.msg"), "x").unwrap();
        fs::write(root.join("Real.msg"), "y").unwrap();

        let mut config = create_test_config();
        config.exclude_dirs = vec!["build".to_string()];

        let scanner = MessageScanner::new(&config);
        let messages = scanner.scan_directory(root).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].filename, "Real.msg");
    }

    #[test]
    fn test_scan_respects_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a").join("deep")).unwrap();
        fs::write(root.join("a").join("deep").join("Buried.msg"), "x").unwrap();
        fs::write(root.join("Top.msg"), "y").unwrap();

        let mut config = create_test_config();
        config.max_depth = Some(1);

        let scanner = MessageScanner::new(&config);
        let messages = scanner.scan_directory(root).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].filename, "Top.msg");
    }

    #[test]
    fn test_scan_of_empty_tree_is_ok() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = MessageScanner::new(&create_test_config());
        let messages = scanner.scan_directory(temp_dir.path()).unwrap();

        assert!(messages.is_empty());
    }

    #[test]
    fn test_scan_rejects_missing_directory() {
        let scanner = MessageScanner::new(&create_test_config());
        let result = scanner.scan_directory("/no/such/source/tree");

        assert!(matches!(result, Err(MsgDepsError::InvalidPath { .. })));
    }

    #[test]
    fn test_scan_rejects_file_as_root() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("single.msg");
        fs::write(&file_path, "x").unwrap();

        let scanner = MessageScanner::new(&create_test_config());
        let result = scanner.scan_directory(&file_path);

        assert!(matches!(result, Err(MsgDepsError::InvalidPath { .. })));
    }

    #[test]
    fn test_scan_statistics() {
        let messages = vec![
            MessageFile::new(
                PathBuf::from("/src/geometry/Pose.msg"),
                PathBuf::from("geometry/Pose.msg"),
                100,
            ),
            MessageFile::new(
                PathBuf::from("/src/geometry/Twist.msg"),
                PathBuf::from("geometry/Twist.msg"),
                200,
            ),
            MessageFile::new(PathBuf::from("/src/Top.msg"), PathBuf::from("Top.msg"), 50),
        ];

        let scanner = MessageScanner::new(&create_test_config());
        let stats = scanner.get_statistics(&messages);

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 350);
        assert_eq!(stats.files_by_directory.get("geometry"), Some(&2));
        assert_eq!(stats.files_by_directory.get("."), Some(&1));
        assert_eq!(stats.largest_file_size, 200);

        let summary = stats.display_summary();
        assert!(summary.contains("Total files: 3"));
        assert!(summary.contains("geometry: 2 files"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
    }
}

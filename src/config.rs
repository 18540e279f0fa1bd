use crate::error::{MsgDepsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub generator: GeneratorConfig,
}

// Partial config files are the norm; anything omitted falls back to the
// defaults below.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub extension: String,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub command: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: "msg".to_string(),
            // Empty by default so every qualifying file in the tree is found;
            // colcon workspaces typically add "build", "install", "log".
            exclude_dirs: Vec::new(),
            exclude_patterns: Vec::new(),
            max_depth: None, // unlimited
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: vec!["npx".to_string(), "gendeps2".to_string()],
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MsgDepsError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MsgDepsError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| MsgDepsError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["msgdeps.toml", "msgdeps.config.toml", ".msgdeps.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref extension) = cli_args.extension {
            self.discovery.extension = normalize_extension(extension);
        }

        if let Some(ref exclude) = cli_args.exclude {
            self.discovery.exclude_dirs.extend(exclude.clone());
        }

        if let Some(max_depth) = cli_args.max_depth {
            self.discovery.max_depth = Some(max_depth);
        }

        if let Some(ref generator) = cli_args.generator {
            let command: Vec<String> = generator
                .split_whitespace()
                .map(|s| s.to_string())
                .collect();
            if !command.is_empty() {
                self.generator.command = command;
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| MsgDepsError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| MsgDepsError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.discovery.extension.trim().is_empty() {
            return Err(MsgDepsError::Config {
                message: "A file extension must be specified".to_string(),
            });
        }

        if self.discovery.max_depth == Some(0) {
            return Err(MsgDepsError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        if self
            .generator
            .command
            .first()
            .map(|p| p.trim().is_empty())
            .unwrap_or(true)
        {
            return Err(MsgDepsError::Config {
                message: "Generator command must name a program to run".to_string(),
            });
        }

        Ok(())
    }

    /// The generator command line as a single displayable string.
    pub fn generator_display(&self) -> String {
        self.generator.command.join(" ")
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

/// Extensions are stored without a leading dot and compared case-insensitively.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub extension: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub generator: Option<String>,
    pub max_depth: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

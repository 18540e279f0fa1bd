use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsgDepsError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source path is not a valid directory: {path}")]
    InvalidSource { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to launch generator '{command}': {message}")]
    GeneratorLaunch { command: String, message: String },

    #[error("Generator failed for {path}: {stderr}")]
    GeneratorFailed { path: String, stderr: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl MsgDepsError {
    /// Text carried into the per-file error notice: the captured stderr of
    /// the generator when there is any, the error message otherwise.
    pub fn notice_text(&self) -> String {
        match self {
            MsgDepsError::GeneratorFailed { stderr, .. } if !stderr.is_empty() => stderr.clone(),
            other => other.to_string(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for MsgDepsError {
    fn user_message(&self) -> String {
        match self {
            MsgDepsError::InvalidSource { path } => {
                format!("Source path is not a valid directory: {}", path)
            }
            MsgDepsError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            MsgDepsError::GeneratorLaunch { command, message } => {
                format!("Could not launch generator '{}': {}", command, message)
            }
            MsgDepsError::GeneratorFailed { path, stderr } => {
                format!("Generator failed for {}: {}", path, stderr)
            }
            MsgDepsError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            MsgDepsError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            MsgDepsError::InvalidSource { .. } => Some(
                "Check that the source path exists and points to a directory containing message files.".to_string()
            ),
            MsgDepsError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            MsgDepsError::GeneratorLaunch { .. } => Some(
                "Verify the generator command is installed and on PATH, or point --generator at the right executable.".to_string()
            ),
            MsgDepsError::GeneratorFailed { .. } => Some(
                "Run the generator manually on the file to reproduce the error; other files are still processed.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for MsgDepsError {
    fn from(error: toml::de::Error) -> Self {
        MsgDepsError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MsgDepsError>;

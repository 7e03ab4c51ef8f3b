//! Error types for mdlive
//!
//! The annotator itself never fails. Errors only appear at the edges:
//! reading documents and loading configuration. Export failures live with
//! the exporter in `markdown::export`.

use std::path::PathBuf;
use thiserror::Error;

/// File I/O related errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when accessing file
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// File is too large to open
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    TooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File encoding error (non-UTF-8)
    #[error("Unable to read file as text. File may be binary or use unsupported encoding: {path}")]
    EncodingError { path: PathBuf },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing file
    #[error("Could not write file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path is not a file
    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration from {path}")]
    LoadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl FileError {
    /// Create a user-friendly error message suitable for the terminal
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotFound(_) => {
                "The file could not be found. It may have been moved or deleted.".to_string()
            }
            FileError::PermissionDenied { .. } => {
                "You don't have permission to access this file. Check file permissions.".to_string()
            }
            FileError::TooLarge { max_size, .. } => {
                format!(
                    "This file is too large to annotate. Maximum file size is {} bytes.",
                    max_size
                )
            }
            FileError::EncodingError { .. } => {
                "This file cannot be opened as text. It may be a binary file or use an unsupported encoding.".to_string()
            }
            FileError::WriteError { .. } => {
                "Could not write the output. Check disk space and permissions.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Map an I/O error on `path` to the matching file error
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound(path),
            std::io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            std::io::ErrorKind::InvalidData => FileError::EncodingError { path },
            _ => FileError::ReadError { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FileError::NotFound(PathBuf::from("/test/file.md"));
        assert!(err.to_string().contains("/test/file.md"));
    }

    #[test]
    fn test_file_error_user_message() {
        let err = FileError::PermissionDenied {
            path: PathBuf::from("/test/file.md"),
        };
        let msg = err.user_message();
        assert!(msg.contains("permission"));
    }

    #[test]
    fn test_from_io_maps_kinds() {
        let path = PathBuf::from("/missing.md");
        let err = FileError::from_io(
            path.clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, FileError::NotFound(p) if p == path));

        let err = FileError::from_io(
            path,
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(matches!(err, FileError::ReadError { .. }));
    }

    #[test]
    fn test_config_error_names_key() {
        let err = ConfigError::InvalidValue {
            key: "theme.base_font_size".to_string(),
            reason: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("theme.base_font_size"));
    }
}

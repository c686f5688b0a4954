//! Error handling for revline-store
//!
//! Wraps revline-core ExError with file-boundary helpers

use std::path::Path;

use revline_core::errors::{ExError, ExErrorKind, RevlineError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for a file operation
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_entity_id(path.display().to_string())
        .with_message(format!("{}: {}", path.display(), err))
}

/// Attach the operation and file to an engine error
pub fn file_error(operation: &str, path: &Path, err: RevlineError) -> ExError {
    let message = format!("{}: {}", path.display(), err);
    ExError::from(err)
        .with_op(operation.to_string())
        .with_entity_id(path.display().to_string())
        .with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_carries_path() {
        let err = io_error(
            "read_snapshot",
            Path::new("/tmp/missing.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.op(), Some("read_snapshot"));
        assert_eq!(err.entity_id(), Some("/tmp/missing.json"));
        assert!(err.message().contains("gone"));
    }

    #[test]
    fn test_file_error_keeps_engine_kind() {
        let err = file_error(
            "read_diff_report",
            Path::new("diff.json"),
            RevlineError::InvalidDiffReport {
                reason: "root must be an object".to_string(),
            },
        );
        assert_eq!(err.kind(), ExErrorKind::InvalidDiffReport);
        assert_eq!(err.code(), "ERR_INVALID_DIFF_REPORT");
        assert!(err.message().contains("root must be an object"));
    }
}

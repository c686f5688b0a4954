use thiserror::Error;

use crate::snapshot::EntityKind;

/// Result type alias using RevlineError
pub type Result<T> = std::result::Result<T, RevlineError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (job runners, tests)
/// can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    NotFound,
    AlreadyExists,
    KindConflict,

    // Inputs
    /// Snapshot document is unreadable or structurally invalid
    InvalidSnapshot,
    /// Diff report is not valid JSON or has the wrong shape
    InvalidDiffReport,
    /// Merge configuration failed validation
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::KindConflict => "ERR_KIND_CONFLICT",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::InvalidDiffReport => "ERR_INVALID_DIFF_REPORT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context for debugging.
/// The file boundary (`revline-store`) uses this as its error type directly.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity (persistent identifier) context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (global_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for merge-engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevlineError {
    // ===== Snapshot Graph Errors =====
    /// An entity with this persistent identifier already exists
    #[error("Entity already exists: {global_id} ({existing:?})")]
    AlreadyExists {
        global_id: String,
        existing: EntityKind,
    },

    /// The identifier exists but belongs to a different entity kind
    #[error("Identifier {global_id} is a {actual:?}, expected {expected:?}")]
    KindConflict {
        global_id: String,
        expected: EntityKind,
        actual: EntityKind,
    },

    #[error("Element not found: {element_id}")]
    ElementNotFound { element_id: String },

    #[error("Revision not found: {revision_id}")]
    RevisionNotFound { revision_id: String },

    #[error("Assignment not found: {assignment_id}")]
    AssignmentNotFound { assignment_id: String },

    #[error("Metadata record not found: {record_id}")]
    MetadataRecordNotFound { record_id: String },

    // ===== Input Errors =====
    /// Snapshot document could not be interpreted
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// Diff report is not valid JSON or has the wrong structure
    #[error("Invalid diff report: {reason}")]
    InvalidDiffReport { reason: String },

    /// Merge configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Encoding Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<RevlineError> for ExError {
    fn from(err: RevlineError) -> Self {
        match err {
            RevlineError::AlreadyExists {
                global_id,
                existing,
            } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(global_id)
                .with_message(format!("Identifier already used by a {:?}", existing)),

            RevlineError::KindConflict {
                global_id,
                expected,
                actual,
            } => ExError::new(ExErrorKind::KindConflict)
                .with_entity_id(global_id)
                .with_message(format!("Expected {:?}, found {:?}", expected, actual)),

            RevlineError::ElementNotFound { element_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(element_id)
                .with_message("Element not found"),

            RevlineError::RevisionNotFound { revision_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(revision_id)
                .with_message("Revision not found"),

            RevlineError::AssignmentNotFound { assignment_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(assignment_id)
                    .with_message("Assignment not found")
            }

            RevlineError::MetadataRecordNotFound { record_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(record_id)
                    .with_message("Metadata record not found")
            }

            RevlineError::InvalidSnapshot { reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(reason)
            }

            RevlineError::InvalidDiffReport { reason } => {
                ExError::new(ExErrorKind::InvalidDiffReport).with_message(reason)
            }

            RevlineError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            RevlineError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to RevlineError
impl From<serde_json::Error> for RevlineError {
    fn from(err: serde_json::Error) -> Self {
        RevlineError::Serialization {
            message: err.to_string(),
        }
    }
}

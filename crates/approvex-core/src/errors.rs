use approvex_core_types::AttemptId;
use thiserror::Error;

/// Result type alias using ApprovalError
pub type Result<T> = std::result::Result<T, ApprovalError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and in test assertions. Only environment-level failures
/// travel as errors; assertion failures are reported through match outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidPath,

    // Approval files
    ApprovedFileUnreadable,
    NotApprovedFileUnwritable,
    ApprovedFileExists,
    NotApprovedFileMissing,

    // Serialization
    /// A reference cycle reached the serializer through a type that was exempted from detection
    UnresolvedCycle,
    Serialization,

    // Integration/IO
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::ApprovedFileUnreadable => "ERR_APPROVED_FILE_UNREADABLE",
            ExErrorKind::NotApprovedFileUnwritable => "ERR_NOT_APPROVED_FILE_UNWRITABLE",
            ExErrorKind::ApprovedFileExists => "ERR_APPROVED_FILE_EXISTS",
            ExErrorKind::NotApprovedFileMissing => "ERR_NOT_APPROVED_FILE_MISSING",
            ExErrorKind::UnresolvedCycle => "ERR_UNRESOLVED_CYCLE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the file and
/// attempt context needed to track an environment failure down.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    file: Option<String>,
    type_name: Option<String>,
    attempt_id: Option<AttemptId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            file: None,
            type_name: None,
            attempt_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file context
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Add type name context
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Add match attempt context
    pub fn with_attempt_id(mut self, attempt_id: AttemptId) -> Self {
        self.attempt_id = Some(attempt_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file context, if any
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Get the type name context, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Get the match attempt context, if any
    pub fn attempt_id(&self) -> Option<&AttemptId> {
        self.attempt_id.as_ref()
    }

    /// Get the error message
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
        if let Some(file) = &self.file {
            write!(f, " (file: {})", file)?;
        }
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {})", type_name)?;
        }
        if let Some(attempt_id) = &self.attempt_id {
            write!(f, " (attempt_id: {})", attempt_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Environment failures raised while running a match attempt
///
/// These signal a broken test environment rather than a broken assertion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApprovalError {
    /// Approved file exists but could not be read
    #[error("Exception while initializing expected from file: {path}: {reason}")]
    ApprovedFileUnreadable { path: String, reason: String },

    /// Not-approved candidate could not be written
    #[error("Exception while creating not approved file {path}: {reason}")]
    NotApprovedFileUnwritable { path: String, reason: String },

    /// Promotion refused because the approved file is already present
    #[error("Approved file already exists: {path}")]
    ApprovedFileExists { path: String },

    /// Promotion requested for a candidate that is not on disk
    #[error("Not approved file not found: {path}")]
    NotApprovedFileMissing { path: String },

    /// File name does not follow the approval naming convention
    #[error("Not an approval file name: {path}")]
    InvalidApprovalFileName { path: String },

    /// A caller-supplied regular expression does not compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A reference cycle went through a type that was exempted from detection
    #[error("Unresolved reference cycle through type {type_name}")]
    UnresolvedCycle { type_name: String },

    /// Generic IO failure outside the approval file paths
    #[error("IO error during {op}: {reason}")]
    Io { op: String, reason: String },

    /// Serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Unexpected internal state
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<ApprovalError> for ExError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::ApprovedFileUnreadable { path, reason } => {
                ExError::new(ExErrorKind::ApprovedFileUnreadable)
                    .with_op("read_approved")
                    .with_file(path)
                    .with_message(reason)
            }

            ApprovalError::NotApprovedFileUnwritable { path, reason } => {
                ExError::new(ExErrorKind::NotApprovedFileUnwritable)
                    .with_op("write_not_approved")
                    .with_file(path)
                    .with_message(reason)
            }

            ApprovalError::ApprovedFileExists { path } => {
                ExError::new(ExErrorKind::ApprovedFileExists)
                    .with_op("approve")
                    .with_file(path)
                    .with_message("Approved file already exists")
            }

            ApprovalError::NotApprovedFileMissing { path } => {
                ExError::new(ExErrorKind::NotApprovedFileMissing)
                    .with_op("approve")
                    .with_file(path)
                    .with_message("Not approved file not found")
            }

            ApprovalError::InvalidApprovalFileName { path } => {
                ExError::new(ExErrorKind::InvalidPath)
                    .with_file(path)
                    .with_message("Not an approval file name")
            }

            ApprovalError::InvalidPattern { pattern, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("compile_pattern")
                    .with_message(format!("{}: {}", pattern, reason))
            }

            ApprovalError::UnresolvedCycle { type_name } => {
                ExError::new(ExErrorKind::UnresolvedCycle)
                    .with_op("serialize")
                    .with_type_name(type_name)
                    .with_message("Reference cycle through a type exempted from detection")
            }

            ApprovalError::Io { op, reason } => {
                ExError::new(ExErrorKind::Io).with_op(op).with_message(reason)
            }

            ApprovalError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            ApprovalError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to ApprovalError
impl From<serde_json::Error> for ApprovalError {
    fn from(err: serde_json::Error) -> Self {
        ApprovalError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::ApprovedFileUnreadable, "ERR_APPROVED_FILE_UNREADABLE"),
            (
                ExErrorKind::NotApprovedFileUnwritable,
                "ERR_NOT_APPROVED_FILE_UNWRITABLE",
            ),
            (ExErrorKind::UnresolvedCycle, "ERR_UNRESOLVED_CYCLE"),
            (ExErrorKind::Io, "ERR_IO"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_unresolved_cycle_carries_type_name() {
        let err: ExError = ApprovalError::UnresolvedCycle {
            type_name: "Node".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::UnresolvedCycle);
        assert_eq!(err.type_name(), Some("Node"));
    }

    #[test]
    fn test_display_includes_code_and_file() {
        let err = ExError::new(ExErrorKind::ApprovedFileUnreadable)
            .with_op("read_approved")
            .with_file("abc123/def456-approved.json")
            .with_message("permission denied");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_APPROVED_FILE_UNREADABLE]"));
        assert!(rendered.contains("read_approved"));
        assert!(rendered.contains("abc123/def456-approved.json"));
    }

    #[test]
    fn test_invalid_pattern_is_invalid_input() {
        let err: ExError = ApprovalError::InvalidPattern {
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert_eq!(err.code(), "ERR_INVALID_INPUT");
        assert_eq!(err.op(), Some("compile_pattern"));
    }

    #[test]
    fn test_serde_json_error_maps_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApprovalError = json_err.into();
        assert!(matches!(err, ApprovalError::Serialization { .. }));
    }
}

use std::sync::Arc;

/// Errors raised by the HMSA data model, handlers, reader and writer
#[derive(Debug, Clone, thiserror::Error)]
pub enum HmsaError {
    /// Identifier does not match `[A-Za-z0-9_\-|()]+`
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Unit outside the admitted prefix/base/exponent grammar
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    /// Malformed XML document, missing required element or truncated binary
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// UID of the XML document and of the binary file differ
    #[error("UID mismatch: XML has {xml}, binary has {binary}")]
    UidMismatch {
        /// UID declared on the XML root element
        xml: String,
        /// UID stored in the first 8 bytes of the binary file
        binary: String,
    },

    /// Document version other than 1.0
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),

    /// Wrong entity type passed to a container or handler
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Attribute or value rejected by validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(Arc<std::io::Error>),

    /// A reader or writer task is already running
    #[error("Busy: {0}")]
    BusyState(String),

    /// The background task was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// No task was started on the reader or writer
    #[error("No task started")]
    NotStarted,

    /// Background worker thread panicked
    #[error("Background worker thread panicked")]
    WorkerPanicked,
}

impl From<std::io::Error> for HmsaError {
    fn from(e: std::io::Error) -> Self {
        HmsaError::IoError(Arc::new(e))
    }
}

impl From<quick_xml::Error> for HmsaError {
    fn from(e: quick_xml::Error) -> Self {
        HmsaError::InvalidDocument(format!("XML parsing error: {}", e))
    }
}

impl From<quick_xml::events::attributes::AttrError> for HmsaError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        HmsaError::InvalidDocument(format!("XML attribute error: {}", e))
    }
}

impl From<ndarray::ShapeError> for HmsaError {
    fn from(e: ndarray::ShapeError) -> Self {
        HmsaError::InvalidDocument(format!("Array shape error: {}", e))
    }
}

impl HmsaError {
    /// Shorthand for a [`HmsaError::InvalidDocument`] error
    pub(crate) fn document(message: impl Into<String>) -> Self {
        HmsaError::InvalidDocument(message.into())
    }

    /// Shorthand for a [`HmsaError::ValidationError`] error
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        HmsaError::ValidationError(message.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HmsaError>;

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for sonarcodec.
//!
//! A single error enum covers every layer of the crate:
//! - Dispatch (capability not implemented by the active driver)
//! - Argument and descriptor validation
//! - File I/O (open, short read, short write)
//! - Format and sample-encoding lookups
//! - Projection and resource exhaustion

use thiserror::Error;

/// Errors produced by drivers, sessions, the SEGY codec, and platform models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MbError {
    /// The active format driver does not implement the requested operation
    #[error("Format '{format}' does not support operation '{operation}'")]
    CapabilityUnsupported {
        /// Format name of the active driver
        format: String,
        /// Operation that was requested
        operation: String,
    },

    /// Invalid sensor/offset index or argument
    #[error("Bad parameter in {context}: {reason}")]
    BadParameter {
        /// Operation that rejected the argument
        context: String,
        /// Why the argument is invalid
        reason: String,
    },

    /// Operation invoked on an unset or mismatched session, store, or platform
    #[error("Bad descriptor: {context}")]
    BadDescriptor {
        /// What was missing or mismatched
        context: String,
    },

    /// File could not be opened or created
    #[error("Failed to open '{path}': {reason}")]
    OpenFailed {
        /// Path that failed to open
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// Short write or write on a read-only stream
    #[error("Write failed in {context}: {reason}")]
    WriteFailed {
        /// What was being written
        context: String,
        /// Underlying reason
        reason: String,
    },

    /// Short read
    #[error("End of file while reading {context}")]
    EndOfFile {
        /// What was being read
        context: String,
    },

    /// Current record kind does not carry the requested data
    #[error("Operation '{operation}' not available for {kind} record")]
    UnexpectedKind {
        /// Operation that was requested
        operation: String,
        /// Kind of the current record
        kind: String,
    },

    /// Unknown format id or sensor-head lookup
    #[error("Unknown {context} code {code}")]
    BadFormat {
        /// What kind of code was looked up
        context: String,
        /// The offending code
        code: i32,
    },

    /// SEGY sample-format code outside the documented set
    #[error("Unsupported SEGY sample format code {code}")]
    UnsupportedSampleFormat {
        /// The offending format code
        code: i16,
    },

    /// Forward or inverse projection failed
    #[error("Projection error: {message}")]
    Projection {
        /// Message from the projection service
        message: String,
    },

    /// Growing a buffer or platform array failed
    #[error("Resource exhausted in {context}: could not reserve {requested} elements")]
    ResourceExhausted {
        /// What was being grown
        context: String,
        /// Requested element count
        requested: usize,
    },

    /// Malformed platform directive or configuration text
    #[error("Parse error in {context}: {message}")]
    Parse {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Other I/O error
    #[error("I/O error: {message}")]
    Io {
        /// Error message
        message: String,
    },
}

impl MbError {
    /// Create a capability-unsupported error.
    pub fn capability_unsupported(format: impl Into<String>, operation: impl Into<String>) -> Self {
        MbError::CapabilityUnsupported {
            format: format.into(),
            operation: operation.into(),
        }
    }

    /// Create a bad-parameter error.
    pub fn bad_parameter(context: impl Into<String>, reason: impl Into<String>) -> Self {
        MbError::BadParameter {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a bad-descriptor error.
    pub fn bad_descriptor(context: impl Into<String>) -> Self {
        MbError::BadDescriptor {
            context: context.into(),
        }
    }

    /// Create an open-failed error.
    pub fn open_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MbError::OpenFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a write-failed error.
    pub fn write_failed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        MbError::WriteFailed {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an end-of-file error.
    pub fn end_of_file(context: impl Into<String>) -> Self {
        MbError::EndOfFile {
            context: context.into(),
        }
    }

    /// Create a bad-format error.
    pub fn bad_format(context: impl Into<String>, code: i32) -> Self {
        MbError::BadFormat {
            context: context.into(),
            code,
        }
    }

    /// Create an unexpected-kind error.
    pub fn unexpected_kind(operation: impl Into<String>, kind: impl std::fmt::Display) -> Self {
        MbError::UnexpectedKind {
            operation: operation.into(),
            kind: kind.to_string(),
        }
    }

    /// Create a projection error.
    pub fn projection(message: impl Into<String>) -> Self {
        MbError::Projection {
            message: message.into(),
        }
    }

    /// Create a resource-exhausted error.
    pub fn resource_exhausted(context: impl Into<String>, requested: usize) -> Self {
        MbError::ResourceExhausted {
            context: context.into(),
            requested,
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        MbError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Map an I/O error raised while reading, turning a short read into `EndOfFile`.
    pub fn from_read(err: std::io::Error, context: &str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            MbError::end_of_file(context)
        } else {
            MbError::from(err)
        }
    }

    /// Map an I/O error raised while writing into `WriteFailed`.
    pub fn from_write(err: std::io::Error, context: &str) -> Self {
        MbError::write_failed(context, err.to_string())
    }

    /// Check whether this error is a capability-unsupported error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, MbError::CapabilityUnsupported { .. })
    }

    /// Check whether this error marks the end of the input stream.
    pub fn is_eof(&self) -> bool {
        matches!(self, MbError::EndOfFile { .. })
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            MbError::CapabilityUnsupported { format, operation } => {
                vec![("format", format.clone()), ("operation", operation.clone())]
            }
            MbError::BadParameter { context, reason } => {
                vec![("context", context.clone()), ("reason", reason.clone())]
            }
            MbError::BadDescriptor { context } => vec![("context", context.clone())],
            MbError::OpenFailed { path, reason } => {
                vec![("path", path.clone()), ("reason", reason.clone())]
            }
            MbError::WriteFailed { context, reason } => {
                vec![("context", context.clone()), ("reason", reason.clone())]
            }
            MbError::EndOfFile { context } => vec![("context", context.clone())],
            MbError::UnexpectedKind { operation, kind } => {
                vec![("operation", operation.clone()), ("kind", kind.clone())]
            }
            MbError::BadFormat { context, code } => {
                vec![("context", context.clone()), ("code", code.to_string())]
            }
            MbError::UnsupportedSampleFormat { code } => vec![("code", code.to_string())],
            MbError::Projection { message } => vec![("message", message.clone())],
            MbError::ResourceExhausted { context, requested } => vec![
                ("context", context.clone()),
                ("requested", requested.to_string()),
            ],
            MbError::Parse { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            MbError::Io { message } => vec![("message", message.clone())],
        }
    }
}

impl From<std::io::Error> for MbError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            return MbError::end_of_file("stream");
        }
        MbError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::collections::TryReserveError> for MbError {
    fn from(_: std::collections::TryReserveError) -> Self {
        MbError::ResourceExhausted {
            context: "allocation".to_string(),
            requested: 0,
        }
    }
}

/// Result type for sonarcodec operations.
pub type Result<T> = std::result::Result<T, MbError>;

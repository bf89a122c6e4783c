// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for parcel decoding, bundle access and transactions.
//!
//! Two layers:
//! - [`ParcelError`] covers malformed or truncated payloads and buffer policy
//!   violations. These are handled close to the codec (defusing) or surfaced
//!   unchanged.
//! - [`Error`] is the crate-level error returned by bundle accessors and
//!   `transact`. Transport failures are kept apart from format errors so a
//!   caller can retry the former and never the latter.

use crate::parcel::Exception;
use crate::transport::TransportError;
use std::fmt;

/// Result type for parcel-level operations.
pub type ParcelResult<T> = core::result::Result<T, ParcelError>;

/// Result type for crate-level operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Malformed payload or parcel policy violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelError {
    /// Read past the end of the data (truncated entry).
    ReadFailed { offset: usize, reason: String },
    /// Length or count field outside its legal range.
    BadLength { offset: usize, length: i32 },
    /// Container header carried the wrong magic tag.
    BadMagic { expected: i32, found: i32 },
    /// Value tag not in the type table.
    UnknownTypeTag { tag: i32, offset: usize },
    /// String payload was not valid UTF-8.
    InvalidUtf8 { offset: usize },
    /// Object slot without a matching handle in the object table.
    MissingObject { offset: usize },
    /// Nested containers or lists deeper than the configured limit.
    NestingTooDeep { limit: usize },
    /// Container region not fully consumed by its declared entries.
    TrailingBytes { remaining: usize },
    /// Region copy or reposition outside the buffer.
    RegionOutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },
    /// Parcel holds handles and cannot be flattened to bytes.
    ObjectsNotMarshallable,
    /// Value kind not permitted in this container (persistable bundles).
    DisallowedType { key: String, type_name: &'static str },
    /// File descriptor written while the parcel forbids them.
    FdsNotAllowed,
}

impl ParcelError {
    pub(crate) fn eof(offset: usize) -> Self {
        ParcelError::ReadFailed {
            offset,
            reason: "unexpected end of buffer".into(),
        }
    }
}

impl fmt::Display for ParcelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcelError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            ParcelError::BadLength { offset, length } => {
                write!(f, "bad length {} at offset {}", length, offset)
            }
            ParcelError::BadMagic { expected, found } => {
                write!(f, "bad magic number: expected {:#x}, found {:#x}", expected, found)
            }
            ParcelError::UnknownTypeTag { tag, offset } => {
                write!(f, "unknown type tag {} at offset {}", tag, offset)
            }
            ParcelError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 string at offset {}", offset)
            }
            ParcelError::MissingObject { offset } => {
                write!(f, "no object recorded at offset {}", offset)
            }
            ParcelError::NestingTooDeep { limit } => {
                write!(f, "nesting deeper than {} levels", limit)
            }
            ParcelError::TrailingBytes { remaining } => {
                write!(f, "{} unread bytes after the last entry", remaining)
            }
            ParcelError::RegionOutOfBounds { offset, len, size } => write!(
                f,
                "region {}..{} outside parcel of {} bytes",
                offset,
                offset.saturating_add(*len),
                size
            ),
            ParcelError::ObjectsNotMarshallable => {
                write!(f, "parcel contains handles and cannot be marshalled")
            }
            ParcelError::DisallowedType { key, type_name } => {
                write!(f, "value of type {} not allowed for key '{}'", type_name, key)
            }
            ParcelError::FdsNotAllowed => write!(f, "not allowed to write file descriptors here"),
        }
    }
}

impl std::error::Error for ParcelError {}

/// Crate-level error.
#[derive(Debug)]
pub enum Error {
    /// Malformed payload or parcel policy violation.
    Parcel(ParcelError),
    /// Value type rejected by a restricted container.
    InvalidValueType { key: String, type_name: &'static str },
    /// The peer process is gone.
    DeadObject,
    /// Transport refused or lost the transaction.
    Transport(TransportError),
    /// The remote handler replied with an exception.
    Remote(Exception),
    /// I/O error on a file descriptor.
    Io(std::io::Error),
}

impl Error {
    /// True for failures a caller may retry (transport, dead peer).
    ///
    /// Format errors are never transient: they indicate a protocol bug.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::DeadObject | Error::Transport(_))
    }

    /// True for malformed-payload errors.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Parcel(e) if *e != ParcelError::FdsNotAllowed)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parcel(e) => write!(f, "Bad payload: {}", e),
            Error::InvalidValueType { key, type_name } => {
                write!(f, "Invalid value type {} for key '{}'", type_name, key)
            }
            Error::DeadObject => write!(f, "Dead object: peer process is gone"),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Remote(e) => write!(f, "Remote exception: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parcel(e) => Some(e),
            Error::Transport(e) => Some(e),
            Error::Remote(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParcelError> for Error {
    fn from(e: ParcelError) -> Self {
        Error::Parcel(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::DeadObject => Error::DeadObject,
            other => Error::Transport(other),
        }
    }
}

impl From<Exception> for Error {
    fn from(e: Exception) -> Self {
        Error::Remote(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

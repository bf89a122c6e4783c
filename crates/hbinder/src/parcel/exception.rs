// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Exceptions carried in transaction replies.

use crate::error::ParcelError;
use std::fmt;

/// Exception codes written at the head of a failed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ExceptionCode {
    /// No exception, reply payload follows
    #[default]
    None = 0,
    Security = -1,
    BadParcelable = -2,
    IllegalArgument = -3,
    NullPointer = -4,
    IllegalState = -5,
    NetworkMainThread = -6,
    UnsupportedOperation = -7,
    /// Service-defined error, carries an extra i32 code
    ServiceSpecific = -8,
    Parcelable = -9,
    /// Handler ran out of memory or another bounded resource
    ResourceExhausted = -10,
    TransactionFailed = -129,
    /// Code not in this table
    Unknown = -1000,
}

impl ExceptionCode {
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::None,
            -1 => Self::Security,
            -2 => Self::BadParcelable,
            -3 => Self::IllegalArgument,
            -4 => Self::NullPointer,
            -5 => Self::IllegalState,
            -6 => Self::NetworkMainThread,
            -7 => Self::UnsupportedOperation,
            -8 => Self::ServiceSpecific,
            -9 => Self::Parcelable,
            -10 => Self::ResourceExhausted,
            -129 => Self::TransactionFailed,
            _ => Self::Unknown,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32 // SAFETY: #[repr(i32)] on enum declaration ensures all variants fit in i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Security => "SecurityException",
            Self::BadParcelable => "BadParcelableException",
            Self::IllegalArgument => "IllegalArgumentException",
            Self::NullPointer => "NullPointerException",
            Self::IllegalState => "IllegalStateException",
            Self::NetworkMainThread => "NetworkOnMainThreadException",
            Self::UnsupportedOperation => "UnsupportedOperationException",
            Self::ServiceSpecific => "ServiceSpecificException",
            Self::Parcelable => "ParcelableException",
            Self::ResourceExhausted => "ResourceExhaustedException",
            Self::TransactionFailed => "TransactionFailedException",
            Self::Unknown => "UnknownException",
        }
    }
}

/// Exception raised by a transaction handler or read from a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    code: ExceptionCode,
    message: String,
    service_specific_code: i32,
}

impl Exception {
    pub fn new(code: ExceptionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            service_specific_code: 0,
        }
    }

    pub fn service_specific(error_code: i32, message: impl Into<String>) -> Self {
        Self {
            code: ExceptionCode::ServiceSpecific,
            message: message.into(),
            service_specific_code: error_code,
        }
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::Security, message)
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::IllegalArgument, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::IllegalState, message)
    }

    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::ResourceExhausted, message)
    }

    #[inline]
    pub fn code(&self) -> ExceptionCode {
        self.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Service error code (0 unless [`ExceptionCode::ServiceSpecific`]).
    #[inline]
    pub fn service_specific_code(&self) -> i32 {
        self.service_specific_code
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.name(), self.message)?;
        if self.code == ExceptionCode::ServiceSpecific {
            write!(f, " (code {})", self.service_specific_code)?;
        }
        Ok(())
    }
}

impl std::error::Error for Exception {}

/// Malformed request payloads surface to the caller as `BadParcelable`.
impl From<ParcelError> for Exception {
    fn from(e: ParcelError) -> Self {
        Exception::new(ExceptionCode::BadParcelable, e.to_string())
    }
}

impl From<crate::Error> for Exception {
    fn from(e: crate::Error) -> Self {
        match e {
            crate::Error::Remote(exception) => exception,
            crate::Error::Parcel(p) => p.into(),
            crate::Error::InvalidValueType { .. } => {
                Exception::new(ExceptionCode::IllegalArgument, e.to_string())
            }
            other => Exception::new(ExceptionCode::TransactionFailed, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ExceptionCode::None,
            ExceptionCode::Security,
            ExceptionCode::ServiceSpecific,
            ExceptionCode::ResourceExhausted,
            ExceptionCode::TransactionFailed,
        ] {
            assert_eq!(ExceptionCode::from_i32(code.as_i32()), code);
        }
        assert_eq!(ExceptionCode::from_i32(-55), ExceptionCode::Unknown);
    }

    #[test]
    fn test_display() {
        let e = Exception::illegal_state("boom");
        assert_eq!(e.to_string(), "IllegalStateException: boom");
        let e = Exception::service_specific(7, "quota");
        assert_eq!(e.to_string(), "ServiceSpecificException: quota (code 7)");
    }

    #[test]
    fn test_parcel_error_becomes_bad_parcelable() {
        let e: Exception = ParcelError::InvalidUtf8 { offset: 4 }.into();
        assert_eq!(e.code(), ExceptionCode::BadParcelable);
        assert!(e.message().contains("offset 4"));
    }
}

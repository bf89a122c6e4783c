// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transaction transports.
//!
//! A transport moves a request parcel to the peer hosting a
//! [`LocalBinder`](crate::binder::LocalBinder) and brings the reply back.
//!
//! - [`DirectTransport`]: same thread, weak reference to the host
//! - [`ChannelTransport`]: crossbeam channel to a dedicated peer thread

mod channel;
mod direct;

pub use channel::ChannelTransport;
pub use direct::DirectTransport;

use crate::parcel::Parcel;
use std::fmt;
use std::sync::Arc;

/// Outcome of a two-way transaction.
#[derive(Debug)]
pub struct Reply {
    /// Whether the peer handled the code.
    pub handled: bool,
    pub parcel: Parcel,
}

/// Transport failure. Never a payload format problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The peer is gone.
    DeadObject,
    /// The transaction could not be delivered.
    FailedTransaction(String),
    /// Request or reply exceeds the hard transaction size limit.
    PayloadTooLarge { size: usize, limit: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::DeadObject => write!(f, "peer is dead"),
            TransportError::FailedTransaction(reason) => {
                write!(f, "transaction failed: {}", reason)
            }
            TransportError::PayloadTooLarge { size, limit } => {
                write!(f, "payload of {} bytes exceeds the {} byte limit", size, limit)
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Carries transactions to a peer.
pub trait Transport: Send + Sync {
    /// Deliver a transaction. One-way sends return `Ok(None)` once queued;
    /// two-way sends block until the peer replies.
    fn send(&self, code: u32, request: &Parcel, flags: u32) -> Result<Option<Reply>, TransportError>;

    fn is_alive(&self) -> bool;
}

/// Lets a caller keep a handle on a transport owned by a proxy.
impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, code: u32, request: &Parcel, flags: u32) -> Result<Option<Reply>, TransportError> {
        (**self).send(code, request, flags)
    }

    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }
}

/// Hard size check applied to requests and replies.
pub(crate) fn check_size(parcel: &Parcel, limit: usize) -> Result<(), TransportError> {
    let size = parcel.data_size();
    if size > limit {
        return Err(TransportError::PayloadTooLarge { size, limit });
    }
    Ok(())
}

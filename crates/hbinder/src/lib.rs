// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hbinder - Lazy bundles and binder-style transactions
//!
//! A pure Rust implementation of a typed key-value container that crosses
//! transaction boundaries without being decoded, together with the parcel
//! wire format it rides on and the dispatch layer that delivers
//! transactions to local services.
//!
//! ## Quick Start
//!
//! ```rust
//! use hbinder::{Bundle, DecodeOptions, Parcel, Result};
//!
//! fn main() -> Result<()> {
//!     let mut extras = Bundle::new();
//!     extras.put("user", "alice")?;
//!     extras.put("retries", 3i32)?;
//!
//!     let mut parcel = Parcel::new();
//!     extras.write_to_parcel(&mut parcel)?;
//!     parcel.rewind();
//!
//!     // Nothing is decoded until the first access.
//!     let received = Bundle::read_from_parcel(&mut parcel, DecodeOptions::new())?;
//!     assert!(received.is_parcelled());
//!     assert_eq!(received.get_int("retries", 0)?, 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                          Service Layer                              |
//! |   Binder services | ServiceManager | ResultReceiver                 |
//! +---------------------------------------------------------------------+
//! |                          Dispatch Layer                             |
//! |   LocalBinder::exec_transact | BinderProxy | TransactionContext     |
//! +---------------------------------------------------------------------+
//! |                          Transport Layer                            |
//! |   DirectTransport (same thread) | ChannelTransport (peer thread)    |
//! +---------------------------------------------------------------------+
//! |                          Data Layer                                 |
//! |   Bundle / PersistableBundle (lazy) | Value | Parcel | Exception    |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Bundle`] | Lazily decoded, copy-on-write key-value container |
//! | [`PersistableBundle`] | Bundle restricted to persistable value types |
//! | [`Value`] | Tagged union of everything a container can hold |
//! | [`Parcel`] | Transaction buffer with handle side table |
//! | [`LocalBinder`] | Hosts a [`Binder`] service and runs dispatch |
//! | [`BinderProxy`] | Client handle forwarding over a [`Transport`] |
//!
//! ## Modules Overview
//!
//! - [`bundle`] - Containers, values and their wire codec (start here)
//! - [`parcel`] - Transaction buffer, handles, exceptions
//! - [`binder`] - Dispatch, reserved transactions, service registry
//! - [`transport`] - Delivery of transactions to a peer
//! - [`config`] - Wire constants, decode options, dispatch limits

// Clippy: No blanket suppressions. Fix issues properly or use inline #[allow] with justification.

#[cfg(not(unix))]
compile_error!("hbinder carries file descriptors and requires a unix target");

/// Binder dispatch, reserved transactions and the service registry.
pub mod binder;
/// Lazy key-value containers and their wire codec.
pub mod bundle;
/// Wire constants, decode options and runtime dispatch configuration.
pub mod config;
/// Error types shared by every layer.
pub mod error;
/// Transaction buffer, handles and exception envelopes.
pub mod parcel;
/// Transaction delivery.
pub mod transport;

pub use binder::{
    Binder, BinderProxy, IBinder, LocalBinder, ResultReceiver, ServiceManager, TransactionContext,
};
pub use bundle::{Bundle, FromValue, PersistableBundle, Value, ValueTag};
pub use config::{DecodeOptions, DispatchConfig, RuntimeConfig};
pub use error::{Error, ParcelError, ParcelResult, Result};
pub use parcel::{Exception, ExceptionCode, FileDescriptor, Parcel};
pub use transport::{ChannelTransport, DirectTransport, Transport, TransportError};

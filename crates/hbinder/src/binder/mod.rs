// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binder transaction dispatch.
//!
//! # Architecture
//!
//! ```text
//! client                          peer
//! ------                          ----
//! BinderProxy::transact
//!   -> Transport::send  -------->  LocalBinder::exec_transact
//!                                    -> Binder::on_transact (service hook)
//!                                    -> default_on_transact (reserved codes)
//!      <--------------- Reply ---
//! ```
//!
//! [`IBinder`] is the object-level interface shared by local hosts and
//! remote proxies. [`Binder`] is what a service implements.

mod context;
mod local;
mod proxy;
mod registry;
mod result_receiver;

pub use context::TransactionContext;
pub use local::{default_on_transact, Binder, LocalBinder};
pub use proxy::BinderProxy;
pub use registry::ServiceManager;
pub use result_receiver::{ResultReceiver, RESULT_RECEIVER_DESCRIPTOR};

use crate::error::Result;
use crate::parcel::Parcel;
use std::fmt;

const fn pack_chars(code: [u8; 4]) -> u32 {
    u32::from_be_bytes(code)
}

/// First code available to service-defined transactions.
pub const FIRST_CALL_TRANSACTION: u32 = 0x0000_0001;
/// Last code available to service-defined transactions.
pub const LAST_CALL_TRANSACTION: u32 = 0x00ff_ffff;

pub const PING_TRANSACTION: u32 = pack_chars(*b"_PNG");
pub const DUMP_TRANSACTION: u32 = pack_chars(*b"_DMP");
pub const SHELL_COMMAND_TRANSACTION: u32 = pack_chars(*b"_CMD");
pub const INTERFACE_TRANSACTION: u32 = pack_chars(*b"_NTF");

/// Sent to a result receiver by the shell command handler.
pub const RESULT_RECEIVER_SEND: u32 = FIRST_CALL_TRANSACTION;

/// Asynchronous call: the caller does not wait and gets no reply.
pub const FLAG_ONEWAY: u32 = 0x0000_0001;

#[inline]
pub fn is_oneway(flags: u32) -> bool {
    flags & FLAG_ONEWAY != 0
}

/// Object that can receive transactions, in process or across a transport.
pub trait IBinder: Send + Sync {
    /// Send `code` with `data`. Two-way calls fill `reply` (rewound to 0)
    /// and return whether the peer handled the code. One-way calls return
    /// once the transaction is queued.
    fn transact(
        &self,
        code: u32,
        data: &mut Parcel,
        reply: Option<&mut Parcel>,
        flags: u32,
    ) -> Result<bool>;

    /// Interface implemented by the object behind this reference.
    fn interface_descriptor(&self) -> Result<String> {
        let mut data = Parcel::new();
        let mut reply = Parcel::new();
        self.transact(INTERFACE_TRANSACTION, &mut data, Some(&mut reply), 0)?;
        Ok(reply.read_string()?.unwrap_or_default())
    }

    /// Round trip with no payload.
    fn ping_binder(&self) -> Result<()> {
        let mut data = Parcel::new();
        let mut reply = Parcel::new();
        self.transact(PING_TRANSACTION, &mut data, Some(&mut reply), 0)?;
        Ok(())
    }

    fn is_binder_alive(&self) -> bool;

    /// In-process host, when this reference is local.
    fn local_binder(&self) -> Option<&LocalBinder> {
        None
    }
}

impl fmt::Debug for dyn IBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.local_binder() {
            Some(local) => write!(f, "Binder({})", local.descriptor()),
            None if self.is_binder_alive() => f.write_str("BinderProxy"),
            None => f.write_str("BinderProxy(dead)"),
        }
    }
}

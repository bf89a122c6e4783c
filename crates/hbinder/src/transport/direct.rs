// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Same-thread delivery.

use super::{check_size, Reply, Transport, TransportError};
use crate::binder::{is_oneway, LocalBinder, TransactionContext};
use crate::parcel::Parcel;
use std::sync::{Arc, Weak};

/// Dispatches on the caller's thread. The host is held weakly: once it is
/// dropped every send fails with [`TransportError::DeadObject`].
pub struct DirectTransport {
    target: Weak<LocalBinder>,
}

impl DirectTransport {
    pub fn new(target: &Arc<LocalBinder>) -> Self {
        Self {
            target: Arc::downgrade(target),
        }
    }
}

impl Transport for DirectTransport {
    fn send(&self, code: u32, request: &Parcel, flags: u32) -> Result<Option<Reply>, TransportError> {
        let target = self.target.upgrade().ok_or(TransportError::DeadObject)?;
        let limit = target.config().dispatch().max_transaction_size;
        check_size(request, limit)?;

        // The peer gets its own copy, as it would across a process boundary.
        let mut data = request.clone();
        data.rewind();
        let mut reply = Parcel::new();
        let ctx = TransactionContext::new();
        ctx.begin(code, flags, std::process::id());
        let handled = target.exec_transact(&ctx, code, &mut data, &mut reply, flags);

        if is_oneway(flags) {
            return Ok(None);
        }
        check_size(&reply, limit)?;
        Ok(Some(Reply {
            handled,
            parcel: reply,
        }))
    }

    fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One-shot result callback carried as a binder.

use super::{
    default_on_transact, Binder, IBinder, LocalBinder, TransactionContext, FLAG_ONEWAY,
    RESULT_RECEIVER_SEND,
};
use crate::bundle::Bundle;
use crate::config::DecodeOptions;
use crate::error::Result;
use crate::parcel::{Exception, Parcel};
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::Arc;

pub const RESULT_RECEIVER_DESCRIPTOR: &str = "hbinder.IResultReceiver";

/// Receives `(result_code, data)` pairs sent with `RESULT_RECEIVER_SEND`
/// and forwards them to a channel.
pub struct ResultReceiver {
    tx: Sender<(i32, Option<Bundle>)>,
}

impl ResultReceiver {
    /// New receiver binder and the channel its results arrive on.
    pub fn create() -> (Arc<LocalBinder>, Receiver<(i32, Option<Bundle>)>) {
        let (tx, rx) = channel::unbounded();
        (LocalBinder::new(ResultReceiver { tx }), rx)
    }

    /// Deliver a result to a receiver binder (one-way).
    pub fn send(receiver: &Arc<dyn IBinder>, result_code: i32, data: Option<&Bundle>) -> Result<()> {
        let mut request = Parcel::new();
        request.write_interface_token(RESULT_RECEIVER_DESCRIPTOR);
        request.write_i32(result_code);
        Bundle::write_nullable(data, &mut request)?;
        receiver.transact(RESULT_RECEIVER_SEND, &mut request, None, FLAG_ONEWAY)?;
        Ok(())
    }
}

impl Binder for ResultReceiver {
    fn descriptor(&self) -> &str {
        RESULT_RECEIVER_DESCRIPTOR
    }

    fn on_transact(
        &self,
        ctx: &TransactionContext,
        code: u32,
        data: &mut Parcel,
        reply: &mut Parcel,
        flags: u32,
    ) -> std::result::Result<bool, Exception> {
        if code != RESULT_RECEIVER_SEND {
            return default_on_transact(self, ctx, code, data, reply, flags);
        }
        data.enforce_interface(RESULT_RECEIVER_DESCRIPTOR)?;
        let result_code = data.read_i32()?;
        let bundle = Bundle::read_nullable(data, DecodeOptions::defusing())?;
        if self.tx.send((result_code, bundle)).is_err() {
            log::debug!("[binder] result {} dropped, nobody is listening", result_code);
        }
        Ok(true)
    }
}

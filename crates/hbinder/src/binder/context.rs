// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-transaction state passed explicitly to handlers.

use std::cell::Cell;

/// State of the transaction being dispatched on this peer.
///
/// Owned by whoever drives dispatch (a local call or a transport peer
/// thread) and reset after every transaction, whatever its outcome.
#[derive(Debug, Default)]
pub struct TransactionContext {
    active: Cell<bool>,
    code: Cell<u32>,
    flags: Cell<u32>,
    calling_pid: Cell<u32>,
    work_source: Cell<Option<u32>>,
}

impl TransactionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a transaction.
    pub fn begin(&self, code: u32, flags: u32, calling_pid: u32) {
        self.active.set(true);
        self.code.set(code);
        self.flags.set(flags);
        self.calling_pid.set(calling_pid);
        self.work_source.set(None);
    }

    /// Reset to idle.
    pub fn clear(&self) {
        self.active.set(false);
        self.code.set(0);
        self.flags.set(0);
        self.calling_pid.set(0);
        self.work_source.set(None);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn code(&self) -> u32 {
        self.code.get()
    }

    pub fn flags(&self) -> u32 {
        self.flags.get()
    }

    pub fn is_oneway(&self) -> bool {
        super::is_oneway(self.flags.get())
    }

    pub fn calling_pid(&self) -> u32 {
        self.calling_pid.get()
    }

    /// Attribute the work done by this transaction to another caller id.
    /// Returns the previous value.
    pub fn set_work_source(&self, uid: Option<u32>) -> Option<u32> {
        self.work_source.replace(uid)
    }

    pub fn work_source(&self) -> Option<u32> {
        self.work_source.get()
    }
}

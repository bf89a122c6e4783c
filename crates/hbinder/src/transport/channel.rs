// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Delivery to a dedicated peer thread over a crossbeam channel.

use super::{check_size, Reply, Transport, TransportError};
use crate::binder::{is_oneway, LocalBinder, TransactionContext};
use crate::parcel::Parcel;
use crossbeam::channel::{self, Sender};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

struct Envelope {
    code: u32,
    flags: u32,
    data: Parcel,
    reply_tx: Option<Sender<Reply>>,
}

/// Transport whose peer is a thread owning the service host.
///
/// The peer reuses a single [`TransactionContext`], cleared after every
/// transaction. [`ChannelTransport::shutdown`] stops the peer; later sends
/// fail with [`TransportError::DeadObject`].
pub struct ChannelTransport {
    tx: Mutex<Option<Sender<Envelope>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    alive: Arc<AtomicBool>,
    max_transaction_size: usize,
}

impl ChannelTransport {
    /// Start a peer thread serving `host`.
    pub fn spawn(host: Arc<LocalBinder>) -> io::Result<Self> {
        let (tx, rx) = channel::unbounded::<Envelope>();
        let alive = Arc::new(AtomicBool::new(true));
        let max_transaction_size = host.config().dispatch().max_transaction_size;
        let name = format!("hbinder-peer-{}", host.descriptor());

        let peer_alive = Arc::clone(&alive);
        let worker = thread::Builder::new().name(name).spawn(move || {
            let ctx = TransactionContext::new();
            let pid = std::process::id();
            while let Ok(mut envelope) = rx.recv() {
                let mut reply = Parcel::new();
                envelope.data.rewind();
                ctx.begin(envelope.code, envelope.flags, pid);
                let handled =
                    host.exec_transact(&ctx, envelope.code, &mut envelope.data, &mut reply, envelope.flags);
                if let Some(reply_tx) = envelope.reply_tx {
                    // Caller may have given up; nothing to do then.
                    let _ = reply_tx.send(Reply {
                        handled,
                        parcel: reply,
                    });
                }
            }
            peer_alive.store(false, Ordering::Release);
            log::debug!("[transport] peer thread for {} exiting", host.descriptor());
        })?;

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            alive,
            max_transaction_size,
        })
    }

    /// Stop the peer thread and wait for it. Queued transactions are still
    /// dispatched before it exits.
    ///
    /// Called from the peer thread itself (a service dropping the last
    /// handle to its own transport), the thread is detached instead of
    /// joined and finishes once the current transaction returns.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::Release);
        drop(self.tx.lock().take());
        let Some(worker) = self.worker.lock().take() else {
            return;
        };
        if worker.thread().id() == thread::current().id() {
            log::debug!("[transport] shutdown from the peer thread, detaching");
            return;
        }
        if worker.join().is_err() {
            log::error!("[transport] peer thread panicked");
        }
    }
}

impl Transport for ChannelTransport {
    fn send(&self, code: u32, request: &Parcel, flags: u32) -> Result<Option<Reply>, TransportError> {
        if !self.is_alive() {
            return Err(TransportError::DeadObject);
        }
        check_size(request, self.max_transaction_size)?;

        let oneway = is_oneway(flags);
        let (reply_tx, reply_rx) = if oneway {
            (None, None)
        } else {
            let (tx, rx) = channel::bounded(1);
            (Some(tx), Some(rx))
        };
        let envelope = Envelope {
            code,
            flags,
            data: request.clone(),
            reply_tx,
        };

        {
            let guard = self.tx.lock();
            let tx = guard.as_ref().ok_or(TransportError::DeadObject)?;
            tx.send(envelope).map_err(|_| TransportError::DeadObject)?;
        }

        let Some(reply_rx) = reply_rx else {
            return Ok(None);
        };
        let reply = reply_rx.recv().map_err(|_| TransportError::DeadObject)?;
        check_size(&reply.parcel, self.max_transaction_size)?;
        Ok(Some(reply))
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Drop for ChannelTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}

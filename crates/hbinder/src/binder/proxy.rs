// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client side reference to a binder reached through a [`Transport`].

use super::{is_oneway, IBinder};
use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::parcel::Parcel;
use crate::transport::{Transport, TransportError};
use std::sync::Arc;

/// Remote binder reference.
pub struct BinderProxy {
    transport: Box<dyn Transport>,
    config: Arc<RuntimeConfig>,
}

impl BinderProxy {
    pub fn new(transport: impl Transport + 'static) -> Arc<Self> {
        Self::with_config(transport, RuntimeConfig::shared())
    }

    pub fn with_config(transport: impl Transport + 'static, config: Arc<RuntimeConfig>) -> Arc<Self> {
        Arc::new(Self {
            transport: Box::new(transport),
            config,
        })
    }
}

impl IBinder for BinderProxy {
    fn transact(
        &self,
        code: u32,
        data: &mut Parcel,
        reply: Option<&mut Parcel>,
        flags: u32,
    ) -> Result<bool> {
        data.rewind();
        let sent = self.transport.send(code, data, flags);
        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                log::debug!("[binder] transaction {:#x} failed: {}", code, e);
                return Err(e.into());
            }
        };

        match response {
            None if is_oneway(flags) => Ok(true),
            None => Err(Error::Transport(TransportError::FailedTransaction(format!(
                "no reply for two-way transaction {:#x}",
                code
            )))),
            Some(response) => {
                let size = response.parcel.data_size();
                if size >= self.config.dispatch().reply_warn_threshold {
                    log::warn!(
                        "[binder] large reply of {} bytes for transaction {:#x}",
                        size,
                        code
                    );
                }
                if let Some(reply) = reply {
                    *reply = response.parcel;
                    reply.rewind();
                }
                Ok(response.handled)
            }
        }
    }

    fn is_binder_alive(&self) -> bool {
        self.transport.is_alive()
    }
}

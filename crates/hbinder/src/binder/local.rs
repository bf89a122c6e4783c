// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service side: the [`Binder`] hook and its in-process host.

use super::{
    is_oneway, IBinder, ResultReceiver, TransactionContext, DUMP_TRANSACTION,
    INTERFACE_TRANSACTION, PING_TRANSACTION, SHELL_COMMAND_TRANSACTION,
};
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::parcel::{Exception, ExceptionCode, FileDescriptor, Parcel};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Message written by the default shell command handler.
const NO_SHELL_COMMAND: &[u8] = b"No shell command implementation.\n";

/// Service implementation.
///
/// Implement [`Binder::on_transact`] for your own codes and fall back to
/// [`default_on_transact`] for everything else:
///
/// ```
/// use hbinder::binder::{default_on_transact, Binder, TransactionContext, FIRST_CALL_TRANSACTION};
/// use hbinder::parcel::{Exception, Parcel};
///
/// struct Echo;
///
/// impl Binder for Echo {
///     fn descriptor(&self) -> &str {
///         "demo.IEcho"
///     }
///
///     fn on_transact(
///         &self,
///         ctx: &TransactionContext,
///         code: u32,
///         data: &mut Parcel,
///         reply: &mut Parcel,
///         flags: u32,
///     ) -> Result<bool, Exception> {
///         match code {
///             FIRST_CALL_TRANSACTION => {
///                 let text = data.read_str()?;
///                 reply.write_no_exception();
///                 reply.write_str(&text);
///                 Ok(true)
///             }
///             _ => default_on_transact(self, ctx, code, data, reply, flags),
///         }
///     }
/// }
/// ```
pub trait Binder: Send + Sync + 'static {
    /// Interface name, answered to `INTERFACE_TRANSACTION`.
    fn descriptor(&self) -> &str;

    /// Handle one transaction. `Ok(false)` means the code is unknown.
    fn on_transact(
        &self,
        ctx: &TransactionContext,
        code: u32,
        data: &mut Parcel,
        reply: &mut Parcel,
        flags: u32,
    ) -> std::result::Result<bool, Exception> {
        default_on_transact(self, ctx, code, data, reply, flags)
    }

    /// Write diagnostic state to `out`.
    fn dump(
        &self,
        _ctx: &TransactionContext,
        _out: &FileDescriptor,
        _args: &[String],
    ) -> std::result::Result<(), Exception> {
        Ok(())
    }

    /// Run a shell command and return its exit status.
    fn on_shell_command(
        &self,
        _ctx: &TransactionContext,
        _input: Option<&FileDescriptor>,
        out: Option<&FileDescriptor>,
        err: Option<&FileDescriptor>,
        _args: &[String],
        _callback: Option<&Arc<dyn IBinder>>,
    ) -> i32 {
        if let Some(target) = err.or(out) {
            if let Err(e) = target.write_all(NO_SHELL_COMMAND) {
                log::debug!("[binder] failed to write shell command reply: {}", e);
            }
        }
        -1
    }
}

fn read_args(data: &mut Parcel) -> std::result::Result<Vec<String>, Exception> {
    Ok(data
        .read_string_array()?
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Handle the reserved transaction codes.
///
/// - `INTERFACE_TRANSACTION`: reply with the descriptor
/// - `PING_TRANSACTION`: handled, empty reply
/// - `DUMP_TRANSACTION`: in/out/err descriptors and args, calls
///   [`Binder::dump`] on out (or err)
/// - `SHELL_COMMAND_TRANSACTION`: in/out/err descriptors, args, callback
///   and result receiver, calls [`Binder::on_shell_command`] and sends the
///   status to the receiver
///
/// Any other code returns `Ok(false)`.
pub fn default_on_transact<B: Binder + ?Sized>(
    service: &B,
    ctx: &TransactionContext,
    code: u32,
    data: &mut Parcel,
    reply: &mut Parcel,
    flags: u32,
) -> std::result::Result<bool, Exception> {
    match code {
        INTERFACE_TRANSACTION => {
            reply.write_str(service.descriptor());
            Ok(true)
        }
        PING_TRANSACTION => Ok(true),
        DUMP_TRANSACTION => {
            let _input = data.read_file_descriptor()?;
            let out = data.read_file_descriptor()?;
            let err = data.read_file_descriptor()?;
            let args = read_args(data)?;
            if let Some(target) = out.as_deref().or(err.as_deref()) {
                service.dump(ctx, target, &args)?;
            }
            if !is_oneway(flags) {
                reply.write_no_exception();
            }
            Ok(true)
        }
        SHELL_COMMAND_TRANSACTION => {
            let input = data.read_file_descriptor()?;
            let out = data.read_file_descriptor()?;
            let err = data.read_file_descriptor()?;
            let args = read_args(data)?;
            let callback = data.read_binder()?;
            let receiver = data.read_binder()?;

            let status = service.on_shell_command(
                ctx,
                input.as_deref(),
                out.as_deref(),
                err.as_deref(),
                &args,
                callback.as_ref(),
            );
            if let Some(receiver) = receiver {
                if let Err(e) = ResultReceiver::send(&receiver, status, None) {
                    log::warn!("[binder] failed to deliver shell command result: {}", e);
                }
            }
            if !is_oneway(flags) {
                reply.write_no_exception();
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "transaction handler panicked".to_owned()
    }
}

/// In-process host of a [`Binder`] service.
pub struct LocalBinder {
    service: Box<dyn Binder>,
    config: Arc<RuntimeConfig>,
}

impl LocalBinder {
    pub fn new(service: impl Binder) -> Arc<Self> {
        Self::with_config(service, RuntimeConfig::shared())
    }

    pub fn with_config(service: impl Binder, config: Arc<RuntimeConfig>) -> Arc<Self> {
        Arc::new(Self {
            service: Box::new(service),
            config,
        })
    }

    pub fn descriptor(&self) -> &str {
        self.service.descriptor()
    }

    pub fn service(&self) -> &dyn Binder {
        self.service.as_ref()
    }

    pub fn config(&self) -> &Arc<RuntimeConfig> {
        &self.config
    }

    /// Dispatch one transaction to the service.
    ///
    /// Handler errors and panics never escape: a one-way call logs and
    /// drops them, a two-way call gets the exception written into a reset
    /// `reply`. Either way the call counts as handled. `ctx` is cleared
    /// before returning.
    pub fn exec_transact(
        &self,
        ctx: &TransactionContext,
        code: u32,
        data: &mut Parcel,
        reply: &mut Parcel,
        flags: u32,
    ) -> bool {
        let config = self.config.dispatch();
        let oneway = is_oneway(flags);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.service.on_transact(ctx, code, data, reply, flags)
        }))
        .unwrap_or_else(|payload| Err(Exception::illegal_state(panic_message(payload.as_ref()))));

        let handled = match outcome {
            Ok(handled) => handled,
            Err(exception) => {
                if exception.code() == ExceptionCode::ResourceExhausted {
                    log::error!(
                        "[binder] {} exhausted resources handling code {:#x}: {}",
                        self.descriptor(),
                        code,
                        exception
                    );
                }
                if oneway {
                    if config.log_oneway_exceptions {
                        log::warn!(
                            "[binder] caught a failure from one-way call {:#x} to {}: {}",
                            code,
                            self.descriptor(),
                            exception
                        );
                    }
                } else {
                    reply.clear();
                    reply.write_exception(&exception);
                }
                true
            }
        };

        if reply.data_size() >= config.reply_warn_threshold {
            log::warn!(
                "[binder] large reply of {} bytes from {} for code {:#x}",
                reply.data_size(),
                self.descriptor(),
                code
            );
        }

        ctx.clear();
        handled
    }
}

impl IBinder for LocalBinder {
    fn transact(
        &self,
        code: u32,
        data: &mut Parcel,
        reply: Option<&mut Parcel>,
        flags: u32,
    ) -> Result<bool> {
        data.rewind();
        let ctx = TransactionContext::new();
        ctx.begin(code, flags, std::process::id());

        let mut scratch = Parcel::new();
        let reply = match reply {
            Some(reply) if !is_oneway(flags) => {
                reply.clear();
                reply
            }
            _ => &mut scratch,
        };
        let handled = self.exec_transact(&ctx, code, data, reply, flags);
        reply.rewind();
        Ok(handled)
    }

    fn interface_descriptor(&self) -> Result<String> {
        Ok(self.descriptor().to_owned())
    }

    fn is_binder_alive(&self) -> bool {
        true
    }

    fn local_binder(&self) -> Option<&LocalBinder> {
        Some(self)
    }
}

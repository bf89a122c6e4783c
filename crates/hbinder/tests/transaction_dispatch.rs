// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::cast_possible_wrap)] // Test conversions
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::needless_pass_by_value)] // Test functions

//! Transaction dispatch integration tests.
//!
//! Drives a service through both transports and checks:
//! - two-way replies and remote exceptions
//! - one-way calls swallowing handler failures
//! - reserved codes (interface, ping, dump, shell command)
//! - dead peers, size limits, context reset, registry lookups

use crossbeam::channel::{self, Receiver, Sender};
use hbinder::binder::{
    default_on_transact, Binder, BinderProxy, IBinder, LocalBinder, ResultReceiver, ServiceManager,
    TransactionContext, DUMP_TRANSACTION, FIRST_CALL_TRANSACTION, FLAG_ONEWAY,
    LAST_CALL_TRANSACTION, SHELL_COMMAND_TRANSACTION,
};
use hbinder::{
    Bundle, ChannelTransport, DecodeOptions, DirectTransport, DispatchConfig, Error, Exception,
    ExceptionCode, FileDescriptor, Parcel, RuntimeConfig, TransportError,
};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DESCRIPTOR: &str = "test.ICalculator";

const ADD: u32 = FIRST_CALL_TRANSACTION;
const FAIL: u32 = FIRST_CALL_TRANSACTION + 1;
const PANIC: u32 = FIRST_CALL_TRANSACTION + 2;
const NOTIFY: u32 = FIRST_CALL_TRANSACTION + 3;
const ECHO_BUNDLE: u32 = FIRST_CALL_TRANSACTION + 4;

const WAIT: Duration = Duration::from_secs(5);

struct Calculator {
    events: Sender<String>,
}

impl Binder for Calculator {
    fn descriptor(&self) -> &str {
        DESCRIPTOR
    }

    fn on_transact(
        &self,
        ctx: &TransactionContext,
        code: u32,
        data: &mut Parcel,
        reply: &mut Parcel,
        flags: u32,
    ) -> Result<bool, Exception> {
        match code {
            ADD => {
                data.enforce_interface(DESCRIPTOR)?;
                let a = data.read_i32()?;
                let b = data.read_i32()?;
                reply.write_no_exception();
                reply.write_i32(a.wrapping_add(b));
                Ok(true)
            }
            FAIL => Err(Exception::service_specific(42, "refused")),
            PANIC => panic!("handler exploded"),
            NOTIFY => {
                ctx.set_work_source(Some(1000));
                let message = data.read_str()?;
                let _ = self.events.send(format!("{}:{}", message, ctx.is_oneway()));
                Ok(true)
            }
            ECHO_BUNDLE => {
                let bundle = Bundle::read_from_parcel(data, DecodeOptions::defusing())?;
                reply.write_no_exception();
                bundle.write_to_parcel(reply)?;
                Ok(true)
            }
            _ => default_on_transact(self, ctx, code, data, reply, flags),
        }
    }

    fn dump(
        &self,
        _ctx: &TransactionContext,
        out: &FileDescriptor,
        args: &[String],
    ) -> Result<(), Exception> {
        out.write_all(format!("calculator args={:?}\n", args).as_bytes())
            .map_err(|e| Exception::illegal_state(e.to_string()))
    }

    fn on_shell_command(
        &self,
        _ctx: &TransactionContext,
        _input: Option<&FileDescriptor>,
        out: Option<&FileDescriptor>,
        _err: Option<&FileDescriptor>,
        args: &[String],
        _callback: Option<&Arc<dyn IBinder>>,
    ) -> i32 {
        if let Some(out) = out {
            out.write_all(args.join(" ").as_bytes()).expect("shell output");
        }
        args.len() as i32
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn calculator() -> (Arc<LocalBinder>, Receiver<String>) {
    let (events, rx) = channel::unbounded();
    (LocalBinder::new(Calculator { events }), rx)
}

/// The same host reached through each transport.
fn connect(host: &Arc<LocalBinder>) -> Vec<(&'static str, Arc<dyn IBinder>)> {
    let direct: Arc<dyn IBinder> = BinderProxy::new(DirectTransport::new(host));
    let peer = ChannelTransport::spawn(Arc::clone(host)).expect("spawn peer");
    let channel: Arc<dyn IBinder> = BinderProxy::new(peer);
    vec![("direct", direct), ("channel", channel)]
}

fn add_request(a: i32, b: i32) -> Parcel {
    let mut data = Parcel::new();
    data.write_interface_token(DESCRIPTOR);
    data.write_i32(a);
    data.write_i32(b);
    data
}

fn call_add(binder: &Arc<dyn IBinder>, a: i32, b: i32) -> hbinder::Result<i32> {
    let mut data = add_request(a, b);
    let mut reply = Parcel::new();
    binder.transact(ADD, &mut data, Some(&mut reply), 0)?;
    reply.read_exception()?;
    Ok(reply.read_i32()?)
}

fn shared_file() -> (File, Arc<FileDescriptor>) {
    let file = tempfile::tempfile().expect("tempfile");
    let fd = Arc::new(FileDescriptor::from(file.try_clone().expect("clone")));
    (file, fd)
}

fn read_back(mut file: File) -> String {
    file.seek(SeekFrom::Start(0)).expect("seek");
    let mut text = String::new();
    file.read_to_string(&mut text).expect("read");
    text
}

#[test]
fn test_two_way_call_through_each_transport() {
    init_logs();
    let (host, _events) = calculator();
    for (name, binder) in connect(&host) {
        assert_eq!(call_add(&binder, 40, 2).expect(name), 42, "{}", name);
        assert!(binder.is_binder_alive(), "{}", name);
    }
}

#[test]
fn test_remote_exception_reaches_caller() {
    init_logs();
    let (host, _events) = calculator();
    for (name, binder) in connect(&host) {
        let mut reply = Parcel::new();
        let handled = binder
            .transact(FAIL, &mut Parcel::new(), Some(&mut reply), 0)
            .expect(name);
        assert!(handled, "{}", name);
        match reply.read_exception() {
            Err(Error::Remote(e)) => {
                assert_eq!(e.code(), ExceptionCode::ServiceSpecific, "{}", name);
                assert_eq!(e.service_specific_code(), 42, "{}", name);
                assert_eq!(e.message(), "refused", "{}", name);
            }
            other => panic!("{}: expected remote exception, got {:?}", name, other),
        }

        let mut reply = Parcel::new();
        binder
            .transact(PANIC, &mut Parcel::new(), Some(&mut reply), 0)
            .expect(name);
        match reply.read_exception() {
            Err(Error::Remote(e)) => {
                assert_eq!(e.code(), ExceptionCode::IllegalState, "{}", name);
                assert!(e.message().contains("handler exploded"), "{}", name);
            }
            other => panic!("{}: expected illegal state, got {:?}", name, other),
        }
    }
}

#[test]
fn test_oneway_failures_are_swallowed() {
    init_logs();
    let (host, events) = calculator();
    for (name, binder) in connect(&host) {
        for code in [FAIL, PANIC] {
            let handled = binder
                .transact(code, &mut Parcel::new(), None, FLAG_ONEWAY)
                .expect(name);
            assert!(handled, "{}", name);
        }

        let mut data = Parcel::new();
        data.write_str(name);
        binder.transact(NOTIFY, &mut data, None, FLAG_ONEWAY).expect(name);
        assert_eq!(events.recv_timeout(WAIT).expect("event"), format!("{}:true", name));

        // The peer is still serving.
        assert_eq!(call_add(&binder, 1, 1).expect(name), 2);
    }
}

#[test]
fn test_interface_ping_and_unknown_code() {
    let (host, _events) = calculator();
    for (name, binder) in connect(&host) {
        assert_eq!(binder.interface_descriptor().expect(name), DESCRIPTOR);
        binder.ping_binder().expect(name);

        let mut reply = Parcel::new();
        let handled = binder
            .transact(LAST_CALL_TRANSACTION, &mut Parcel::new(), Some(&mut reply), 0)
            .expect(name);
        assert!(!handled, "{}", name);
        assert_eq!(reply.data_size(), 0, "{}", name);
    }
}

#[test]
fn test_dump_writes_to_out_descriptor() {
    let (host, _events) = calculator();
    for (name, binder) in connect(&host) {
        let (file, out) = shared_file();
        let args = vec![Some("--verbose".to_owned())];

        let mut data = Parcel::new();
        data.write_file_descriptor(None).expect("in");
        data.write_file_descriptor(Some(&out)).expect("out");
        data.write_file_descriptor(None).expect("err");
        data.write_string_array(Some(args.as_slice()));

        let mut reply = Parcel::new();
        assert!(binder
            .transact(DUMP_TRANSACTION, &mut data, Some(&mut reply), 0)
            .expect(name));
        reply.read_exception().expect(name);
        drop(out);
        assert_eq!(read_back(file), "calculator args=[\"--verbose\"]\n", "{}", name);
    }
}

#[test]
fn test_shell_command_reports_status_to_receiver() {
    let (host, _events) = calculator();
    for (name, binder) in connect(&host) {
        let (file, out) = shared_file();
        let (receiver, results) = ResultReceiver::create();
        let receiver: Arc<dyn IBinder> = receiver;
        let args = vec![Some("status".to_owned()), Some("--all".to_owned())];

        let mut data = Parcel::new();
        data.write_file_descriptor(None).expect("in");
        data.write_file_descriptor(Some(&out)).expect("out");
        data.write_file_descriptor(None).expect("err");
        data.write_string_array(Some(args.as_slice()));
        data.write_binder(None);
        data.write_binder(Some(&receiver));

        let mut reply = Parcel::new();
        binder
            .transact(SHELL_COMMAND_TRANSACTION, &mut data, Some(&mut reply), 0)
            .expect(name);
        reply.read_exception().expect(name);

        let (status, extras) = results.recv_timeout(WAIT).expect("shell result");
        assert_eq!(status, 2, "{}", name);
        assert!(extras.is_none(), "{}", name);
        drop(out);
        assert_eq!(read_back(file), "status --all", "{}", name);
    }
}

#[test]
fn test_dead_peer_direct() {
    init_logs();
    let (host, _events) = calculator();
    let binder: Arc<dyn IBinder> = BinderProxy::new(DirectTransport::new(&host));
    assert_eq!(call_add(&binder, 2, 3).expect("alive"), 5);

    drop(host);
    assert!(!binder.is_binder_alive());
    assert_eq!(format!("{:?}", binder), "BinderProxy(dead)");
    let err = call_add(&binder, 2, 3).expect_err("peer is gone");
    assert!(matches!(err, Error::DeadObject));
    assert!(err.is_transient());
    assert!(!err.is_format());
}

#[test]
fn test_dead_peer_channel() {
    init_logs();
    let (host, _events) = calculator();
    let transport = Arc::new(ChannelTransport::spawn(host).expect("spawn peer"));
    let binder: Arc<dyn IBinder> = BinderProxy::new(Arc::clone(&transport));
    assert_eq!(call_add(&binder, 2, 3).expect("alive"), 5);

    transport.shutdown();
    assert!(!binder.is_binder_alive());
    assert!(matches!(call_add(&binder, 2, 3), Err(Error::DeadObject)));
    assert!(matches!(
        binder.transact(NOTIFY, &mut Parcel::new(), None, FLAG_ONEWAY),
        Err(Error::DeadObject)
    ));
}

/// Holds the last handle to its own transport until told to let go.
struct SelfOwned {
    slot: Arc<Mutex<Option<Arc<ChannelTransport>>>>,
    gate: Receiver<()>,
    done: Sender<()>,
}

impl Binder for SelfOwned {
    fn descriptor(&self) -> &str {
        "test.ISelfOwned"
    }

    fn on_transact(
        &self,
        ctx: &TransactionContext,
        code: u32,
        data: &mut Parcel,
        reply: &mut Parcel,
        flags: u32,
    ) -> Result<bool, Exception> {
        if code != FIRST_CALL_TRANSACTION {
            return default_on_transact(self, ctx, code, data, reply, flags);
        }
        self.gate.recv_timeout(WAIT).expect("gate");
        let last = self.slot.lock().expect("slot").take();
        drop(last);
        let _ = self.done.send(());
        Ok(true)
    }
}

#[test]
fn test_channel_dropped_on_peer_thread() {
    init_logs();
    let slot = Arc::new(Mutex::new(None));
    let (gate_tx, gate) = channel::bounded(1);
    let (done, done_rx) = channel::bounded(1);
    let host = LocalBinder::new(SelfOwned {
        slot: Arc::clone(&slot),
        gate,
        done,
    });
    let transport = Arc::new(ChannelTransport::spawn(host).expect("spawn peer"));
    *slot.lock().expect("slot") = Some(Arc::clone(&transport));

    let binder: Arc<dyn IBinder> = BinderProxy::new(Arc::clone(&transport));
    binder
        .transact(FIRST_CALL_TRANSACTION, &mut Parcel::new(), None, FLAG_ONEWAY)
        .expect("oneway");
    drop(binder);
    drop(transport);
    drop(slot);

    // The handler now drops the only remaining handle on the peer thread.
    gate_tx.send(()).expect("gate");
    done_rx.recv_timeout(WAIT).expect("handler finished after releasing its transport");
}

#[test]
fn test_payload_limit_follows_runtime_config() {
    init_logs();
    let (events, _rx) = channel::unbounded();
    let config = Arc::new(RuntimeConfig::with_dispatch(DispatchConfig {
        max_transaction_size: 64,
        ..DispatchConfig::default()
    }));
    let host = LocalBinder::with_config(Calculator { events }, Arc::clone(&config));
    let binder: Arc<dyn IBinder> = BinderProxy::new(DirectTransport::new(&host));

    let mut data = Parcel::new();
    data.write_byte_array(Some(&[0u8; 128]));
    let err = binder
        .transact(ADD, &mut data, Some(&mut Parcel::new()), 0)
        .expect_err("request too large");
    match err {
        Error::Transport(TransportError::PayloadTooLarge { size, limit }) => {
            assert_eq!(size, 132);
            assert_eq!(limit, 64);
        }
        other => panic!("expected payload too large, got {:?}", other),
    }

    config.update(DispatchConfig::default());
    assert_eq!(call_add(&binder, 20, 22).expect("within limit"), 42);
}

#[test]
fn test_large_reply_is_delivered() {
    init_logs();
    let (events, _rx) = channel::unbounded();
    let config = Arc::new(RuntimeConfig::with_dispatch(DispatchConfig {
        reply_warn_threshold: 16,
        ..DispatchConfig::default()
    }));
    let host = LocalBinder::with_config(Calculator { events }, config);
    let binder: Arc<dyn IBinder> = BinderProxy::new(DirectTransport::new(&host));

    let mut bundle = Bundle::new();
    bundle.put("payload", vec![7u8; 256]).expect("put");
    let mut data = Parcel::new();
    bundle.write_to_parcel(&mut data).expect("encode");
    let mut reply = Parcel::new();
    binder.transact(ECHO_BUNDLE, &mut data, Some(&mut reply), 0).expect("echo");
    reply.read_exception().expect("no exception");
    let echoed = Bundle::read_from_parcel(&mut reply, DecodeOptions::new()).expect("decode");
    assert_eq!(echoed.get_byte_array("payload").expect("get"), Some(vec![7u8; 256]));
}

#[test]
fn test_context_cleared_after_dispatch() {
    let (host, events) = calculator();
    let ctx = TransactionContext::new();
    let mut data = Parcel::new();
    data.write_str("ctx");
    data.rewind();
    let mut reply = Parcel::new();

    ctx.begin(NOTIFY, 0, 4242);
    assert!(ctx.is_active());
    assert!(host.exec_transact(&ctx, NOTIFY, &mut data, &mut reply, 0));
    assert_eq!(events.try_recv().expect("event"), "ctx:false");

    assert!(!ctx.is_active());
    assert_eq!(ctx.code(), 0);
    assert_eq!(ctx.calling_pid(), 0);
    assert_eq!(ctx.work_source(), None);

    ctx.begin(PANIC, 0, 4242);
    assert!(host.exec_transact(&ctx, PANIC, &mut Parcel::new(), &mut reply, 0));
    assert!(!ctx.is_active());
}

#[test]
fn test_bundle_with_descriptor_crosses_peer_thread() {
    let (host, _events) = calculator();
    let (_file, fd) = shared_file();
    let mut bundle = Bundle::new();
    bundle.put("fd", Arc::clone(&fd)).expect("put");
    bundle.put("label", "log").expect("put");

    for (name, binder) in connect(&host) {
        let mut data = Parcel::new();
        bundle.write_to_parcel(&mut data).expect("encode");
        let mut reply = Parcel::new();
        binder.transact(ECHO_BUNDLE, &mut data, Some(&mut reply), 0).expect(name);
        reply.read_exception().expect(name);

        let echoed = Bundle::read_from_parcel(&mut reply, DecodeOptions::new()).expect(name);
        assert!(echoed.has_file_descriptors(), "{}", name);
        let received = echoed.get_file_descriptor("fd").expect(name).expect("fd");
        assert!(Arc::ptr_eq(&received, &fd), "{}", name);
        assert_eq!(echoed.get_string("label").expect(name).as_deref(), Some("log"));
    }
}

#[test]
fn test_service_manager_over_channel() {
    let (host, _events) = calculator();
    let sm = ServiceManager::new();
    let peer = ChannelTransport::spawn(host).expect("spawn peer");
    sm.add_service("calculator", BinderProxy::new(peer));

    assert_eq!(sm.list_services(), vec!["calculator"]);
    let binder = sm.get_service("calculator").expect("registered");
    assert_eq!(binder.interface_descriptor().expect("descriptor"), DESCRIPTOR);
    assert_eq!(call_add(&binder, -5, 5).expect("call"), 0);
    assert!(sm.get_service("missing").is_none());
}

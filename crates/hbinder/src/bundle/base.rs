// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lazy key-value container shared by [`Bundle`](super::Bundle) and
//! [`PersistableBundle`](super::PersistableBundle).
//!
//! # State machine
//!
//! ```text
//! Parcelled { region, options, depth } --first access--> Materialized(map)
//! ```
//!
//! A decoded container keeps a private copy of its wire region and parses it
//! only when a value is read or written. The transition happens once, under
//! the per-instance mutex. A zero-length region (empty sentinel) materializes
//! to an empty map without parsing.
//!
//! # Flags
//!
//! - `DEFUSABLE`: parse failures yield an empty map instead of an error
//! - `HAS_FDS` / `HAS_FDS_KNOWN`: cached file descriptor answer
//! - `ALLOW_FDS`: encoding a file descriptor is permitted

use super::codec;
use super::value::{FromValue, Value};
use super::{Bundle, PersistableBundle};
use crate::binder::IBinder;
use crate::config::DecodeOptions;
use crate::error::{Error, ParcelResult, Result};
use crate::parcel::{FileDescriptor, Parcel};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const FLAG_DEFUSABLE: u32 = 1 << 0;
const FLAG_HAS_FDS: u32 = 1 << 8;
const FLAG_HAS_FDS_KNOWN: u32 = 1 << 9;
const FLAG_ALLOW_FDS: u32 = 1 << 10;

const DEFAULT_FLAGS: u32 = FLAG_HAS_FDS_KNOWN | FLAG_ALLOW_FDS;

pub(crate) type EntryMap = IndexMap<String, Value>;

/// Which value types a container accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Bundle,
    Persistable,
}

impl ContainerKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            ContainerKind::Bundle => "Bundle",
            ContainerKind::Persistable => "PersistableBundle",
        }
    }
}

/// Undecoded wire region plus what is needed to decode it later.
#[derive(Clone)]
pub(crate) struct Pending {
    pub(crate) region: Parcel,
    pub(crate) options: DecodeOptions,
    pub(crate) depth: usize,
}

enum State {
    Materialized(Arc<EntryMap>),
    Parcelled(Pending),
}

/// Flags, decode counter and kind. Kept apart from the state so `&mut self` paths can
/// borrow both at once.
struct Meta {
    flags: AtomicU32,
    decode_count: AtomicU32,
    kind: ContainerKind,
}

impl Meta {
    fn new(kind: ContainerKind, flags: u32) -> Self {
        Self {
            flags: AtomicU32::new(flags),
            decode_count: AtomicU32::new(0),
            kind,
        }
    }

    #[inline]
    fn has_flag(&self, flag: u32) -> bool {
        self.flags.load(Ordering::Acquire) & flag != 0
    }

    /// Returns whether the flag was set before.
    fn set_flag(&self, flag: u32, on: bool) -> bool {
        let previous = if on {
            self.flags.fetch_or(flag, Ordering::AcqRel)
        } else {
            self.flags.fetch_and(!flag, Ordering::AcqRel)
        };
        previous & flag != 0
    }

    /// Ensure `state` is materialized and hand out its map.
    fn materialize<'a>(&self, state: &'a mut State) -> Result<&'a mut Arc<EntryMap>> {
        if let State::Parcelled(pending) = state {
            let (map, outcome) = self.decode_pending(pending);
            *state = State::Materialized(Arc::new(map));
            outcome?;
        }
        match state {
            State::Materialized(map) => Ok(map),
            State::Parcelled(_) => unreachable!("container materialized above"),
        }
    }

    /// Parse the pending region. The region is released by the caller
    /// replacing the state, whatever the outcome.
    fn decode_pending(&self, pending: &mut Pending) -> (EntryMap, Result<()>) {
        let mut map = EntryMap::new();
        let size = pending.region.data_size();
        if size == 0 {
            return (map, Ok(()));
        }

        self.decode_count.fetch_add(1, Ordering::Relaxed);
        let result = codec::read_entries(
            &mut pending.region,
            pending.options,
            pending.depth,
            self.kind,
            &mut map,
        );

        match result {
            Ok(()) => {
                log::trace!(
                    "[bundle] unparcelled {} entries from {} bytes",
                    map.len(),
                    size
                );
                (map, Ok(()))
            }
            Err(e) => {
                self.set_flag(FLAG_HAS_FDS_KNOWN, false);
                if self.has_flag(FLAG_DEFUSABLE) {
                    log::warn!(
                        "[bundle] failed to parse {} ({} bytes), defusing: {}",
                        self.kind.name(),
                        size,
                        e
                    );
                    (EntryMap::new(), Ok(()))
                } else {
                    log::warn!(
                        "[bundle] failed to parse {} ({} bytes) after {} entries: {}",
                        self.kind.name(),
                        size,
                        map.len(),
                        e
                    );
                    (map, Err(e.into()))
                }
            }
        }
    }
}

fn type_warning(key: &str, expected: &str, actual: &Value, default: fmt::Arguments<'_>) {
    log::warn!(
        "[bundle] key '{}' expected {} but value was a {}; the default value {} was returned",
        key,
        expected,
        actual.type_name(),
        default
    );
}

/// Generate `Option`-returning getters for reference and array types.
macro_rules! impl_optional_getters {
    ($($(#[$doc:meta])* $name:ident => $type:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, key: &str) -> Result<Option<$type>> {
                self.get_optional::<$type>(key)
            }
        )*
    };
}

/// Generate defaulted getters for scalar types.
macro_rules! impl_scalar_getters {
    ($($name:ident => $type:ty;)*) => {
        $(
            pub fn $name(&self, key: &str, default: $type) -> Result<$type> {
                self.get_typed(key, default)
            }
        )*
    };
}

/// Lazy key-value container.
pub struct BaseBundle {
    state: Mutex<State>,
    meta: Meta,
}

impl BaseBundle {
    pub(crate) fn new(kind: ContainerKind) -> Self {
        Self::with_capacity(kind, 0)
    }

    pub(crate) fn with_capacity(kind: ContainerKind, capacity: usize) -> Self {
        Self {
            state: Mutex::new(State::Materialized(Arc::new(EntryMap::with_capacity(capacity)))),
            meta: Meta::new(kind, DEFAULT_FLAGS),
        }
    }

    /// Container backed by an undecoded region.
    pub(crate) fn parcelled(kind: ContainerKind, pending: Pending) -> Self {
        let mut flags = FLAG_ALLOW_FDS;
        if pending.options.is_defusing() {
            flags |= FLAG_DEFUSABLE;
        }
        if pending.region.object_count() == 0 {
            flags |= FLAG_HAS_FDS_KNOWN;
        }
        Self {
            state: Mutex::new(State::Parcelled(pending)),
            meta: Meta::new(kind, flags),
        }
    }

    /// Empty sentinel: parcelled with a zero-length region.
    pub(crate) fn empty_parcel(kind: ContainerKind, options: DecodeOptions) -> Self {
        Self::parcelled(
            kind,
            Pending {
                region: Parcel::new(),
                options,
                depth: 0,
            },
        )
    }

    pub(crate) fn kind(&self) -> ContainerKind {
        self.meta.kind
    }

    // ===================================================================
    // Materialization
    // ===================================================================

    /// Decode the pending region, if any. Runs at most once.
    ///
    /// A defusable container swallows parse errors and ends up empty. A
    /// strict one keeps the entries read before the failure, drops the
    /// region and returns the error.
    pub fn unparcel(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.meta.materialize(&mut state).map(|_| ())
    }

    /// Materialize and share the current map.
    pub(crate) fn snapshot(&self) -> Result<Arc<EntryMap>> {
        let mut state = self.state.lock();
        self.meta.materialize(&mut state).map(|map| Arc::clone(map))
    }

    fn lookup<R>(&self, key: &str, f: impl FnOnce(Option<&Value>) -> R) -> Result<R> {
        let mut state = self.state.lock();
        let map = self.meta.materialize(&mut state)?;
        Ok(f(map.get(key)))
    }

    fn entries_mut(&mut self) -> Result<&mut EntryMap> {
        let map = self.meta.materialize(self.state.get_mut())?;
        Ok(Arc::make_mut(map))
    }

    // ===================================================================
    // Reading
    // ===================================================================

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.lookup(key, |value| value.cloned())
    }

    /// Typed read. Missing keys and `Null` yield `default`; a value of another
    /// type is logged and also yields `default`.
    pub fn get_typed<T: FromValue + fmt::Debug>(&self, key: &str, default: T) -> Result<T> {
        self.lookup(key, |value| match value {
            None | Some(Value::Null) => default,
            Some(value) => match T::from_value(value) {
                Some(v) => v,
                None => {
                    type_warning(key, T::TYPE_NAME, value, format_args!("{:?}", default));
                    default
                }
            },
        })
    }

    fn get_optional<T: FromValue>(&self, key: &str) -> Result<Option<T>> {
        self.lookup(key, |value| match value {
            None | Some(Value::Null) => None,
            Some(value) => {
                let typed = T::from_value(value);
                if typed.is_none() {
                    type_warning(key, T::TYPE_NAME, value, format_args!("null"));
                }
                typed
            }
        })
    }

    impl_scalar_getters! {
        get_bool => bool;
        get_byte => i8;
        get_short => i16;
        get_char => u16;
        get_int => i32;
        get_long => i64;
        get_float => f32;
        get_double => f64;
    }

    impl_optional_getters! {
        get_string => String;
        get_bundle => Arc<Bundle>;
        get_persistable_bundle => Arc<PersistableBundle>;
        get_file_descriptor => Arc<FileDescriptor>;
        get_binder => Arc<dyn IBinder>;
        get_bool_array => Vec<bool>;
        get_byte_array => Vec<u8>;
        get_short_array => Vec<i16>;
        get_char_array => Vec<u16>;
        get_int_array => Vec<i32>;
        get_long_array => Vec<i64>;
        get_float_array => Vec<f32>;
        get_double_array => Vec<f64>;
        get_string_array => Vec<Option<String>>;
        get_bundle_array => Vec<Option<Arc<Bundle>>>;
        /// Heterogeneous list value.
        get_list => Vec<Value>;
    }

    /// String value, or `default` when missing, null or of another type.
    pub fn get_string_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.get_string(key)?.unwrap_or_else(|| default.to_owned()))
    }

    pub fn size(&self) -> Result<usize> {
        let mut state = self.state.lock();
        Ok(self.meta.materialize(&mut state)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.lookup(key, |value| value.is_some())
    }

    /// Keys in insertion order.
    pub fn key_set(&self) -> Result<Vec<String>> {
        Ok(self.snapshot()?.keys().cloned().collect())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> Result<Vec<(String, Value)>> {
        Ok(self
            .snapshot()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    // ===================================================================
    // Mutation
    // ===================================================================

    fn check_allowed(&self, key: &str, value: &Value) -> Result<()> {
        if self.meta.kind == ContainerKind::Persistable && !value.is_persistable() {
            return Err(Error::InvalidValueType {
                key: key.to_owned(),
                type_name: value.type_name(),
            });
        }
        Ok(())
    }

    /// Insert or replace.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        self.check_allowed(&key, &value)?;
        if value.is_reference() {
            self.meta.set_flag(FLAG_HAS_FDS_KNOWN, false);
        }
        self.entries_mut()?.insert(key, value);
        Ok(())
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries_mut()?.shift_remove(key))
    }

    /// Drop every entry, and any pending region, without decoding.
    pub fn clear(&mut self) {
        *self.state.get_mut() = State::Materialized(Arc::default());
        self.meta.set_flag(FLAG_HAS_FDS, false);
        self.meta.set_flag(FLAG_HAS_FDS_KNOWN, true);
    }

    /// Copy every entry of `other` into this container.
    pub fn put_all(&mut self, other: &BaseBundle) -> Result<()> {
        let source = other.snapshot()?;
        for (key, value) in source.iter() {
            self.check_allowed(key, value)?;
        }

        let other_flags = other.meta.flags.load(Ordering::Acquire);
        let entries = self.entries_mut()?;
        for (key, value) in source.iter() {
            entries.insert(key.clone(), value.clone());
        }

        if other_flags & FLAG_HAS_FDS != 0 {
            self.meta.set_flag(FLAG_HAS_FDS, true);
        }
        if other_flags & FLAG_HAS_FDS_KNOWN == 0 {
            self.meta.set_flag(FLAG_HAS_FDS_KNOWN, false);
        }
        Ok(())
    }

    // ===================================================================
    // File descriptors
    // ===================================================================

    /// True when the container, or anything nested in it, holds a file
    /// descriptor. A parcelled container answers from its region's object
    /// table without decoding.
    pub fn has_file_descriptors(&self) -> bool {
        let flags = self.meta.flags.load(Ordering::Acquire);
        if flags & FLAG_HAS_FDS_KNOWN != 0 {
            return flags & FLAG_HAS_FDS != 0;
        }

        let map = {
            let state = self.state.lock();
            match &*state {
                State::Parcelled(pending) => {
                    let has = pending.region.has_file_descriptors();
                    self.cache_fds(has);
                    return has;
                }
                State::Materialized(map) => Arc::clone(map),
            }
        };
        let has = map.values().any(Value::has_file_descriptors);
        self.cache_fds(has);
        has
    }

    fn cache_fds(&self, has: bool) {
        self.meta.set_flag(FLAG_HAS_FDS, has);
        self.meta.set_flag(FLAG_HAS_FDS_KNOWN, true);
    }

    pub(crate) fn allow_fds(&self) -> bool {
        self.meta.has_flag(FLAG_ALLOW_FDS)
    }

    pub(crate) fn set_allow_fds(&self, allow: bool) -> bool {
        self.meta.set_flag(FLAG_ALLOW_FDS, allow)
    }

    // ===================================================================
    // Introspection
    // ===================================================================

    /// True while the wire region is still undecoded.
    pub fn is_parcelled(&self) -> bool {
        matches!(&*self.state.lock(), State::Parcelled(_))
    }

    /// True for the empty sentinel (parcelled, zero-length region).
    pub fn is_empty_parcel(&self) -> bool {
        matches!(&*self.state.lock(), State::Parcelled(p) if p.region.data_size() == 0)
    }

    /// Empty without decoding anything: the empty sentinel or an empty map.
    pub fn is_definitely_empty(&self) -> bool {
        match &*self.state.lock() {
            State::Parcelled(pending) => pending.region.data_size() == 0,
            State::Materialized(map) => map.is_empty(),
        }
    }

    pub fn set_defusable(&self, defusable: bool) {
        self.meta.set_flag(FLAG_DEFUSABLE, defusable);
    }

    pub fn is_defusable(&self) -> bool {
        self.meta.has_flag(FLAG_DEFUSABLE)
    }

    /// Number of times a non-empty region was parsed (0 or 1).
    pub fn decode_count(&self) -> u32 {
        self.meta.decode_count.load(Ordering::Relaxed)
    }

    // ===================================================================
    // Copies and encoding
    // ===================================================================

    /// Copy with nested containers duplicated recursively. File descriptors
    /// and binders stay shared. A parcelled container copies its region.
    pub(crate) fn deep_copy_base(&self) -> BaseBundle {
        let state = match &*self.state.lock() {
            State::Parcelled(pending) => State::Parcelled(pending.clone()),
            State::Materialized(map) => State::Materialized(Arc::new(
                map.iter().map(|(k, v)| (k.clone(), v.deep_copy())).collect(),
            )),
        };
        self.with_state(state)
    }

    fn with_state(&self, state: State) -> BaseBundle {
        BaseBundle {
            state: Mutex::new(state),
            meta: Meta::new(self.meta.kind, self.meta.flags.load(Ordering::Acquire)),
        }
    }

    /// Same representation and same content: both parcelled with identical
    /// regions, or both materialized with equal maps. Never decodes.
    pub(crate) fn kind_of_equals_base(&self, other: &BaseBundle) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let ours = self.raw_view();
        let theirs = other.raw_view();
        match (ours, theirs) {
            (RawView::Region(a), RawView::Region(b)) => a == b,
            (RawView::Map(a), RawView::Map(b)) => maps_equal(&a, &b),
            _ => false,
        }
    }

    fn raw_view(&self) -> RawView {
        match &*self.state.lock() {
            State::Parcelled(pending) => RawView::Region(pending.region.clone()),
            State::Materialized(map) => RawView::Map(Arc::clone(map)),
        }
    }

    /// Encode into `out`. See [`codec::write_to_parcel`].
    pub fn write_to_parcel(&self, out: &mut Parcel) -> Result<()> {
        codec::write_to_parcel(self, out)
    }

    /// Encode at a nesting level, honouring this container's fd policy.
    pub(crate) fn write_at_depth(&self, out: &mut Parcel, depth: usize) -> ParcelResult<()> {
        let previous = out.push_allow_fds(self.allow_fds());
        let result = {
            let state = self.state.lock();
            match &*state {
                State::Parcelled(pending) => codec::write_region(out, &pending.region),
                State::Materialized(map) => codec::write_map(out, map, depth),
            }
        };
        out.restore_allow_fds(previous);
        result
    }

    pub(crate) fn fmt_named(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        match self.raw_view_cheap() {
            CheapView::EmptyParcel => write!(f, "{}[EMPTY_PARCEL]", name),
            CheapView::Parcelled(size) => write!(f, "{}[parcelled; {} bytes]", name, size),
            CheapView::Map(map) => {
                write!(f, "{}[{{", name)?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                f.write_str("}]")
            }
        }
    }

    fn raw_view_cheap(&self) -> CheapView {
        match &*self.state.lock() {
            State::Parcelled(pending) if pending.region.data_size() == 0 => CheapView::EmptyParcel,
            State::Parcelled(pending) => CheapView::Parcelled(pending.region.data_size()),
            State::Materialized(map) => CheapView::Map(Arc::clone(map)),
        }
    }
}

enum RawView {
    Region(Parcel),
    Map(Arc<EntryMap>),
}

enum CheapView {
    EmptyParcel,
    Parcelled(usize),
    Map(Arc<EntryMap>),
}

/// Order-insensitive map equality.
fn maps_equal(a: &EntryMap, b: &EntryMap) -> bool {
    a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
}

/// Shallow copy: same state, values shared. A parcelled container gets its
/// own copy of the region.
impl Clone for BaseBundle {
    fn clone(&self) -> Self {
        let state = match &*self.state.lock() {
            State::Parcelled(pending) => State::Parcelled(pending.clone()),
            State::Materialized(map) => State::Materialized(Arc::clone(map)),
        };
        self.with_state(state)
    }
}

/// Content equality. Decodes both sides; a container that fails to decode
/// equals nothing but itself.
impl PartialEq for BaseBundle {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (self.snapshot(), other.snapshot()) {
            (Ok(a), Ok(b)) => maps_equal(&a, &b),
            _ => false,
        }
    }
}

impl fmt::Display for BaseBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_named(f, self.meta.kind.name())
    }
}

impl fmt::Debug for BaseBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

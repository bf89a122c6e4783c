// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key-value containers with lazy wire decoding.
//!
//! [`Bundle`] accepts every [`Value`] type; [`PersistableBundle`] accepts
//! only plain data (no handles, no floats, no lists). Both deref to
//! [`BaseBundle`] for the shared accessors.

mod base;
pub mod codec;
mod persistable;
mod value;

pub use base::BaseBundle;
pub use persistable::PersistableBundle;
pub use value::{FromValue, Value, ValueTag};

use crate::config::DecodeOptions;
use crate::error::Result;
use crate::parcel::Parcel;
use base::ContainerKind;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// General-purpose container.
#[derive(Clone, PartialEq)]
pub struct Bundle {
    base: BaseBundle,
}

impl Bundle {
    pub fn new() -> Self {
        Self {
            base: BaseBundle::new(ContainerKind::Bundle),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            base: BaseBundle::with_capacity(ContainerKind::Bundle, capacity),
        }
    }

    /// The empty sentinel: parcelled, zero bytes, decodes to nothing.
    pub fn empty() -> Self {
        Self {
            base: BaseBundle::empty_parcel(ContainerKind::Bundle, DecodeOptions::new()),
        }
    }

    /// Bundle holding a single entry.
    pub fn for_pair(key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let mut bundle = Self::with_capacity(1);
        bundle.put(key, value)?;
        Ok(bundle)
    }

    pub(crate) fn from_base(base: BaseBundle) -> Self {
        debug_assert_eq!(base.kind(), ContainerKind::Bundle);
        Self { base }
    }

    /// Shallow copy (same as `clone`).
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Copy with nested containers duplicated. Handles stay shared.
    pub fn deep_copy(&self) -> Self {
        Self {
            base: self.base.deep_copy_base(),
        }
    }

    /// Set whether this bundle may carry file descriptors when encoded.
    /// Returns the previous setting.
    pub fn set_allow_fds(&self, allow: bool) -> bool {
        self.base.set_allow_fds(allow)
    }

    pub fn allow_fds(&self) -> bool {
        self.base.allow_fds()
    }

    /// Cheap equality that never decodes: both parcelled with identical
    /// regions, or both materialized with equal maps.
    pub fn kind_of_equals(&self, other: &Bundle) -> bool {
        self.base.kind_of_equals_base(&other.base)
    }

    /// See [`codec::read_from_parcel`].
    pub fn read_from_parcel(input: &mut Parcel, options: DecodeOptions) -> Result<Self> {
        codec::read_from_parcel(input, options)
    }

    /// Read a nullable bundle reference.
    pub fn read_nullable(input: &mut Parcel, options: DecodeOptions) -> Result<Option<Self>> {
        codec::read_nullable_from_parcel(input, options)
    }

    /// Write a nullable bundle reference.
    pub fn write_nullable(bundle: Option<&Bundle>, out: &mut Parcel) -> Result<()> {
        codec::write_nullable_to_parcel(bundle, out)
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Bundle {
    type Target = BaseBundle;

    fn deref(&self) -> &BaseBundle {
        &self.base
    }
}

impl DerefMut for Bundle {
    fn deref_mut(&mut self) -> &mut BaseBundle {
        &mut self.base
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.fmt_named(f, "Bundle")
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_pair() {
        let b = Bundle::for_pair("answer", 42).expect("pair");
        assert_eq!(b.get_int("answer", 0).expect("get"), 42);
        assert_eq!(b.size().expect("size"), 1);
    }

    #[test]
    fn test_allow_fds_flag() {
        let b = Bundle::new();
        assert!(b.allow_fds());
        assert!(b.set_allow_fds(false));
        assert!(!b.allow_fds());
        assert!(!b.set_allow_fds(true));
    }

    #[test]
    fn test_kind_of_equals_does_not_decode() {
        let mut src = Bundle::new();
        src.put("a", "x").expect("put");
        let mut p = Parcel::new();
        src.write_to_parcel(&mut p).expect("encode");

        p.rewind();
        let a = Bundle::read_from_parcel(&mut p, DecodeOptions::new()).expect("decode");
        p.rewind();
        let b = Bundle::read_from_parcel(&mut p, DecodeOptions::new()).expect("decode");

        assert!(a.kind_of_equals(&b));
        assert!(!a.kind_of_equals(&src));
        assert_eq!(a.decode_count(), 0);
        assert_eq!(b.decode_count(), 0);
        // full equality decodes
        assert_eq!(a, src);
    }

    #[test]
    fn test_display_parcelled() {
        let mut src = Bundle::new();
        src.put("a", 1).expect("put");
        let mut p = Parcel::new();
        src.write_to_parcel(&mut p).expect("encode");
        p.rewind();
        let decoded = Bundle::read_from_parcel(&mut p, DecodeOptions::new()).expect("decode");
        let size = p.data_size() - 4;
        assert_eq!(decoded.to_string(), format!("Bundle[parcelled; {} bytes]", size));
        assert_eq!(Bundle::empty().to_string(), "Bundle[EMPTY_PARCEL]");
    }
}

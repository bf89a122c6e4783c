// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container restricted to plain data that can be stored on disk.

use super::base::{BaseBundle, ContainerKind};
use super::codec;
use super::{Bundle, Value};
use crate::config::DecodeOptions;
use crate::error::Result;
use crate::parcel::Parcel;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Container accepting `Bool`, `Int`, `Long`, `Double`, `String`, their
/// arrays (no float, byte, short or char arrays), nested
/// `PersistableBundle`s and `Null`.
///
/// `put` of any other value fails with
/// [`Error::InvalidValueType`](crate::Error::InvalidValueType).
#[derive(Clone, PartialEq)]
pub struct PersistableBundle {
    base: BaseBundle,
}

impl PersistableBundle {
    pub fn new() -> Self {
        Self {
            base: BaseBundle::new(ContainerKind::Persistable),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            base: BaseBundle::with_capacity(ContainerKind::Persistable, capacity),
        }
    }

    pub fn empty() -> Self {
        Self {
            base: BaseBundle::empty_parcel(ContainerKind::Persistable, DecodeOptions::new()),
        }
    }

    pub(crate) fn from_base(base: BaseBundle) -> Self {
        debug_assert_eq!(base.kind(), ContainerKind::Persistable);
        Self { base }
    }

    /// Convert a [`Bundle`]. Nested bundles are converted recursively; the
    /// first value that cannot be persisted fails the conversion.
    pub fn from_bundle(bundle: &Bundle) -> Result<Self> {
        let entries = bundle.entries()?;
        let mut out = Self::with_capacity(entries.len());
        for (key, value) in entries {
            let value = match value {
                Value::Bundle(nested) => {
                    Value::PersistableBundle(Arc::new(Self::from_bundle(&nested)?))
                }
                other => other,
            };
            out.put(key, value)?;
        }
        Ok(out)
    }

    pub fn deep_copy(&self) -> Self {
        Self {
            base: self.base.deep_copy_base(),
        }
    }

    pub fn read_from_parcel(input: &mut Parcel, options: DecodeOptions) -> Result<Self> {
        codec::read_persistable_from_parcel(input, options)
    }
}

impl Default for PersistableBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PersistableBundle {
    type Target = BaseBundle;

    fn deref(&self) -> &BaseBundle {
        &self.base
    }
}

impl DerefMut for PersistableBundle {
    fn deref_mut(&mut self) -> &mut BaseBundle {
        &mut self.base
    }
}

impl fmt::Display for PersistableBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.fmt_named(f, "PersistableBundle")
    }
}

impl fmt::Debug for PersistableBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

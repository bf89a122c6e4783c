// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire constants and runtime configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: compile-time constants (container magic, limits)
//! - **Level 2 (Explicit)**: [`DecodeOptions`], passed to every decode entry
//!   point. The defuse policy lives here, never in a global.
//! - **Level 3 (Dynamic)**: [`RuntimeConfig`] holding a hot-swappable
//!   [`DispatchConfig`] snapshot shared by binder hosts and transports.
//!
//! # Example
//!
//! ```
//! use hbinder::config::{DecodeOptions, DispatchConfig, RuntimeConfig};
//!
//! let opts = DecodeOptions::new().defuse(true).max_depth(16);
//! assert!(opts.is_defusing());
//!
//! let config = RuntimeConfig::new();
//! config.update(DispatchConfig {
//!     reply_warn_threshold: 64 * 1024,
//!     ..DispatchConfig::default()
//! });
//! assert_eq!(config.dispatch().reply_warn_threshold, 64 * 1024);
//! ```

use arc_swap::ArcSwap;
use std::sync::Arc;

// =======================================================================
// Container wire format
// =======================================================================

/// Container magic, ASCII "BNDL" read as a little-endian i32.
pub const BUNDLE_MAGIC: i32 = 0x4C44_4E42;

/// Default limit for nested containers and lists during decode and encode.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

// =======================================================================
// Transaction limits
// =======================================================================

/// Reply size that triggers a diagnostic warning (soft budget).
pub const DEFAULT_REPLY_WARN_THRESHOLD: usize = 800 * 1024;

/// Hard transaction size limit enforced by transports.
pub const DEFAULT_MAX_TRANSACTION_SIZE: usize = 1024 * 1024;

// =======================================================================
// Decode options
// =======================================================================

/// Options threaded through container decoding.
///
/// Decoding is a pure function of the input parcel and these options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    defuse: bool,
    max_depth: usize,
}

impl DecodeOptions {
    /// Strict decoding with the default nesting limit.
    pub const fn new() -> Self {
        Self {
            defuse: false,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Options for a container that has reached its final consumer:
    /// malformed payloads are replaced by an empty map.
    pub const fn defusing() -> Self {
        Self {
            defuse: true,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Set the defuse policy.
    #[must_use]
    pub const fn defuse(mut self, defuse: bool) -> Self {
        self.defuse = defuse;
        self
    }

    /// Set the nesting limit.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn is_defusing(&self) -> bool {
        self.defuse
    }

    pub const fn depth_limit(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

// =======================================================================
// Dispatch configuration
// =======================================================================

/// Limits and logging policy for transaction dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default))]
pub struct DispatchConfig {
    /// Replies at or above this size are logged as suspicious.
    pub reply_warn_threshold: usize,
    /// Requests or replies above this size are rejected by transports.
    pub max_transaction_size: usize,
    /// Log exceptions swallowed by one-way dispatch.
    pub log_oneway_exceptions: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            reply_warn_threshold: DEFAULT_REPLY_WARN_THRESHOLD,
            max_transaction_size: DEFAULT_MAX_TRANSACTION_SIZE,
            log_oneway_exceptions: true,
        }
    }
}

/// Shared, atomically swappable dispatch configuration.
///
/// Readers take a cheap snapshot with [`RuntimeConfig::dispatch`]; writers
/// replace the whole snapshot with [`RuntimeConfig::update`].
#[derive(Debug)]
pub struct RuntimeConfig {
    dispatch: ArcSwap<DispatchConfig>,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::with_dispatch(DispatchConfig::default())
    }

    pub fn with_dispatch(dispatch: DispatchConfig) -> Self {
        Self {
            dispatch: ArcSwap::from_pointee(dispatch),
        }
    }

    /// Current dispatch snapshot.
    #[inline]
    pub fn dispatch(&self) -> Arc<DispatchConfig> {
        self.dispatch.load_full()
    }

    /// Replace the dispatch snapshot.
    pub fn update(&self, dispatch: DispatchConfig) {
        log::debug!("[config] dispatch config updated: {:?}", dispatch);
        self.dispatch.store(Arc::new(dispatch));
    }

    /// Shared default instance.
    pub fn shared() -> Arc<RuntimeConfig> {
        Arc::new(Self::new())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "config-loaders")]
impl DispatchConfig {
    /// Parse a YAML document. Missing fields keep their defaults.
    ///
    /// ```yaml
    /// reply_warn_threshold: 819200
    /// max_transaction_size: 1048576
    /// log_oneway_exceptions: true
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse YAML: {}", e))
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read YAML file: {}", e))?;
        Self::from_yaml_str(&content)
    }
}

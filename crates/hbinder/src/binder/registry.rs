// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name to binder registry.

use super::IBinder;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL_SERVICE_MANAGER: OnceLock<ServiceManager> = OnceLock::new();

/// Registry of named services.
///
/// Lookups through [`ServiceManager::get_service`] drop entries whose binder
/// has died.
#[derive(Default)]
pub struct ServiceManager {
    services: DashMap<String, Arc<dyn IBinder>>,
}

impl ServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance.
    pub fn global() -> &'static ServiceManager {
        GLOBAL_SERVICE_MANAGER.get_or_init(ServiceManager::new)
    }

    /// Register `binder` under `name`, returning the binder it replaced.
    pub fn add_service(&self, name: &str, binder: Arc<dyn IBinder>) -> Option<Arc<dyn IBinder>> {
        log::debug!("[servicemanager] add '{}'", name);
        self.services.insert(name.to_owned(), binder)
    }

    /// Live service registered under `name`.
    pub fn get_service(&self, name: &str) -> Option<Arc<dyn IBinder>> {
        let binder = self.check_service(name)?;
        if binder.is_binder_alive() {
            return Some(binder);
        }
        log::debug!("[servicemanager] '{}' is dead, removing", name);
        self.services
            .remove_if(name, |_, registered| Arc::ptr_eq(registered, &binder));
        None
    }

    /// Registered binder, dead or alive. Never blocks.
    pub fn check_service(&self, name: &str) -> Option<Arc<dyn IBinder>> {
        self.services.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Sorted service names.
    pub fn list_services(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn remove_service(&self, name: &str) -> Option<Arc<dyn IBinder>> {
        self.services.remove(name).map(|(_, binder)| binder)
    }
}

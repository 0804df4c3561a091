//! The facade other components hold on to.
//!
//! `MotdService` owns exactly one mutable thing: the slot holding the current
//! provider. Readers load it once per query; the reload path replaces it with a
//! single atomic store.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use log::{debug, info};

use super::{MotdProvider, MotdResponse};
use crate::config::ConfigLoader;
use crate::errors::ConfigError;

// arc-swap only stores `Arc<T>` for sized `T`, hence the inner box.
pub type SharedProvider = Arc<Box<dyn MotdProvider>>;

pub struct MotdService {
    current: ArcSwap<Box<dyn MotdProvider>>,
    last_generation: AtomicU64,
}

impl MotdService {
    pub fn new<P: MotdProvider + 'static>(provider: P) -> Self {
        let generation = provider.generation();
        Self {
            current: ArcSwap::from_pointee(Box::new(provider) as Box<dyn MotdProvider>),
            last_generation: AtomicU64::new(generation),
        }
    }

    /// Build a service from a fresh load of `loader`.
    pub fn load(loader: &ConfigLoader) -> Result<Self, ConfigError> {
        let config = loader.load()?;
        Ok(Self::new(config.into_provider(1)))
    }

    /// Response for one status query. Never fails and never blocks.
    pub fn get_response(&self) -> MotdResponse {
        self.current.load().next_response()
    }

    /// Atomically install `provider`, returning the one it replaced.
    ///
    /// Callers that start after this returns see the new provider. Callers
    /// already inside `get_response` finish on whichever one they loaded.
    pub fn swap_provider<P: MotdProvider + 'static>(&self, provider: P) -> SharedProvider {
        let generation = provider.generation();
        self.last_generation.fetch_max(generation, Ordering::AcqRel);
        let old = self
            .current
            .swap(Arc::new(Box::new(provider) as Box<dyn MotdProvider>));
        debug!(
            "MOTD provider swapped: generation {} -> {}",
            old.generation(),
            generation
        );
        old
    }

    /// Reload from disk and swap on success. On error the current provider
    /// keeps serving and the error is returned to the caller.
    pub fn reload(&self, loader: &ConfigLoader) -> Result<u64, ConfigError> {
        let config = loader.load()?;
        let generation = self.last_generation.fetch_add(1, Ordering::AcqRel) + 1;
        let (messages, icons) = (config.messages.len(), config.icons.len());
        self.swap_provider(config.into_provider(generation));
        info!(
            "MOTD reloaded: {} messages, {} icons (generation {})",
            messages, icons, generation
        );
        Ok(generation)
    }

    /// Generation of the provider currently installed.
    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }
}

impl fmt::Debug for MotdService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotdService")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

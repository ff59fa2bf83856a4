//! Mapper services and how they are located

use crate::{MemoryHandle, SharedMemoryDescriptor, TransportError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A service that turns descriptors of one provider into local mappings
pub trait Mapper: Send + Sync {
    /// Map the descriptor; it is moved into the returned mapping
    fn map_memory(&self, descriptor: SharedMemoryDescriptor) -> Result<MemoryHandle, TransportError>;

    /// True for proxies that forward calls across a process boundary
    fn is_remote(&self) -> bool;
}

/// Looks up mapper services by provider name
pub trait ServiceLocator: Send + Sync {
    /// Find the mapper registered under `name`.
    ///
    /// With `stub_only` set, only in-process (passthrough) implementations
    /// may be returned. Implementations must not call back into a
    /// [`MapperRegistry`](crate::MapperRegistry).
    fn get_service(&self, name: &str, stub_only: bool) -> Option<Arc<dyn Mapper>>;
}

/// Locator for mappers loaded into this process.
///
/// Everything registered here is in-process, so the `stub_only` restriction
/// is satisfied by construction.
#[derive(Default)]
pub struct InProcessServiceLocator {
    mappers: RwLock<HashMap<String, Arc<dyn Mapper>>>,
}

impl InProcessServiceLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapper, replacing any previous entry with the same name
    pub fn register(&self, name: impl Into<String>, mapper: Arc<dyn Mapper>) {
        let name = name.into();
        debug!(name = %name, "Registering in-process mapper");
        self.mappers.write().insert(name, mapper);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mappers.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.mappers.read().keys().cloned().collect()
    }
}

impl ServiceLocator for InProcessServiceLocator {
    fn get_service(&self, name: &str, _stub_only: bool) -> Option<Arc<dyn Mapper>> {
        self.mappers.read().get(name).cloned()
    }
}

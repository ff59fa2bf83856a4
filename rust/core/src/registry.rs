//! Cache of discovered mapper services, keyed by provider name

use crate::{Mapper, ServiceLocator};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves provider names to mappers, discovering each name at most once.
///
/// Entries are never evicted or re-validated. A mapper that later stops
/// working reports that through its own calls.
pub struct MapperRegistry {
    locator: Arc<dyn ServiceLocator>,
    mappers: Mutex<HashMap<String, Arc<dyn Mapper>>>,
}

impl MapperRegistry {
    pub fn new(locator: Arc<dyn ServiceLocator>) -> Self {
        Self {
            locator,
            mappers: Mutex::new(HashMap::new()),
        }
    }

    /// Get the mapper for `name`, discovering it on first use.
    ///
    /// The lock is held across discovery so concurrent first requests share
    /// a single lookup. Failed lookups are not cached.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Mapper>> {
        let mut mappers = self.mappers.lock();
        if let Some(mapper) = mappers.get(name) {
            debug!(provider = name, "Using cached mapper");
            return Some(Arc::clone(mapper));
        }

        debug!(provider = name, "Discovering mapper service");
        match self.locator.get_service(name, true) {
            Some(mapper) => {
                mappers.insert(name.to_string(), Arc::clone(&mapper));
                Some(mapper)
            }
            None => {
                debug!(provider = name, "No mapper service found");
                None
            }
        }
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.mappers.lock().contains_key(name)
    }

    pub fn cached_names(&self) -> Vec<String> {
        self.mappers.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.mappers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Memory Mapper
//!
//! Resolves named shared memory descriptors into mappings owned by this
//! process. Descriptors name a provider; a mapper service registered under
//! that name performs the mapping, and the built-in `"ashmem"` provider is
//! mapped locally when no service answers for it.
//!
//! ```no_run
//! use memory_mapper::prelude::*;
//! # fn fd() -> std::os::fd::OwnedFd { unimplemented!() }
//!
//! let descriptor = SharedMemoryDescriptor::new("ashmem", NativeHandle::from_fd(fd()), 4096);
//! if let Some(memory) = memory_mapper::map_memory(descriptor) {
//!     assert_eq!(memory.size(), 4096);
//! }
//! ```

pub mod resolver;

pub use memory_mapper_core::*;
pub use memory_mapper_shared_memory::{AshmemMemory, MappedRegion};
pub use resolver::*;

use std::sync::{Arc, OnceLock};

/// Re-export common types
pub mod prelude {
    pub use crate::resolver::MemoryMapper;
    pub use memory_mapper_core::prelude::*;
}

static LOCATOR: OnceLock<Arc<InProcessServiceLocator>> = OnceLock::new();
static MAPPER: OnceLock<MemoryMapper> = OnceLock::new();

/// Locator holding the mappers registered with [`register_mapper`]
pub fn global_locator() -> &'static Arc<InProcessServiceLocator> {
    LOCATOR.get_or_init(|| Arc::new(InProcessServiceLocator::new()))
}

/// Process-wide resolver with the default configuration
pub fn global() -> &'static MemoryMapper {
    MAPPER.get_or_init(|| {
        let locator: Arc<dyn ServiceLocator> = global_locator().clone();
        MemoryMapper::new(locator, MapperConfig::default())
    })
}

/// Make an in-process mapper discoverable by the process-wide resolver.
///
/// Names the resolver has already cached keep their existing mapper.
pub fn register_mapper(name: impl Into<String>, mapper: Arc<dyn Mapper>) {
    global_locator().register(name, mapper);
}

/// Map `descriptor` with the process-wide resolver.
///
/// The descriptor is consumed even when no mapping is made. Use
/// [`try_map_or_return`] to get it back from failures that happen before a
/// mapping is attempted.
pub fn map_memory(descriptor: SharedMemoryDescriptor) -> Option<MemoryHandle> {
    global().map_memory(descriptor)
}

/// Map `descriptor` with the process-wide resolver, returning the failure reason
pub fn try_map_memory(descriptor: SharedMemoryDescriptor) -> Result<MemoryHandle> {
    global().try_map_memory(descriptor)
}

/// Map `descriptor` with the process-wide resolver, handing it back unless a
/// mapping was attempted
pub fn try_map_or_return(descriptor: SharedMemoryDescriptor) -> std::result::Result<MemoryHandle, Unmapped> {
    global().try_map_or_return(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMapper {
        calls: AtomicUsize,
    }

    impl Mapper for CountingMapper {
        fn map_memory(&self, _descriptor: SharedMemoryDescriptor) -> std::result::Result<MemoryHandle, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Failed("not implemented".to_string()))
        }

        fn is_remote(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_global_ashmem_fallback() {
        let file = tempfile::tempfile().unwrap();
        file.set_len(4096).unwrap();
        let descriptor = SharedMemoryDescriptor::new(DEFAULT_PROVIDER_NAME, NativeHandle::from_fd(file), 4096);

        let memory = map_memory(descriptor).unwrap();
        assert_eq!(memory.size(), 4096);
        assert!(!memory.pointer().is_null());
        assert!(std::ptr::eq(global(), global()));
    }

    #[test]
    fn test_global_registered_mapper() {
        let mapper = Arc::new(CountingMapper { calls: AtomicUsize::new(0) });
        register_mapper("global-test-provider", mapper.clone());

        let descriptor = SharedMemoryDescriptor::new("global-test-provider", NativeHandle::default(), 16);
        let err = try_map_memory(descriptor).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::TransportFailed);
        assert_eq!(mapper.calls.load(Ordering::SeqCst), 1);
        assert!(global().registry().is_cached("global-test-provider"));
    }

    #[test]
    fn test_global_returns_unknown_descriptor() {
        let descriptor = SharedMemoryDescriptor::new("global-unknown-provider", NativeHandle::default(), 8);
        let unmapped = try_map_or_return(descriptor).unwrap_err();

        assert_eq!(unmapped.error.category(), ErrorCategory::NotFound);
        assert_eq!(unmapped.into_descriptor().unwrap().name(), "global-unknown-provider");
    }
}

//! Resolution of shared memory descriptors into local mappings

use memory_mapper_core::{
    Mapper, MapperConfig, MapperRegistry, MappingError, MemoryHandle, Result, ServiceLocator,
    SharedMemoryDescriptor, Unmapped,
};
use memory_mapper_shared_memory::{create_ashmem_memory, fits_mapping, max_mappable_size};
use parking_lot::Once;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Tag attached to security-relevant diagnostics
pub const SECURITY_EVENT_TAG: u32 = 0x534e_4554;

/// Event code for sizes that would be truncated by the mapping call
pub const SIZE_TRUNCATION_EVENT: &str = "79376389";

/// Turns descriptors into mappings, through a discovered mapper service or
/// the built-in local mapper.
pub struct MemoryMapper {
    registry: Arc<MapperRegistry>,
    config: MapperConfig,
    max_mapping_size: u64,
    local_fallback_logged: Once,
}

impl MemoryMapper {
    /// Create a resolver with its own registry over `locator`
    pub fn new(locator: Arc<dyn ServiceLocator>, config: MapperConfig) -> Self {
        Self::with_registry(Arc::new(MapperRegistry::new(locator)), config)
    }

    /// Create a resolver sharing an existing registry
    pub fn with_registry(registry: Arc<MapperRegistry>, config: MapperConfig) -> Self {
        let max_mapping_size = config.effective_max_mapping_size(max_mappable_size());

        Self {
            registry,
            config,
            max_mapping_size,
            local_fallback_logged: Once::new(),
        }
    }

    pub fn registry(&self) -> &Arc<MapperRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Largest descriptor size this resolver will map or delegate
    pub fn max_mapping_size(&self) -> u64 {
        self.max_mapping_size
    }

    /// Map `descriptor`, returning `None` when no mapping is available.
    ///
    /// Every failure is logged with its category. The descriptor is consumed
    /// either way; use [`try_map_or_return`](Self::try_map_or_return) to get
    /// it back from failures that happen before any mapping is attempted.
    #[instrument(skip_all, fields(name = %descriptor.name(), size = descriptor.size()))]
    pub fn map_memory(&self, descriptor: SharedMemoryDescriptor) -> Option<MemoryHandle> {
        match self.try_map_memory(descriptor) {
            Ok(memory) => Some(memory),
            Err(e) => {
                Self::report(&e);
                None
            }
        }
    }

    /// Map `descriptor`, returning the reason on failure without logging it
    pub fn try_map_memory(&self, descriptor: SharedMemoryDescriptor) -> Result<MemoryHandle> {
        self.try_map_or_return(descriptor).map_err(|unmapped| unmapped.error)
    }

    /// Map `descriptor`, handing it back unless a mapping was attempted.
    ///
    /// The descriptor comes back for `Absent`, `NotFound`,
    /// `RemoteUnsupported` and `SizeTooLarge`. Once a mapper or the mapping
    /// syscall has taken it, failures return `None` in its place.
    pub fn try_map_or_return(&self, descriptor: SharedMemoryDescriptor) -> std::result::Result<MemoryHandle, Unmapped> {
        if descriptor.is_empty() {
            return Err(Unmapped::returned(MappingError::Absent, descriptor));
        }

        match self.registry.resolve(descriptor.name()) {
            Some(mapper) => self.delegate(mapper.as_ref(), descriptor),
            None if self.serves_locally(descriptor.name()) => self.map_locally(descriptor),
            None => {
                let error = MappingError::NotFound {
                    name: descriptor.name().to_string(),
                };
                Err(Unmapped::returned(error, descriptor))
            }
        }
    }

    fn serves_locally(&self, name: &str) -> bool {
        self.config.enable_local_fallback && name == self.config.default_provider
    }

    fn check_size(&self, descriptor: &SharedMemoryDescriptor) -> Result<()> {
        let size = descriptor.size();
        if !fits_mapping(size, self.max_mapping_size) {
            return Err(MappingError::SizeTooLarge {
                size,
                max: self.max_mapping_size,
            });
        }
        Ok(())
    }

    fn delegate(&self, mapper: &dyn Mapper, descriptor: SharedMemoryDescriptor) -> std::result::Result<MemoryHandle, Unmapped> {
        if mapper.is_remote() {
            let error = MappingError::RemoteUnsupported {
                name: descriptor.name().to_string(),
            };
            return Err(Unmapped::returned(error, descriptor));
        }

        // A narrower size on the mapper side would map less than declared
        if let Err(error) = self.check_size(&descriptor) {
            return Err(Unmapped::returned(error, descriptor));
        }

        mapper
            .map_memory(descriptor)
            .map_err(|e| Unmapped::consumed(e.into()))
    }

    fn map_locally(&self, descriptor: SharedMemoryDescriptor) -> std::result::Result<MemoryHandle, Unmapped> {
        self.local_fallback_logged.call_once(|| {
            info!("Using local mapper for {}", descriptor.name());
        });

        if descriptor.handle().is_empty() {
            return Err(Unmapped::returned(MappingError::Absent, descriptor));
        }
        if let Err(error) = self.check_size(&descriptor) {
            return Err(Unmapped::returned(error, descriptor));
        }

        let memory = create_ashmem_memory(descriptor, self.max_mapping_size).map_err(Unmapped::consumed)?;
        Ok(Arc::new(memory))
    }

    fn report(e: &MappingError) {
        let category = e.category();
        match e {
            MappingError::Absent => debug!(%category, "{}", e),
            MappingError::SizeTooLarge { .. } => error!(
                %category,
                security_tag = SECURITY_EVENT_TAG,
                security_event = SIZE_TRUNCATION_EVENT,
                "{}",
                e
            ),
            _ => error!(%category, "{}", e),
        }
    }
}

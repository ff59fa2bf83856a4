//! Built-in mapper for descriptors whose handle is directly mappable

use crate::platform::fits_mapping;
use crate::MappedRegion;
use memory_mapper_core::{MappedMemory, MappingError, Result, SharedMemoryDescriptor, TransportError};
use tracing::debug;

/// Memory mapped locally from the descriptor's first file descriptor.
///
/// The descriptor is kept because it holds the size and the handle. Fields
/// drop in order, so the range is unmapped before the descriptor's fds close.
#[derive(Debug)]
pub struct AshmemMemory {
    region: MappedRegion,
    descriptor: SharedMemoryDescriptor,
}

impl AshmemMemory {
    pub fn descriptor(&self) -> &SharedMemoryDescriptor {
        &self.descriptor
    }
}

/// Map `descriptor` into this process.
///
/// Fails with [`MappingError::Absent`] before any syscall when the handle
/// carries no descriptor, and with [`MappingError::SizeTooLarge`] when the
/// declared size exceeds `max_mapping_size` or cannot be represented as a
/// local mapping length.
pub fn create_ashmem_memory(descriptor: SharedMemoryDescriptor, max_mapping_size: u64) -> Result<AshmemMemory> {
    let Some(fd) = descriptor.handle().first_fd() else {
        return Err(MappingError::Absent);
    };

    let size = descriptor.size();
    if !fits_mapping(size, max_mapping_size) {
        return Err(MappingError::SizeTooLarge { size, max: max_mapping_size });
    }

    let region = MappedRegion::map_shared(fd, size as usize)?;
    debug!(name = descriptor.name(), size, "Mapped shared memory locally");

    Ok(AshmemMemory { region, descriptor })
}

// Local mappings are coherent in-process, so the sync hooks have nothing to do
impl MappedMemory for AshmemMemory {
    fn pointer(&self) -> *mut u8 {
        self.region.as_ptr()
    }

    fn size(&self) -> u64 {
        self.descriptor.size()
    }

    fn update(&self) -> std::result::Result<(), TransportError> {
        Ok(())
    }

    fn update_range(&self, _start: u64, _length: u64) -> std::result::Result<(), TransportError> {
        Ok(())
    }

    fn read(&self) -> std::result::Result<(), TransportError> {
        Ok(())
    }

    fn read_range(&self, _start: u64, _length: u64) -> std::result::Result<(), TransportError> {
        Ok(())
    }

    fn commit(&self) -> std::result::Result<(), TransportError> {
        Ok(())
    }
}

//! Mapped memory capability

use crate::TransportError;
use std::fmt::Debug;
use std::sync::Arc;

/// Memory that has been mapped into this process.
///
/// Local mappings and objects returned by a provider expose the same
/// operations, so callers never need to know which one they hold. The
/// synchronization hooks exist for providers that keep a copy of the memory
/// elsewhere; for coherent in-process mappings they do nothing.
pub trait MappedMemory: Send + Sync + Debug {
    /// Base address of the mapping
    fn pointer(&self) -> *mut u8;

    /// Size of the mapping in bytes, as declared by the descriptor
    fn size(&self) -> u64;

    /// Notify that the whole region is about to be written
    fn update(&self) -> Result<(), TransportError>;

    /// Notify that `[start, start + length)` is about to be written
    fn update_range(&self, start: u64, length: u64) -> Result<(), TransportError>;

    /// Notify that the whole region is about to be read
    fn read(&self) -> Result<(), TransportError>;

    /// Notify that `[start, start + length)` is about to be read
    fn read_range(&self, start: u64, length: u64) -> Result<(), TransportError>;

    /// Finish the current update or read
    fn commit(&self) -> Result<(), TransportError>;
}

/// Shared handle to a mapping; the mapping is released with the last clone
pub type MemoryHandle = Arc<dyn MappedMemory>;

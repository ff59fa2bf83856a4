//! Memory Mapper - Core Module
//!
//! Descriptors, the mapped memory capability, mapper discovery and the
//! registry that caches discovered mappers.

pub mod descriptor;
pub mod memory;
pub mod mapper;
pub mod registry;
pub mod config;
pub mod error;

pub use descriptor::*;
pub use memory::*;
pub use mapper::*;
pub use registry::*;
pub use config::*;
pub use error::*;

/// Re-export common types
pub mod prelude {
    pub use crate::{
        descriptor::{NativeHandle, SharedMemoryDescriptor},
        memory::{MappedMemory, MemoryHandle},
        mapper::{Mapper, ServiceLocator, InProcessServiceLocator},
        registry::MapperRegistry,
        config::MapperConfig,
        error::{MappingError, Unmapped, TransportError, ErrorCategory, Result},
    };
}

/// Current version of Memory Mapper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provider name served by the built-in local mapper
pub const DEFAULT_PROVIDER_NAME: &str = "ashmem";

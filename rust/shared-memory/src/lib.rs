//! Memory Mapper - Shared Memory Module
//!
//! Local mapping of descriptor-backed shared memory, used for the built-in
//! provider when no mapper service answers for it.

pub mod platform;
pub mod region;
pub mod ashmem;

#[cfg(all(test, target_os = "linux"))]
mod test_util;

pub use region::*;
pub use ashmem::*;

/// Re-export platform-specific implementations
pub use platform::*;

//! Descriptor-backed memory regions mapped into this process

use std::io;
use std::os::fd::BorrowedFd;
use std::ptr::NonNull;
use tracing::warn;

/// A shared, read/write mapping of a file descriptor.
///
/// The range is unmapped exactly once, when the region is dropped.
#[derive(Debug)]
pub struct MappedRegion {
    ptr: NonNull<u8>,
    len: usize,
}

impl MappedRegion {
    /// Map `len` bytes of `fd` from offset zero with `MAP_SHARED`
    pub fn map_shared(fd: BorrowedFd<'_>, len: usize) -> io::Result<Self> {
        let (ptr, len) = map_platform_region(fd, len)?;
        Ok(Self { ptr, len })
    }

    /// Get raw pointer to the memory
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; zero-length mappings are rejected
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        if let Err(e) = unmap_platform_region(self.ptr, self.len) {
            warn!(len = self.len, "Failed to unmap region: {}", e);
        }
    }
}

// Safety: the region is plain shared memory; callers synchronize access to
// its contents themselves
unsafe impl Send for MappedRegion {}
// Safety: see above
unsafe impl Sync for MappedRegion {}

// Platform-specific implementations

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};
    use std::num::NonZeroUsize;

    pub fn map_platform_region(fd: BorrowedFd<'_>, len: usize) -> io::Result<(NonNull<u8>, usize)> {
        let length = NonZeroUsize::new(len).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "cannot map zero bytes")
        })?;

        let ptr = unsafe {
            mmap(
                None,
                length,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                Some(fd),
                0,
            )
        }
        .map_err(io::Error::from)?;

        // mmap never returns address zero without MAP_FIXED
        let ptr = NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "mmap returned null"))?;

        Ok((ptr, len))
    }

    pub fn unmap_platform_region(ptr: NonNull<u8>, len: usize) -> io::Result<()> {
        unsafe { munmap(ptr.as_ptr().cast(), len) }.map_err(io::Error::from)
    }
}

#[cfg(not(unix))]
mod fallback_impl {
    use super::*;

    pub fn map_platform_region(_fd: BorrowedFd<'_>, _len: usize) -> io::Result<(NonNull<u8>, usize)> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "descriptor mapping is not supported on this platform",
        ))
    }

    pub fn unmap_platform_region(_ptr: NonNull<u8>, _len: usize) -> io::Result<()> {
        Ok(())
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use unix_impl::*;
    } else {
        use fallback_impl::*;
    }
}

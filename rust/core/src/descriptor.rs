//! Shared memory descriptors and the kernel handles they carry

use std::fmt;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd};

/// Owned bundle of transferable file descriptors plus auxiliary integers.
///
/// Dropping the handle closes every descriptor it owns. Once a handle has been
/// moved into a mapping, the mapping is the only owner.
#[derive(Default)]
pub struct NativeHandle {
    fds: Vec<OwnedFd>,
    ints: Vec<i32>,
}

impl NativeHandle {
    pub fn new(fds: Vec<OwnedFd>, ints: Vec<i32>) -> Self {
        Self { fds, ints }
    }

    /// Handle wrapping a single descriptor
    pub fn from_fd(fd: impl Into<OwnedFd>) -> Self {
        Self::new(vec![fd.into()], Vec::new())
    }

    pub fn fds(&self) -> &[OwnedFd] {
        &self.fds
    }

    pub fn ints(&self) -> &[i32] {
        &self.ints
    }

    pub fn num_fds(&self) -> usize {
        self.fds.len()
    }

    pub fn num_ints(&self) -> usize {
        self.ints.len()
    }

    /// True when the handle carries no file descriptors
    pub fn is_empty(&self) -> bool {
        self.fds.is_empty()
    }

    /// The descriptor that backs the memory, if any
    pub fn first_fd(&self) -> Option<BorrowedFd<'_>> {
        self.fds.first().map(|fd| fd.as_fd())
    }

    /// Duplicate every descriptor so the copy can be owned independently
    pub fn try_clone(&self) -> std::io::Result<Self> {
        let fds = self
            .fds
            .iter()
            .map(OwnedFd::try_clone)
            .collect::<std::io::Result<Vec<_>>>()?;

        Ok(Self {
            fds,
            ints: self.ints.clone(),
        })
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw: Vec<i32> = self.fds.iter().map(|fd| fd.as_raw_fd()).collect();
        f.debug_struct("NativeHandle")
            .field("fds", &raw)
            .field("ints", &self.ints)
            .finish()
    }
}

/// Named, sized reference to a shared memory region.
///
/// `size` is the size declared by the producer. It is not trusted until the
/// resolver has checked it against what this process can map.
#[derive(Debug, Default)]
pub struct SharedMemoryDescriptor {
    name: String,
    handle: NativeHandle,
    size: u64,
}

impl SharedMemoryDescriptor {
    pub fn new(name: impl Into<String>, handle: NativeHandle, size: u64) -> Self {
        Self {
            name: name.into(),
            handle,
            size,
        }
    }

    /// Provider name, e.g. `"ashmem"`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &NativeHandle {
        &self.handle
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// The zero-valued descriptor: no name and nothing to map
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.handle.is_empty()
    }

    /// Duplicate the descriptor, including its file descriptors
    pub fn try_clone(&self) -> std::io::Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            handle: self.handle.try_clone()?,
            size: self.size,
        })
    }

    pub fn into_parts(self) -> (String, NativeHandle, u64) {
        (self.name, self.handle, self.size)
    }
}

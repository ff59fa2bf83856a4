//! Memory Mapper - Local Mapping Demo
//!
//! Wraps a file descriptor in an "ashmem" descriptor, maps it through the
//! process-wide resolver and checks that writes through the mapping land in
//! the backing file.

use anyhow::{bail, Context, Result};
use memory_mapper::prelude::*;
use std::io::{Read, Seek, SeekFrom};
use tracing::info;

const REGION_SIZE: u64 = 4096;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Memory Mapper - Local Mapping Demo");

    let backing = tempfile::tempfile().context("creating backing file")?;
    backing.set_len(REGION_SIZE).context("sizing backing file")?;
    let mut observer = backing.try_clone().context("duplicating backing file")?;

    let descriptor = SharedMemoryDescriptor::new(
        memory_mapper::DEFAULT_PROVIDER_NAME,
        NativeHandle::from_fd(backing),
        REGION_SIZE,
    );

    let Some(memory) = memory_mapper::map_memory(descriptor) else {
        bail!("no mapping available for the ashmem descriptor");
    };
    info!("Mapped {} bytes at {:p}", memory.size(), memory.pointer());

    let message = b"hello from the mapped region";
    memory.update()?;
    unsafe {
        std::ptr::copy_nonoverlapping(message.as_ptr(), memory.pointer(), message.len());
    }
    memory.commit()?;

    let mut contents = vec![0u8; message.len()];
    observer.seek(SeekFrom::Start(0))?;
    observer.read_exact(&mut contents)?;
    info!("Backing file reads: {}", String::from_utf8_lossy(&contents));

    if contents != message {
        bail!("backing file does not reflect writes through the mapping");
    }

    // Unmapping happens here, with the last handle
    drop(memory);
    info!("✓ Local mapping demo completed successfully");

    Ok(())
}

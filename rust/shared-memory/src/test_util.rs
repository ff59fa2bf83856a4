//! Helpers for inspecting this process's mappings in tests

use std::os::unix::fs::MetadataExt;

/// True when `addr` lies in a mapping of `file`.
///
/// Matching on the inode keeps concurrent tests that reuse the freed
/// address range from showing up as false positives.
pub fn maps_file_at(addr: *const u8, file: &std::fs::File) -> bool {
    let addr = addr as usize;
    let ino = file.metadata().unwrap().ino();
    let maps = std::fs::read_to_string("/proc/self/maps").unwrap();

    maps.lines().any(|line| {
        let mut fields = line.split_whitespace();
        let Some((start, end)) = fields.next().and_then(|range| range.split_once('-')) else {
            return false;
        };
        let inode = fields.nth(3).and_then(|field| field.parse::<u64>().ok());

        match (usize::from_str_radix(start, 16), usize::from_str_radix(end, 16)) {
            (Ok(start), Ok(end)) => start <= addr && addr < end && inode == Some(ino),
            _ => false,
        }
    })
}

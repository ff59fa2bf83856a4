//! Platform limits for local mappings

/// Largest size a mapping call can take without truncating.
///
/// Descriptor sizes are 64-bit while mapping lengths are `usize`; anything
/// above this would be silently cut on narrower targets.
pub fn max_mappable_size() -> u64 {
    u64::try_from(usize::MAX).unwrap_or(u64::MAX)
}

/// Whether `size` can be mapped without truncation under `max`
pub fn fits_mapping(size: u64, max: u64) -> bool {
    size <= max && usize::try_from(size).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_mappable_size_matches_address_width() {
        assert_eq!(max_mappable_size(), usize::MAX as u64);
    }

    #[test]
    fn test_fits_mapping() {
        assert!(fits_mapping(4096, 4096));
        assert!(!fits_mapping(4097, 4096));
        assert!(fits_mapping(0, max_mappable_size()));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_narrow_targets_reject_wide_sizes() {
        assert!(!fits_mapping(u64::from(u32::MAX) + 1, u64::MAX));
    }
}

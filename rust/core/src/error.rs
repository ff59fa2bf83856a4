//! Error types for Memory Mapper

use thiserror::Error;

/// Failure reasons for turning a descriptor into a local mapping
#[derive(Error, Debug)]
pub enum MappingError {
    /// No mapper for the name, and the name is not the built-in provider
    #[error("Could not fetch mapper for {name} shared memory")]
    NotFound { name: String },

    /// The resolved mapper lives behind an IPC boundary
    #[error("Mapper for {name} must be a passthrough service")]
    RemoteUnsupported { name: String },

    /// Declared size does not fit the local address space
    #[error("Cannot map {size} bytes of memory because it is too large (max {max})")]
    SizeTooLarge { size: u64, max: u64 },

    /// The mapping syscall failed
    #[error("Memory mapping failed: {0}")]
    MapFailed(#[from] std::io::Error),

    /// The mapper call did not complete
    #[error("Mapper returned transport error: {0}")]
    TransportFailed(#[from] TransportError),

    /// Descriptor carries nothing to map
    #[error("Descriptor carries no mappable resource")]
    Absent,
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, MappingError>;

impl MappingError {
    /// Get error category for diagnostics
    pub fn category(&self) -> ErrorCategory {
        match self {
            MappingError::NotFound { .. } => ErrorCategory::NotFound,
            MappingError::RemoteUnsupported { .. } => ErrorCategory::RemoteUnsupported,
            MappingError::SizeTooLarge { .. } => ErrorCategory::SizeTooLarge,
            MappingError::MapFailed(_) => ErrorCategory::MapFailed,
            MappingError::TransportFailed(_) => ErrorCategory::TransportFailed,
            MappingError::Absent => ErrorCategory::Absent,
        }
    }

    /// Absent descriptors are expected input, not faults
    pub fn is_benign(&self) -> bool {
        matches!(self, MappingError::Absent)
    }
}

/// A failed mapping attempt.
///
/// Carries the descriptor back when the failure happened before anything took
/// ownership of it, so the caller can retry without duplicating its fds.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct Unmapped {
    pub error: MappingError,
    pub descriptor: Option<crate::SharedMemoryDescriptor>,
}

impl Unmapped {
    /// Failure that leaves the descriptor with the caller
    pub fn returned(error: MappingError, descriptor: crate::SharedMemoryDescriptor) -> Self {
        Self {
            error,
            descriptor: Some(descriptor),
        }
    }

    /// Failure after the descriptor was handed to a mapper
    pub fn consumed(error: MappingError) -> Self {
        Self {
            error,
            descriptor: None,
        }
    }

    pub fn into_descriptor(self) -> Option<crate::SharedMemoryDescriptor> {
        self.descriptor
    }
}

/// Error categories reported alongside diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    RemoteUnsupported,
    SizeTooLarge,
    MapFailed,
    TransportFailed,
    Absent,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::RemoteUnsupported => "remote_unsupported",
            ErrorCategory::SizeTooLarge => "size_too_large",
            ErrorCategory::MapFailed => "map_failed",
            ErrorCategory::TransportFailed => "transport_failed",
            ErrorCategory::Absent => "absent",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a call into a mapper or a mapped memory object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The object hosting the service has gone away
    #[error("Remote object is dead")]
    DeadObject,

    /// The transaction failed
    #[error("Transaction failed: {0}")]
    Failed(String),

    /// The operation is not available on this object
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed configuration document
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed but unusable values
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let not_found = MappingError::NotFound { name: "custom".to_string() };
        assert_eq!(not_found.category(), ErrorCategory::NotFound);

        let too_large = MappingError::SizeTooLarge { size: 10, max: 5 };
        assert_eq!(too_large.category(), ErrorCategory::SizeTooLarge);
        assert_eq!(too_large.category().to_string(), "size_too_large");

        let transport: MappingError = TransportError::DeadObject.into();
        assert_eq!(transport.category(), ErrorCategory::TransportFailed);

        let io: MappingError = std::io::Error::from(std::io::ErrorKind::InvalidInput).into();
        assert_eq!(io.category(), ErrorCategory::MapFailed);
    }

    #[test]
    fn test_only_absent_is_benign() {
        assert!(MappingError::Absent.is_benign());
        assert!(!MappingError::RemoteUnsupported { name: "x".to_string() }.is_benign());
        assert!(!MappingError::SizeTooLarge { size: 2, max: 1 }.is_benign());
    }

    #[test]
    fn test_error_messages() {
        let err = MappingError::NotFound { name: "custom".to_string() };
        assert_eq!(err.to_string(), "Could not fetch mapper for custom shared memory");

        let err = MappingError::SizeTooLarge { size: 8192, max: 4096 };
        assert!(err.to_string().contains("8192"));
    }

    #[test]
    fn test_unmapped_carries_descriptor() {
        let descriptor = crate::SharedMemoryDescriptor::new("custom", crate::NativeHandle::default(), 64);
        let unmapped = Unmapped::returned(MappingError::NotFound { name: "custom".to_string() }, descriptor);
        assert_eq!(unmapped.to_string(), "Could not fetch mapper for custom shared memory");
        assert_eq!(unmapped.into_descriptor().unwrap().size(), 64);

        let unmapped = Unmapped::consumed(TransportError::DeadObject.into());
        assert_eq!(unmapped.error.category(), ErrorCategory::TransportFailed);
        assert!(unmapped.into_descriptor().is_none());
    }
}

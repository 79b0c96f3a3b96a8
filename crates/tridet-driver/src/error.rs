//! Error types for TD16 driver operations

use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that can occur while driving the coprocessor.
///
/// A result mismatch is **not** an error: verification reports it through
/// [`crate::Verification`], and only resource or protocol failures surface
/// here.
#[derive(Debug, Error)]
pub enum DriverError {
    /// DMA buffer could not be allocated
    #[error("DMA buffer allocation failed: {reason}")]
    BufferAllocation {
        /// Reason for failure
        reason: String,
    },

    /// Input vectors do not form a valid tridiagonal system
    #[error("Invalid tridiagonal system: {reason}")]
    InvalidSystem {
        /// What was wrong with the lengths
        reason: String,
    },

    /// Vector length does not match the buffer it is staged into
    #[error("Staging length mismatch: buffer holds {capacity} lanes, vector supplies {len}")]
    StagingLength {
        /// Lane capacity of the buffer
        capacity: usize,
        /// Number of elements supplied
        len: usize,
    },

    /// Lane index outside the buffer
    #[error("Lane index {index} out of bounds (buffer holds {capacity})")]
    IndexOutOfBounds {
        /// Requested lane index
        index: usize,
        /// Lane capacity of the buffer
        capacity: usize,
    },

    /// Command channel outside the device's decoded opcode space
    #[error("Channel {channel} is not decoded by this device (custom-0 only)")]
    UnsupportedChannel {
        /// Requested channel
        channel: u8,
    },

    /// No coprocessor reachable from this process
    #[error("Coprocessor unavailable: {reason}")]
    Unavailable {
        /// Why the coprocessor cannot be reached
        reason: String,
    },

    /// Command issued outside the load → start → poll sequence
    #[error("Protocol violation: {reason}")]
    Protocol {
        /// Description of the violation
        reason: String,
    },
}

impl DriverError {
    /// Create a buffer allocation error
    pub fn buffer_allocation(reason: impl Into<String>) -> Self {
        Self::BufferAllocation {
            reason: reason.into(),
        }
    }

    /// Create an invalid system error
    pub fn invalid_system(reason: impl Into<String>) -> Self {
        Self::InvalidSystem {
            reason: reason.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a protocol violation error
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }
}

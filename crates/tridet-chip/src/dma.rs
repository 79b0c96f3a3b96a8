//! DMA contract: buffer alignment, lane width, result-register widths.
//!
//! The TD16 fetches each vector with fixed-width bursts and requires every
//! input buffer to start on a burst boundary. All three vectors transfer a
//! full `order` lanes even though the off-diagonals only carry `order − 1`
//! coefficients; the spare lane is a zero sentinel the datapath never reads.

/// Input buffer alignment in bytes (one DMA burst).
pub const INPUT_ALIGN: usize = 32;

/// Width of one vector lane in bytes (`i16` elements).
pub const LANE_BYTES: usize = 2;

/// Smallest matrix order the recurrence is defined for.
pub const MIN_ORDER: usize = 2;

/// Vector RAM depth of the shipped RTL parameterisation.
///
/// Silicon built from the default configuration computes order-16 problems
/// only; the software double accepts any order ≥ [`MIN_ORDER`].
pub const DEFAULT_ORDER: usize = 16;

/// Result-register width of the RTL configuration.
///
/// The shipped build writes back 32 bits; the wide build writes 64. The
/// result buffer must be aligned to the selected width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultWidth {
    /// 32-bit result register (shipped configuration).
    #[default]
    W32,
    /// 64-bit result register (wide configuration).
    W64,
}

impl ResultWidth {
    /// Width of the result register in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    /// Required alignment of the result buffer, in bytes.
    #[must_use]
    pub const fn align(self) -> usize {
        self.bytes()
    }

    /// Width in bits, for display.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }
}

impl std::fmt::Display for ResultWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Transfer length in bytes for one vector of the given order.
#[must_use]
pub const fn transfer_bytes(order: usize) -> usize {
    order * LANE_BYTES
}

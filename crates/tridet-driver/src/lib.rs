//! Driver and verification harness for the TD16 tridiagonal-determinant
//! coprocessor.
//!
//! The TD16 hangs off the RoCC interface of a Rocket-class RV64 core. This
//! crate stages matrix diagonals into DMA-visible buffers, drives the
//! five-command protocol, and compares what the silicon writes back against
//! the bit-accurate golden model in `tridet-chip`.
//!
//! # Coprocessor hierarchy
//!
//! ```text
//! Silicon (riscv64 harts with the accelerator):
//!   RoccCoprocessor     — custom-0 instructions, real DMA
//!
//! Everywhere else:
//!   SoftwareCoprocessor — protocol double over the golden model
//! ```
//!
//! # Quick start
//!
//! ```
//! use tridet_driver::fixtures::Scenario;
//! use tridet_driver::{verify_determinant, SoftwareCoprocessor};
//!
//! # fn main() -> tridet_driver::Result<()> {
//! let scenario = Scenario::Counting;
//! let mut coproc = SoftwareCoprocessor::new();
//! let report = verify_determinant(&mut coproc, &scenario.system(), scenario.config())?;
//! assert!(report.passed());
//! # Ok(())
//! # }
//! ```
//!
//! # Sign-off scenarios (order-16 build)
//!
//! | Scenario | Width | Determinant |
//! |----------|-------|-------------|
//! | `counting` | 32-bit | 82 619 585 (wrapped from 56 874 039 553 217) |
//! | `mixed-sign` | 64-bit | −3216 |

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod backends;
mod barrier;
mod buffer;
mod coprocessor;
mod driver;
mod error;
pub mod fixtures;
mod staging;
mod system;
mod verify;

/// Device description (re-exported from tridet-chip).
pub mod chip {
    pub use tridet_chip::dma::{
        transfer_bytes, ResultWidth, DEFAULT_ORDER, INPUT_ALIGN, LANE_BYTES, MIN_ORDER,
    };
    pub use tridet_chip::{cmd, isa, model, status};
}

pub use backends::rocc::RoccCoprocessor;
pub use backends::software::SoftwareCoprocessor;
pub use barrier::publish;
pub use buffer::{ResultBuffer, VectorBuffer};
pub use coprocessor::{
    select_coprocessor, Coprocessor, CoprocessorKind, CoprocessorSelection,
};
pub use driver::{DeterminantDriver, DriverConfig, StagedVectors};
pub use error::{DriverError, Result};
pub use staging::{off_diagonal_lanes, stage_diagonal, stage_off_diagonal};
pub use system::TridiagonalSystem;
pub use tridet_chip::dma::ResultWidth;
pub use verify::{verify_determinant, Verification};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        select_coprocessor, verify_determinant, Coprocessor, CoprocessorSelection,
        DeterminantDriver, DriverConfig, DriverError, Result, ResultWidth, RoccCoprocessor,
        SoftwareCoprocessor, TridiagonalSystem, Verification,
    };
}

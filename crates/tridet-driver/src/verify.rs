//! Golden-model comparison.
//!
//! The verification routine runs the same system through the golden model
//! and through a [`Coprocessor`], at the same result width, and reports both
//! values. A mismatch is a *finding*, not a failure: the run completed and
//! produced evidence, so it comes back as `Ok(Verification)` with
//! [`Verification::passed`] false. Only infrastructure problems (allocation,
//! command issue) surface as errors.

use crate::coprocessor::Coprocessor;
use crate::driver::{DeterminantDriver, DriverConfig};
use crate::error::Result;
use crate::system::TridiagonalSystem;
use std::fmt;
use tracing::{info, warn};
use tridet_chip::dma::ResultWidth;
use tridet_chip::model;

/// Outcome of one golden-model comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    expected: i64,
    actual: i64,
    width: ResultWidth,
}

impl Verification {
    /// True when the accelerator matched the golden model exactly.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }

    /// Golden-model determinant at the comparison width, sign-extended.
    #[must_use]
    pub fn expected(&self) -> i64 {
        self.expected
    }

    /// Value the accelerator wrote back, sign-extended.
    #[must_use]
    pub fn actual(&self) -> i64 {
        self.actual
    }

    /// Width both values were computed at.
    #[must_use]
    pub fn width(&self) -> ResultWidth {
        self.width
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed() { "PASS" } else { "FAIL" };
        write!(
            f,
            "{verdict}: expected {}, accelerator returned {} ({})",
            self.expected, self.actual, self.width
        )
    }
}

/// Compute `system`'s determinant on the golden model and on `coproc`, and
/// compare at `config.width`.
///
/// # Errors
///
/// Returns an error only when the run itself could not complete (allocation
/// failure, command failure, backend unavailable). Disagreement between the
/// two values is reported through the returned [`Verification`].
pub fn verify_determinant(
    coproc: &mut dyn Coprocessor,
    system: &TridiagonalSystem,
    config: DriverConfig,
) -> Result<Verification> {
    let expected = match config.width {
        ResultWidth::W32 => i64::from(model::determinant_i32(
            system.sub_diagonal(),
            system.diagonal(),
            system.super_diagonal(),
        )),
        ResultWidth::W64 => model::determinant_i64(
            system.sub_diagonal(),
            system.diagonal(),
            system.super_diagonal(),
        ),
    };

    let actual = DeterminantDriver::new(config).run(coproc, system)?;
    let verification = Verification {
        expected,
        actual,
        width: config.width,
    };

    if verification.passed() {
        info!("{verification}");
    } else {
        warn!("{verification}");
    }
    Ok(verification)
}

//! Protocol runner: stage, load, start, wait, read back.
//!
//! One determinant computation is eight steps end to end:
//!
//! ```text
//! acquire ── stage a/b/c ── fence ── READIN_A ── fence ── READIN_C ── fence
//!   ── READIN_B ── fence ── START_COMP ── fence ── poll QUERYSTATUS until
//!   terminal ── fence ── read result
//! ```
//!
//! The fences are [`barrier::publish`]: the device observes hart memory
//! through DMA, so every staged lane must be globally visible before the load
//! command that names its address, and the device's result store must be
//! visible before readback. The load order (A, then C, then B) matches the
//! status FSM's walk through its LOAD states.

use crate::barrier;
use crate::buffer::{ResultBuffer, VectorBuffer};
use crate::coprocessor::Coprocessor;
use crate::error::Result;
use crate::staging;
use crate::system::TridiagonalSystem;
use tracing::{debug, info, trace};
use tridet_chip::dma::ResultWidth;
use tridet_chip::{isa, status};

/// Runtime configuration for one verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// RoCC command channel to drive. The shipped RTL decodes only
    /// [`isa::DECODED_CHANNEL`].
    pub channel: u8,
    /// Width of the device build's result register. A 32-bit build wraps
    /// where a 64-bit build does not, so the golden model must be compared
    /// at the same width.
    pub width: ResultWidth,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            channel: isa::DECODED_CHANNEL,
            width: ResultWidth::default(),
        }
    }
}

/// The four accelerator-visible regions of one computation, staged and live.
///
/// Owning all four regions in one value is what makes the driver's unsafe
/// contract hold: the device DMAs these addresses asynchronously, and this
/// struct keeps every region allocated until after the terminal status and
/// readback. Everything is released on drop, on every exit path.
#[derive(Debug)]
pub struct StagedVectors {
    sub: VectorBuffer,
    diag: VectorBuffer,
    sup: VectorBuffer,
    result: ResultBuffer,
}

impl StagedVectors {
    /// Allocate all four regions and stage `system` into the input buffers.
    ///
    /// Off-diagonal vectors land in lanes `0..order-1` with the sentinel
    /// lane zeroed; see [`crate::stage_off_diagonal`]. Nothing is issued to
    /// the device here, so an allocation failure aborts the run before any
    /// command exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriverError::BufferAllocation`] when the host cannot
    /// provide aligned zeroed memory.
    pub fn acquire(system: &TridiagonalSystem, width: ResultWidth) -> Result<Self> {
        let order = system.order();
        let mut sub = VectorBuffer::new(order)?;
        let mut diag = VectorBuffer::new(order)?;
        let mut sup = VectorBuffer::new(order)?;
        let result = ResultBuffer::new(width)?;

        staging::stage_off_diagonal(&mut sub, system.sub_diagonal())?;
        staging::stage_diagonal(&mut diag, system.diagonal())?;
        staging::stage_off_diagonal(&mut sup, system.super_diagonal())?;

        debug!(
            "staged order-{order} system: 3 × {} B inputs + {} B result",
            sub.byte_len(),
            width.bytes()
        );
        Ok(Self {
            sub,
            diag,
            sup,
            result,
        })
    }

    /// Matrix order of the staged system.
    #[must_use]
    pub fn order(&self) -> usize {
        self.diag.lanes()
    }

    /// Staged sub-diagonal region (`a`).
    #[must_use]
    pub fn sub(&self) -> &VectorBuffer {
        &self.sub
    }

    /// Staged main-diagonal region (`b`).
    #[must_use]
    pub fn diag(&self) -> &VectorBuffer {
        &self.diag
    }

    /// Staged super-diagonal region (`c`).
    #[must_use]
    pub fn sup(&self) -> &VectorBuffer {
        &self.sup
    }

    /// Result region the device will store into.
    #[must_use]
    pub fn result(&self) -> &ResultBuffer {
        &self.result
    }

    /// Mutable sub-diagonal region, for fault injection before a run.
    pub fn sub_mut(&mut self) -> &mut VectorBuffer {
        &mut self.sub
    }

    /// Mutable main-diagonal region, for fault injection before a run.
    pub fn diag_mut(&mut self) -> &mut VectorBuffer {
        &mut self.diag
    }

    /// Mutable super-diagonal region, for fault injection before a run.
    pub fn sup_mut(&mut self) -> &mut VectorBuffer {
        &mut self.sup
    }
}

/// Drives a [`Coprocessor`] through one determinant computation.
#[derive(Debug, Clone, Copy)]
pub struct DeterminantDriver {
    config: DriverConfig,
}

impl DeterminantDriver {
    /// Build a driver with the given configuration.
    #[must_use]
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// The configuration this driver issues commands with.
    #[must_use]
    pub fn config(&self) -> DriverConfig {
        self.config
    }

    /// Run the full protocol for `system` and return the accelerator's
    /// result, sign-extended to i64.
    ///
    /// Buffers are acquired, staged, and released inside this call.
    ///
    /// # Errors
    ///
    /// Propagates allocation and command failures from the buffer layer and
    /// the coprocessor; nothing is retried.
    pub fn run(&self, coproc: &mut dyn Coprocessor, system: &TridiagonalSystem) -> Result<i64> {
        let mut staged = StagedVectors::acquire(system, self.config.width)?;
        self.execute(coproc, &mut staged)
    }

    /// Run the command sequence over already-staged vectors.
    ///
    /// Split out from [`DeterminantDriver::run`] so callers can inspect or
    /// perturb staged lanes between staging and issue.
    ///
    /// # Errors
    ///
    /// Propagates the first command failure; the device is left wherever its
    /// FSM was when the command failed.
    pub fn execute(
        &self,
        coproc: &mut dyn Coprocessor,
        staged: &mut StagedVectors,
    ) -> Result<i64> {
        let channel = self.config.channel;
        info!(
            "driving {} coprocessor: order {}, {} result, channel {channel}",
            coproc.kind(),
            staged.order(),
            self.config.width
        );

        // Staged lanes must be visible before any load names their address,
        // and each command must be visible before the next.
        barrier::publish();
        coproc.read_in_a(channel, &staged.sub)?;
        barrier::publish();
        coproc.read_in_c(channel, &staged.sup)?;
        barrier::publish();
        coproc.read_in_b(channel, &staged.diag)?;
        barrier::publish();
        coproc.start_comp(channel, &mut staged.result)?;
        barrier::publish();

        let polls = self.wait_done(coproc)?;
        debug!("terminal status after {polls} polls");

        // The device's result store must be visible before readback.
        barrier::publish();
        let value = staged.result.read();
        info!("accelerator result: {value}");
        Ok(value)
    }

    /// Poll QUERYSTATUS until the FSM reports its terminal code, returning
    /// the number of polls taken.
    ///
    /// There is no timeout: the device has no abort or reset command, so on
    /// a wedged FSM there is nothing useful to do but let an operator kill
    /// the process. [`status::is_terminal`] accepts exactly the DONE code.
    ///
    /// # Errors
    ///
    /// Propagates QUERYSTATUS failures from the coprocessor.
    pub fn wait_done(&self, coproc: &mut dyn Coprocessor) -> Result<u64> {
        let mut polls: u64 = 0;
        loop {
            let code = coproc.query_status(self.config.channel)?;
            polls += 1;
            if status::is_terminal(code) {
                return Ok(polls);
            }
            trace!("status {code} after {polls} polls");
            std::hint::spin_loop();
        }
    }
}

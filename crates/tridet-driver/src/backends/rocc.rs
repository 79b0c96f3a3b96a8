//! Real TD16 over RoCC `custom-0` instructions.
//!
//! The TD16 hangs off the RoCC interface of a Rocket-class RV64 core, so a
//! "command" here is one R-type instruction issued straight from the hart:
//! no device file, no mapping, no fd. The instruction forms come from
//! [`tridet_chip::isa`]; the `.insn` templates below take their opcode,
//! funct3 and funct7 as `const` operands from the chip crate, so the issued
//! words can never drift from the documented encoding.
//!
//! Only riscv64 harts can execute the instructions. On any other target the
//! type still exists (so selection code compiles everywhere), but
//! [`RoccCoprocessor::new`] refuses to construct and every command returns
//! [`DriverError::Unavailable`].
//!
//! Ordering is the protocol runner's job: it fences around every command
//! (see [`crate::publish`]). This module only issues.

use crate::buffer::{ResultBuffer, VectorBuffer};
use crate::coprocessor::{Coprocessor, CoprocessorKind};
use crate::error::{DriverError, Result};
use tridet_chip::isa;
use tracing::debug;

#[cfg(target_arch = "riscv64")]
use tridet_chip::cmd;

/// Issue one source-source command: `rs1` = buffer address, `rs2` = lane
/// count. Mirrors the bring-up suite's `ROCC_INSTRUCTION_SS`.
///
/// No `nomem` option: the command triggers a DMA read (or, for START_COMP,
/// a later DMA write) of hart memory, so the compiler must not cache stores
/// across it.
#[cfg(target_arch = "riscv64")]
macro_rules! rocc_src_src {
    ($funct:expr, $rs1:expr, $rs2:expr) => {
        core::arch::asm!(
            ".insn r {opcode}, {form}, {funct}, x0, {rs1}, {rs2}",
            opcode = const isa::CUSTOM_0,
            form = const isa::form::SRC_SRC,
            funct = const $funct,
            rs1 = in(reg) $rs1,
            rs2 = in(reg) $rs2,
            options(nostack),
        )
    };
}

/// Issue one destination command and return `rd`. Mirrors
/// `ROCC_INSTRUCTION_D`.
#[cfg(target_arch = "riscv64")]
macro_rules! rocc_dst {
    ($funct:expr, $rd:ident) => {
        core::arch::asm!(
            ".insn r {opcode}, {form}, {funct}, {rd}, x0, x0",
            opcode = const isa::CUSTOM_0,
            form = const isa::form::DST_ONLY,
            funct = const $funct,
            rd = out(reg) $rd,
            options(nostack),
        )
    };
}

/// Handle on the real TD16, bound to its decoded command channel.
#[derive(Debug)]
pub struct RoccCoprocessor {
    channel: u8,
}

impl RoccCoprocessor {
    /// True when this build can issue RoCC instructions at all.
    #[must_use]
    pub const fn available() -> bool {
        cfg!(target_arch = "riscv64")
    }

    /// Bind to `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnsupportedChannel`] for channels outside the
    /// device's decoded opcode space, and [`DriverError::Unavailable`] on
    /// targets that cannot issue RoCC instructions.
    pub fn new(channel: u8) -> Result<Self> {
        if channel != isa::DECODED_CHANNEL {
            return Err(DriverError::UnsupportedChannel { channel });
        }
        if !Self::available() {
            return Err(DriverError::unavailable(
                "RoCC instructions require a riscv64 hart",
            ));
        }
        debug!("bound RoCC coprocessor on channel {channel} (custom-0)");
        Ok(Self { channel })
    }

    fn check_channel(&self, channel: u8) -> Result<()> {
        if channel != self.channel {
            return Err(DriverError::UnsupportedChannel { channel });
        }
        Ok(())
    }

    /// Issue a load or START_COMP word.
    ///
    /// The device consumes `addr` asynchronously: for loads it DMAs the lanes
    /// while the status FSM walks its LOAD states, for START_COMP it writes
    /// the result register after BUSY. The caller must keep the region live
    /// until QUERYSTATUS reports the terminal code; the protocol runner's
    /// `StagedVectors` holds all four regions across the whole computation.
    #[allow(unused_variables)] // operands reach hardware only on riscv64
    fn issue_src_src(&self, funct: u32, addr: u64, lanes: u64) -> Result<()> {
        #[cfg(target_arch = "riscv64")]
        {
            // SAFETY: the `.insn` word is a custom-0 R-type the TD16 decodes;
            // it traps only on cores without the accelerator, which
            // `available()`/`new()` rule out. `addr` comes from a live
            // DmaBlock allocation sized for `lanes` (see caller contract
            // above), so the device-side access stays in bounds.
            unsafe {
                match funct {
                    cmd::READIN_A => rocc_src_src!(cmd::READIN_A, addr, lanes),
                    cmd::READIN_C => rocc_src_src!(cmd::READIN_C, addr, lanes),
                    cmd::READIN_B => rocc_src_src!(cmd::READIN_B, addr, lanes),
                    cmd::START_COMP => rocc_src_src!(cmd::START_COMP, addr, lanes),
                    other => {
                        return Err(DriverError::protocol(format!(
                            "funct {other} is not a source-source command"
                        )))
                    }
                }
            }
            Ok(())
        }
        #[cfg(not(target_arch = "riscv64"))]
        {
            Err(DriverError::unavailable(
                "RoCC commands can only be issued from a riscv64 hart",
            ))
        }
    }
}

impl Coprocessor for RoccCoprocessor {
    fn read_in_a(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()> {
        self.check_channel(channel)?;
        debug!("READIN_A: addr={:#x}, lanes={}", buf.addr(), buf.lanes());
        self.issue_src_src(tridet_chip::cmd::READIN_A, buf.addr(), buf.lanes() as u64)
    }

    fn read_in_b(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()> {
        self.check_channel(channel)?;
        debug!("READIN_B: addr={:#x}, lanes={}", buf.addr(), buf.lanes());
        self.issue_src_src(tridet_chip::cmd::READIN_B, buf.addr(), buf.lanes() as u64)
    }

    fn read_in_c(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()> {
        self.check_channel(channel)?;
        debug!("READIN_C: addr={:#x}, lanes={}", buf.addr(), buf.lanes());
        self.issue_src_src(tridet_chip::cmd::READIN_C, buf.addr(), buf.lanes() as u64)
    }

    fn start_comp(&mut self, channel: u8, result: &mut ResultBuffer) -> Result<()> {
        self.check_channel(channel)?;
        debug!(
            "START_COMP: result addr={:#x} ({})",
            result.addr(),
            result.width()
        );
        // rs2 is zero for START_COMP; rs1 names the result register's home.
        self.issue_src_src(tridet_chip::cmd::START_COMP, result.addr(), 0)
    }

    fn query_status(&mut self, channel: u8) -> Result<u64> {
        self.check_channel(channel)?;
        #[cfg(target_arch = "riscv64")]
        {
            let status: u64;
            // SAFETY: destination-form custom-0 word; writes only `rd`. Same
            // decode guarantee as issue_src_src.
            unsafe {
                rocc_dst!(cmd::QUERYSTATUS, status);
            }
            Ok(status)
        }
        #[cfg(not(target_arch = "riscv64"))]
        {
            Err(DriverError::unavailable(
                "RoCC commands can only be issued from a riscv64 hart",
            ))
        }
    }

    fn kind(&self) -> CoprocessorKind {
        CoprocessorKind::Rocc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecoded_channels_are_rejected_everywhere() {
        // Channels 1..=3 exist architecturally but the TD16 decodes only
        // custom-0, so rejection must not depend on the host target.
        for channel in 1..isa::CHANNEL_COUNT {
            let err = RoccCoprocessor::new(channel).unwrap_err();
            assert!(
                matches!(err, DriverError::UnsupportedChannel { channel: c } if c == channel),
                "channel {channel} gave {err}"
            );
        }
    }

    #[test]
    fn construction_follows_target_support() {
        let result = RoccCoprocessor::new(isa::DECODED_CHANNEL);
        if RoccCoprocessor::available() {
            assert_eq!(result.unwrap().kind(), CoprocessorKind::Rocc);
        } else {
            assert!(matches!(result.unwrap_err(), DriverError::Unavailable { .. }));
        }
    }

    #[test]
    fn availability_matches_the_target() {
        assert_eq!(
            RoccCoprocessor::available(),
            cfg!(target_arch = "riscv64")
        );
    }
}

//! Capability interface over the five TD16 commands.
//!
//! One method per command, operands as the device sees them:
//!
//! | Method | Command | Operands |
//! |--------|---------|----------|
//! | [`Coprocessor::read_in_a`] | READIN_A | channel, buffer address, lane count |
//! | [`Coprocessor::read_in_b`] | READIN_B | channel, buffer address, lane count |
//! | [`Coprocessor::read_in_c`] | READIN_C | channel, buffer address, lane count |
//! | [`Coprocessor::start_comp`] | START_COMP | channel, result address |
//! | [`Coprocessor::query_status`] | QUERYSTATUS | channel → status scalar |
//!
//! Address and length travel inside the buffer types, which also give a
//! software implementation safe access to the lanes the hardware would DMA.
//! Ordering is the caller's job: the protocol runner fences around every
//! command (see [`crate::publish`]); implementations only issue.

use crate::buffer::{ResultBuffer, VectorBuffer};
use crate::error::Result;
use std::fmt::Debug;

/// The five-command interface of the TD16.
pub trait Coprocessor: Debug + Send {
    /// Issue READIN_A: load the sub-diagonal vector from `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is not decoded or the command cannot
    /// be issued.
    fn read_in_a(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()>;

    /// Issue READIN_B: load the main-diagonal vector from `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is not decoded or the command cannot
    /// be issued.
    fn read_in_b(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()>;

    /// Issue READIN_C: load the super-diagonal vector from `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is not decoded or the command cannot
    /// be issued.
    fn read_in_c(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()>;

    /// Issue START_COMP naming the result register's address.
    ///
    /// The device writes `result` asynchronously; it is valid only after
    /// QUERYSTATUS reports the terminal code.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is not decoded or the command
    /// sequence is violated.
    fn start_comp(&mut self, channel: u8, result: &mut ResultBuffer) -> Result<()>;

    /// Issue QUERYSTATUS and return the raw status scalar.
    ///
    /// Compare against [`tridet_chip::status`]; only
    /// [`tridet_chip::status::DONE`] is meaningful to software.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is not decoded.
    fn query_status(&mut self, channel: u8) -> Result<u64>;

    /// Which implementation this is, for logs and diagnostics.
    fn kind(&self) -> CoprocessorKind;
}

/// Coprocessor implementation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoprocessorKind {
    /// Real TD16 reached over RoCC custom-0 instructions.
    Rocc,
    /// In-process software double (no hardware required).
    Software,
}

impl std::fmt::Display for CoprocessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rocc => write!(f, "RoCC"),
            Self::Software => write!(f, "Software"),
        }
    }
}

/// Coprocessor selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoprocessorSelection {
    /// Real hardware when the target supports it, software double otherwise.
    Auto,
    /// Force the RoCC path; errors off-target.
    Rocc,
    /// Force the software double.
    Software,
}

/// Select a coprocessor implementation.
///
/// `channel` is validated by the RoCC path against the device's decoded
/// opcode space and recorded by the software double.
///
/// # Errors
///
/// Returns an error when the forced selection cannot be constructed, e.g.
/// [`CoprocessorSelection::Rocc`] on a host without RoCC access.
pub fn select_coprocessor(
    selection: CoprocessorSelection,
    channel: u8,
) -> Result<Box<dyn Coprocessor>> {
    use crate::backends::rocc::RoccCoprocessor;
    use crate::backends::software::SoftwareCoprocessor;

    match selection {
        CoprocessorSelection::Auto => {
            if RoccCoprocessor::available() {
                let coproc = RoccCoprocessor::new(channel)?;
                tracing::info!("using RoCC coprocessor on channel {channel}");
                return Ok(Box::new(coproc));
            }
            tracing::info!("RoCC unavailable on this target, using software double");
            Ok(Box::new(SoftwareCoprocessor::new()))
        }

        CoprocessorSelection::Rocc => {
            RoccCoprocessor::new(channel).map(|c| Box::new(c) as Box<dyn Coprocessor>)
        }

        CoprocessorSelection::Software => Ok(Box::new(SoftwareCoprocessor::new())),
    }
}

//! Silicon model for the TD16 tridiagonal-determinant coprocessor.
//!
//! The TD16 is a RoCC accelerator on a Rocket-class RV64 core: it DMAs the
//! three diagonals of a tridiagonal matrix out of hart memory, evaluates the
//! three-term determinant recurrence in fixed-point, and writes one scalar
//! back. This crate has **no dependencies** and **no hardware access**: it is
//! a pure model of the silicon — instruction encoding, command and status
//! codes, the DMA contract, and a bit-accurate golden model of the datapath.
//!
//! Command and status values were taken from the RTL decode tables and
//! confirmed against waveforms of the bring-up test; entries the RTL does not
//! pin down are marked `// inferred`.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`isa`] | RoCC custom-opcode map, instruction forms, R-type encoder |
//! | [`cmd`] | Command funct codes (READIN_A/C/B, START_COMP, QUERYSTATUS) |
//! | [`status`] | Status FSM codes; `DONE` is the only terminal value |
//! | [`dma`] | Buffer alignment, lane width, result-register widths |
//! | [`model`] | Golden model of the determinant recurrence |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cmd;
pub mod dma;
pub mod isa;
pub mod model;
pub mod status;

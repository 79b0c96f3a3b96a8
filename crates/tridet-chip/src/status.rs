//! Status FSM codes returned by QUERYSTATUS.
//!
//! The scalar is the index of the control FSM state. Only [`DONE`] is
//! load-bearing for software: the driver polls until it appears and must not
//! interpret the intermediate codes, which exist for waveform debugging.
//! `DONE` is confirmed against the RTL; the intermediate names follow the
//! FSM declaration order and are marked inferred.

/// Reset state, no command accepted yet. // confirmed: reset readback
pub const IDLE: u64 = 0;
/// Draining the sub-diagonal DMA. // inferred
pub const LOAD_A: u64 = 1;
/// Draining the super-diagonal DMA. // inferred
pub const LOAD_C: u64 = 2;
/// Draining the main-diagonal DMA. // inferred
pub const LOAD_B: u64 = 3;
/// All vectors resident, awaiting START_COMP. // inferred
pub const ARMED: u64 = 4;
/// Recurrence evaluation in flight. // inferred
pub const BUSY: u64 = 5;
/// Result written back; the result register is valid. // confirmed
pub const DONE: u64 = 6;

/// True once the accelerator has written the result register.
#[must_use]
pub const fn is_terminal(code: u64) -> bool {
    code == DONE
}

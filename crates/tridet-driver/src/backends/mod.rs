//! Coprocessor implementations
//!
//! Two implementations of the five-command interface:
//! - **RoCC**: real TD16 over custom-0 instructions (riscv64 harts only)
//! - **Software**: in-process double evaluating the golden model, for unit
//!   tests and hosts without the accelerator

pub mod rocc;
pub mod software;

pub use rocc::RoccCoprocessor;
pub use software::SoftwareCoprocessor;

//! Memory ordering between the hart and the coprocessor.
//!
//! The TD16 observes hart memory coherently but gives no ordering guarantee
//! between a command and stores issued before it, so the driver publishes
//! with a full fence before every command: staged lanes before the loads,
//! each command before the next, and the device's result store before
//! readback. On riscv64 this lowers to `fence rw,rw`; elsewhere it is the
//! equivalent full barrier, which keeps the software double honest about
//! ordering too.

use std::sync::atomic::{fence, Ordering};

/// Full memory barrier: all prior stores are visible to the device before
/// any instruction issued after the call.
#[inline]
pub fn publish() {
    fence(Ordering::SeqCst);
}

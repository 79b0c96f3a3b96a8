// SPDX-License-Identifier: AGPL-3.0-only

//! Software double of the TD16
//!
//! Implements the [`Coprocessor`] trait in pure CPU arithmetic using the
//! golden model from `tridet-chip`. This enables:
//!
//! 1. **Unit-testing the driver**: the full stage → load → start → poll →
//!    readback protocol runs against this double on any host, no riscv64
//!    hart required.
//!
//! 2. **Reference-vs-accelerator comparison in CI**: verification runs end
//!    to end and must pass bit-for-bit, exactly as it must against silicon.
//!
//! 3. **Protocol introspection**: the double snapshots lanes at load-command
//!    time (the moment hardware DMAs them), walks the same status FSM the
//!    RTL reports, and records the funct sequence it was issued, so command
//!    ordering is testable.
//!
//! The double answers QUERYSTATUS with [`status::BUSY`] for a configurable
//! number of polls before [`status::DONE`], so the driver's blocking wait is
//! exercised rather than short-circuited.

use crate::buffer::{ResultBuffer, VectorBuffer};
use crate::coprocessor::{Coprocessor, CoprocessorKind};
use crate::error::{DriverError, Result};
use tridet_chip::dma::ResultWidth;
use tridet_chip::{cmd, model, status};
use tracing::debug;

/// Default number of BUSY polls before the double reports DONE.
const DEFAULT_BUSY_POLLS: u32 = 3;

/// In-process coprocessor double.
///
/// Snapshots are taken when the load command is issued, matching the
/// DMA-at-load behaviour of the hardware: mutating a staged buffer after its
/// load command has no effect, mutating it before reaches the datapath.
#[derive(Debug)]
pub struct SoftwareCoprocessor {
    /// Lanes captured by READIN_A (full transfer, sentinel included).
    sub: Option<Vec<i16>>,
    /// Lanes captured by READIN_B.
    diag: Option<Vec<i16>>,
    /// Lanes captured by READIN_C.
    sup: Option<Vec<i16>>,

    /// Current status FSM code.
    state: u64,
    /// BUSY polls to report after START_COMP.
    busy_polls: u32,
    /// BUSY polls still owed before DONE.
    polls_left: u32,

    /// Funct codes in issue order, for protocol tests.
    issued: Vec<u32>,
    /// Channel named by the most recent command.
    last_channel: Option<u8>,
}

impl Default for SoftwareCoprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareCoprocessor {
    /// Create a double in the reset state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sub: None,
            diag: None,
            sup: None,
            state: status::IDLE,
            busy_polls: DEFAULT_BUSY_POLLS,
            polls_left: 0,
            issued: Vec::new(),
            last_channel: None,
        }
    }

    /// Set how many BUSY polls precede DONE (0 = first query is terminal).
    #[must_use]
    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Funct codes in the order they were issued.
    pub fn issued_commands(&self) -> &[u32] {
        &self.issued
    }

    /// Channel named by the most recent command, if any.
    pub fn last_channel(&self) -> Option<u8> {
        self.last_channel
    }

    fn record(&mut self, channel: u8, funct: u32) {
        self.last_channel = Some(channel);
        self.issued.push(funct);
    }

    fn evaluate(&self, result: &ResultBuffer) -> Result<i64> {
        let (Some(sub), Some(diag), Some(sup)) = (&self.sub, &self.diag, &self.sup) else {
            return Err(DriverError::protocol(
                "START_COMP before all three vectors were loaded",
            ));
        };
        let n = diag.len();
        if sub.len() != n || sup.len() != n {
            return Err(DriverError::protocol(format!(
                "vector transfers disagree on order: a={}, b={n}, c={}",
                sub.len(),
                sup.len()
            )));
        }
        // The datapath consumes order − 1 off-diagonal coefficients; the
        // sentinel lane is transferred but never read.
        let a = &sub[..n - 1];
        let c = &sup[..n - 1];
        Ok(match result.width() {
            ResultWidth::W32 => i64::from(model::determinant_i32(a, diag, c)),
            ResultWidth::W64 => model::determinant_i64(a, diag, c),
        })
    }
}

impl Coprocessor for SoftwareCoprocessor {
    fn read_in_a(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()> {
        self.record(channel, cmd::READIN_A);
        self.sub = Some(buf.as_lanes().to_vec());
        self.state = status::LOAD_A;
        debug!("double captured sub-diagonal: {} lanes", buf.lanes());
        Ok(())
    }

    fn read_in_b(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()> {
        self.record(channel, cmd::READIN_B);
        self.diag = Some(buf.as_lanes().to_vec());
        self.state = status::LOAD_B;
        debug!("double captured main diagonal: {} lanes", buf.lanes());
        Ok(())
    }

    fn read_in_c(&mut self, channel: u8, buf: &VectorBuffer) -> Result<()> {
        self.record(channel, cmd::READIN_C);
        self.sup = Some(buf.as_lanes().to_vec());
        self.state = status::LOAD_C;
        debug!("double captured super-diagonal: {} lanes", buf.lanes());
        Ok(())
    }

    fn start_comp(&mut self, channel: u8, result: &mut ResultBuffer) -> Result<()> {
        self.record(channel, cmd::START_COMP);
        let value = self.evaluate(result)?;
        // Hardware raises DONE only after the result store; the double
        // writes here and withholds DONE for `busy_polls` queries.
        result.write(value);
        self.state = status::BUSY;
        self.polls_left = self.busy_polls;
        debug!("double evaluated determinant: {value} ({})", result.width());
        Ok(())
    }

    fn query_status(&mut self, channel: u8) -> Result<u64> {
        self.record(channel, cmd::QUERYSTATUS);
        if self.state == status::BUSY {
            if self.polls_left == 0 {
                self.state = status::DONE;
            } else {
                self.polls_left -= 1;
            }
        }
        Ok(self.state)
    }

    fn kind(&self) -> CoprocessorKind {
        CoprocessorKind::Software
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging;

    fn staged_counting() -> (VectorBuffer, VectorBuffer, VectorBuffer) {
        let a: Vec<i16> = (1..=15).collect();
        let b: Vec<i16> = (2..=17).collect();
        let c = vec![1i16; 15];
        let mut sub = VectorBuffer::new(16).unwrap();
        let mut diag = VectorBuffer::new(16).unwrap();
        let mut sup = VectorBuffer::new(16).unwrap();
        staging::stage_off_diagonal(&mut sub, &a).unwrap();
        staging::stage_diagonal(&mut diag, &b).unwrap();
        staging::stage_off_diagonal(&mut sup, &c).unwrap();
        (sub, diag, sup)
    }

    fn run_protocol(double: &mut SoftwareCoprocessor, width: ResultWidth) -> i64 {
        let (sub, diag, sup) = staged_counting();
        let mut result = ResultBuffer::new(width).unwrap();
        double.read_in_a(0, &sub).unwrap();
        double.read_in_c(0, &sup).unwrap();
        double.read_in_b(0, &diag).unwrap();
        double.start_comp(0, &mut result).unwrap();
        while double.query_status(0).unwrap() != status::DONE {}
        result.read()
    }

    #[test]
    fn walks_the_status_fsm() {
        let mut d = SoftwareCoprocessor::new().with_busy_polls(2);
        assert_eq!(d.query_status(0).unwrap(), status::IDLE);

        let (sub, diag, sup) = staged_counting();
        let mut result = ResultBuffer::new(ResultWidth::W32).unwrap();
        d.read_in_a(0, &sub).unwrap();
        assert_eq!(d.query_status(0).unwrap(), status::LOAD_A);
        d.read_in_c(0, &sup).unwrap();
        d.read_in_b(0, &diag).unwrap();
        d.start_comp(0, &mut result).unwrap();

        assert_eq!(d.query_status(0).unwrap(), status::BUSY);
        assert_eq!(d.query_status(0).unwrap(), status::BUSY);
        assert_eq!(d.query_status(0).unwrap(), status::DONE);
        // Terminal state is sticky.
        assert_eq!(d.query_status(0).unwrap(), status::DONE);
    }

    #[test]
    fn zero_busy_polls_is_immediately_done() {
        let mut d = SoftwareCoprocessor::new().with_busy_polls(0);
        let got = run_protocol(&mut d, ResultWidth::W32);
        assert_eq!(got, 82_619_585);
    }

    #[test]
    fn evaluates_at_the_result_register_width() {
        let mut d32 = SoftwareCoprocessor::new();
        assert_eq!(run_protocol(&mut d32, ResultWidth::W32), 82_619_585);

        let mut d64 = SoftwareCoprocessor::new();
        assert_eq!(run_protocol(&mut d64, ResultWidth::W64), 56_874_039_553_217);
    }

    #[test]
    fn start_before_loads_is_a_protocol_violation() {
        let mut d = SoftwareCoprocessor::new();
        let mut result = ResultBuffer::new(ResultWidth::W32).unwrap();
        let err = d.start_comp(0, &mut result).unwrap_err();
        assert!(matches!(err, DriverError::Protocol { .. }));
    }

    #[test]
    fn sentinel_lane_is_never_read() {
        let mut clean = SoftwareCoprocessor::new();
        let expected = run_protocol(&mut clean, ResultWidth::W32);

        // Same vectors, garbage in the sentinel lanes.
        let (mut sub, diag, mut sup) = staged_counting();
        sub.set(15, 77).unwrap();
        sup.set(15, -12_345).unwrap();
        let mut d = SoftwareCoprocessor::new().with_busy_polls(0);
        let mut result = ResultBuffer::new(ResultWidth::W32).unwrap();
        d.read_in_a(0, &sub).unwrap();
        d.read_in_c(0, &sup).unwrap();
        d.read_in_b(0, &diag).unwrap();
        d.start_comp(0, &mut result).unwrap();
        while d.query_status(0).unwrap() != status::DONE {}
        assert_eq!(result.read(), expected);
    }

    #[test]
    fn records_funct_sequence_and_channel() {
        let mut d = SoftwareCoprocessor::new().with_busy_polls(0);
        let _ = run_protocol(&mut d, ResultWidth::W32);
        let issued = d.issued_commands();
        assert_eq!(
            &issued[..4],
            &[cmd::READIN_A, cmd::READIN_C, cmd::READIN_B, cmd::START_COMP]
        );
        assert!(issued[4..].iter().all(|&f| f == cmd::QUERYSTATUS));
        assert_eq!(d.last_channel(), Some(0));
    }

    #[test]
    fn snapshots_at_load_time() {
        // Mutations after the load command must not reach the datapath.
        let (mut sub, diag, sup) = staged_counting();
        let mut d = SoftwareCoprocessor::new().with_busy_polls(0);
        let mut result = ResultBuffer::new(ResultWidth::W32).unwrap();
        d.read_in_a(0, &sub).unwrap();
        sub.set(0, 99).unwrap(); // too late, already transferred
        d.read_in_c(0, &sup).unwrap();
        d.read_in_b(0, &diag).unwrap();
        d.start_comp(0, &mut result).unwrap();
        while d.query_status(0).unwrap() != status::DONE {}
        assert_eq!(result.read(), 82_619_585);
    }
}

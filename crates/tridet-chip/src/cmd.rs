//! Command funct codes for the TD16.
//!
//! Every command is one R-type instruction in the decoded channel's opcode
//! space; funct7 carries the command code. Load commands and START_COMP use
//! the source-source form (rs1 = address, rs2 = lane count / zero);
//! QUERYSTATUS uses the destination form. See [`crate::isa`].

// ── Vector loads ──────────────────────────────────────────────────────────────
// rs1 = buffer address, rs2 = transfer length in lanes (the matrix order).

/// Load the sub-diagonal vector (`a`).
pub const READIN_A: u32 = 0;
/// Load the super-diagonal vector (`c`).
pub const READIN_C: u32 = 1;
/// Load the main-diagonal vector (`b`).
pub const READIN_B: u32 = 2;

// funct 3 is a reserved decode slot; the RTL raises no trap but latches nothing.

// ── Computation ───────────────────────────────────────────────────────────────

/// Begin recurrence evaluation. rs1 = result address, rs2 = 0.
pub const START_COMP: u32 = 4;
/// Read the status FSM code into rd.
pub const QUERYSTATUS: u32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_codes_are_distinct() {
        let codes = [READIN_A, READIN_C, READIN_B, START_COMP, QUERYSTATUS];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn reserved_slot_is_skipped() {
        // The decode table jumps from READIN_B (2) to START_COMP (4).
        assert_eq!(READIN_B + 2, START_COMP);
    }
}

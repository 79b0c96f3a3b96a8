//! RoCC instruction encoding for the TD16.
//!
//! The TD16 sits on the RoCC interface of a Rocket-class core and is driven
//! entirely through R-type instructions in the `custom-0` opcode space. The
//! funct7 field selects the command ([`crate::cmd`]); the funct3 bits are the
//! RoCC `xd`/`xs1`/`xs2` register-use flags, not an ALU selector.
//!
//! Two instruction forms are in use:
//!
//! ```text
//! source-source (xs1=1, xs2=1, xd=0):  rs1 = buffer address, rs2 = length in lanes
//! destination   (xd=1, xs1=0, xs2=0):  rd  = status scalar
//! ```
//!
//! The encoder here exists for decoder tests and waveform debugging; the
//! driver issues instructions through inline assembly, not by materialising
//! words.

/// Major opcode for the `custom-0` space. The TD16 decodes only this one.
pub const CUSTOM_0: u32 = 0x0B;
/// Major opcode for `custom-1` (not decoded by the TD16).
pub const CUSTOM_1: u32 = 0x2B;
/// Major opcode for `custom-2` (not decoded by the TD16).
pub const CUSTOM_2: u32 = 0x5B;
/// Major opcode for `custom-3` (not decoded by the TD16).
pub const CUSTOM_3: u32 = 0x7B;

/// Command channel the shipped RTL decodes (`custom-0`).
pub const DECODED_CHANNEL: u8 = 0;

/// Number of RoCC command channels architecturally available on the core.
pub const CHANNEL_COUNT: u8 = 4;

/// Map a command channel (0..=3) to its custom major opcode.
#[must_use]
pub const fn channel_opcode(channel: u8) -> Option<u32> {
    match channel {
        0 => Some(CUSTOM_0),
        1 => Some(CUSTOM_1),
        2 => Some(CUSTOM_2),
        3 => Some(CUSTOM_3),
        _ => None,
    }
}

/// RoCC register-use flags, encoded in the funct3 field.
pub mod form {
    /// Two source registers, no destination (`xd=0, xs1=1, xs2=1`).
    ///
    /// Used by the load commands and START_COMP.
    pub const SRC_SRC: u32 = 0b011;

    /// Destination only (`xd=1, xs1=0, xs2=0`).
    ///
    /// Used by QUERYSTATUS.
    pub const DST_ONLY: u32 = 0b100;
}

/// Assemble an R-type instruction word.
///
/// Field order follows the `.insn r` directive: opcode, funct3, funct7,
/// rd, rs1, rs2. Out-of-range field values are masked to their field width.
#[must_use]
pub const fn encode_r(opcode: u32, funct3: u32, funct7: u32, rd: u32, rs1: u32, rs2: u32) -> u32 {
    ((funct7 & 0x7F) << 25)
        | ((rs2 & 0x1F) << 20)
        | ((rs1 & 0x1F) << 15)
        | ((funct3 & 0x7) << 12)
        | ((rd & 0x1F) << 7)
        | (opcode & 0x7F)
}

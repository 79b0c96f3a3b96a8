//! Built-in verification scenarios.
//!
//! Two systems from the device bring-up suite, kept here so the CLI, the
//! examples and the hardware tests all drive the exact vectors the RTL was
//! signed off against. Both are order-16, the shipped vector RAM depth.

use crate::driver::DriverConfig;
use crate::system::TridiagonalSystem;
use tridet_chip::dma::ResultWidth;

/// A named bring-up system with the result width it was signed off at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Counting vectors: `a = 1..=15`, `b = 2..=17`, `c` all ones.
    ///
    /// The exact determinant (56 874 039 553 217) overflows a 32-bit
    /// register many times over, so this scenario exercises the accumulator
    /// wrap end to end.
    Counting,
    /// Mixed-sign heads `a = [8, 6, −5]`, `b = [10, 1, 8]`, `c = [9, 4, 8]`
    /// with all-ones tails.
    ///
    /// The determinant (−3216) fits both register widths; this scenario
    /// exercises sign handling and the wide build.
    MixedSign,
}

impl Scenario {
    /// Every built-in scenario, in bring-up order.
    pub const ALL: [Scenario; 2] = [Self::Counting, Self::MixedSign];

    /// Stable name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Counting => "counting",
            Self::MixedSign => "mixed-sign",
        }
    }

    /// One-line description for listings.
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            Self::Counting => "counting vectors, overflows the 32-bit register",
            Self::MixedSign => "mixed-sign heads with unit tails, fits both widths",
        }
    }

    /// Result width the scenario was signed off at.
    #[must_use]
    pub fn width(self) -> ResultWidth {
        match self {
            Self::Counting => ResultWidth::W32,
            Self::MixedSign => ResultWidth::W64,
        }
    }

    /// Driver configuration for the sign-off run: decoded channel, sign-off
    /// width.
    #[must_use]
    pub fn config(self) -> DriverConfig {
        DriverConfig {
            width: self.width(),
            ..DriverConfig::default()
        }
    }

    /// Build the scenario's system.
    #[must_use]
    pub fn system(self) -> TridiagonalSystem {
        let (sub, diag, sup) = match self {
            Self::Counting => (
                (1..=15).collect(),
                (2..=17).collect(),
                vec![1; 15],
            ),
            Self::MixedSign => (
                headed(&[8, 6, -5], 15),
                headed(&[10, 1, 8], 16),
                headed(&[9, 4, 8], 15),
            ),
        };
        TridiagonalSystem::new(sub, diag, sup)
            .expect("bring-up vectors are valid by construction")
    }

    /// Look a scenario up by its command-line name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(name))
    }
}

/// `head` followed by unit lanes up to `len` elements.
fn headed(head: &[i16], len: usize) -> Vec<i16> {
    let mut v = head.to_vec();
    v.resize(len, 1);
    v
}

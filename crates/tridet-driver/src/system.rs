//! Validated input: the three diagonals of one tridiagonal matrix.

use crate::error::{DriverError, Result};
use tridet_chip::dma;

/// The three diagonals of a tridiagonal matrix of order N.
///
/// `diagonal` has N elements; the off-diagonals have N − 1. The constructor
/// enforces those lengths and the device minimum order, so every
/// `TridiagonalSystem` that exists is stageable and a valid input to the
/// golden model. The order is carried by the data itself: there is no
/// compile-time size anywhere in the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TridiagonalSystem {
    sub: Vec<i16>,
    diag: Vec<i16>,
    sup: Vec<i16>,
}

impl TridiagonalSystem {
    /// Build a system from its sub-, main- and super-diagonal.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidSystem`] when the main diagonal is
    /// shorter than the device minimum order or the off-diagonals are not
    /// exactly one element shorter.
    pub fn new(sub: Vec<i16>, diag: Vec<i16>, sup: Vec<i16>) -> Result<Self> {
        let n = diag.len();
        if n < dma::MIN_ORDER {
            return Err(DriverError::invalid_system(format!(
                "order {n} below minimum {}",
                dma::MIN_ORDER
            )));
        }
        if sub.len() != n - 1 {
            return Err(DriverError::invalid_system(format!(
                "sub-diagonal has {} elements, order {n} needs {}",
                sub.len(),
                n - 1
            )));
        }
        if sup.len() != n - 1 {
            return Err(DriverError::invalid_system(format!(
                "super-diagonal has {} elements, order {n} needs {}",
                sup.len(),
                n - 1
            )));
        }
        Ok(Self { sub, diag, sup })
    }

    /// Matrix order N.
    pub fn order(&self) -> usize {
        self.diag.len()
    }

    /// Sub-diagonal `a`, N − 1 coefficients.
    pub fn sub_diagonal(&self) -> &[i16] {
        &self.sub
    }

    /// Main diagonal `b`, N coefficients.
    pub fn diagonal(&self) -> &[i16] {
        &self.diag
    }

    /// Super-diagonal `c`, N − 1 coefficients.
    pub fn super_diagonal(&self) -> &[i16] {
        &self.sup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimum_order() {
        let s = TridiagonalSystem::new(vec![1], vec![3, 7], vec![4]).unwrap();
        assert_eq!(s.order(), 2);
        assert_eq!(s.sub_diagonal(), &[1]);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        // Off-diagonal too long
        assert!(TridiagonalSystem::new(vec![1, 2], vec![3, 7], vec![4]).is_err());
        // Off-diagonal too short
        assert!(TridiagonalSystem::new(vec![], vec![3, 7], vec![4]).is_err());
        // Order below the device minimum
        assert!(TridiagonalSystem::new(vec![], vec![3], vec![]).is_err());
    }

    #[test]
    fn error_names_the_offending_diagonal() {
        let err = TridiagonalSystem::new(vec![1], vec![3, 7, 9], vec![4, 5, 6]).unwrap_err();
        assert!(err.to_string().contains("sub-diagonal"));
    }
}

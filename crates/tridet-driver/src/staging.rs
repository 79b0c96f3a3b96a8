//! Staging convention for accelerator-visible vectors.
//!
//! Every vector transfers a full `order` lanes. The main diagonal fills all
//! of them; the off-diagonals carry their `order − 1` coefficients in lanes
//! `0..order−1` in forward index order, and lane `order−1` is a zero
//! sentinel. The datapath never reads the sentinel lane; it exists so all
//! three DMA transfers have the same fixed width.
//!
//! The same convention is used for staging and readback, so reading back a
//! staged buffer reproduces the logical vector exactly.

use crate::buffer::VectorBuffer;
use crate::error::{DriverError, Result};

/// Stage the main diagonal: all lanes carry coefficients.
///
/// # Errors
///
/// Returns [`DriverError::StagingLength`] when the vector does not fill the
/// buffer exactly.
pub fn stage_diagonal(buf: &mut VectorBuffer, diagonal: &[i16]) -> Result<()> {
    if diagonal.len() != buf.lanes() {
        return Err(DriverError::StagingLength {
            capacity: buf.lanes(),
            len: diagonal.len(),
        });
    }
    for (lane, &coeff) in diagonal.iter().enumerate() {
        buf.set(lane, coeff)?;
    }
    tracing::debug!("staged main diagonal: {} lanes", diagonal.len());
    Ok(())
}

/// Stage an off-diagonal: `order − 1` coefficients forward, sentinel last.
///
/// The sentinel is written explicitly rather than relying on the zeroed
/// allocation, so restaging into a reused buffer stays correct.
///
/// # Errors
///
/// Returns [`DriverError::StagingLength`] when the vector is not exactly one
/// element shorter than the buffer.
pub fn stage_off_diagonal(buf: &mut VectorBuffer, coefficients: &[i16]) -> Result<()> {
    if coefficients.len() + 1 != buf.lanes() {
        return Err(DriverError::StagingLength {
            capacity: buf.lanes(),
            len: coefficients.len(),
        });
    }
    for (lane, &coeff) in coefficients.iter().enumerate() {
        buf.set(lane, coeff)?;
    }
    buf.set(buf.lanes() - 1, 0)?;
    tracing::debug!(
        "staged off-diagonal: {} coefficients + sentinel",
        coefficients.len()
    );
    Ok(())
}

/// Read back the coefficient lanes of a staged off-diagonal.
pub fn off_diagonal_lanes(buf: &VectorBuffer) -> &[i16] {
    &buf.as_lanes()[..buf.lanes() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_diagonal_round_trips() {
        let coeffs: Vec<i16> = (1..=15).collect();
        let mut buf = VectorBuffer::new(16).unwrap();
        stage_off_diagonal(&mut buf, &coeffs).unwrap();
        assert_eq!(off_diagonal_lanes(&buf), coeffs.as_slice());
    }

    #[test]
    fn sentinel_is_the_last_lane() {
        let mut buf = VectorBuffer::new(4).unwrap();
        // Dirty the buffer first so the sentinel write is observable.
        for lane in 0..4 {
            buf.set(lane, -1).unwrap();
        }
        stage_off_diagonal(&mut buf, &[5, 6, 7]).unwrap();
        assert_eq!(buf.as_lanes(), &[5, 6, 7, 0]);
    }

    #[test]
    fn diagonal_round_trips() {
        let diag: Vec<i16> = (2..=17).collect();
        let mut buf = VectorBuffer::new(16).unwrap();
        stage_diagonal(&mut buf, &diag).unwrap();
        assert_eq!(buf.as_lanes(), diag.as_slice());
    }

    #[test]
    fn length_mismatches_are_rejected() {
        let mut buf = VectorBuffer::new(4).unwrap();
        assert!(matches!(
            stage_diagonal(&mut buf, &[1, 2, 3]).unwrap_err(),
            DriverError::StagingLength { capacity: 4, len: 3 }
        ));
        // Off-diagonal must be exactly one short, not equal.
        assert!(stage_off_diagonal(&mut buf, &[1, 2, 3, 4]).is_err());
        assert!(stage_off_diagonal(&mut buf, &[1, 2]).is_err());
    }
}

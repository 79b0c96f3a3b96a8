//! Golden model of the determinant datapath.
//!
//! The TD16 evaluates the standard three-term recurrence over the leading
//! principal minors of a tridiagonal matrix of order `n`:
//!
//! ```text
//! D[0] = b[0]
//! D[1] = b[1]·b[0] − a[0]·c[0]
//! D[i] = b[i]·D[i−1] − a[i−1]·c[i−1]·D[i−2]      i = 2..n−1
//! ```
//!
//! where `a`, `b`, `c` are the sub-, main- and super-diagonal. The hardware
//! accumulates in a register of the configured result width and wraps on
//! overflow, so the golden model evaluates the chain in wrapping `i128` and
//! truncates to the comparison width at the very end. Truncation of a wider
//! wrapping evaluation is congruent to wrapping evaluation at the narrow
//! width, which makes [`determinant_i32`] and [`determinant_i64`]
//! bit-accurate against the 32- and 64-bit register builds for any input.

/// Determinant of the order-`n` tridiagonal matrix, evaluated in `i128`.
///
/// Exact whenever the true determinant fits `i128`; beyond that the value is
/// the determinant modulo 2¹²⁸, matching the accumulator wrap of any
/// narrower hardware build after truncation.
///
/// # Panics
///
/// Panics if `diag.len() < 2` or the off-diagonals are not one element
/// shorter than `diag`. Callers with untrusted input validate first (the
/// driver does this in its system type).
#[must_use]
pub fn determinant_wide(sub: &[i16], diag: &[i16], sup: &[i16]) -> i128 {
    let n = diag.len();
    assert!(n >= 2, "matrix order must be at least 2, got {n}");
    assert_eq!(sub.len(), n - 1, "sub-diagonal must have order − 1 elements");
    assert_eq!(sup.len(), n - 1, "super-diagonal must have order − 1 elements");

    let mut d_prev = i128::from(diag[0]);
    let mut d = i128::from(diag[1]) * i128::from(diag[0]) - i128::from(sub[0]) * i128::from(sup[0]);

    for i in 2..n {
        let off = i128::from(sub[i - 1]) * i128::from(sup[i - 1]);
        let next = i128::from(diag[i])
            .wrapping_mul(d)
            .wrapping_sub(off.wrapping_mul(d_prev));
        d_prev = d;
        d = next;
    }
    d
}

/// Golden result for the 32-bit register build.
///
/// # Panics
///
/// Same length contract as [`determinant_wide`].
#[must_use]
#[allow(clippy::cast_possible_truncation)] // truncation is the register semantics
pub fn determinant_i32(sub: &[i16], diag: &[i16], sup: &[i16]) -> i32 {
    determinant_wide(sub, diag, sup) as i32
}

/// Golden result for the 64-bit register build.
///
/// # Panics
///
/// Same length contract as [`determinant_wide`].
#[must_use]
#[allow(clippy::cast_possible_truncation)] // truncation is the register semantics
pub fn determinant_i64(sub: &[i16], diag: &[i16], sup: &[i16]) -> i64 {
    determinant_wide(sub, diag, sup) as i64
}

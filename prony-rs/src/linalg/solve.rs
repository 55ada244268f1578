use crate::error::{Error, Result};
use nalgebra::{ComplexField, DMatrix, DVector};
use num_traits::{Float, Zero};

/// Solve the square system `a * x = y` by LU decomposition with partial
/// pivoting.
///
/// Unlike a bare `a.lu().solve(y)`, near-singular systems are reported rather
/// than producing amplified garbage: the system is rejected when the ratio of
/// the smallest to the largest pivot modulus is at most `n * eps`, and when
/// any entry of the solution is not finite. No pseudo-inverse fallback is
/// attempted.
///
/// A `0 x 0` system has the empty solution.
///
/// ## Errors
/// * [`Error::DimensionMismatch`] if `a` is not square or `y` has the wrong
///   length.
/// * [`Error::SingularSystem`] if the system cannot be solved reliably.
///
/// ```
/// use prony_rs::linalg::lu_solve_checked;
/// use prony_rs::na::{dmatrix, dvector};
///
/// let x = lu_solve_checked(dmatrix![2.0f64, 1.0; 1.0, 3.0], &dvector![3.0, 5.0]).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn lu_solve_checked<T>(a: DMatrix<T>, y: &DVector<T>) -> Result<DVector<T>>
where
    T: ComplexField + Copy,
    T::RealField: Float,
{
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(Error::DimensionMismatch { rows, cols });
    }
    if y.len() != rows {
        return Err(Error::DimensionMismatch {
            rows: y.len(),
            cols,
        });
    }
    if rows == 0 {
        return Ok(DVector::zeros(0));
    }

    let lu = a.lu();
    let (min_pivot, max_pivot) = pivot_bounds(&lu.u());
    if max_pivot == T::RealField::zero() {
        tracing::debug!(n = rows, "denominator system has only zero pivots");
        return Err(Error::SingularSystem {
            reason: "all pivots are zero",
        });
    }
    let tol = <T::RealField as Float>::epsilon()
        * nalgebra::convert::<f64, T::RealField>(rows as f64);
    if min_pivot <= tol * max_pivot {
        tracing::debug!(
            n = rows,
            min_pivot = ?min_pivot,
            max_pivot = ?max_pivot,
            "denominator system is numerically singular"
        );
        return Err(Error::SingularSystem {
            reason: "pivot ratio is below working precision",
        });
    }

    let x = lu.solve(y).ok_or(Error::SingularSystem {
        reason: "LU back-substitution failed",
    })?;
    if !x.iter().all(|v| v.is_finite()) {
        tracing::debug!(n = rows, "denominator solution is not finite");
        return Err(Error::SingularSystem {
            reason: "solution contains non-finite values",
        });
    }
    Ok(x)
}

/// Smallest and largest pivot modulus on the diagonal of `u`.
fn pivot_bounds<T>(u: &DMatrix<T>) -> (T::RealField, T::RealField)
where
    T: ComplexField + Copy,
    T::RealField: Float,
{
    u.diagonal().iter().fold(
        (<T::RealField as Float>::infinity(), T::RealField::zero()),
        |(lo, hi), p| {
            let m = p.modulus();
            (if m < lo { m } else { lo }, if m > hi { m } else { hi })
        },
    )
}

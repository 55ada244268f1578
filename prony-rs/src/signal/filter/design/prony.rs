use super::BaFormatFilter;
use crate::error::{invalid_arg, Result};
use crate::linalg::{lower_toeplitz, lu_solve_checked};
use alloc::vec::Vec;
use nalgebra::{ComplexField, DMatrix, DVector, Scalar};
use num_traits::{Float, One, Zero};

/// Working copy of an impulse response, zero-padded when the orders need
/// more samples than were given.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedResponse<T> {
    /// Working samples. At least `k + 1` long.
    pub samples: Vec<T>,
    /// Index of the last sample that enters the Toeplitz matrix.
    pub k: usize,
}

impl<T> PaddedResponse<T> {
    /// Samples `0..=k`, the ones the Toeplitz matrix is built from.
    pub fn active(&self) -> &[T] {
        &self.samples[..=self.k]
    }
}

/// The three blocks of the Prony Toeplitz matrix.
///
/// With `H` of shape `(K+1) x (na+1)`:
/// * `upper`: rows `0..=nb`, all columns, `(nb+1) x (na+1)`.
/// * `column`: rows `nb+1..=K` of column 0, length `K-nb`.
/// * `lower`: rows `nb+1..=K`, columns `1..=na`, `(K-nb) x na`.
#[derive(Debug, Clone, PartialEq)]
pub struct PronyPartitions<T>
where
    T: Scalar,
{
    /// Block used to synthesise the numerator.
    pub upper: DMatrix<T>,
    /// Right-hand side of the denominator system.
    pub column: DVector<T>,
    /// Coefficient block of the denominator system.
    pub lower: DMatrix<T>,
}

/// Copy `h` and zero-pad it so that every slice of the Prony pipeline is in
/// bounds.
///
/// `K = max(h.len() - 1, max(nb, na))`. When `h.len() >= max(nb, na) + 2`
/// the copy is exact and `K = h.len() - 1`; otherwise `K = max(nb, na)` and
/// the copy is zero-extended to `K + 2` samples.
pub fn pad_impulse_response<T>(h: &[T], nb: usize, na: usize) -> PaddedResponse<T>
where
    T: Zero + Copy,
{
    let order = nb.max(na);
    let mut samples = h.to_vec();
    if samples.len() < order + 2 {
        tracing::debug!(
            len = h.len(),
            padded_len = order + 2,
            nb,
            na,
            "zero-padding impulse response"
        );
        samples.resize(order + 2, T::zero());
    }
    let k = h.len().saturating_sub(1).max(order);
    PaddedResponse { samples, k }
}

/// Scale factor for the Toeplitz matrix: the first sample, or one when the
/// first sample is exactly zero.
pub fn scale_factor<T>(h0: T) -> T
where
    T: ComplexField + Copy,
{
    if h0 == T::zero() {
        tracing::debug!("first impulse response sample is zero, using unit scale");
        T::one()
    } else {
        h0
    }
}

/// Lower-triangular Toeplitz matrix of the scaled response, shape
/// `(K+1) x (na+1)`, with `H[i][j] = h[i-j] / c` for `i >= j`.
///
/// Only the `na + 1` columns used downstream are built.
pub fn prony_toeplitz<T>(padded: &PaddedResponse<T>, c: T, na: usize) -> DMatrix<T>
where
    T: ComplexField + Copy,
{
    let scaled = padded.active().iter().map(|&x| x / c).collect::<Vec<_>>();
    lower_toeplitz(&scaled, na + 1)
}

/// Split the Toeplitz matrix into the numerator block and the denominator
/// system.
///
/// ## Errors
/// [`crate::Error::DimensionMismatch`] unless `K - nb == na`, i.e. unless the
/// denominator system is square.
pub fn partition_prony<T>(h: &DMatrix<T>, nb: usize, na: usize) -> Result<PronyPartitions<T>>
where
    T: Scalar + Copy,
{
    let rows = h.nrows().saturating_sub(nb + 1);
    if h.nrows() < nb + 1 || h.ncols() != na + 1 || rows != na {
        return Err(crate::Error::DimensionMismatch { rows, cols: na });
    }
    Ok(PronyPartitions {
        upper: h.rows(0, nb + 1).into_owned(),
        column: h.column(0).rows(nb + 1, na).into_owned(),
        lower: h.view((nb + 1, 1), (na, na)).into_owned(),
    })
}

/// Numerator `b = c * a * upperᵗ`, length `nb + 1`.
pub fn synthesize_numerator<T>(upper: &DMatrix<T>, a: &DVector<T>, c: T) -> Vec<T>
where
    T: ComplexField + Copy,
{
    (upper * a).iter().map(|&v| c * v).collect()
}

///
/// Prony's method for time-domain IIR filter design.
///
/// Finds a filter with numerator order `nb` and denominator order `na` whose
/// impulse response matches `h`. The coefficients are returned as
/// [`BaFormatFilter`] with `b.len() == nb + 1` and `a.len() == na + 1`,
/// ordered in descending powers of `z`, and `a[0] == 1`. `h` may be real or
/// complex.
///
/// If the largest order is not covered by `h`, `h` is padded with zeros. The
/// denominator system must come out square: with `K` the last sample index
/// after padding, `K - nb == na`. In practice pass `nb + na + 1` samples, or
/// fewer when one of the orders is zero.
///
/// ## Errors
/// * [`crate::Error::InvalidArg`] if `h` is empty or holds non-finite samples.
/// * [`crate::Error::DimensionMismatch`] if `K - nb != na`.
/// * [`crate::Error::SingularSystem`] if the denominator system is singular
///   or the solution is not finite.
///
/// ## References
/// T.W. Parks and C.S. Burrus, *Digital Filter Design*, John Wiley and Sons,
/// 1987, p. 226.
///
/// ## Examples
/// ```
/// use prony_rs::signal::filter::design::prony_dyn;
///
/// // Impulse response of (1 + 0.5 z^-1) / (1 - 0.9 z^-1 + 0.2 z^-2).
/// let h = [1.0f64, 1.4, 1.06, 0.674];
/// let ba = prony_dyn(&h, 1, 2).unwrap();
///
/// let b = [1.0f64, 0.5];
/// let a = [1.0f64, -0.9, 0.2];
/// ba.b.iter().zip(b).for_each(|(got, want)| assert!((got - want).abs() < 1e-12));
/// ba.a.iter().zip(a).for_each(|(got, want)| assert!((got - want).abs() < 1e-12));
/// ```
pub fn prony_dyn<T>(h: &[T], nb: usize, na: usize) -> Result<BaFormatFilter<T>>
where
    T: ComplexField + Copy,
    T::RealField: Float,
{
    if h.is_empty() {
        return Err(invalid_arg("h", "impulse response must not be empty"));
    }
    if !h.iter().all(|v| v.is_finite()) {
        return Err(invalid_arg("h", "impulse response must be finite"));
    }

    let padded = pad_impulse_response(h, nb, na);
    let c = scale_factor(padded.samples[0]);
    let toeplitz = prony_toeplitz(&padded, c, na);
    let parts = partition_prony(&toeplitz, nb, na)?;

    // The recurrence needs x = -H2^-1 h1.
    let x = lu_solve_checked(-parts.lower, &parts.column)?;
    let a = DVector::from_iterator(
        na + 1,
        core::iter::once(T::one()).chain(x.iter().copied()),
    );
    let b = synthesize_numerator(&parts.upper, &a, c);

    tracing::trace!(nb, na, k = padded.k, "prony fit complete");
    Ok(BaFormatFilter {
        b,
        a: a.iter().copied().collect(),
    })
}

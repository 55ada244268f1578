use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D};
use nalgebra::{DMatrix, Scalar};
use num_traits::Zero;

/// 1D lower-triangular Toeplitz construction capability.
pub trait ToeplitzBuild1D<T> {
    /// Output matrix type.
    type Output;

    /// Build a Toeplitz matrix from its first column.
    fn run<I>(&self, column: &I) -> Result<Self::Output, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Constructor config for [`ToeplitzKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToeplitzConfig {
    /// Number of columns to keep. Defaults to the column length.
    pub ncols: Option<usize>,
}

/// Lower-triangular Toeplitz kernel: first row is `[c[0], 0, ..., 0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToeplitzKernel {
    ncols: Option<usize>,
}

impl KernelLifecycle for ToeplitzKernel {
    type Config = ToeplitzConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.ncols == Some(0) {
            return Err(ConfigError::InvalidArgument {
                arg: "ncols",
                reason: "toeplitz requires at least one column",
            });
        }
        Ok(Self {
            ncols: config.ncols,
        })
    }
}

impl<T> ToeplitzBuild1D<T> for ToeplitzKernel
where
    T: Scalar + Zero + Copy,
{
    type Output = DMatrix<T>;

    fn run<I>(&self, column: &I) -> Result<Self::Output, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
    {
        let column = column.read_slice().map_err(ExecInvariantViolation::from)?;
        if column.is_empty() {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "toeplitz requires a non-empty first column",
            });
        }
        let ncols = self.ncols.unwrap_or(column.len());
        Ok(lower_toeplitz(column, ncols))
    }
}

/// Lower-triangular Toeplitz matrix with `column.len()` rows and `ncols`
/// columns. Entries above the diagonal are zero; nothing beyond `ncols` is
/// materialised.
pub(crate) fn lower_toeplitz<T>(column: &[T], ncols: usize) -> DMatrix<T>
where
    T: Scalar + Zero + Copy,
{
    DMatrix::from_fn(column.len(), ncols, |i, j| {
        if i >= j {
            column[i - j]
        } else {
            T::zero()
        }
    })
}

///
/// Construct a Toeplitz matrix.
///
/// The matrix has constant diagonals, with `c` as its first column and `r`
/// as its first row. `r[0]` is ignored; the first row is `[c[0], r[1:]]`.
/// The result has shape `c.len() x r.len()`.
///
/// ```
/// use prony_rs::linalg::toeplitz_dyn;
/// use prony_rs::na::matrix;
///
/// let m = toeplitz_dyn(&[1., 2., 3.], &[1., 4., 5., 6.]);
/// let expected = matrix!(
///     1., 4., 5., 6.;
///     2., 1., 4., 5.;
///     3., 2., 1., 4.;
/// );
/// assert_eq!(m, expected);
/// ```
pub fn toeplitz_dyn<T>(c: &[T], r: &[T]) -> DMatrix<T>
where
    T: Scalar + Copy,
{
    DMatrix::from_fn(c.len(), r.len(), |i, j| {
        if i >= j {
            c[i - j]
        } else {
            r[j - i]
        }
    })
}

///
/// Checked Toeplitz construction; rejects empty first column or row.
///
pub fn toeplitz_checked_dyn<T>(c: &[T], r: &[T]) -> Result<DMatrix<T>, ConfigError>
where
    T: Scalar + Copy,
{
    if c.is_empty() {
        return Err(ConfigError::EmptyInput { arg: "c" });
    }
    if r.is_empty() {
        return Err(ConfigError::EmptyInput { arg: "r" });
    }
    Ok(toeplitz_dyn(c, r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{matrix, Complex};

    #[test]
    fn scipy_example_dyn() {
        // scipy.linalg.toeplitz([1, 2, 3], [1, 4, 5, 6])
        let m: DMatrix<f64> = toeplitz_dyn(&[1., 2., 3.], &[1., 4., 5., 6.]);
        let expected = matrix!(
            1., 4., 5., 6.;
            2., 1., 4., 5.;
            3., 2., 1., 4.;
        );
        assert_eq!(m, expected);
    }

    #[test]
    fn first_row_entry_is_taken_from_column() {
        let m = toeplitz_dyn(&[7., 2.], &[99., 3.]);
        assert_eq!(m[(0, 0)], 7.);
        assert_eq!(m[(1, 1)], 7.);
        assert_eq!(m[(0, 1)], 3.);
    }

    #[test]
    fn empty_inputs_give_empty_shapes() {
        let m = toeplitz_dyn::<f64>(&[], &[1., 2.]);
        assert_eq!(m.shape(), (0, 2));
        let m = toeplitz_dyn(&[1., 2.], &[]);
        assert_eq!(m.shape(), (2, 0));

        assert_eq!(
            toeplitz_checked_dyn::<f64>(&[], &[1.]),
            Err(ConfigError::EmptyInput { arg: "c" })
        );
        assert_eq!(
            toeplitz_checked_dyn(&[1.], &[]),
            Err(ConfigError::EmptyInput { arg: "r" })
        );
    }

    #[test]
    fn kernel_builds_truncated_lower_triangular() {
        let kernel = ToeplitzKernel::try_new(ToeplitzConfig { ncols: Some(2) })
            .expect("kernel should initialize");
        let m = kernel.run(&[1.0f64, 0.5, 0.25, 0.125]).expect("kernel should run");
        let expected = matrix!(
            1.0, 0.0;
            0.5, 1.0;
            0.25, 0.5;
            0.125, 0.25;
        );
        assert_eq!(m, expected);

        let full = ToeplitzKernel::default()
            .run(&[1.0f64, 2.0, 3.0])
            .expect("kernel should run");
        assert_eq!(full, toeplitz_dyn(&[1.0, 2.0, 3.0], &[1.0, 0.0, 0.0]));
    }

    #[test]
    fn kernel_validates_config_and_input() {
        assert_eq!(
            ToeplitzKernel::try_new(ToeplitzConfig { ncols: Some(0) }),
            Err(ConfigError::InvalidArgument {
                arg: "ncols",
                reason: "toeplitz requires at least one column",
            })
        );
        let empty: [f64; 0] = [];
        let err = ToeplitzKernel::default()
            .run(&empty)
            .expect_err("empty column should fail");
        assert_eq!(
            err,
            ExecInvariantViolation::InvalidState {
                reason: "toeplitz requires a non-empty first column",
            }
        );
    }

    #[test]
    fn complex_entries_are_preserved() {
        let c = [Complex::new(1.0f64, 1.0), Complex::new(0.0, -2.0)];
        let m = lower_toeplitz(&c, 2);
        assert_eq!(m[(1, 0)], Complex::new(0.0, -2.0));
        assert_eq!(m[(1, 1)], Complex::new(1.0, 1.0));
        assert_eq!(m[(0, 1)], Complex::new(0.0, 0.0));
    }
}

//! Trait-first kernels for time-domain filter design.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::traits::PronyDesign1D;
use nalgebra::ComplexField;
use num_traits::Float;

use super::{prony_dyn, BaFormatFilter};

/// Constructor config for [`PronyKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PronyConfig {
    /// Numerator order.
    pub nb: usize,
    /// Denominator order.
    pub na: usize,
    /// Optional impulse-response length. When set, the orders are checked
    /// against it at construction and inputs of any other length are
    /// rejected.
    pub expected_len: Option<usize>,
}

/// Trait-first Prony design kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PronyKernel {
    nb: usize,
    na: usize,
    expected_len: Option<usize>,
}

impl PronyKernel {
    /// Numerator order.
    pub fn nb(&self) -> usize {
        self.nb
    }

    /// Denominator order.
    pub fn na(&self) -> usize {
        self.na
    }

    fn checked_input<'a, T, I>(&self, input: &'a I) -> Result<&'a [T], ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
    {
        let h = input.read_slice().map_err(ExecInvariantViolation::from)?;
        if h.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "h" }.into());
        }
        if let Some(expected) = self.expected_len {
            if h.len() != expected {
                return Err(ExecInvariantViolation::LengthMismatch {
                    arg: "h",
                    expected,
                    got: h.len(),
                });
            }
        }
        Ok(h)
    }
}

impl KernelLifecycle for PronyKernel {
    type Config = PronyConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if let Some(len) = config.expected_len {
            if len == 0 {
                return Err(ConfigError::InvalidArgument {
                    arg: "expected_len",
                    reason: "impulse response must not be empty",
                });
            }
            let k = (len - 1).max(config.nb.max(config.na));
            if k - config.nb != config.na {
                return Err(ConfigError::InvalidArgument {
                    arg: "expected_len",
                    reason: "orders and response length do not give a square denominator system",
                });
            }
        }
        Ok(Self {
            nb: config.nb,
            na: config.na,
            expected_len: config.expected_len,
        })
    }
}

impl<T> PronyDesign1D<T> for PronyKernel
where
    T: ComplexField + Copy,
    T::RealField: Float,
{
    fn run_into<I, OB, OA>(
        &self,
        input: &I,
        b_out: &mut OB,
        a_out: &mut OA,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        OB: Write1D<T> + ?Sized,
        OA: Write1D<T> + ?Sized,
    {
        let b_slice = b_out
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        if b_slice.len() != self.nb + 1 {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "b_out",
                expected: self.nb + 1,
                got: b_slice.len(),
            });
        }
        let a_slice = a_out
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        if a_slice.len() != self.na + 1 {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "a_out",
                expected: self.na + 1,
                got: a_slice.len(),
            });
        }

        let ba = self.run_alloc(input)?;
        b_slice.copy_from_slice(&ba.b);
        a_slice.copy_from_slice(&ba.a);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<BaFormatFilter<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
    {
        let h = self.checked_input(input)?;
        prony_dyn(h, self.nb, self.na).map_err(ExecInvariantViolation::from)
    }
}

#[cfg(test)]
mod tests {
    use super::{PronyConfig, PronyKernel};
    use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle};
    use crate::signal::filter::design::prony_dyn;
    use crate::signal::traits::PronyDesign1D;
    use ndarray::Array1;

    const H: [f64; 4] = [1.0, 1.4, 1.06, 0.674];

    #[test]
    fn prony_kernel_matches_function() {
        let kernel = PronyKernel::try_new(PronyConfig {
            nb: 1,
            na: 2,
            expected_len: Some(4),
        })
        .expect("kernel should initialize");
        assert_eq!((kernel.nb(), kernel.na()), (1, 2));

        let expected = prony_dyn(&H, 1, 2).expect("reference prony");
        let actual = kernel.run_alloc(&H).expect("kernel should run");
        assert_eq!(actual, expected);

        let arr = Array1::from(H.to_vec());
        let from_ndarray = kernel.run_alloc(&arr).expect("ndarray input");
        assert_eq!(from_ndarray, expected);
    }

    #[test]
    fn prony_kernel_run_into_fills_buffers() {
        let kernel = PronyKernel::try_new(PronyConfig {
            nb: 1,
            na: 2,
            expected_len: None,
        })
        .expect("kernel should initialize");
        let expected = prony_dyn(&H, 1, 2).expect("reference prony");

        let mut b = [0.0f64; 2];
        let mut a = vec![0.0f64; 3];
        kernel
            .run_into(&H, &mut b, &mut a)
            .expect("run_into should succeed");
        assert_eq!(b.to_vec(), expected.b);
        assert_eq!(a, expected.a);

        let mut short_a = [0.0f64; 2];
        assert_eq!(
            kernel.run_into(&H, &mut b, &mut short_a),
            Err(ExecInvariantViolation::LengthMismatch {
                arg: "a_out",
                expected: 3,
                got: 2,
            })
        );
    }

    #[test]
    fn prony_kernel_validates_expected_len() {
        let err = PronyKernel::try_new(PronyConfig {
            nb: 1,
            na: 2,
            expected_len: Some(10),
        })
        .expect_err("non-square system");
        assert_eq!(
            err,
            ConfigError::InvalidArgument {
                arg: "expected_len",
                reason: "orders and response length do not give a square denominator system",
            }
        );

        let err = PronyKernel::try_new(PronyConfig {
            nb: 0,
            na: 0,
            expected_len: Some(0),
        })
        .expect_err("empty response");
        assert!(matches!(err, ConfigError::InvalidArgument { .. }));

        // Padding makes a single sample enough for an all-pole fit.
        assert!(PronyKernel::try_new(PronyConfig {
            nb: 0,
            na: 3,
            expected_len: Some(1),
        })
        .is_ok());
    }

    #[test]
    fn prony_kernel_surfaces_runtime_errors() {
        let kernel = PronyKernel::try_new(PronyConfig {
            nb: 1,
            na: 1,
            expected_len: Some(3),
        })
        .expect("kernel should initialize");

        let err = kernel.run_alloc(&[0.0f64; 3]).expect_err("zero response");
        assert!(matches!(err, ExecInvariantViolation::SingularSystem { .. }));

        let err = kernel.run_alloc(&[1.0f64; 4]).expect_err("wrong length");
        assert_eq!(
            err,
            ExecInvariantViolation::LengthMismatch {
                arg: "h",
                expected: 3,
                got: 4,
            }
        );

        let unchecked = PronyKernel::try_new(PronyConfig {
            nb: 1,
            na: 1,
            expected_len: None,
        })
        .expect("kernel should initialize");
        let err = unchecked
            .run_alloc(&[1.0f64, 0.5, 0.25, 0.125, 0.0625])
            .expect_err("overdetermined");
        assert_eq!(err, ExecInvariantViolation::DimensionMismatch { rows: 3, cols: 1 });

        let empty: [f64; 0] = [];
        assert_eq!(
            unchecked.run_alloc(&empty),
            Err(ExecInvariantViolation::Config(ConfigError::EmptyInput {
                arg: "h"
            }))
        );
    }
}

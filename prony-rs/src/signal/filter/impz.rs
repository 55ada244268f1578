use crate::error::{invalid_arg, Result};
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::traits::ImpulseResponse1D;
use nalgebra::ComplexField;

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// Impulse response of the filter `B(z)/A(z)`, written into `out`.
///
/// The response is the output of the difference equation
///
/// ```text
/// a[0]*y[n] = b[n] - a[1]*y[n-1] - ... - a[N]*y[n-N]
/// ```
///
/// driven by a unit impulse, with `b[n] = 0` past the end of `b`. `out.len()`
/// samples are produced.
///
/// ## Errors
/// [`crate::Error::InvalidArg`] if `a` is empty or `a[0]` is zero.
pub fn impz_into<T>(b: &[T], a: &[T], out: &mut [T]) -> Result<()>
where
    T: ComplexField + Copy,
{
    let Some(&a0) = a.first() else {
        return Err(invalid_arg("a", "denominator must not be empty"));
    };
    if a0 == T::zero() {
        return Err(invalid_arg(
            "a",
            "leading denominator coefficient must be non-zero",
        ));
    }

    for n in 0..out.len() {
        let mut acc = b.get(n).copied().unwrap_or_else(T::zero);
        for k in 1..a.len().min(n + 1) {
            acc -= a[k] * out[n - k];
        }
        out[n] = acc / a0;
    }
    Ok(())
}

/// Compute the first `n` samples of the impulse response of `B(z)/A(z)`.
///
/// Used to check a fitted model against the response it was fitted to.
///
/// ```
/// use prony_rs::signal::filter::impz_dyn;
///
/// let h = impz_dyn(&[1.0f64, 0.5], &[1.0, -0.9, 0.2], 4).unwrap();
/// let expected = [1.0f64, 1.4, 1.06, 0.674];
/// for (got, want) in h.iter().zip(expected) {
///     assert!((got - want).abs() < 1e-12);
/// }
/// ```
#[cfg(feature = "alloc")]
pub fn impz_dyn<T>(b: &[T], a: &[T], n: usize) -> Result<Vec<T>>
where
    T: ComplexField + Copy,
{
    let mut out = vec![T::zero(); n];
    impz_into(b, a, &mut out)?;
    Ok(out)
}

/// Constructor config for [`ImpzKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpzConfig {
    /// Number of samples to generate.
    pub n: usize,
}

/// Trait-first impulse-response kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpzKernel {
    n: usize,
}

impl KernelLifecycle for ImpzKernel {
    type Config = ImpzConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        if config.n == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "n",
                reason: "impulse response length must be greater than zero",
            });
        }
        Ok(Self { n: config.n })
    }
}

impl<T> ImpulseResponse1D<T> for ImpzKernel
where
    T: ComplexField + Copy,
{
    fn run_into<IB, IA, O>(
        &self,
        b: &IB,
        a: &IA,
        out: &mut O,
    ) -> core::result::Result<(), ExecInvariantViolation>
    where
        IB: Read1D<T> + ?Sized,
        IA: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized,
    {
        let b = b.read_slice().map_err(ExecInvariantViolation::from)?;
        let a = a.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = out
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        if out.len() != self.n {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: self.n,
                got: out.len(),
            });
        }
        match a.first() {
            None => return Err(ConfigError::EmptyInput { arg: "a" }.into()),
            Some(&a0) if a0 == T::zero() => {
                return Err(ExecInvariantViolation::InvalidState {
                    reason: "leading denominator coefficient must be non-zero",
                })
            }
            Some(_) => {}
        }
        impz_into(b, a, out).map_err(ExecInvariantViolation::from)
    }

    #[cfg(feature = "alloc")]
    fn run_alloc<IB, IA>(
        &self,
        b: &IB,
        a: &IA,
    ) -> core::result::Result<Vec<T>, ExecInvariantViolation>
    where
        IB: Read1D<T> + ?Sized,
        IA: Read1D<T> + ?Sized,
    {
        let mut out = vec![T::zero(); self.n];
        self.run_into(b, a, out.as_mut_slice())?;
        Ok(out)
    }
}

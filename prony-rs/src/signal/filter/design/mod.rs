//! Time-domain IIR filter design.
//!
//! [`prony_dyn`] fits a rational transfer function to an impulse response;
//! [`PronyKernel`] is the same design behind a validated config.

use alloc::vec::Vec;

mod kernels;
mod prony;

pub use kernels::*;
pub use prony::*;

/// Transfer-function coefficients, ordered in descending powers of `z`.
#[derive(Debug, Clone, PartialEq)]
pub struct BaFormatFilter<T> {
    /// Numerator coefficients.
    pub b: Vec<T>,
    /// Denominator coefficients.
    pub a: Vec<T>,
}

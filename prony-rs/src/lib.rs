//! Prony's method for time-domain IIR filter design.
//!
//! Given an observed impulse response, [`signal::filter::design::prony_dyn`]
//! estimates numerator and denominator coefficients of a rational transfer
//! function `B(z)/A(z)` whose impulse response matches it. Real and complex
//! scalars are both supported through [`nalgebra::ComplexField`].
//!
//! The crate follows the trait-first kernel layout: plain `*_dyn` functions
//! for direct use, plus validated kernels built through
//! [`kernel::KernelLifecycle`].

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// Re-export of the linear algebra backend.
pub use nalgebra as na;

/// Error types for the function API.
pub mod error;

/// Shared trait-first kernel substrate.
pub mod kernel;

/// Dense matrix helpers: Toeplitz construction and checked solves.
#[cfg(feature = "alloc")]
pub mod linalg;

/// Signal processing.
pub mod signal;

pub use error::{Error, Result};

//! Trait interfaces for signal-processing capabilities.
//!
//! These traits define the trait-first API shape used by the kernels.

use crate::kernel::{ExecInvariantViolation, Read1D, Write1D};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// 1D impulse-response generation capability for a `B(z)/A(z)` filter.
pub trait ImpulseResponse1D<T> {
    /// Write the impulse response into a caller-provided output buffer.
    fn run_into<IB, IA, O>(
        &self,
        b: &IB,
        a: &IA,
        out: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        IB: Read1D<T> + ?Sized,
        IA: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Generate the impulse response and allocate output.
    #[cfg(feature = "alloc")]
    fn run_alloc<IB, IA>(&self, b: &IB, a: &IA) -> Result<Vec<T>, ExecInvariantViolation>
    where
        IB: Read1D<T> + ?Sized,
        IA: Read1D<T> + ?Sized;
}

/// Time-domain IIR design capability (Prony's method).
#[cfg(feature = "alloc")]
pub trait PronyDesign1D<T> {
    /// Fit an impulse response and write `b` and `a` into caller-provided
    /// buffers of length `nb + 1` and `na + 1`.
    fn run_into<I, OB, OA>(
        &self,
        input: &I,
        b_out: &mut OB,
        a_out: &mut OA,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        OB: Write1D<T> + ?Sized,
        OA: Write1D<T> + ?Sized;

    /// Fit an impulse response and allocate the coefficient vectors.
    fn run_alloc<I>(
        &self,
        input: &I,
    ) -> Result<crate::signal::filter::design::BaFormatFilter<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Time-domain IIR design capability in no-alloc mode.
#[cfg(not(feature = "alloc"))]
pub trait PronyDesign1D<T> {}

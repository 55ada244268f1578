/// Digital filtering and time-domain filter design.
pub mod filter;

/// Trait interfaces for signal-processing kernels.
pub mod traits;

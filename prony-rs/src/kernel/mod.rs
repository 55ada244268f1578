//! Shared trait-first kernel substrate.
//!
//! Constructor validation and 1D buffer adapters used by the design and
//! impulse-response kernels.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;

/// Time-domain IIR filter design.
#[cfg(feature = "alloc")]
pub mod design;

mod impz;

pub use impz::*;

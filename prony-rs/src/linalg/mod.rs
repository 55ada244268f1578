mod solve;
mod toeplitz;

pub use solve::*;
pub use toeplitz::*;

use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
///
/// Configuration is checked once in [`KernelLifecycle::try_new`]; a kernel
/// that exists is valid and only run-time data can make it fail.
///
/// ```
/// use prony_rs::kernel::{ConfigError, KernelLifecycle};
/// use prony_rs::signal::filter::{ImpzConfig, ImpzKernel};
///
/// assert!(ImpzKernel::try_new(ImpzConfig { n: 16 }).is_ok());
/// assert_eq!(
///     ImpzKernel::try_new(ImpzConfig { n: 0 }),
///     Err(ConfigError::InvalidArgument {
///         arg: "n",
///         reason: "impulse response length must be greater than zero",
///     })
/// );
/// ```
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

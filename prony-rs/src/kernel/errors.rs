use core::fmt;

use crate::error::Error;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input or configuration field is empty.
    EmptyInput {
        /// Name of the argument that is empty.
        arg: &'static str,
    },
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// A contiguous 1D slice view could not be obtained.
    NonContiguous {
        /// Name of the argument that is non-contiguous.
        arg: &'static str,
    },
    /// Output/input lengths did not match required shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInput { arg } => write!(f, "Input `{arg}` was empty."),
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
            ConfigError::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// Output length mismatched the expected runtime shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// The denominator system assembled from the input is not square.
    DimensionMismatch {
        /// Rows of the system.
        rows: usize,
        /// Columns of the system.
        cols: usize,
    },
    /// The denominator system could not be solved.
    SingularSystem {
        /// Which check rejected the system.
        reason: &'static str,
    },
    /// Adapter binding/configuration failure.
    Config(ConfigError),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<Error> for ExecInvariantViolation {
    fn from(value: Error) -> Self {
        match value {
            Error::DimensionMismatch { rows, cols } => Self::DimensionMismatch { rows, cols },
            Error::SingularSystem { reason } => Self::SingularSystem { reason },
            #[cfg(feature = "alloc")]
            Error::InvalidArg { .. } => Self::InvalidState {
                reason: "kernel received an invalid argument",
            },
            #[cfg(not(feature = "alloc"))]
            Error::InvalidArg => Self::InvalidState {
                reason: "kernel received an invalid argument",
            },
        }
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecInvariantViolation::DimensionMismatch { rows, cols } => {
                write!(f, "Denominator system is {rows}x{cols}, expected square.")
            }
            ExecInvariantViolation::SingularSystem { reason } => {
                write!(f, "Singular denominator system: {reason}")
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExecInvariantViolation {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ExecInvariantViolation};
    use crate::error::Error;

    #[test]
    fn solver_errors_keep_their_kind() {
        let err: ExecInvariantViolation = Error::SingularSystem {
            reason: "zero pivot",
        }
        .into();
        assert_eq!(
            err,
            ExecInvariantViolation::SingularSystem {
                reason: "zero pivot"
            }
        );

        let err: ExecInvariantViolation = Error::DimensionMismatch { rows: 4, cols: 2 }.into();
        assert_eq!(err, ExecInvariantViolation::DimensionMismatch { rows: 4, cols: 2 });
    }

    #[test]
    fn config_errors_are_wrapped() {
        let err: ExecInvariantViolation = ConfigError::EmptyInput { arg: "h" }.into();
        assert_eq!(err.to_string(), "Input `h` was empty.");
    }
}

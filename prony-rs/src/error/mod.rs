use core::{error, fmt};

/// Result alias for the function API.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised whilst running prony-rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument parsed into function were invalid.
    #[cfg(feature = "alloc")]
    InvalidArg {
        /// The invalid arg
        arg: alloc::string::String,
        /// Explaining why arg is invalid.
        reason: alloc::string::String,
    },
    /// Argument parsed into function were invalid.
    #[cfg(not(feature = "alloc"))]
    InvalidArg,
    /// The denominator system is not square for the requested orders.
    DimensionMismatch {
        /// Rows available below the numerator block (`K - nb`).
        rows: usize,
        /// Columns required by the denominator order (`na`).
        cols: usize,
    },
    /// The denominator system is singular, near-singular, or produced
    /// non-finite values.
    SingularSystem {
        /// Which check rejected the system.
        reason: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "alloc")]
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            #[cfg(not(feature = "alloc"))]
            Error::InvalidArg => write!(f, "Invalid argument."),
            Error::DimensionMismatch { rows, cols } => write!(
                f,
                "Dimension mismatch: denominator system is {rows}x{cols}, expected a square system."
            ),
            Error::SingularSystem { reason } => write!(f, "Singular system: {reason}"),
        }
    }
}

impl error::Error for Error {}

/// Build [`Error::InvalidArg`] regardless of the `alloc` feature.
#[cfg_attr(not(feature = "alloc"), allow(unused_variables))]
pub(crate) fn invalid_arg(arg: &str, reason: &str) -> Error {
    #[cfg(feature = "alloc")]
    {
        Error::InvalidArg {
            arg: arg.into(),
            reason: reason.into(),
        }
    }
    #[cfg(not(feature = "alloc"))]
    {
        Error::InvalidArg
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_names_offending_dimensions() {
        let err = Error::DimensionMismatch { rows: 7, cols: 2 };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: denominator system is 7x2, expected a square system."
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn display_invalid_arg() {
        let err = Error::InvalidArg {
            arg: "a".into(),
            reason: "leading coefficient must be non-zero".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid argument `a`: leading coefficient must be non-zero"
        );
    }
}

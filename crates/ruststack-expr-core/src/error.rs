//! Error type for expression construction and compilation.

/// Errors produced while building or compiling expressions.
///
/// Both kinds are terminal for the `build()` call that reports them: no
/// partially compiled expression is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// A structurally malformed operand or tree.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Explanation.
        message: String,
    },
    /// A required parameter was never supplied.
    #[error("unset parameter: {parameter}")]
    UnsetParameter {
        /// The missing parameter.
        parameter: String,
    },
}

impl ExpressionError {
    /// Create an `InvalidParameter` error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an `UnsetParameter` error.
    #[must_use]
    pub fn unset_parameter(parameter: impl Into<String>) -> Self {
        Self::UnsetParameter {
            parameter: parameter.into(),
        }
    }

    /// Returns `true` for `InvalidParameter`.
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Returns `true` for `UnsetParameter`.
    #[must_use]
    pub fn is_unset_parameter(&self) -> bool {
        matches!(self, Self::UnsetParameter { .. })
    }
}

impl serde::ser::Error for ExpressionError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::invalid_parameter(format!("unsupported value: {msg}"))
    }
}

/// Convenience result type for expression operations.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

use crate::decode::{Capability, DecodeError};
use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur when converting a [`Value`](crate::Value)
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No strategy applied, or every applicable strategy declined
    #[error("cannot convert {from} to {to}")]
    Unconvertible {
        /// Declared type of the input
        from: &'static str,
        /// Name of the target type
        to: &'static str,
    },
    /// The target claimed a decode capability and its decoder rejected the input
    #[error("{source}")]
    Decode {
        /// Which capability was invoked
        capability: Capability,
        /// Declared type of the input
        from: &'static str,
        /// Name of the target type
        to: &'static str,
        /// The decoder's own error
        source: DecodeError,
    },
}

impl ConvertError {
    /// True when no strategy could produce the target.
    pub fn is_unconvertible(&self) -> bool {
        matches!(self, ConvertError::Unconvertible { .. })
    }

    /// The declared type of the input that failed to convert.
    pub fn source_type(&self) -> &'static str {
        match self {
            ConvertError::Unconvertible { from, .. } | ConvertError::Decode { from, .. } => from,
        }
    }

    /// The target type the conversion was aiming for.
    pub fn target_type(&self) -> &'static str {
        match self {
            ConvertError::Unconvertible { to, .. } | ConvertError::Decode { to, .. } => to,
        }
    }
}

//! Error type shared by every fallible CIDR operation.

use crate::models::Family;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CidrError>;

/// Errors raised while building or comparing [`Cidr`](crate::Cidr) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
    /// Malformed textual or byte input.
    #[error("invalid address {input:?}: {reason}")]
    AddressParse { input: String, reason: String },

    /// The value handed to the conversion layer has no address meaning.
    #[error("unsupported input type: {0}")]
    UnsupportedInput(String),

    /// Containment or ordering across IPv4 and IPv6.
    #[error("ip version mismatch: {left} vs {right}")]
    FamilyMismatch { left: Family, right: Family },

    #[error("prefix length {prefix_len} exceeds maximum {max}")]
    PrefixLength { prefix_len: u32, max: u8 },

    #[error("address {address} does not fit in {family}")]
    AddressOutOfRange { address: u128, family: Family },
}

impl CidrError {
    pub(crate) fn parse(input: &str, reason: impl ToString) -> Self {
        CidrError::AddressParse {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CidrError::parse("10.0.0.300", "invalid IPv4 address syntax");
        assert_eq!(
            err.to_string(),
            "invalid address \"10.0.0.300\": invalid IPv4 address syntax"
        );
        let err = CidrError::FamilyMismatch {
            left: Family::V4,
            right: Family::V6,
        };
        assert_eq!(err.to_string(), "ip version mismatch: IPv4 vs IPv6");
        let err = CidrError::PrefixLength {
            prefix_len: 33,
            max: 32,
        };
        assert_eq!(err.to_string(), "prefix length 33 exceeds maximum 32");
    }
}

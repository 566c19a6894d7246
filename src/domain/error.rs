//! Domain invariant violations.

use thiserror::Error;

/// An invariant of the domain model does not hold.
///
/// The two contract term variants are sentinels: higher layers find them in an
/// error chain with [`crate::error::find_cause`] and show their message to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A monthly contract was given a term of 0.
    #[error("contract.term cannot be 0 when contract type is MONTHLY")]
    ContractTermCannotBeZero,

    /// An hourly contract was given a non-zero term.
    #[error("contract.term must be 0 when contract type is HOURLY")]
    ContractTermMustBeZero,

    /// A token outside an enumeration's declared set.
    #[error("invalid {kind} {value:?}, valid values are: {allowed}")]
    InvalidEnumValue {
        /// The enumeration name.
        kind: &'static str,
        /// The offending token.
        value: String,
        /// The allowed tokens, comma separated.
        allowed: String,
    },

    /// Root disk size outside `[min, max]`.
    #[error("root disk size {size} is out of range, must be between {min} and {max}")]
    RootDiskSizeOutOfRange {
        /// The requested size.
        size: i64,
        /// The smallest allowed size.
        min: i64,
        /// The largest allowed size.
        max: i64,
    },

    /// The SSH key does not match the accepted public key format.
    #[error("ssh key is invalid, it must be a public key in OpenSSH format")]
    InvalidSshKey,

    /// The id is not a canonical UUID.
    #[error("{0:?} is not a valid UUID")]
    InvalidUuid(String),

    /// The reference label is too long.
    #[error("reference is {length} characters long, the maximum is {max}")]
    ReferenceTooLong {
        /// The given length.
        length: usize,
        /// The maximum length.
        max: usize,
    },

    /// A scheduled auto scaling group ends before it starts.
    #[error("startsAt {starts_at} must not be after endsAt {ends_at}")]
    InvalidSchedule {
        /// Schedule start.
        starts_at: String,
        /// Schedule end.
        ends_at: String,
    },

    /// A CPU based auto scaling group has a minimum above its maximum.
    #[error("minimumAmount {minimum} must not be greater than maximumAmount {maximum}")]
    InvalidAmounts {
        /// The minimum amount.
        minimum: i64,
        /// The maximum amount.
        maximum: i64,
    },

    /// A timestamp that is not RFC 3339.
    #[error("{0:?} is not a valid RFC 3339 timestamp")]
    InvalidTimestamp(String),
}

impl DomainError {
    /// Whether this is one of the two contract term sentinels.
    pub fn is_contract_term_error(&self) -> bool {
        matches!(
            self,
            Self::ContractTermCannotBeZero | Self::ContractTermMustBeZero
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_messages() {
        assert_eq!(
            DomainError::ContractTermCannotBeZero.to_string(),
            "contract.term cannot be 0 when contract type is MONTHLY"
        );
        assert_eq!(
            DomainError::ContractTermMustBeZero.to_string(),
            "contract.term must be 0 when contract type is HOURLY"
        );
        assert!(DomainError::ContractTermMustBeZero.is_contract_term_error());
        assert!(!DomainError::InvalidSshKey.is_contract_term_error());
    }

    #[test]
    fn test_enum_error_names_value() {
        let err = DomainError::InvalidEnumValue {
            kind: "contract type",
            value: "WEEKLY".to_string(),
            allowed: "HOURLY, MONTHLY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid contract type \"WEEKLY\", valid values are: HOURLY, MONTHLY"
        );
    }
}

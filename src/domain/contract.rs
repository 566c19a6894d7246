use chrono::{DateTime, Utc};

use super::{ContractBillingFrequency, ContractState, ContractTerm, ContractType, DomainError};

/// Check that a contract term fits its contract type.
///
/// Monthly contracts need a non-zero term; hourly contracts must have a term
/// of 0.
pub fn validate_contract_term(
    term: ContractTerm,
    contract_type: ContractType,
) -> Result<(), DomainError> {
    match (contract_type, term) {
        (ContractType::Monthly, ContractTerm::Zero) => Err(DomainError::ContractTermCannotBeZero),
        (ContractType::Hourly, ContractTerm::Zero) => Ok(()),
        (ContractType::Hourly, _) => Err(DomainError::ContractTermMustBeZero),
        (ContractType::Monthly, _) => Ok(()),
    }
}

/// The commercial agreement an instance or load balancer runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    billing_frequency: ContractBillingFrequency,
    term: ContractTerm,
    contract_type: ContractType,
    ends_at: Option<DateTime<Utc>>,
    renewals_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    state: ContractState,
}

impl Contract {
    /// Build a contract, enforcing the term/type rule.
    pub fn new(
        billing_frequency: ContractBillingFrequency,
        term: ContractTerm,
        contract_type: ContractType,
        renewals_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        state: ContractState,
        ends_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        validate_contract_term(term, contract_type)?;

        Ok(Self {
            billing_frequency,
            term,
            contract_type,
            ends_at,
            renewals_at,
            created_at,
            state,
        })
    }

    /// Months between invoices.
    pub fn billing_frequency(&self) -> ContractBillingFrequency {
        self.billing_frequency
    }

    /// Commitment in months.
    pub fn term(&self) -> ContractTerm {
        self.term
    }

    /// Hourly or monthly billing.
    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    /// When the contract ends, if termination was requested.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.ends_at
    }

    /// Next renewal.
    pub fn renewals_at(&self) -> DateTime<Utc> {
        self.renewals_at
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Contract state.
    pub fn state(&self) -> ContractState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn build(contract_type: ContractType, term: ContractTerm) -> Result<Contract, DomainError> {
        let at = Utc.with_ymd_and_hms(2023, 12, 14, 17, 9, 47).unwrap();
        Contract::new(
            ContractBillingFrequency::One,
            term,
            contract_type,
            at,
            at,
            ContractState::Active,
            None,
        )
    }

    #[test]
    fn test_term_type_compatibility_over_all_pairs() {
        for contract_type in ContractType::ALL {
            for term in ContractTerm::ALL {
                let expected_ok = match contract_type {
                    ContractType::Hourly => *term == ContractTerm::Zero,
                    ContractType::Monthly => *term != ContractTerm::Zero,
                };
                assert_eq!(
                    build(*contract_type, *term).is_ok(),
                    expected_ok,
                    "type {} term {}",
                    contract_type,
                    term
                );
            }
        }
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(
            build(ContractType::Monthly, ContractTerm::Zero),
            Err(DomainError::ContractTermCannotBeZero)
        );
        assert_eq!(
            build(ContractType::Hourly, ContractTerm::Three),
            Err(DomainError::ContractTermMustBeZero)
        );
    }

    #[test]
    fn test_accessors() {
        let contract = build(ContractType::Monthly, ContractTerm::Three).unwrap();
        assert_eq!(contract.term(), ContractTerm::Three);
        assert_eq!(contract.contract_type(), ContractType::Monthly);
        assert_eq!(contract.billing_frequency(), ContractBillingFrequency::One);
        assert_eq!(contract.state(), ContractState::Active);
        assert!(contract.ends_at().is_none());
    }
}

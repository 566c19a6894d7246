//! Plan-time validators.
//!
//! A validator receives the attribute path and the configured value and adds
//! attribute-scoped diagnostics to the response. Validators never fetch
//! anything themselves: the ones that depend on the remote catalog are built
//! by [`crate::facade::PublicCloudFacade`] with a snapshot of it.
//!
//! # Example
//!
//! ```
//! use leaseweb_provider::domain::{Region, Regions};
//! use leaseweb_provider::schema::AttributePath;
//! use leaseweb_provider::types::StringValue;
//! use leaseweb_provider::validation::{validate, RegionValidator};
//!
//! let validator = RegionValidator::new(Regions::new(vec![Region::new("eu-west-3", "Frankfurt")]));
//!
//! let diagnostics = validate(&validator, AttributePath::root("region"), &StringValue::known("eu-west-3"));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate(&validator, AttributePath::root("region"), &StringValue::known("mars-1"));
//! assert_eq!(diagnostics.len(), 1);
//! ```

use regex::Regex;

use crate::domain::{
    validate_contract_term, ContractTerm, ContractType, DomainError, InstanceTypes, Regions,
    RootDiskSize,
};
use crate::model::resource::ContractResourceModel;
use crate::schema::{AttributePath, Diagnostics};
use crate::types::{Int64Value, ObjectValue, StringValue};

/// What a validator is asked to check.
#[derive(Debug, Clone)]
pub struct ValidatorRequest<'a, V> {
    /// Where the value lives in the configuration.
    pub path: AttributePath,
    /// The configured value.
    pub config_value: &'a V,
}

/// What a validator reports.
#[derive(Debug, Clone, Default)]
pub struct ValidatorResponse {
    /// Problems found.
    pub diagnostics: Diagnostics,
}

/// A plan-time check of one attribute.
pub trait Validator<V>: Send + Sync {
    /// Human readable description of the rule.
    fn description(&self) -> String;

    /// Check the value, adding diagnostics to `response`.
    fn validate(&self, request: ValidatorRequest<'_, V>, response: &mut ValidatorResponse);
}

/// Run one validator and return what it reported.
pub fn validate<V, T>(validator: &T, path: AttributePath, value: &V) -> Diagnostics
where
    T: Validator<V> + ?Sized,
{
    let mut response = ValidatorResponse::default();
    validator.validate(
        ValidatorRequest {
            path,
            config_value: value,
        },
        &mut response,
    );
    response.diagnostics
}

/// Instance types an instance may be changed to: its current type first, then
/// every available type not equal to it, in catalog order.
pub fn candidates_for_update(current: Option<&str>, available: &InstanceTypes) -> Vec<String> {
    let mut candidates: Vec<String> = current.map(str::to_string).into_iter().collect();
    for name in available.to_array() {
        if !candidates.contains(&name) {
            candidates.push(name);
        }
    }
    candidates
}

/// The configured region must exist.
#[derive(Debug, Clone)]
pub struct RegionValidator {
    regions: Regions,
}

impl RegionValidator {
    /// Validate against a region snapshot.
    pub fn new(regions: Regions) -> Self {
        Self { regions }
    }
}

impl Validator<StringValue> for RegionValidator {
    fn description(&self) -> String {
        format!("region must be one of: {}", self.regions.to_array().join(", "))
    }

    fn validate(&self, request: ValidatorRequest<'_, StringValue>, response: &mut ValidatorResponse) {
        let Some(value) = request.config_value.as_known() else {
            return;
        };
        if self.regions.contains(value) {
            return;
        }

        let detail = format!(
            "Attribute {} value must be one of: [{}], got: {:?}",
            request.path,
            self.regions.to_array().join(", "),
            value
        );
        response
            .diagnostics
            .add_attribute_error(request.path, "Invalid Region", detail);
    }
}

/// The configured instance type must be available, or be the current one.
#[derive(Debug, Clone)]
pub struct InstanceTypeValidator {
    allowed: Vec<String>,
}

impl InstanceTypeValidator {
    /// Validate against the types available for a launch.
    pub fn for_create(available: &InstanceTypes) -> Self {
        Self {
            allowed: candidates_for_update(None, available),
        }
    }

    /// Validate against the types an instance can be changed to; keeping the
    /// current type is always allowed.
    pub fn for_update(current: &str, available: &InstanceTypes) -> Self {
        Self {
            allowed: candidates_for_update(Some(current), available),
        }
    }

    /// Every accepted type.
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Validator<StringValue> for InstanceTypeValidator {
    fn description(&self) -> String {
        format!("instance type must be one of: {}", self.allowed.join(", "))
    }

    fn validate(&self, request: ValidatorRequest<'_, StringValue>, response: &mut ValidatorResponse) {
        let Some(value) = request.config_value.as_known() else {
            return;
        };
        if self.allowed.contains(value) {
            return;
        }

        let detail = format!(
            "Attribute {} value must be one of: [{}], got: {:?}",
            request.path,
            self.allowed.join(", "),
            value
        );
        response
            .diagnostics
            .add_attribute_error(request.path, "Invalid Instance Type", detail);
    }
}

/// A contract's term must fit its type: 0 for hourly, non-zero for monthly.
///
/// Validates the whole `contract` object, reporting on `contract.term`.
#[derive(Debug, Clone, Default)]
pub struct ContractTermValidator;

impl ContractTermValidator {
    fn check(contract: &ContractResourceModel) -> Result<(), DomainError> {
        let (Some(term), Some(contract_type)) =
            (contract.term.as_known(), contract.contract_type.as_known())
        else {
            return Ok(());
        };
        let term = ContractTerm::from_int(*term)?;
        let contract_type = ContractType::from_token(contract_type)?;
        validate_contract_term(term, contract_type)
    }
}

impl Validator<ObjectValue> for ContractTermValidator {
    fn description(&self) -> String {
        "contract.term must be 0 for HOURLY contracts and non-zero for MONTHLY contracts".into()
    }

    fn validate(&self, request: ValidatorRequest<'_, ObjectValue>, response: &mut ValidatorResponse) {
        let contract = match request.config_value.to_model::<ContractResourceModel>() {
            Ok(contract) => match contract.into_known() {
                Some(contract) => contract,
                None => return,
            },
            Err(diagnostics) => {
                response.diagnostics.extend(diagnostics);
                return;
            },
        };

        let Err(err) = Self::check(&contract) else {
            return;
        };
        // Unknown tokens are reported by the attribute's own validators.
        if err.is_contract_term_error() {
            response.diagnostics.add_attribute_error(
                request.path.attribute("term"),
                "Invalid Contract Term",
                err.to_string(),
            );
        }
    }
}

/// An instance may only be destroyed when the API allows it.
#[derive(Debug, Clone)]
pub struct InstanceTerminationValidator {
    can_be_terminated: bool,
    reason: Option<String>,
}

impl InstanceTerminationValidator {
    /// Validate with the verdict of
    /// [`crate::service::PublicCloudService::can_instance_be_terminated`].
    pub fn new(can_be_terminated: bool, reason: Option<String>) -> Self {
        Self {
            can_be_terminated,
            reason,
        }
    }
}

impl Validator<ObjectValue> for InstanceTerminationValidator {
    fn description(&self) -> String {
        "instance must be in a state that allows termination".into()
    }

    fn validate(&self, request: ValidatorRequest<'_, ObjectValue>, response: &mut ValidatorResponse) {
        if !request.config_value.is_known() || self.can_be_terminated {
            return;
        }

        let reason = self.reason.as_deref().unwrap_or("unknown reason");
        response.diagnostics.add_attribute_error(
            request.path,
            "Instance cannot be terminated",
            format!("This instance cannot be terminated because {reason}"),
        );
    }
}

/// Root disk size must lie within the allowed range.
#[derive(Debug, Clone)]
pub struct RootDiskSizeValidator {
    min: i64,
    max: i64,
}

impl Default for RootDiskSizeValidator {
    fn default() -> Self {
        Self::new(RootDiskSize::MIN, RootDiskSize::MAX)
    }
}

impl RootDiskSizeValidator {
    /// Accept `[min, max]`.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl Validator<Int64Value> for RootDiskSizeValidator {
    fn description(&self) -> String {
        format!("value must be between {} and {}", self.min, self.max)
    }

    fn validate(&self, request: ValidatorRequest<'_, Int64Value>, response: &mut ValidatorResponse) {
        let Some(&size) = request.config_value.as_known() else {
            return;
        };
        if (self.min..=self.max).contains(&size) {
            return;
        }
        response.diagnostics.add_attribute_error(
            request.path.clone(),
            "Invalid Attribute Value",
            format!(
                "Attribute {} value must be between {} and {}, got: {}",
                request.path, self.min, self.max, size
            ),
        );
    }
}

/// SSH keys must be OpenSSH public keys.
#[derive(Debug, Clone)]
pub struct SshKeyValidator {
    pattern: Regex,
}

impl SshKeyValidator {
    /// Match values against `pattern`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Validator<StringValue> for SshKeyValidator {
    fn description(&self) -> String {
        "value must be an OpenSSH public key".into()
    }

    fn validate(&self, request: ValidatorRequest<'_, StringValue>, response: &mut ValidatorResponse) {
        let Some(value) = request.config_value.as_known() else {
            return;
        };
        if self.pattern.is_match(value) {
            return;
        }
        response.diagnostics.add_attribute_error(
            request.path.clone(),
            "Invalid Attribute Value Match",
            format!(
                "Attribute {} Invalid ssh key, got: {:?}",
                request.path, value
            ),
        );
    }
}

/// A string must be one of a fixed set of tokens.
#[derive(Debug, Clone)]
pub struct OneOfStringValidator {
    allowed: Vec<String>,
}

impl OneOfStringValidator {
    /// Accept any of `allowed`.
    pub fn new<S: Into<String>>(allowed: impl IntoIterator<Item = S>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator<StringValue> for OneOfStringValidator {
    fn description(&self) -> String {
        format!("value must be one of: {:?}", self.allowed)
    }

    fn validate(&self, request: ValidatorRequest<'_, StringValue>, response: &mut ValidatorResponse) {
        let Some(value) = request.config_value.as_known() else {
            return;
        };
        if self.allowed.contains(value) {
            return;
        }
        response.diagnostics.add_attribute_error(
            request.path.clone(),
            "Invalid Attribute Value Match",
            format!(
                "Attribute {} value must be one of: {:?}, got: {:?}",
                request.path, self.allowed, value
            ),
        );
    }
}

/// An integer must be one of a fixed set of values.
#[derive(Debug, Clone)]
pub struct OneOfInt64Validator {
    allowed: Vec<i64>,
}

impl OneOfInt64Validator {
    /// Accept any of `allowed`.
    pub fn new(allowed: Vec<i64>) -> Self {
        Self { allowed }
    }
}

impl Validator<Int64Value> for OneOfInt64Validator {
    fn description(&self) -> String {
        format!("value must be one of: {:?}", self.allowed)
    }

    fn validate(&self, request: ValidatorRequest<'_, Int64Value>, response: &mut ValidatorResponse) {
        let Some(value) = request.config_value.as_known() else {
            return;
        };
        if self.allowed.contains(value) {
            return;
        }
        response.diagnostics.add_attribute_error(
            request.path.clone(),
            "Invalid Attribute Value Match",
            format!(
                "Attribute {} value must be one of: {:?}, got: {}",
                request.path, self.allowed, value
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstanceType, Region, SSH_KEY_REGULAR_EXPRESSION};
    use crate::testing::fixtures;
    use crate::types::{ObjectModel, AttrValue};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn instance_types(names: &[&str]) -> InstanceTypes {
        names.iter().map(|n| InstanceType::new(*n)).collect()
    }

    fn regions(names: &[&str]) -> Regions {
        names.iter().map(|n| Region::new(*n, "somewhere")).collect()
    }

    fn contract(contract_type: &str, term: i64) -> ObjectValue {
        ObjectValue::from_model(ContractResourceModel {
            billing_frequency: Int64Value::known(1),
            term: Int64Value::known(term),
            contract_type: StringValue::known(contract_type),
            ends_at: StringValue::Unknown,
            renewals_at: StringValue::Unknown,
            created_at: StringValue::Unknown,
            state: StringValue::Unknown,
        })
        .unwrap()
    }

    #[test]
    fn test_region_validator() {
        let validator = RegionValidator::new(regions(&["eu-west-3", "us-east-1"]));
        let path = AttributePath::root("region");

        assert!(validate(&validator, path.clone(), &StringValue::known("us-east-1")).is_empty());
        assert!(validate(&validator, path.clone(), &StringValue::Null).is_empty());
        assert!(validate(&validator, path.clone(), &StringValue::Unknown).is_empty());

        let diagnostics = validate(&validator, path, &StringValue::known("mars-1"));
        let diagnostic = diagnostics.first_error().unwrap();
        assert_eq!(diagnostic.summary, "Invalid Region");
        assert_eq!(
            diagnostic.detail.as_deref(),
            Some("Attribute region value must be one of: [eu-west-3, us-east-1], got: \"mars-1\"")
        );
        assert_eq!(diagnostic.attribute, Some(AttributePath::root("region")));
    }

    #[test]
    fn test_update_type_outside_candidates_is_rejected() {
        let validator =
            InstanceTypeValidator::for_update("lsw.m5a.large", &instance_types(&["lsw.m5a.xlarge"]));

        let diagnostics = validate(
            &validator,
            AttributePath::root("type"),
            &StringValue::known("lsw.m5a.huge"),
        );
        let detail = diagnostics.first_error().unwrap().detail.clone().unwrap();
        assert!(detail.contains("lsw.m5a.huge"));
        assert!(detail.contains("[lsw.m5a.large, lsw.m5a.xlarge]"));
    }

    #[test]
    fn test_current_type_is_always_accepted() {
        let validator = InstanceTypeValidator::for_update("lsw.m5a.large", &InstanceTypes::default());
        assert!(validate(
            &validator,
            AttributePath::root("type"),
            &StringValue::known("lsw.m5a.large")
        )
        .is_empty());
    }

    #[test]
    fn test_candidates_for_update_are_a_set_with_current_first() {
        let available = instance_types(&["lsw.m5a.xlarge", "lsw.m5a.large", "lsw.m5a.2xlarge"]);
        assert_eq!(
            candidates_for_update(Some("lsw.m5a.large"), &available),
            vec!["lsw.m5a.large", "lsw.m5a.xlarge", "lsw.m5a.2xlarge"]
        );
        assert_eq!(
            candidates_for_update(None, &available),
            vec!["lsw.m5a.xlarge", "lsw.m5a.large", "lsw.m5a.2xlarge"]
        );
    }

    #[test_case("HOURLY", 0, None ; "hourly without term")]
    #[test_case("MONTHLY", 3, None ; "monthly with term")]
    #[test_case("HOURLY", 3, Some("contract.term must be 0 when contract type is HOURLY") ; "hourly with term")]
    #[test_case("MONTHLY", 0, Some("contract.term cannot be 0 when contract type is MONTHLY") ; "monthly without term")]
    fn test_contract_term_validator(contract_type: &str, term: i64, expected: Option<&str>) {
        let diagnostics = validate(
            &ContractTermValidator,
            AttributePath::root("contract"),
            &contract(contract_type, term),
        );
        let first = diagnostics.first_error();
        assert_eq!(first.and_then(|d| d.detail.as_deref()), expected);
        if let Some(first) = first {
            assert_eq!(
                first.attribute,
                Some(AttributePath::root("contract").attribute("term"))
            );
        }
    }

    #[test]
    fn test_contract_term_validator_skips_unknowns() {
        let mut model = ContractResourceModel::from_attributes(
            contract("HOURLY", 3).attributes().unwrap(),
        )
        .unwrap();
        model.term = AttrValue::Unknown;
        let value = ObjectValue::from_model(model).unwrap();

        assert!(validate(&ContractTermValidator, AttributePath::root("contract"), &value).is_empty());
        let unknown = ObjectValue::unknown(ContractResourceModel::attribute_types());
        assert!(validate(&ContractTermValidator, AttributePath::root("contract"), &unknown).is_empty());
    }

    #[test]
    fn test_contract_term_validator_leaves_bad_tokens_to_attribute_validators() {
        let diagnostics = validate(
            &ContractTermValidator,
            AttributePath::root("contract"),
            &contract("WEEKLY", 3),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_termination_validator() {
        let state = ObjectValue::from_model(
            crate::model::resource::adapt_instance(&fixtures::instance()).unwrap(),
        )
        .unwrap();

        let blocked =
            InstanceTerminationValidator::new(false, Some("state is \"DESTROYING\"".to_string()));
        let diagnostics = validate(&blocked, AttributePath::empty(), &state);
        assert!(diagnostics
            .first_error()
            .and_then(|d| d.detail.as_deref())
            .unwrap()
            .contains("DESTROYING"));

        let allowed = InstanceTerminationValidator::new(true, None);
        assert!(validate(&allowed, AttributePath::empty(), &state).is_empty());
    }

    #[test_case(RootDiskSize::MIN, true ; "minimum")]
    #[test_case(RootDiskSize::MAX, true ; "maximum")]
    #[test_case(RootDiskSize::MIN - 1, false ; "below minimum")]
    #[test_case(RootDiskSize::MAX + 1, false ; "above maximum")]
    fn test_root_disk_size_validator(size: i64, accepted: bool) {
        let diagnostics = validate(
            &RootDiskSizeValidator::default(),
            AttributePath::root("root_disk_size"),
            &Int64Value::known(size),
        );
        assert_eq!(diagnostics.is_empty(), accepted);
    }

    #[test]
    fn test_ssh_key_validator() {
        let validator = SshKeyValidator::new(SSH_KEY_REGULAR_EXPRESSION).unwrap();
        let path = AttributePath::root("ssh_key");

        assert!(validate(&validator, path.clone(), &StringValue::known(fixtures::SSH_KEY)).is_empty());
        assert_eq!(
            validate(&validator, path, &StringValue::known("tralala")).len(),
            1
        );
    }

    #[test]
    fn test_one_of_validators() {
        let strings = OneOfStringValidator::new(ContractType::values());
        assert!(validate(&strings, AttributePath::root("type"), &StringValue::known("HOURLY")).is_empty());
        assert_eq!(
            validate(&strings, AttributePath::root("type"), &StringValue::known("WEEKLY")).len(),
            1
        );

        let ints = OneOfInt64Validator::new(ContractTerm::values());
        assert!(validate(&ints, AttributePath::root("term"), &Int64Value::known(12)).is_empty());
        assert_eq!(
            validate(&ints, AttributePath::root("term"), &Int64Value::known(2)).len(),
            1
        );
    }

    proptest! {
        #[test]
        fn prop_instance_type_validator_accepts_only_candidates(
            current in "[a-c]",
            available in proptest::collection::vec("[a-e]", 0..5),
            value in "[a-f]",
        ) {
            let names: Vec<&str> = available.iter().map(String::as_str).collect();
            let validator = InstanceTypeValidator::for_update(&current, &instance_types(&names));
            let accepted = validate(&validator, AttributePath::root("type"), &StringValue::known(value.clone()))
                .is_empty();
            prop_assert_eq!(accepted, value == current || available.contains(&value));
        }

        #[test]
        fn prop_region_validator_accepts_members_and_unset(
            known in proptest::collection::vec("[a-e]", 0..5),
            value in proptest::option::of("[a-f]"),
        ) {
            let names: Vec<&str> = known.iter().map(String::as_str).collect();
            let validator = RegionValidator::new(regions(&names));
            let config = match &value {
                Some(v) => StringValue::known(v.clone()),
                None => StringValue::Unknown,
            };
            let accepted = validate(&validator, AttributePath::root("region"), &config).is_empty();
            let expected = value.map_or(true, |v| known.contains(&v));
            prop_assert_eq!(accepted, expected);
        }
    }
}

use chrono::{DateTime, Utc};

use super::{
    validate_contract_term, AutoScalingGroup, Contract, ContractBillingFrequency, ContractTerm,
    ContractType, DomainError, Image, InstanceState, InstanceType, Ip, Reference, RootDiskSize,
    RootDiskStorageType, SshKey, Uuid,
};

/// A private network an instance or load balancer is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateNetwork {
    /// Private network id.
    pub id: String,
    /// Attachment status.
    pub status: String,
    /// Subnet in CIDR notation.
    pub subnet: String,
}

/// An ISO image mounted on an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iso {
    /// ISO id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Fields of an [`Instance`] the API may leave out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionalInstanceValues {
    /// Label.
    pub reference: Option<Reference>,
    /// Market app installed at launch.
    pub market_app_id: Option<String>,
    /// SSH key the instance was launched with. Never returned by the API.
    pub ssh_key: Option<SshKey>,
    /// When the instance was started.
    pub started_at: Option<DateTime<Utc>>,
    /// Group the instance belongs to.
    pub auto_scaling_group: Option<AutoScalingGroup>,
    /// Attached private network.
    pub private_network: Option<PrivateNetwork>,
    /// Mounted ISO.
    pub iso: Option<Iso>,
}

/// A public cloud instance as reported by the API.
///
/// Every field is a validated domain type, so an `Instance` always satisfies
/// the contract, root disk, SSH key, UUID and enumeration invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Instance id.
    pub id: Uuid,
    /// Region.
    pub region: String,
    /// Instance type.
    pub instance_type: InstanceType,
    /// Lifecycle state.
    pub state: InstanceState,
    /// Product type, e.g. `INSTANCE`.
    pub product_type: String,
    /// Whether a public IPv4 address is attached.
    pub has_public_ipv4: bool,
    /// Whether the instance includes a private network.
    pub has_private_network: bool,
    /// Root disk size.
    pub root_disk_size: RootDiskSize,
    /// Root disk storage type.
    pub root_disk_storage_type: RootDiskStorageType,
    /// Addresses, in wire order.
    pub ips: Vec<Ip>,
    /// Contract.
    pub contract: Contract,
    /// Image.
    pub image: Image,
    /// Label.
    pub reference: Option<Reference>,
    /// Market app installed at launch.
    pub market_app_id: Option<String>,
    /// SSH key the instance was launched with.
    pub ssh_key: Option<SshKey>,
    /// Start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Group the instance belongs to.
    pub auto_scaling_group: Option<AutoScalingGroup>,
    /// Attached private network.
    pub private_network: Option<PrivateNetwork>,
    /// Mounted ISO.
    pub iso: Option<Iso>,
}

impl Instance {
    /// Assemble an instance from an API response.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        region: impl Into<String>,
        instance_type: InstanceType,
        state: InstanceState,
        product_type: impl Into<String>,
        has_public_ipv4: bool,
        has_private_network: bool,
        root_disk_size: RootDiskSize,
        root_disk_storage_type: RootDiskStorageType,
        ips: Vec<Ip>,
        contract: Contract,
        image: Image,
        optional: OptionalInstanceValues,
    ) -> Self {
        Self {
            id,
            region: region.into(),
            instance_type,
            state,
            product_type: product_type.into(),
            has_public_ipv4,
            has_private_network,
            root_disk_size,
            root_disk_storage_type,
            ips,
            contract,
            image,
            reference: optional.reference,
            market_app_id: optional.market_app_id,
            ssh_key: optional.ssh_key,
            started_at: optional.started_at,
            auto_scaling_group: optional.auto_scaling_group,
            private_network: optional.private_network,
            iso: optional.iso,
        }
    }

    /// The reason this instance cannot be terminated right now, if any.
    pub fn termination_blocker(&self) -> Option<String> {
        if self.state.blocks_termination() {
            return Some(format!("state is {:?}", self.state.as_str()));
        }
        if let Some(ends_at) = self.contract.ends_at() {
            return Some(format!(
                "contract.endsAt is {:?}",
                super::format_timestamp(&ends_at)
            ));
        }
        None
    }
}

/// Optional settings of a launch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionalCreateInstanceValues {
    /// Market app to install.
    pub market_app_id: Option<String>,
    /// Label.
    pub reference: Option<Reference>,
    /// SSH key to install.
    pub ssh_key: Option<SshKey>,
    /// Root disk size; the API default applies when absent.
    pub root_disk_size: Option<RootDiskSize>,
}

/// Everything needed to launch an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInstance {
    region: String,
    instance_type: String,
    root_disk_storage_type: RootDiskStorageType,
    image_id: String,
    contract_type: ContractType,
    contract_term: ContractTerm,
    billing_frequency: ContractBillingFrequency,
    optional: OptionalCreateInstanceValues,
}

impl CreateInstance {
    /// Build a launch request, enforcing the contract term/type rule.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        region: impl Into<String>,
        instance_type: impl Into<String>,
        root_disk_storage_type: RootDiskStorageType,
        image_id: impl Into<String>,
        contract_type: ContractType,
        contract_term: ContractTerm,
        billing_frequency: ContractBillingFrequency,
        optional: OptionalCreateInstanceValues,
    ) -> Result<Self, DomainError> {
        validate_contract_term(contract_term, contract_type)?;

        Ok(Self {
            region: region.into(),
            instance_type: instance_type.into(),
            root_disk_storage_type,
            image_id: image_id.into(),
            contract_type,
            contract_term,
            billing_frequency,
            optional,
        })
    }

    /// Region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Instance type name.
    pub fn instance_type(&self) -> &str {
        &self.instance_type
    }

    /// Root disk storage type.
    pub fn root_disk_storage_type(&self) -> RootDiskStorageType {
        self.root_disk_storage_type
    }

    /// Image id.
    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    /// Contract type.
    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    /// Contract term.
    pub fn contract_term(&self) -> ContractTerm {
        self.contract_term
    }

    /// Billing frequency.
    pub fn billing_frequency(&self) -> ContractBillingFrequency {
        self.billing_frequency
    }

    /// Optional settings.
    pub fn optional(&self) -> &OptionalCreateInstanceValues {
        &self.optional
    }
}

/// Fields of an update. `None` means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionalUpdateInstanceValues {
    /// New label.
    pub reference: Option<Reference>,
    /// New root disk size.
    pub root_disk_size: Option<RootDiskSize>,
    /// New contract type.
    pub contract_type: Option<ContractType>,
    /// New contract term.
    pub contract_term: Option<ContractTerm>,
    /// New billing frequency.
    pub billing_frequency: Option<ContractBillingFrequency>,
    /// New instance type.
    pub instance_type: Option<String>,
}

/// A partial update of an existing instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInstance {
    id: Uuid,
    values: OptionalUpdateInstanceValues,
}

impl UpdateInstance {
    /// Build an update. When both contract type and term change, the pair
    /// must satisfy the contract term/type rule.
    pub fn new(id: Uuid, values: OptionalUpdateInstanceValues) -> Result<Self, DomainError> {
        if let (Some(term), Some(contract_type)) = (values.contract_term, values.contract_type) {
            validate_contract_term(term, contract_type)?;
        }
        Ok(Self { id, values })
    }

    /// Id of the instance to update.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The changed fields.
    pub fn values(&self) -> &OptionalUpdateInstanceValues {
        &self.values
    }
}

/// Instances in wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Instances(Vec<Instance>);

impl Instances {
    /// Wrap a list of instances.
    pub fn new(instances: Vec<Instance>) -> Self {
        Self(instances)
    }

    /// Whether an instance with this id exists.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.0.iter().any(|i| &i.id == id)
    }

    /// Iterate over the instances.
    pub fn iter(&self) -> std::slice::Iter<'_, Instance> {
        self.0.iter()
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no instances.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The instances as a vector.
    pub fn into_vec(self) -> Vec<Instance> {
        self.0
    }
}

impl FromIterator<Instance> for Instances {
    fn from_iter<I: IntoIterator<Item = Instance>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Instances {
    type Item = &'a Instance;
    type IntoIter = std::slice::Iter<'a, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_create_instance_enforces_contract_rule() {
        let err = CreateInstance::new(
            "eu-west-3",
            "lsw.m5a.4xlarge",
            RootDiskStorageType::Central,
            "UBUNTU_20_04_64BIT",
            ContractType::Hourly,
            ContractTerm::Three,
            ContractBillingFrequency::One,
            OptionalCreateInstanceValues::default(),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::ContractTermMustBeZero);
    }

    #[test]
    fn test_update_instance_checks_pair_only_when_both_present() {
        let id = Uuid::new_v4();
        let term_only = UpdateInstance::new(
            id,
            OptionalUpdateInstanceValues {
                contract_term: Some(ContractTerm::Zero),
                ..Default::default()
            },
        );
        assert!(term_only.is_ok());

        let err = UpdateInstance::new(
            id,
            OptionalUpdateInstanceValues {
                contract_term: Some(ContractTerm::Zero),
                contract_type: Some(ContractType::Monthly),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err, DomainError::ContractTermCannotBeZero);
    }

    #[test]
    fn test_termination_blocker() {
        let mut instance = fixtures::instance();
        assert_eq!(instance.termination_blocker(), None);

        instance.state = InstanceState::Destroying;
        assert_eq!(
            instance.termination_blocker(),
            Some("state is \"DESTROYING\"".to_string())
        );
    }

    #[test]
    fn test_termination_blocked_by_contract_end() {
        let instance = fixtures::instance_with_contract_end();
        let reason = instance.termination_blocker().unwrap();
        assert!(reason.starts_with("contract.endsAt is"));
    }

    #[test]
    fn test_instances_contains() {
        let instance = fixtures::instance();
        let instances = Instances::new(vec![instance.clone()]);
        assert!(instances.contains(&instance.id));
        assert!(!instances.contains(&Uuid::new_v4()));
    }
}

//! Read/write models of the `leaseweb_public_cloud_instance` resource.
//!
//! Nested entities are object values and lists are list values, so computed
//! attributes can be unknown during planning and optional ones null.

use crate::domain::{
    format_timestamp, parse_timestamp, AutoScalingGroup, AutoScalingGroupState,
    AutoScalingGroupType, Balance, Contract, ContractBillingFrequency, ContractState,
    ContractTerm, ContractType, CreateInstance, Ddos, DomainError, HealthCheck, HttpMethod, Image,
    ImageState, Instance, InstanceState, InstanceType, Ip, IpVersion, Iso, LoadBalancer,
    LoadBalancerConfiguration, NetworkType, OptionalAutoScalingGroupValues,
    OptionalCreateInstanceValues, OptionalInstanceValues, OptionalUpdateInstanceValues,
    PrivateNetwork, Reference, RootDiskSize, RootDiskStorageType, SshKey, StickySession,
    StorageSize, UpdateInstance, Uuid,
};
use crate::schema::AttributeType;
use crate::types::{
    BoolValue, Float64Value, Int64Value, ListValue, ObjectModel, ObjectValue, StringValue,
};

use super::adapt::{
    adapt_domain_entity_to_object_value, adapt_entities_to_list_value,
    adapt_int64_value_to_nullable, adapt_list_value_to_models, adapt_list_value_to_strings,
    adapt_nullable_domain_entity_to_object_value, adapt_nullable_scalar_to_string_value,
    adapt_object_value_to_model, adapt_string_value_to_nullable, AdapterError,
};
use super::{list_type, object_type, string_list_type};

object_model! {
    /// Contract of an instance or load balancer.
    pub struct ContractResourceModel {
        /// Months between invoices.
        pub billing_frequency: Int64Value => ("billing_frequency", AttributeType::Int64),
        /// Commitment in months.
        pub term: Int64Value => ("term", AttributeType::Int64),
        /// `HOURLY` or `MONTHLY`.
        pub contract_type: StringValue => ("type", AttributeType::String),
        /// End of a terminated contract.
        pub ends_at: StringValue => ("ends_at", AttributeType::String),
        /// Next renewal.
        pub renewals_at: StringValue => ("renewals_at", AttributeType::String),
        /// Creation time.
        pub created_at: StringValue => ("created_at", AttributeType::String),
        /// Contract state.
        pub state: StringValue => ("state", AttributeType::String),
    }
}

object_model! {
    /// Size of an image.
    pub struct StorageSizeResourceModel {
        /// Amount.
        pub size: Float64Value => ("size", AttributeType::Float64),
        /// Unit of `size`.
        pub unit: StringValue => ("unit", AttributeType::String),
    }
}

object_model! {
    /// Image an instance runs.
    pub struct ImageResourceModel {
        /// Image id; the only attribute a plan sets.
        pub id: StringValue => ("id", AttributeType::String),
        /// Display name.
        pub name: StringValue => ("name", AttributeType::String),
        /// OS family.
        pub family: StringValue => ("family", AttributeType::String),
        /// Flavour.
        pub flavour: StringValue => ("flavour", AttributeType::String),
        /// Whether the image is custom.
        pub custom: BoolValue => ("custom", AttributeType::Bool),
        /// Version.
        pub version: StringValue => ("version", AttributeType::String),
        /// CPU architecture.
        pub architecture: StringValue => ("architecture", AttributeType::String),
        /// Image state.
        pub state: StringValue => ("state", AttributeType::String),
        /// Why the image is in its state.
        pub state_reason: StringValue => ("state_reason", AttributeType::String),
        /// Region of a custom image.
        pub region: StringValue => ("region", AttributeType::String),
        /// Creation time.
        pub created_at: StringValue => ("created_at", AttributeType::String),
        /// Update time.
        pub updated_at: StringValue => ("updated_at", AttributeType::String),
        /// Size of the image.
        pub storage_size: ObjectValue => ("storage_size", object_type::<StorageSizeResourceModel>()),
        /// Market apps.
        pub market_apps: ListValue => ("market_apps", string_list_type()),
        /// Supported storage types.
        pub storage_types: ListValue => ("storage_types", string_list_type()),
    }
}

object_model! {
    /// DDoS protection of an address.
    pub struct DdosResourceModel {
        /// Detection profile.
        pub detection_profile: StringValue => ("detection_profile", AttributeType::String),
        /// Protection type.
        pub protection_type: StringValue => ("protection_type", AttributeType::String),
    }
}

object_model! {
    /// An IP address.
    pub struct IpResourceModel {
        /// The address.
        pub ip: StringValue => ("ip", AttributeType::String),
        /// Prefix length.
        pub prefix_length: StringValue => ("prefix_length", AttributeType::String),
        /// `4` or `6`.
        pub version: Int64Value => ("version", AttributeType::Int64),
        /// Null routed flag.
        pub null_routed: BoolValue => ("null_routed", AttributeType::Bool),
        /// Main address flag.
        pub main_ip: BoolValue => ("main_ip", AttributeType::Bool),
        /// `INTERNAL` or `PUBLIC`.
        pub network_type: StringValue => ("network_type", AttributeType::String),
        /// Reverse DNS.
        pub reverse_lookup: StringValue => ("reverse_lookup", AttributeType::String),
        /// DDoS settings.
        pub ddos: ObjectValue => ("ddos", object_type::<DdosResourceModel>()),
    }
}

object_model! {
    /// Private network attachment.
    pub struct PrivateNetworkResourceModel {
        /// Private network id.
        pub id: StringValue => ("id", AttributeType::String),
        /// Attachment status.
        pub status: StringValue => ("status", AttributeType::String),
        /// Subnet.
        pub subnet: StringValue => ("subnet", AttributeType::String),
    }
}

object_model! {
    /// Mounted ISO.
    pub struct IsoResourceModel {
        /// ISO id.
        pub id: StringValue => ("id", AttributeType::String),
        /// Display name.
        pub name: StringValue => ("name", AttributeType::String),
    }
}

object_model! {
    /// Load balancer health check.
    pub struct HealthCheckResourceModel {
        /// `GET` or `HEAD`.
        pub method: StringValue => ("method", AttributeType::String),
        /// Path probed.
        pub uri: StringValue => ("uri", AttributeType::String),
        /// Host header.
        pub host: StringValue => ("host", AttributeType::String),
        /// Port probed.
        pub port: Int64Value => ("port", AttributeType::Int64),
    }
}

object_model! {
    /// Load balancer sticky sessions.
    pub struct StickySessionResourceModel {
        /// Enabled flag.
        pub enabled: BoolValue => ("enabled", AttributeType::Bool),
        /// Session lifetime in seconds.
        pub max_life_time: Int64Value => ("max_life_time", AttributeType::Int64),
    }
}

object_model! {
    /// Load balancer settings.
    pub struct LoadBalancerConfigurationResourceModel {
        /// Balance algorithm.
        pub balance: StringValue => ("balance", AttributeType::String),
        /// Health check.
        pub health_check: ObjectValue => ("health_check", object_type::<HealthCheckResourceModel>()),
        /// Sticky sessions.
        pub sticky_session: ObjectValue => ("sticky_session", object_type::<StickySessionResourceModel>()),
        /// `X-Forwarded-For` flag.
        pub x_forwarded_for: BoolValue => ("x_forwarded_for", AttributeType::Bool),
        /// Idle timeout in seconds.
        pub idle_timeout: Int64Value => ("idle_timeout", AttributeType::Int64),
        /// Backend port.
        pub target_port: Int64Value => ("target_port", AttributeType::Int64),
    }
}

object_model! {
    /// Load balancer in front of an auto scaling group.
    pub struct LoadBalancerResourceModel {
        /// Load balancer id.
        pub id: StringValue => ("id", AttributeType::String),
        /// Type name.
        pub load_balancer_type: StringValue => ("type", AttributeType::String),
        /// Region.
        pub region: StringValue => ("region", AttributeType::String),
        /// Label.
        pub reference: StringValue => ("reference", AttributeType::String),
        /// State.
        pub state: StringValue => ("state", AttributeType::String),
        /// Contract.
        pub contract: ObjectValue => ("contract", object_type::<ContractResourceModel>()),
        /// Start time.
        pub started_at: StringValue => ("started_at", AttributeType::String),
        /// Addresses.
        pub ips: ListValue => ("ips", list_type::<IpResourceModel>()),
        /// Settings.
        pub configuration: ObjectValue => ("configuration", object_type::<LoadBalancerConfigurationResourceModel>()),
        /// Private network.
        pub private_network: ObjectValue => ("private_network", object_type::<PrivateNetworkResourceModel>()),
    }
}

object_model! {
    /// Auto scaling group an instance belongs to.
    pub struct AutoScalingGroupResourceModel {
        /// Group id.
        pub id: StringValue => ("id", AttributeType::String),
        /// Group type.
        pub group_type: StringValue => ("type", AttributeType::String),
        /// State.
        pub state: StringValue => ("state", AttributeType::String),
        /// Desired instance count.
        pub desired_amount: Int64Value => ("desired_amount", AttributeType::Int64),
        /// Region.
        pub region: StringValue => ("region", AttributeType::String),
        /// Label.
        pub reference: StringValue => ("reference", AttributeType::String),
        /// Creation time.
        pub created_at: StringValue => ("created_at", AttributeType::String),
        /// Update time.
        pub updated_at: StringValue => ("updated_at", AttributeType::String),
        /// Schedule start.
        pub starts_at: StringValue => ("starts_at", AttributeType::String),
        /// Schedule end.
        pub ends_at: StringValue => ("ends_at", AttributeType::String),
        /// Lower bound.
        pub minimum_amount: Int64Value => ("minimum_amount", AttributeType::Int64),
        /// Upper bound.
        pub maximum_amount: Int64Value => ("maximum_amount", AttributeType::Int64),
        /// CPU threshold.
        pub cpu_threshold: Int64Value => ("cpu_threshold", AttributeType::Int64),
        /// Warmup in seconds.
        pub warmup_time: Int64Value => ("warmup_time", AttributeType::Int64),
        /// Cooldown in seconds.
        pub cooldown_time: Int64Value => ("cooldown_time", AttributeType::Int64),
        /// Load balancer.
        pub load_balancer: ObjectValue => ("load_balancer", object_type::<LoadBalancerResourceModel>()),
    }
}

object_model! {
    /// The `leaseweb_public_cloud_instance` resource.
    pub struct InstanceResourceModel {
        /// Instance id.
        pub id: StringValue => ("id", AttributeType::String),
        /// Region.
        pub region: StringValue => ("region", AttributeType::String),
        /// Label.
        pub reference: StringValue => ("reference", AttributeType::String),
        /// Image.
        pub image: ObjectValue => ("image", object_type::<ImageResourceModel>()),
        /// State.
        pub state: StringValue => ("state", AttributeType::String),
        /// Product type.
        pub product_type: StringValue => ("product_type", AttributeType::String),
        /// Public IPv4 flag.
        pub has_public_ipv4: BoolValue => ("has_public_ipv4", AttributeType::Bool),
        /// Private network flag.
        pub has_private_network: BoolValue => ("has_private_network", AttributeType::Bool),
        /// Instance type.
        pub instance_type: StringValue => ("type", AttributeType::String),
        /// Root disk size in GiB.
        pub root_disk_size: Int64Value => ("root_disk_size", AttributeType::Int64),
        /// Root disk storage type.
        pub root_disk_storage_type: StringValue => ("root_disk_storage_type", AttributeType::String),
        /// Addresses.
        pub ips: ListValue => ("ips", list_type::<IpResourceModel>()),
        /// Start time.
        pub started_at: StringValue => ("started_at", AttributeType::String),
        /// Contract.
        pub contract: ObjectValue => ("contract", object_type::<ContractResourceModel>()),
        /// Market app.
        pub market_app_id: StringValue => ("market_app_id", AttributeType::String),
        /// SSH key; write only, never returned by the API.
        pub ssh_key: StringValue => ("ssh_key", AttributeType::String),
        /// Auto scaling group.
        pub auto_scaling_group: ObjectValue => ("auto_scaling_group", object_type::<AutoScalingGroupResourceModel>()),
        /// Private network.
        pub private_network: ObjectValue => ("private_network", object_type::<PrivateNetworkResourceModel>()),
        /// Mounted ISO.
        pub iso: ObjectValue => ("iso", object_type::<IsoResourceModel>()),
    }
}

fn timestamp(value: &chrono::DateTime<chrono::Utc>) -> StringValue {
    StringValue::known(format_timestamp(value))
}

fn optional_timestamp(value: Option<&chrono::DateTime<chrono::Utc>>) -> StringValue {
    adapt_nullable_scalar_to_string_value(value.map(format_timestamp).as_deref())
}

fn known_string(value: &StringValue, prefix: &str, field: &str) -> Result<String, AdapterError> {
    value
        .as_known()
        .cloned()
        .ok_or_else(|| AdapterError::missing(prefix, field))
}

fn known_int64(value: &Int64Value, prefix: &str, field: &str) -> Result<i64, AdapterError> {
    value
        .as_known()
        .copied()
        .ok_or_else(|| AdapterError::missing(prefix, field))
}

fn known_bool(value: &BoolValue, prefix: &str, field: &str) -> Result<bool, AdapterError> {
    value
        .as_known()
        .copied()
        .ok_or_else(|| AdapterError::missing(prefix, field))
}

fn invariant<T>(
    result: Result<T, DomainError>,
    prefix: &str,
    field: &str,
) -> Result<T, AdapterError> {
    result.map_err(|e| AdapterError::domain(prefix, field, e))
}

fn known_timestamp(
    value: &StringValue,
    prefix: &str,
    field: &str,
) -> Result<chrono::DateTime<chrono::Utc>, AdapterError> {
    invariant(parse_timestamp(&known_string(value, prefix, field)?), prefix, field)
}

fn nullable_timestamp(
    value: &StringValue,
    prefix: &str,
    field: &str,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, AdapterError> {
    adapt_string_value_to_nullable(value)
        .map(|v| invariant(parse_timestamp(&v), prefix, field))
        .transpose()
}

fn nullable_reference(
    value: &StringValue,
    prefix: &str,
    field: &str,
) -> Result<Option<Reference>, AdapterError> {
    adapt_string_value_to_nullable(value)
        .map(|v| invariant(Reference::new(v), prefix, field))
        .transpose()
}

fn required_model<M: ObjectModel>(
    value: &ObjectValue,
    prefix: &str,
    field: &str,
) -> Result<M, AdapterError> {
    adapt_object_value_to_model::<M>(value)
        .map_err(|e| e.within(prefix))?
        .ok_or_else(|| AdapterError::missing(prefix, field))
}

fn nullable_model<M: ObjectModel>(
    value: &ObjectValue,
    prefix: &str,
) -> Result<Option<M>, AdapterError> {
    adapt_object_value_to_model::<M>(value).map_err(|e| e.within(prefix))
}

/// Contract of a domain contract.
pub fn adapt_contract(contract: &Contract) -> Result<ContractResourceModel, AdapterError> {
    Ok(ContractResourceModel {
        billing_frequency: Int64Value::known(contract.billing_frequency().as_i64()),
        term: Int64Value::known(contract.term().as_i64()),
        contract_type: StringValue::known(contract.contract_type().as_str()),
        ends_at: optional_timestamp(contract.ends_at().as_ref()),
        renewals_at: timestamp(&contract.renewals_at()),
        created_at: timestamp(&contract.created_at()),
        state: StringValue::known(contract.state().as_str()),
    })
}

/// Model of a domain image.
pub fn adapt_image(image: &Image) -> Result<ImageResourceModel, AdapterError> {
    Ok(ImageResourceModel {
        id: StringValue::known(image.id.clone()),
        name: StringValue::known(image.name.clone()),
        family: StringValue::known(image.family.clone()),
        flavour: StringValue::known(image.flavour.clone()),
        custom: BoolValue::known(image.custom),
        version: adapt_nullable_scalar_to_string_value(image.version.as_deref()),
        architecture: adapt_nullable_scalar_to_string_value(image.architecture.as_deref()),
        state: adapt_nullable_scalar_to_string_value(image.state.as_ref().map(ImageState::as_str)),
        state_reason: adapt_nullable_scalar_to_string_value(image.state_reason.as_deref()),
        region: adapt_nullable_scalar_to_string_value(image.region.as_deref()),
        created_at: optional_timestamp(image.created_at.as_ref()),
        updated_at: optional_timestamp(image.updated_at.as_ref()),
        storage_size: adapt_nullable_domain_entity_to_object_value(
            image.storage_size.as_ref(),
            |size: &StorageSize| {
                Ok(StorageSizeResourceModel {
                    size: Float64Value::known(size.size),
                    unit: StringValue::known(size.unit.clone()),
                })
            },
        )
        .map_err(|e| e.within("adapt_image"))?,
        market_apps: ListValue::from_strings(image.market_apps.iter().cloned()),
        storage_types: ListValue::from_strings(
            image.storage_types.iter().map(|t| t.as_str().to_string()),
        ),
    })
}

fn adapt_ddos(ddos: &Ddos) -> Result<DdosResourceModel, AdapterError> {
    Ok(DdosResourceModel {
        detection_profile: StringValue::known(ddos.detection_profile.clone()),
        protection_type: StringValue::known(ddos.protection_type.clone()),
    })
}

/// Model of a domain address.
pub fn adapt_ip(ip: &Ip) -> Result<IpResourceModel, AdapterError> {
    Ok(IpResourceModel {
        ip: StringValue::known(ip.ip.clone()),
        prefix_length: StringValue::known(ip.prefix_length.clone()),
        version: Int64Value::known(ip.version.as_i64()),
        null_routed: BoolValue::known(ip.null_routed),
        main_ip: BoolValue::known(ip.main_ip),
        network_type: StringValue::known(ip.network_type.as_str()),
        reverse_lookup: adapt_nullable_scalar_to_string_value(ip.reverse_lookup.as_deref()),
        ddos: adapt_nullable_domain_entity_to_object_value(ip.ddos.as_ref(), adapt_ddos)
            .map_err(|e| e.within("adapt_ip"))?,
    })
}

fn adapt_private_network(
    private_network: &PrivateNetwork,
) -> Result<PrivateNetworkResourceModel, AdapterError> {
    Ok(PrivateNetworkResourceModel {
        id: StringValue::known(private_network.id.clone()),
        status: StringValue::known(private_network.status.clone()),
        subnet: StringValue::known(private_network.subnet.clone()),
    })
}

fn adapt_iso(iso: &Iso) -> Result<IsoResourceModel, AdapterError> {
    Ok(IsoResourceModel {
        id: StringValue::known(iso.id.clone()),
        name: StringValue::known(iso.name.clone()),
    })
}

fn adapt_health_check(health_check: &HealthCheck) -> Result<HealthCheckResourceModel, AdapterError> {
    Ok(HealthCheckResourceModel {
        method: StringValue::known(health_check.method.as_str()),
        uri: StringValue::known(health_check.uri.clone()),
        host: adapt_nullable_scalar_to_string_value(health_check.host.as_deref()),
        port: Int64Value::known(health_check.port),
    })
}

fn adapt_sticky_session(
    sticky_session: &StickySession,
) -> Result<StickySessionResourceModel, AdapterError> {
    Ok(StickySessionResourceModel {
        enabled: BoolValue::known(sticky_session.enabled),
        max_life_time: Int64Value::known(sticky_session.max_life_time),
    })
}

fn adapt_load_balancer_configuration(
    configuration: &LoadBalancerConfiguration,
) -> Result<LoadBalancerConfigurationResourceModel, AdapterError> {
    let prefix = "adapt_load_balancer_configuration";
    Ok(LoadBalancerConfigurationResourceModel {
        balance: StringValue::known(configuration.balance.as_str()),
        health_check: adapt_nullable_domain_entity_to_object_value(
            configuration.health_check.as_ref(),
            adapt_health_check,
        )
        .map_err(|e| e.within(prefix))?,
        sticky_session: adapt_nullable_domain_entity_to_object_value(
            configuration.sticky_session.as_ref(),
            adapt_sticky_session,
        )
        .map_err(|e| e.within(prefix))?,
        x_forwarded_for: BoolValue::known(configuration.x_forwarded_for),
        idle_timeout: Int64Value::known(configuration.idle_timeout),
        target_port: Int64Value::known(configuration.target_port),
    })
}

/// Model of a domain load balancer.
pub fn adapt_load_balancer(
    load_balancer: &LoadBalancer,
) -> Result<LoadBalancerResourceModel, AdapterError> {
    let prefix = "adapt_load_balancer";
    Ok(LoadBalancerResourceModel {
        id: StringValue::known(load_balancer.id.to_string()),
        load_balancer_type: StringValue::known(load_balancer.load_balancer_type.name.clone()),
        region: StringValue::known(load_balancer.region.clone()),
        reference: adapt_nullable_scalar_to_string_value(
            load_balancer.reference.as_ref().map(Reference::as_str),
        ),
        state: StringValue::known(load_balancer.state.as_str()),
        contract: adapt_domain_entity_to_object_value(&load_balancer.contract, adapt_contract)
            .map_err(|e| e.within(prefix))?,
        started_at: optional_timestamp(load_balancer.started_at.as_ref()),
        ips: adapt_entities_to_list_value(&load_balancer.ips, adapt_ip)
            .map_err(|e| e.within(prefix))?,
        configuration: adapt_nullable_domain_entity_to_object_value(
            load_balancer.configuration.as_ref(),
            adapt_load_balancer_configuration,
        )
        .map_err(|e| e.within(prefix))?,
        private_network: adapt_nullable_domain_entity_to_object_value(
            load_balancer.private_network.as_ref(),
            adapt_private_network,
        )
        .map_err(|e| e.within(prefix))?,
    })
}

/// Model of a domain auto scaling group.
pub fn adapt_auto_scaling_group(
    group: &AutoScalingGroup,
) -> Result<AutoScalingGroupResourceModel, AdapterError> {
    let optional = group.optional();
    Ok(AutoScalingGroupResourceModel {
        id: StringValue::known(group.id().to_string()),
        group_type: StringValue::known(group.group_type().as_str()),
        state: StringValue::known(group.state().as_str()),
        desired_amount: Int64Value::from_option(optional.desired_amount),
        region: StringValue::known(group.region()),
        reference: adapt_nullable_scalar_to_string_value(group.reference().map(Reference::as_str)),
        created_at: timestamp(&group.created_at()),
        updated_at: timestamp(&group.updated_at()),
        starts_at: optional_timestamp(optional.starts_at.as_ref()),
        ends_at: optional_timestamp(optional.ends_at.as_ref()),
        minimum_amount: Int64Value::from_option(optional.minimum_amount),
        maximum_amount: Int64Value::from_option(optional.maximum_amount),
        cpu_threshold: Int64Value::from_option(optional.cpu_threshold),
        warmup_time: Int64Value::from_option(optional.warmup_time),
        cooldown_time: Int64Value::from_option(optional.cooldown_time),
        load_balancer: adapt_nullable_domain_entity_to_object_value(
            optional.load_balancer.as_ref(),
            adapt_load_balancer,
        )
        .map_err(|e| e.within("adapt_auto_scaling_group"))?,
    })
}

/// Model of a domain instance, every attribute known or null.
///
/// The API never returns the SSH key, so `ssh_key` is null unless the
/// instance carries one.
pub fn adapt_instance(instance: &Instance) -> Result<InstanceResourceModel, AdapterError> {
    let prefix = "adapt_instance";
    Ok(InstanceResourceModel {
        id: StringValue::known(instance.id.to_string()),
        region: StringValue::known(instance.region.clone()),
        reference: adapt_nullable_scalar_to_string_value(
            instance.reference.as_ref().map(Reference::as_str),
        ),
        image: adapt_domain_entity_to_object_value(&instance.image, adapt_image)
            .map_err(|e| e.within(prefix))?,
        state: StringValue::known(instance.state.as_str()),
        product_type: StringValue::known(instance.product_type.clone()),
        has_public_ipv4: BoolValue::known(instance.has_public_ipv4),
        has_private_network: BoolValue::known(instance.has_private_network),
        instance_type: StringValue::known(instance.instance_type.name.clone()),
        root_disk_size: Int64Value::known(instance.root_disk_size.value()),
        root_disk_storage_type: StringValue::known(instance.root_disk_storage_type.as_str()),
        ips: adapt_entities_to_list_value(&instance.ips, adapt_ip)
            .map_err(|e| e.within(prefix))?,
        started_at: optional_timestamp(instance.started_at.as_ref()),
        contract: adapt_domain_entity_to_object_value(&instance.contract, adapt_contract)
            .map_err(|e| e.within(prefix))?,
        market_app_id: adapt_nullable_scalar_to_string_value(instance.market_app_id.as_deref()),
        ssh_key: adapt_nullable_scalar_to_string_value(
            instance.ssh_key.as_ref().map(SshKey::as_str),
        ),
        auto_scaling_group: adapt_nullable_domain_entity_to_object_value(
            instance.auto_scaling_group.as_ref(),
            adapt_auto_scaling_group,
        )
        .map_err(|e| e.within(prefix))?,
        private_network: adapt_nullable_domain_entity_to_object_value(
            instance.private_network.as_ref(),
            adapt_private_network,
        )
        .map_err(|e| e.within(prefix))?,
        iso: adapt_nullable_domain_entity_to_object_value(instance.iso.as_ref(), adapt_iso)
            .map_err(|e| e.within(prefix))?,
    })
}

impl ContractResourceModel {
    /// Rebuild the domain contract.
    pub fn to_contract(&self) -> Result<Contract, AdapterError> {
        let prefix = "to_contract";
        let contract = Contract::new(
            invariant(
                ContractBillingFrequency::from_int(known_int64(
                    &self.billing_frequency,
                    prefix,
                    "billing_frequency",
                )?),
                prefix,
                "billing_frequency",
            )?,
            invariant(
                ContractTerm::from_int(known_int64(&self.term, prefix, "term")?),
                prefix,
                "term",
            )?,
            invariant(
                ContractType::from_token(&known_string(&self.contract_type, prefix, "type")?),
                prefix,
                "type",
            )?,
            known_timestamp(&self.renewals_at, prefix, "renewals_at")?,
            known_timestamp(&self.created_at, prefix, "created_at")?,
            invariant(
                ContractState::from_token(&known_string(&self.state, prefix, "state")?),
                prefix,
                "state",
            )?,
            nullable_timestamp(&self.ends_at, prefix, "ends_at")?,
        );
        invariant(contract, prefix, "term")
    }

    /// The contract fields a plan sets: type, term and billing frequency.
    pub fn to_contract_terms(
        &self,
    ) -> Result<(ContractType, ContractTerm, ContractBillingFrequency), AdapterError> {
        let prefix = "to_contract_terms";
        Ok((
            invariant(
                ContractType::from_token(&known_string(&self.contract_type, prefix, "type")?),
                prefix,
                "type",
            )?,
            invariant(
                ContractTerm::from_int(known_int64(&self.term, prefix, "term")?),
                prefix,
                "term",
            )?,
            invariant(
                ContractBillingFrequency::from_int(known_int64(
                    &self.billing_frequency,
                    prefix,
                    "billing_frequency",
                )?),
                prefix,
                "billing_frequency",
            )?,
        ))
    }
}

impl ImageResourceModel {
    /// Rebuild the domain image.
    pub fn to_image(&self) -> Result<Image, AdapterError> {
        let prefix = "to_image";
        let mut image = Image::new(
            known_string(&self.id, prefix, "id")?,
            known_string(&self.name, prefix, "name")?,
            known_string(&self.family, prefix, "family")?,
            known_string(&self.flavour, prefix, "flavour")?,
            known_bool(&self.custom, prefix, "custom")?,
        );
        image.version = adapt_string_value_to_nullable(&self.version);
        image.architecture = adapt_string_value_to_nullable(&self.architecture);
        image.state = adapt_string_value_to_nullable(&self.state)
            .map(|s| invariant(ImageState::from_token(&s), prefix, "state"))
            .transpose()?;
        image.state_reason = adapt_string_value_to_nullable(&self.state_reason);
        image.region = adapt_string_value_to_nullable(&self.region);
        image.created_at = nullable_timestamp(&self.created_at, prefix, "created_at")?;
        image.updated_at = nullable_timestamp(&self.updated_at, prefix, "updated_at")?;
        image.storage_size = nullable_model::<StorageSizeResourceModel>(&self.storage_size, prefix)?
            .map(|s| -> Result<StorageSize, AdapterError> {
                Ok(StorageSize {
                    size: s
                        .size
                        .as_known()
                        .copied()
                        .ok_or_else(|| AdapterError::missing(prefix, "storage_size.size"))?,
                    unit: known_string(&s.unit, prefix, "storage_size.unit")?,
                })
            })
            .transpose()?;
        image.market_apps =
            adapt_list_value_to_strings(&self.market_apps).map_err(|e| e.within(prefix))?;
        image.storage_types = adapt_list_value_to_strings(&self.storage_types)
            .map_err(|e| e.within(prefix))?
            .iter()
            .map(|t| invariant(RootDiskStorageType::from_token(t), prefix, "storage_types"))
            .collect::<Result<_, _>>()?;
        Ok(image)
    }
}

impl IpResourceModel {
    /// Rebuild the domain address.
    pub fn to_ip(&self) -> Result<Ip, AdapterError> {
        let prefix = "to_ip";
        let ddos = nullable_model::<DdosResourceModel>(&self.ddos, prefix)?
            .map(|d| -> Result<Ddos, AdapterError> {
                Ok(Ddos {
                    detection_profile: known_string(&d.detection_profile, prefix, "detection_profile")?,
                    protection_type: known_string(&d.protection_type, prefix, "protection_type")?,
                })
            })
            .transpose()?;

        Ok(Ip {
            ip: known_string(&self.ip, prefix, "ip")?,
            prefix_length: known_string(&self.prefix_length, prefix, "prefix_length")?,
            version: invariant(
                IpVersion::from_int(known_int64(&self.version, prefix, "version")?),
                prefix,
                "version",
            )?,
            null_routed: known_bool(&self.null_routed, prefix, "null_routed")?,
            main_ip: known_bool(&self.main_ip, prefix, "main_ip")?,
            network_type: invariant(
                NetworkType::from_token(&known_string(&self.network_type, prefix, "network_type")?),
                prefix,
                "network_type",
            )?,
            reverse_lookup: adapt_string_value_to_nullable(&self.reverse_lookup),
            ddos,
        })
    }
}

impl PrivateNetworkResourceModel {
    /// Rebuild the domain attachment.
    pub fn to_private_network(&self) -> Result<PrivateNetwork, AdapterError> {
        let prefix = "to_private_network";
        Ok(PrivateNetwork {
            id: known_string(&self.id, prefix, "id")?,
            status: known_string(&self.status, prefix, "status")?,
            subnet: known_string(&self.subnet, prefix, "subnet")?,
        })
    }
}

impl IsoResourceModel {
    /// Rebuild the domain ISO.
    pub fn to_iso(&self) -> Result<Iso, AdapterError> {
        let prefix = "to_iso";
        Ok(Iso {
            id: known_string(&self.id, prefix, "id")?,
            name: known_string(&self.name, prefix, "name")?,
        })
    }
}

impl LoadBalancerConfigurationResourceModel {
    /// Rebuild the domain settings.
    pub fn to_configuration(&self) -> Result<LoadBalancerConfiguration, AdapterError> {
        let prefix = "to_configuration";
        let health_check = nullable_model::<HealthCheckResourceModel>(&self.health_check, prefix)?
            .map(|h| -> Result<HealthCheck, AdapterError> {
                Ok(HealthCheck {
                    method: invariant(
                        HttpMethod::from_token(&known_string(&h.method, prefix, "method")?),
                        prefix,
                        "method",
                    )?,
                    uri: known_string(&h.uri, prefix, "uri")?,
                    host: adapt_string_value_to_nullable(&h.host),
                    port: known_int64(&h.port, prefix, "port")?,
                })
            })
            .transpose()?;
        let sticky_session =
            nullable_model::<StickySessionResourceModel>(&self.sticky_session, prefix)?
                .map(|s| -> Result<StickySession, AdapterError> {
                    Ok(StickySession {
                        enabled: known_bool(&s.enabled, prefix, "enabled")?,
                        max_life_time: known_int64(&s.max_life_time, prefix, "max_life_time")?,
                    })
                })
                .transpose()?;

        Ok(LoadBalancerConfiguration {
            balance: invariant(
                Balance::from_token(&known_string(&self.balance, prefix, "balance")?),
                prefix,
                "balance",
            )?,
            health_check,
            sticky_session,
            x_forwarded_for: known_bool(&self.x_forwarded_for, prefix, "x_forwarded_for")?,
            idle_timeout: known_int64(&self.idle_timeout, prefix, "idle_timeout")?,
            target_port: known_int64(&self.target_port, prefix, "target_port")?,
        })
    }
}

fn to_ips(value: &ListValue, prefix: &str) -> Result<Vec<Ip>, AdapterError> {
    adapt_list_value_to_models::<IpResourceModel>(value)
        .map_err(|e| e.within(prefix))?
        .iter()
        .map(|ip| ip.to_ip().map_err(|e| e.within(prefix)))
        .collect()
}

impl LoadBalancerResourceModel {
    /// Rebuild the domain load balancer.
    pub fn to_load_balancer(&self) -> Result<LoadBalancer, AdapterError> {
        let prefix = "to_load_balancer";
        Ok(LoadBalancer {
            id: invariant(
                Uuid::new(&known_string(&self.id, prefix, "id")?),
                prefix,
                "id",
            )?,
            load_balancer_type: InstanceType::new(known_string(
                &self.load_balancer_type,
                prefix,
                "type",
            )?),
            region: known_string(&self.region, prefix, "region")?,
            reference: nullable_reference(&self.reference, prefix, "reference")?,
            state: invariant(
                InstanceState::from_token(&known_string(&self.state, prefix, "state")?),
                prefix,
                "state",
            )?,
            contract: required_model::<ContractResourceModel>(&self.contract, prefix, "contract")?
                .to_contract()
                .map_err(|e| e.within(prefix))?,
            started_at: nullable_timestamp(&self.started_at, prefix, "started_at")?,
            ips: to_ips(&self.ips, prefix)?,
            configuration: nullable_model::<LoadBalancerConfigurationResourceModel>(
                &self.configuration,
                prefix,
            )?
            .map(|c| c.to_configuration().map_err(|e| e.within(prefix)))
            .transpose()?,
            private_network: nullable_model::<PrivateNetworkResourceModel>(
                &self.private_network,
                prefix,
            )?
            .map(|p| p.to_private_network().map_err(|e| e.within(prefix)))
            .transpose()?,
        })
    }
}

impl AutoScalingGroupResourceModel {
    /// Rebuild the domain auto scaling group.
    pub fn to_auto_scaling_group(&self) -> Result<AutoScalingGroup, AdapterError> {
        let prefix = "to_auto_scaling_group";
        let optional = OptionalAutoScalingGroupValues {
            desired_amount: adapt_int64_value_to_nullable(&self.desired_amount),
            starts_at: nullable_timestamp(&self.starts_at, prefix, "starts_at")?,
            ends_at: nullable_timestamp(&self.ends_at, prefix, "ends_at")?,
            minimum_amount: adapt_int64_value_to_nullable(&self.minimum_amount),
            maximum_amount: adapt_int64_value_to_nullable(&self.maximum_amount),
            cpu_threshold: adapt_int64_value_to_nullable(&self.cpu_threshold),
            warmup_time: adapt_int64_value_to_nullable(&self.warmup_time),
            cooldown_time: adapt_int64_value_to_nullable(&self.cooldown_time),
            load_balancer: nullable_model::<LoadBalancerResourceModel>(&self.load_balancer, prefix)?
                .map(|l| l.to_load_balancer().map_err(|e| e.within(prefix)))
                .transpose()?,
        };

        let group = AutoScalingGroup::new(
            invariant(
                Uuid::new(&known_string(&self.id, prefix, "id")?),
                prefix,
                "id",
            )?,
            invariant(
                AutoScalingGroupType::from_token(&known_string(&self.group_type, prefix, "type")?),
                prefix,
                "type",
            )?,
            invariant(
                AutoScalingGroupState::from_token(&known_string(&self.state, prefix, "state")?),
                prefix,
                "state",
            )?,
            known_string(&self.region, prefix, "region")?,
            invariant(
                adapt_string_value_to_nullable(&self.reference)
                    .map(Reference::new)
                    .transpose(),
                prefix,
                "reference",
            )?,
            known_timestamp(&self.created_at, prefix, "created_at")?,
            known_timestamp(&self.updated_at, prefix, "updated_at")?,
            optional,
        );
        let field = match &group {
            Err(DomainError::InvalidSchedule { .. }) => "starts_at",
            Err(DomainError::InvalidAmounts { .. }) => "minimum_amount",
            _ => "type",
        };
        invariant(group, prefix, field)
    }
}

fn check_instance_type(
    instance_type: &str,
    allowed_instance_types: &[String],
    prefix: &str,
) -> Result<(), AdapterError> {
    if allowed_instance_types.iter().any(|t| t == instance_type) {
        return Ok(());
    }
    Err(AdapterError::domain(
        prefix,
        "type",
        DomainError::InvalidEnumValue {
            kind: "instance type",
            value: instance_type.to_string(),
            allowed: allowed_instance_types.join(", "),
        },
    ))
}

impl InstanceResourceModel {
    /// Rebuild the whole domain instance from a fully known state.
    pub fn to_instance(&self) -> Result<Instance, AdapterError> {
        let prefix = "to_instance";
        let optional = OptionalInstanceValues {
            reference: nullable_reference(&self.reference, prefix, "reference")?,
            market_app_id: adapt_string_value_to_nullable(&self.market_app_id),
            ssh_key: adapt_string_value_to_nullable(&self.ssh_key)
                .map(|k| invariant(SshKey::new(k), prefix, "ssh_key"))
                .transpose()?,
            started_at: nullable_timestamp(&self.started_at, prefix, "started_at")?,
            auto_scaling_group: nullable_model::<AutoScalingGroupResourceModel>(
                &self.auto_scaling_group,
                prefix,
            )?
            .map(|g| g.to_auto_scaling_group().map_err(|e| e.within(prefix)))
            .transpose()?,
            private_network: nullable_model::<PrivateNetworkResourceModel>(
                &self.private_network,
                prefix,
            )?
            .map(|p| p.to_private_network().map_err(|e| e.within(prefix)))
            .transpose()?,
            iso: nullable_model::<IsoResourceModel>(&self.iso, prefix)?
                .map(|i| i.to_iso().map_err(|e| e.within(prefix)))
                .transpose()?,
        };

        Ok(Instance::new(
            invariant(
                Uuid::new(&known_string(&self.id, prefix, "id")?),
                prefix,
                "id",
            )?,
            known_string(&self.region, prefix, "region")?,
            InstanceType::new(known_string(&self.instance_type, prefix, "type")?),
            invariant(
                InstanceState::from_token(&known_string(&self.state, prefix, "state")?),
                prefix,
                "state",
            )?,
            known_string(&self.product_type, prefix, "product_type")?,
            known_bool(&self.has_public_ipv4, prefix, "has_public_ipv4")?,
            known_bool(&self.has_private_network, prefix, "has_private_network")?,
            invariant(
                RootDiskSize::new(known_int64(&self.root_disk_size, prefix, "root_disk_size")?),
                prefix,
                "root_disk_size",
            )?,
            self.storage_type(prefix)?,
            to_ips(&self.ips, prefix)?,
            required_model::<ContractResourceModel>(&self.contract, prefix, "contract")?
                .to_contract()
                .map_err(|e| e.within(prefix))?,
            required_model::<ImageResourceModel>(&self.image, prefix, "image")?
                .to_image()
                .map_err(|e| e.within(prefix))?,
            optional,
        ))
    }

    /// The launch request a plan describes.
    ///
    /// The instance type must be one of `allowed_instance_types`.
    pub fn to_create_instance(
        &self,
        allowed_instance_types: &[String],
    ) -> Result<CreateInstance, AdapterError> {
        let prefix = "to_create_instance";
        let instance_type = known_string(&self.instance_type, prefix, "type")?;
        check_instance_type(&instance_type, allowed_instance_types, prefix)?;

        let image = required_model::<ImageResourceModel>(&self.image, prefix, "image")?;
        let (contract_type, contract_term, billing_frequency) =
            required_model::<ContractResourceModel>(&self.contract, prefix, "contract")?
                .to_contract_terms()
                .map_err(|e| e.within(prefix))?;

        let optional = OptionalCreateInstanceValues {
            market_app_id: adapt_string_value_to_nullable(&self.market_app_id),
            reference: nullable_reference(&self.reference, prefix, "reference")?,
            ssh_key: adapt_string_value_to_nullable(&self.ssh_key)
                .map(|k| invariant(SshKey::new(k), prefix, "ssh_key"))
                .transpose()?,
            root_disk_size: adapt_int64_value_to_nullable(&self.root_disk_size)
                .map(|s| invariant(RootDiskSize::new(s), prefix, "root_disk_size"))
                .transpose()?,
        };

        invariant(
            CreateInstance::new(
                known_string(&self.region, prefix, "region")?,
                instance_type,
                self.storage_type(prefix)?,
                known_string(&image.id, prefix, "image.id")?,
                contract_type,
                contract_term,
                billing_frequency,
                optional,
            ),
            prefix,
            "contract",
        )
    }

    /// The update a plan describes. Null and unknown attributes are left
    /// unchanged.
    ///
    /// A known instance type must be one of `allowed_instance_types`.
    pub fn to_update_instance(
        &self,
        allowed_instance_types: &[String],
    ) -> Result<UpdateInstance, AdapterError> {
        let prefix = "to_update_instance";
        let id = invariant(
            Uuid::new(&known_string(&self.id, prefix, "id")?),
            prefix,
            "id",
        )?;

        let instance_type = adapt_string_value_to_nullable(&self.instance_type);
        if let Some(instance_type) = &instance_type {
            check_instance_type(instance_type, allowed_instance_types, prefix)?;
        }

        let contract = nullable_model::<ContractResourceModel>(&self.contract, prefix)?;
        let values = OptionalUpdateInstanceValues {
            reference: nullable_reference(&self.reference, prefix, "reference")?,
            root_disk_size: adapt_int64_value_to_nullable(&self.root_disk_size)
                .map(|s| invariant(RootDiskSize::new(s), prefix, "root_disk_size"))
                .transpose()?,
            contract_type: contract
                .as_ref()
                .and_then(|c| adapt_string_value_to_nullable(&c.contract_type))
                .map(|t| invariant(ContractType::from_token(&t), prefix, "contract.type"))
                .transpose()?,
            contract_term: contract
                .as_ref()
                .and_then(|c| adapt_int64_value_to_nullable(&c.term))
                .map(|t| invariant(ContractTerm::from_int(t), prefix, "contract.term"))
                .transpose()?,
            billing_frequency: contract
                .as_ref()
                .and_then(|c| adapt_int64_value_to_nullable(&c.billing_frequency))
                .map(|f| {
                    invariant(
                        ContractBillingFrequency::from_int(f),
                        prefix,
                        "contract.billing_frequency",
                    )
                })
                .transpose()?,
            instance_type,
        };

        invariant(UpdateInstance::new(id, values), prefix, "contract")
    }

    fn storage_type(&self, prefix: &str) -> Result<RootDiskStorageType, AdapterError> {
        invariant(
            RootDiskStorageType::from_token(&known_string(
                &self.root_disk_storage_type,
                prefix,
                "root_disk_storage_type",
            )?),
            prefix,
            "root_disk_storage_type",
        )
    }

    /// The contract object of a plan, if known.
    pub fn contract_model(&self) -> Result<Option<ContractResourceModel>, AdapterError> {
        nullable_model::<ContractResourceModel>(&self.contract, "contract_model")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use crate::types::AttrValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_domain_to_schema_is_fully_known() {
        let model = adapt_instance(&fixtures::instance()).unwrap();
        assert_eq!(model.id, StringValue::known(fixtures::INSTANCE_ID));
        assert_eq!(model.instance_type, StringValue::known("lsw.m5a.4xlarge"));
        assert_eq!(model.root_disk_size, Int64Value::known(55));
        assert!(model.image.is_known());
        assert!(model.contract.is_known());
        assert!(model.ips.is_known());
        assert_eq!(model.ssh_key, StringValue::Null);
        assert!(model.auto_scaling_group.is_null());
        assert!(model.iso.is_null());
    }

    #[test]
    fn test_schema_domain_round_trip() {
        let instance = fixtures::instance_with_everything();
        let model = adapt_instance(&instance).unwrap();
        assert_eq!(model.to_instance().unwrap(), instance);
    }

    #[test]
    fn test_round_trip_without_optionals() {
        let mut instance = fixtures::instance();
        instance.reference = None;
        instance.market_app_id = None;
        instance.started_at = None;
        let model = adapt_instance(&instance).unwrap();
        assert_eq!(model.reference, StringValue::Null);
        assert_eq!(model.to_instance().unwrap(), instance);
    }

    #[test]
    fn test_empty_ips_stay_empty() {
        let mut instance = fixtures::instance();
        instance.ips = Vec::new();

        let model = adapt_instance(&instance).unwrap();
        assert!(model.ips.is_known());
        assert_eq!(model.ips.elements().map(<[_]>::len), Some(0));

        let back = model.to_instance().unwrap();
        assert_eq!(back.ips, Vec::new());
        let again = adapt_instance(&back).unwrap();
        assert!(again.ips.is_known());
        assert!(!again.ips.is_null());
    }

    #[test]
    fn test_create_from_plan() {
        let plan = fixtures::create_plan();
        let allowed = vec!["lsw.m5a.4xlarge".to_string()];

        let create = plan.to_create_instance(&allowed).unwrap();
        assert_eq!(create.region(), "eu-west-3");
        assert_eq!(create.instance_type(), "lsw.m5a.4xlarge");
        assert_eq!(create.image_id(), "UBUNTU_20_04_64BIT");
        assert_eq!(create.contract_type(), ContractType::Monthly);
        assert_eq!(create.contract_term(), ContractTerm::Three);
        assert_eq!(create.billing_frequency(), ContractBillingFrequency::One);
        assert_eq!(create.root_disk_storage_type(), RootDiskStorageType::Central);
        assert_eq!(create.optional().root_disk_size.map(|s| s.value()), Some(55));
        assert_eq!(create.optional().reference.as_ref().map(Reference::as_str), Some("r"));
        assert_eq!(create.optional().market_app_id.as_deref(), Some("m"));
    }

    #[test]
    fn test_create_rejects_type_outside_allowed_set() {
        let plan = fixtures::create_plan();
        let err = plan
            .to_create_instance(&["lsw.m5a.large".to_string()])
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("lsw.m5a.4xlarge"));
        assert!(message.contains("lsw.m5a.large"));
    }

    #[test]
    fn test_create_keeps_contract_sentinel() {
        let mut plan = fixtures::create_plan();
        plan.contract = ObjectValue::from_model(ContractResourceModel {
            billing_frequency: Int64Value::known(1),
            term: Int64Value::known(3),
            contract_type: StringValue::known("HOURLY"),
            ends_at: StringValue::Unknown,
            renewals_at: StringValue::Unknown,
            created_at: StringValue::Unknown,
            state: StringValue::Unknown,
        })
        .unwrap();

        let err = plan
            .to_create_instance(&["lsw.m5a.4xlarge".to_string()])
            .unwrap_err();
        assert_eq!(err.domain_error(), Some(&DomainError::ContractTermMustBeZero));
    }

    #[test]
    fn test_unknown_optional_root_disk_size_is_omitted() {
        let mut plan = fixtures::create_plan();
        plan.root_disk_size = AttrValue::Unknown;
        let create = plan
            .to_create_instance(&["lsw.m5a.4xlarge".to_string()])
            .unwrap();
        assert_eq!(create.optional().root_disk_size, None);
    }

    #[test]
    fn test_update_leaves_unset_fields_out() {
        let mut plan = adapt_instance(&fixtures::instance()).unwrap();
        plan.reference = StringValue::Null;
        plan.contract = ObjectValue::unknown(ContractResourceModel::attribute_types());
        plan.instance_type = StringValue::known("lsw.m5a.xlarge");

        let update = plan
            .to_update_instance(&["lsw.m5a.4xlarge".to_string(), "lsw.m5a.xlarge".to_string()])
            .unwrap();
        let values = update.values();
        assert_eq!(values.reference, None);
        assert_eq!(values.contract_type, None);
        assert_eq!(values.contract_term, None);
        assert_eq!(values.instance_type.as_deref(), Some("lsw.m5a.xlarge"));
        assert_eq!(values.root_disk_size.map(|s| s.value()), Some(55));
    }

    #[test]
    fn test_inverted_group_amounts_point_at_minimum() {
        let instance = fixtures::instance_with_everything();
        let group = instance.auto_scaling_group.as_ref().unwrap();
        let mut model = adapt_auto_scaling_group(group).unwrap();
        model.minimum_amount = Int64Value::known(5);
        model.maximum_amount = Int64Value::known(2);

        let err = model.to_auto_scaling_group().unwrap_err();
        assert_eq!(err.field(), Some("minimum_amount"));
        assert_eq!(
            err.domain_error(),
            Some(&DomainError::InvalidAmounts {
                minimum: 5,
                maximum: 2
            })
        );
    }

    #[test]
    fn test_group_without_reference_stays_null() {
        let instance = fixtures::instance_with_everything();
        let group = instance.auto_scaling_group.as_ref().unwrap();
        let mut model = adapt_auto_scaling_group(group).unwrap();
        model.reference = StringValue::Null;

        let group = model.to_auto_scaling_group().unwrap();
        assert!(group.reference().is_none());
        assert_eq!(
            adapt_auto_scaling_group(&group).unwrap().reference,
            StringValue::Null
        );
    }

    #[test]
    fn test_missing_required_value() {
        let mut plan = fixtures::create_plan();
        plan.region = StringValue::Unknown;
        let err = plan
            .to_create_instance(&["lsw.m5a.4xlarge".to_string()])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "to_create_instance: Missing Required Value \"region\" must be known"
        );
    }
}

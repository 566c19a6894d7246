//! Conversions between the wire shapes of [`crate::sdk`] and the domain model.
//!
//! Wire to domain conversions validate every token and fail with an
//! [`AdaptError`] naming the offending field. Domain to wire conversions are
//! total.

use thiserror::Error;

use crate::domain::{
    parse_timestamp, AutoScalingGroup, AutoScalingGroupState, AutoScalingGroupType, Balance,
    Contract, ContractBillingFrequency, ContractState, ContractTerm, ContractType, CreateInstance,
    Ddos, DomainError, HealthCheck, HttpMethod, Image, ImageState, Instance, InstanceState,
    InstanceType, Ip, IpVersion, Iso, LoadBalancer, LoadBalancerConfiguration, NetworkType,
    OptionalAutoScalingGroupValues, OptionalInstanceValues, Price, Prices, PrivateNetwork,
    Reference, Region, Resource, Resources, RootDiskSize, RootDiskStorageType, StickySession,
    StorageSize, StoragePrices, UpdateInstance, Uuid,
};
use crate::sdk;

/// A wire value that does not satisfy the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {source}")]
pub struct AdaptError {
    field: String,
    #[source]
    source: DomainError,
}

impl AdaptError {
    /// An error on `field`.
    pub fn new(field: impl Into<String>, source: DomainError) -> Self {
        Self {
            field: field.into(),
            source,
        }
    }

    /// Dotted path of the offending field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The violated invariant.
    pub fn domain_error(&self) -> &DomainError {
        &self.source
    }

    fn within(mut self, parent: &str) -> Self {
        self.field = format!("{parent}.{}", self.field);
        self
    }
}

fn at(field: &'static str) -> impl FnOnce(DomainError) -> AdaptError {
    move |source| AdaptError::new(field, source)
}

fn within(parent: &'static str) -> impl FnOnce(AdaptError) -> AdaptError {
    move |err| err.within(parent)
}

fn adapt_optional_timestamp(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, AdaptError> {
    value.map(parse_timestamp).transpose().map_err(at(field))
}

fn adapt_list<W, D>(
    items: Vec<W>,
    parent: &str,
    adapt: impl Fn(W) -> Result<D, AdaptError>,
) -> Result<Vec<D>, AdaptError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| adapt(item).map_err(|e| e.within(&format!("{parent}.{i}"))))
        .collect()
}

/// Convert a wire resource amount.
pub fn adapt_resource(resource: sdk::Resource) -> Resource {
    Resource::new(resource.value, resource.unit)
}

/// Convert wire hardware.
pub fn adapt_resources(resources: sdk::Resources) -> Resources {
    Resources {
        cpu: adapt_resource(resources.cpu),
        memory: adapt_resource(resources.memory),
        public_network_speed: adapt_resource(resources.public_network_speed),
        private_network_speed: adapt_resource(resources.private_network_speed),
    }
}

fn adapt_price(price: sdk::Price) -> Price {
    Price {
        hourly_price: price.hourly_price,
        monthly_price: price.monthly_price,
    }
}

/// Convert wire prices.
pub fn adapt_prices(prices: sdk::Prices) -> Prices {
    Prices {
        currency: prices.currency,
        currency_symbol: prices.currency_symbol,
        compute: adapt_price(prices.compute),
        storage: StoragePrices {
            local: adapt_price(prices.storage.local),
            central: adapt_price(prices.storage.central),
        },
    }
}

/// Convert a wire region.
pub fn adapt_region(region: sdk::Region) -> Region {
    Region::new(region.name, region.location)
}

/// Convert a catalog instance type.
pub fn adapt_instance_type(instance_type: sdk::InstanceType) -> Result<InstanceType, AdaptError> {
    let mut adapted = InstanceType::new(instance_type.name);
    if let Some(resources) = instance_type.resources {
        adapted = adapted.with_resources(adapt_resources(resources));
    }
    if let Some(prices) = instance_type.prices {
        adapted = adapted.with_prices(adapt_prices(prices));
    }
    if let Some(storage_types) = instance_type.storage_types {
        let storage_types = storage_types
            .iter()
            .map(|t| RootDiskStorageType::from_token(t))
            .collect::<Result<Vec<_>, _>>()
            .map_err(at("storageTypes"))?;
        adapted = adapted.with_storage_types(storage_types);
    }
    Ok(adapted)
}

/// Convert a wire contract.
pub fn adapt_contract(contract: sdk::Contract) -> Result<Contract, AdaptError> {
    let billing_frequency =
        ContractBillingFrequency::from_int(contract.billing_frequency).map_err(at("billingFrequency"))?;
    let term = ContractTerm::from_int(contract.term).map_err(at("term"))?;
    let contract_type = ContractType::from_token(&contract.contract_type).map_err(at("type"))?;
    let state = ContractState::from_token(&contract.state).map_err(at("state"))?;
    let renewals_at = parse_timestamp(&contract.renewals_at).map_err(at("renewalsAt"))?;
    let created_at = parse_timestamp(&contract.created_at).map_err(at("createdAt"))?;
    let ends_at = adapt_optional_timestamp(contract.ends_at.as_deref(), "endsAt")?;

    Contract::new(
        billing_frequency,
        term,
        contract_type,
        renewals_at,
        created_at,
        state,
        ends_at,
    )
    .map_err(at("term"))
}

/// Convert a wire image.
pub fn adapt_image(image: sdk::Image) -> Result<Image, AdaptError> {
    let mut adapted = Image::new(image.id, image.name, image.family, image.flavour, image.custom);
    adapted.version = image.version;
    adapted.architecture = image.architecture;
    adapted.state = image
        .state
        .as_deref()
        .map(ImageState::from_token)
        .transpose()
        .map_err(at("state"))?;
    adapted.state_reason = image.state_reason;
    adapted.region = image.region;
    adapted.created_at = adapt_optional_timestamp(image.created_at.as_deref(), "createdAt")?;
    adapted.updated_at = adapt_optional_timestamp(image.updated_at.as_deref(), "updatedAt")?;
    adapted.storage_size = image.storage_size.map(|s| StorageSize {
        size: s.size,
        unit: s.unit,
    });
    adapted.market_apps = image.market_apps;
    adapted.storage_types = image
        .storage_types
        .iter()
        .map(|t| RootDiskStorageType::from_token(t))
        .collect::<Result<_, _>>()
        .map_err(at("storageTypes"))?;
    Ok(adapted)
}

/// Convert a wire address.
pub fn adapt_ip(ip: sdk::Ip) -> Result<Ip, AdaptError> {
    Ok(Ip {
        version: IpVersion::from_int(ip.version).map_err(at("version"))?,
        network_type: NetworkType::from_token(&ip.network_type).map_err(at("networkType"))?,
        ip: ip.ip,
        prefix_length: ip.prefix_length,
        null_routed: ip.null_routed,
        main_ip: ip.main_ip,
        reverse_lookup: ip.reverse_lookup,
        ddos: ip.ddos.map(|d| Ddos {
            detection_profile: d.detection_profile,
            protection_type: d.protection_type,
        }),
    })
}

/// Convert a private network attachment.
pub fn adapt_private_network(private_network: sdk::PrivateNetwork) -> PrivateNetwork {
    PrivateNetwork {
        id: private_network.private_network_id,
        status: private_network.status,
        subnet: private_network.subnet,
    }
}

/// Convert a mounted ISO.
pub fn adapt_iso(iso: sdk::Iso) -> Iso {
    Iso {
        id: iso.id,
        name: iso.name,
    }
}

fn adapt_health_check(health_check: sdk::HealthCheck) -> Result<HealthCheck, AdaptError> {
    Ok(HealthCheck {
        method: HttpMethod::from_token(&health_check.method).map_err(at("method"))?,
        uri: health_check.uri,
        host: health_check.host,
        port: health_check.port,
    })
}

/// Convert load balancer settings.
pub fn adapt_load_balancer_configuration(
    configuration: sdk::LoadBalancerConfiguration,
) -> Result<LoadBalancerConfiguration, AdaptError> {
    Ok(LoadBalancerConfiguration {
        balance: Balance::from_token(&configuration.balance).map_err(at("balance"))?,
        health_check: configuration
            .health_check
            .map(adapt_health_check)
            .transpose()
            .map_err(within("healthCheck"))?,
        sticky_session: configuration.sticky_session.map(|s| StickySession {
            enabled: s.enabled,
            max_life_time: s.max_life_time,
        }),
        x_forwarded_for: configuration.x_forwarded_for,
        idle_timeout: configuration.idle_timeout,
        target_port: configuration.target_port,
    })
}

/// Convert a wire load balancer.
pub fn adapt_load_balancer(load_balancer: sdk::LoadBalancer) -> Result<LoadBalancer, AdaptError> {
    let mut load_balancer_type = InstanceType::new(load_balancer.load_balancer_type);
    if let Some(resources) = load_balancer.resources {
        load_balancer_type = load_balancer_type.with_resources(adapt_resources(resources));
    }

    Ok(LoadBalancer {
        id: Uuid::new(&load_balancer.id).map_err(at("id"))?,
        load_balancer_type,
        region: load_balancer.region,
        reference: load_balancer
            .reference
            .map(Reference::new)
            .transpose()
            .map_err(at("reference"))?,
        state: InstanceState::from_token(&load_balancer.state).map_err(at("state"))?,
        contract: adapt_contract(load_balancer.contract).map_err(within("contract"))?,
        started_at: adapt_optional_timestamp(load_balancer.started_at.as_deref(), "startedAt")?,
        ips: adapt_list(load_balancer.ips, "ips", adapt_ip)?,
        configuration: load_balancer
            .configuration
            .map(adapt_load_balancer_configuration)
            .transpose()
            .map_err(within("configuration"))?,
        private_network: load_balancer.private_network.map(adapt_private_network),
    })
}

/// Convert a wire auto scaling group.
pub fn adapt_auto_scaling_group(
    group: sdk::AutoScalingGroup,
) -> Result<AutoScalingGroup, AdaptError> {
    let optional = OptionalAutoScalingGroupValues {
        desired_amount: group.desired_amount,
        starts_at: adapt_optional_timestamp(group.starts_at.as_deref(), "startsAt")?,
        ends_at: adapt_optional_timestamp(group.ends_at.as_deref(), "endsAt")?,
        minimum_amount: group.minimum_amount,
        maximum_amount: group.maximum_amount,
        cpu_threshold: group.cpu_threshold,
        warmup_time: group.warmup_time,
        cooldown_time: group.cooldown_time,
        load_balancer: group
            .load_balancer
            .map(adapt_load_balancer)
            .transpose()
            .map_err(within("loadBalancer"))?,
    };

    AutoScalingGroup::new(
        Uuid::new(&group.id).map_err(at("id"))?,
        AutoScalingGroupType::from_token(&group.group_type).map_err(at("type"))?,
        AutoScalingGroupState::from_token(&group.state).map_err(at("state"))?,
        group.region,
        group
            .reference
            .map(Reference::new)
            .transpose()
            .map_err(at("reference"))?,
        parse_timestamp(&group.created_at).map_err(at("createdAt"))?,
        parse_timestamp(&group.updated_at).map_err(at("updatedAt"))?,
        optional,
    )
    .map_err(|e| {
        let field = match e {
            DomainError::InvalidSchedule { .. } => "startsAt",
            DomainError::InvalidAmounts { .. } => "minimumAmount",
            _ => "type",
        };
        AdaptError::new(field, e)
    })
}

/// Convert a wire instance.
pub fn adapt_instance(instance: sdk::Instance) -> Result<Instance, AdaptError> {
    let mut instance_type = InstanceType::new(instance.instance_type);
    if let Some(resources) = instance.resources {
        instance_type = instance_type.with_resources(adapt_resources(resources));
    }

    let optional = OptionalInstanceValues {
        reference: instance
            .reference
            .map(Reference::new)
            .transpose()
            .map_err(at("reference"))?,
        market_app_id: instance.market_app_id,
        ssh_key: None,
        started_at: adapt_optional_timestamp(instance.started_at.as_deref(), "startedAt")?,
        auto_scaling_group: instance
            .auto_scaling_group
            .map(adapt_auto_scaling_group)
            .transpose()
            .map_err(within("autoScalingGroup"))?,
        private_network: instance.private_network.map(adapt_private_network),
        iso: instance.iso.map(adapt_iso),
    };

    Ok(Instance::new(
        Uuid::new(&instance.id).map_err(at("id"))?,
        instance.region,
        instance_type,
        InstanceState::from_token(&instance.state).map_err(at("state"))?,
        instance.product_type,
        instance.has_public_ipv4,
        instance.has_private_network,
        RootDiskSize::new(instance.root_disk_size).map_err(at("rootDiskSize"))?,
        RootDiskStorageType::from_token(&instance.root_disk_storage_type)
            .map_err(at("rootDiskStorageType"))?,
        adapt_list(instance.ips, "ips", adapt_ip)?,
        adapt_contract(instance.contract).map_err(within("contract"))?,
        adapt_image(instance.image).map_err(within("image"))?,
        optional,
    ))
}

/// Build the launch request body. Optional fields are only set when present.
pub fn adapt_to_launch_instance_opts(instance: &CreateInstance) -> sdk::LaunchInstanceOpts {
    let mut opts = sdk::LaunchInstanceOpts::new(
        instance.region(),
        instance.instance_type(),
        instance.image_id(),
        instance.contract_type().as_str(),
        instance.contract_term().as_i64(),
        instance.billing_frequency().as_i64(),
        instance.root_disk_storage_type().as_str(),
    );

    let optional = instance.optional();
    if let Some(reference) = &optional.reference {
        opts.reference = Some(reference.as_str().to_string());
    }
    if let Some(market_app_id) = &optional.market_app_id {
        opts.market_app_id = Some(market_app_id.clone());
    }
    if let Some(ssh_key) = &optional.ssh_key {
        opts.ssh_key = Some(ssh_key.as_str().to_string());
    }
    if let Some(root_disk_size) = optional.root_disk_size {
        opts.root_disk_size = Some(root_disk_size.value());
    }
    opts
}

/// Build the update request body. Fields absent from the update stay unset.
pub fn adapt_to_update_instance_opts(instance: &UpdateInstance) -> sdk::UpdateInstanceOpts {
    let values = instance.values();
    sdk::UpdateInstanceOpts {
        instance_type: values.instance_type.clone(),
        reference: values.reference.as_ref().map(|r| r.as_str().to_string()),
        contract_type: values.contract_type.map(|t| t.as_str().to_string()),
        contract_term: values.contract_term.map(|t| t.as_i64()),
        billing_frequency: values.billing_frequency.map(|f| f.as_i64()),
        root_disk_size: values.root_disk_size.map(|s| s.value()),
    }
}

//! Read-only models of the `leaseweb_public_cloud_instances` data source.
//!
//! Nothing here is ever planned, so nested entities are plain structs and
//! optional values plain `Option`s. The models serialize to the JSON state
//! handed back to the host.

use serde::Serialize;

use crate::domain::{
    format_timestamp, AutoScalingGroup, Contract, HealthCheck, Image, Instance, Instances, Ip,
    Iso, LoadBalancer, LoadBalancerConfiguration, PrivateNetwork, Resource, Resources,
    StickySession,
};

/// Every instance of the account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstancesDataSourceModel {
    pub instances: Vec<InstanceDataSourceModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDataSourceModel {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourcesDataSourceModel {
    pub cpu: ResourceDataSourceModel,
    pub memory: ResourceDataSourceModel,
    pub public_network_speed: ResourceDataSourceModel,
    pub private_network_speed: ResourceDataSourceModel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDataSourceModel {
    pub id: String,
    pub name: String,
    pub family: String,
    pub flavour: String,
    pub custom: bool,
    pub version: Option<String>,
    pub architecture: Option<String>,
    pub market_apps: Vec<String>,
    pub storage_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDataSourceModel {
    pub billing_frequency: i64,
    pub term: i64,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub ends_at: Option<String>,
    pub renewals_at: String,
    pub created_at: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DdosDataSourceModel {
    pub detection_profile: String,
    pub protection_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpDataSourceModel {
    pub ip: String,
    pub prefix_length: String,
    pub version: i64,
    pub null_routed: bool,
    pub main_ip: bool,
    pub network_type: String,
    pub reverse_lookup: Option<String>,
    pub ddos: Option<DdosDataSourceModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivateNetworkDataSourceModel {
    pub id: String,
    pub status: String,
    pub subnet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsoDataSourceModel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheckDataSourceModel {
    pub method: String,
    pub uri: String,
    pub host: Option<String>,
    pub port: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StickySessionDataSourceModel {
    pub enabled: bool,
    pub max_life_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadBalancerConfigurationDataSourceModel {
    pub balance: String,
    pub health_check: Option<HealthCheckDataSourceModel>,
    pub sticky_session: Option<StickySessionDataSourceModel>,
    pub x_forwarded_for: bool,
    pub idle_timeout: i64,
    pub target_port: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadBalancerDataSourceModel {
    pub id: String,
    #[serde(rename = "type")]
    pub load_balancer_type: String,
    pub resources: Option<ResourcesDataSourceModel>,
    pub region: String,
    pub reference: Option<String>,
    pub state: String,
    pub contract: ContractDataSourceModel,
    pub started_at: Option<String>,
    pub ips: Vec<IpDataSourceModel>,
    pub configuration: Option<LoadBalancerConfigurationDataSourceModel>,
    pub private_network: Option<PrivateNetworkDataSourceModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoScalingGroupDataSourceModel {
    pub id: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub state: String,
    pub desired_amount: Option<i64>,
    pub region: String,
    pub reference: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub minimum_amount: Option<i64>,
    pub maximum_amount: Option<i64>,
    pub cpu_threshold: Option<i64>,
    pub warmup_time: Option<i64>,
    pub cooldown_time: Option<i64>,
    pub load_balancer: Option<LoadBalancerDataSourceModel>,
}

/// One instance as the data source reports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceDataSourceModel {
    pub id: String,
    pub region: String,
    pub reference: Option<String>,
    pub resources: Option<ResourcesDataSourceModel>,
    pub image: ImageDataSourceModel,
    pub state: String,
    pub product_type: String,
    pub has_public_ipv4: bool,
    pub has_private_network: bool,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub root_disk_size: i64,
    pub root_disk_storage_type: String,
    pub ips: Vec<IpDataSourceModel>,
    pub started_at: Option<String>,
    pub contract: ContractDataSourceModel,
    pub market_app_id: Option<String>,
    pub auto_scaling_group: Option<AutoScalingGroupDataSourceModel>,
    pub iso: Option<IsoDataSourceModel>,
    pub private_network: Option<PrivateNetworkDataSourceModel>,
}

fn adapt_resource(resource: &Resource) -> ResourceDataSourceModel {
    ResourceDataSourceModel {
        value: resource.value,
        unit: resource.unit.clone(),
    }
}

fn adapt_resources(resources: &Resources) -> ResourcesDataSourceModel {
    ResourcesDataSourceModel {
        cpu: adapt_resource(&resources.cpu),
        memory: adapt_resource(&resources.memory),
        public_network_speed: adapt_resource(&resources.public_network_speed),
        private_network_speed: adapt_resource(&resources.private_network_speed),
    }
}

fn adapt_image(image: &Image) -> ImageDataSourceModel {
    ImageDataSourceModel {
        id: image.id.clone(),
        name: image.name.clone(),
        family: image.family.clone(),
        flavour: image.flavour.clone(),
        custom: image.custom,
        version: image.version.clone(),
        architecture: image.architecture.clone(),
        market_apps: image.market_apps.clone(),
        storage_types: image
            .storage_types
            .iter()
            .map(|t| t.as_str().to_string())
            .collect(),
    }
}

fn adapt_contract(contract: &Contract) -> ContractDataSourceModel {
    ContractDataSourceModel {
        billing_frequency: contract.billing_frequency().as_i64(),
        term: contract.term().as_i64(),
        contract_type: contract.contract_type().as_str().to_string(),
        ends_at: contract.ends_at().as_ref().map(format_timestamp),
        renewals_at: format_timestamp(&contract.renewals_at()),
        created_at: format_timestamp(&contract.created_at()),
        state: contract.state().as_str().to_string(),
    }
}

fn adapt_ip(ip: &Ip) -> IpDataSourceModel {
    IpDataSourceModel {
        ip: ip.ip.clone(),
        prefix_length: ip.prefix_length.clone(),
        version: ip.version.as_i64(),
        null_routed: ip.null_routed,
        main_ip: ip.main_ip,
        network_type: ip.network_type.as_str().to_string(),
        reverse_lookup: ip.reverse_lookup.clone(),
        ddos: ip.ddos.as_ref().map(|ddos| DdosDataSourceModel {
            detection_profile: ddos.detection_profile.clone(),
            protection_type: ddos.protection_type.clone(),
        }),
    }
}

fn adapt_private_network(private_network: &PrivateNetwork) -> PrivateNetworkDataSourceModel {
    PrivateNetworkDataSourceModel {
        id: private_network.id.clone(),
        status: private_network.status.clone(),
        subnet: private_network.subnet.clone(),
    }
}

fn adapt_iso(iso: &Iso) -> IsoDataSourceModel {
    IsoDataSourceModel {
        id: iso.id.clone(),
        name: iso.name.clone(),
    }
}

fn adapt_health_check(health_check: &HealthCheck) -> HealthCheckDataSourceModel {
    HealthCheckDataSourceModel {
        method: health_check.method.as_str().to_string(),
        uri: health_check.uri.clone(),
        host: health_check.host.clone(),
        port: health_check.port,
    }
}

fn adapt_sticky_session(sticky_session: &StickySession) -> StickySessionDataSourceModel {
    StickySessionDataSourceModel {
        enabled: sticky_session.enabled,
        max_life_time: sticky_session.max_life_time,
    }
}

fn adapt_configuration(
    configuration: &LoadBalancerConfiguration,
) -> LoadBalancerConfigurationDataSourceModel {
    LoadBalancerConfigurationDataSourceModel {
        balance: configuration.balance.as_str().to_string(),
        health_check: configuration.health_check.as_ref().map(adapt_health_check),
        sticky_session: configuration.sticky_session.as_ref().map(adapt_sticky_session),
        x_forwarded_for: configuration.x_forwarded_for,
        idle_timeout: configuration.idle_timeout,
        target_port: configuration.target_port,
    }
}

fn adapt_load_balancer(load_balancer: &LoadBalancer) -> LoadBalancerDataSourceModel {
    LoadBalancerDataSourceModel {
        id: load_balancer.id.to_string(),
        load_balancer_type: load_balancer.load_balancer_type.name.clone(),
        resources: load_balancer
            .load_balancer_type
            .resources
            .as_ref()
            .map(adapt_resources),
        region: load_balancer.region.clone(),
        reference: load_balancer.reference.as_ref().map(|r| r.as_str().to_string()),
        state: load_balancer.state.as_str().to_string(),
        contract: adapt_contract(&load_balancer.contract),
        started_at: load_balancer.started_at.as_ref().map(format_timestamp),
        ips: load_balancer.ips.iter().map(adapt_ip).collect(),
        configuration: load_balancer.configuration.as_ref().map(adapt_configuration),
        private_network: load_balancer
            .private_network
            .as_ref()
            .map(adapt_private_network),
    }
}

fn adapt_auto_scaling_group(group: &AutoScalingGroup) -> AutoScalingGroupDataSourceModel {
    let optional = group.optional();
    AutoScalingGroupDataSourceModel {
        id: group.id().to_string(),
        group_type: group.group_type().as_str().to_string(),
        state: group.state().as_str().to_string(),
        desired_amount: optional.desired_amount,
        region: group.region().to_string(),
        reference: group.reference().map(|r| r.as_str().to_string()),
        created_at: format_timestamp(&group.created_at()),
        updated_at: format_timestamp(&group.updated_at()),
        starts_at: optional.starts_at.as_ref().map(format_timestamp),
        ends_at: optional.ends_at.as_ref().map(format_timestamp),
        minimum_amount: optional.minimum_amount,
        maximum_amount: optional.maximum_amount,
        cpu_threshold: optional.cpu_threshold,
        warmup_time: optional.warmup_time,
        cooldown_time: optional.cooldown_time,
        load_balancer: optional.load_balancer.as_ref().map(adapt_load_balancer),
    }
}

/// Data source model of one instance.
pub fn adapt_instance(instance: &Instance) -> InstanceDataSourceModel {
    InstanceDataSourceModel {
        id: instance.id.to_string(),
        region: instance.region.clone(),
        reference: instance.reference.as_ref().map(|r| r.as_str().to_string()),
        resources: instance.instance_type.resources.as_ref().map(adapt_resources),
        image: adapt_image(&instance.image),
        state: instance.state.as_str().to_string(),
        product_type: instance.product_type.clone(),
        has_public_ipv4: instance.has_public_ipv4,
        has_private_network: instance.has_private_network,
        instance_type: instance.instance_type.name.clone(),
        root_disk_size: instance.root_disk_size.value(),
        root_disk_storage_type: instance.root_disk_storage_type.as_str().to_string(),
        ips: instance.ips.iter().map(adapt_ip).collect(),
        started_at: instance.started_at.as_ref().map(format_timestamp),
        contract: adapt_contract(&instance.contract),
        market_app_id: instance.market_app_id.clone(),
        auto_scaling_group: instance
            .auto_scaling_group
            .as_ref()
            .map(adapt_auto_scaling_group),
        iso: instance.iso.as_ref().map(adapt_iso),
        private_network: instance.private_network.as_ref().map(adapt_private_network),
    }
}

/// Data source model of every instance, in wire order.
pub fn adapt_instances(instances: &Instances) -> InstancesDataSourceModel {
    InstancesDataSourceModel {
        instances: instances.iter().map(adapt_instance).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_adapt_instances_keeps_order() {
        let first = fixtures::instance();
        let mut second = fixtures::instance();
        second.id = crate::domain::Uuid::new_v4();

        let model = adapt_instances(&Instances::new(vec![first.clone(), second.clone()]));
        let ids: Vec<_> = model.instances.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec![first.id.to_string(), second.id.to_string()]);
    }

    #[test]
    fn test_adapt_instance() {
        let model = adapt_instance(&fixtures::instance());

        assert_eq!(model.id, fixtures::INSTANCE_ID);
        assert_eq!(model.instance_type, "lsw.m5a.4xlarge");
        assert_eq!(model.contract.contract_type, "MONTHLY");
        assert_eq!(model.contract.term, 3);
        assert_eq!(model.contract.ends_at, None);
        assert_eq!(model.ips.len(), 2);
        assert_eq!(model.ips[0].ip, "10.32.60.12");
        assert_eq!(
            model.ips[0].ddos.as_ref().map(|d| d.protection_type.as_str()),
            Some("ADVANCED")
        );
        assert_eq!(model.auto_scaling_group, None);
    }

    #[test]
    fn test_serializes_type_attributes() {
        let model = adapt_instance(&fixtures::instance());
        let json = serde_json::to_value(&model).unwrap();

        assert_eq!(json["type"], "lsw.m5a.4xlarge");
        assert_eq!(json["contract"]["type"], "MONTHLY");
        assert_eq!(json["reference"], "my webserver");
        assert!(json["iso"].is_null());
    }

    #[test]
    fn test_empty_instances() {
        let model = adapt_instances(&Instances::default());
        assert!(model.instances.is_empty());
    }
}

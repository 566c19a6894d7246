//! Request and response bodies of the public cloud REST API.
//!
//! Nullable wire fields are `Option`s defaulting to `None` when the key is
//! absent. Enumerated values stay raw tokens here; they are validated when
//! adapted into the domain model.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned with every list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Total number of items across all pages.
    pub total_count: i64,
    /// Offset of this page.
    pub offset: i64,
    /// Page size.
    pub limit: i64,
}

impl Metadata {
    /// Build metadata.
    pub fn new(total_count: i64, offset: i64, limit: i64) -> Self {
        Self {
            total_count,
            offset,
            limit,
        }
    }
}

/// A value with a unit, e.g. `{"value": 16384, "unit": "MiB"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Amount.
    pub value: f64,
    /// Unit.
    pub unit: String,
}

/// Hardware of an instance type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    /// vCPUs.
    pub cpu: Resource,
    /// Memory.
    pub memory: Resource,
    /// Public uplink.
    pub public_network_speed: Resource,
    /// Private uplink.
    pub private_network_speed: Resource,
}

/// Hourly and monthly price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Price per hour.
    pub hourly_price: String,
    /// Price per month.
    pub monthly_price: String,
}

/// Storage prices per storage type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePrices {
    /// Local storage.
    pub local: Price,
    /// Central storage.
    pub central: Price,
}

/// Prices of an instance type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prices {
    /// ISO currency code.
    pub currency: String,
    /// Currency symbol.
    pub currency_symbol: String,
    /// Compute price.
    pub compute: Price,
    /// Storage prices.
    pub storage: StoragePrices,
}

/// An entry of the instance type catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceType {
    /// Type name, e.g. `lsw.m5a.4xlarge`.
    pub name: String,
    /// Hardware.
    #[serde(default)]
    pub resources: Option<Resources>,
    /// Prices.
    #[serde(default)]
    pub prices: Option<Prices>,
    /// Supported root disk storage types.
    #[serde(default)]
    pub storage_types: Option<Vec<String>>,
}

/// An entry of the region catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region name, e.g. `eu-west-3`.
    pub name: String,
    /// Data center location.
    pub location: String,
}

/// Image size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSize {
    /// Amount.
    pub size: f64,
    /// Unit.
    pub unit: String,
}

/// An operating system image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// OS family.
    pub family: String,
    /// Flavour.
    pub flavour: String,
    /// Whether the image was made by the customer.
    pub custom: bool,
    /// Version.
    #[serde(default)]
    pub version: Option<String>,
    /// CPU architecture.
    #[serde(default)]
    pub architecture: Option<String>,
    /// State token.
    #[serde(default)]
    pub state: Option<String>,
    /// Why the image is in its state.
    #[serde(default)]
    pub state_reason: Option<String>,
    /// Region of a custom image.
    #[serde(default)]
    pub region: Option<String>,
    /// RFC 3339 creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// RFC 3339 update time.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Size of a custom image.
    #[serde(default)]
    pub storage_size: Option<StorageSize>,
    /// Market apps available on the image.
    #[serde(default)]
    pub market_apps: Vec<String>,
    /// Storage type tokens the image supports.
    #[serde(default)]
    pub storage_types: Vec<String>,
}

/// DDoS protection settings of an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ddos {
    /// Detection profile.
    pub detection_profile: String,
    /// Protection type.
    pub protection_type: String,
}

/// An IP address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ip {
    /// The address.
    pub ip: String,
    /// Prefix length.
    pub prefix_length: String,
    /// `4` or `6`.
    pub version: i64,
    /// Whether the address is null routed.
    pub null_routed: bool,
    /// Whether this is the main address.
    pub main_ip: bool,
    /// Network type token.
    pub network_type: String,
    /// Reverse DNS.
    #[serde(default)]
    pub reverse_lookup: Option<String>,
    /// DDoS settings.
    #[serde(default)]
    pub ddos: Option<Ddos>,
}

/// A contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Billing frequency in months.
    pub billing_frequency: i64,
    /// Term in months.
    pub term: i64,
    /// Contract type token.
    #[serde(rename = "type")]
    pub contract_type: String,
    /// RFC 3339 end time.
    #[serde(default)]
    pub ends_at: Option<String>,
    /// RFC 3339 renewal time.
    pub renewals_at: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Contract state token.
    pub state: String,
}

/// A private network attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateNetwork {
    /// Private network id.
    pub private_network_id: String,
    /// Attachment status.
    pub status: String,
    /// Subnet.
    pub subnet: String,
}

/// A mounted ISO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iso {
    /// ISO id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Sticky session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickySession {
    /// Enabled flag.
    pub enabled: bool,
    /// Session lifetime in seconds.
    pub max_life_time: i64,
}

/// Health check settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// HTTP method token.
    pub method: String,
    /// Path probed.
    pub uri: String,
    /// Host header.
    #[serde(default)]
    pub host: Option<String>,
    /// Port probed.
    pub port: i64,
}

/// Load balancer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerConfiguration {
    /// Balance algorithm token.
    pub balance: String,
    /// Health check.
    #[serde(default)]
    pub health_check: Option<HealthCheck>,
    /// Sticky sessions.
    #[serde(default)]
    pub sticky_session: Option<StickySession>,
    /// Whether `X-Forwarded-For` is added.
    pub x_forwarded_for: bool,
    /// Idle timeout in seconds.
    pub idle_timeout: i64,
    /// Backend port.
    pub target_port: i64,
}

/// A load balancer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    /// Load balancer id.
    pub id: String,
    /// Type name.
    #[serde(rename = "type")]
    pub load_balancer_type: String,
    /// Hardware.
    #[serde(default)]
    pub resources: Option<Resources>,
    /// Region.
    pub region: String,
    /// Label.
    #[serde(default)]
    pub reference: Option<String>,
    /// State token.
    pub state: String,
    /// RFC 3339 start time.
    #[serde(default)]
    pub started_at: Option<String>,
    /// Addresses.
    #[serde(default)]
    pub ips: Vec<Ip>,
    /// Contract.
    pub contract: Contract,
    /// Settings.
    #[serde(default)]
    pub configuration: Option<LoadBalancerConfiguration>,
    /// Private network.
    #[serde(default)]
    pub private_network: Option<PrivateNetwork>,
}

/// An auto scaling group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScalingGroup {
    /// Group id.
    pub id: String,
    /// Group type token.
    #[serde(rename = "type")]
    pub group_type: String,
    /// State token.
    pub state: String,
    /// Desired instance count.
    #[serde(default)]
    pub desired_amount: Option<i64>,
    /// Region.
    pub region: String,
    /// Label.
    #[serde(default)]
    pub reference: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 update time.
    pub updated_at: String,
    /// RFC 3339 schedule start.
    #[serde(default)]
    pub starts_at: Option<String>,
    /// RFC 3339 schedule end.
    #[serde(default)]
    pub ends_at: Option<String>,
    /// Lower bound.
    #[serde(default)]
    pub minimum_amount: Option<i64>,
    /// Upper bound.
    #[serde(default)]
    pub maximum_amount: Option<i64>,
    /// CPU threshold in percent.
    #[serde(default)]
    pub cpu_threshold: Option<i64>,
    /// Warmup in seconds.
    #[serde(default)]
    pub warmup_time: Option<i64>,
    /// Cooldown in seconds.
    #[serde(default)]
    pub cooldown_time: Option<i64>,
    /// Load balancer in front of the group.
    #[serde(default)]
    pub load_balancer: Option<LoadBalancer>,
}

/// An instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Instance id.
    pub id: String,
    /// Instance type name.
    #[serde(rename = "type")]
    pub instance_type: String,
    /// Hardware of the instance type.
    #[serde(default)]
    pub resources: Option<Resources>,
    /// Region.
    pub region: String,
    /// Label.
    #[serde(default)]
    pub reference: Option<String>,
    /// Image.
    pub image: Image,
    /// State token.
    pub state: String,
    /// Product type.
    pub product_type: String,
    /// Whether a public IPv4 address is attached.
    pub has_public_ipv4: bool,
    /// Whether a private network is included.
    pub has_private_network: bool,
    /// Root disk size in GiB.
    pub root_disk_size: i64,
    /// Root disk storage type token.
    pub root_disk_storage_type: String,
    /// Addresses.
    #[serde(default)]
    pub ips: Vec<Ip>,
    /// Contract.
    pub contract: Contract,
    /// Market app installed at launch.
    #[serde(default)]
    pub market_app_id: Option<String>,
    /// RFC 3339 start time.
    #[serde(default)]
    pub started_at: Option<String>,
    /// Group the instance belongs to.
    #[serde(default)]
    pub auto_scaling_group: Option<AutoScalingGroup>,
    /// Private network.
    #[serde(default)]
    pub private_network: Option<PrivateNetwork>,
    /// Mounted ISO.
    #[serde(default)]
    pub iso: Option<Iso>,
}

/// Body of `POST /instances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceOpts {
    /// Region.
    pub region: String,
    /// Instance type name.
    #[serde(rename = "type")]
    pub instance_type: String,
    /// Image id.
    pub image_id: String,
    /// Contract type token.
    pub contract_type: String,
    /// Contract term in months.
    pub contract_term: i64,
    /// Billing frequency in months.
    pub billing_frequency: i64,
    /// Root disk storage type token.
    pub root_disk_storage_type: String,
    /// Label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Market app to install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_app_id: Option<String>,
    /// SSH key to install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    /// Root disk size in GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_disk_size: Option<i64>,
}

impl LaunchInstanceOpts {
    /// Opts with every mandatory field and no optional one.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        region: impl Into<String>,
        instance_type: impl Into<String>,
        image_id: impl Into<String>,
        contract_type: impl Into<String>,
        contract_term: i64,
        billing_frequency: i64,
        root_disk_storage_type: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            instance_type: instance_type.into(),
            image_id: image_id.into(),
            contract_type: contract_type.into(),
            contract_term,
            billing_frequency,
            root_disk_storage_type: root_disk_storage_type.into(),
            ..Default::default()
        }
    }
}

/// Body of `PUT /instances/{id}`. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstanceOpts {
    /// New instance type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// New contract type token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    /// New term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_term: Option<i64>,
    /// New billing frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_frequency: Option<i64>,
    /// New root disk size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_disk_size: Option<i64>,
}

impl UpdateInstanceOpts {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A page of instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceList {
    /// Instances on this page.
    pub instances: Vec<Instance>,
    /// Pagination metadata.
    #[serde(rename = "_metadata")]
    pub metadata: Metadata,
}

/// A page of regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionList {
    /// Regions on this page.
    pub regions: Vec<Region>,
    /// Pagination metadata.
    #[serde(rename = "_metadata")]
    pub metadata: Metadata,
}

/// A page of instance types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceTypeList {
    /// Instance types on this page.
    pub instance_types: Vec<InstanceType>,
    /// Pagination metadata.
    #[serde(rename = "_metadata")]
    pub metadata: Metadata,
}

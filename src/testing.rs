//! In-memory doubles and fixtures for exercising the provider without a
//! network.
//!
//! [`FakePublicCloudApi`] stands in for the REST client underneath the
//! repository; [`FakePublicCloudService`] stands in for the whole service when
//! only the facade or the handlers are under test.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use leaseweb_provider::testing::{fixtures, FakePublicCloudApi};
//!
//! let api = Arc::new(
//!     FakePublicCloudApi::new()
//!         .with_instance(fixtures::sdk_instance())
//!         .with_instance_types("eu-west-3", ["lsw.m5a.4xlarge"]),
//! );
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::context::Context;
use crate::domain::{
    Contract, ContractState, CreateInstance, Instance, InstanceState, InstanceType, InstanceTypes,
    Instances, Region, Regions, UpdateInstance, Uuid,
};
use crate::error::{HttpResponse, ServiceError};
use crate::sdk::{
    self, ApiError, InstanceList, InstanceTypeList, LaunchInstanceOpts, ListRequest, Metadata,
    PublicCloudApi, RegionList, UpdateInstanceOpts,
};
use crate::service::PublicCloudService;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found() -> ApiError {
    ApiError::http(HttpResponse::new(
        404,
        r#"{"errorCode":"404","errorMessage":"Resource not found"}"#,
    ))
}

fn page<T: Clone>(items: &[T], request: ListRequest, page_limit: i64) -> (Vec<T>, Metadata) {
    let limit = request.limit.min(page_limit).max(1);
    let offset = request.offset.max(0);
    let total = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let items: Vec<T> = items
        .iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();
    (items, Metadata::new(total, offset, limit))
}

#[derive(Debug, Default)]
struct ApiState {
    instances: Vec<sdk::Instance>,
    regions: Vec<sdk::Region>,
    instance_types: BTreeMap<String, Vec<sdk::InstanceType>>,
    update_instance_types: BTreeMap<String, Vec<sdk::InstanceType>>,
    failures: BTreeMap<String, HttpResponse>,
    calls: BTreeMap<String, usize>,
    launched: Vec<LaunchInstanceOpts>,
    updated: Vec<(String, UpdateInstanceOpts)>,
}

impl ApiState {
    fn record(&mut self, op: &str) -> Result<(), ApiError> {
        *self.calls.entry(op.to_string()).or_default() += 1;
        match self.failures.get(op) {
            Some(response) => Err(ApiError::http(response.clone())),
            None => Ok(()),
        }
    }
}

/// A [`PublicCloudApi`] serving instances and catalogs from memory.
///
/// Calls are counted per operation name when the call is first polled, so a
/// call abandoned because its context was already cancelled is not counted.
#[derive(Debug)]
pub struct FakePublicCloudApi {
    state: Mutex<ApiState>,
    page_limit: i64,
}

impl Default for FakePublicCloudApi {
    fn default() -> Self {
        Self {
            state: Mutex::default(),
            page_limit: i64::MAX,
        }
    }
}

impl FakePublicCloudApi {
    /// An API with no instances and empty catalogs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve at most `limit` items per page regardless of the request.
    pub fn with_page_limit(mut self, limit: i64) -> Self {
        self.page_limit = limit;
        self
    }

    /// Add an instance.
    pub fn with_instance(self, instance: sdk::Instance) -> Self {
        lock(&self.state).instances.push(instance);
        self
    }

    /// Add a region.
    pub fn with_region(self, name: &str, location: &str) -> Self {
        lock(&self.state).regions.push(sdk::Region {
            name: name.to_string(),
            location: location.to_string(),
        });
        self
    }

    /// Instance types that can be launched in `region`.
    pub fn with_instance_types<I, S>(self, region: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.state)
            .instance_types
            .insert(region.to_string(), catalog(names));
        self
    }

    /// Instance types the instance `id` can be changed to.
    pub fn with_update_instance_types<I, S>(self, id: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.state)
            .update_instance_types
            .insert(id.to_string(), catalog(names));
        self
    }

    /// Make every call of `op` fail with `response`.
    pub fn with_failure(self, op: &str, response: HttpResponse) -> Self {
        lock(&self.state).failures.insert(op.to_string(), response);
        self
    }

    /// How often `op` was called.
    pub fn calls(&self, op: &str) -> usize {
        lock(&self.state).calls.get(op).copied().unwrap_or(0)
    }

    /// Bodies of every launch request, in order.
    pub fn launched(&self) -> Vec<LaunchInstanceOpts> {
        lock(&self.state).launched.clone()
    }

    /// Ids and bodies of every update request, in order.
    pub fn updated(&self) -> Vec<(String, UpdateInstanceOpts)> {
        lock(&self.state).updated.clone()
    }
}

fn catalog<I, S>(names: I) -> Vec<sdk::InstanceType>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(|name| sdk::InstanceType {
            name: name.into(),
            ..Default::default()
        })
        .collect()
}

#[async_trait]
impl PublicCloudApi for FakePublicCloudApi {
    async fn get_instance_list(&self, request: ListRequest) -> Result<InstanceList, ApiError> {
        let mut state = lock(&self.state);
        state.record("get_instance_list")?;
        let (instances, metadata) = page(&state.instances, request, self.page_limit);
        Ok(InstanceList {
            instances,
            metadata,
        })
    }

    async fn get_instance(&self, id: &str) -> Result<sdk::Instance, ApiError> {
        let mut state = lock(&self.state);
        state.record("get_instance")?;
        state
            .instances
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn launch_instance(&self, opts: LaunchInstanceOpts) -> Result<sdk::Instance, ApiError> {
        let mut state = lock(&self.state);
        state.record("launch_instance")?;

        let mut instance = fixtures::sdk_instance();
        instance.id = Uuid::new_v4().to_string();
        instance.region = opts.region.clone();
        instance.instance_type = opts.instance_type.clone();
        instance.image.id = opts.image_id.clone();
        instance.state = "CREATING".to_string();
        instance.reference = opts.reference.clone();
        instance.market_app_id = opts.market_app_id.clone();
        instance.root_disk_storage_type = opts.root_disk_storage_type.clone();
        instance.root_disk_size = opts.root_disk_size.unwrap_or(instance.root_disk_size);
        instance.contract.contract_type = opts.contract_type.clone();
        instance.contract.term = opts.contract_term;
        instance.contract.billing_frequency = opts.billing_frequency;
        instance.started_at = None;

        state.launched.push(opts);
        state.instances.push(instance.clone());
        Ok(instance)
    }

    async fn update_instance(
        &self,
        id: &str,
        opts: UpdateInstanceOpts,
    ) -> Result<sdk::Instance, ApiError> {
        let mut state = lock(&self.state);
        state.record("update_instance")?;
        state.updated.push((id.to_string(), opts.clone()));

        let instance = state
            .instances
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(not_found)?;
        if let Some(instance_type) = opts.instance_type {
            instance.instance_type = instance_type;
        }
        if let Some(reference) = opts.reference {
            instance.reference = Some(reference);
        }
        if let Some(contract_type) = opts.contract_type {
            instance.contract.contract_type = contract_type;
        }
        if let Some(term) = opts.contract_term {
            instance.contract.term = term;
        }
        if let Some(billing_frequency) = opts.billing_frequency {
            instance.contract.billing_frequency = billing_frequency;
        }
        if let Some(size) = opts.root_disk_size {
            instance.root_disk_size = size;
        }
        Ok(instance.clone())
    }

    async fn terminate_instance(&self, id: &str) -> Result<(), ApiError> {
        let mut state = lock(&self.state);
        state.record("terminate_instance")?;
        let before = state.instances.len();
        state.instances.retain(|i| i.id != id);
        if state.instances.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn get_region_list(&self, request: ListRequest) -> Result<RegionList, ApiError> {
        let mut state = lock(&self.state);
        state.record("get_region_list")?;
        let (regions, metadata) = page(&state.regions, request, self.page_limit);
        Ok(RegionList { regions, metadata })
    }

    async fn get_instance_type_list(
        &self,
        region: &str,
        request: ListRequest,
    ) -> Result<InstanceTypeList, ApiError> {
        let mut state = lock(&self.state);
        state.record("get_instance_type_list")?;
        let all = state.instance_types.get(region).cloned().unwrap_or_default();
        let (instance_types, metadata) = page(&all, request, self.page_limit);
        Ok(InstanceTypeList {
            instance_types,
            metadata,
        })
    }

    async fn get_update_instance_type_list(
        &self,
        id: &str,
        request: ListRequest,
    ) -> Result<InstanceTypeList, ApiError> {
        let mut state = lock(&self.state);
        state.record("get_update_instance_type_list")?;
        let all = state
            .update_instance_types
            .get(id)
            .cloned()
            .unwrap_or_default();
        let (instance_types, metadata) = page(&all, request, self.page_limit);
        Ok(InstanceTypeList {
            instance_types,
            metadata,
        })
    }
}

#[derive(Debug)]
struct ServiceState {
    instances: Vec<Instance>,
    regions: Vec<Region>,
    instance_types: BTreeMap<String, Vec<String>>,
    update_instance_types: BTreeMap<String, Vec<String>>,
    termination: (bool, Option<String>),
    failures: BTreeMap<String, String>,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
            regions: Vec::new(),
            instance_types: BTreeMap::new(),
            update_instance_types: BTreeMap::new(),
            termination: (true, None),
            failures: BTreeMap::new(),
        }
    }
}

impl ServiceState {
    fn check(&self, op: &'static str) -> Result<(), ServiceError> {
        match self.failures.get(op) {
            Some(message) => Err(ServiceError::general(op, message.clone())),
            None => Ok(()),
        }
    }

    fn find(&self, id: Uuid, op: &'static str) -> Result<Instance, ServiceError> {
        self.instances
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::general(op, format!("instance {id} not found")))
    }
}

/// A [`PublicCloudService`] over domain values held in memory.
///
/// Nothing is validated beyond what the domain constructors enforce.
#[derive(Debug, Default)]
pub struct FakePublicCloudService {
    state: Mutex<ServiceState>,
}

impl FakePublicCloudService {
    /// A service with no instances and every instance terminable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance.
    pub fn with_instance(self, instance: Instance) -> Self {
        lock(&self.state).instances.push(instance);
        self
    }

    /// Add a region.
    pub fn with_region(self, name: &str, location: &str) -> Self {
        lock(&self.state).regions.push(Region::new(name, location));
        self
    }

    /// Instance types that can be launched in `region`.
    pub fn with_instance_types<I, S>(self, region: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.state)
            .instance_types
            .insert(region.to_string(), names.into_iter().map(Into::into).collect());
        self
    }

    /// Instance types the instance `id` can be changed to.
    pub fn with_update_instance_types<I, S>(self, id: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.state)
            .update_instance_types
            .insert(id.to_string(), names.into_iter().map(Into::into).collect());
        self
    }

    /// The verdict every termination check returns.
    pub fn with_termination(self, allowed: bool, reason: Option<String>) -> Self {
        lock(&self.state).termination = (allowed, reason);
        self
    }

    /// Make every call of `op` fail with `message`.
    pub fn with_failure(self, op: &str, message: impl Into<String>) -> Self {
        lock(&self.state)
            .failures
            .insert(op.to_string(), message.into());
        self
    }
}

fn instance_types(names: Option<&Vec<String>>) -> InstanceTypes {
    InstanceTypes::new(
        names
            .map(|names| names.iter().map(InstanceType::new).collect())
            .unwrap_or_default(),
    )
}

#[async_trait]
impl PublicCloudService for FakePublicCloudService {
    async fn get_all_instances(&self, ctx: &Context) -> Result<Instances, ServiceError> {
        ctx.check()
            .map_err(|e| ServiceError::general("get_all_instances", e))?;
        let state = lock(&self.state);
        state.check("get_all_instances")?;
        Ok(Instances::new(state.instances.clone()))
    }

    async fn get_instance(&self, id: Uuid, ctx: &Context) -> Result<Instance, ServiceError> {
        ctx.check().map_err(|e| ServiceError::general("get_instance", e))?;
        let state = lock(&self.state);
        state.check("get_instance")?;
        state.find(id, "get_instance")
    }

    async fn launch_instance(
        &self,
        instance: &CreateInstance,
        ctx: &Context,
    ) -> Result<Instance, ServiceError> {
        ctx.check()
            .map_err(|e| ServiceError::general("launch_instance", e))?;
        let mut state = lock(&self.state);
        state.check("launch_instance")?;

        let template = fixtures::instance();
        let contract = Contract::new(
            instance.billing_frequency(),
            instance.contract_term(),
            instance.contract_type(),
            template.contract.renewals_at(),
            template.contract.created_at(),
            ContractState::Active,
            None,
        )
        .map_err(|e| ServiceError::general("launch_instance", e))?;

        let optional = instance.optional();
        let mut launched = template;
        launched.id = Uuid::new_v4();
        launched.region = instance.region().to_string();
        launched.instance_type = InstanceType::new(instance.instance_type());
        launched.state = InstanceState::Creating;
        launched.root_disk_storage_type = instance.root_disk_storage_type();
        launched.image.id = instance.image_id().to_string();
        launched.contract = contract;
        launched.reference = optional.reference.clone();
        launched.market_app_id = optional.market_app_id.clone();
        launched.ssh_key = None;
        launched.started_at = None;
        if let Some(size) = optional.root_disk_size {
            launched.root_disk_size = size;
        }

        state.instances.push(launched.clone());
        Ok(launched)
    }

    async fn update_instance(
        &self,
        instance: &UpdateInstance,
        ctx: &Context,
    ) -> Result<Instance, ServiceError> {
        ctx.check()
            .map_err(|e| ServiceError::general("update_instance", e))?;
        let mut state = lock(&self.state);
        state.check("update_instance")?;

        let values = instance.values();
        let current = state.find(instance.id(), "update_instance")?;
        let contract = Contract::new(
            values
                .billing_frequency
                .unwrap_or(current.contract.billing_frequency()),
            values.contract_term.unwrap_or(current.contract.term()),
            values.contract_type.unwrap_or(current.contract.contract_type()),
            current.contract.renewals_at(),
            current.contract.created_at(),
            current.contract.state(),
            current.contract.ends_at(),
        )
        .map_err(|e| ServiceError::general("update_instance", e))?;

        let stored = state
            .instances
            .iter_mut()
            .find(|i| i.id == instance.id())
            .ok_or_else(|| ServiceError::general("update_instance", "instance vanished"))?;
        stored.contract = contract;
        if let Some(instance_type) = &values.instance_type {
            stored.instance_type = InstanceType::new(instance_type.as_str());
        }
        if let Some(reference) = &values.reference {
            stored.reference = Some(reference.clone());
        }
        if let Some(size) = values.root_disk_size {
            stored.root_disk_size = size;
        }
        Ok(stored.clone())
    }

    async fn delete_instance(&self, id: Uuid, ctx: &Context) -> Result<(), ServiceError> {
        ctx.check()
            .map_err(|e| ServiceError::general("delete_instance", e))?;
        let mut state = lock(&self.state);
        state.check("delete_instance")?;
        state.instances.retain(|i| i.id != id);
        Ok(())
    }

    async fn can_instance_be_terminated(
        &self,
        _id: Uuid,
        ctx: &Context,
    ) -> Result<(bool, Option<String>), ServiceError> {
        ctx.check()
            .map_err(|e| ServiceError::general("can_instance_be_terminated", e))?;
        let state = lock(&self.state);
        state.check("can_instance_be_terminated")?;
        Ok(state.termination.clone())
    }

    async fn get_available_instance_types_for_region(
        &self,
        region: &str,
        ctx: &Context,
    ) -> Result<InstanceTypes, ServiceError> {
        ctx.check()
            .map_err(|e| ServiceError::general("get_available_instance_types_for_region", e))?;
        let state = lock(&self.state);
        state.check("get_available_instance_types_for_region")?;
        Ok(instance_types(state.instance_types.get(region)))
    }

    async fn get_available_instance_types_for_update(
        &self,
        id: Uuid,
        ctx: &Context,
    ) -> Result<InstanceTypes, ServiceError> {
        ctx.check()
            .map_err(|e| ServiceError::general("get_available_instance_types_for_update", e))?;
        let state = lock(&self.state);
        state.check("get_available_instance_types_for_update")?;
        Ok(instance_types(
            state.update_instance_types.get(&id.to_string()),
        ))
    }

    async fn get_regions(&self, ctx: &Context) -> Result<Regions, ServiceError> {
        ctx.check().map_err(|e| ServiceError::general("get_regions", e))?;
        let state = lock(&self.state);
        state.check("get_regions")?;
        Ok(Regions::new(state.regions.clone()))
    }
}

/// Shared values for tests.
#[allow(clippy::expect_used)]
pub mod fixtures {
    use crate::domain::{
        AutoScalingGroup, AutoScalingGroupState, AutoScalingGroupType, Balance, ContractBillingFrequency,
        ContractTerm, ContractType, CreateInstance, HealthCheck, HttpMethod, ImageState,
        Instance, InstanceState, InstanceType, Iso, LoadBalancer, LoadBalancerConfiguration,
        OptionalAutoScalingGroupValues, OptionalCreateInstanceValues, PrivateNetwork, Reference,
        RootDiskSize, RootDiskStorageType, SshKey, StickySession, StorageSize, Uuid,
        parse_timestamp,
    };
    use crate::model::resource::{
        AutoScalingGroupResourceModel, ContractResourceModel, ImageResourceModel,
        InstanceResourceModel, IpResourceModel, IsoResourceModel, PrivateNetworkResourceModel,
        StorageSizeResourceModel,
    };
    use crate::model::object_type;
    use crate::schema::AttributeType;
    use crate::repository::adapters;
    use crate::sdk;
    use crate::types::{BoolValue, Int64Value, ListValue, ObjectModel, ObjectValue, StringValue};

    /// Id of the instance returned by [`sdk_instance`].
    pub const INSTANCE_ID: &str = "ace712e9-a166-47f1-9065-4af0f7e7fce1";

    /// A well formed ed25519 public key.
    pub const SSH_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIJdKq3vSC3mQz1e1OXJX5lBdeUsy3zs5wUbPhP2xK8Qe user@host";

    fn contract() -> sdk::Contract {
        sdk::Contract {
            billing_frequency: 1,
            term: 3,
            contract_type: "MONTHLY".to_string(),
            ends_at: None,
            renewals_at: "2022-09-08T00:00:00Z".to_string(),
            created_at: "2019-09-08T00:00:00Z".to_string(),
            state: "ACTIVE".to_string(),
        }
    }

    /// A running monthly instance as the API returns it.
    pub fn sdk_instance() -> sdk::Instance {
        sdk::Instance {
            id: INSTANCE_ID.to_string(),
            instance_type: "lsw.m5a.4xlarge".to_string(),
            resources: None,
            region: "eu-west-3".to_string(),
            reference: Some("my webserver".to_string()),
            image: sdk::Image {
                id: "UBUNTU_20_04_64BIT".to_string(),
                name: "Ubuntu 20.04 LTS (x86_64)".to_string(),
                family: "linux".to_string(),
                flavour: "ubuntu".to_string(),
                custom: false,
                storage_types: vec!["CENTRAL".to_string(), "LOCAL".to_string()],
                ..Default::default()
            },
            state: "RUNNING".to_string(),
            product_type: "INSTANCE".to_string(),
            has_public_ipv4: true,
            has_private_network: false,
            root_disk_size: 55,
            root_disk_storage_type: "CENTRAL".to_string(),
            ips: vec![
                sdk::Ip {
                    ip: "10.32.60.12".to_string(),
                    prefix_length: "28".to_string(),
                    version: 4,
                    null_routed: false,
                    main_ip: true,
                    network_type: "PUBLIC".to_string(),
                    reverse_lookup: Some("a-b-c-d.example.com".to_string()),
                    ddos: Some(sdk::Ddos {
                        detection_profile: "ADVANCED_DEFAULT".to_string(),
                        protection_type: "ADVANCED".to_string(),
                    }),
                },
                sdk::Ip {
                    ip: "192.168.0.1".to_string(),
                    prefix_length: "24".to_string(),
                    version: 4,
                    null_routed: false,
                    main_ip: false,
                    network_type: "INTERNAL".to_string(),
                    reverse_lookup: None,
                    ddos: None,
                },
            ],
            contract: contract(),
            market_app_id: None,
            started_at: Some("2019-09-08T00:00:00Z".to_string()),
            auto_scaling_group: None,
            private_network: None,
            iso: None,
        }
    }

    /// [`sdk_instance`] in the domain model.
    pub fn instance() -> Instance {
        adapters::adapt_instance(sdk_instance()).expect("fixture instance is valid")
    }

    /// [`instance`] with a contract that has an end date.
    pub fn instance_with_contract_end() -> Instance {
        let mut wire = sdk_instance();
        wire.contract.ends_at = Some("2023-12-14T17:09:47Z".to_string());
        adapters::adapt_instance(wire).expect("fixture instance is valid")
    }

    /// An instance with every optional value set, nested ones included.
    pub fn instance_with_everything() -> Instance {
        let mut instance = instance();
        let private_network = PrivateNetwork {
            id: "01H7PCNTTNJ9VGZ8VSG0ZRG6S3".to_string(),
            status: "CONNECTED".to_string(),
            subnet: "10.0.0.0/24".to_string(),
        };

        let load_balancer = LoadBalancer {
            id: Uuid::new("32d4b0b9-ba1d-4e84-8e9c-d1c0d7dbda5e").expect("valid uuid"),
            load_balancer_type: InstanceType::new("lsw.m3.large"),
            region: "eu-west-3".to_string(),
            reference: Some(Reference::new("balancer").expect("valid reference")),
            state: InstanceState::Running,
            contract: instance.contract.clone(),
            started_at: Some(parse_timestamp("2019-09-08T00:00:00Z").expect("valid timestamp")),
            ips: instance.ips.clone(),
            configuration: Some(LoadBalancerConfiguration {
                balance: Balance::RoundRobin,
                health_check: Some(HealthCheck {
                    method: HttpMethod::Get,
                    uri: "/health".to_string(),
                    host: Some("example.com".to_string()),
                    port: 8080,
                }),
                sticky_session: Some(StickySession {
                    enabled: true,
                    max_life_time: 300,
                }),
                x_forwarded_for: true,
                idle_timeout: 30,
                target_port: 80,
            }),
            private_network: Some(private_network.clone()),
        };

        instance.auto_scaling_group = Some(
            AutoScalingGroup::new(
                Uuid::new("90b9f2cc-c655-40ea-b01a-58c00e175c96").expect("valid uuid"),
                AutoScalingGroupType::CpuBased,
                AutoScalingGroupState::Active,
                "eu-west-3",
                Some(Reference::new("group").expect("valid reference")),
                parse_timestamp("2023-10-01T00:00:00Z").expect("valid timestamp"),
                parse_timestamp("2023-10-02T00:00:00Z").expect("valid timestamp"),
                OptionalAutoScalingGroupValues {
                    desired_amount: Some(2),
                    starts_at: None,
                    ends_at: None,
                    minimum_amount: Some(1),
                    maximum_amount: Some(3),
                    cpu_threshold: Some(80),
                    warmup_time: Some(300),
                    cooldown_time: Some(600),
                    load_balancer: Some(load_balancer),
                },
            )
            .expect("valid group"),
        );
        instance.private_network = Some(private_network);
        instance.iso = Some(Iso {
            id: "GRML".to_string(),
            name: "GRML 2022.11".to_string(),
        });
        instance.market_app_id = Some("WORDPRESS".to_string());
        instance.ssh_key = Some(SshKey::new(SSH_KEY).expect("valid key"));

        instance.image.version = Some("20.04".to_string());
        instance.image.architecture = Some("64bit".to_string());
        instance.image.state = Some(ImageState::Ready);
        instance.image.state_reason = Some("available".to_string());
        instance.image.region = Some("eu-west-3".to_string());
        instance.image.created_at =
            Some(parse_timestamp("2022-01-01T00:00:00Z").expect("valid timestamp"));
        instance.image.updated_at =
            Some(parse_timestamp("2022-02-01T00:00:00Z").expect("valid timestamp"));
        instance.image.storage_size = Some(StorageSize {
            size: 12.5,
            unit: "GB".to_string(),
        });
        instance.image.market_apps = vec!["WORDPRESS".to_string(), "CPANEL".to_string()];
        instance
    }

    /// A monthly launch request in eu-west-3.
    pub fn create_instance() -> CreateInstance {
        CreateInstance::new(
            "eu-west-3",
            "lsw.m5a.4xlarge",
            RootDiskStorageType::Central,
            "UBUNTU_20_04_64BIT",
            ContractType::Monthly,
            ContractTerm::Three,
            ContractBillingFrequency::One,
            OptionalCreateInstanceValues {
                root_disk_size: Some(RootDiskSize::new(55).expect("valid size")),
                ..Default::default()
            },
        )
        .expect("fixture launch request is valid")
    }

    /// A plan for a new instance, with computed attributes unknown.
    pub fn create_plan() -> InstanceResourceModel {
        let image = ImageResourceModel {
            id: StringValue::known("UBUNTU_20_04_64BIT"),
            name: StringValue::Unknown,
            family: StringValue::Unknown,
            flavour: StringValue::Unknown,
            custom: BoolValue::Unknown,
            version: StringValue::Unknown,
            architecture: StringValue::Unknown,
            state: StringValue::Unknown,
            state_reason: StringValue::Unknown,
            region: StringValue::Unknown,
            created_at: StringValue::Unknown,
            updated_at: StringValue::Unknown,
            storage_size: ObjectValue::unknown(StorageSizeResourceModel::attribute_types()),
            market_apps: ListValue::unknown(AttributeType::String),
            storage_types: ListValue::unknown(AttributeType::String),
        };
        let contract = ContractResourceModel {
            billing_frequency: Int64Value::known(1),
            term: Int64Value::known(3),
            contract_type: StringValue::known("MONTHLY"),
            ends_at: StringValue::Unknown,
            renewals_at: StringValue::Unknown,
            created_at: StringValue::Unknown,
            state: StringValue::Unknown,
        };

        InstanceResourceModel {
            id: StringValue::Unknown,
            region: StringValue::known("eu-west-3"),
            reference: StringValue::known("r"),
            image: ObjectValue::from_model(image).expect("valid image model"),
            state: StringValue::Unknown,
            product_type: StringValue::Unknown,
            has_public_ipv4: BoolValue::Unknown,
            has_private_network: BoolValue::Unknown,
            instance_type: StringValue::known("lsw.m5a.4xlarge"),
            root_disk_size: Int64Value::known(55),
            root_disk_storage_type: StringValue::known("CENTRAL"),
            ips: ListValue::unknown(object_type::<IpResourceModel>()),
            started_at: StringValue::Unknown,
            contract: ObjectValue::from_model(contract).expect("valid contract model"),
            market_app_id: StringValue::known("m"),
            ssh_key: StringValue::Null,
            auto_scaling_group: ObjectValue::unknown(AutoScalingGroupResourceModel::attribute_types()),
            private_network: ObjectValue::unknown(PrivateNetworkResourceModel::attribute_types()),
            iso: ObjectValue::unknown(IsoResourceModel::attribute_types()),
        }
    }
}

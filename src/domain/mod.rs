//! Domain model: entities, value objects and enumerations with their
//! invariants. Pure; no I/O.

mod auto_scaling_group;
mod catalog;
mod contract;
mod enums;
mod error;
mod image;
mod instance;
mod ip;
mod load_balancer;
mod value_objects;

pub use auto_scaling_group::{AutoScalingGroup, OptionalAutoScalingGroupValues};
pub use catalog::{
    InstanceType, InstanceTypes, Price, Prices, Region, Regions, Resource, Resources,
    StoragePrices,
};
pub use contract::{validate_contract_term, Contract};
pub use enums::{
    AutoScalingGroupState, AutoScalingGroupType, Balance, ContractBillingFrequency,
    ContractState, ContractTerm, ContractType, HttpMethod, ImageState, InstanceState, IpVersion,
    JobStatus, NetworkType, RootDiskStorageType,
};
pub use error::DomainError;
pub use image::{Image, StorageSize};
pub use instance::{
    CreateInstance, Instance, Instances, Iso, OptionalCreateInstanceValues,
    OptionalInstanceValues, OptionalUpdateInstanceValues, PrivateNetwork, UpdateInstance,
};
pub use ip::{Ddos, Ip};
pub use load_balancer::{
    HealthCheck, LoadBalancer, LoadBalancerConfiguration, StickySession,
};
pub use value_objects::{
    format_timestamp, parse_timestamp, Reference, RootDiskSize, SshKey, Uuid,
    MAX_REFERENCE_LENGTH, MAX_ROOT_DISK_SIZE, MIN_ROOT_DISK_SIZE, SSH_KEY_REGULAR_EXPRESSION,
};

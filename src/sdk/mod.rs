//! Wire layer: REST request/response shapes and the client port.

mod api;
mod models;

pub use api::{ApiError, ListRequest, PublicCloudApi, DEFAULT_PAGE_LIMIT};
pub use models::{
    AutoScalingGroup, Contract, Ddos, HealthCheck, Image, Instance, InstanceList, InstanceType,
    InstanceTypeList, Ip, Iso, LaunchInstanceOpts, LoadBalancer, LoadBalancerConfiguration,
    Metadata, Price, Prices, PrivateNetwork, Region, RegionList, Resource, Resources,
    StickySession, StorageSize, StoragePrices, UpdateInstanceOpts,
};

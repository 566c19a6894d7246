use chrono::{DateTime, Utc};

use super::{
    Balance, Contract, HttpMethod, InstanceState, InstanceType, Ip, PrivateNetwork, Reference,
    Uuid,
};

/// Sticky session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickySession {
    /// Whether sessions stick to one backend.
    pub enabled: bool,
    /// Session lifetime in seconds.
    pub max_life_time: i64,
}

/// Backend health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path to probe.
    pub uri: String,
    /// Host header, if any.
    pub host: Option<String>,
    /// Port to probe.
    pub port: i64,
}

/// Load balancer listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerConfiguration {
    /// Balancing algorithm.
    pub balance: Balance,
    /// Health check, if configured.
    pub health_check: Option<HealthCheck>,
    /// Sticky sessions, if configured.
    pub sticky_session: Option<StickySession>,
    /// Whether `X-Forwarded-For` is added.
    pub x_forwarded_for: bool,
    /// Idle timeout in seconds.
    pub idle_timeout: i64,
    /// Backend port.
    pub target_port: i64,
}

/// A load balancer, typically fronting an auto scaling group.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalancer {
    /// Load balancer id.
    pub id: Uuid,
    /// Instance type the load balancer runs on.
    pub load_balancer_type: InstanceType,
    /// Region.
    pub region: String,
    /// Optional label.
    pub reference: Option<Reference>,
    /// Lifecycle state.
    pub state: InstanceState,
    /// Contract.
    pub contract: Contract,
    /// Start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Addresses, in wire order.
    pub ips: Vec<Ip>,
    /// Listener configuration.
    pub configuration: Option<LoadBalancerConfiguration>,
    /// Attached private network.
    pub private_network: Option<PrivateNetwork>,
}

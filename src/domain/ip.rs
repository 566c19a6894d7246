use super::{IpVersion, NetworkType};

/// DDoS protection settings of a public IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ddos {
    /// Detection profile.
    pub detection_profile: String,
    /// Protection type.
    pub protection_type: String,
}

/// An IP address attached to an instance or load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ip {
    /// The address.
    pub ip: String,
    /// Prefix length, as reported by the API.
    pub prefix_length: String,
    /// Protocol version.
    pub version: IpVersion,
    /// Whether traffic to the address is null routed.
    pub null_routed: bool,
    /// Whether this is the main address.
    pub main_ip: bool,
    /// Network the address belongs to.
    pub network_type: NetworkType,
    /// Reverse DNS record.
    pub reverse_lookup: Option<String>,
    /// DDoS protection, public addresses only.
    pub ddos: Option<Ddos>,
}

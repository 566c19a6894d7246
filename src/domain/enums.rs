//! Closed enumerations of the domain model.
//!
//! Every enumeration exposes its complete token set (`values`), a membership
//! test (`contains`) and a constructor that rejects unknown tokens
//! (`from_token` / `from_int`). Tokens crossing the wire or schema boundary
//! are validated exactly once, on the way in.

use std::fmt;
use std::str::FromStr;

use super::DomainError;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                #[doc = concat!("`", $token, "`")]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire token of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            /// Every allowed token, in declaration order.
            pub fn values() -> Vec<&'static str> {
                Self::ALL.iter().map(Self::as_str).collect()
            }

            /// Whether `token` is an allowed token.
            pub fn contains(token: &str) -> bool {
                Self::ALL.iter().any(|v| v.as_str() == token)
            }

            /// Parse a token, failing on anything outside the declared set.
            pub fn from_token(token: &str) -> Result<Self, DomainError> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == token)
                    .ok_or_else(|| DomainError::InvalidEnumValue {
                        kind: $kind,
                        value: token.to_string(),
                        allowed: Self::values().join(", "),
                    })
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_token(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                #[doc = concat!("`", stringify!($value), "`")]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire value of this variant.
            pub fn as_i64(&self) -> i64 {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Every allowed value, in declaration order.
            pub fn values() -> Vec<i64> {
                Self::ALL.iter().map(Self::as_i64).collect()
            }

            /// Whether `value` is allowed.
            pub fn contains(value: i64) -> bool {
                Self::ALL.iter().any(|v| v.as_i64() == value)
            }

            /// Convert a value, failing on anything outside the declared set.
            pub fn from_int(value: i64) -> Result<Self, DomainError> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_i64() == value)
                    .ok_or_else(|| DomainError::InvalidEnumValue {
                        kind: $kind,
                        value: value.to_string(),
                        allowed: Self::values()
                            .iter()
                            .map(i64::to_string)
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl TryFrom<i64> for $name {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::from_int(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_i64())
            }
        }
    };
}

string_enum! {
    /// Lifecycle state of an instance or load balancer.
    InstanceState, "instance state" {
        Creating => "CREATING",
        Destroyed => "DESTROYED",
        Destroying => "DESTROYING",
        Failed => "FAILED",
        Running => "RUNNING",
        Starting => "STARTING",
        Stopped => "STOPPED",
        Stopping => "STOPPING",
        Unknown => "UNKNOWN",
    }
}

impl InstanceState {
    /// States in which an instance must not be terminated.
    pub fn blocks_termination(&self) -> bool {
        matches!(self, Self::Creating | Self::Destroying | Self::Destroyed)
    }
}

string_enum! {
    /// Contract billing model.
    ContractType, "contract type" {
        Hourly => "HOURLY",
        Monthly => "MONTHLY",
    }
}

string_enum! {
    /// Contract state.
    ContractState, "contract state" {
        Active => "ACTIVE",
        DeleteScheduled => "DELETE_SCHEDULED",
    }
}

int_enum! {
    /// Contract commitment in months; 0 for hourly contracts.
    ContractTerm, "contract term" {
        Zero => 0,
        One => 1,
        Three => 3,
        Six => 6,
        Twelve => 12,
    }
}

int_enum! {
    /// Months between invoices.
    ContractBillingFrequency, "contract billing frequency" {
        Zero => 0,
        One => 1,
        Three => 3,
        Six => 6,
        Twelve => 12,
    }
}

string_enum! {
    /// Where the root disk lives.
    RootDiskStorageType, "root disk storage type" {
        Local => "LOCAL",
        Central => "CENTRAL",
    }
}

string_enum! {
    /// Network an IP belongs to.
    NetworkType, "network type" {
        Internal => "INTERNAL",
        Public => "PUBLIC",
    }
}

int_enum! {
    /// IP protocol version.
    IpVersion, "ip version" {
        V4 => 4,
        V6 => 6,
    }
}

string_enum! {
    /// How an auto scaling group scales.
    AutoScalingGroupType, "auto scaling group type" {
        Manual => "MANUAL",
        Scheduled => "SCHEDULED",
        CpuBased => "CPU_BASED",
    }
}

string_enum! {
    /// Lifecycle state of an auto scaling group.
    AutoScalingGroupState, "auto scaling group state" {
        Active => "ACTIVE",
        Created => "CREATED",
        Creating => "CREATING",
        Destroyed => "DESTROYED",
        Destroying => "DESTROYING",
        Scaling => "SCALING",
        Updating => "UPDATING",
    }
}

string_enum! {
    /// Load balancing algorithm.
    Balance, "balance" {
        RoundRobin => "roundrobin",
        LeastConnections => "leastconn",
        Source => "source",
    }
}

string_enum! {
    /// HTTP method used by load balancer health checks.
    HttpMethod, "health check method" {
        Get => "GET",
        Head => "HEAD",
    }
}

string_enum! {
    /// Image availability.
    ImageState, "image state" {
        Ready => "READY",
        Creating => "CREATING",
        Failed => "FAILED",
        Destroyed => "DESTROYED",
    }
}

string_enum! {
    /// Status of a dedicated server job.
    JobStatus, "job status" {
        Active => "ACTIVE",
        Canceled => "CANCELED",
        Expired => "EXPIRED",
        Failed => "FAILED",
        Finished => "FINISHED",
    }
}

impl JobStatus {
    /// Whether the job has stopped running.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_values_in_declaration_order() {
        assert_eq!(ContractType::values(), vec!["HOURLY", "MONTHLY"]);
        assert_eq!(ContractTerm::values(), vec![0, 1, 3, 6, 12]);
        assert_eq!(RootDiskStorageType::values(), vec!["LOCAL", "CENTRAL"]);
    }

    #[test_case("RUNNING", InstanceState::Running)]
    #[test_case("DESTROYING", InstanceState::Destroying)]
    #[test_case("UNKNOWN", InstanceState::Unknown)]
    fn test_instance_state_from_token(token: &str, expected: InstanceState) {
        assert_eq!(InstanceState::from_token(token).unwrap(), expected);
        assert_eq!(expected.to_string(), token);
    }

    #[test]
    fn test_unknown_token_names_value() {
        let err = ContractType::from_token("WEEKLY").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidEnumValue {
                kind: "contract type",
                value: "WEEKLY".to_string(),
                allowed: "HOURLY, MONTHLY".to_string(),
            }
        );
        assert!(err.to_string().contains("WEEKLY"));
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert!(!ContractType::contains("hourly"));
        assert!(Balance::contains("roundrobin"));
        assert!("ROUNDROBIN".parse::<Balance>().is_err());
    }

    #[test_case(0, true)]
    #[test_case(3, true)]
    #[test_case(12, true)]
    #[test_case(2, false)]
    #[test_case(-1, false)]
    fn test_contract_term_membership(value: i64, allowed: bool) {
        assert_eq!(ContractTerm::contains(value), allowed);
        assert_eq!(ContractTerm::from_int(value).is_ok(), allowed);
    }

    #[test]
    fn test_int_enum_error_lists_values() {
        let err = ContractBillingFrequency::try_from(2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid contract billing frequency \"2\", valid values are: 0, 1, 3, 6, 12"
        );
    }

    #[test]
    fn test_termination_blocking_states() {
        assert!(InstanceState::Creating.blocks_termination());
        assert!(InstanceState::Destroying.blocks_termination());
        assert!(InstanceState::Destroyed.blocks_termination());
        assert!(!InstanceState::Running.blocks_termination());
        assert!(!InstanceState::Stopped.blocks_termination());
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Active.is_terminal());
        assert!(JobStatus::Finished.is_terminal());
        assert!(JobStatus::Canceled.is_terminal());
    }
}

//! Value objects with construction-time validation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::DomainError;

/// Smallest root disk, in GiB.
pub const MIN_ROOT_DISK_SIZE: i64 = 5;

/// Largest root disk, in GiB.
pub const MAX_ROOT_DISK_SIZE: i64 = 1000;

/// Longest allowed reference label.
pub const MAX_REFERENCE_LENGTH: usize = 255;

/// Accepted OpenSSH public key formats, optionally followed by a comment.
pub const SSH_KEY_REGULAR_EXPRESSION: &str = concat!(
    r"^(ssh-dss AAAAB3NzaC1kc3|",
    r"ecdsa-sha2-nistp256 AAAAE2VjZHNhLXNoYTItbmlzdHAyNT|",
    r"ecdsa-sha2-nistp384 AAAAE2VjZHNhLXNoYTItbmlzdHAzOD|",
    r"ecdsa-sha2-nistp521 AAAAE2VjZHNhLXNoYTItbmlzdHA1Mj|",
    r"sk-ecdsa-sha2-nistp256@openssh.com AAAAInNrLWVjZHNhLXNoYTItbmlzdHAyNTZAb3BlbnNzaC5jb2|",
    r"ssh-ed25519 AAAAC3NzaC1lZDI1NTE5|",
    r"sk-ssh-ed25519@openssh.com AAAAGnNrLXNzaC1lZDI1NTE5QG9wZW5zc2guY29t|",
    r"ssh-rsa AAAAB3NzaC1yc2)",
    r"[0-9A-Za-z+/]+[=]{0,3}(\s.*)?$"
);

fn ssh_key_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(SSH_KEY_REGULAR_EXPRESSION).expect("ssh key pattern compiles"))
}

/// A UUID in canonical form: 36 characters, lowercase, hyphenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uuid(uuid::Uuid);

impl Uuid {
    /// Parse a canonical UUID.
    ///
    /// Braced, URN, simple and uppercase forms are rejected so that ids
    /// compare equal as strings across the wire and schema boundaries.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let parsed =
            uuid::Uuid::parse_str(value).map_err(|_| DomainError::InvalidUuid(value.to_string()))?;
        if parsed.hyphenated().to_string() != value {
            return Err(DomainError::InvalidUuid(value.to_string()));
        }
        Ok(Self(parsed))
    }

    /// A fresh random id.
    pub fn new_v4() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl FromStr for Uuid {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// An OpenSSH public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SshKey(String);

impl SshKey {
    /// Validate a public key against [`SSH_KEY_REGULAR_EXPRESSION`].
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if !ssh_key_regex().is_match(&value) {
            return Err(DomainError::InvalidSshKey);
        }
        Ok(Self(value))
    }

    /// Whether `value` would be accepted.
    pub fn is_valid(value: &str) -> bool {
        ssh_key_regex().is_match(value)
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SshKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root disk size in GiB, within `[MIN_ROOT_DISK_SIZE, MAX_ROOT_DISK_SIZE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootDiskSize(i64);

impl RootDiskSize {
    /// Smallest allowed value.
    pub const MIN: i64 = MIN_ROOT_DISK_SIZE;
    /// Largest allowed value.
    pub const MAX: i64 = MAX_ROOT_DISK_SIZE;

    /// Validate a size.
    pub fn new(size: i64) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&size) {
            return Err(DomainError::RootDiskSizeOutOfRange {
                size,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(size))
    }

    /// The size in GiB.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RootDiskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A short user-supplied label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference(String);

impl Reference {
    /// Validate a label; at most [`MAX_REFERENCE_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let length = value.chars().count();
        if length > MAX_REFERENCE_LENGTH {
            return Err(DomainError::ReferenceTooLong {
                length,
                max: MAX_REFERENCE_LENGTH,
            });
        }
        Ok(Self(value))
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidTimestamp(value.to_string()))
}

/// Render a timestamp the way the API does.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const ED25519: &str =
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIJdKq3vSC3mQz1e1OXJX5lBdeUsy3zs5wUbPhP2xK8Qe user@host";

    #[test]
    fn test_uuid_canonical_form() {
        let id = Uuid::new("ace712e9-a166-47f1-9065-4af0f7e7fce1").unwrap();
        assert_eq!(id.to_string(), "ace712e9-a166-47f1-9065-4af0f7e7fce1");
    }

    #[test_case("ACE712E9-A166-47F1-9065-4AF0F7E7FCE1"; "uppercase")]
    #[test_case("ace712e9a16647f190654af0f7e7fce1"; "simple")]
    #[test_case("{ace712e9-a166-47f1-9065-4af0f7e7fce1}"; "braced")]
    #[test_case("tralala"; "garbage")]
    fn test_uuid_rejects_non_canonical(value: &str) {
        assert_eq!(
            Uuid::new(value),
            Err(DomainError::InvalidUuid(value.to_string()))
        );
    }

    #[test_case(MIN_ROOT_DISK_SIZE, true)]
    #[test_case(MAX_ROOT_DISK_SIZE, true)]
    #[test_case(MIN_ROOT_DISK_SIZE - 1, false)]
    #[test_case(MAX_ROOT_DISK_SIZE + 1, false)]
    fn test_root_disk_size_bounds(size: i64, ok: bool) {
        let result = RootDiskSize::new(size);
        assert_eq!(result.is_ok(), ok);
        if !ok {
            assert_eq!(
                result.unwrap_err(),
                DomainError::RootDiskSizeOutOfRange {
                    size,
                    min: MIN_ROOT_DISK_SIZE,
                    max: MAX_ROOT_DISK_SIZE,
                }
            );
        }
    }

    #[test]
    fn test_ssh_key() {
        assert_eq!(SshKey::new(ED25519).unwrap().as_str(), ED25519);
        assert!(SshKey::is_valid("ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABAQ=="));
        assert_eq!(SshKey::new("tralala"), Err(DomainError::InvalidSshKey));
        assert!(!SshKey::is_valid("ssh-rsa AAAAC3NzaC1lZDI1NTE5AAAA"));
    }

    #[test]
    fn test_reference_length() {
        assert!(Reference::new("a".repeat(MAX_REFERENCE_LENGTH)).is_ok());
        assert_eq!(
            Reference::new("a".repeat(MAX_REFERENCE_LENGTH + 1)),
            Err(DomainError::ReferenceTooLong {
                length: MAX_REFERENCE_LENGTH + 1,
                max: MAX_REFERENCE_LENGTH,
            })
        );
    }

    #[test]
    fn test_timestamps() {
        let t = parse_timestamp("2023-08-14T09:12:44Z").unwrap();
        assert_eq!(format_timestamp(&t), "2023-08-14T09:12:44Z");
        assert!(parse_timestamp("yesterday").is_err());
    }
}

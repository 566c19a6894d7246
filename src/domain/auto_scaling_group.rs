use chrono::{DateTime, Utc};

use super::{
    format_timestamp, AutoScalingGroupState, AutoScalingGroupType, DomainError, LoadBalancer,
    Reference, Uuid,
};

/// Amounts and timings of an auto scaling group; which ones are set depends on
/// the group type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionalAutoScalingGroupValues {
    /// Desired number of instances.
    pub desired_amount: Option<i64>,
    /// Scheduled start.
    pub starts_at: Option<DateTime<Utc>>,
    /// Scheduled end.
    pub ends_at: Option<DateTime<Utc>>,
    /// Minimum number of instances.
    pub minimum_amount: Option<i64>,
    /// Maximum number of instances.
    pub maximum_amount: Option<i64>,
    /// CPU percentage that triggers scaling.
    pub cpu_threshold: Option<i64>,
    /// Seconds before a new instance counts toward the CPU average.
    pub warmup_time: Option<i64>,
    /// Seconds between scaling actions.
    pub cooldown_time: Option<i64>,
    /// Load balancer in front of the group.
    pub load_balancer: Option<LoadBalancer>,
}

/// A group of instances scaled manually, on a schedule, or on CPU load.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoScalingGroup {
    id: Uuid,
    group_type: AutoScalingGroupType,
    state: AutoScalingGroupState,
    region: String,
    reference: Option<Reference>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    optional: OptionalAutoScalingGroupValues,
}

impl AutoScalingGroup {
    /// Build a group, checking the schedule of scheduled groups and the
    /// amounts of CPU based groups.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        group_type: AutoScalingGroupType,
        state: AutoScalingGroupState,
        region: impl Into<String>,
        reference: Option<Reference>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        optional: OptionalAutoScalingGroupValues,
    ) -> Result<Self, DomainError> {
        if group_type == AutoScalingGroupType::Scheduled {
            if let (Some(starts_at), Some(ends_at)) = (optional.starts_at, optional.ends_at) {
                if starts_at > ends_at {
                    return Err(DomainError::InvalidSchedule {
                        starts_at: format_timestamp(&starts_at),
                        ends_at: format_timestamp(&ends_at),
                    });
                }
            }
        }

        if group_type == AutoScalingGroupType::CpuBased {
            if let (Some(minimum), Some(maximum)) = (optional.minimum_amount, optional.maximum_amount)
            {
                if minimum > maximum {
                    return Err(DomainError::InvalidAmounts { minimum, maximum });
                }
            }
        }

        Ok(Self {
            id,
            group_type,
            state,
            region: region.into(),
            reference,
            created_at,
            updated_at,
            optional,
        })
    }

    /// Group id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// How the group scales.
    pub fn group_type(&self) -> AutoScalingGroupType {
        self.group_type
    }

    /// Lifecycle state.
    pub fn state(&self) -> AutoScalingGroupState {
        self.state
    }

    /// Region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Label, if one was set.
    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Type dependent amounts and timings.
    pub fn optional(&self) -> &OptionalAutoScalingGroupValues {
        &self.optional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn build(
        group_type: AutoScalingGroupType,
        optional: OptionalAutoScalingGroupValues,
    ) -> Result<AutoScalingGroup, DomainError> {
        let at = Utc.with_ymd_and_hms(2023, 12, 14, 17, 9, 47).unwrap();
        AutoScalingGroup::new(
            Uuid::new("90b9f2cc-c655-40ea-b01a-58c00e175c96").unwrap(),
            group_type,
            AutoScalingGroupState::Active,
            "eu-west-3",
            Some(Reference::new("web").unwrap()),
            at,
            at,
            optional,
        )
    }

    #[test]
    fn test_scheduled_group_rejects_inverted_schedule() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let ok = build(
            AutoScalingGroupType::Scheduled,
            OptionalAutoScalingGroupValues {
                starts_at: Some(early),
                ends_at: Some(late),
                ..Default::default()
            },
        );
        assert!(ok.is_ok());

        let err = build(
            AutoScalingGroupType::Scheduled,
            OptionalAutoScalingGroupValues {
                starts_at: Some(late),
                ends_at: Some(early),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSchedule { .. }));
    }

    #[test]
    fn test_cpu_based_group_rejects_inverted_amounts() {
        let err = build(
            AutoScalingGroupType::CpuBased,
            OptionalAutoScalingGroupValues {
                minimum_amount: Some(5),
                maximum_amount: Some(2),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidAmounts {
                minimum: 5,
                maximum: 2
            }
        );
    }

    #[test]
    fn test_rules_only_apply_to_their_type() {
        let group = build(
            AutoScalingGroupType::Manual,
            OptionalAutoScalingGroupValues {
                minimum_amount: Some(5),
                maximum_amount: Some(2),
                ..Default::default()
            },
        );
        assert!(group.is_ok());
    }
}

//! The public cloud service port.
//!
//! Handlers and the facade depend only on [`PublicCloudService`]; [`PublicCloud`]
//! implements it on top of the [`PublicCloudRepository`]. Every failure is
//! wrapped in a [`ServiceError`] prefixed with the operation name.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::context::Context;
use crate::domain::{
    ContractBillingFrequency, ContractTerm, ContractType, CreateInstance, Instance,
    InstanceTypes, Instances, Regions, RootDiskSize, RootDiskStorageType, UpdateInstance, Uuid,
    SSH_KEY_REGULAR_EXPRESSION,
};
use crate::error::ServiceError;
use crate::repository::PublicCloudRepository;

/// Operations on public cloud instances and their catalog.
#[async_trait]
pub trait PublicCloudService: Send + Sync {
    // =========================================================================
    // Instances
    // =========================================================================

    /// Every instance of the account, in wire order.
    async fn get_all_instances(&self, ctx: &Context) -> Result<Instances, ServiceError>;

    /// One instance.
    async fn get_instance(&self, id: Uuid, ctx: &Context) -> Result<Instance, ServiceError>;

    /// Launch an instance and return it as the API reports it.
    async fn launch_instance(
        &self,
        instance: &CreateInstance,
        ctx: &Context,
    ) -> Result<Instance, ServiceError>;

    /// Apply an update and return the updated instance.
    async fn update_instance(
        &self,
        instance: &UpdateInstance,
        ctx: &Context,
    ) -> Result<Instance, ServiceError>;

    /// Terminate an instance. Terminating an instance that no longer exists
    /// succeeds.
    async fn delete_instance(&self, id: Uuid, ctx: &Context) -> Result<(), ServiceError>;

    /// Whether the instance may be terminated, and if not, why.
    async fn can_instance_be_terminated(
        &self,
        id: Uuid,
        ctx: &Context,
    ) -> Result<(bool, Option<String>), ServiceError>;

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Instance types that can be launched in `region`.
    async fn get_available_instance_types_for_region(
        &self,
        region: &str,
        ctx: &Context,
    ) -> Result<InstanceTypes, ServiceError>;

    /// Instance types the instance `id` can be changed to. The current type is
    /// not necessarily part of the result.
    async fn get_available_instance_types_for_update(
        &self,
        id: Uuid,
        ctx: &Context,
    ) -> Result<InstanceTypes, ServiceError>;

    /// Every region.
    async fn get_regions(&self, ctx: &Context) -> Result<Regions, ServiceError>;

    /// Allowed billing frequencies in months.
    fn get_billing_frequencies(&self) -> Vec<i64> {
        ContractBillingFrequency::values()
    }

    /// Allowed contract terms in months.
    fn get_contract_terms(&self) -> Vec<i64> {
        ContractTerm::values()
    }

    /// Allowed contract types.
    fn get_contract_types(&self) -> Vec<&'static str> {
        ContractType::values()
    }

    /// Allowed root disk storage types.
    fn get_root_disk_storage_types(&self) -> Vec<&'static str> {
        RootDiskStorageType::values()
    }

    /// Smallest root disk size in GiB.
    fn get_minimum_root_disk_size(&self) -> i64 {
        RootDiskSize::MIN
    }

    /// Largest root disk size in GiB.
    fn get_maximum_root_disk_size(&self) -> i64 {
        RootDiskSize::MAX
    }

    /// Pattern an SSH key must match.
    fn get_ssh_key_regular_expression(&self) -> &'static str {
        SSH_KEY_REGULAR_EXPRESSION
    }
}

/// [`PublicCloudService`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct PublicCloud {
    repository: PublicCloudRepository,
}

impl PublicCloud {
    /// Build the service over a repository.
    pub fn new(repository: PublicCloudRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PublicCloudService for PublicCloud {
    #[instrument(skip(self, ctx), name = "service.get_all_instances")]
    async fn get_all_instances(&self, ctx: &Context) -> Result<Instances, ServiceError> {
        self.repository
            .get_all_instances(ctx)
            .await
            .map_err(|e| ServiceError::from_repository("get_all_instances", e))
    }

    #[instrument(skip(self, id, ctx), fields(id = %id), name = "service.get_instance")]
    async fn get_instance(&self, id: Uuid, ctx: &Context) -> Result<Instance, ServiceError> {
        self.repository
            .get_instance(id, ctx)
            .await
            .map_err(|e| ServiceError::from_repository("get_instance", e))
    }

    #[instrument(skip(self, instance, ctx), name = "service.launch_instance")]
    async fn launch_instance(
        &self,
        instance: &CreateInstance,
        ctx: &Context,
    ) -> Result<Instance, ServiceError> {
        let launched = self
            .repository
            .launch_instance(instance, ctx)
            .await
            .map_err(|e| ServiceError::from_repository("launch_instance", e))?;
        info!(id = %launched.id, region = %launched.region, "launched instance");
        Ok(launched)
    }

    #[instrument(skip(self, instance, ctx), fields(id = %instance.id()), name = "service.update_instance")]
    async fn update_instance(
        &self,
        instance: &UpdateInstance,
        ctx: &Context,
    ) -> Result<Instance, ServiceError> {
        self.repository
            .update_instance(instance, ctx)
            .await
            .map_err(|e| ServiceError::from_repository("update_instance", e))
    }

    #[instrument(skip(self, id, ctx), fields(id = %id), name = "service.delete_instance")]
    async fn delete_instance(&self, id: Uuid, ctx: &Context) -> Result<(), ServiceError> {
        match self.repository.delete_instance(id, ctx).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!("instance already gone");
                Ok(())
            },
            Err(e) => Err(ServiceError::from_repository("delete_instance", e)),
        }
    }

    #[instrument(skip(self, id, ctx), fields(id = %id), name = "service.can_instance_be_terminated")]
    async fn can_instance_be_terminated(
        &self,
        id: Uuid,
        ctx: &Context,
    ) -> Result<(bool, Option<String>), ServiceError> {
        let instance = self
            .repository
            .get_instance(id, ctx)
            .await
            .map_err(|e| ServiceError::from_repository("can_instance_be_terminated", e))?;

        match instance.termination_blocker() {
            Some(reason) => {
                debug!(%reason, "instance cannot be terminated");
                Ok((false, Some(reason)))
            },
            None => Ok((true, None)),
        }
    }

    #[instrument(skip(self, ctx), name = "service.get_available_instance_types_for_region")]
    async fn get_available_instance_types_for_region(
        &self,
        region: &str,
        ctx: &Context,
    ) -> Result<InstanceTypes, ServiceError> {
        self.repository
            .get_instance_types(region, ctx)
            .await
            .map_err(|e| ServiceError::from_repository("get_available_instance_types_for_region", e))
    }

    #[instrument(skip(self, id, ctx), fields(id = %id), name = "service.get_available_instance_types_for_update")]
    async fn get_available_instance_types_for_update(
        &self,
        id: Uuid,
        ctx: &Context,
    ) -> Result<InstanceTypes, ServiceError> {
        self.repository
            .get_available_instance_types_for_update(id, ctx)
            .await
            .map_err(|e| ServiceError::from_repository("get_available_instance_types_for_update", e))
    }

    #[instrument(skip(self, ctx), name = "service.get_regions")]
    async fn get_regions(&self, ctx: &Context) -> Result<Regions, ServiceError> {
        self.repository
            .get_regions(ctx)
            .await
            .map_err(|e| ServiceError::from_repository("get_regions", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpResponse;
    use crate::testing::{fixtures, FakePublicCloudApi};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn service(api: FakePublicCloudApi) -> (PublicCloud, Arc<FakePublicCloudApi>) {
        let api = Arc::new(api);
        let repository = PublicCloudRepository::new(api.clone());
        (PublicCloud::new(repository), api)
    }

    #[tokio::test]
    async fn test_delete_missing_instance_succeeds() {
        let (service, api) = service(FakePublicCloudApi::new().with_failure(
            "terminate_instance",
            HttpResponse::new(404, r#"{"errorCode":"404"}"#),
        ));

        service
            .delete_instance(Uuid::new_v4(), &Context::new())
            .await
            .unwrap();
        assert_eq!(api.calls("terminate_instance"), 1);
    }

    #[tokio::test]
    async fn test_delete_failure_is_wrapped() {
        let (service, _) = service(FakePublicCloudApi::new().with_failure(
            "terminate_instance",
            HttpResponse::new(500, r#"{"errorCode":"500"}"#),
        ));
        let id = Uuid::new(fixtures::INSTANCE_ID).unwrap();

        let err = service
            .delete_instance(id, &Context::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "delete_instance: delete_instance {:?}: 500 Internal Server Error",
                fixtures::INSTANCE_ID
            )
        );
        assert_eq!(err.error_response().unwrap().error_code.as_deref(), Some("500"));
    }

    #[tokio::test]
    async fn test_running_instance_can_be_terminated() {
        let (service, _) = service(FakePublicCloudApi::new().with_instance(fixtures::sdk_instance()));
        let id = Uuid::new(fixtures::INSTANCE_ID).unwrap();

        let verdict = service
            .can_instance_be_terminated(id, &Context::new())
            .await
            .unwrap();
        assert_eq!(verdict, (true, None));
    }

    #[tokio::test]
    async fn test_destroying_instance_cannot_be_terminated() {
        let mut wire = fixtures::sdk_instance();
        wire.state = "DESTROYING".to_string();
        let (service, _) = service(FakePublicCloudApi::new().with_instance(wire));
        let id = Uuid::new(fixtures::INSTANCE_ID).unwrap();

        let (allowed, reason) = service
            .can_instance_be_terminated(id, &Context::new())
            .await
            .unwrap();
        assert!(!allowed);
        assert_eq!(reason.as_deref(), Some("state is \"DESTROYING\""));
    }

    #[tokio::test]
    async fn test_instance_with_contract_end_cannot_be_terminated() {
        let mut wire = fixtures::sdk_instance();
        wire.contract.ends_at = Some("2023-12-14T17:09:47Z".to_string());
        let (service, _) = service(FakePublicCloudApi::new().with_instance(wire));
        let id = Uuid::new(fixtures::INSTANCE_ID).unwrap();

        let (allowed, reason) = service
            .can_instance_be_terminated(id, &Context::new())
            .await
            .unwrap();
        assert!(!allowed);
        assert!(reason.unwrap().starts_with("contract.endsAt is"));
    }

    #[tokio::test]
    async fn test_get_regions_prefixes_error() {
        let (service, _) = service(
            FakePublicCloudApi::new().with_failure("get_region_list", HttpResponse::new(503, "")),
        );

        let err = service.get_regions(&Context::new()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_regions: get_regions: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_catalog_accessors() {
        let (service, _) = service(FakePublicCloudApi::new());
        assert_eq!(service.get_contract_terms(), vec![0, 1, 3, 6, 12]);
        assert_eq!(service.get_billing_frequencies(), vec![0, 1, 3, 6, 12]);
        assert_eq!(service.get_contract_types(), vec!["HOURLY", "MONTHLY"]);
        assert_eq!(service.get_root_disk_storage_types(), vec!["LOCAL", "CENTRAL"]);
        assert_eq!(service.get_minimum_root_disk_size(), 5);
        assert_eq!(service.get_maximum_root_disk_size(), 1000);
        assert!(!service.get_ssh_key_regular_expression().is_empty());
    }
}

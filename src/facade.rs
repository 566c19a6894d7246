//! Orchestration of the instance flows between schema models and the service.
//!
//! Each flow runs its remote calls in a fixed order: the catalog is fetched
//! before the plan is adapted against it, and the current instance is read
//! before an update is built. Errors are wrapped in a [`FacadeError`] named
//! after the flow.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::context::Context;
use crate::domain::{
    ContractBillingFrequency, ContractTerm, ContractType, RootDiskStorageType, Uuid,
};
use crate::error::FacadeError;
use crate::model::data_source::{self, InstancesDataSourceModel};
use crate::model::resource::{self, InstanceResourceModel};
use crate::model::AdapterError;
use crate::service::PublicCloudService;
use crate::types::StringValue;
use crate::validation::{
    candidates_for_update, ContractTermValidator, InstanceTerminationValidator,
    InstanceTypeValidator, OneOfInt64Validator, OneOfStringValidator, RegionValidator,
    RootDiskSizeValidator, SshKeyValidator,
};

fn instance_id(model: &InstanceResourceModel, prefix: &str) -> Result<Uuid, FacadeError> {
    let id = model
        .id
        .as_known()
        .ok_or_else(|| FacadeError::general(prefix, AdapterError::missing(prefix, "id")))?;
    Uuid::new(id).map_err(|e| FacadeError::general(prefix, e))
}

fn commit(
    instance: &crate::domain::Instance,
    ssh_key: &StringValue,
    prefix: &str,
) -> Result<InstanceResourceModel, FacadeError> {
    let mut model = resource::adapt_instance(instance).map_err(|e| FacadeError::general(prefix, e))?;
    // The API never returns the key, so state keeps what was configured.
    if model.ssh_key.is_null() {
        model.ssh_key = match ssh_key {
            StringValue::Unknown => StringValue::Null,
            other => other.clone(),
        };
    }
    Ok(model)
}

/// Entry point of the instance resource and data source handlers.
#[derive(Clone)]
pub struct PublicCloudFacade {
    service: Arc<dyn PublicCloudService>,
}

impl std::fmt::Debug for PublicCloudFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicCloudFacade").finish_non_exhaustive()
    }
}

impl PublicCloudFacade {
    /// Build the facade over a service.
    pub fn new(service: Arc<dyn PublicCloudService>) -> Self {
        Self { service }
    }

    /// Launch the instance a plan describes and return the state to commit.
    #[instrument(skip(self, plan, ctx), name = "facade.create_instance")]
    pub async fn create_instance(
        &self,
        plan: &InstanceResourceModel,
        ctx: &Context,
    ) -> Result<InstanceResourceModel, FacadeError> {
        let prefix = "create_instance";
        let region = plan
            .region
            .as_known()
            .ok_or_else(|| FacadeError::general(prefix, AdapterError::missing(prefix, "region")))?;

        let available = self
            .service
            .get_available_instance_types_for_region(region, ctx)
            .await
            .map_err(|e| FacadeError::from_service(prefix, e))?;

        let create = plan
            .to_create_instance(&available.to_array())
            .map_err(|e| FacadeError::general(prefix, e))?;

        let instance = self
            .service
            .launch_instance(&create, ctx)
            .await
            .map_err(|e| FacadeError::from_service(prefix, e))?;
        info!(id = %instance.id, "instance created");

        commit(&instance, &plan.ssh_key, prefix)
    }

    /// Apply the changes of a plan to an existing instance.
    #[instrument(skip(self, plan, ctx), name = "facade.update_instance")]
    pub async fn update_instance(
        &self,
        plan: &InstanceResourceModel,
        ctx: &Context,
    ) -> Result<InstanceResourceModel, FacadeError> {
        let prefix = "update_instance";
        let id = instance_id(plan, prefix)?;

        let (current, available) = tokio::try_join!(
            async {
                self.service
                    .get_instance(id, ctx)
                    .await
                    .map_err(|e| FacadeError::from_service(prefix, e))
            },
            async {
                self.service
                    .get_available_instance_types_for_update(id, ctx)
                    .await
                    .map_err(|e| FacadeError::from_service(prefix, e))
            },
        )?;

        let allowed = candidates_for_update(Some(&current.instance_type.name), &available);
        debug!(%id, allowed = allowed.len(), "resolved instance type candidates");

        let update = plan
            .to_update_instance(&allowed)
            .map_err(|e| FacadeError::general(prefix, e))?;

        let instance = self
            .service
            .update_instance(&update, ctx)
            .await
            .map_err(|e| FacadeError::from_service(prefix, e))?;

        commit(&instance, &plan.ssh_key, prefix)
    }

    /// Terminate the instance of a state.
    #[instrument(skip(self, state, ctx), name = "facade.delete_instance")]
    pub async fn delete_instance(
        &self,
        state: &InstanceResourceModel,
        ctx: &Context,
    ) -> Result<(), FacadeError> {
        let prefix = "delete_instance";
        let id = instance_id(state, prefix)?;

        self.service
            .delete_instance(id, ctx)
            .await
            .map_err(|e| FacadeError::from_service(prefix, e))
    }

    /// Refresh the state of an instance.
    #[instrument(skip(self, state, ctx), name = "facade.get_instance")]
    pub async fn get_instance(
        &self,
        state: &InstanceResourceModel,
        ctx: &Context,
    ) -> Result<InstanceResourceModel, FacadeError> {
        let prefix = "get_instance";
        let id = instance_id(state, prefix)?;

        let instance = self
            .service
            .get_instance(id, ctx)
            .await
            .map_err(|e| FacadeError::from_service(prefix, e))?;

        commit(&instance, &state.ssh_key, prefix)
    }

    /// Every instance, as the data source reports them.
    #[instrument(skip(self, ctx), name = "facade.get_all_instances")]
    pub async fn get_all_instances(
        &self,
        ctx: &Context,
    ) -> Result<InstancesDataSourceModel, FacadeError> {
        let instances = self
            .service
            .get_all_instances(ctx)
            .await
            .map_err(|e| FacadeError::from_service("get_all_instances", e))?;

        Ok(data_source::adapt_instances(&instances))
    }

    // =========================================================================
    // Validators
    // =========================================================================

    /// Region check against the current region list.
    pub async fn create_region_validator(
        &self,
        ctx: &Context,
    ) -> Result<RegionValidator, FacadeError> {
        let regions = self
            .service
            .get_regions(ctx)
            .await
            .map_err(|e| FacadeError::from_service("create_region_validator", e))?;
        Ok(RegionValidator::new(regions))
    }

    /// Instance type check for a launch in `region`.
    pub async fn create_instance_type_validator_for_region(
        &self,
        region: &str,
        ctx: &Context,
    ) -> Result<InstanceTypeValidator, FacadeError> {
        let available = self
            .service
            .get_available_instance_types_for_region(region, ctx)
            .await
            .map_err(|e| FacadeError::from_service("create_instance_type_validator_for_region", e))?;
        Ok(InstanceTypeValidator::for_create(&available))
    }

    /// Instance type check for an update of the instance `id`, currently of
    /// type `current_instance_type`.
    pub async fn create_instance_type_validator_for_update(
        &self,
        id: &str,
        current_instance_type: &str,
        ctx: &Context,
    ) -> Result<InstanceTypeValidator, FacadeError> {
        let prefix = "create_instance_type_validator_for_update";
        let id = Uuid::new(id).map_err(|e| FacadeError::general(prefix, e))?;
        let available = self
            .service
            .get_available_instance_types_for_update(id, ctx)
            .await
            .map_err(|e| FacadeError::from_service(prefix, e))?;
        Ok(InstanceTypeValidator::for_update(current_instance_type, &available))
    }

    /// Termination check of the instance `id`.
    pub async fn create_instance_termination_validator(
        &self,
        id: &str,
        ctx: &Context,
    ) -> Result<InstanceTerminationValidator, FacadeError> {
        let prefix = "create_instance_termination_validator";
        let id = Uuid::new(id).map_err(|e| FacadeError::general(prefix, e))?;
        let (can_be_terminated, reason) = self
            .service
            .can_instance_be_terminated(id, ctx)
            .await
            .map_err(|e| FacadeError::from_service(prefix, e))?;
        Ok(InstanceTerminationValidator::new(can_be_terminated, reason))
    }

    /// Contract term/type check.
    pub fn contract_term_validator(&self) -> ContractTermValidator {
        ContractTermValidator
    }

    /// Root disk size range check.
    pub fn root_disk_size_validator(&self) -> RootDiskSizeValidator {
        RootDiskSizeValidator::new(
            self.service.get_minimum_root_disk_size(),
            self.service.get_maximum_root_disk_size(),
        )
    }

    /// SSH key format check.
    pub fn ssh_key_validator(&self) -> Result<SshKeyValidator, FacadeError> {
        SshKeyValidator::new(self.service.get_ssh_key_regular_expression())
            .map_err(|e| FacadeError::general("ssh_key_validator", e))
    }

    /// Allowed root disk storage types.
    pub fn root_disk_storage_type_validator(&self) -> OneOfStringValidator {
        OneOfStringValidator::new(self.service.get_root_disk_storage_types())
    }

    /// Allowed contract types.
    pub fn contract_type_validator(&self) -> OneOfStringValidator {
        OneOfStringValidator::new(self.service.get_contract_types())
    }

    /// Allowed contract terms.
    pub fn contract_term_value_validator(&self) -> OneOfInt64Validator {
        OneOfInt64Validator::new(self.service.get_contract_terms())
    }

    /// Allowed billing frequencies.
    pub fn billing_frequency_validator(&self) -> OneOfInt64Validator {
        OneOfInt64Validator::new(self.service.get_billing_frequencies())
    }

    /// Token sets of the enumerated attributes, for schema descriptions.
    pub fn enumerated_values() -> [(&'static str, Vec<String>); 4] {
        [
            ("contract.type", tokens(ContractType::values())),
            ("contract.term", numbers(ContractTerm::values())),
            ("contract.billing_frequency", numbers(ContractBillingFrequency::values())),
            ("root_disk_storage_type", tokens(RootDiskStorageType::values())),
        ]
    }
}

fn tokens(values: Vec<&'static str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

fn numbers(values: Vec<i64>) -> Vec<String> {
    values.into_iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{find_cause, Cancelled, HttpResponse, RepositoryError};
    use crate::repository::PublicCloudRepository;
    use crate::service::PublicCloud;
    use crate::testing::{fixtures, FakePublicCloudApi, FakePublicCloudService};
    use crate::types::{Int64Value, ObjectValue};
    use pretty_assertions::assert_eq;

    fn facade(api: FakePublicCloudApi) -> (PublicCloudFacade, Arc<FakePublicCloudApi>) {
        let api = Arc::new(api);
        let service = PublicCloud::new(PublicCloudRepository::new(api.clone()));
        (PublicCloudFacade::new(Arc::new(service)), api)
    }

    #[tokio::test]
    async fn test_create_happy_path() {
        let (facade, api) = facade(
            FakePublicCloudApi::new().with_instance_types("eu-west-3", ["lsw.m5a.4xlarge"]),
        );
        let plan = fixtures::create_plan();

        let state = facade.create_instance(&plan, &Context::new()).await.unwrap();

        let launched = api.launched();
        assert_eq!(launched.len(), 1);
        let opts = &launched[0];
        assert_eq!(opts.region, "eu-west-3");
        assert_eq!(opts.instance_type, "lsw.m5a.4xlarge");
        assert_eq!(opts.root_disk_storage_type, "CENTRAL");
        assert_eq!(opts.root_disk_size, Some(55));
        assert_eq!(opts.image_id, "UBUNTU_20_04_64BIT");
        assert_eq!(opts.contract_type, "MONTHLY");
        assert_eq!(opts.contract_term, 3);
        assert_eq!(opts.billing_frequency, 1);
        assert_eq!(opts.reference.as_deref(), Some("r"));
        assert_eq!(opts.market_app_id.as_deref(), Some("m"));

        assert!(state.id.is_known());
        assert_eq!(state.region, StringValue::known("eu-west-3"));
        assert_eq!(state.instance_type, StringValue::known("lsw.m5a.4xlarge"));
        assert_eq!(state.root_disk_size, Int64Value::known(55));
        assert_eq!(state.reference, StringValue::known("r"));
        assert!(state.contract.is_known());
        assert!(state.image.is_known());
        assert!(state.ips.is_known());
    }

    #[tokio::test]
    async fn test_create_keeps_ssh_key() {
        let (facade, _) = facade(
            FakePublicCloudApi::new().with_instance_types("eu-west-3", ["lsw.m5a.4xlarge"]),
        );
        let mut plan = fixtures::create_plan();
        plan.ssh_key = StringValue::known(fixtures::SSH_KEY);

        let state = facade.create_instance(&plan, &Context::new()).await.unwrap();
        assert_eq!(state.ssh_key, StringValue::known(fixtures::SSH_KEY));
    }

    #[tokio::test]
    async fn test_create_rejects_unavailable_type_without_launch() {
        let (facade, api) =
            facade(FakePublicCloudApi::new().with_instance_types("eu-west-3", ["lsw.m5a.large"]));

        let err = facade
            .create_instance(&fixtures::create_plan(), &Context::new())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("create_instance: to_create_instance"));
        assert_eq!(api.calls("launch_instance"), 0);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_chain_and_error_code() {
        let (facade, _) = facade(
            FakePublicCloudApi::new()
                .with_instance_types("eu-west-3", ["lsw.m5a.4xlarge"])
                .with_failure("launch_instance", HttpResponse::new(500, r#"{"errorCode":"54"}"#)),
        );

        let err = facade
            .create_instance(&fixtures::create_plan(), &Context::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "create_instance: launch_instance: launch_instance: 500 Internal Server Error"
        );
        assert_eq!(err.error_response().unwrap().error_code.as_deref(), Some("54"));
        assert_eq!(find_cause::<RepositoryError>(&err).unwrap().status(), Some(500));
    }

    #[tokio::test]
    async fn test_create_contract_sentinel_is_reachable() {
        let (facade, api) = facade(
            FakePublicCloudApi::new().with_instance_types("eu-west-3", ["lsw.m5a.4xlarge"]),
        );
        let mut plan = fixtures::create_plan();
        let mut contract = plan.contract_model().unwrap().unwrap();
        contract.contract_type = StringValue::known("HOURLY");
        plan.contract = ObjectValue::from_model(contract).unwrap();

        let err = facade.create_instance(&plan, &Context::new()).await.unwrap_err();
        assert_eq!(
            find_cause::<AdapterError>(&err).and_then(AdapterError::domain_error),
            Some(&crate::domain::DomainError::ContractTermMustBeZero)
        );
        assert_eq!(api.calls("launch_instance"), 0);
    }

    #[tokio::test]
    async fn test_update_allows_current_type() {
        let (facade, api) = facade(
            FakePublicCloudApi::new()
                .with_instance(fixtures::sdk_instance())
                .with_update_instance_types(fixtures::INSTANCE_ID, ["lsw.m5a.8xlarge"]),
        );
        let mut plan = resource::adapt_instance(&fixtures::instance()).unwrap();
        plan.reference = StringValue::known("renamed");

        let state = facade.update_instance(&plan, &Context::new()).await.unwrap();
        assert_eq!(state.reference, StringValue::known("renamed"));

        let updates = api.updated();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.instance_type.as_deref(), Some("lsw.m5a.4xlarge"));
        assert_eq!(updates[0].1.reference.as_deref(), Some("renamed"));
    }

    #[tokio::test]
    async fn test_update_rejects_incompatible_type() {
        let (facade, api) = facade(
            FakePublicCloudApi::new()
                .with_instance(fixtures::sdk_instance())
                .with_update_instance_types(fixtures::INSTANCE_ID, ["lsw.m5a.8xlarge"]),
        );
        let mut plan = resource::adapt_instance(&fixtures::instance()).unwrap();
        plan.instance_type = StringValue::known("lsw.m5a.huge");

        let err = facade.update_instance(&plan, &Context::new()).await.unwrap_err();
        assert!(err.to_string().contains("lsw.m5a.huge"));
        assert_eq!(api.calls("update_instance"), 0);
    }

    #[tokio::test]
    async fn test_read_keeps_configured_ssh_key() {
        let (facade, _) = facade(FakePublicCloudApi::new().with_instance(fixtures::sdk_instance()));
        let mut state = resource::adapt_instance(&fixtures::instance()).unwrap();
        state.ssh_key = StringValue::known(fixtures::SSH_KEY);

        let refreshed = facade.get_instance(&state, &Context::new()).await.unwrap();
        assert_eq!(refreshed.ssh_key, StringValue::known(fixtures::SSH_KEY));
        assert_eq!(refreshed, state);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (facade, _) = facade(FakePublicCloudApi::new().with_failure(
            "terminate_instance",
            HttpResponse::new(404, r#"{"errorCode":"404"}"#),
        ));
        let state = resource::adapt_instance(&fixtures::instance()).unwrap();

        facade.delete_instance(&state, &Context::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancellation_surfaces_unchanged() {
        let (facade, api) = facade(FakePublicCloudApi::new());
        let ctx = Context::new();
        ctx.cancel();

        let err = facade.get_all_instances(&ctx).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(find_cause::<Cancelled>(&err).is_some());
        assert_eq!(api.calls("get_instance_list"), 0);
    }

    #[tokio::test]
    async fn test_termination_validator_from_service() {
        let service = FakePublicCloudService::new()
            .with_termination(false, Some("state is \"DESTROYING\"".to_string()));
        let facade = PublicCloudFacade::new(Arc::new(service));

        let validator = facade
            .create_instance_termination_validator(fixtures::INSTANCE_ID, &Context::new())
            .await
            .unwrap();
        let state = ObjectValue::from_model(resource::adapt_instance(&fixtures::instance()).unwrap())
            .unwrap();
        let diagnostics = crate::validation::validate(
            &validator,
            crate::schema::AttributePath::empty(),
            &state,
        );
        assert!(diagnostics
            .first_error()
            .and_then(|d| d.detail.as_deref())
            .unwrap()
            .contains("DESTROYING"));
    }

    #[test]
    fn test_enumerated_values() {
        let values = PublicCloudFacade::enumerated_values();
        assert_eq!(values[0].1, vec!["HOURLY", "MONTHLY"]);
        assert_eq!(values[1].1, vec!["0", "1", "3", "6", "12"]);
    }
}

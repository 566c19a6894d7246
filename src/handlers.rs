//! Host-facing handlers of the instance resource and the instances data
//! source.
//!
//! Handlers never return errors: every failure becomes a [`Diagnostic`]
//! carrying the full prefixed error chain in its detail, attached to the
//! offending attribute when one can be identified. A failed call never yields
//! a partial state.

use tracing::{debug, instrument, warn};

use crate::context::Context;
use crate::domain::DomainError;
use crate::error::{find_cause, FacadeError, RepositoryError};
use crate::facade::PublicCloudFacade;
use crate::model::resource::InstanceResourceModel;
use crate::model::AdapterError;
use crate::schema::{AttributePath, Diagnostic, Diagnostics};
use crate::types::ObjectValue;
use crate::validation::validate;

/// Type name of the instance resource.
pub const INSTANCE_RESOURCE_TYPE: &str = "leaseweb_public_cloud_instance";

/// Type name of the instances data source.
pub const INSTANCES_DATA_SOURCE_TYPE: &str = "leaseweb_public_cloud_instances";

/// Result of a handler call: the value to hand back to the host, if any, and
/// the diagnostics to show.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse<T> {
    /// The new state or data; `None` when the call failed or the resource is
    /// gone.
    pub value: Option<T>,
    /// Problems found.
    pub diagnostics: Diagnostics,
}

impl<T> HandlerResponse<T> {
    fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            diagnostics: Diagnostics::new(),
        }
    }

    fn gone() -> Self {
        Self {
            value: None,
            diagnostics: Diagnostics::new(),
        }
    }

    fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            value: None,
            diagnostics: diagnostic.into(),
        }
    }
}

/// Turn a facade failure into a diagnostic.
pub fn error_diagnostic(summary: &str, err: &FacadeError) -> Diagnostic {
    let mut detail = err.to_string();
    if let Some(response) = err.error_response() {
        for (field, messages) in &response.error_details {
            detail.push_str(&format!("\n{field}: {}", messages.join(", ")));
        }
    }

    let diagnostic = Diagnostic::error(summary).with_detail(detail);
    match attribute_path(err) {
        Some(path) => diagnostic.with_attribute(path),
        None => diagnostic,
    }
}

fn attribute_path(err: &FacadeError) -> Option<AttributePath> {
    if find_cause::<DomainError>(err).is_some_and(DomainError::is_contract_term_error) {
        return Some(AttributePath::root("contract").attribute("term"));
    }

    let field = find_cause::<AdapterError>(err)?.field()?;
    let mut steps = field.split('.');
    let mut path = AttributePath::root(steps.next()?);
    for step in steps {
        path = path.attribute(step);
    }
    Some(path)
}

fn is_not_found(err: &FacadeError) -> bool {
    find_cause::<RepositoryError>(err).is_some_and(RepositoryError::is_not_found)
}

/// The `leaseweb_public_cloud_instance` resource.
#[derive(Debug, Clone)]
pub struct InstanceResource {
    facade: PublicCloudFacade,
}

impl InstanceResource {
    /// Build the resource over a facade.
    pub fn new(facade: PublicCloudFacade) -> Self {
        Self { facade }
    }

    /// Type name the host registers the resource under.
    pub fn type_name(&self) -> &'static str {
        INSTANCE_RESOURCE_TYPE
    }

    /// Checks that need nothing from the API.
    pub fn validate_config(&self, config: &InstanceResourceModel) -> Diagnostics {
        let facade = &self.facade;
        let mut diagnostics = validate(
            &facade.contract_term_validator(),
            AttributePath::root("contract"),
            &config.contract,
        );

        // A malformed contract object was already reported above.
        if let Ok(Some(contract)) = config.contract_model() {
            let path = AttributePath::root("contract");
            diagnostics.extend(validate(
                &facade.contract_type_validator(),
                path.clone().attribute("type"),
                &contract.contract_type,
            ));
            diagnostics.extend(validate(
                &facade.contract_term_value_validator(),
                path.clone().attribute("term"),
                &contract.term,
            ));
            diagnostics.extend(validate(
                &facade.billing_frequency_validator(),
                path.attribute("billing_frequency"),
                &contract.billing_frequency,
            ));
        }

        diagnostics.extend(validate(
            &facade.root_disk_size_validator(),
            AttributePath::root("root_disk_size"),
            &config.root_disk_size,
        ));
        diagnostics.extend(validate(
            &facade.root_disk_storage_type_validator(),
            AttributePath::root("root_disk_storage_type"),
            &config.root_disk_storage_type,
        ));

        match facade.ssh_key_validator() {
            Ok(validator) => diagnostics.extend(validate(
                &validator,
                AttributePath::root("ssh_key"),
                &config.ssh_key,
            )),
            Err(err) => diagnostics.push(error_diagnostic("Invalid SSH Key Pattern", &err)),
        }

        diagnostics
    }

    /// Checks that need the remote catalog or the current remote state.
    ///
    /// `state` is `None` on create and `plan` is `None` on destroy.
    #[instrument(skip_all, name = "handler.modify_plan")]
    pub async fn modify_plan(
        &self,
        state: Option<&InstanceResourceModel>,
        plan: Option<&InstanceResourceModel>,
        ctx: &Context,
    ) -> Diagnostics {
        match (state, plan) {
            (None, Some(plan)) => self.check_create(plan, ctx).await,
            (Some(state), Some(plan)) => self.check_update(state, plan, ctx).await,
            (Some(state), None) => self.check_destroy(state, ctx).await,
            (None, None) => Diagnostics::new(),
        }
    }

    async fn check_create(&self, plan: &InstanceResourceModel, ctx: &Context) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let Some(region) = plan.region.as_known() else {
            return diagnostics;
        };

        match self.facade.create_region_validator(ctx).await {
            Ok(validator) => diagnostics.extend(validate(
                &validator,
                AttributePath::root("region"),
                &plan.region,
            )),
            Err(err) => {
                diagnostics.push(error_diagnostic("Error fetching regions", &err));
                return diagnostics;
            },
        }
        if diagnostics.has_error() {
            return diagnostics;
        }

        match self
            .facade
            .create_instance_type_validator_for_region(region, ctx)
            .await
        {
            Ok(validator) => diagnostics.extend(validate(
                &validator,
                AttributePath::root("type"),
                &plan.instance_type,
            )),
            Err(err) => diagnostics.push(error_diagnostic("Error fetching instance types", &err)),
        }
        diagnostics
    }

    async fn check_update(
        &self,
        state: &InstanceResourceModel,
        plan: &InstanceResourceModel,
        ctx: &Context,
    ) -> Diagnostics {
        let (Some(id), Some(current)) = (state.id.as_known(), state.instance_type.as_known())
        else {
            return Diagnostics::new();
        };
        if !plan.instance_type.is_known() {
            return Diagnostics::new();
        }

        match self
            .facade
            .create_instance_type_validator_for_update(id, current, ctx)
            .await
        {
            Ok(validator) => validate(&validator, AttributePath::root("type"), &plan.instance_type),
            Err(err) => error_diagnostic("Error fetching instance types", &err).into(),
        }
    }

    async fn check_destroy(&self, state: &InstanceResourceModel, ctx: &Context) -> Diagnostics {
        let Some(id) = state.id.as_known() else {
            return Diagnostics::new();
        };

        let validator = match self
            .facade
            .create_instance_termination_validator(id, ctx)
            .await
        {
            Ok(validator) => validator,
            Err(err) => {
                return error_diagnostic("Error checking instance termination", &err).into()
            },
        };
        match ObjectValue::from_model(state.clone()) {
            Ok(value) => validate(&validator, AttributePath::empty(), &value),
            Err(diagnostics) => diagnostics,
        }
    }

    /// Launch an instance.
    pub async fn create(
        &self,
        plan: &InstanceResourceModel,
        ctx: &Context,
    ) -> HandlerResponse<InstanceResourceModel> {
        match self.facade.create_instance(plan, ctx).await {
            Ok(state) => HandlerResponse::ok(state),
            Err(err) => {
                warn!(error = %err, "launching instance failed");
                HandlerResponse::failed(error_diagnostic("Error launching Public Cloud instance", &err))
            },
        }
    }

    /// Refresh an instance. An instance that no longer exists yields no value
    /// and no diagnostic, so the host drops it from state.
    pub async fn read(
        &self,
        state: &InstanceResourceModel,
        ctx: &Context,
    ) -> HandlerResponse<InstanceResourceModel> {
        match self.facade.get_instance(state, ctx).await {
            Ok(state) => HandlerResponse::ok(state),
            Err(err) if is_not_found(&err) => {
                debug!("instance is gone");
                HandlerResponse::gone()
            },
            Err(err) => {
                HandlerResponse::failed(error_diagnostic("Error reading Public Cloud instance", &err))
            },
        }
    }

    /// Apply a plan to an existing instance.
    pub async fn update(
        &self,
        plan: &InstanceResourceModel,
        ctx: &Context,
    ) -> HandlerResponse<InstanceResourceModel> {
        match self.facade.update_instance(plan, ctx).await {
            Ok(state) => HandlerResponse::ok(state),
            Err(err) => {
                warn!(error = %err, "updating instance failed");
                HandlerResponse::failed(error_diagnostic("Error updating Public Cloud instance", &err))
            },
        }
    }

    /// Terminate an instance.
    pub async fn delete(&self, state: &InstanceResourceModel, ctx: &Context) -> Diagnostics {
        match self.facade.delete_instance(state, ctx).await {
            Ok(()) => Diagnostics::new(),
            Err(err) => error_diagnostic("Error terminating Public Cloud instance", &err).into(),
        }
    }
}

/// The `leaseweb_public_cloud_instances` data source.
#[derive(Debug, Clone)]
pub struct InstancesDataSource {
    facade: PublicCloudFacade,
}

impl InstancesDataSource {
    /// Build the data source over a facade.
    pub fn new(facade: PublicCloudFacade) -> Self {
        Self { facade }
    }

    /// Type name the host registers the data source under.
    pub fn type_name(&self) -> &'static str {
        INSTANCES_DATA_SOURCE_TYPE
    }

    /// Every instance of the account as JSON.
    pub async fn read(&self, ctx: &Context) -> HandlerResponse<serde_json::Value> {
        let model = match self.facade.get_all_instances(ctx).await {
            Ok(model) => model,
            Err(err) => {
                return HandlerResponse::failed(error_diagnostic(
                    "Unable to read Public Cloud instances",
                    &err,
                ))
            },
        };

        match serde_json::to_value(&model) {
            Ok(value) => HandlerResponse::ok(value),
            Err(err) => HandlerResponse::failed(
                Diagnostic::error("Unable to encode Public Cloud instances")
                    .with_detail(err.to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpResponse;
    use crate::model::resource::{self, ContractResourceModel};
    use crate::repository::PublicCloudRepository;
    use crate::service::{PublicCloud, PublicCloudService};
    use crate::testing::{fixtures, FakePublicCloudApi, FakePublicCloudService};
    use crate::types::{Int64Value, StringValue};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn over_service(service: impl PublicCloudService + 'static) -> InstanceResource {
        InstanceResource::new(PublicCloudFacade::new(Arc::new(service)))
    }

    fn over_api(api: FakePublicCloudApi) -> InstanceResource {
        let service = PublicCloud::new(PublicCloudRepository::new(Arc::new(api)));
        over_service(service)
    }

    fn attribute(diagnostic: &Diagnostic) -> Option<String> {
        diagnostic.attribute.as_ref().map(ToString::to_string)
    }

    fn with_contract(plan: &mut InstanceResourceModel, contract_type: &str, term: i64) {
        plan.contract = ObjectValue::from_model(ContractResourceModel {
            billing_frequency: Int64Value::known(1),
            term: Int64Value::known(term),
            contract_type: StringValue::known(contract_type),
            ends_at: StringValue::Unknown,
            renewals_at: StringValue::Unknown,
            created_at: StringValue::Unknown,
            state: StringValue::Unknown,
        })
        .unwrap();
    }

    fn state() -> InstanceResourceModel {
        resource::adapt_instance(&fixtures::instance()).unwrap()
    }

    #[test]
    fn test_valid_config_has_no_diagnostics() {
        let resource = over_service(FakePublicCloudService::new());
        assert!(resource.validate_config(&fixtures::create_plan()).is_empty());
    }

    #[test]
    fn test_config_with_hourly_term_is_rejected() {
        let resource = over_service(FakePublicCloudService::new());
        let mut plan = fixtures::create_plan();
        with_contract(&mut plan, "HOURLY", 3);

        let diagnostics = resource.validate_config(&plan);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.first_error().unwrap();
        assert_eq!(attribute(diagnostic).as_deref(), Some("contract.term"));
        assert_eq!(
            diagnostic.detail.as_deref(),
            Some("contract.term must be 0 when contract type is HOURLY")
        );
    }

    #[test]
    fn test_config_checks_disk_and_key() {
        let resource = over_service(FakePublicCloudService::new());
        let mut plan = fixtures::create_plan();
        plan.root_disk_size = Int64Value::known(2);
        plan.ssh_key = StringValue::known("not a key");
        plan.root_disk_storage_type = StringValue::known("TAPE");

        let diagnostics = resource.validate_config(&plan);
        let attributes: Vec<_> = diagnostics.iter().filter_map(attribute).collect();
        assert_eq!(
            attributes,
            vec!["root_disk_size", "root_disk_storage_type", "ssh_key"]
        );
    }

    #[tokio::test]
    async fn test_plan_rejects_unknown_region() {
        let resource = over_service(FakePublicCloudService::new().with_region("eu-west-3", "Frankfurt"));
        let mut plan = fixtures::create_plan();
        plan.region = StringValue::known("mars-1");

        let diagnostics = resource.modify_plan(None, Some(&plan), &Context::new()).await;
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.first_error().unwrap();
        assert_eq!(attribute(diagnostic).as_deref(), Some("region"));
        assert!(diagnostic.detail.as_deref().unwrap().contains("eu-west-3"));
    }

    #[tokio::test]
    async fn test_plan_rejects_type_missing_from_region() {
        let resource = over_service(
            FakePublicCloudService::new()
                .with_region("eu-west-3", "Frankfurt")
                .with_instance_types("eu-west-3", ["lsw.m5a.large"]),
        );

        let diagnostics = resource
            .modify_plan(None, Some(&fixtures::create_plan()), &Context::new())
            .await;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            attribute(diagnostics.first_error().unwrap()).as_deref(),
            Some("type")
        );
    }

    #[tokio::test]
    async fn test_plan_update_accepts_current_type() {
        let resource = over_service(
            FakePublicCloudService::new()
                .with_update_instance_types(fixtures::INSTANCE_ID, ["lsw.m5a.8xlarge"]),
        );
        let state = state();

        let diagnostics = resource
            .modify_plan(Some(&state), Some(&state), &Context::new())
            .await;
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_plan_destroy_reports_blocked_termination() {
        let resource = over_service(
            FakePublicCloudService::new()
                .with_termination(false, Some("state is \"CREATING\"".to_string())),
        );

        let diagnostics = resource.modify_plan(Some(&state()), None, &Context::new()).await;
        assert!(diagnostics.has_error());
        assert!(diagnostics
            .first_error()
            .and_then(|d| d.detail.as_deref())
            .unwrap()
            .contains("CREATING"));
    }

    #[tokio::test]
    async fn test_create_failure_becomes_diagnostic() {
        let resource = over_api(
            FakePublicCloudApi::new()
                .with_instance_types("eu-west-3", ["lsw.m5a.4xlarge"])
                .with_failure(
                    "launch_instance",
                    HttpResponse::new(
                        500,
                        r#"{"errorCode":"54","errorDetails":{"type":["not available"]}}"#,
                    ),
                ),
        );

        let response = resource.create(&fixtures::create_plan(), &Context::new()).await;
        assert_eq!(response.value, None);
        let diagnostic = response.diagnostics.first_error().unwrap();
        assert_eq!(diagnostic.summary, "Error launching Public Cloud instance");
        assert_eq!(
            diagnostic.detail.as_deref(),
            Some(
                "create_instance: launch_instance: launch_instance: 500 Internal Server Error\ntype: not available"
            )
        );
    }

    #[tokio::test]
    async fn test_create_contract_error_points_at_term() {
        let resource = over_service(
            FakePublicCloudService::new().with_instance_types("eu-west-3", ["lsw.m5a.4xlarge"]),
        );
        let mut plan = fixtures::create_plan();
        with_contract(&mut plan, "MONTHLY", 0);

        let response = resource.create(&plan, &Context::new()).await;
        assert_eq!(response.value, None);
        assert_eq!(
            attribute(response.diagnostics.first_error().unwrap()).as_deref(),
            Some("contract.term")
        );
    }

    #[tokio::test]
    async fn test_read_of_missing_instance_drops_state() {
        let resource = over_api(FakePublicCloudApi::new());

        let response = resource.read(&state(), &Context::new()).await;
        assert_eq!(response.value, None);
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_delete_succeeds() {
        let resource = over_api(FakePublicCloudApi::new().with_instance(fixtures::sdk_instance()));
        assert!(resource.delete(&state(), &Context::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_update_writes_nothing() {
        let resource = over_api(FakePublicCloudApi::new().with_instance(fixtures::sdk_instance()));
        let ctx = Context::new();
        ctx.cancel();

        let response = resource.update(&state(), &ctx).await;
        assert_eq!(response.value, None);
        assert!(response.diagnostics.has_error());
    }

    #[tokio::test]
    async fn test_data_source_reads_json() {
        let facade = PublicCloudFacade::new(Arc::new(
            FakePublicCloudService::new().with_instance(fixtures::instance()),
        ));
        let data_source = InstancesDataSource::new(facade);
        assert_eq!(data_source.type_name(), INSTANCES_DATA_SOURCE_TYPE);

        let response = data_source.read(&Context::new()).await;
        let value = response.value.unwrap();
        assert_eq!(value["instances"][0]["id"], fixtures::INSTANCE_ID);
        assert_eq!(value["instances"][0]["reference"], "my webserver");
    }
}

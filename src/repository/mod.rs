//! Repository over the public cloud REST client.
//!
//! Every call races the request [`Context`]; pages are walked with
//! [`Pagination`] and every response is adapted into the domain model before
//! it leaves this module.

pub mod adapters;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::context::Context;
use crate::domain::{
    CreateInstance, Instance, InstanceTypes, Instances, Regions, UpdateInstance, Uuid,
};
use crate::error::RepositoryError;
use crate::pagination::Pagination;
use crate::sdk::{
    ApiError, InstanceList, InstanceTypeList, ListRequest, Metadata, PublicCloudApi, RegionList,
};

pub use adapters::AdaptError;

trait Page {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Metadata);
}

impl Page for InstanceList {
    type Item = crate::sdk::Instance;

    fn into_parts(self) -> (Vec<Self::Item>, Metadata) {
        (self.instances, self.metadata)
    }
}

impl Page for RegionList {
    type Item = crate::sdk::Region;

    fn into_parts(self) -> (Vec<Self::Item>, Metadata) {
        (self.regions, self.metadata)
    }
}

impl Page for InstanceTypeList {
    type Item = crate::sdk::InstanceType;

    fn into_parts(self) -> (Vec<Self::Item>, Metadata) {
        (self.instance_types, self.metadata)
    }
}

fn api_error(prefix: &str, err: ApiError) -> RepositoryError {
    let response = err.response().cloned();
    let wrapped = RepositoryError::new(prefix, err);
    match response {
        Some(response) => wrapped.with_response(response),
        None => wrapped,
    }
}

async fn call<T, F>(prefix: &str, ctx: &Context, fut: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match ctx.run(fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(api_error(prefix, err)),
        Err(cancelled) => Err(RepositoryError::new(prefix, cancelled)),
    }
}

async fn collect_pages<P, F, Fut>(
    prefix: &str,
    ctx: &Context,
    fetch: F,
) -> Result<Vec<P::Item>, RepositoryError>
where
    P: Page,
    F: Fn(ListRequest) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    let request = ListRequest::default();
    let (mut items, metadata) = call(prefix, ctx, fetch(request)).await?.into_parts();

    let mut pagination = Pagination::new(metadata, request);
    while pagination.can_increment() {
        let next = pagination
            .next_page()
            .map_err(|e| RepositoryError::new(prefix, e))?;
        let (page, _) = call(prefix, ctx, fetch(next)).await?.into_parts();
        items.extend(page);
    }
    Ok(items)
}

/// Typed access to the public cloud API.
#[derive(Clone)]
pub struct PublicCloudRepository {
    api: Arc<dyn PublicCloudApi>,
}

impl std::fmt::Debug for PublicCloudRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicCloudRepository").finish_non_exhaustive()
    }
}

impl PublicCloudRepository {
    /// Wrap a REST client.
    pub fn new(api: Arc<dyn PublicCloudApi>) -> Self {
        Self { api }
    }

    /// Every instance, across all pages, in wire order.
    #[instrument(skip(self, ctx), name = "repository.get_all_instances")]
    pub async fn get_all_instances(&self, ctx: &Context) -> Result<Instances, RepositoryError> {
        let prefix = "get_all_instances";
        let instances =
            collect_pages(prefix, ctx, |request| self.api.get_instance_list(request)).await?;
        debug!(count = instances.len(), "fetched instances");

        instances
            .into_iter()
            .map(|i| adapters::adapt_instance(i).map_err(|e| RepositoryError::new(prefix, e)))
            .collect()
    }

    /// One instance.
    #[instrument(skip(self, id, ctx), fields(id = %id), name = "repository.get_instance")]
    pub async fn get_instance(&self, id: Uuid, ctx: &Context) -> Result<Instance, RepositoryError> {
        let prefix = format!("get_instance {:?}", id.to_string());
        let id = id.to_string();
        let instance = call(&prefix, ctx, self.api.get_instance(&id)).await?;

        adapters::adapt_instance(instance).map_err(|e| RepositoryError::new(prefix, e))
    }

    /// Launch an instance.
    #[instrument(skip(self, instance, ctx), fields(region = %instance.region()), name = "repository.launch_instance")]
    pub async fn launch_instance(
        &self,
        instance: &CreateInstance,
        ctx: &Context,
    ) -> Result<Instance, RepositoryError> {
        let prefix = "launch_instance";
        let opts = adapters::adapt_to_launch_instance_opts(instance);
        let launched = call(prefix, ctx, self.api.launch_instance(opts)).await?;
        debug!(id = %launched.id, "instance launched");

        adapters::adapt_instance(launched).map_err(|e| RepositoryError::new(prefix, e))
    }

    /// Apply an update.
    #[instrument(skip(self, instance, ctx), fields(id = %instance.id()), name = "repository.update_instance")]
    pub async fn update_instance(
        &self,
        instance: &UpdateInstance,
        ctx: &Context,
    ) -> Result<Instance, RepositoryError> {
        let prefix = format!("update_instance {:?}", instance.id().to_string());
        let id = instance.id().to_string();
        let opts = adapters::adapt_to_update_instance_opts(instance);
        let updated = call(&prefix, ctx, self.api.update_instance(&id, opts)).await?;

        adapters::adapt_instance(updated).map_err(|e| RepositoryError::new(prefix, e))
    }

    /// Terminate an instance.
    #[instrument(skip(self, id, ctx), fields(id = %id), name = "repository.delete_instance")]
    pub async fn delete_instance(&self, id: Uuid, ctx: &Context) -> Result<(), RepositoryError> {
        let prefix = format!("delete_instance {:?}", id.to_string());
        let id = id.to_string();
        call(&prefix, ctx, self.api.terminate_instance(&id)).await
    }

    /// Every region.
    #[instrument(skip(self, ctx), name = "repository.get_regions")]
    pub async fn get_regions(&self, ctx: &Context) -> Result<Regions, RepositoryError> {
        let regions =
            collect_pages("get_regions", ctx, |request| self.api.get_region_list(request)).await?;

        Ok(regions.into_iter().map(adapters::adapt_region).collect())
    }

    /// Instance types that can be launched in `region`.
    #[instrument(skip(self, ctx), name = "repository.get_instance_types")]
    pub async fn get_instance_types(
        &self,
        region: &str,
        ctx: &Context,
    ) -> Result<InstanceTypes, RepositoryError> {
        let prefix = format!("get_instance_types {region:?}");
        let instance_types = collect_pages(&prefix, ctx, |request| {
            self.api.get_instance_type_list(region, request)
        })
        .await?;

        instance_types
            .into_iter()
            .map(|t| adapters::adapt_instance_type(t).map_err(|e| RepositoryError::new(&prefix, e)))
            .collect()
    }

    /// Instance types the instance `id` can be changed to.
    #[instrument(skip(self, id, ctx), fields(id = %id), name = "repository.get_available_instance_types_for_update")]
    pub async fn get_available_instance_types_for_update(
        &self,
        id: Uuid,
        ctx: &Context,
    ) -> Result<InstanceTypes, RepositoryError> {
        let prefix = format!(
            "get_available_instance_types_for_update {:?}",
            id.to_string()
        );
        let id = id.to_string();
        let instance_types = collect_pages(&prefix, ctx, |request| {
            self.api.get_update_instance_type_list(&id, request)
        })
        .await?;

        instance_types
            .into_iter()
            .map(|t| adapters::adapt_instance_type(t).map_err(|e| RepositoryError::new(&prefix, e)))
            .collect()
    }
}

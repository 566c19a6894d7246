//! The provider: configuration plus the registry of resources and data
//! sources it serves.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::ProviderConfig;
use crate::dedicated_server::InstallationSettings;
use crate::facade::PublicCloudFacade;
use crate::handlers::{
    InstanceResource, InstancesDataSource, INSTANCES_DATA_SOURCE_TYPE, INSTANCE_RESOURCE_TYPE,
};
use crate::repository::PublicCloudRepository;
use crate::schema::Diagnostics;
use crate::sdk::PublicCloudApi;
use crate::service::PublicCloud;

/// Type name prefix shared by everything the provider registers.
pub const TYPE_NAME_PREFIX: &str = "leaseweb";

/// Names of what the provider serves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Resource type names.
    pub resources: Vec<String>,
    /// Data source type names.
    pub data_sources: Vec<String>,
}

/// The Leaseweb provider.
///
/// The REST client is injected; configuring the provider only settles the
/// provider block settings.
pub struct LeasewebProvider {
    api: Arc<dyn PublicCloudApi>,
    config: ProviderConfig,
}

impl std::fmt::Debug for LeasewebProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeasewebProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LeasewebProvider {
    /// A provider over `api` with the default settings.
    pub fn new(api: Arc<dyn PublicCloudApi>) -> Self {
        Self {
            api,
            config: ProviderConfig::default(),
        }
    }

    /// Names of the registered resources and data sources.
    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            resources: vec![INSTANCE_RESOURCE_TYPE.to_string()],
            data_sources: vec![INSTANCES_DATA_SOURCE_TYPE.to_string()],
        }
    }

    /// Check a provider block without applying it.
    pub fn validate_config(&self, config: serde_json::Value) -> Diagnostics {
        match ProviderConfig::from_value(config) {
            Ok(config) => config.with_env_overrides().validate(),
            Err(diagnostics) => diagnostics,
        }
    }

    /// Apply a provider block. The current settings stay in place when the
    /// block has errors.
    #[instrument(skip_all, name = "provider.configure")]
    pub fn configure(&mut self, config: serde_json::Value) -> Diagnostics {
        let config = match ProviderConfig::from_value(config) {
            Ok(config) => config.with_env_overrides(),
            Err(diagnostics) => return diagnostics,
        };

        let diagnostics = config.validate();
        if diagnostics.has_error() {
            return diagnostics;
        }

        info!(
            base_url = config.base_url.as_deref().unwrap_or("default"),
            installation_timeout_seconds = config.installation_timeout_seconds,
            "provider configured"
        );
        self.config = config;
        diagnostics
    }

    /// The settings in effect.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Poll settings of dedicated server installations.
    pub fn installation_settings(&self) -> InstallationSettings {
        InstallationSettings::from(&self.config)
    }

    fn facade(&self) -> PublicCloudFacade {
        let repository = PublicCloudRepository::new(self.api.clone());
        PublicCloudFacade::new(Arc::new(PublicCloud::new(repository)))
    }

    /// Handler of `leaseweb_public_cloud_instance`.
    pub fn instance_resource(&self) -> InstanceResource {
        InstanceResource::new(self.facade())
    }

    /// Handler of `leaseweb_public_cloud_instances`.
    pub fn instances_data_source(&self) -> InstancesDataSource {
        InstancesDataSource::new(self.facade())
    }
}

//! Leaseweb Provider
//!
//! Core of a Terraform provider for Leaseweb public cloud instances and
//! dedicated server installations. The host plugin runtime hands typed
//! schema values in and gets typed schema values and diagnostics back; this
//! crate translates between those, a validated domain model and the REST API.
//!
//! # Layers
//!
//! - [`domain`]: entities and value objects whose constructors enforce every
//!   invariant, e.g. the contract term/type rule.
//! - [`sdk`] and [`repository`]: the REST client port, pagination and the
//!   adapters from wire shapes to the domain.
//! - [`types`] and [`model`]: tri-state schema values (known, null or
//!   unknown) and the resource and data source models built from them.
//! - [`service`], [`facade`] and [`validation`]: the instance flows and the
//!   plan-time validators.
//! - [`handlers`] and [`provider`]: what the plugin host calls.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use leaseweb_provider::{init_logging, Context, LeasewebProvider};
//!
//! # async fn run(api: Arc<dyn leaseweb_provider::sdk::PublicCloudApi>) {
//! init_logging();
//!
//! let mut provider = LeasewebProvider::new(api);
//! let diagnostics = provider.configure(serde_json::json!({}));
//! assert!(diagnostics.is_empty());
//!
//! let instances = provider.instances_data_source().read(&Context::new()).await;
//! # }
//! ```
//!
//! # Errors
//!
//! Every layer wraps the error of the layer below with its own call-site
//! name, so a failed launch reads
//! `create_instance: launch_instance: launch_instance: 500 Internal Server Error`
//! and the parsed API error body stays reachable through
//! [`FacadeError::error_response`]. Handlers turn these into [`Diagnostic`]s.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod dedicated_server;
pub mod domain;
pub mod error;
pub mod facade;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod provider;
pub mod repository;
pub mod schema;
pub mod sdk;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types at crate root
pub use config::ProviderConfig;
pub use context::Context;
pub use dedicated_server::{
    wait_for_installation, InstallationError, InstallationJob, InstallationJobSource,
    InstallationSettings,
};
pub use error::{FacadeError, RepositoryError, ServiceError};
pub use facade::PublicCloudFacade;
pub use handlers::{HandlerResponse, InstanceResource, InstancesDataSource};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{LeasewebProvider, ProviderMetadata};
pub use schema::{Diagnostic, Diagnostics};
pub use service::{PublicCloud, PublicCloudService};
pub use validation::{validate, Validator};

// Re-export async_trait for implementors of the ports
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;

//! Application state shared across handlers.

use std::path::Path;
use std::sync::Arc;

use crate::backend::BackendClient;
use crate::catalog::{Catalog, CatalogError};
use crate::checkout::WidgetScript;
use crate::config::SiteConfig;
use crate::services::{FormsClient, FormsError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("forms client: {0}")]
    Forms(#[from] FormsError),
}

/// Application state shared across all handlers.
///
/// Cheap to clone via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    backend: BackendClient,
    forms: FormsClient,
    catalog: Catalog,
    widget_script: WidgetScript,
}

impl AppState {
    /// Create the application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `services_dir` - Directory holding the service catalog markdown
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog directory cannot be read or the forms
    /// client cannot be built.
    pub fn new(config: SiteConfig, services_dir: &Path) -> Result<Self, StateError> {
        let catalog = Catalog::load(services_dir)?;
        Self::with_catalog(config, catalog)
    }

    /// Create the application state around an already loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the forms client cannot be built.
    pub fn with_catalog(config: SiteConfig, catalog: Catalog) -> Result<Self, StateError> {
        let http = reqwest::Client::new();
        let backend = BackendClient::with_client(http.clone(), &config.backend);
        let widget_script = WidgetScript::new(http, &config.payment);
        let forms = FormsClient::new(&config.forms)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                forms,
                catalog,
                widget_script,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the forms client.
    #[must_use]
    pub fn forms(&self) -> &FormsClient {
        &self.inner.forms
    }

    /// Get a reference to the service catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the payment widget script handle.
    #[must_use]
    pub fn widget_script(&self) -> &WidgetScript {
        &self.inner.widget_script
    }
}

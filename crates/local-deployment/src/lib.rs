use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentError};
use services::services::{
    auth::{CredentialVerifier, verifier_from_config},
    catalog::{Catalog, CatalogLoader},
    config::Config,
    database_validator::DatabaseValidator,
};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<Config>,
    db: DBService,
    catalog: Arc<Catalog>,
    credentials: Arc<dyn CredentialVerifier>,
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let config = Config::load()?;
        Self::from_config(config).await
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    fn credentials(&self) -> &Arc<dyn CredentialVerifier> {
        &self.credentials
    }
}

impl LocalDeployment {
    pub async fn from_config(config: Config) -> Result<Self, DeploymentError> {
        let loader = CatalogLoader::new(config.catalog_paths.clone());
        let catalog = tokio::task::spawn_blocking(move || loader.load())
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "Catalog loading task failed, using fallback categories");
                Catalog::fallback()
            });

        let db = DBService::new(&config.database_url).await?;
        DatabaseValidator::new(db.pool.clone()).validate().await?;
        tokio::fs::create_dir_all(&config.upload_dir).await?;

        let credentials: Arc<dyn CredentialVerifier> =
            Arc::from(verifier_from_config(config.admin.as_ref())?);
        if !credentials.is_enabled() {
            warn!("No admin credentials configured, admin endpoints are disabled");
        }

        info!(
            categories = catalog.len(),
            source = %catalog.source(),
            upload_dir = %config.upload_dir.display(),
            "Deployment ready"
        );

        Ok(Self::from_parts(config, db, catalog, credentials))
    }

    pub fn from_parts(
        config: Config,
        db: DBService,
        catalog: Catalog,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            catalog: Arc::new(catalog),
            credentials,
        }
    }
}

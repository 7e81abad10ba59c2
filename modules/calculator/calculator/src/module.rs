use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::Router;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::api::rest::routes;
use crate::config::CalculatorConfig;
use crate::domain::service::Service;
use crate::infra::storage::{SeaOrmHistoryRepository, db};

/// Calculator module: owns the domain service and wires it to storage and REST.
#[derive(Default)]
pub struct CalculatorModule {
    service: ArcSwapOption<Service>,
}

impl CalculatorModule {
    /// Run migrations and build the domain service.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or migrations fail.
    pub async fn init(&self, db: DatabaseConnection, config: CalculatorConfig) -> anyhow::Result<()> {
        info!("Initializing calculator module");
        config.validate()?;

        db::migrate(&db).await?;

        let repo = Arc::new(SeaOrmHistoryRepository::new(db));
        self.service
            .store(Some(Arc::new(Service::new(repo, config))));

        info!("Calculator module initialized");
        Ok(())
    }

    /// The initialized domain service.
    ///
    /// # Errors
    /// Returns an error if [`CalculatorModule::init`] has not completed.
    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// Mount the calculator REST routes on `router`.
    ///
    /// # Errors
    /// Returns an error if the module has not been initialized.
    pub fn register_rest(&self, router: Router) -> anyhow::Result<Router> {
        info!("Registering calculator REST routes");
        let router = routes::register_routes(router, self.service()?);
        info!("Calculator REST routes registered successfully");
        Ok(router)
    }

    /// Wait for pending history writes.
    pub async fn shutdown(&self) {
        if let Some(service) = self.service.load_full() {
            info!("Waiting for pending history writes");
            service.drain_history_writes().await;
        }
        info!("Calculator module stopped");
    }
}

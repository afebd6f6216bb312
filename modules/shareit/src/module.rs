use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::api::rest::{openapi::ApiDoc, routes};
use crate::config::ShareItConfig;
use crate::contract::client::ShareItApi;
use crate::domain::ports::Clock;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ShareItLocalClient;
use crate::infra::storage::{migrations::Migrator, sea_orm_repo};

/// The shareit module: domain service wired to SeaORM storage, plus its REST surface.
#[derive(Clone)]
pub struct ShareIt {
    service: Arc<Service>,
}

impl ShareIt {
    /// Bring the schema up to date.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running shareit database migrations");
        Migrator::up(db, None).await?;
        info!("Shareit database migrations completed successfully");
        Ok(())
    }

    /// Wire repositories to the domain service.
    pub fn init(db: DatabaseConnection, cfg: &ShareItConfig, clock: Arc<dyn Clock>) -> Self {
        info!("Initializing shareit module");
        debug!(
            "Loaded shareit config: last_booking_grace_secs={}, max_name_length={}, max_text_length={}",
            cfg.last_booking_grace_secs, cfg.max_name_length, cfg.max_text_length
        );

        let service = Service::new(
            sea_orm_repo::repositories(db),
            clock,
            ServiceConfig::from(cfg),
        );
        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn ShareItApi> {
        Arc::new(ShareItLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering shareit REST routes");
        routes::register_routes(router, self.service.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        ApiDoc::openapi()
    }
}

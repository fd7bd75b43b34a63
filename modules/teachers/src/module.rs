use std::sync::Arc;

use axum::Router;
use tracing::{debug, info};

use crate::api::rest::handlers::TeachersRestState;
use crate::api::rest::openapi::TeachersApiDoc;
use crate::api::rest::routes;
use crate::config::TeachersConfig;
use crate::contract::client::TeachersApi;
use crate::domain::repo::TeachersRepository;
use crate::domain::service::Service;
use crate::gateways::local::TeachersLocalClient;
use crate::infra::storage::sea_orm_repo::{connect, ensure_schema};
use crate::infra::storage::{InMemoryTeachersRepository, SeaOrmTeachersRepository};

/// The teachers module: repository, service, REST state and local client
/// wired together once at startup.
#[derive(Clone)]
pub struct TeachersModule {
    service: Arc<Service>,
    rest_state: Arc<TeachersRestState>,
}

impl TeachersModule {
    pub fn new(repo: Arc<dyn TeachersRepository>, config: &TeachersConfig) -> Self {
        debug!(
            "Loaded teachers config: max_name_length={}, public_base_url={:?}",
            config.max_name_length, config.public_base_url
        );
        let service = Arc::new(Service::new(repo));
        let rest_state = Arc::new(TeachersRestState::new(service.clone(), config));
        Self {
            service,
            rest_state,
        }
    }

    /// Module backed by the in-memory store.
    pub fn in_memory(config: &TeachersConfig) -> Self {
        info!("Initializing teachers module with in-memory storage");
        Self::new(Arc::new(InMemoryTeachersRepository::new()), config)
    }

    /// Module backed by SeaORM; creates the schema if needed.
    pub async fn with_database(
        url: &str,
        max_conns: Option<u32>,
        config: &TeachersConfig,
    ) -> anyhow::Result<Self> {
        info!("Initializing teachers module with database storage");
        let conn = connect(url, max_conns).await?;
        ensure_schema(&conn).await?;
        info!("Teachers schema is ready");
        Ok(Self::new(
            Arc::new(SeaOrmTeachersRepository::new(conn)),
            config,
        ))
    }

    /// Replace the REST state, e.g. to plug in custom validators.
    pub fn with_rest_state(mut self, state: TeachersRestState) -> Self {
        self.rest_state = Arc::new(state);
        self
    }

    /// Register the REST routes on `router`.
    pub fn router(&self, router: Router) -> Router {
        info!("Registering teachers REST routes");
        routes::register_routes(router, self.rest_state.clone())
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        <TeachersApiDoc as utoipa::OpenApi>::openapi()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn TeachersApi> {
        Arc::new(TeachersLocalClient::new(self.service.clone()))
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }
}

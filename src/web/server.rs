use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::predict::{Catalog, Engine, Sgp4Oracle};

use super::api::visibility as visibility_handlers;
use super::api_doc::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Engine,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        let engine = Engine::new(
            Arc::new(catalog),
            Arc::new(Sgp4Oracle),
            config.visibility.clone(),
        );
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(visibility_handlers::usage))
        .route("/brighest", get(visibility_handlers::brighest))
        .route("/nextVisible", get(visibility_handlers::next_visible))
        .route("/satellitePasses", get(visibility_handlers::satellite_passes))
        .route("/satellites", get(visibility_handlers::list_satellites))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the listener fails. The catalog must already be loaded.
pub async fn run_server(state: AppState) -> std::io::Result<()> {
    let bind_addr = state.config.server.address();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await
}

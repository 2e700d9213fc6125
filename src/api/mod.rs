mod handlers;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::db::Database;

/// Router with permissive CORS.
pub fn create_router(db: Database) -> Router {
    build_router(db, CorsLayer::permissive())
}

/// Router honouring the CORS origins in `config`.
pub fn create_router_with_config(db: Database, config: &ServerConfig) -> Router {
    build_router(db, cors_layer(config.cors_origins.as_deref()))
}

fn build_router(db: Database, cors: CorsLayer) -> Router {
    let api = Router::new()
        // Models
        .route("/models", get(handlers::list_models).post(handlers::create_model))
        .route(
            "/models/{urn}",
            get(handlers::get_model)
                .put(handlers::replace_model)
                .delete(handlers::delete_model),
        )
        // Parts
        .route("/models/{urn}/parts", post(handlers::add_part))
        .route("/models/{urn}/parts/{part_id}", get(handlers::get_part))
        // Comments
        .route(
            "/models/{urn}/parts/{part_id}/comments",
            get(handlers::get_comments).post(handlers::set_comment),
        )
        .route(
            "/models/{urn}/parts/{part_id}/comments/{key}",
            delete(handlers::delete_comment),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(db)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

//! HTTP adapter - axum router, shared state and handlers for the product API.

/// Bearer-token middleware and verifier seam
pub mod auth;
/// Uniform response envelope and error mapping
pub mod envelope;
/// Product route handlers
pub mod products;

use crate::{
    config::AppConfig,
    core::{LocalFileStore, ProductService, SeaProductRepository},
};
use auth::{StaticTokenVerifier, TokenVerifier, require_bearer_token};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub verifier: Arc<dyn TokenVerifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires the `SeaORM` repository, the local file store and the static
    /// token verifier from configuration.
    #[must_use]
    pub fn from_config(config: Arc<AppConfig>, db: DatabaseConnection) -> Self {
        let products = ProductService::new(
            Arc::new(SeaProductRepository::new(db)),
            Arc::new(LocalFileStore::from_config(&config)),
        );
        Self {
            products,
            verifier: Arc::new(StaticTokenVerifier::from_config(&config.auth)),
            config,
        }
    }
}

/// Builds the application router.
///
/// Product routes sit behind the bearer-token middleware. Stored images are
/// served publicly from `/storage/products`.
pub fn router(state: AppState) -> Router {
    let images_dir = LocalFileStore::from_config(&state.config)
        .images_dir()
        .to_path_buf();

    let products = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/show/{id}", get(products::show_product))
        .route("/products/edit/{id}", post(products::update_product))
        .route("/products/delete/{id}", delete(products::destroy_product))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token,
        ));

    Router::new()
        .merge(products)
        .nest_service("/storage/products", ServeDir::new(images_dir))
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

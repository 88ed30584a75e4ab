#![forbid(unsafe_code)]

//! HTML front end for the cafe catalogue.
//!
//! [`build_router`] wires the list, add, edit, and delete pages over any
//! [`CafeStore`]. All shared state lives in [`AppState`], built once at
//! startup and handed to axum.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use brewmap_store::CafeStore;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod csrf;
mod http;
mod middleware;

pub use config::{
    validate_startup_config, ServerConfig, CONFIG_SCHEMA_VERSION, MIN_SECRET_KEY_BYTES,
};
pub use csrf::{is_valid_nonce, new_nonce, CsrfError, CsrfGuard, CSRF_COOKIE};
pub use http::forms::{
    AddCafeForm, DeleteForm, EditCafeForm, FormErrors, CSRF_FIELD, INVALID_CHOICE_MESSAGE,
    REQUIRED_MESSAGE,
};

pub const CRATE_NAME: &str = "brewmap-server";
pub const AUDIT_LOG_TARGET: &str = http::handlers::AUDIT_TARGET;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CafeStore>,
    pub config: ServerConfig,
    pub csrf: Arc<CsrfGuard>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<dyn CafeStore>, config: ServerConfig) -> Result<Self, String> {
        let csrf = CsrfGuard::new(&config.secret_key, config.csrf_ttl)?;
        Ok(Self {
            store,
            config,
            csrf: Arc::new(csrf),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::list_cafes_handler))
        .route(
            "/add",
            get(http::handlers::add_form_handler).post(http::handlers::add_submit_handler),
        )
        .route(
            "/edit",
            get(http::handlers::edit_form_handler).post(http::handlers::edit_submit_handler),
        )
        .route(
            "/delete",
            get(http::handlers::delete_get_handler).post(http::handlers::delete_post_handler),
        )
        .route("/healthz", get(http::handlers::healthz_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}

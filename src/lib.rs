pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .allowed_origins
                .iter()
                .map(|origin| origin.parse::<HeaderValue>().unwrap())
                .collect::<Vec<_>>(),
        )
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/accounts/register/", post(handlers::auth::register))
        .route("/accounts/login/", post(handlers::auth::login))
        .route("/polls/", get(handlers::polls::index))
        .route("/polls/{question_id}/", get(handlers::polls::detail))
        .route(
            "/polls/{question_id}/results/",
            get(handlers::polls::results),
        );

    // Protected routes (bearer token enforced by the AuthUser extractor)
    let protected_routes = Router::new()
        .route("/accounts/logout/", post(handlers::auth::logout))
        .route("/polls/{question_id}/vote/", post(handlers::polls::vote));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

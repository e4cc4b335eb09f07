//! Alumnet HTTP server — the axum surface over the authentication
//! services: registration, email verification, login, password reset,
//! and the institution approval console feed.

pub mod config;
pub mod envelope;
pub mod handlers;
pub mod mailer;
pub mod payload;
pub mod throttle;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use chrono::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use alumnet_auth::AuthService;
use alumnet_db::repository::{
    SurrealPendingRegistrationRepository, SurrealUserRepository,
    SurrealVerificationTokenRepository,
};

use crate::config::ServerConfig;
use crate::handlers::{approval, auth};
use crate::mailer::Mailer;
use crate::throttle::FixedWindowThrottle;

pub type ServerAuthService = AuthService<
    SurrealUserRepository<Any>,
    SurrealPendingRegistrationRepository<Any>,
    SurrealVerificationTokenRepository<Any>,
>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<ServerAuthService>,
    pub mailer: Arc<dyn Mailer>,
    pub throttle: Arc<FixedWindowThrottle>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, config: &ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        let (users, pending) = match &config.auth.pepper {
            Some(pepper) => (
                SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
                SurrealPendingRegistrationRepository::with_pepper(db.clone(), pepper.clone()),
            ),
            None => (
                SurrealUserRepository::new(db.clone()),
                SurrealPendingRegistrationRepository::new(db.clone()),
            ),
        };
        let tokens = SurrealVerificationTokenRepository::new(db);

        Self {
            auth: Arc::new(AuthService::new(
                users,
                pending,
                tokens,
                config.auth.clone(),
            )),
            mailer,
            throttle: Arc::new(FixedWindowThrottle::new(
                config.throttle_limit,
                Duration::seconds(config.throttle_window_secs),
            )),
        }
    }
}

/// Builds the router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-email-code", post(auth::verify_email_code))
        .route("/auth/verify-email", get(auth::verify_email_link))
        .route("/auth/resend-verification", post(auth::resend_verification))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route(
            "/institution/pending-alumni",
            get(approval::pending_alumni),
        )
        .route(
            "/institution/alumni/{id}/approve",
            post(approval::approve_alumni),
        )
        .route(
            "/institution/alumni/{id}/reject",
            post(approval::reject_alumni),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

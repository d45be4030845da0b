//! Account transfer service.
//!
//! A REST API for managing bank accounts and moving money between them.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Money**: integer cents internally, decimals on the wire
//! - **Format**: JSON requests/responses
//!
//! Handlers call `AccountService`, which talks to storage only through the
//! `AccountRepository` trait.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::services::AccountService;

/// Build the HTTP router with every route and middleware.
pub fn router(service: AccountService) -> Router {
    Router::new()
        // Account management routes
        .route(
            "/account",
            get(handlers::accounts::list_accounts)
                .post(handlers::accounts::create_account)
                .put(handlers::accounts::update_account)
                .delete(handlers::accounts::delete_account),
        )
        .route("/account/{id}", get(handlers::accounts::get_account))
        // Transfer route
        .route("/transfer", post(handlers::transfers::create_transfer))
        .route("/health", get(handlers::health::health_check))
        // Add tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share the service with all handlers via State extraction
        .with_state(service)
}

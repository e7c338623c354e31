//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores, payment gateway, token signing
//! - `routes/`: HTTP handlers, one file per collection
//! - `dto.rs`: request/response bodies that are not plain documents
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, middleware::from_fn_with_state};
use bistro_auth::Gate;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::{self, GateState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let gate = GateState {
        jwt: services.jwt.clone(),
        users: services.stores.users.clone(),
        gate: Gate::TOKEN,
    };

    let token_gated = routes::token_router().route_layer(from_fn_with_state(
        gate.with_gate(Gate::TOKEN),
        middleware::enforce,
    ));
    let admin_gated = routes::admin_router().route_layer(from_fn_with_state(
        gate.with_gate(Gate::ADMIN),
        middleware::enforce,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::open_router()
        .merge(token_gated)
        .merge(admin_gated)
        .layer(Extension(Arc::new(services)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

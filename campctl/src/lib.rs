//! # campctl: Scouting-Camp Logistics Backend
//!
//! `campctl` is the backend for a scouting organisation's camp logistics. Each
//! scout group gets an account and manages its own equipment and calendar:
//! tents, camps and outings, tent reservations for those events, and periodic
//! tent condition inspections. A shared menu catalog with per-event meal plans
//! is available to every group.
//!
//! ## Overview
//!
//! Groups are the tenancy boundary. A group authenticates with its login and
//! password and receives a JWT access/refresh token pair. Every subsequent
//! request carries the access token, and all tent, event, reservation and
//! inspection queries are scoped to the authenticated group. A tent or event
//! belonging to another group behaves exactly like one that does not exist.
//! Reservations and inspections are owned transitively through their tent, so
//! the same scoping applies through a join.
//!
//! Menus and event meal plans are deliberately unscoped: the catalog is
//! maintained collectively and readable and writable by any authenticated
//! group.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum) and all
//! persistence lives in PostgreSQL.
//!
//! The **API layer** ([`api`]) exposes the REST surface under `/v2/*` and the
//! generated OpenAPI documentation under `/docs`. Handlers validate input,
//! enforce cross-resource ownership, and translate between wire models and
//! database models.
//!
//! The **authentication layer** ([`auth`]) covers password hashing, JWT
//! issuance and verification, and the [`auth::current_group::CurrentGroup`]
//! extractor that resolves a bearer token to a live group account.
//!
//! The **database layer** ([`db`]) uses the repository pattern. Each entity
//! has a repository handling queries and mutations; group-owned repositories
//! are constructed with the tenant id so scoping cannot be forgotten at a
//! call site.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use campctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = campctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     campctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test;

use crate::auth::token::TokenCodec;
use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::http::HeaderValue;
use axum::{
    http,
    routing::{get, patch, post},
    Json, Router,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{EventId, EventMenuId, GroupId, InspectionId, MenuId, ReservationId, TentId};

/// Application state shared across all request handlers.
///
/// Holds the database pool, the loaded configuration and the token codec used
/// to sign and verify JWTs.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub tokens: TokenCodec,
}

/// Get the campctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.auth.cors.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.auth.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// CORS is not applied here; [`Application::new`] layers it on top so that
/// invalid origin configuration fails at startup rather than per request.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/refresh", post(api::handlers::auth::refresh))
        .route("/auth/groups", post(api::handlers::auth::create_group));

    let group_routes = Router::new()
        .route("/groups/me", get(api::handlers::groups::me))
        .route("/groups/me/email", patch(api::handlers::groups::update_email))
        .route("/groups/me/members", patch(api::handlers::groups::update_members))
        .route("/groups/me/name", patch(api::handlers::groups::update_name));

    let tent_routes = Router::new()
        .route(
            "/tents",
            get(api::handlers::tents::list_tents).post(api::handlers::tents::create_tent),
        )
        .route(
            "/tents/{id}",
            get(api::handlers::tents::get_tent)
                .put(api::handlers::tents::update_tent)
                .delete(api::handlers::tents::delete_tent),
        );

    let event_routes = Router::new()
        .route(
            "/events",
            get(api::handlers::events::list_events).post(api::handlers::events::create_event),
        )
        .route(
            "/events/{id}",
            get(api::handlers::events::get_event)
                .put(api::handlers::events::update_event)
                .delete(api::handlers::events::delete_event),
        );

    let reservation_routes = Router::new()
        .route(
            "/reservations",
            get(api::handlers::reservations::list_reservations).post(api::handlers::reservations::create_reservation),
        )
        .route(
            "/reservations/{id}",
            get(api::handlers::reservations::get_reservation)
                .put(api::handlers::reservations::update_reservation)
                .delete(api::handlers::reservations::delete_reservation),
        );

    let inspection_routes = Router::new()
        .route(
            "/inspections",
            get(api::handlers::inspections::list_inspections).post(api::handlers::inspections::create_inspection),
        )
        .route(
            "/inspections/{id}",
            get(api::handlers::inspections::get_inspection)
                .put(api::handlers::inspections::update_inspection)
                .delete(api::handlers::inspections::delete_inspection),
        );

    let menu_routes = Router::new()
        .route(
            "/menus",
            get(api::handlers::menus::list_menus).post(api::handlers::menus::create_menu),
        )
        .route(
            "/menus/{id}",
            get(api::handlers::menus::get_menu)
                .put(api::handlers::menus::update_menu)
                .delete(api::handlers::menus::delete_menu),
        )
        .route(
            "/event-menus",
            get(api::handlers::menus::list_event_menus).post(api::handlers::menus::create_event_menu),
        )
        .route(
            "/event-menus/{id}",
            get(api::handlers::menus::get_event_menu)
                .put(api::handlers::menus::update_event_menu)
                .delete(api::handlers::menus::delete_event_menu),
        );

    let v2 = auth_routes
        .merge(group_routes)
        .merge(tent_routes)
        .merge(event_routes)
        .merge(reservation_routes)
        .merge(inspection_routes)
        .merge(menu_routes);

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .nest("/v2", v2)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to PostgreSQL, runs migrations
///    and builds the router
/// 2. **Serve**: [`Application::serve`] binds the listener and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting campctl with configuration: {:#?}", config);

        let pool = PgPool::connect(&config.database_url).await?;
        migrator().run(&pool).await?;

        let tokens = TokenCodec::from_config(&config)?;
        let state = AppState::builder().db(pool.clone()).config(config.clone()).tokens(tokens).build();

        let router = build_router(state).layer(create_cors_layer(&config)?);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "campctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

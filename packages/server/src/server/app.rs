//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    claim_ticket_handler, create_event, delete_event, get_event, get_ticket, health_handler,
    list_attendees, list_categories, list_events, list_my_events, list_my_tickets,
    organizer_summary, redeem_ticket_handler, update_event,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, jwt_secret: &str, jwt_issuer: String) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));

    let app_state = AppState {
        db_pool: pool,
        jwt_service: jwt_service.clone(),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting: 10 requests per second per IP with bursts up to 20.
    // Claim spikes at ticket-drop time are the expected hot path; the
    // limiter protects the store, not fairness between claimants.
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers() // Extract IP from X-Forwarded-For header
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let api = Router::new()
        // Event discovery
        .route("/events", get(list_events))
        .route("/events/categories", get(list_categories))
        .route("/events/:id", get(get_event))
        // Organizer event management
        .route("/events", post(create_event))
        .route("/events/:id", put(update_event))
        .route("/events/:id", delete(delete_event))
        .route("/organizer/events", get(list_my_events))
        .route("/organizer/summary", get(organizer_summary))
        // Tickets
        .route("/events/:id/claim", post(claim_ticket_handler))
        .route("/events/:id/attendees", get(list_attendees))
        .route("/tickets", get(list_my_tickets))
        .route("/tickets/:id", get(get_ticket))
        .route("/tickets/redeem", post(redeem_ticket_handler))
        .layer(rate_limit_layer);

    let jwt_service_for_middleware = jwt_service;

    api
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(app_state)) // Shared state (after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use whatsapp::{WhatsAppOptions, WhatsAppService};

use crate::config::Config;
use crate::domains::audit::PostgresAuditRecorder;
use crate::domains::auth::JwtService;
use crate::kernel::{ServerDeps, WhatsAppAdapter};
use crate::server::middleware::{extract_client_ip, jwt_auth_middleware};
use crate::server::routes::{
    assign_handler, available_users_handler, create_appointment_handler, create_company_handler,
    create_department_handler, create_grievance_handler, create_user_handler,
    get_appointment_handler, get_grievance_handler, health_handler, list_appointments_handler,
    list_companies_handler, list_departments_handler, list_grievances_handler,
    list_users_handler, logout_handler, recent_audit_handler, request_otp_handler,
    update_status_handler, verify_otp_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub deps: ServerDeps,
    pub otp_ttl_minutes: i64,
}

/// Build the Axum application router
///
/// Wires the WhatsApp notifier and the Postgres audit recorder into the
/// dependency container and mounts the REST surface behind the middleware
/// stack.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    // WhatsApp client (citizen notifications + OTP delivery)
    let whatsapp = Arc::new(WhatsAppService::new(WhatsAppOptions {
        access_token: config.whatsapp_access_token.clone(),
        phone_number_id: config.whatsapp_phone_number_id.clone(),
        api_base: config.whatsapp_api_base.clone(),
    }));

    // JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
    ));

    let deps = ServerDeps::new(
        pool.clone(),
        Arc::new(WhatsAppAdapter::new(whatsapp)),
        Arc::new(PostgresAuditRecorder::new(pool.clone())),
        jwt_service.clone(),
    );

    // Create shared app state
    let app_state = AxumAppState {
        db_pool: pool,
        deps,
        otp_ttl_minutes: config.otp_ttl_minutes,
    };

    // CORS configuration - the dashboard runs as a separate service
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = jwt_service.clone();

    // Rate limiting configuration
    // 10 requests per second per IP with bursts up to 20
    let rate_limit_config = std::sync::Arc::new(
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
        // Auth
        .route("/auth/otp/request", post(request_otp_handler))
        .route("/auth/otp/verify", post(verify_otp_handler))
        .route("/auth/logout", post(logout_handler))
        // Workflow engines
        .route("/status/:record_type/:id", put(update_status_handler))
        .route("/assignments/:record_type/:id/assign", put(assign_handler))
        .route("/assignments/users/available", get(available_users_handler))
        // Record collections
        .route(
            "/grievances",
            get(list_grievances_handler).post(create_grievance_handler),
        )
        .route("/grievances/:id", get(get_grievance_handler))
        .route(
            "/appointments",
            get(list_appointments_handler).post(create_appointment_handler),
        )
        .route("/appointments/:id", get(get_appointment_handler))
        // Activity feed
        .route("/audit/recent", get(recent_audit_handler))
        // Administration
        .route(
            "/companies",
            get(list_companies_handler).post(create_company_handler),
        )
        .route(
            "/companies/:id/departments",
            get(list_departments_handler).post(create_department_handler),
        )
        .route("/users", get(list_users_handler).post(create_user_handler));

    Router::new()
        .nest("/api", api)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        })) // JWT authentication
        .layer(rate_limit_layer)
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(app_state)) // Shared state (after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

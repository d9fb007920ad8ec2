use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{handlers, middleware, openapi::ApiDoc};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    // Swap request routes (company-scoped)
    let swap_routes = Router::new()
        .route("/", post(handlers::swaps_handler::create_swap_request))
        .route("/", get(handlers::swaps_handler::get_company_swap_requests))
        // /my must come before /{requestId} routes to prevent shadowing
        .route("/my", get(handlers::swaps_handler::get_my_swap_requests))
        .route("/{requestId}/accept", post(handlers::swaps_handler::accept_swap_request))
        .route("/{requestId}/approve", post(handlers::swaps_handler::approve_swap_request))
        .route("/{requestId}/decline", post(handlers::swaps_handler::decline_swap_request));

    // Schedule routes
    let schedule_routes = Router::new()
        .route("/", get(handlers::schedules_handler::get_schedules))
        .route("/", post(handlers::schedules_handler::create_schedule))
        .route("/{scheduleId}/assignments", post(handlers::schedules_handler::assign_worker));

    // Notice routes
    let notice_routes = Router::new()
        .route("/", get(handlers::notices_handler::get_notices))
        .route("/", post(handlers::notices_handler::create_notice))
        .route("/{noticeId}", put(handlers::notices_handler::update_notice))
        .route("/{noticeId}", delete(handlers::notices_handler::delete_notice));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/members/me", get(handlers::members_handler::get_me))
        .route("/api/companies", get(handlers::companies_handler::get_my_companies))
        .route("/api/companies", post(handlers::companies_handler::create_company))
        .route("/api/companies/{companyId}", get(handlers::companies_handler::get_company))
        .route(
            "/api/companies/{companyId}/members",
            get(handlers::members_handler::get_company_members),
        )
        .route(
            "/api/companies/{companyId}/assignments/{assignmentId}",
            delete(handlers::schedules_handler::remove_assignment),
        )
        .route(
            "/api/companies/{companyId}/workers/{memberId}/fixed-shifts",
            get(handlers::fixed_shifts_handler::get_fixed_shifts),
        )
        .route(
            "/api/companies/{companyId}/workers/{memberId}/fixed-shifts",
            put(handlers::fixed_shifts_handler::update_fixed_shifts),
        )
        .nest("/api/companies/{companyId}/swaps", swap_routes)
        .nest("/api/companies/{companyId}/schedules", schedule_routes)
        .nest("/api/companies/{companyId}/notices", notice_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn swagger_ui() -> Html<&'static str> {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ShiftSwap API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: '/api-docs/openapi.json',
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
    "#)
}

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::{auth, AppState};

/// Extracts the bearer token from either the session cookie (frontend) or
/// the Authorization header (API clients and tests)
fn extract_token_from_request(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts.headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            // Parse cookies manually (cookie = "name=value; name2=value2")
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(value) = cookie.strip_prefix("session=") {
                    return Some(value.to_string());
                }
            }
        }
    }

    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    None
}

#[derive(Debug, Clone)]
pub struct AuthenticatedMember {
    pub member_id: Uuid,
    pub name: String,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedMember {
    type Rejection = (StatusCode, axum::Json<serde_json::Value>);

    fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = extract_token_from_request(parts);
        let state = state.clone();

        async move {
            let token = token.ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({"error": "Missing authentication: no session cookie or Authorization header"})),
                )
            })?;

            let member_id = auth::validate_token(&token, &state.config.auth_token_secret)
                .map_err(|e| {
                    (
                        StatusCode::UNAUTHORIZED,
                        axum::Json(json!({"error": e})),
                    )
                })?;

            // The token only proves identity; the member row must still exist.
            let name: Option<(String,)> = sqlx::query_as(
                r#"SELECT name FROM "Members" WHERE member_id = $1"#,
            )
            .bind(member_id)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, member_id = %member_id, "Member lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({"error": "Database error"})),
                )
            })?;

            match name {
                Some((name,)) => {
                    tracing::debug!(member_id = %member_id, "Member resolved from token");
                    Ok(AuthenticatedMember { member_id, name })
                }
                None => {
                    tracing::warn!(member_id = %member_id, "Token subject has no member row");
                    Err((
                        StatusCode::UNAUTHORIZED,
                        axum::Json(json!({"error": format!("Member {} not found", member_id)})),
                    ))
                }
            }
        }
    }
}

use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::AuthenticatedMember,
    models::Member,
    AppError, AppResult, AppState,
};

/// GET /api/members/me - The caller's own profile
#[utoipa::path(
    get,
    path = "/api/members/me",
    responses(
        (status = 200, description = "Profile of the authenticated member", body = Member),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "members",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedMember,
) -> AppResult<Json<Member>> {
    let member = sqlx::query_as::<_, Member>(
        r#"SELECT member_id, name, email, created_at FROM "Members" WHERE member_id = $1"#,
    )
    .bind(auth.member_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Member {} not found", auth.member_id)))?;

    Ok(Json(member))
}

/// GET /api/companies/{companyId}/members - Workers of a company
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/members",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Members of the company, alphabetical", body = Vec<Member>)
    ),
    tag = "members"
)]
pub async fn get_company_members(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<Vec<Member>>> {
    let members = sqlx::query_as::<_, Member>(
        r#"
        SELECT m.member_id, m.name, m.email, m.created_at
        FROM "Members" m
        INNER JOIN "CompanyMembers" cm ON m.member_id = cm.member_id
        WHERE cm.company_id = $1
        ORDER BY m.name
        "#,
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(members))
}

/// Existence check for a member referenced by id.
pub(crate) async fn resolve_member(db: &PgPool, member_id: Uuid) -> AppResult<()> {
    let exists: (bool,) =
        sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM "Members" WHERE member_id = $1)"#)
            .bind(member_id)
            .fetch_one(db)
            .await?;

    if !exists.0 {
        return Err(AppError::NotFound(format!("Member {} not found", member_id)));
    }

    Ok(())
}

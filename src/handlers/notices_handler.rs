use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::{permissions, AuthenticatedMember},
    models::{CreateNoticeInput, Notice, NoticeMutationResponse, NoticeWithWriter, UpdateNoticeInput},
    AppError, AppResult, AppState,
};

#[derive(Debug, FromRow)]
struct NoticeRow {
    notice_id: Uuid,
    company_id: Uuid,
    title: String,
    content: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    writer_name: String,
}

/// GET /api/companies/{companyId}/notices
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/notices",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company notices, newest first", body = Vec<NoticeWithWriter>)
    ),
    tag = "notices"
)]
pub async fn get_notices(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<Vec<NoticeWithWriter>>> {
    let rows = sqlx::query_as::<_, NoticeRow>(
        r#"
        SELECT n.notice_id, n.company_id, n.title, n.content, n.created_by, n.created_at,
               m.name AS writer_name
        FROM "Notices" n
        INNER JOIN "Members" m ON n.created_by = m.member_id
        WHERE n.company_id = $1
        ORDER BY n.created_at DESC
        "#,
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await?;

    let notices = rows
        .into_iter()
        .map(|row| NoticeWithWriter {
            notice: Notice {
                notice_id: row.notice_id,
                company_id: row.company_id,
                title: row.title,
                content: row.content,
                created_by: row.created_by,
                created_at: row.created_at,
            },
            writer_name: row.writer_name,
        })
        .collect();

    Ok(Json(notices))
}

/// POST /api/companies/{companyId}/notices - Post a notice (owner only)
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/notices",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    request_body = CreateNoticeInput,
    responses(
        (status = 200, description = "Notice created", body = Notice),
        (status = 400, description = "Title or content empty"),
        (status = 403, description = "Only the company owner may post notices"),
        (status = 404, description = "Company not found")
    ),
    tag = "notices",
    security(("bearer_auth" = []))
)]
pub async fn create_notice(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
    auth: AuthenticatedMember,
    Json(input): Json<CreateNoticeInput>,
) -> AppResult<Json<Notice>> {
    permissions::require_company_owner(&state.db, company_id, auth.member_id).await?;

    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "title and content must not be empty".to_string(),
        ));
    }

    let notice = sqlx::query_as::<_, Notice>(
        r#"
        INSERT INTO "Notices" (notice_id, company_id, title, content, created_by, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING notice_id, company_id, title, content, created_by, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company_id)
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(auth.member_id)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(notice_id = %notice.notice_id, company_id = %company_id, "Notice created");
    Ok(Json(notice))
}

/// PUT /api/companies/{companyId}/notices/{noticeId} - Update a notice (owner only)
#[utoipa::path(
    put,
    path = "/api/companies/{companyId}/notices/{noticeId}",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("noticeId" = Uuid, Path, description = "Notice ID")
    ),
    request_body = UpdateNoticeInput,
    responses(
        (status = 200, description = "Notice updated", body = Notice),
        (status = 400, description = "No fields to update"),
        (status = 403, description = "Only the company owner may edit notices"),
        (status = 404, description = "Notice not found")
    ),
    tag = "notices",
    security(("bearer_auth" = []))
)]
pub async fn update_notice(
    State(state): State<Arc<AppState>>,
    Path((company_id, notice_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
    Json(input): Json<UpdateNoticeInput>,
) -> AppResult<Json<Notice>> {
    permissions::require_company_owner(&state.db, company_id, auth.member_id).await?;

    // Build dynamic UPDATE query
    let mut updates = vec![];
    let mut bind_count = 1;

    if input.title.is_some() {
        updates.push(format!("title = ${}", bind_count));
        bind_count += 1;
    }
    if input.content.is_some() {
        updates.push(format!("content = ${}", bind_count));
        bind_count += 1;
    }

    if updates.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let sql = format!(
        r#"
        UPDATE "Notices"
        SET {}
        WHERE notice_id = ${} AND company_id = ${}
        RETURNING notice_id, company_id, title, content, created_by, created_at
        "#,
        updates.join(", "),
        bind_count,
        bind_count + 1
    );

    let mut query = sqlx::query_as::<_, Notice>(&sql);

    if let Some(title) = &input.title {
        query = query.bind(title);
    }
    if let Some(content) = &input.content {
        query = query.bind(content);
    }

    query = query.bind(notice_id).bind(company_id);

    match query.fetch_optional(&state.db).await? {
        Some(notice) => Ok(Json(notice)),
        None => Err(AppError::NotFound(format!("Notice {} not found", notice_id))),
    }
}

/// DELETE /api/companies/{companyId}/notices/{noticeId} - Delete a notice (owner only)
#[utoipa::path(
    delete,
    path = "/api/companies/{companyId}/notices/{noticeId}",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("noticeId" = Uuid, Path, description = "Notice ID")
    ),
    responses(
        (status = 200, description = "Notice deleted", body = NoticeMutationResponse),
        (status = 403, description = "Only the company owner may delete notices"),
        (status = 404, description = "Notice not found")
    ),
    tag = "notices",
    security(("bearer_auth" = []))
)]
pub async fn delete_notice(
    State(state): State<Arc<AppState>>,
    Path((company_id, notice_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
) -> AppResult<Json<NoticeMutationResponse>> {
    permissions::require_company_owner(&state.db, company_id, auth.member_id).await?;

    let result = sqlx::query(r#"DELETE FROM "Notices" WHERE notice_id = $1 AND company_id = $2"#)
        .bind(notice_id)
        .bind(company_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Notice {} not found", notice_id)));
    }

    Ok(Json(NoticeMutationResponse {
        success: true,
        message: Some("Notice deleted".to_string()),
    }))
}

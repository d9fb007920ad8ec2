use axum::{
    extract::{Path, State},
    Json,
};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    extractors::AuthenticatedMember,
    models::{Company, CreateCompanyInput},
    AppError, AppResult, AppState,
};

// Company rows change rarely; cache detail lookups with a 60-second TTL
static COMPANY_CACHE: Lazy<Cache<Uuid, Company>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60))
        .build()
});

/// GET /api/companies - Companies the caller belongs to
#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "Companies the member belongs to", body = Vec<Company>)
    ),
    tag = "companies",
    security(("bearer_auth" = []))
)]
pub async fn get_my_companies(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedMember,
) -> AppResult<Json<Vec<Company>>> {
    let companies = sqlx::query_as::<_, Company>(
        r#"
        SELECT c.company_id, c.name, c.owner_id, c.created_at
        FROM "Companies" c
        INNER JOIN "CompanyMembers" cm ON c.company_id = cm.company_id
        WHERE cm.member_id = $1
        ORDER BY c.name
        "#,
    )
    .bind(auth.member_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(companies))
}

/// GET /api/companies/{companyId} - Company detail
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company detail", body = Company),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<Company>> {
    if let Some(cached) = COMPANY_CACHE.get(&company_id).await {
        return Ok(Json(cached));
    }

    let company = sqlx::query_as::<_, Company>(
        r#"SELECT company_id, name, owner_id, created_at FROM "Companies" WHERE company_id = $1"#,
    )
    .bind(company_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Company {} not found", company_id)))?;

    COMPANY_CACHE.insert(company_id, company.clone()).await;
    Ok(Json(company))
}

/// POST /api/companies - Create a company owned by the caller
#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompanyInput,
    responses(
        (status = 200, description = "Company created, caller registered as owner and member", body = Company),
        (status = 400, description = "Name must not be empty")
    ),
    tag = "companies",
    security(("bearer_auth" = []))
)]
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedMember,
    Json(input): Json<CreateCompanyInput>,
) -> AppResult<Json<Company>> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    let mut tx = state.db.begin().await?;

    let company = sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO "Companies" (company_id, name, owner_id, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING company_id, name, owner_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.name.trim())
    .bind(auth.member_id)
    .fetch_one(&mut *tx)
    .await?;

    // The owner also works here; membership drives the open give-away view.
    sqlx::query(
        r#"
        INSERT INTO "CompanyMembers" (company_member_id, company_id, member_id, joined_at)
        VALUES ($1, $2, $3, NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company.company_id)
    .bind(auth.member_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, "Transaction rollback in create_company");
        AppError::Internal(format!("Failed to commit company creation: {}", e))
    })?;

    tracing::info!(
        company_id = %company.company_id,
        owner_id = %auth.member_id,
        "Company created"
    );

    Ok(Json(company))
}

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::AuthenticatedMember,
    handlers::members_handler::resolve_member,
    models::{
        CreateSwapRequestInput, CreateSwapRequestResponse, SwapMutationResponse, SwapRequest,
        SwapRequestSummary, SwapStatus, SwapType,
    },
    AppError, AppResult, AppState,
};

/// Shown as the target of an open give-away ("open to everyone").
const OPEN_TARGET_NAME: &str = "전체 공개";

#[derive(Debug, FromRow)]
struct SwapRequestSummaryRow {
    request_id: Uuid,
    swap_type: SwapType,
    status: SwapStatus,
    created_at: DateTime<Utc>,
    requester_name: String,
    target_name: Option<String>,
    // Enriched from the offered assignment's schedule slot
    work_date: Option<NaiveDate>,
    start_time: Option<String>,
    end_time: Option<String>,
    role_name: Option<String>,
}

const SWAP_BASE_QUERY: &str = r#"
    SELECT
        sr.request_id,
        sr.swap_type,
        sr.status,
        sr.created_at,
        m_req.name AS requester_name,
        m_target.name AS target_name,
        s.work_date,
        to_char(s.start_time, 'HH24:MI') AS start_time,
        to_char(s.end_time, 'HH24:MI') AS end_time,
        s.role_name
    FROM "SwapRequests" sr
    INNER JOIN "Members" m_req ON sr.created_by = m_req.member_id
    LEFT JOIN "Members" m_target ON sr.proposed_to = m_target.member_id
    LEFT JOIN "ScheduleAssignments" fa ON sr.from_assignment_id = fa.assignment_id
    LEFT JOIN "Schedules" s ON fa.schedule_id = s.schedule_id
"#;

fn format_slot_info(work_date: NaiveDate, start: &str, end: &str, role: &str) -> String {
    format!("{} {}~{} ({})", work_date, start, end, role)
}

fn row_to_summary(row: SwapRequestSummaryRow) -> SwapRequestSummary {
    let from_schedule_info = match (row.work_date, row.start_time, row.end_time, row.role_name) {
        (Some(date), Some(start), Some(end), Some(role)) => {
            Some(format_slot_info(date, &start, &end, &role))
        }
        _ => None,
    };

    SwapRequestSummary {
        id: row.request_id,
        requester_name: row.requester_name,
        target_name: row.target_name.unwrap_or_else(|| OPEN_TARGET_NAME.to_string()),
        swap_type: row.swap_type,
        status: row.status,
        created_at: row.created_at,
        from_schedule_info,
    }
}

/// POST /api/companies/{companyId}/swaps - Create a swap or give-away request
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/swaps",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    request_body = CreateSwapRequestInput,
    responses(
        (status = 200, description = "Swap request created successfully", body = CreateSwapRequestResponse),
        (status = 400, description = "toAssignmentId missing for a direct swap, or target is the requester"),
        (status = 403, description = "You can only offer your own shifts"),
        (status = 404, description = "Company, assignment, or target member not found")
    ),
    tag = "swaps",
    security(("bearer_auth" = []))
)]
pub async fn create_swap_request(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
    auth: AuthenticatedMember,
    Json(input): Json<CreateSwapRequestInput>,
) -> AppResult<Json<CreateSwapRequestResponse>> {
    let company_exists: Option<(Uuid,)> =
        sqlx::query_as(r#"SELECT company_id FROM "Companies" WHERE company_id = $1"#)
            .bind(company_id)
            .fetch_optional(&state.db)
            .await?;

    if company_exists.is_none() {
        return Err(AppError::NotFound(format!("Company {} not found", company_id)));
    }

    // The requester may only offer an assignment they currently hold.
    let from_owner: (Uuid,) = sqlx::query_as(
        r#"SELECT member_id FROM "ScheduleAssignments" WHERE assignment_id = $1"#,
    )
    .bind(input.from_assignment_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!("Assignment {} not found", input.from_assignment_id))
    })?;

    if from_owner.0 != auth.member_id {
        return Err(AppError::Forbidden(
            "You can only create requests for your own shifts".to_string(),
        ));
    }

    let request = match input.swap_type {
        SwapType::GiveAway => match input.target_member_id {
            None => SwapRequest::give_away_open(
                company_id,
                input.from_assignment_id,
                auth.member_id,
                input.reason,
            ),
            Some(target_id) => {
                resolve_member(&state.db, target_id).await?;
                SwapRequest::give_away(
                    company_id,
                    input.from_assignment_id,
                    auth.member_id,
                    target_id,
                    input.reason,
                )?
            }
        },
        SwapType::DirectSwap => {
            let to_assignment_id = input.to_assignment_id.ok_or_else(|| {
                AppError::BadRequest("toAssignmentId is required for a direct swap".to_string())
            })?;

            let to_owner: (Uuid,) = sqlx::query_as(
                r#"SELECT member_id FROM "ScheduleAssignments" WHERE assignment_id = $1"#,
            )
            .bind(to_assignment_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Assignment {} not found", to_assignment_id))
            })?;

            // An unspecified target defaults to whoever holds the counterpart shift.
            let target_id = match input.target_member_id {
                Some(target_id) => {
                    resolve_member(&state.db, target_id).await?;
                    target_id
                }
                None => to_owner.0,
            };

            SwapRequest::direct_swap(
                company_id,
                input.from_assignment_id,
                to_assignment_id,
                auth.member_id,
                target_id,
                input.reason,
            )?
        }
    };

    sqlx::query(
        r#"
        INSERT INTO "SwapRequests" (
            request_id, company_id, swap_type, status, from_assignment_id,
            to_assignment_id, created_by, proposed_to, accepted_member, reason, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(request.request_id)
    .bind(request.company_id)
    .bind(request.swap_type)
    .bind(request.status)
    .bind(request.from_assignment_id)
    .bind(request.to_assignment_id)
    .bind(request.created_by)
    .bind(request.proposed_to)
    .bind(request.accepted_member)
    .bind(&request.reason)
    .bind(request.created_at)
    .execute(&state.db)
    .await?;

    tracing::info!(
        request_id = %request.request_id,
        company_id = %company_id,
        requester_id = %auth.member_id,
        swap_type = ?request.swap_type,
        "Swap request created"
    );

    Ok(Json(CreateSwapRequestResponse {
        request_id: request.request_id,
    }))
}

/// POST /api/companies/{companyId}/swaps/{requestId}/accept - Accept a request
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/swaps/{requestId}/accept",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("requestId" = Uuid, Path, description = "Swap request ID")
    ),
    responses(
        (status = 200, description = "Request accepted, awaiting owner approval", body = SwapMutationResponse),
        (status = 403, description = "Actor is not the proposed member, or is the requester"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is not PENDING")
    ),
    tag = "swaps",
    security(("bearer_auth" = []))
)]
pub async fn accept_swap_request(
    State(state): State<Arc<AppState>>,
    Path((company_id, request_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
) -> AppResult<Json<SwapMutationResponse>> {
    let mut tx = state.db.begin().await?;

    let mut request = lock_swap_request(&mut tx, company_id, request_id).await?;

    // Acceptance and the move into the approval queue commit together; the
    // intermediate "accepted but not yet queued" state is never observable.
    request.accept(auth.member_id)?;
    request.request_owner_approval()?;

    sqlx::query(
        r#"
        UPDATE "SwapRequests"
        SET status = $1, accepted_member = $2
        WHERE request_id = $3
        "#,
    )
    .bind(request.status)
    .bind(request.accepted_member)
    .bind(request_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Transaction rollback in accept_swap_request");
        AppError::Internal(format!(
            "Failed to commit acceptance of request {}: {}",
            request_id, e
        ))
    })?;

    tracing::info!(
        request_id = %request_id,
        accepted_by = %auth.member_id,
        "Swap request accepted, awaiting owner approval"
    );

    Ok(Json(SwapMutationResponse {
        success: true,
        message: Some("Request accepted, awaiting owner approval".to_string()),
    }))
}

/// POST /api/companies/{companyId}/swaps/{requestId}/approve - Final approval by the owner
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/swaps/{requestId}/approve",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("requestId" = Uuid, Path, description = "Swap request ID")
    ),
    responses(
        (status = 200, description = "Request approved, schedule assignments updated", body = SwapMutationResponse),
        (status = 403, description = "Actor is not the company owner"),
        (status = 404, description = "Request or company not found"),
        (status = 409, description = "Request is not awaiting approval, or an assignment changed hands since creation")
    ),
    tag = "swaps",
    security(("bearer_auth" = []))
)]
pub async fn approve_swap_request(
    State(state): State<Arc<AppState>>,
    Path((company_id, request_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
) -> AppResult<Json<SwapMutationResponse>> {
    let mut tx = state.db.begin().await?;

    let mut request = lock_swap_request(&mut tx, company_id, request_id).await?;

    let owner_id: (Uuid,) =
        sqlx::query_as(r#"SELECT owner_id FROM "Companies" WHERE company_id = $1"#)
            .bind(request.company_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {} not found", request.company_id)))?;

    request.approve(auth.member_id, owner_id.0)?;

    // The reassignment and the state transition commit or fail as one unit;
    // an APPROVED request with untouched assignments must never be persisted.
    apply_assignment_swap(&mut tx, &request).await?;

    sqlx::query(r#"UPDATE "SwapRequests" SET status = $1 WHERE request_id = $2"#)
        .bind(request.status)
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Transaction rollback in approve_swap_request");
        AppError::Internal(format!(
            "Failed to commit approval of request {}: {}",
            request_id, e
        ))
    })?;

    tracing::info!(
        request_id = %request_id,
        approved_by = %auth.member_id,
        "Swap request approved and schedule updated"
    );

    Ok(Json(SwapMutationResponse {
        success: true,
        message: Some("Request approved, schedule updated".to_string()),
    }))
}

/// POST /api/companies/{companyId}/swaps/{requestId}/decline - Decline a request
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/swaps/{requestId}/decline",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("requestId" = Uuid, Path, description = "Swap request ID")
    ),
    responses(
        (status = 200, description = "Request declined", body = SwapMutationResponse),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is already resolved")
    ),
    tag = "swaps",
    security(("bearer_auth" = []))
)]
pub async fn decline_swap_request(
    State(state): State<Arc<AppState>>,
    Path((company_id, request_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
) -> AppResult<Json<SwapMutationResponse>> {
    let mut tx = state.db.begin().await?;

    let mut request = lock_swap_request(&mut tx, company_id, request_id).await?;

    request.decline()?;

    sqlx::query(r#"UPDATE "SwapRequests" SET status = $1 WHERE request_id = $2"#)
        .bind(request.status)
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Transaction rollback in decline_swap_request");
        AppError::Internal(format!(
            "Failed to commit decline of request {}: {}",
            request_id, e
        ))
    })?;

    tracing::info!(
        request_id = %request_id,
        declined_by = %auth.member_id,
        "Swap request declined"
    );

    Ok(Json(SwapMutationResponse {
        success: true,
        message: Some("Request declined".to_string()),
    }))
}

/// GET /api/companies/{companyId}/swaps/my - Requests the caller can see or act on
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/swaps/my",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Requests where the caller is requester, target, or may accept an open give-away", body = Vec<SwapRequestSummary>)
    ),
    tag = "swaps",
    security(("bearer_auth" = []))
)]
pub async fn get_my_swap_requests(
    State(state): State<Arc<AppState>>,
    Path(_company_id): Path<Uuid>,
    auth: AuthenticatedMember,
) -> AppResult<Json<Vec<SwapRequestSummary>>> {
    // Requester OR proposed target OR an open give-away in a company the
    // member belongs to: workers must see requests they could act on even
    // when not personally named.
    let sql = format!(
        r#"{} WHERE sr.created_by = $1
            OR sr.proposed_to = $1
            OR (sr.swap_type = 'GIVE_AWAY' AND sr.proposed_to IS NULL
                AND sr.company_id IN (
                    SELECT company_id FROM "CompanyMembers" WHERE member_id = $1
                ))
        ORDER BY sr.created_at DESC"#,
        SWAP_BASE_QUERY
    );

    let rows = sqlx::query_as::<sqlx::Postgres, SwapRequestSummaryRow>(&sql)
        .bind(auth.member_id)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, member_id = %auth.member_id, "Failed to fetch member's swap requests");
            e
        })?;

    tracing::debug!(member_id = %auth.member_id, count = rows.len(), "Fetched member's swap requests");
    Ok(Json(rows.into_iter().map(row_to_summary).collect()))
}

/// GET /api/companies/{companyId}/swaps - All of a company's requests (manager view)
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/swaps",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "All swap requests for the company, newest first", body = Vec<SwapRequestSummary>)
    ),
    tag = "swaps"
)]
pub async fn get_company_swap_requests(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<Vec<SwapRequestSummary>>> {
    let sql = format!(
        "{} WHERE sr.company_id = $1 ORDER BY sr.created_at DESC",
        SWAP_BASE_QUERY
    );

    let rows = sqlx::query_as::<sqlx::Postgres, SwapRequestSummaryRow>(&sql)
        .bind(company_id)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, company_id = %company_id, "Failed to fetch company swap requests");
            e
        })?;

    tracing::debug!(company_id = %company_id, count = rows.len(), "Fetched company swap requests");
    Ok(Json(rows.into_iter().map(row_to_summary).collect()))
}

/// Load a request inside the caller's transaction, row-locked so concurrent
/// accept/approve calls on the same request serialize; the loser sees the
/// committed state and fails its own transition check.
async fn lock_swap_request(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    company_id: Uuid,
    request_id: Uuid,
) -> AppResult<SwapRequest> {
    sqlx::query_as::<_, SwapRequest>(
        r#"
        SELECT request_id, company_id, swap_type, status, from_assignment_id,
               to_assignment_id, created_by, proposed_to, accepted_member, reason, created_at
        FROM "SwapRequests"
        WHERE request_id = $1 AND company_id = $2
        FOR UPDATE
        "#,
    )
    .bind(request_id)
    .bind(company_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Request {} not found", request_id)))
}

/// Apply the approved reassignment inside the surrounding transaction.
///
/// Both assignment rows are locked and re-validated against the owners the
/// request recorded; a shift that changed hands since creation fails the
/// whole approval with Conflict instead of silently overwriting it.
async fn apply_assignment_swap(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    request: &SwapRequest,
) -> AppResult<()> {
    let accepted_member = request.accepted_member.ok_or_else(|| {
        AppError::Internal(format!(
            "Request {} reached approval without an accepted member",
            request.request_id
        ))
    })?;

    let from_owner: (Uuid,) = sqlx::query_as(
        r#"SELECT member_id FROM "ScheduleAssignments" WHERE assignment_id = $1 FOR UPDATE"#,
    )
    .bind(request.from_assignment_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| {
        AppError::Conflict(format!(
            "Assignment {} no longer exists",
            request.from_assignment_id
        ))
    })?;

    if from_owner.0 != request.created_by {
        return Err(AppError::Conflict(format!(
            "Assignment {} changed hands since the request was created",
            request.from_assignment_id
        )));
    }

    sqlx::query(r#"UPDATE "ScheduleAssignments" SET member_id = $1 WHERE assignment_id = $2"#)
        .bind(accepted_member)
        .bind(request.from_assignment_id)
        .execute(&mut **tx)
        .await?;

    if request.swap_type == SwapType::DirectSwap {
        let to_assignment_id = request.to_assignment_id.ok_or_else(|| {
            AppError::Internal(format!(
                "Direct swap request {} has no counterpart assignment",
                request.request_id
            ))
        })?;

        let to_owner: (Uuid,) = sqlx::query_as(
            r#"SELECT member_id FROM "ScheduleAssignments" WHERE assignment_id = $1 FOR UPDATE"#,
        )
        .bind(to_assignment_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!("Assignment {} no longer exists", to_assignment_id))
        })?;

        if to_owner.0 != accepted_member {
            return Err(AppError::Conflict(format!(
                "Assignment {} changed hands since the request was created",
                to_assignment_id
            )));
        }

        sqlx::query(r#"UPDATE "ScheduleAssignments" SET member_id = $1 WHERE assignment_id = $2"#)
            .bind(request.created_by)
            .bind(to_assignment_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_row(target_name: Option<String>) -> SwapRequestSummaryRow {
        SwapRequestSummaryRow {
            request_id: Uuid::new_v4(),
            swap_type: SwapType::GiveAway,
            status: SwapStatus::Pending,
            created_at: Utc::now(),
            requester_name: "Alice".to_string(),
            target_name,
            work_date: NaiveDate::from_ymd_opt(2026, 8, 10),
            start_time: Some("09:00".to_string()),
            end_time: Some("13:00".to_string()),
            role_name: Some("hall".to_string()),
        }
    }

    #[test]
    fn test_format_slot_info() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        assert_eq!(
            format_slot_info(date, "09:00", "13:00", "hall"),
            "2026-08-10 09:00~13:00 (hall)"
        );
    }

    #[test]
    fn test_open_request_uses_public_sentinel() {
        let summary = row_to_summary(summary_row(None));
        assert_eq!(summary.target_name, OPEN_TARGET_NAME);

        let summary = row_to_summary(summary_row(Some("Bob".to_string())));
        assert_eq!(summary.target_name, "Bob");
    }

    #[test]
    fn test_missing_slot_leaves_info_empty() {
        let mut row = summary_row(None);
        row.work_date = None;
        let summary = row_to_summary(row);
        assert_eq!(summary.from_schedule_info, None);

        let summary = row_to_summary(summary_row(None));
        assert_eq!(
            summary.from_schedule_info.as_deref(),
            Some("2026-08-10 09:00~13:00 (hall)")
        );
    }
}

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::{permissions, AuthenticatedMember},
    models::{FixedShift, FixedShiftConfig, FixedShiftEntry, UpdateFixedShiftsInput},
    AppError, AppResult, AppState,
};

/// A member may read or edit their own configuration; the company owner may
/// read or edit anyone's.
async fn require_self_or_owner(
    state: &AppState,
    company_id: Uuid,
    member_id: Uuid,
    actor_id: Uuid,
) -> AppResult<()> {
    if actor_id == member_id {
        return Ok(());
    }
    permissions::require_company_owner(&state.db, company_id, actor_id).await
}

/// GET /api/companies/{companyId}/workers/{memberId}/fixed-shifts
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/workers/{memberId}/fixed-shifts",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("memberId" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "The member's weekly fixed-shift configuration", body = FixedShiftConfig),
        (status = 403, description = "Only the member or the company owner may view this")
    ),
    tag = "fixed-shifts",
    security(("bearer_auth" = []))
)]
pub async fn get_fixed_shifts(
    State(state): State<Arc<AppState>>,
    Path((company_id, member_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
) -> AppResult<Json<FixedShiftConfig>> {
    require_self_or_owner(&state, company_id, member_id, auth.member_id).await?;

    let shifts = sqlx::query_as::<_, FixedShift>(
        r#"
        SELECT fixed_shift_id, company_id, member_id, day_of_week, start_time, end_time
        FROM "FixedShifts"
        WHERE company_id = $1 AND member_id = $2
        ORDER BY day_of_week, start_time
        "#,
    )
    .bind(company_id)
    .bind(member_id)
    .fetch_all(&state.db)
    .await?;

    let entries = shifts
        .into_iter()
        .map(|s| FixedShiftEntry {
            day_of_week: s.day_of_week,
            start_time: s.start_time,
            end_time: s.end_time,
        })
        .collect();

    Ok(Json(FixedShiftConfig { member_id, entries }))
}

/// PUT /api/companies/{companyId}/workers/{memberId}/fixed-shifts - Replace the configuration
#[utoipa::path(
    put,
    path = "/api/companies/{companyId}/workers/{memberId}/fixed-shifts",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("memberId" = Uuid, Path, description = "Member ID")
    ),
    request_body = UpdateFixedShiftsInput,
    responses(
        (status = 200, description = "Configuration replaced", body = FixedShiftConfig),
        (status = 400, description = "Invalid weekday or time range"),
        (status = 403, description = "Only the member or the company owner may edit this")
    ),
    tag = "fixed-shifts",
    security(("bearer_auth" = []))
)]
pub async fn update_fixed_shifts(
    State(state): State<Arc<AppState>>,
    Path((company_id, member_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
    Json(input): Json<UpdateFixedShiftsInput>,
) -> AppResult<Json<FixedShiftConfig>> {
    require_self_or_owner(&state, company_id, member_id, auth.member_id).await?;

    for entry in &input.entries {
        if !(1..=7).contains(&entry.day_of_week) {
            return Err(AppError::BadRequest(format!(
                "dayOfWeek must be 1..7, got {}",
                entry.day_of_week
            )));
        }
        if entry.start_time >= entry.end_time {
            return Err(AppError::BadRequest(
                "startTime must be before endTime".to_string(),
            ));
        }
    }

    // Whole-config replacement keeps the update idempotent for the client.
    let mut tx = state.db.begin().await?;

    sqlx::query(r#"DELETE FROM "FixedShifts" WHERE company_id = $1 AND member_id = $2"#)
        .bind(company_id)
        .bind(member_id)
        .execute(&mut *tx)
        .await?;

    for entry in &input.entries {
        sqlx::query(
            r#"
            INSERT INTO "FixedShifts" (fixed_shift_id, company_id, member_id,
                                       day_of_week, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(member_id)
        .bind(entry.day_of_week)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(
            error = %e,
            company_id = %company_id,
            member_id = %member_id,
            "Transaction rollback in update_fixed_shifts"
        );
        AppError::Internal(format!(
            "Failed to commit fixed-shift update for member {}: {}",
            member_id, e
        ))
    })?;

    tracing::info!(
        company_id = %company_id,
        member_id = %member_id,
        entries = input.entries.len(),
        "Fixed-shift configuration replaced"
    );

    Ok(Json(FixedShiftConfig {
        member_id,
        entries: input.entries,
    }))
}

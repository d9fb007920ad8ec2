use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    extractors::{permissions, AuthenticatedMember},
    models::{
        AssignWorkerInput, CreateScheduleInput, Schedule, ScheduleAssignment,
        ScheduleMutationResponse, ScheduleWithWorkers,
    },
    AppError, AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetSchedulesQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/companies/{companyId}/schedules?from=&to=
#[utoipa::path(
    get,
    path = "/api/companies/{companyId}/schedules",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        GetSchedulesQuery
    ),
    responses(
        (status = 200, description = "Schedule slots in the date range with assigned worker names", body = Vec<ScheduleWithWorkers>),
        (status = 400, description = "from and to required")
    ),
    tag = "schedules"
)]
pub async fn get_schedules(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<GetSchedulesQuery>,
) -> AppResult<Json<Vec<ScheduleWithWorkers>>> {
    let from = query
        .from
        .ok_or_else(|| AppError::BadRequest("from required".to_string()))?;
    let to = query
        .to
        .ok_or_else(|| AppError::BadRequest("to required".to_string()))?;

    let schedules = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT schedule_id, company_id, role_name, work_date, start_time, end_time,
               required_headcount, created_at
        FROM "Schedules"
        WHERE company_id = $1 AND work_date BETWEEN $2 AND $3
        ORDER BY work_date, start_time
        "#,
    )
    .bind(company_id)
    .bind(from)
    .bind(to)
    .fetch_all(&state.db)
    .await?;

    let schedule_ids: Vec<Uuid> = schedules.iter().map(|s| s.schedule_id).collect();

    let workers: Vec<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT sa.schedule_id, m.name
        FROM "ScheduleAssignments" sa
        INNER JOIN "Members" m ON sa.member_id = m.member_id
        WHERE sa.schedule_id = ANY($1)
        "#,
    )
    .bind(&schedule_ids)
    .fetch_all(&state.db)
    .await?;

    let mut names_by_slot: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (schedule_id, name) in workers {
        names_by_slot.entry(schedule_id).or_default().push(name);
    }

    let result = schedules
        .into_iter()
        .map(|schedule| {
            let worker_names = names_by_slot.remove(&schedule.schedule_id).unwrap_or_default();
            ScheduleWithWorkers {
                current_headcount: worker_names.len() as i32,
                worker_names,
                schedule,
            }
        })
        .collect();

    Ok(Json(result))
}

/// POST /api/companies/{companyId}/schedules - Create a schedule slot
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/schedules",
    params(
        ("companyId" = Uuid, Path, description = "Company ID")
    ),
    request_body = CreateScheduleInput,
    responses(
        (status = 200, description = "Schedule slot created", body = Schedule),
        (status = 400, description = "Invalid time range or headcount"),
        (status = 403, description = "Only the company owner may edit the rota"),
        (status = 404, description = "Company not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<Uuid>,
    auth: AuthenticatedMember,
    Json(input): Json<CreateScheduleInput>,
) -> AppResult<Json<Schedule>> {
    permissions::require_company_owner(&state.db, company_id, auth.member_id).await?;

    if input.start_time >= input.end_time {
        return Err(AppError::BadRequest(
            "startTime must be before endTime".to_string(),
        ));
    }
    if input.required_headcount < 1 {
        return Err(AppError::BadRequest(
            "requiredHeadcount must be at least 1".to_string(),
        ));
    }

    let schedule = sqlx::query_as::<_, Schedule>(
        r#"
        INSERT INTO "Schedules" (schedule_id, company_id, role_name, work_date,
                                 start_time, end_time, required_headcount, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING schedule_id, company_id, role_name, work_date, start_time, end_time,
                  required_headcount, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company_id)
    .bind(&input.role_name)
    .bind(input.work_date)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.required_headcount)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        schedule_id = %schedule.schedule_id,
        company_id = %company_id,
        "Schedule slot created"
    );

    Ok(Json(schedule))
}

/// POST /api/companies/{companyId}/schedules/{scheduleId}/assignments - Assign a worker
#[utoipa::path(
    post,
    path = "/api/companies/{companyId}/schedules/{scheduleId}/assignments",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("scheduleId" = Uuid, Path, description = "Schedule slot ID")
    ),
    request_body = AssignWorkerInput,
    responses(
        (status = 200, description = "Worker assigned to the slot", body = ScheduleAssignment),
        (status = 403, description = "Only the company owner may edit the rota"),
        (status = 404, description = "Company, slot, or member not found"),
        (status = 409, description = "Member is already assigned to this slot")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn assign_worker(
    State(state): State<Arc<AppState>>,
    Path((company_id, schedule_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
    Json(input): Json<AssignWorkerInput>,
) -> AppResult<Json<ScheduleAssignment>> {
    permissions::require_company_owner(&state.db, company_id, auth.member_id).await?;

    let slot_exists: Option<(Uuid,)> = sqlx::query_as(
        r#"SELECT schedule_id FROM "Schedules" WHERE schedule_id = $1 AND company_id = $2"#,
    )
    .bind(schedule_id)
    .bind(company_id)
    .fetch_optional(&state.db)
    .await?;

    if slot_exists.is_none() {
        return Err(AppError::NotFound(format!("Schedule {} not found", schedule_id)));
    }

    crate::handlers::members_handler::resolve_member(&state.db, input.member_id).await?;

    let already_assigned: (bool,) = sqlx::query_as(
        r#"SELECT EXISTS(SELECT 1 FROM "ScheduleAssignments" WHERE schedule_id = $1 AND member_id = $2)"#,
    )
    .bind(schedule_id)
    .bind(input.member_id)
    .fetch_one(&state.db)
    .await?;

    if already_assigned.0 {
        return Err(AppError::Conflict(format!(
            "Member {} is already assigned to schedule {}",
            input.member_id, schedule_id
        )));
    }

    let assignment = sqlx::query_as::<_, ScheduleAssignment>(
        r#"
        INSERT INTO "ScheduleAssignments" (assignment_id, schedule_id, member_id)
        VALUES ($1, $2, $3)
        RETURNING assignment_id, schedule_id, member_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(schedule_id)
    .bind(input.member_id)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        assignment_id = %assignment.assignment_id,
        schedule_id = %schedule_id,
        member_id = %input.member_id,
        "Worker assigned to slot"
    );

    Ok(Json(assignment))
}

/// DELETE /api/companies/{companyId}/assignments/{assignmentId} - Remove an assignment
#[utoipa::path(
    delete,
    path = "/api/companies/{companyId}/assignments/{assignmentId}",
    params(
        ("companyId" = Uuid, Path, description = "Company ID"),
        ("assignmentId" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment removed", body = ScheduleMutationResponse),
        (status = 403, description = "Only the company owner may edit the rota"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn remove_assignment(
    State(state): State<Arc<AppState>>,
    Path((company_id, assignment_id)): Path<(Uuid, Uuid)>,
    auth: AuthenticatedMember,
) -> AppResult<Json<ScheduleMutationResponse>> {
    permissions::require_company_owner(&state.db, company_id, auth.member_id).await?;

    let result = sqlx::query(
        r#"
        DELETE FROM "ScheduleAssignments" sa
        USING "Schedules" s
        WHERE sa.schedule_id = s.schedule_id
          AND sa.assignment_id = $1
          AND s.company_id = $2
        "#,
    )
    .bind(assignment_id)
    .bind(company_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Assignment {} not found",
            assignment_id
        )));
    }

    Ok(Json(ScheduleMutationResponse {
        success: true,
        message: Some("Assignment removed".to_string()),
    }))
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One time-slotted role on the rota, e.g. "hall, 2026-08-10 09:00~13:00".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub schedule_id: Uuid,
    pub company_id: Uuid,
    pub role_name: String,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_headcount: i32,
    pub created_at: DateTime<Utc>,
}

/// Binding of one worker to one schedule slot. The assignment row is the
/// single source of truth for who works a slot; swap approval rewrites
/// `member_id` and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScheduleAssignment {
    pub assignment_id: Uuid,
    pub schedule_id: Uuid,
    pub member_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleWithWorkers {
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(rename = "workerNames")]
    pub worker_names: Vec<String>,
    #[serde(rename = "currentHeadcount")]
    pub current_headcount: i32,
}

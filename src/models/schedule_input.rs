use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Input for creating a schedule slot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateScheduleInput {
    #[serde(rename = "roleName")]
    pub role_name: String,
    #[serde(rename = "workDate")]
    pub work_date: NaiveDate,
    #[serde(rename = "startTime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endTime")]
    pub end_time: NaiveTime,
    #[serde(rename = "requiredHeadcount")]
    pub required_headcount: i32,
}

/// Input for assigning a worker to a slot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignWorkerInput {
    #[serde(rename = "memberId")]
    pub member_id: Uuid,
}

/// Response for schedule mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}

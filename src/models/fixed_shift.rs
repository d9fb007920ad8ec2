use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One recurring weekly slot in a member's fixed-shift preference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FixedShift {
    pub fixed_shift_id: Uuid,
    pub company_id: Uuid,
    pub member_id: Uuid,
    /// ISO weekday, 1 = Monday .. 7 = Sunday.
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FixedShiftEntry {
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: i16,
    #[serde(rename = "startTime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endTime")]
    pub end_time: NaiveTime,
}

/// Input replacing a member's whole weekly configuration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateFixedShiftsInput {
    pub entries: Vec<FixedShiftEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FixedShiftConfig {
    #[serde(rename = "memberId")]
    pub member_id: Uuid,
    pub entries: Vec<FixedShiftEntry>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::swap_request::{SwapStatus, SwapType};

/// Input for creating a swap or give-away request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSwapRequestInput {
    #[serde(rename = "type")]
    pub swap_type: SwapType,
    /// The requester's own assignment to give up.
    #[serde(rename = "fromAssignmentId")]
    pub from_assignment_id: Uuid,
    /// Counterpart assignment, required for DIRECT_SWAP.
    #[serde(rename = "toAssignmentId")]
    pub to_assignment_id: Option<Uuid>,
    /// Specific member to propose to; absent means open to the company.
    #[serde(rename = "targetMemberId")]
    pub target_member_id: Option<Uuid>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSwapRequestResponse {
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
}

/// Read shape consumed by both worker and manager list views.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SwapRequestSummary {
    pub id: Uuid,
    #[serde(rename = "requesterName")]
    pub requester_name: String,
    /// Target member's name, or the open-public sentinel when untargeted.
    #[serde(rename = "targetName")]
    pub target_name: String,
    #[serde(rename = "type")]
    pub swap_type: SwapType,
    pub status: SwapStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Formatted "date start~end (role)" description of the shift on offer.
    #[serde(rename = "fromScheduleInfo")]
    pub from_schedule_info: Option<String>,
}

/// Response for swap request mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SwapMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}

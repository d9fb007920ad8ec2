use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Input for creating a notice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoticeInput {
    pub title: String,
    pub content: String,
}

/// Input for updating a notice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoticeInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Response for notice mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoticeMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}

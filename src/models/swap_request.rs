use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapType {
    /// One shift handed to another worker, nothing given in return.
    GiveAway,
    /// Two shifts traded between two workers.
    DirectSwap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    Pending,
    AcceptedPendingApproval,
    Approved,
    Declined,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "PENDING",
            SwapStatus::AcceptedPendingApproval => "ACCEPTED_PENDING_APPROVAL",
            SwapStatus::Approved => "APPROVED",
            SwapStatus::Declined => "DECLINED",
        }
    }
}

/// One swap or give-away proposal and its lifecycle state.
///
/// The entity enforces who may act in which state; it never touches the
/// assignment rows themselves. The handlers apply the approved reassignment
/// inside the same transaction that persists the transition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SwapRequest {
    pub request_id: Uuid,
    pub company_id: Uuid,
    pub swap_type: SwapType,
    pub status: SwapStatus,
    pub from_assignment_id: Uuid,
    pub to_assignment_id: Option<Uuid>,
    pub created_by: Uuid,
    pub proposed_to: Option<Uuid>,
    pub accepted_member: Option<Uuid>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SwapRequest {
    /// Give-away with no specific target; any member other than the
    /// requester may accept.
    pub fn give_away_open(
        company_id: Uuid,
        from_assignment_id: Uuid,
        requester_id: Uuid,
        reason: Option<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            company_id,
            swap_type: SwapType::GiveAway,
            status: SwapStatus::Pending,
            from_assignment_id,
            to_assignment_id: None,
            created_by: requester_id,
            proposed_to: None,
            accepted_member: None,
            reason,
            created_at: Utc::now(),
        }
    }

    /// Give-away proposed to one specific member.
    pub fn give_away(
        company_id: Uuid,
        from_assignment_id: Uuid,
        requester_id: Uuid,
        target_id: Uuid,
        reason: Option<String>,
    ) -> AppResult<Self> {
        if target_id == requester_id {
            return Err(AppError::BadRequest(
                "Cannot propose a request to yourself".to_string(),
            ));
        }

        let mut request = Self::give_away_open(company_id, from_assignment_id, requester_id, reason);
        request.proposed_to = Some(target_id);
        Ok(request)
    }

    /// Direct swap of two assignments; the target is the counterpart worker.
    pub fn direct_swap(
        company_id: Uuid,
        from_assignment_id: Uuid,
        to_assignment_id: Uuid,
        requester_id: Uuid,
        target_id: Uuid,
        reason: Option<String>,
    ) -> AppResult<Self> {
        if target_id == requester_id {
            return Err(AppError::BadRequest(
                "Cannot propose a request to yourself".to_string(),
            ));
        }

        Ok(Self {
            request_id: Uuid::new_v4(),
            company_id,
            swap_type: SwapType::DirectSwap,
            status: SwapStatus::Pending,
            from_assignment_id,
            to_assignment_id: Some(to_assignment_id),
            created_by: requester_id,
            proposed_to: Some(target_id),
            accepted_member: None,
            reason,
            created_at: Utc::now(),
        })
    }

    /// Record acceptance by `actor`. Legal only while PENDING; a targeted
    /// request may only be accepted by its target, an open one by anyone
    /// except the requester.
    pub fn accept(&mut self, actor_id: Uuid) -> AppResult<()> {
        if self.status != SwapStatus::Pending {
            return Err(AppError::IllegalState(format!(
                "Request cannot be accepted in state {}",
                self.status.as_str()
            )));
        }

        match self.proposed_to {
            Some(target_id) if actor_id != target_id => {
                return Err(AppError::Forbidden(
                    "Only the proposed member may accept this request".to_string(),
                ));
            }
            None if actor_id == self.created_by => {
                return Err(AppError::Forbidden(
                    "Cannot accept your own request".to_string(),
                ));
            }
            _ => {}
        }

        self.accepted_member = Some(actor_id);
        Ok(())
    }

    /// Move an accepted request into the owner-approval queue. Kept as its
    /// own transition so the awaiting-approval state is explicit, even
    /// though callers invoke it back-to-back with `accept`.
    pub fn request_owner_approval(&mut self) -> AppResult<()> {
        if self.status != SwapStatus::Pending || self.accepted_member.is_none() {
            return Err(AppError::IllegalState(format!(
                "Owner approval requires an accepted PENDING request, current state {}",
                self.status.as_str()
            )));
        }

        self.status = SwapStatus::AcceptedPendingApproval;
        Ok(())
    }

    /// Final approval by the company owner. Does not touch assignments;
    /// that mutation belongs to the caller's transaction.
    pub fn approve(&mut self, actor_id: Uuid, company_owner_id: Uuid) -> AppResult<()> {
        if self.status != SwapStatus::AcceptedPendingApproval {
            return Err(AppError::IllegalState(format!(
                "Request cannot be approved in state {}",
                self.status.as_str()
            )));
        }

        if actor_id != company_owner_id {
            return Err(AppError::Forbidden(
                "Only the company owner may approve this request".to_string(),
            ));
        }

        self.status = SwapStatus::Approved;
        Ok(())
    }

    /// Decline from any non-terminal state.
    pub fn decline(&mut self) -> AppResult<()> {
        match self.status {
            SwapStatus::Pending | SwapStatus::AcceptedPendingApproval => {
                self.status = SwapStatus::Declined;
                Ok(())
            }
            SwapStatus::Approved | SwapStatus::Declined => Err(AppError::IllegalState(format!(
                "Request cannot be declined in state {}",
                self.status.as_str()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid, Uuid, Uuid, Uuid) {
        (
            Uuid::new_v4(), // company
            Uuid::new_v4(), // from assignment
            Uuid::new_v4(), // requester
            Uuid::new_v4(), // target
            Uuid::new_v4(), // owner
        )
    }

    #[test]
    fn test_give_away_full_lifecycle() {
        let (company, from, requester, target, owner) = ids();
        let mut request =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();

        assert_eq!(request.status, SwapStatus::Pending);
        assert_eq!(request.proposed_to, Some(target));

        request.accept(target).unwrap();
        assert_eq!(request.accepted_member, Some(target));
        assert_eq!(request.status, SwapStatus::Pending);

        request.request_owner_approval().unwrap();
        assert_eq!(request.status, SwapStatus::AcceptedPendingApproval);

        request.approve(owner, owner).unwrap();
        assert_eq!(request.status, SwapStatus::Approved);
    }

    #[test]
    fn test_open_give_away_accepts_anyone_but_requester() {
        let (company, from, requester, stranger, _) = ids();
        let mut request = SwapRequest::give_away_open(company, from, requester, None);

        assert!(matches!(
            request.accept(requester),
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(request.accepted_member, None);

        request.accept(stranger).unwrap();
        assert_eq!(request.accepted_member, Some(stranger));
    }

    #[test]
    fn test_targeted_request_rejects_other_actors() {
        let (company, from, requester, target, _) = ids();
        let mut request =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();

        let intruder = Uuid::new_v4();
        assert!(matches!(
            request.accept(intruder),
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(request.status, SwapStatus::Pending);
        assert_eq!(request.accepted_member, None);
    }

    #[test]
    fn test_second_accept_is_illegal() {
        let (company, from, requester, target, _) = ids();
        let mut request =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();

        request.accept(target).unwrap();
        request.request_owner_approval().unwrap();

        assert!(matches!(
            request.accept(target),
            Err(AppError::IllegalState(_))
        ));
    }

    #[test]
    fn test_owner_approval_requires_acceptance_first() {
        let (company, from, requester, target, _) = ids();
        let mut request =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();

        assert!(matches!(
            request.request_owner_approval(),
            Err(AppError::IllegalState(_))
        ));
        assert_eq!(request.status, SwapStatus::Pending);
    }

    #[test]
    fn test_approve_before_acceptance_is_illegal() {
        let (company, from, requester, target, owner) = ids();
        let mut request =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();

        assert!(matches!(
            request.approve(owner, owner),
            Err(AppError::IllegalState(_))
        ));
    }

    #[test]
    fn test_approve_by_non_owner_is_forbidden() {
        let (company, from, requester, target, owner) = ids();
        let mut request =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();

        request.accept(target).unwrap();
        request.request_owner_approval().unwrap();

        let other_manager = Uuid::new_v4();
        assert!(matches!(
            request.approve(other_manager, owner),
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(request.status, SwapStatus::AcceptedPendingApproval);
    }

    #[test]
    fn test_decline_from_pending_and_accepted() {
        let (company, from, requester, target, _) = ids();

        let mut pending =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();
        pending.decline().unwrap();
        assert_eq!(pending.status, SwapStatus::Declined);

        let mut accepted =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();
        accepted.accept(target).unwrap();
        accepted.request_owner_approval().unwrap();
        accepted.decline().unwrap();
        assert_eq!(accepted.status, SwapStatus::Declined);
    }

    #[test]
    fn test_terminal_states_reject_every_transition() {
        let (company, from, requester, target, owner) = ids();

        let mut approved =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();
        approved.accept(target).unwrap();
        approved.request_owner_approval().unwrap();
        approved.approve(owner, owner).unwrap();

        assert!(matches!(approved.accept(target), Err(AppError::IllegalState(_))));
        assert!(matches!(approved.approve(owner, owner), Err(AppError::IllegalState(_))));
        assert!(matches!(approved.decline(), Err(AppError::IllegalState(_))));

        let mut declined =
            SwapRequest::give_away(company, from, requester, target, None).unwrap();
        declined.decline().unwrap();

        assert!(matches!(declined.accept(target), Err(AppError::IllegalState(_))));
        assert!(matches!(declined.approve(owner, owner), Err(AppError::IllegalState(_))));
        assert!(matches!(declined.decline(), Err(AppError::IllegalState(_))));
    }

    #[test]
    fn test_direct_swap_keeps_both_assignments() {
        let (company, from, requester, target, _) = ids();
        let to = Uuid::new_v4();

        let request =
            SwapRequest::direct_swap(company, from, to, requester, target, None).unwrap();
        assert_eq!(request.swap_type, SwapType::DirectSwap);
        assert_eq!(request.to_assignment_id, Some(to));
        assert_eq!(request.proposed_to, Some(target));
    }

    #[test]
    fn test_cannot_target_yourself() {
        let (company, from, requester, _, _) = ids();
        let to = Uuid::new_v4();

        assert!(matches!(
            SwapRequest::give_away(company, from, requester, requester, None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            SwapRequest::direct_swap(company, from, to, requester, requester, None),
            Err(AppError::BadRequest(_))
        ));
    }
}

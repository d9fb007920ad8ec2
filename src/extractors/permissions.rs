use sqlx::PgPool;
use uuid::Uuid;

use crate::{AppError, AppResult};

/// Resolve the company and verify `member_id` is its designated owner.
pub async fn require_company_owner(
    db: &PgPool,
    company_id: Uuid,
    member_id: Uuid,
) -> AppResult<()> {
    let owner: (Uuid,) =
        sqlx::query_as(r#"SELECT owner_id FROM "Companies" WHERE company_id = $1"#)
            .bind(company_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {} not found", company_id)))?;

    if owner.0 != member_id {
        tracing::warn!(
            company_id = %company_id,
            member_id = %member_id,
            "Member attempted an owner-only action"
        );
        return Err(AppError::Forbidden(
            "Only the company owner may perform this action".to_string(),
        ));
    }

    Ok(())
}

pub async fn is_company_member(
    db: &PgPool,
    company_id: Uuid,
    member_id: Uuid,
) -> AppResult<bool> {
    let exists: (bool,) = sqlx::query_as(
        r#"SELECT EXISTS(SELECT 1 FROM "CompanyMembers" WHERE company_id = $1 AND member_id = $2)"#,
    )
    .bind(company_id)
    .bind(member_id)
    .fetch_one(db)
    .await?;

    Ok(exists.0)
}

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use super::claims::MemberClaims;

/// Validate an HS256 bearer token and extract the member id from `sub`.
///
/// Tokens are minted by the external identity service with the same shared
/// secret; this backend never issues them.
pub fn validate_token(token: &str, secret: &str) -> Result<Uuid, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<MemberClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("Token validation failed: {}", e))?;

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| format!("Token subject is not a member id: {}", token_data.claims.sub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn mint(member_id: Uuid, secret: &str, ttl_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = MemberClaims {
            sub: member_id.to_string(),
            exp: now + ttl_secs,
            iat: now,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_round_trip() {
        let member_id = Uuid::new_v4();
        let token = mint(member_id, "test_secret_key_for_testing", 300);

        let validated = validate_token(&token, "test_secret_key_for_testing").unwrap();
        assert_eq!(member_id, validated);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = mint(Uuid::new_v4(), "test_secret_key", 300);
        assert!(validate_token(&token, "a_different_secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = mint(Uuid::new_v4(), "test_secret_key", -3600);
        assert!(validate_token(&token, "test_secret_key").is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = MemberClaims {
            sub: "not-a-uuid".to_string(),
            exp: now + 300,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key"),
        )
        .unwrap();

        assert!(validate_token(&token, "test_secret_key").is_err());
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MemberClaims {
    pub sub: String, // member id (UUID)
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
}

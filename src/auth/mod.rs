pub mod claims;
pub mod jwt;

pub use claims::MemberClaims;
pub use jwt::validate_token;

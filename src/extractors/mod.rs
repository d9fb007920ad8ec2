pub mod auth;
pub mod permissions;

pub use auth::AuthenticatedMember;

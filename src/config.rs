use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub auth_token_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        // Shared secret for the HS256 bearer tokens minted by the identity
        // service; this backend only validates them.
        let auth_token_secret = env::var("AUTH_TOKEN_SECRET")
            .map_err(|_| "AUTH_TOKEN_SECRET must be set".to_string())?;

        if auth_token_secret.len() < 16 {
            return Err("AUTH_TOKEN_SECRET must be at least 16 bytes".to_string());
        }

        Ok(Self {
            database_url,
            auth_token_secret,
        })
    }
}

/// Factory: build the token service from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::token_service::TokenService;

pub fn build_token_service(config: &Config) -> Arc<TokenService> {
    Arc::new(TokenService::new(
        config.auth_token_secret.as_bytes(),
        config.access_token_ttl_seconds,
        config.refresh_token_ttl_seconds,
    ))
}

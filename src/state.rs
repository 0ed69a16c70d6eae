/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: db: PgPool, tokens: TokenService, identities: IdentityStore
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;
use std::time::Duration;

use crate::services::auth::{IdentityStore, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub tokens: Arc<TokenService>,
    pub identities: Arc<dyn IdentityStore>,
    pub identity_lookup_timeout: Duration,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        tokens: Arc<TokenService>,
        identities: Arc<dyn IdentityStore>,
        identity_lookup_timeout: Duration,
    ) -> Self {
        Self {
            db,
            tokens,
            identities,
            identity_lookup_timeout,
        }
    }
}

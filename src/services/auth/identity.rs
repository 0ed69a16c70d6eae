use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::error::AppError;
use crate::repos::user_repo;

/// A resolved user as seen by request handling.
///
/// Rebuilt per request from the user record; never persisted by this layer.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    pub roles: HashSet<String>,
}

/// Lookup interface for resolving the subject of a verified token.
///
/// Kept as a trait so the gate can be exercised without a database.
/// Implementations must be cheap to share (typically behind `Arc`).
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Identity>, AppError>;
}

/// Postgres-backed identity store over the users table.
#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Identity>, AppError> {
        let row = user_repo::find_by_user_id(&self.db, subject)
            .await
            .map_err(|e| {
                error!(subject = %subject, error = %e, "identity lookup failed");
                AppError::Internal
            })?;

        Ok(row.map(|u| Identity {
            subject: u.user_id,
            roles: parse_roles(&u.role),
        }))
    }
}

/// The users table stores roles as one comma-delimited string ("user,admin").
/// Everything above the repo layer compares roles as a set.
pub fn parse_roles(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

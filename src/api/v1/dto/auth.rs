/*
 * Responsibility
 * - /auth 系の request/response DTO
 */
use serde::{Deserialize, Serialize};

/// Request body for `/auth/login`.
///
/// The subject is trusted as pre-verified; passwords are not modeled here.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.user_id.trim().is_empty() {
            return Err("user_id is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

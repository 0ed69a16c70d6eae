/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証や identity lookup は middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */
use std::collections::HashSet;

use crate::error::AppError;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` はログインID（users.user_id）
/// - `roles` は users.role をパースした集合。トークン内の roles ではなく
///   リクエスト時点の DB 値（権限変更が次のリクエストから効く）
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub roles: HashSet<String>,
}

impl AuthCtx {
    pub fn new(subject: String, roles: HashSet<String>) -> Self {
        Self { subject, roles }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Operation-level role gate.
///
/// Anonymous callers (no AuthCtx) fail the same way as authenticated callers
/// missing the role: 403, not 401. The access gate lets credential-less
/// requests through on purpose; this is where they stop.
pub fn require_role<'a>(ctx: Option<&'a AuthCtx>, role: &str) -> Result<&'a AuthCtx, AppError> {
    match ctx {
        Some(auth) if auth.has_role(role) => Ok(auth),
        _ => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(roles: &[&str]) -> AuthCtx {
        AuthCtx::new(
            "alice".to_string(),
            roles.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn role_holder_passes() {
        let auth = ctx(&["user", "admin"]);
        let resolved = require_role(Some(&auth), "admin").unwrap();
        assert_eq!(resolved.subject, "alice");
    }

    #[test]
    fn missing_role_is_forbidden() {
        let auth = ctx(&["user"]);
        assert!(matches!(
            require_role(Some(&auth), "admin"),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn anonymous_is_forbidden() {
        assert!(matches!(
            require_role(None, "user"),
            Err(AppError::Forbidden)
        ));
    }
}

//! access token 検証 → AuthCtx を extensions に入れる gate
//!
//! 全リクエストがここを通る。流れ：
//! - `/api/v1/auth/*`（発行系）は検証を完全にスキップ
//! - `Authorization: Bearer <token>` が無い/形式違いは「credential 未提示」
//!   扱いで素通し（AuthCtx なし）。拒否するかどうかは下流の role check が決める
//! - token が提示された場合のみ検証し、失敗は全て 401 で打ち切り
//! - 検証成功後、subject から現在のユーザーを引き直して AuthCtx を作る
//!   （roles はトークンではなく DB の現在値）

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Paths under this prefix issue tokens and must not require one.
const AUTH_EXEMPT_PREFIX: &str = "/api/v1/auth/";

/// Router 全体に認証 gate を掛ける。
///
/// 例：
/// ```ignore
/// let app = Router::new().nest("/api/v1", api::v1::routes()).with_state(state.clone());
/// let app = middleware::auth::access::apply(app, state);
/// ```
pub fn apply(router: Router, state: AppState) -> Router {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if req.uri().path().starts_with(AUTH_EXEMPT_PREFIX) {
        return Ok(next.run(req).await);
    }

    // Missing header / wrong scheme / empty token: no credential offered.
    let token = match bearer_token(&req) {
        Some(token) => token.to_string(),
        None => return Ok(next.run(req).await),
    };

    // Expired / bad signature / malformed stay distinct in logs only;
    // the response is the same 401 for all of them.
    let claims = match state.tokens.verify(&token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    // Roles come from the current user record, not from the token.
    // The lookup is the only external call in the gate; bound it so a slow
    // store cannot stall every in-flight request.
    let lookup = state.identities.find_by_subject(&claims.sub);
    let identity = match tokio::time::timeout(state.identity_lookup_timeout, lookup).await {
        Ok(Ok(Some(identity))) => identity,
        Ok(Ok(None)) => {
            tracing::warn!(subject = %claims.sub, "token subject has no matching user");
            return Err(AppError::Unauthorized);
        }
        Ok(Err(err)) => {
            tracing::error!(subject = %claims.sub, error = %err, "identity lookup failed");
            return Err(AppError::Unauthorized);
        }
        Err(_) => {
            tracing::error!(subject = %claims.sub, "identity lookup timed out");
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor への受け渡し。リクエストにつき一度だけ書く。
    req.extensions_mut()
        .insert(AuthCtx::new(identity.subject, identity.roles));

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    let token = auth.strip_prefix("Bearer ")?;
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        http::StatusCode,
        routing::{get, post},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::extractors::{MaybeAuthCtx, require_role};
    use crate::services::auth::token_service::TokenClaims;
    use crate::services::auth::{Identity, IdentityStore, TokenService};

    const SECRET: &[u8] = b"gate-test-secret-0123456789abcdef";

    struct StaticIdentities(HashMap<String, Identity>);

    #[async_trait]
    impl IdentityStore for StaticIdentities {
        async fn find_by_subject(&self, subject: &str) -> Result<Option<Identity>, AppError> {
            Ok(self.0.get(subject).cloned())
        }
    }

    /// Never answers within the gate's lookup timeout.
    struct SlowIdentities;

    #[async_trait]
    impl IdentityStore for SlowIdentities {
        async fn find_by_subject(&self, _subject: &str) -> Result<Option<Identity>, AppError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(None)
        }
    }

    fn roles(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn known_users() -> Arc<StaticIdentities> {
        let mut users = HashMap::new();
        users.insert(
            "alice".to_string(),
            Identity {
                subject: "alice".to_string(),
                roles: roles(&["user"]),
            },
        );
        Arc::new(StaticIdentities(users))
    }

    fn test_state(identities: Arc<dyn IdentityStore>) -> AppState {
        // The pool is never touched by these routes; lazy construction avoids
        // needing a live database.
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");

        AppState::new(
            db,
            Arc::new(TokenService::new(SECRET, 3_600, 86_400)),
            identities,
            Duration::from_millis(50),
        )
    }

    async fn whoami(MaybeAuthCtx(ctx): MaybeAuthCtx) -> String {
        match ctx {
            Some(auth) => auth.subject,
            None => "anonymous".to_string(),
        }
    }

    async fn admin_only(MaybeAuthCtx(ctx): MaybeAuthCtx) -> Result<&'static str, AppError> {
        require_role(ctx.as_ref(), "admin")?;
        Ok("ok")
    }

    fn test_router(state: AppState) -> Router {
        let router = Router::new()
            .route("/api/v1/auth/login", post(|| async { "login" }))
            .route("/api/v1/whoami", get(whoami))
            .route("/api/v1/admin", get(admin_only))
            .with_state(state.clone());

        apply(router, state)
    }

    async fn send(router: Router, req: Request<Body>) -> (StatusCode, String) {
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn bearer_req(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn exempt_path_passes_without_credentials() {
        let router = test_router(test_state(known_users()));
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "login");
    }

    #[tokio::test]
    async fn missing_header_passes_unauthenticated() {
        let router = test_router(test_state(known_users()));

        let (status, body) = send(router, get_req("/api/v1/whoami")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn wrong_scheme_is_treated_as_anonymous() {
        let router = test_router(test_state(known_users()));
        let req = Request::builder()
            .uri("/api/v1/whoami")
            .header(header::AUTHORIZATION, "Basic YWxpY2U6cHc=")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn valid_token_sets_identity() {
        let state = test_state(known_users());
        let token = state
            .tokens
            .issue_access_token("alice", &roles(&["user"]))
            .unwrap();
        let router = test_router(state);

        let (status, body) = send(router, bearer_req("/api/v1/whoami", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let router = test_router(test_state(known_users()));

        let (status, body) = send(router, bearer_req("/api/v1/whoami", "garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn expired_token_is_rejected_before_the_handler() {
        let router = test_router(test_state(known_users()));

        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "alice".to_string(),
            roles: roles(&["user"]),
            iat: now - 7_200,
            exp: now - 3_600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let (status, _) = send(router, bearer_req("/api/v1/whoami", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_subject_is_rejected() {
        let state = test_state(known_users());
        let token = state
            .tokens
            .issue_access_token("mallory", &roles(&["user"]))
            .unwrap();
        let router = test_router(state);

        let (status, _) = send(router, bearer_req("/api/v1/whoami", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn slow_identity_lookup_is_rejected() {
        let state = test_state(Arc::new(SlowIdentities));
        let token = state
            .tokens
            .issue_access_token("alice", &roles(&["user"]))
            .unwrap();
        let router = test_router(state);

        let (status, _) = send(router, bearer_req("/api/v1/whoami", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn anonymous_caller_fails_role_check_with_forbidden() {
        let router = test_router(test_state(known_users()));

        let (status, body) = send(router, get_req("/api/v1/admin")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn authenticated_caller_without_role_is_forbidden() {
        let state = test_state(known_users());
        let token = state
            .tokens
            .issue_access_token("alice", &roles(&["user"]))
            .unwrap();
        let router = test_router(state);

        let (status, _) = send(router, bearer_req("/api/v1/admin", &token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

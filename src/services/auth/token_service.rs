use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::AppError;

/// Claims carried by both token kinds.
///
/// Access tokens carry `roles`; refresh tokens omit the claim from the payload
/// entirely and deserialize back to an empty set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub roles: HashSet<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Why verification failed.
///
/// Kept distinct for logs only; the HTTP boundary collapses all of these into
/// a single 401 so a caller cannot tell a forged token from an expired one.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token cannot be parsed")]
    Malformed,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

/// HS256 token issuance + verification.
///
/// Token validity is entirely self-contained (no session store), so the only
/// state is the shared secret and the two lifetimes. Safe for unsynchronized
/// concurrent use; nothing here mutates after construction.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl_seconds: u64, refresh_ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: expiry is compared strictly against the current time.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// Issue an access token: subject + role set, short lifetime.
    pub fn issue_access_token(
        &self,
        subject: &str,
        roles: &HashSet<String>,
    ) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            roles: roles.clone(),
            iat: now,
            exp: now + self.access_ttl_seconds as i64,
        };

        self.sign(&claims)
    }

    /// Issue a refresh token: subject only, longer lifetime.
    ///
    /// Deliberately role-free; roles are re-resolved from the user record when
    /// the token is exchanged for a new access token.
    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            roles: HashSet::new(),
            iat: now,
            exp: now + self.refresh_ttl_seconds as i64,
        };

        self.sign(&claims)
    }

    /// Verify signature and expiry, and decode the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                // Everything else is some flavor of "could not parse this into
                // a trustworthy token" (bad segments, base64, JSON, header alg).
                _ => TokenError::Malformed,
            })?;

        Ok(data.claims)
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, AppError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign token");
                AppError::Internal
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret-0123456789abcdef";
    const ACCESS_TTL: u64 = 3_600;
    const REFRESH_TTL: u64 = 86_400;

    fn service() -> TokenService {
        TokenService::new(SECRET, ACCESS_TTL, REFRESH_TTL)
    }

    fn roles(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Flip the first character of the signature segment to a different
    /// base64url character, keeping the token structurally parseable.
    fn tamper_signature(token: &str) -> String {
        let (head, sig) = token.rsplit_once('.').unwrap();
        let mut sig = sig.as_bytes().to_vec();
        sig[0] = if sig[0] == b'A' { b'B' } else { b'A' };
        format!("{head}.{}", String::from_utf8(sig).unwrap())
    }

    /// Same, but for the payload segment.
    fn tamper_payload(token: &str) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut payload = parts[1].as_bytes().to_vec();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        parts.join(".")
    }

    #[test]
    fn access_token_round_trips_subject_and_roles() {
        let svc = service();
        let granted = roles(&["user", "admin"]);

        let token = svc.issue_access_token("alice", &granted).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, granted);
        assert_eq!(claims.exp - claims.iat, ACCESS_TTL as i64);
    }

    #[test]
    fn refresh_token_carries_no_roles() {
        let svc = service();

        let token = svc.issue_refresh_token("bob").unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.sub, "bob");
        assert!(claims.roles.is_empty());
        assert_eq!(claims.exp - claims.iat, REFRESH_TTL as i64);
    }

    #[test]
    fn refresh_payload_omits_roles_claim() {
        let svc = service();
        let token = svc.issue_refresh_token("bob").unwrap();

        use base64::prelude::*;
        let payload = token.split('.').nth(1).unwrap();
        let decoded = BASE64_URL_SAFE_NO_PAD.decode(payload).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert!(json.get("roles").is_none());
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let svc = service();
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "alice".into(),
            roles: roles(&["user"]),
            iat: now - 7_200,
            exp: now - 3_600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(svc.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn tampered_signature_fails_with_invalid_signature() {
        let svc = service();
        let token = svc.issue_access_token("alice", &roles(&["user"])).unwrap();

        let forged = tamper_signature(&token);
        assert_eq!(svc.verify(&forged).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn tampered_payload_fails_with_invalid_signature() {
        let svc = service();
        let token = svc.issue_access_token("alice", &roles(&["user"])).unwrap();

        let forged = tamper_payload(&token);
        assert_eq!(svc.verify(&forged).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn token_signed_with_other_key_fails() {
        let svc = service();
        let other = TokenService::new(b"another-secret-another-secret-!!", ACCESS_TTL, REFRESH_TTL);

        let token = other.issue_access_token("alice", &roles(&["user"])).unwrap();
        assert_eq!(svc.verify(&token).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn garbage_fails_with_malformed() {
        let svc = service();

        assert_eq!(svc.verify("garbage").unwrap_err(), TokenError::Malformed);
        assert_eq!(svc.verify("").unwrap_err(), TokenError::Malformed);
        assert_eq!(svc.verify("a.b.c").unwrap_err(), TokenError::Malformed);
    }
}

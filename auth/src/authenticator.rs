use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use tracing::error;

use crate::jwt::Jwt;
use crate::password::PasswordHasher;

/// Issuer claim required in every token this service mints or accepts.
pub const ISSUER: &str = "topofthestack";

/// Tokens are valid for eight hours from issuance.
const TOKEN_TTL_HOURS: i64 = 8;

/// Read-only lookup into the user store.
///
/// Implemented by the caller; the authenticator only needs an existence
/// check and a by-email fetch.
pub trait UserStore: Send + Sync {
    /// True if a user with this identifier exists.
    fn exists_by_id(&self, id: i64) -> bool;

    /// Look up a user by email address.
    fn fetch_by_email(&self, email: &str) -> Option<UserRecord>;
}

/// Minimal projection of a stored user needed for authentication.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub password_hash: String,
}

/// Credential and token authentication against a [`UserStore`].
///
/// Both entry points are complete synchronous attempts returning the
/// established token directly, so one instance can be shared across
/// concurrent requests without a racy "current token" field.
///
/// Every failure path is silent: the caller sees `Some(token)` or `None`
/// and nothing else. Which check failed (unknown email, wrong password,
/// expired token, bad signature) is deliberately not observable, since
/// distinguishing those cases is itself an information leak. Internal
/// `tracing` output carries the detail for operators.
pub struct Authenticator<S> {
    users: Arc<S>,
    password_hasher: PasswordHasher,
    secret: String,
}

impl<S: UserStore> Authenticator<S> {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `users` - User store to authenticate against
    /// * `secret` - Shared signing secret, loaded once at startup
    pub fn new(users: Arc<S>, secret: impl Into<String>) -> Self {
        Self {
            users,
            password_hasher: PasswordHasher::new(),
            secret: secret.into(),
        }
    }

    /// Authenticate with an email address and plaintext password.
    ///
    /// On success, mints a fresh token for the matched user: fixed issuer,
    /// `sub` = user id, `iat` = now, `exp` = now + 8 hours.
    ///
    /// # Returns
    /// The serialized token, or `None` when the user is unknown or the
    /// password does not match.
    pub fn authenticate_with_credentials(&self, email: &str, password: &str) -> Option<String> {
        let Some(user) = self.users.fetch_by_email(email) else {
            debug!("credential authentication failed: no user for presented email");
            return None;
        };

        match self.password_hasher.verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = user.id, "credential authentication failed: password mismatch");
                return None;
            }
            Err(e) => {
                debug!(user_id = user.id, "credential authentication failed: {e}");
                return None;
            }
        }

        self.issue_token(user.id)
    }

    /// Authenticate with a previously issued serialized token.
    ///
    /// Cryptographic verification is delegated to [`Jwt::decode`]; the claim
    /// checks (issuer, validity window, subject existence) happen here.
    ///
    /// # Returns
    /// The presented token string, or `None` when any structural or
    /// semantic check fails.
    pub fn authenticate_with_token(&self, raw: &str) -> Option<String> {
        self.authenticate_with_token_at(raw, Utc::now().timestamp())
    }

    fn authenticate_with_token_at(&self, raw: &str, now: i64) -> Option<String> {
        let jwt = Jwt::decode(raw, &self.secret)?;
        if !self.validate_claims(&jwt, now) {
            return None;
        }
        Some(raw.to_string())
    }

    fn validate_claims(&self, jwt: &Jwt, now: i64) -> bool {
        let (Ok(issuer), Ok(subject), Ok(issued_at), Ok(expires_at)) = (
            jwt.claim("iss"),
            jwt.claim("sub"),
            jwt.claim("iat"),
            jwt.claim("exp"),
        ) else {
            debug!("token rejected: missing required claim");
            return false;
        };

        if issuer != ISSUER {
            debug!("token rejected: unexpected issuer");
            return false;
        }

        let (Some(issued_at), Some(expires_at)) = (issued_at.as_i64(), expires_at.as_i64()) else {
            debug!("token rejected: non-integer time claims");
            return false;
        };

        if issued_at < 0 || expires_at < 0 {
            debug!("token rejected: negative time claims");
            return false;
        }

        if issued_at > expires_at {
            debug!("token rejected: expires before issuance");
            return false;
        }

        // The window is inclusive at both ends.
        if now < issued_at || now > expires_at {
            debug!("token rejected: outside validity window");
            return false;
        }

        let Some(user_id) = subject.as_i64() else {
            debug!("token rejected: non-integer subject");
            return false;
        };

        if !self.users.exists_by_id(user_id) {
            debug!(user_id, "token rejected: unknown subject");
            return false;
        }

        true
    }

    fn issue_token(&self, user_id: i64) -> Option<String> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(TOKEN_TTL_HOURS);

        let mut payload = Map::new();
        payload.insert("iss".to_string(), Value::from(ISSUER));
        payload.insert("sub".to_string(), Value::from(user_id));
        payload.insert("iat".to_string(), Value::from(now.timestamp()));
        payload.insert("exp".to_string(), Value::from(expires_at.timestamp()));

        match Jwt::new(self.secret.as_str(), payload).encode() {
            Ok(token) => Some(token),
            Err(e) => {
                // Claim maps are always JSON-serializable, so this branch
                // indicates a bug rather than bad input.
                error!("failed to encode freshly minted token: {e}");
                None
            }
        }
    }
}

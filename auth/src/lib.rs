//! Token-based authentication library
//!
//! Provides the authentication core for the blogging platform backend:
//! - Signed bearer tokens: three base64url segments (`header.payload.signature`)
//!   signed with HMAC-SHA256 under a shared secret
//! - Password hashing and verification (bcrypt)
//! - Credential and token authentication against a caller-supplied user store
//!
//! Callers implement the [`UserStore`] port; everything else is
//! self-contained. Tokens are stateless bearer tokens: validity is re-derived
//! from the signature and claims on every presentation, with no server-side
//! session or revocation list. Invalid untrusted input is always reported as
//! an absent value rather than an error, so callers cannot accidentally leak
//! *why* an authentication attempt failed.
//!
//! # Examples
//!
//! ## Token envelope
//! ```
//! use auth::Jwt;
//! use serde_json::{json, Map};
//!
//! let mut payload = Map::new();
//! payload.insert("sub".to_string(), json!(42));
//!
//! let token = Jwt::new("secret", payload).encode().unwrap();
//! let decoded = Jwt::decode(&token, "secret").unwrap();
//! assert_eq!(decoded.claim("sub").unwrap(), &json!(42));
//!
//! // A different secret never verifies.
//! assert!(Jwt::decode(&token, "other").is_none());
//! ```
//!
//! ## Complete authentication flow
//! ```
//! use std::sync::Arc;
//!
//! use auth::Authenticator;
//! use auth::PasswordHasher;
//! use auth::UserRecord;
//! use auth::UserStore;
//!
//! struct OneUser(UserRecord);
//!
//! impl UserStore for OneUser {
//!     fn exists_by_id(&self, id: i64) -> bool {
//!         self.0.id == id
//!     }
//!
//!     fn fetch_by_email(&self, _email: &str) -> Option<UserRecord> {
//!         Some(self.0.clone())
//!     }
//! }
//!
//! let hash = PasswordHasher::new().hash("pass_word!").unwrap();
//! let store = Arc::new(OneUser(UserRecord { id: 42, password_hash: hash }));
//! let authenticator = Authenticator::new(store, "secret_loaded_at_startup");
//!
//! // Log in with credentials, then present the resulting bearer token.
//! let token = authenticator
//!     .authenticate_with_credentials("nicola@example.com", "pass_word!")
//!     .unwrap();
//! assert!(authenticator.authenticate_with_token(&token).is_some());
//! ```

pub mod authenticator;
pub mod base64url;
pub mod config;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::UserRecord;
pub use authenticator::UserStore;
pub use authenticator::ISSUER;
pub use config::AuthConfig;
pub use config::Config;
pub use config::SecretError;
pub use jwt::Jwt;
pub use jwt::JwtError;
pub use password::PasswordError;
pub use password::PasswordHasher;

use thiserror::Error;

/// Error type for token construction and encoding.
///
/// These surface caller bugs only. Invalid *untrusted* input (a presented
/// token that fails to parse or verify) is reported as an absent value from
/// [`Jwt::decode`](crate::jwt::Jwt::decode), never through this type.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}

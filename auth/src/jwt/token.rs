use hmac::Hmac;
use hmac::Mac;
use serde_json::Map;
use serde_json::Value;
use sha2::Sha256;

use super::errors::JwtError;
use crate::base64url;

type HmacSha256 = Hmac<Sha256>;

/// The one signing algorithm the wire format supports.
pub const HASH_ALGO: &str = "HS256";

/// Value of the `typ` header field (lowercase is part of the wire contract).
pub const TOKEN_TYPE: &str = "jwt";

/// A signed bearer token: three base64url segments joined by `.`.
///
/// The serialized form is `encode(header) . encode(payload) . signature`,
/// where the signature is the HMAC-SHA256 digest of the first two segments
/// keyed by a shared secret. Header and payload are open JSON objects;
/// deterministic key ordering makes repeated encodes byte-identical.
///
/// A token is immutable once constructed. To change a claim, build a new
/// token. The secret lives only inside the object and is never serialized
/// or printed (no `Debug` impl, so it cannot leak through logging).
#[derive(Clone)]
pub struct Jwt {
    header: Map<String, Value>,
    payload: Map<String, Value>,
    secret: String,
}

impl Jwt {
    /// Create a token with the default header `{"alg":"HS256","typ":"jwt"}`.
    pub fn new(secret: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            header: Self::default_header(),
            payload,
            secret: secret.into(),
        }
    }

    /// Create a token with a caller-supplied header.
    ///
    /// The `typ` field is not validated.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Header carries an `alg` other than `HS256`.
    ///   This is a caller bug, not an untrusted-input condition.
    pub fn with_header(
        secret: impl Into<String>,
        payload: Map<String, Value>,
        header: Map<String, Value>,
    ) -> Result<Self, JwtError> {
        if let Some(alg) = header.get("alg") {
            if alg.as_str() != Some(HASH_ALGO) {
                return Err(JwtError::UnsupportedAlgorithm(alg.to_string()));
            }
        }
        Ok(Self {
            header,
            payload,
            secret: secret.into(),
        })
    }

    fn default_header() -> Map<String, Value> {
        let mut header = Map::new();
        header.insert("alg".to_string(), Value::from(HASH_ALGO));
        header.insert("typ".to_string(), Value::from(TOKEN_TYPE));
        header
    }

    /// Serialize and sign the token.
    ///
    /// Pure function of (header, payload, secret): repeated calls return the
    /// same string.
    ///
    /// # Errors
    /// * `EncodingFailed` - JSON serialization failed (not reachable for
    ///   plain claim maps).
    pub fn encode(&self) -> Result<String, JwtError> {
        let header = encode_segment(&self.header)?;
        let payload = encode_segment(&self.payload)?;
        let signature = sign(&self.secret, &header, &payload)?;
        Ok(format!("{header}.{payload}.{signature}"))
    }

    /// Look up a claim in the payload.
    ///
    /// # Errors
    /// * `MissingClaim` - No claim under `key`. There is no defaulting; a
    ///   missing claim the caller assumed present is a caller bug.
    pub fn claim(&self, key: &str) -> Result<&Value, JwtError> {
        self.payload
            .get(key)
            .ok_or_else(|| JwtError::MissingClaim(key.to_string()))
    }

    /// The token's header fields.
    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }

    /// The token's claims.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Predicate over an untrusted header segment.
    ///
    /// True only if the segment decodes to a JSON object whose `alg` equals
    /// the supported algorithm. Decode and parse failures return false
    /// rather than an error.
    pub fn validate_header_segment(segment: &str) -> bool {
        match decode_segment(segment) {
            Some(header) => header.get("alg").and_then(Value::as_str) == Some(HASH_ALGO),
            None => false,
        }
    }

    /// Predicate over an untrusted payload segment: any JSON object passes.
    pub fn validate_payload_segment(segment: &str) -> bool {
        decode_segment(segment).is_some()
    }

    /// Parse and cryptographically verify a serialized token.
    ///
    /// Returns `None` unless the string has exactly three non-empty
    /// dot-separated segments, the header and payload segments pass their
    /// predicates, and the third segment matches the recomputed HMAC under a
    /// constant-time comparison. Malformed input never panics or errors; all
    /// invalid-token cases funnel into the single `None` path.
    pub fn decode(raw: &str, secret: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
            return None;
        }
        let (header, payload, signature) = (parts[0], parts[1], parts[2]);

        if !Self::validate_header_segment(header) || !Self::validate_payload_segment(payload) {
            return None;
        }

        let given_signature = base64url::decode(signature).ok()?;
        let mut mac = signing_mac(secret).ok()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        // Constant-time comparison; a mismatch invalidates the token
        // regardless of what the payload says.
        mac.verify_slice(&given_signature).ok()?;

        Some(Self {
            header: decode_segment(header)?,
            payload: decode_segment(payload)?,
            secret: secret.to_string(),
        })
    }
}

fn encode_segment(fields: &Map<String, Value>) -> Result<String, JwtError> {
    let json = serde_json::to_string(fields).map_err(|e| JwtError::EncodingFailed(e.to_string()))?;
    Ok(base64url::encode(json))
}

fn decode_segment(segment: &str) -> Option<Map<String, Value>> {
    let bytes = base64url::decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn signing_mac(secret: &str) -> Result<HmacSha256, JwtError> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

fn sign(secret: &str, header: &str, payload: &str) -> Result<String, JwtError> {
    let mut mac = signing_mac(secret)?;
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(base64url::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SECRET: &str = "s3cr3t";

    fn sample_payload() -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("iss".to_string(), json!("topofthestack"));
        payload.insert("sub".to_string(), json!(42));
        payload.insert("iat".to_string(), json!(1000));
        payload.insert("exp".to_string(), json!(29800));
        payload
    }

    /// Replace the character at `index` with a different one from the
    /// base64url alphabet.
    fn flip_char(token: &str, index: usize) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_encode_has_three_segments() {
        let token = Jwt::new(SECRET, sample_payload()).encode().unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(token.split('.').all(|segment| !segment.is_empty()));
    }

    #[test]
    fn test_encode_header_segment_is_exact() {
        let token = Jwt::new(SECRET, sample_payload()).encode().unwrap();
        let header = token.split('.').next().unwrap();
        assert_eq!(header, base64url::encode(r#"{"alg":"HS256","typ":"jwt"}"#));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let jwt = Jwt::new(SECRET, sample_payload());
        assert_eq!(jwt.encode().unwrap(), jwt.encode().unwrap());
    }

    #[test]
    fn test_round_trip() {
        let token = Jwt::new(SECRET, sample_payload()).encode().unwrap();
        let decoded = Jwt::decode(&token, SECRET).expect("round trip failed");
        assert_eq!(decoded.payload(), &sample_payload());
        assert_eq!(
            decoded.header().get("alg").and_then(Value::as_str),
            Some(HASH_ALGO)
        );
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = Jwt::new(SECRET, sample_payload()).encode().unwrap();
        assert!(Jwt::decode(&token, "other-secret").is_none());
    }

    #[test]
    fn test_decode_rejects_tampering_in_every_segment() {
        let token = Jwt::new(SECRET, sample_payload()).encode().unwrap();
        let dots: Vec<usize> = token
            .char_indices()
            .filter(|(_, c)| *c == '.')
            .map(|(i, _)| i)
            .collect();

        // One character inside each of header, payload, and signature.
        for index in [1, dots[0] + 2, dots[1] + 2] {
            let tampered = flip_char(&token, index);
            assert!(
                Jwt::decode(&tampered, SECRET).is_none(),
                "tampered token accepted: {tampered}"
            );
        }
    }

    #[test]
    fn test_decode_rejects_wrong_segment_counts() {
        for raw in [
            "",
            "onlyone",
            "two.segments",
            "f.o.u.r",
            "..",
            "a..c",
            ".b.c",
            "a.b.",
        ] {
            assert!(Jwt::decode(raw, SECRET).is_none(), "accepted: {raw:?}");
        }
    }

    #[test]
    fn test_decode_rejects_non_json_header() {
        let header = base64url::encode("not json");
        let payload = base64url::encode("{}");
        let raw = format!("{header}.{payload}.c2ln");
        assert!(Jwt::decode(&raw, SECRET).is_none());
    }

    #[test]
    fn test_decode_rejects_unsigned_garbage() {
        let header = base64url::encode(r#"{"alg":"HS256","typ":"jwt"}"#);
        let payload = base64url::encode(r#"{"sub":42}"#);
        let raw = format!("{header}.{payload}.AAAA");
        assert!(Jwt::decode(&raw, SECRET).is_none());
    }

    #[test]
    fn test_validate_header_segment() {
        assert!(Jwt::validate_header_segment(&base64url::encode(
            r#"{"alg":"HS256","typ":"jwt"}"#
        )));
        // Wrong algorithm, non-object, missing alg, bad base64.
        assert!(!Jwt::validate_header_segment(&base64url::encode(
            r#"{"alg":"RS256"}"#
        )));
        assert!(!Jwt::validate_header_segment(&base64url::encode("[1,2]")));
        assert!(!Jwt::validate_header_segment(&base64url::encode(
            r#"{"typ":"jwt"}"#
        )));
        assert!(!Jwt::validate_header_segment("!!!"));
    }

    #[test]
    fn test_validate_payload_segment() {
        assert!(Jwt::validate_payload_segment(&base64url::encode("{}")));
        assert!(Jwt::validate_payload_segment(&base64url::encode(
            r#"{"anything":true}"#
        )));
        assert!(!Jwt::validate_payload_segment(&base64url::encode("42")));
        assert!(!Jwt::validate_payload_segment("!!!"));
    }

    #[test]
    fn test_with_header_rejects_unsupported_algorithm() {
        let mut header = Map::new();
        header.insert("alg".to_string(), json!("none"));
        let result = Jwt::with_header(SECRET, sample_payload(), header);
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_with_header_accepts_supported_algorithm() {
        let mut header = Map::new();
        header.insert("alg".to_string(), json!("HS256"));
        header.insert("typ".to_string(), json!("anything"));
        assert!(Jwt::with_header(SECRET, sample_payload(), header).is_ok());
    }

    #[test]
    fn test_claim_present_and_missing() {
        let jwt = Jwt::new(SECRET, sample_payload());
        assert_eq!(jwt.claim("sub").unwrap(), &json!(42));
        assert!(matches!(jwt.claim("aud"), Err(JwtError::MissingClaim(_))));
    }
}

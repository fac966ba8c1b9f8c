//! URL-safe base64 without padding, the encoding used for every token segment.
//!
//! Wraps the `base64` crate's URL-safe engine so all call sites agree on the
//! same alphabet and padding rules.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::DecodeError;
use base64::Engine;

/// Encode bytes with the URL-safe alphabet, stripping padding.
///
/// Total function: every byte sequence has an encoding.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode a URL-safe, unpadded base64 string.
///
/// # Errors
/// * `DecodeError` - Input has the wrong length or characters outside the
///   URL-safe alphabet. Callers must handle this; token segments come from
///   untrusted input.
pub fn decode(data: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD.decode(data)
}

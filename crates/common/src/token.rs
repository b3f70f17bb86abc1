//! Signed session-token codec.
//!
//! A token is the opaque value carried in an auth cookie: the payload (an
//! email address or a provider subject id) and an HMAC-SHA256 integrity tag,
//! both base64url-encoded and joined with `.`. The codec guarantees
//! tamper-evidence, not confidentiality: the payload is recoverable by
//! anyone, but not forgeable without the signing key.
//!
//! Expiry is not encoded here; the cookie's max-age bounds the session
//! lifetime at the HTTP boundary.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies opaque session-token strings.
///
/// The signing key is process-wide configuration loaded once at startup.
/// Rotating the key invalidates every previously issued token, which acts as
/// a hard logout of all sessions.
#[derive(Clone)]
pub struct TokenCodec {
    key: Vec<u8>,
}

impl TokenCodec {
    /// Create a codec from the configured secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// Sign a payload into an opaque token string.
    #[must_use]
    pub fn sign(&self, value: &str) -> String {
        let mut mac = new_mac(&self.key);
        mac.update(value.as_bytes());
        let tag = mac.finalize().into_bytes();

        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(value.as_bytes()),
            URL_SAFE_NO_PAD.encode(tag)
        )
    }

    /// Verify a token and recover its payload.
    ///
    /// Returns `None` for any malformed, truncated, or tampered input. This
    /// never panics: an invalid token is an expected condition and callers
    /// treat it the same as an absent one.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<String> {
        let (payload_b64, tag_b64) = token.split_once('.')?;

        let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        let tag = URL_SAFE_NO_PAD.decode(tag_b64).ok()?;

        let mut mac = new_mac(&self.key);
        mac.update(&payload);
        // Constant-time comparison against the claimed tag.
        mac.verify_slice(&tag).ok()?;

        String::from_utf8(payload).ok()
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the key.
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

fn new_mac(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC can take key of any size")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key")
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let codec = codec();
        for value in ["alice@example.com", "109876543210", "", "한국어", "a.b.c"] {
            let token = codec.sign(value);
            assert_eq!(codec.verify(&token).as_deref(), Some(value));
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let token = codec.sign("alice@example.com");
        let (payload, tag) = token.split_once('.').unwrap();

        let forged_payload = URL_SAFE_NO_PAD.encode(b"mallory@example.com");
        assert_eq!(codec.verify(&format!("{forged_payload}.{tag}")), None);

        let forged_tag = URL_SAFE_NO_PAD.encode([0u8; 32]);
        assert_eq!(codec.verify(&format!("{payload}.{forged_tag}")), None);
    }

    #[test]
    fn test_truncated_token_rejected() {
        let codec = codec();
        let token = codec.sign("alice@example.com");
        assert_eq!(codec.verify(&token[..token.len() - 2]), None);
        assert_eq!(codec.verify(""), None);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = codec();
        assert_eq!(codec.verify("no-separator"), None);
        assert_eq!(codec.verify("not base64!.not base64!"), None);
        assert_eq!(codec.verify("..."), None);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = TokenCodec::new("key-one").sign("alice@example.com");
        assert_eq!(TokenCodec::new("key-two").verify(&token), None);
    }

    #[test]
    fn test_sign_is_deterministic() {
        let codec = codec();
        assert_eq!(codec.sign("alice@example.com"), codec.sign("alice@example.com"));
    }
}

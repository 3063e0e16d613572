//! Signed Token Codec
//!
//! Compact HMAC-SHA256 signed tokens:
//!
//! ```text
//! base64url(json(claims)) "." base64url(hmac_sha256(key, first_segment))
//! ```
//!
//! The codec only guarantees integrity. What the claims mean (subject,
//! expiry, token kind) is decided by the caller.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};

/// Why a token could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenCodecError {
    /// Not two base64url segments, or payload is not the expected JSON
    #[error("Malformed token")]
    Malformed,

    /// Signature does not match the payload under this key
    #[error("Token signature mismatch")]
    BadSignature,

    /// Claims could not be serialized
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Sign `claims` with `key`
pub fn sign<T: Serialize>(key: &[u8], claims: &T) -> Result<String, TokenCodecError> {
    let json = serde_json::to_vec(claims).map_err(|e| TokenCodecError::Encoding(e.to_string()))?;
    let payload = to_base64url(&json);
    let signature = hmac_sha256(key, payload.as_bytes());
    Ok(format!("{}.{}", payload, to_base64url(&signature)))
}

/// Check the signature, then decode the claims.
///
/// The payload is never parsed before the signature is verified.
pub fn verify<T: DeserializeOwned>(key: &[u8], token: &str) -> Result<T, TokenCodecError> {
    let (payload, signature_b64) = token.split_once('.').ok_or(TokenCodecError::Malformed)?;
    if payload.is_empty() || signature_b64.contains('.') {
        return Err(TokenCodecError::Malformed);
    }

    let signature = from_base64url(signature_b64).map_err(|_| TokenCodecError::Malformed)?;
    if !verify_hmac_sha256(key, payload.as_bytes(), &signature) {
        return Err(TokenCodecError::BadSignature);
    }

    let json = from_base64url(payload).map_err(|_| TokenCodecError::Malformed)?;
    serde_json::from_slice(&json).map_err(|_| TokenCodecError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    fn claims() -> Claims {
        Claims {
            sub: "account-1".to_string(),
            exp: 1_700_000_000,
        }
    }

    #[test]
    fn test_sign_then_verify() {
        let key = [7u8; 32];
        let token = sign(&key, &claims()).unwrap();
        assert_eq!(token.matches('.').count(), 1);

        let decoded: Claims = verify(&key, &token).unwrap();
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let token = sign(&[7u8; 32], &claims()).unwrap();
        let result = verify::<Claims>(&[8u8; 32], &token);
        assert_eq!(result.unwrap_err(), TokenCodecError::BadSignature);
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let key = [7u8; 32];
        let token = sign(&key, &claims()).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged = Claims {
            sub: "account-2".to_string(),
            exp: i64::MAX,
        };
        let forged_payload = to_base64url(&serde_json::to_vec(&forged).unwrap());
        let forged_token = format!("{}.{}", forged_payload, signature);

        assert_eq!(
            verify::<Claims>(&key, &forged_token).unwrap_err(),
            TokenCodecError::BadSignature
        );
    }

    #[test]
    fn test_structural_garbage_is_malformed() {
        let key = [7u8; 32];
        for token in ["", "no-dot", ".sig", "a.b.c", "payload.***"] {
            assert_eq!(
                verify::<Claims>(&key, token).unwrap_err(),
                TokenCodecError::Malformed,
                "token {token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_signed_but_wrong_shape_is_malformed() {
        let key = [7u8; 32];
        let token = sign(&key, &serde_json::json!({ "unexpected": true })).unwrap();
        assert_eq!(
            verify::<Claims>(&key, &token).unwrap_err(),
            TokenCodecError::Malformed
        );
    }
}

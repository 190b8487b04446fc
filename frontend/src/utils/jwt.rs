use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

use crate::utils::time::now_epoch_seconds;

/// Claims read from an access token payload without verifying its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub exp: Option<i64>,
    pub sub: Option<String>,
    pub jti: Option<String>,
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    // Accept both the url-safe and the standard alphabet, padded or not.
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized).ok()
}

pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    parts.next()?;
    let payload = parts.next()?;
    let decoded = decode_segment(payload)?;
    let value: Value = serde_json::from_slice(&decoded).ok()?;
    if !value.is_object() {
        return None;
    }
    Some(TokenClaims {
        exp: value.get("exp").and_then(Value::as_f64).map(|exp| exp.floor() as i64),
        sub: value.get("sub").and_then(Value::as_str).map(str::to_string),
        jti: value.get("jti").and_then(Value::as_str).map(str::to_string),
    })
}

pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, now_epoch_seconds())
}

/// A token is expired when its `exp` lies before `now`. Tokens that cannot
/// be decoded, or carry no numeric `exp`, count as expired.
pub fn is_token_expired_at(token: &str, now: i64) -> bool {
    match decode_claims(token).and_then(|claims| claims.exp) {
        Some(exp) => exp < now,
        None => {
            tracing::debug!("access token payload unreadable; treating as expired");
            true
        }
    }
}

//! Reading the expiry claim out of an access token.
//!
//! Tokens stay opaque everywhere else; this is only used when the backend
//! omits an explicit expiry in its token response.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// The `exp` claim of a JWT, in seconds since epoch.
///
/// Returns `None` for anything that is not a three-part JWT with a numeric
/// `exp` claim. The signature is not verified.
pub fn expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;

    exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
}

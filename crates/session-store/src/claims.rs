//! Token claim decoding.
//!
//! Tokens are treated as opaque JWTs and decoded without signature
//! verification: only the payload segment is read, to derive session
//! metadata on the client side.

use crate::error::DecodeError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier (`sub`).
    pub sub: String,
    /// Expiry in epoch seconds (`exp`). Fractional values are truncated.
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
    /// Every other claim, kept but unused by the store.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept any JSON number as a NumericDate, truncated to whole seconds.
fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(secs) = number.as_i64() {
        return Ok(secs);
    }

    match number.as_f64() {
        Some(secs) if secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64 => {
            Ok(secs.trunc() as i64)
        }
        _ => Err(serde::de::Error::custom(format!(
            "exp {} is not a representable NumericDate",
            number
        ))),
    }
}

/// Parses an opaque token into claims.
pub trait ClaimsDecoder: Send + Sync {
    /// Decode `token`, failing on structurally invalid input.
    fn decode(&self, token: &str) -> Result<Claims, DecodeError>;
}

impl<F> ClaimsDecoder for F
where
    F: Fn(&str) -> Result<Claims, DecodeError> + Send + Sync,
{
    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        self(token)
    }
}

/// Decoder for `header.payload.signature` JWTs. Does not verify signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtClaimsDecoder;

impl ClaimsDecoder for JwtClaimsDecoder {
    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or(DecodeError::MissingPayload)?;

        // Accept the standard alphabet and padding as well.
        let normalized: String = payload
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();

        let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

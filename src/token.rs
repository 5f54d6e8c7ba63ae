//! Session token payload decoding.
//!
//! DESIGN
//! ======
//! Tokens are three dot-separated base64url segments (header, payload,
//! signature). Only the payload is inspected. The signature is never
//! checked here: the client holds no key material, so authenticity is
//! left to the remote session check. A successful decode means the token
//! is structurally sound, nothing more.

use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

/// URL-safe alphabet; issuers differ on padding so both forms decode.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// =============================================================================
// ERRORS
// =============================================================================

/// Which of the three token segments a decode failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Header => "header",
            Self::Payload => "payload",
            Self::Signature => "signature",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),
    #[error("{0} segment is empty")]
    EmptySegment(Segment),
    #[error("{0} segment is not valid base64url")]
    Encoding(Segment),
    #[error("payload is not JSON: {0}")]
    Json(String),
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("payload has no `exp` claim")]
    MissingExp,
    #[error("`exp` claim is not numeric")]
    NonNumericExp,
}

/// The token could not be decoded into a usable payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed token: {reason}")]
pub struct MalformedToken {
    pub reason: MalformedReason,
}

impl From<MalformedReason> for MalformedToken {
    fn from(reason: MalformedReason) -> Self {
        Self { reason }
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Expiry as Unix seconds. Fractional values are floored.
    pub exp: i64,
    /// Every other payload field, untouched.
    pub extra: Map<String, Value>,
}

impl Claims {
    /// A token whose expiry equals the current second is already expired.
    #[must_use]
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp <= now_secs
    }

    /// Seconds left before expiry, or zero once expired.
    #[must_use]
    pub fn remaining_secs(&self, now_secs: i64) -> u64 {
        u64::try_from(self.exp.saturating_sub(now_secs)).unwrap_or(0)
    }

    /// String-valued claim lookup (`sub`, `email`, `id`, ...).
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

// =============================================================================
// DECODE
// =============================================================================

/// Decode the payload of a session token without verifying its signature.
///
/// # Errors
///
/// Returns [`MalformedToken`] when the token does not have exactly three
/// segments, a segment is not base64url, the payload is not a JSON object,
/// or the `exp` claim is missing or not a number.
pub fn decode(token: &str) -> Result<Claims, MalformedToken> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(MalformedReason::SegmentCount(segments.len()).into());
    };

    decode_segment(header, Segment::Header)?;
    let payload = decode_segment(payload, Segment::Payload)?;
    if !signature.is_empty() {
        decode_segment(signature, Segment::Signature)?;
    }

    parse_claims(&payload)
}

fn decode_segment(segment: &str, which: Segment) -> Result<Vec<u8>, MalformedToken> {
    if segment.is_empty() {
        return Err(MalformedReason::EmptySegment(which).into());
    }
    SEGMENT_ENGINE
        .decode(segment)
        .map_err(|_| MalformedReason::Encoding(which).into())
}

fn parse_claims(payload: &[u8]) -> Result<Claims, MalformedToken> {
    let value: Value = serde_json::from_slice(payload).map_err(|e| MalformedReason::Json(e.to_string()))?;
    let Value::Object(mut extra) = value else {
        return Err(MalformedReason::NotAnObject.into());
    };

    let exp = extra.remove("exp").ok_or(MalformedReason::MissingExp)?;
    let exp = exp_seconds(&exp).ok_or(MalformedReason::NonNumericExp)?;

    Ok(Claims { exp, extra })
}

#[allow(clippy::cast_possible_truncation)]
fn exp_seconds(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|secs| secs.floor() as i64))
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;

use super::*;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

fn segment(json: &str) -> String {
    URL_SAFE_NO_PAD.encode(json)
}

fn token_with_payload(payload: &str) -> String {
    format!("{}.{}.{}", segment(r#"{"alg":"HS256","typ":"JWT"}"#), segment(payload), segment("sig"))
}

fn reason(token: &str) -> MalformedReason {
    decode(token).unwrap_err().reason
}

// =============================================================================
// well-formed tokens
// =============================================================================

#[test]
fn decode_extracts_integer_exp() {
    let claims = decode(&token_with_payload(r#"{"id":"u1","exp":1700000000}"#)).unwrap();
    assert_eq!(claims.exp, 1_700_000_000);
    assert_eq!(claims.get_str("id"), Some("u1"));
    assert!(!claims.extra.contains_key("exp"));
}

#[test]
fn decode_floors_fractional_exp() {
    let claims = decode(&token_with_payload(r#"{"exp":1700000000.9}"#)).unwrap();
    assert_eq!(claims.exp, 1_700_000_000);
}

#[test]
fn decode_accepts_padded_segments() {
    let payload = URL_SAFE.encode(r#"{"exp":12}"#);
    assert!(payload.ends_with('='));
    let token = format!("{}.{payload}.{}", segment("{}"), segment("s"));
    assert_eq!(decode(&token).unwrap().exp, 12);
}

#[test]
fn decode_accepts_empty_signature() {
    let token = format!("{}.{}.", segment("{}"), segment(r#"{"exp":5}"#));
    assert_eq!(decode(&token).unwrap().exp, 5);
}

#[test]
fn decode_does_not_require_json_header() {
    let token = format!("{}.{}.{}", segment("not json"), segment(r#"{"exp":5}"#), segment("s"));
    assert!(decode(&token).is_ok());
}

// =============================================================================
// malformed tokens
// =============================================================================

#[test]
fn decode_rejects_wrong_segment_counts() {
    assert_eq!(reason(""), MalformedReason::SegmentCount(1));
    assert_eq!(reason("abc"), MalformedReason::SegmentCount(1));
    assert_eq!(reason("a.b"), MalformedReason::SegmentCount(2));
    assert_eq!(reason("a.b.c.d"), MalformedReason::SegmentCount(4));
}

#[test]
fn decode_rejects_empty_header_and_payload() {
    let payload = segment(r#"{"exp":5}"#);
    assert_eq!(reason(&format!(".{payload}.sig")), MalformedReason::EmptySegment(Segment::Header));
    assert_eq!(reason(&format!("{}..sig", segment("{}"))), MalformedReason::EmptySegment(Segment::Payload));
}

#[test]
fn decode_rejects_non_base64url_segments() {
    let good = segment(r#"{"exp":5}"#);
    assert_eq!(reason(&format!("h*h.{good}.{good}")), MalformedReason::Encoding(Segment::Header));
    assert_eq!(reason(&format!("{good}.p+p/.{good}")), MalformedReason::Encoding(Segment::Payload));
    assert_eq!(reason(&format!("{good}.{good}.s!g")), MalformedReason::Encoding(Segment::Signature));
}

#[test]
fn decode_rejects_non_json_payload() {
    assert!(matches!(reason(&token_with_payload("hello")), MalformedReason::Json(_)));
}

#[test]
fn decode_rejects_non_object_payload() {
    assert_eq!(reason(&token_with_payload("[1,2,3]")), MalformedReason::NotAnObject);
    assert_eq!(reason(&token_with_payload("42")), MalformedReason::NotAnObject);
}

#[test]
fn decode_rejects_missing_exp() {
    assert_eq!(reason(&token_with_payload(r#"{"id":"u1"}"#)), MalformedReason::MissingExp);
}

#[test]
fn decode_rejects_non_numeric_exp() {
    assert_eq!(reason(&token_with_payload(r#"{"exp":"1700000000"}"#)), MalformedReason::NonNumericExp);
    assert_eq!(reason(&token_with_payload(r#"{"exp":null}"#)), MalformedReason::NonNumericExp);
    assert_eq!(reason(&token_with_payload(r#"{"exp":true}"#)), MalformedReason::NonNumericExp);
}

#[test]
fn malformed_token_display_includes_reason() {
    let err = decode("a.b").unwrap_err();
    assert_eq!(err.to_string(), "malformed token: expected 3 segments, found 2");
}

// =============================================================================
// Claims helpers
// =============================================================================

#[test]
fn expiry_boundary_is_inclusive() {
    let claims = Claims { exp: 100, extra: Map::new() };
    assert!(claims.is_expired_at(100));
    assert!(claims.is_expired_at(101));
    assert!(!claims.is_expired_at(99));
}

#[test]
fn remaining_secs_saturates_at_zero() {
    let claims = Claims { exp: 100, extra: Map::new() };
    assert_eq!(claims.remaining_secs(40), 60);
    assert_eq!(claims.remaining_secs(100), 0);
    assert_eq!(claims.remaining_secs(500), 0);
}

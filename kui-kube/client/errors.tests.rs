use rstest::rstest;

use super::*;

#[rstest]
#[case(401, true, "access denied (401): boom")]
#[case(403, true, "access denied (403): boom")]
#[case(400, false, "bad request: boom")]
#[case(404, false, "not found: boom")]
#[case(500, false, "unexpected HTTP status 500: boom")]
#[case(409, false, "unexpected HTTP status 409: boom")]
fn from_status_test(#[case] code: u16, #[case] is_auth: bool, #[case] expected: &str) {
    let error = ClientError::from_status(StatusCode::from_u16(code).unwrap(), b"boom");

    assert_eq!(is_auth, matches!(error, ClientError::Auth { .. }));
    assert_eq!(expected, error.to_string());
}

#[test]
fn from_status_kinds_test() {
    assert!(matches!(
        ClientError::from_status(StatusCode::BAD_REQUEST, b"bad selector"),
        ClientError::BadRequest(m) if m == "bad selector"
    ));
    assert!(matches!(
        ClientError::from_status(StatusCode::NOT_FOUND, b""),
        ClientError::NotFound(_)
    ));
    assert!(matches!(
        ClientError::from_status(StatusCode::BAD_GATEWAY, b"upstream down\n"),
        ClientError::Http { code: 502, message } if message == "upstream down"
    ));
}

#[test]
fn from_status_uses_status_message_test() {
    let body = br#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"pods is forbidden","code":403}"#;

    assert!(matches!(
        ClientError::from_status(StatusCode::FORBIDDEN, body),
        ClientError::Auth { code: 403, message } if message == "pods is forbidden"
    ));
}

#[test]
fn from_status_keeps_raw_body_test() {
    let body = "<html><body>502 Bad Gateway</body></html>\n";

    assert!(matches!(
        ClientError::from_status(StatusCode::BAD_GATEWAY, body.as_bytes()),
        ClientError::Http { code: 502, message } if message == "<html><body>502 Bad Gateway</body></html>"
    ));
}

#[test]
fn from_status_caps_long_body_test() {
    let body = format!("  {}  ", "x".repeat(MAX_BODY_MESSAGE_LEN + 100));

    let ClientError::Http { message, .. } = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes())
    else {
        panic!("expected HTTP error");
    };

    assert_eq!(MAX_BODY_MESSAGE_LEN + 3, message.len());
    assert!(message.starts_with("xxx"));
    assert!(message.ends_with("x..."));
}

use super::*;

#[test]
fn client_error_conversion_test() {
    let error: FetchError = ClientError::Auth {
        code: 403,
        message: "forbidden".to_owned(),
    }
    .into();
    assert!(error.is_auth());

    let error: FetchError = ClientError::NotFound("pods \"web\" not found".to_owned()).into();
    assert_eq!(FetchError::NotFound("pods \"web\" not found".to_owned()), error);
    assert!(!error.is_auth());

    let error: FetchError = ClientError::Incomplete.into();
    assert_eq!(FetchError::Client("list response ended unexpectedly".to_owned()), error);
}

#[test]
fn context_error_conversion_test() {
    let error: FetchError = ContextError::UnknownContext("staging".to_owned()).into();
    assert_eq!(FetchError::UnknownContext("staging".to_owned()), error);

    let error: FetchError = ContextError::Client(ClientError::Http {
        code: 500,
        message: "boom".to_owned(),
    })
    .into();
    assert_eq!(
        FetchError::Http {
            code: 500,
            message: "boom".to_owned()
        },
        error
    );

    let error: FetchError =
        ContextError::Discovery(DiscoveryError::Groups(ClientError::BadRequest("bad".to_owned()))).into();
    assert_eq!(
        FetchError::Discovery("cannot list API groups: bad request: bad".to_owned()),
        error
    );
}

use http::{Request, Response, StatusCode};
use kube::client::Body;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::Client;

/// Requests received by the mocked API server.
pub type Requests = Arc<Mutex<Vec<String>>>;

/// Creates [`Client`] backed by an in-memory API server that answers by the request path and query.\
/// Paths without a route get `404` with the Kubernetes `Status` body.
pub fn mock_client(routes: Vec<(&str, u16, Value)>) -> (Client, Requests) {
    let routes = routes
        .into_iter()
        .map(|(path, status, body)| (path.to_owned(), (status, body)))
        .collect::<HashMap<_, _>>();
    let requests = Requests::default();
    let (service, mut handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();

    let received = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Some((request, send)) = handle.next_request().await {
            let path = request.uri().to_string();
            received.lock().unwrap().push(path.clone());

            let (status, body) = routes.get(&path).cloned().unwrap_or_else(|| {
                (
                    404,
                    serde_json::json!({ "kind": "Status", "message": format!("{path} not found"), "code": 404 }),
                )
            });
            let response = Response::builder()
                .status(StatusCode::from_u16(status).unwrap())
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap();
            send.send_response(response);
        }
    });

    (Client::new(kube::Client::new(service, "default")), requests)
}

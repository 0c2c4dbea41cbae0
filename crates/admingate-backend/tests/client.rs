//! Integration tests for the backend client against a mock backend.

use std::time::Duration;

use assert_json_diff::assert_json_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use admingate_backend::{BackendClient, UploadFile};
use admingate_core::{GatewayError, ListQuery};

fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(5)).unwrap()
}

fn list_query(pairs: &[(&str, &str)]) -> ListQuery {
    ListQuery::from_params(pairs.iter().copied(), 100, 1000)
}

#[tokio::test]
async fn list_forwards_pagination_search_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "ahmed"))
        .and(query_param("status", "active"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let query = list_query(&[
        ("page", "2"),
        ("limit", "10"),
        ("search", "ahmed"),
        ("status", "active"),
    ]);
    let body = client_for(&server)
        .list("users", &query, Some("tok-1"))
        .await
        .unwrap();
    assert_json_eq!(body, json!({"data": [], "total": 0}));
}

#[tokio::test]
async fn fetch_all_omits_pagination_and_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"name": "Editor"}, {"name": "Admin"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch_all("roles", &list_query(&[("page", "3"), ("limit", "2")]), Some("t"))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);

    // page/limit must not reach the backend on the emulated path
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn fetch_all_unwraps_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1}], "total": 1})),
        )
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch_all("users", &list_query(&[]), Some("t"))
        .await
        .unwrap();
    assert_eq!(items, vec![json!({"id": 1})]);
}

#[tokio::test]
async fn create_passes_body_through_verbatim() {
    let server = MockServer::start().await;
    let payload = json!({"name": "Editor", "namespace": "cms"});
    Mock::given(method("POST"))
        .and(path("/roles"))
        .and(body_json(&payload))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "Editor"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server)
        .create("roles", &payload, Some("tok"))
        .await
        .unwrap();
    assert_eq!(body["id"], 9);
}

#[tokio::test]
async fn update_uses_patch_on_resource_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server)
        .update("users", "5", &json!({"name": "x"}), Some("tok"))
        .await
        .unwrap();
    assert_eq!(body["id"], 5);
}

#[tokio::test]
async fn delete_tolerates_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete("users", "5", Some("tok")).await.unwrap();
}

#[tokio::test]
async fn upstream_error_status_and_message_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"statusCode": 422, "message": "name must not be empty"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create("roles", &json!({}), Some("tok"))
        .await
        .unwrap_err();
    match err {
        GatewayError::Upstream { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "name must not be empty");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_upstream_error_body_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_one("users", "9", Some("tok"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn connection_failure_maps_to_transport_error() {
    // Bind and immediately drop a listener to get a dead port.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BackendClient::new(
        Url::parse(&format!("http://{addr}")).unwrap(),
        Duration::from_secs(1),
    )
    .unwrap();
    let err = client.get_one("users", "1", Some("tok")).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn invalid_json_success_body_maps_to_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_one("users", "1", Some("tok"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}

#[tokio::test]
async fn upload_reencodes_multipart_with_ref_column() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/iso-companies/42/upload"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"document_en_url": "files/a.pdf"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let files = vec![
        UploadFile {
            field_name: "files".into(),
            file_name: "a.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: b"pdf-bytes-a".to_vec(),
        },
        UploadFile {
            field_name: "files".into(),
            file_name: "b.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: b"pdf-bytes-b".to_vec(),
        },
    ];

    let response = client_for(&server)
        .upload("iso-companies", "42", files, "document_en_url", Some("tok"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    let body: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["document_en_url"], "files/a.pdf");

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let raw = String::from_utf8_lossy(&request.body);
    assert!(raw.contains("name=\"refColumn\""));
    assert!(raw.contains("document_en_url"));
    assert!(raw.contains("pdf-bytes-a"));
    assert!(raw.contains("pdf-bytes-b"));
    assert!(raw.contains("filename=\"b.pdf\""));
}

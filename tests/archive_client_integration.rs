//! Integration tests for the archive HTTP client against a mock server.

use iacatalog_core::{ArchiveClient, ArchiveError, ArchiveService, FieldValue, HttpTimeouts};
use serde_json::json;
use wiremock::matchers::{header_regex, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

fn client_for(uri: &str) -> ArchiveClient {
    ArchiveClient::with_base_url(uri, HttpTimeouts::default()).unwrap()
}

#[tokio::test]
async fn test_search_follows_cursor_until_last_page() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/services/search/v1/scrape"))
        .and(query_param("q", "Edward Pusey"))
        .and(query_param("fields", "identifier"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"identifier": "sermons00puse"}, {"identifier": "tract90"}],
            "count": 2,
            "total": 3,
            "cursor": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/search/v1/scrape"))
        .and(query_param("cursor", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"identifier": "eirenicon00puse"}],
            "count": 1,
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identifiers = client_for(&server.uri()).search("Edward Pusey").await.unwrap();
    assert_eq!(identifiers, vec!["sermons00puse", "tract90", "eirenicon00puse"]);
}

#[tokio::test]
async fn test_search_with_no_results_is_empty() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/services/search/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "count": 0,
            "total": 0
        })))
        .mount(&server)
        .await;

    let identifiers = client_for(&server.uri()).search("nothing here").await.unwrap();
    assert!(identifiers.is_empty());
}

#[tokio::test]
async fn test_search_server_error_maps_to_status() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/services/search/v1/scrape"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).search("q").await.unwrap_err();
    assert!(
        matches!(err, ArchiveError::Status { status: 503, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_metadata_parses_record() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/metadata/id1"))
        .and(header_regex("user-agent", "^iacatalog/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dir": "/1/items/id1",
            "metadata": {
                "title": "My Book",
                "creator": ["Smith, J.", "Doe, A."],
                "year": "1920",
                "language": "English"
            },
            "files": [{"name": "id1_text.pdf"}, {"name": "id1_meta.xml"}]
        })))
        .mount(&server)
        .await;

    let record = client_for(&server.uri())
        .metadata("id1")
        .await
        .unwrap()
        .expect("metadata section present");

    assert_eq!(record.title, Some(FieldValue::Text("My Book".to_string())));
    assert_eq!(
        record.creator,
        Some(FieldValue::List(vec![
            "Smith, J.".to_string(),
            "Doe, A.".to_string()
        ]))
    );
    assert_eq!(record.storage_dir.as_deref(), Some("/1/items/id1"));
    assert_eq!(record.files.len(), 2);
    assert_eq!(record.files[0].name.as_deref(), Some("id1_text.pdf"));
}

#[tokio::test]
async fn test_metadata_without_metadata_section_is_none() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/metadata/darkitem"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let record = client_for(&server.uri()).metadata("darkitem").await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn test_metadata_not_found_maps_to_status() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/metadata/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).metadata("missing").await.unwrap_err();
    assert!(matches!(err, ArchiveError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_metadata_invalid_json_maps_to_decode() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/metadata/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).metadata("garbled").await.unwrap_err();
    assert!(matches!(err, ArchiveError::Decode { .. }));
}

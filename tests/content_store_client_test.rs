//! Content store client tests
//!
//! Runs the client against a one-shot local HTTP responder and checks the
//! request it sends and how the reply is mapped.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use marquee_lib::modules::content::domain::{
    CatalogRepository, ContentSearchRepository, SearchRequest,
};
use marquee_lib::modules::content::{ContentStoreClient, StoreConfig};
use marquee_lib::modules::search::{SearchConfig, SearchPhase, SearchPipeline};
use marquee_lib::shared::application::PaginationParams;
use marquee_lib::shared::domain::value_objects::ContentType;
use marquee_lib::shared::errors::AppError;

/// Serve a single canned response; the handle yields the raw request head
async fn serve_once(status: &str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");
    let status = status.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{}", addr), handle)
}

fn client_for(base_url: &str) -> ContentStoreClient {
    ContentStoreClient::new(&StoreConfig::new(base_url, "anon-key")).expect("build client")
}

fn request_line(head: &str) -> String {
    head.lines().next().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_search_sends_paged_ilike_query_with_auth_headers() {
    let body = json!([
        {"id": 7, "title": "Alien", "image_url": null, "content_type": "movie"},
        {"id": "s1", "title": "Aliens Among Us", "image_url": "https://img/x.jpg", "content_type": "series"},
        {"id": "bad", "title": "Mystery", "content_type": "podcast"}
    ])
    .to_string();
    let (base_url, server) = serve_once("200 OK", body).await;
    let client = client_for(&base_url);

    let request = SearchRequest::new("alien", PaginationParams::new(3, 20));
    let page = client.search_content(&request).await.expect("search succeeds");
    let results = page.results;
    assert_eq!(page.fetched, 3);

    // The row with an unknown content type is dropped on ingress
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "7");
    assert_eq!(results[1].content_type, ContentType::Series);
    assert_eq!(results[1].image_url.as_deref(), Some("https://img/x.jpg"));

    let head = server.await.expect("server task");
    let line = request_line(&head);
    assert!(line.starts_with("GET /rest/v1/content?"), "{}", line);
    assert!(line.contains("select=id%2Ctitle%2Cimage_url%2Ccontent_type"));
    assert!(line.contains("title=ilike.%22%2Aalien%2A%22"));
    assert!(line.contains("order=title.asc%2Cid.asc"));
    assert!(line.contains("limit=20&offset=40"));

    let head = head.to_lowercase();
    assert!(head.contains("apikey: anon-key"));
    assert!(head.contains("authorization: bearer anon-key"));
}

#[tokio::test]
async fn test_listing_uses_zero_based_range() {
    let (base_url, server) = serve_once("200 OK", "[]".to_string()).await;
    let client = client_for(&base_url);

    let items = client
        .list_by_type(ContentType::Series, 2, 12)
        .await
        .expect("listing succeeds");
    assert!(items.is_empty());

    let line = request_line(&server.await.expect("server task"));
    assert!(line.contains("content_type=eq.series"));
    assert!(line.contains("order=created_at.desc"));
    assert!(line.contains("limit=12&offset=24"));
}

#[tokio::test]
async fn test_error_statuses_map_to_app_errors() {
    let cases = [
        ("429 Too Many Requests", "rate"),
        ("401 Unauthorized", "unauthorized"),
        ("404 Not Found", "not_found"),
        ("500 Internal Server Error", "api"),
    ];

    for (status, expected) in cases {
        let (base_url, server) = serve_once(status, r#"{"message":"nope"}"#.to_string()).await;
        let client = client_for(&base_url);

        let err = client
            .new_releases(6)
            .await
            .expect_err("non-2xx must fail");
        let matched = match expected {
            "rate" => matches!(err, AppError::RateLimitError(_)),
            "unauthorized" => matches!(err, AppError::Unauthorized(_)),
            "not_found" => matches!(err, AppError::NotFound(_)),
            _ => matches!(err, AppError::ApiError(_)),
        };
        assert!(matched, "{} mapped to {:?}", status, err);
        server.await.expect("server task");
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_serialization_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"not":"an array"}"#.to_string()).await;
    let client = client_for(&base_url);

    let err = client
        .search_content(&SearchRequest::new("x", PaginationParams::default()))
        .await
        .expect_err("object body cannot decode as rows");
    assert!(matches!(err, AppError::SerializationError(_)), "{:?}", err);
    server.await.expect("server task");
}

#[tokio::test]
async fn test_full_page_with_malformed_row_keeps_pagination_open() {
    let mut rows: Vec<serde_json::Value> = (0..19)
        .map(|i| {
            json!({
                "id": format!("m{:02}", i),
                "title": format!("Noir {:02}", i),
                "content_type": "movie"
            })
        })
        .collect();
    rows.push(json!({"id": "p1", "title": "Noir Radio", "content_type": "podcast"}));
    let (base_url, server) =
        serve_once("200 OK", serde_json::Value::Array(rows).to_string()).await;

    let pipeline = SearchPipeline::new(
        Arc::new(client_for(&base_url)),
        SearchConfig {
            debounce: Duration::from_millis(10),
            ..SearchConfig::default()
        },
    );
    let mut updates = pipeline.subscribe();
    pipeline.set_query("noir").await;

    let settled = tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|s| !s.query.is_empty() && s.phase == SearchPhase::Settled),
    )
    .await
    .expect("search should settle")
    .expect("sender alive")
    .clone();
    server.await.expect("server task");

    assert_eq!(settled.results.len(), 19);
    assert!(settled.error.is_none());
    assert!(settled.has_more, "store sent a full page of 20");
}

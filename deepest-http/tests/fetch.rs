use deepest_http::{HttpError, PageFetcher, PageSource, StatusCode};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn ok_body_is_joined_without_separators() {
    let server = serve(200, "<html>\n<body>\r\n<p>hi</p>\n</body>\n</html>\n").await;
    let fetcher = PageFetcher::new().unwrap();

    let page = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap();

    assert_eq!(page, "<html><body><p>hi</p></body></html>");
}

#[tokio::test]
async fn empty_ok_body_is_content_not_error() {
    let server = serve(200, "").await;
    let fetcher = PageFetcher::new().unwrap();

    let page = fetcher
        .fetch_page(&format!("{}/page", server.uri()))
        .await
        .unwrap();

    assert_eq!(page, "");
}

#[tokio::test]
async fn non_200_success_code_is_rejected() {
    let server = serve(204, "").await;
    let fetcher = PageFetcher::new().unwrap();

    let err = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap_err();

    match err {
        HttpError::Status { status, .. } => assert_eq!(status, StatusCode::NO_CONTENT),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_not_retried() {
    // `expect(1)` on the mock fails the test on drop if a retry happens.
    let server = serve(503, "try later").await;
    let fetcher = PageFetcher::new().unwrap();

    let err = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap_err();

    match err {
        HttpError::Status {
            status,
            body_snippet,
        } => {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body_snippet, "try later");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_utf8_is_replaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<p>\xff</p>".to_vec()))
        .mount(&server)
        .await;
    let fetcher = PageFetcher::new().unwrap();

    let page = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap();

    assert_eq!(page, "<p>\u{fffd}</p>");
}

#[tokio::test]
async fn custom_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(wiremock::matchers::header("user-agent", "deepest-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<a>ok</a>"))
        .expect(1)
        .mount(&server)
        .await;
    let fetcher = PageFetcher::new()
        .unwrap()
        .with_user_agent("deepest-test/1.0")
        .unwrap();

    let page = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap();

    assert_eq!(page, "<a>ok</a>");
}

#[tokio::test]
async fn slow_server_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let fetcher = PageFetcher::new()
        .unwrap()
        .with_timeout(Duration::from_millis(100));

    let err = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn bad_url_never_reaches_network() {
    let fetcher = PageFetcher::new().unwrap();
    let err = fetcher.fetch("file:///etc/hosts").await.unwrap_err();
    assert!(matches!(err, HttpError::Url(_)));
}

//! Batching against a real HTTP endpoint

use std::time::Duration;

use graphql_batcher::{BatchFetcher, FetchRequest, FetchState, FetcherOptions};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn batches_keyed_requests_into_one_http_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_json(json!({
            "query": "{_blog_my__post:post(slug:\"my-post\"){title},me:viewer{login}}"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_blog_my__post": {"title": "My post"},
                "me": {"login": "octocat"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = BatchFetcher::http(
        FetcherOptions::new(format!("{}/graphql", server.uri()))
            .with_delay(Duration::from_millis(10)),
    );

    let post = FetchRequest::new("post(slug:\"my-post\"){title}");
    let me = FetchRequest::new("viewer{login}")
        .with_key("me")
        .with_extractor("login");

    assert_eq!(fetcher.request(&post, "/blog/my-post"), FetchState::Pending);

    let login = fetcher.fetch(me.clone(), "/blog/my-post").await.unwrap();
    assert_eq!(login, Some(json!("octocat")));

    assert_eq!(
        fetcher.request(&post, "/blog/my-post"),
        FetchState::Cached(json!({"title": "My post"}))
    );
    assert!(fetcher.request(&me, "/elsewhere").is_cached());
}

#[tokio::test]
async fn graphql_errors_leave_the_cache_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Syntax Error"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = BatchFetcher::http(
        FetcherOptions::new(server.uri()).with_delay(Duration::from_millis(5)),
    );

    let result = fetcher
        .fetch(FetchRequest::new("broken{").with_key("broken"), "/")
        .await;

    let error = tokio_test::assert_err!(result);
    assert!(error.is_transport());
    assert!(fetcher.current_state().is_empty());
    assert_eq!(fetcher.pending_len(), 0);
}

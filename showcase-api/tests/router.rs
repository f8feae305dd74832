mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use showcase_api::app;
use showcase_core::EngagementPolicy;
use tower::ServiceExt;

use common::build_test_state;

fn router() -> axum::Router {
    let (state, _backends) = build_test_state(EngagementPolicy::Allow, EngagementPolicy::Allow);
    app(state)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_root_redirects_to_destinations() {
    let response = router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/destinations/home");
}

#[tokio::test]
async fn test_unknown_frontend_is_not_found() {
    let response = router()
        .oneshot(Request::builder().uri("/bookstore/home").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("No front-end named bookstore"));
}

#[tokio::test]
async fn test_pages_render_html() {
    let app = router();

    for uri in ["/movies", "/movies/login", "/destinations/register", "/shoeshelf/home"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert!(body_text(response).await.starts_with("<!DOCTYPE html>"), "{}", uri);
    }
}

#[tokio::test]
async fn test_register_redirects_and_shows_banner() {
    let app = router();

    let response = app
        .clone()
        .oneshot(form_post(
            "/movies/register",
            "email=ivan%40abv.bg&password=123456&repeatPassword=123456",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/movies/home");

    let response = app
        .oneshot(Request::builder().uri("/movies/home").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Successfully registered!"));
    assert!(html.contains("Welcome, ivan@abv.bg"));
}

#[tokio::test]
async fn test_failed_submission_renders_error_banner() {
    let response = router()
        .oneshot(form_post("/destinations/login", "email=&password="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("All fields are required!"));
    assert!(html.contains("errorBox"));
}

#[tokio::test]
async fn test_search_redirect_keeps_query() {
    let response = router()
        .oneshot(form_post("/movies/search", "search-string=dark+knight"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/movies/home?search=dark%20knight");
}

#[tokio::test]
async fn test_location_is_percent_decoded_once() {
    let response = router()
        .oneshot(Request::builder().uri("/movies/details/x%2541").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No record with id x%41 exists in movies"), "{}", html);
}

#[tokio::test]
async fn test_plus_in_path_is_not_a_space() {
    let response = router()
        .oneshot(Request::builder().uri("/movies/details/a+b").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("No record with id a+b exists in movies"), "{}", html);
}

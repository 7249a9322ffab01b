mod common;

use axum::http::{Request, StatusCode, header};
use common::{empty_request, json_request, make_test_app, multipart_request};
use roster::routes::pages::Page;
use serde_json::json;

/// Test Case: every page in the table renders
#[tokio::test]
async fn test_every_page_renders() {
    let app = make_test_app().await;

    for page in Page::ALL {
        let (status, body) = app.send_raw(empty_request("GET", page.path())).await;
        assert_eq!(status, StatusCode::OK, "{}", page.name());

        let html = String::from_utf8(body).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"), "{}", page.name());
        assert!(html.contains(&format!("id=\"{}\"", page.name())));
        for nav_page in Page::ALL {
            assert!(
                html.contains(&format!("href=\"{}\"", nav_page.path())),
                "{} should link to {}",
                page.name(),
                nav_page.name()
            );
        }
    }
}

/// Test Case: list pages show what the API created
#[tokio::test]
async fn test_list_pages_show_records() {
    let app = make_test_app().await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/studentForm",
            &json!({"studentId": 77, "firstName": "Alan", "lastName": "Turing", "section": "Z9"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/adminForm",
            &[
                ("adminId", "5"),
                ("firstName", "Barbara"),
                ("lastName", "Liskov"),
                ("department", "CSAIL"),
            ],
            &[],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, students) = app
        .send_raw(empty_request("GET", Page::StudentList.path()))
        .await;
    let students = String::from_utf8(students).unwrap();
    assert!(students.contains("Turing"));
    assert!(students.contains("hx-delete=\"/api/students/"));

    let (_, admins) = app
        .send_raw(empty_request("GET", Page::AdminList.path()))
        .await;
    let admins = String::from_utf8(admins).unwrap();
    assert!(admins.contains("Liskov"));
    assert!(admins.contains("CSAIL"));
}

/// Test Case: anything else comes from the front-end bundle
#[tokio::test]
async fn test_static_bundle_is_the_fallback() {
    let app = make_test_app().await;
    std::fs::write(app.static_dir().join("app.js"), "console.log('hi')").unwrap();

    let (status, body) = app.send_raw(empty_request("GET", "/app.js")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('hi')");

    let (status, _) = app.send_raw(empty_request("GET", "/missing.js")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test Case: cross-origin callers are allowed
#[tokio::test]
async fn test_cors_is_permissive() {
    let app = make_test_app().await;

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/students")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.app.clone(), req).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

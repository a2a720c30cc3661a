//! End-to-end checks of the HTTP surface, driven through the real router

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use userdir::forms::FORM_FIELDS_COUNT_MAX;
use userdir::landing::LandingConfig;
use userdir::users::{self, SharedUserStore};
use userdir::{router, AppState};

const BOUNDARY: &str = "userdir-test-boundary";

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Router over a freshly seeded store, plus a handle on that store
fn app() -> (Router, SharedUserStore) {
    init_logging();
    let store = users::new_shared_store();
    let app = router(AppState::new(store.clone(), &LandingConfig::default()));
    (app, store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_multipart(app: &Router, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let request = Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_urlencoded(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn go_home() -> Value {
    json!([{"type": "FireEvent", "event": {"type": "go-to", "url": "/"}}])
}

/// Ids shown in the listing table, in display order
async fn listed_ids(app: &Router) -> Vec<i64> {
    let (status, page) = get_json(app, "/api/").await;
    assert_eq!(status, StatusCode::OK);
    page[0]["components"][1]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_listing_page() {
    let (app, _) = app();
    let (status, page) = get_json(&app, "/api/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page[0]["type"], "Page");

    let components = &page[0]["components"];
    assert_eq!(
        components[0],
        json!({"type": "Heading", "text": "Пользователи", "level": 2})
    );

    let table = &components[1];
    assert_eq!(table["type"], "Table");
    assert_eq!(
        table["data"],
        json!([{"id": 1, "name": "Артём", "dob": "1990-01-01"}])
    );
    assert_eq!(table["columns"][0], json!({"field": "id", "title": "Id"}));
    assert_eq!(
        table["columns"][1]["onClick"],
        json!({"type": "go-to", "url": "/user/{id}/"})
    );
    assert_eq!(table["columns"][2]["mode"], "date");

    assert_eq!(
        components[2],
        json!({
            "type": "Button",
            "text": "Добавить пользователя",
            "onClick": {"type": "go-to", "url": "/user/add"}
        })
    );
}

#[tokio::test]
async fn test_add_form_page() {
    let (app, _) = app();
    let (status, page) = get_json(&app, "/api/user/add").await;

    assert_eq!(status, StatusCode::OK);
    let components = &page[0]["components"];
    assert_eq!(components[0]["type"], "Link");
    assert_eq!(components[0]["onClick"], json!({"type": "back"}));
    assert_eq!(components[1]["text"], "Добавить пользователя");

    let form = &components[2];
    assert_eq!(form["type"], "ModelForm");
    assert_eq!(form["submitUrl"], "/api/user");
    assert_eq!(form["formFields"][0]["name"], "name");
    assert_eq!(form["formFields"][0]["title"], "Имя");
    assert_eq!(form["formFields"][0]["htmlType"], "text");
    assert_eq!(form["formFields"][1]["name"], "dob");
    assert_eq!(form["formFields"][1]["htmlType"], "date");
    assert_eq!(form["formFields"][1]["required"], true);
}

#[tokio::test]
async fn test_add_user_multipart() {
    let (app, store) = app();
    let (status, body) = post_multipart(
        &app,
        "/api/user",
        &[("name", "Мария"), ("dob", "1985-03-08")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, go_home());

    let store = store.read().await;
    let user = tokio_test::assert_ok!(store.get(2));
    assert_eq!(user.name, "Мария");
    assert_eq!(user.dob.to_string(), "1985-03-08");
}

#[tokio::test]
async fn test_add_user_urlencoded() {
    let (app, _) = app();
    let (status, body) = post_urlencoded(&app, "/api/user", "name=Ada&dob=1815-12-10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, go_home());
    assert_eq!(listed_ids(&app).await, vec![1, 2]);
}

#[tokio::test]
async fn test_add_user_rejects_bad_form() {
    let (app, store) = app();
    let (status, body) = post_multipart(&app, "/api/user", &[("dob", "not-a-date")]).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = body["detail"]["form"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["loc"], json!(["name"]));
    assert_eq!(errors[0]["type"], "missing");
    assert_eq!(errors[1]["loc"], json!(["dob"]));
    assert_eq!(errors[1]["type"], "date_parsing");

    assert_eq!(store.read().await.len(), 1);
}

#[tokio::test]
async fn test_ids_are_consecutive() {
    let (app, _) = app();
    for name in ["a", "b", "c"] {
        let (status, _) = post_multipart(&app, "/api/user", &[("name", name), ("dob", "2000-01-01")]).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(listed_ids(&app).await, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_profile_page() {
    let (app, _) = app();
    let (status, page) = get_json(&app, "/api/user/1/").await;

    assert_eq!(status, StatusCode::OK);
    let components = &page[0]["components"];
    assert_eq!(components[0]["text"], "Артём");
    assert_eq!(components[1]["onClick"], json!({"type": "back"}));
    assert_eq!(components[2]["type"], "Details");
    assert_eq!(
        components[2]["data"],
        json!({"id": 1, "name": "Артём", "dob": "1990-01-01"})
    );
    assert_eq!(
        components[3]["onClick"],
        json!({"type": "page", "name": "delete-user"})
    );

    let form = &components[4];
    assert_eq!(form["type"], "Form");
    assert_eq!(form["submitUrl"], "/api/user/delete");
    assert_eq!(form["footer"], json!([]));
    assert_eq!(form["submitTrigger"], json!({"type": "page", "name": "delete-user"}));
    assert_eq!(form["formFields"][0]["htmlType"], "hidden");
    assert_eq!(form["formFields"][0]["initial"], 1);
}

#[tokio::test]
async fn test_profile_unknown_user_is_404() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/user/42/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "User not found"}));
}

#[tokio::test]
async fn test_profile_non_integer_id_is_rejected() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/user/abc/").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_delete_absent_user_is_noop() {
    let (app, _) = app();
    let (status, body) = post_multipart(&app, "/api/user/delete", &[("id", "99")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, go_home());
    assert_eq!(listed_ids(&app).await, vec![1]);
}

#[tokio::test]
async fn test_delete_rejects_bad_id() {
    let (app, _) = app();
    let (status, body) = post_urlencoded(&app, "/api/user/delete", "id=one").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"]["form"][0]["type"], "int_parsing");
    assert_eq!(listed_ids(&app).await, vec![1]);
}

#[tokio::test]
async fn test_seeded_scenario() {
    let (app, _) = app();

    let (status, _) = post_multipart(&app, "/api/user", &[("name", "X"), ("dob", "2000-05-05")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed_ids(&app).await, vec![1, 2]);

    let (status, _) = post_multipart(&app, "/api/user/delete", &[("id", "1")]).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = get_json(&app, "/api/").await;
    assert_eq!(
        page[0]["components"][1]["data"],
        json!([{"id": 2, "name": "X", "dob": "2000-05-05"}])
    );

    let (status, _) = get_json(&app, "/api/user/1/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, page) = get_json(&app, "/api/user/2/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page[0]["components"][0]["text"], "X");
}

#[tokio::test]
async fn test_unmatched_paths_serve_landing() {
    let (app, _) = app();

    for uri in ["/", "/user/1/", "/anything/else"] {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(r#"<div id="root"></div>"#));
        assert!(html.contains("fastui-prebuilt"));
    }

    let request = Request::post("/whatever").body(Body::empty()).unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_slashless_api_paths_redirect() {
    let (app, _) = app();

    for (uri, location) in [
        ("/api", "/api/"),
        ("/api/user/1", "/api/user/1/"),
        ("/api/user/1?tab=info", "/api/user/1/?tab=info"),
    ] {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], location);
    }
}

#[tokio::test]
async fn test_add_user_rejects_too_many_fields() {
    let (app, store) = app();

    let names: Vec<String> = (0..=FORM_FIELDS_COUNT_MAX).map(|i| format!("f{}", i)).collect();
    let fields: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "x")).collect();
    let (status, body) = post_multipart(&app, "/api/user", &fields).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("too many form fields"));
    assert_eq!(store.read().await.len(), 1);
}

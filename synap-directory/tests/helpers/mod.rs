//! Shared helpers for synap-directory integration tests
//!
//! Every test gets its own in-memory database; requests go through the full
//! router with `oneshot`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use synap_common::db::init_memory_database;
use synap_directory::db::users;
use synap_directory::services::{ImageHost, ImageHostError, MetadataScraper};
use synap_directory::{build_router, AppState};
use tower::util::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@synap.test";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Image host that records uploads and answers with a fixed URL
#[derive(Default)]
pub struct RecordingHost {
    pub uploads: Mutex<Vec<(String, usize, String)>>,
}

#[async_trait]
impl ImageHost for RecordingHost {
    async fn upload_url(&self, url: &str, _folder: &str) -> Result<String, ImageHostError> {
        Ok(format!("https://images.test/remote/{}", url.len()))
    }

    async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<String, ImageHostError> {
        self.uploads
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.len(), folder.to_string()));
        Ok(format!("https://images.test/{}/{}", folder, file_name))
    }
}

/// State over a fresh in-memory database
pub async fn test_state(image_host: Option<Arc<dyn ImageHost>>) -> AppState {
    let db = init_memory_database().await.expect("Should create test database");
    let scraper = MetadataScraper::new().expect("Should build scraper");
    AppState::new(db, image_host, scraper, 24)
}

/// Send one request through a fresh router over `state`
pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
    build_router(state.clone())
        .oneshot(request)
        .await
        .expect("Router should not fail")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().copied())
        .finish();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Multipart body with a single field
pub fn multipart_request(uri: &str, field: &str, file_name: &str, bytes: &[u8], cookie: &str) -> Request<Body> {
    let boundary = "synap-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

/// `name=value` part of the response's Set-Cookie header
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("Response should set a cookie")
        .to_string()
}

/// Seed the admin account and return a signed-in cookie
pub async fn admin_cookie(state: &AppState) -> String {
    users::seed_admin(&state.db, ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("Should seed admin");

    let response = send(
        state,
        json_request(
            "POST",
            "/api/auth/sign-in",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    session_cookie(&response)
}

/// Signed-in cookie for an account without the admin role
pub async fn member_cookie(state: &AppState) -> String {
    let email = "member@synap.test";
    users::seed_admin(&state.db, email, "member password")
        .await
        .expect("Should seed account");
    sqlx::query("UPDATE users SET role = 'user' WHERE email = ?")
        .bind(email)
        .execute(&state.db)
        .await
        .expect("Should demote account");

    let response = send(
        state,
        json_request(
            "POST",
            "/api/auth/sign-in",
            serde_json::json!({ "email": email, "password": "member password" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    session_cookie(&response)
}

/// Id of a seeded category by slug
pub async fn category_id(state: &AppState, slug: &str) -> String {
    sqlx::query_scalar("SELECT id FROM categories WHERE slug = ?")
        .bind(slug)
        .fetch_one(&state.db)
        .await
        .expect("Category should exist")
}

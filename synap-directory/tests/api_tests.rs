//! Integration tests for the synap-directory JSON API
//!
//! Covers the public read endpoints, community markdown submissions and the
//! admin catalog flows (sections, categories, tags, bookmarks, uploads).

mod helpers;

use axum::http::StatusCode;
use helpers::*;
use serde_json::json;
use std::sync::Arc;
use synap_directory::api::uploads::UPLOAD_FOLDER;
use synap_directory::services::ImageHost;

// =============================================================================
// Health and public reads
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let state = test_state(None).await;

    let response = send(&state, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "synap-directory");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_default_categories_listed() {
    let state = test_state(None).await;

    let body = body_json(send(&state, get("/api/categories", None)).await).await;
    assert_eq!(body["success"], true);

    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    for slug in ["apps-and-tools", "articles", "youtube", "md"] {
        assert!(slugs.contains(&slug), "missing {slug}");
    }
}

#[tokio::test]
async fn test_resource_types_listed() {
    let state = test_state(None).await;

    let body = body_json(send(&state, get("/api/resource-types", None)).await).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 4);
    assert!(names.contains(&"Post"));
}

#[tokio::test]
async fn test_static_stylesheet() {
    let state = test_state(None).await;

    let response = send(&state, get("/static/synap.css", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/css; charset=utf-8"
    );
}

// =============================================================================
// Sidebar sections and categories
// =============================================================================

#[tokio::test]
async fn test_sidebar_section_and_category_flow() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let response = send(
        &state,
        json_request("POST", "/api/sidebar/sections", json!({ "title": "Gen AI", "sortOrder": 1 }), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let section_id = body_json(response).await["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        &state,
        json_request(
            "POST",
            "/api/categories",
            json!({ "name": "Image Models", "sectionId": section_id, "iconUrl": "https://img.test/i.png" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(send(&state, get("/api/sidebar", None)).await).await;
    let sections = body["data"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["title"], "Gen AI");
    assert_eq!(sections[0]["slug"], "gen-ai");
    assert_eq!(sections[0]["categories"][0]["name"], "Image Models");
    assert_eq!(sections[0]["categories"][0]["slug"], "image-models");

    // Deleting the section takes its categories with it
    let response = send(
        &state,
        empty_request("DELETE", &format!("/api/sidebar/sections/{section_id}"), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(send(&state, get("/api/categories", None)).await).await;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["slug"] != "image-models"));
}

#[tokio::test]
async fn test_duplicate_section_conflicts() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let create = || json_request("POST", "/api/sidebar/sections", json!({ "title": "Learning" }), Some(&cookie));
    assert_eq!(send(&state, create()).await.status(), StatusCode::CREATED);

    let response = send(&state, create()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_category_requires_valid_section() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let response = send(
        &state,
        json_request(
            "POST",
            "/api/categories",
            json!({ "name": "Orphans", "sectionId": "no-such-section" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid sidebar section");
}

#[tokio::test]
async fn test_delete_missing_category_is_not_found() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let response = send(&state, empty_request("DELETE", "/api/categories/missing", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Category not found");
}

// =============================================================================
// Tags
// =============================================================================

#[tokio::test]
async fn test_tag_create_is_idempotent() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let response = send(&state, json_request("POST", "/api/tags", json!({ "name": "Open Source" }), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;
    assert_eq!(first["data"]["created"], true);
    assert_eq!(first["data"]["tag"]["slug"], "open-source");

    let response = send(&state, json_request("POST", "/api/tags", json!({ "name": "open source" }), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["data"]["created"], false);
    assert_eq!(second["data"]["tag"]["id"], first["data"]["tag"]["id"]);

    let tags = body_json(send(&state, get("/api/tags", None)).await).await;
    assert_eq!(tags["data"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Bookmarks
// =============================================================================

#[tokio::test]
async fn test_bookmark_crud_flow() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;
    let tools = category_id(&state, "apps-and-tools").await;

    let tag = body_json(
        send(&state, json_request("POST", "/api/tags", json!({ "name": "Free" }), Some(&cookie))).await,
    )
    .await["data"]["tag"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send(
        &state,
        json_request(
            "POST",
            "/api/bookmarks",
            json!({
                "url": "https://tool.example",
                "categoryId": tools,
                "sidebarOption": "apps-and-tools",
                "title": "Tool One",
                "description": "Does things",
                "tagIds": [tag],
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let bookmark_id = body_json(response).await["data"]["id"].as_str().unwrap().to_string();

    let page = body_json(send(&state, get("/api/bookmarks", Some(&cookie))).await).await;
    assert_eq!(page["data"]["totalItems"], 1);
    assert_eq!(page["data"]["page"], 1);
    assert_eq!(page["data"]["pageSize"], 100);
    assert_eq!(page["data"]["totalPages"], 1);
    let row = &page["data"]["bookmarks"][0];
    assert_eq!(row["id"], bookmark_id.as_str());
    assert_eq!(row["title"], "Tool One");
    assert_eq!(row["url"], "https://tool.example");
    assert_eq!(row["tags"][0]["name"], "Free");

    // Replace the tag set with nothing
    let response = send(
        &state,
        json_request("PUT", &format!("/api/bookmarks/{bookmark_id}/tags"), json!({ "tagIds": [] }), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(send(&state, get("/api/bookmarks", Some(&cookie))).await).await;
    assert!(page["data"]["bookmarks"][0]["tags"].as_array().unwrap().is_empty());

    let response = send(&state, empty_request("DELETE", &format!("/api/bookmarks/{bookmark_id}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(send(&state, get("/api/bookmarks", Some(&cookie))).await).await;
    assert_eq!(page["data"]["totalItems"], 0);

    let response = send(&state, empty_request("DELETE", &format!("/api/bookmarks/{bookmark_id}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookmark_rejects_invalid_url() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;
    let tools = category_id(&state, "apps-and-tools").await;

    let response = send(
        &state,
        json_request(
            "POST",
            "/api/bookmarks",
            json!({ "url": "not a url", "categoryId": tools, "title": "Broken" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn test_bookmark_rejects_unknown_category() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let response = send(
        &state,
        json_request(
            "POST",
            "/api/bookmarks",
            json!({ "url": "https://x.example", "categoryId": "nope", "title": "X" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid category selection");
}

#[tokio::test]
async fn test_category_with_bookmarks_cannot_be_deleted() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;
    let articles = category_id(&state, "articles").await;

    let response = send(
        &state,
        json_request(
            "POST",
            "/api/bookmarks",
            json!({ "url": "https://blog.example/post", "categoryId": articles, "title": "Post" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&state, empty_request("DELETE", &format!("/api/categories/{articles}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// =============================================================================
// Markdown posts
// =============================================================================

#[tokio::test]
async fn test_markdown_post_submission_and_search() {
    let state = test_state(None).await;

    let response = send(
        &state,
        form_request(
            "/api/markdown-posts",
            &[
                ("title", "Prompt Pack"),
                ("description", "Useful prompts"),
                ("content", "# Heading\n\nAsk the **model** nicely."),
                ("sidebarOption", "md"),
            ],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_str().unwrap().to_string();

    let post = body_json(send(&state, get(&format!("/api/markdown-posts/{id}"), None)).await).await;
    assert_eq!(post["data"]["title"], "Prompt Pack");
    let html = post["data"]["html"].as_str().unwrap();
    assert!(html.contains("<h1>Heading</h1>"));
    assert!(html.contains("<strong>model</strong>"));

    let found = body_json(send(&state, get("/api/markdown-posts?q=NICELY", None)).await).await;
    assert_eq!(found["data"].as_array().unwrap().len(), 1);

    let missing = body_json(send(&state, get("/api/markdown-posts?q=absent", None)).await).await;
    assert!(missing["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_markdown_post_requires_fields() {
    let state = test_state(None).await;

    let response = send(
        &state,
        form_request("/api/markdown-posts", &[("title", "Only a title"), ("content", "   ")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "All fields are required");
}

#[tokio::test]
async fn test_missing_markdown_post_is_not_found() {
    let state = test_state(None).await;

    let response = send(&state, get("/api/markdown-posts/missing", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Post not found");
}

// =============================================================================
// Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_without_image_host_is_unavailable() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let response = send(
        &state,
        multipart_request("/api/uploads", "file", "icon.png", b"\x89PNG fake", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["error"], "Image hosting is not configured");
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let host = Arc::new(RecordingHost::default());
    let state = test_state(Some(host.clone() as Arc<dyn ImageHost>)).await;
    let cookie = admin_cookie(&state).await;

    let response = send(
        &state,
        multipart_request("/api/uploads", "other", "icon.png", b"data", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file provided");
    assert!(host.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_forwards_to_image_host() {
    let host = Arc::new(RecordingHost::default());
    let state = test_state(Some(host.clone() as Arc<dyn ImageHost>)).await;
    let cookie = admin_cookie(&state).await;

    let response = send(
        &state,
        multipart_request("/api/uploads", "file", "icon.png", b"\x89PNG fake", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["data"]["url"],
        format!("https://images.test/{UPLOAD_FOLDER}/icon.png")
    );

    let uploads = host.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0], ("icon.png".to_string(), 9, UPLOAD_FOLDER.to_string()));
}

// =============================================================================
// Metadata
// =============================================================================

#[tokio::test]
async fn test_metadata_rejects_invalid_url() {
    let state = test_state(None).await;
    let cookie = admin_cookie(&state).await;

    let response = send(
        &state,
        json_request("POST", "/api/metadata", json!({ "url": "ftp://files.example" }), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

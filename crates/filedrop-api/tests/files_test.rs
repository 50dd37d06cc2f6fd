//! Upload, listing, and download integration tests.
//!
//! Run with: `cargo test -p filedrop-api --test files_test`

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use helpers::{add_file, form_with_file, setup_test_app, setup_test_app_with};
use serde_json::Value;

#[tokio::test]
async fn upload_stores_file_under_timestamped_name() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/upload")
        .multipart(form_with_file("My Report.PDF", b"not really a pdf"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["files"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["files"][0]["originalName"], "My Report.PDF");
    assert_eq!(body["files"][0]["size"], 16);
    assert!(body["message"].as_str().unwrap().contains("1 file(s)"));

    // On disk: <epoch-millis>_My_Report.PDF
    let stored = app.stored_names();
    assert_eq!(stored.len(), 1);
    let (prefix, rest) = stored[0].split_once('_').expect("timestamp prefix");
    assert!(!prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(rest, "My_Report.PDF");
}

#[tokio::test]
async fn listing_is_sorted_newest_first() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/upload")
        .multipart(form_with_file("first.txt", b"a"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(30)).await;

    let response = app
        .server
        .post("/upload")
        .multipart(form_with_file("second.txt", b"bb"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.server.get("/files").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let listing: Value = response.json();
    let entries = listing.as_array().expect("array body");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "second.txt");
    assert_eq!(entries[1]["name"], "first.txt");
    assert_eq!(entries[0]["size"], 2);
}

#[tokio::test]
async fn download_round_trips_content_and_headers() {
    let app = setup_test_app().await;

    app.server
        .post("/upload")
        .multipart(form_with_file("My Report.PDF", b"pdf bytes here"))
        .await;

    // URL-encoded display name with the original space resolves to the
    // sanitized stored form.
    let response = app.server.get("/download/My%20Report.PDF").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"My_Report.PDF\""
    );
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=86400"
    );
    // Documents do not advertise range support.
    assert!(response.headers().get("accept-ranges").is_none());
    assert_eq!(response.as_bytes().as_ref(), b"pdf bytes here");
}

#[tokio::test]
async fn media_files_are_served_inline_with_range_support() {
    let app = setup_test_app().await;

    app.server
        .post("/upload")
        .multipart(form_with_file("clip.mp4", b"fake video data"))
        .await;

    let response = app.server.get("/download/clip.mp4").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "video/mp4");
    assert_eq!(response.headers().get("accept-ranges").unwrap(), "bytes");
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "inline; filename=\"clip.mp4\""
    );
}

#[tokio::test]
async fn download_unknown_name_is_404() {
    let app = setup_test_app().await;

    let response = app.server.get("/download/nope.txt").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn duplicate_display_names_download_the_newest() {
    let app = setup_test_app().await;

    app.server
        .post("/upload")
        .multipart(form_with_file("dup.txt", b"old contents"))
        .await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    app.server
        .post("/upload")
        .multipart(form_with_file("dup.txt", b"new contents"))
        .await;

    assert_eq!(app.stored_names().len(), 2);

    let response = app.server.get("/download/dup.txt").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.as_bytes().as_ref(), b"new contents");
}

#[tokio::test]
async fn blocked_extension_is_rejected_and_nothing_is_written() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/upload")
        .multipart(form_with_file("virus.exe", b"MZ..."))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "File type not allowed");
    assert!(app.stored_names().is_empty());
}

#[tokio::test]
async fn mixed_upload_accepts_good_parts_and_reports_rejections() {
    let app = setup_test_app().await;

    let form = add_file(form_with_file("notes.txt", b"fine"), "script.bat", b"@echo off");
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["files"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["files"][0]["originalName"], "notes.txt");
    assert_eq!(body["rejected"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["rejected"][0]["name"], "script.bat");
    assert_eq!(body["rejected"][0]["reason"], "File type not allowed");

    assert_eq!(app.stored_names().len(), 1);
}

#[tokio::test]
async fn upload_without_files_is_400() {
    let app = setup_test_app().await;

    let form = axum_test::multipart::MultipartForm::new().add_text("note", "no file here");
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No files uploaded");
}

#[tokio::test]
async fn exceeding_file_count_fails_request_and_cleans_up() {
    let app = setup_test_app_with(|config| config.max_files_per_upload = 2).await;

    let form = add_file(
        add_file(form_with_file("a.txt", b"a"), "b.txt", b"b"),
        "c.txt",
        b"c",
    );
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Too many files"));
    assert!(app.stored_names().is_empty());
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = setup_test_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

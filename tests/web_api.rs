#![cfg(feature = "web")]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use docsort::web::{create_router, ApplyRequest, PlanRequest, UndoRequest};
use docsort::PlanEntry;
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::util::ServiceExt; // for oneshot

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_web_static_index() {
    let app = create_router();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8_lossy(&body);
    assert!(body_str.contains("<title>docsort</title>"));
}

#[tokio::test]
async fn test_web_unknown_asset_is_404() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/missing.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_web_settings() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let settings: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(settings["audit_log"], "metadata.json");
    let categories = settings["categories"].as_array().unwrap();
    assert!(categories.iter().any(|c| c == "other"));
    assert!(settings["workers"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_web_plan_empty_directory() {
    let temp = tempdir().unwrap();
    let app = create_router();

    let payload = PlanRequest {
        directory: temp.path().to_str().unwrap().to_string(),
        ..Default::default()
    };
    let response = app
        .oneshot(post_json(
            "/api/plan",
            serde_json::to_string(&payload).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let result: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(result["num_files"], 0);
    assert_eq!(result["plan"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_web_plan_invalid_directory_is_bad_request() {
    let temp = tempdir().unwrap();
    let app = create_router();

    let payload = PlanRequest {
        directory: temp
            .path()
            .join("does_not_exist")
            .to_str()
            .unwrap()
            .to_string(),
        ..Default::default()
    };
    let response = app
        .oneshot(post_json(
            "/api/plan",
            serde_json::to_string(&payload).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).contains("Directory not found"));
}

#[tokio::test]
async fn test_web_undo_without_log_is_not_found() {
    let temp = tempdir().unwrap();
    let app = create_router();

    let payload = UndoRequest {
        directory: temp.path().to_str().unwrap().to_string(),
        audit_log: None,
    };
    let response = app
        .oneshot(post_json(
            "/api/undo",
            serde_json::to_string(&payload).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_web_apply_rejects_plan_outside_directory() {
    let temp = tempdir().unwrap();
    let dir = temp.path().canonicalize().unwrap();
    fs::write(dir.join("note.txt"), "hello").unwrap();

    // A hand-crafted entry whose target escapes the directory.
    let entry: PlanEntry = serde_json::from_value(serde_json::json!({
        "old_path": dir.join("note.txt"),
        "old_name": "note.txt",
        "extension": ".txt",
        "suggested_basename": "note",
        "suggested_new_name": "note.txt",
        "suggested_new_path": dir.join("..").join("note.txt"),
        "category": "other",
        "confidence": 0.5,
    }))
    .unwrap();

    let payload = ApplyRequest {
        options: PlanRequest {
            directory: dir.to_str().unwrap().to_string(),
            ..Default::default()
        },
        plan: Some(vec![entry]),
        audit_log: None,
    };
    let app = create_router();
    let response = app
        .oneshot(post_json(
            "/api/apply",
            serde_json::to_string(&payload).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(dir.join("note.txt").is_file());
    assert!(!dir.join("metadata.json").exists());
}

#[tokio::test]
async fn test_web_apply_then_undo_with_client_plan() {
    let temp = tempdir().unwrap();
    let dir = temp.path().canonicalize().unwrap();
    fs::write(dir.join("note.txt"), "hello").unwrap();

    let entry: PlanEntry = serde_json::from_value(serde_json::json!({
        "old_path": dir.join("note.txt"),
        "old_name": "note.txt",
        "extension": ".txt",
        "suggested_basename": "greeting",
        "suggested_new_name": "greeting.txt",
        "suggested_new_path": dir.join("personal").join("greeting.txt"),
        "category": "personal",
        "confidence": 0.7,
    }))
    .unwrap();

    let payload = ApplyRequest {
        options: PlanRequest {
            directory: dir.to_str().unwrap().to_string(),
            ..Default::default()
        },
        plan: Some(vec![entry]),
        audit_log: None,
    };
    let response = create_router()
        .oneshot(post_json(
            "/api/apply",
            serde_json::to_string(&payload).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["entries"][0]["final_new_name"], "greeting.txt");
    assert!(dir.join("personal/greeting.txt").is_file());

    let undo = UndoRequest {
        directory: dir.to_str().unwrap().to_string(),
        audit_log: None,
    };
    let response = create_router()
        .oneshot(post_json("/api/undo", serde_json::to_string(&undo).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["filesRestored"], 1);
    assert!(dir.join("note.txt").is_file());
}

#[tokio::test]
async fn test_web_apply_refuses_to_overwrite_foreign_log() {
    let temp = tempdir().unwrap();
    let dir = temp.path().canonicalize().unwrap();
    fs::write(dir.join("note.txt"), "hello").unwrap();
    fs::write(dir.join("journal"), "my precious notes").unwrap();

    let entry: PlanEntry = serde_json::from_value(serde_json::json!({
        "old_path": dir.join("note.txt"),
        "old_name": "note.txt",
        "extension": ".txt",
        "suggested_basename": "greeting",
        "suggested_new_name": "greeting.txt",
        "suggested_new_path": dir.join("personal").join("greeting.txt"),
        "category": "personal",
        "confidence": 0.7,
    }))
    .unwrap();

    let payload = ApplyRequest {
        options: PlanRequest {
            directory: dir.to_str().unwrap().to_string(),
            ..Default::default()
        },
        plan: Some(vec![entry]),
        audit_log: Some("journal".to_string()),
    };
    let response = create_router()
        .oneshot(post_json(
            "/api/apply",
            serde_json::to_string(&payload).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        fs::read_to_string(dir.join("journal")).unwrap(),
        "my precious notes"
    );
    assert!(dir.join("note.txt").is_file());
}

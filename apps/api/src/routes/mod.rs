pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Headroom for multipart framing and the optional text fields.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/cv/process", post(handlers::handle_process))
        .route("/api/v1/cv/upload", post(handlers::handle_upload))
        .route("/api/v1/cv/summary", post(handlers::handle_summary))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + BODY_LIMIT_SLACK))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::generation::{ImprovementGenerator, OfflineGenerationService};
    use crate::loader::DocumentLoader;
    use crate::pipeline::Pipeline;

    const CV: &str = "SUMMARY\nDev.\nEXPERIENCE\nBuilt things.\nSKILLS\nPython";
    const BOUNDARY: &str = "cvpipelinetestboundary";

    fn app() -> Router {
        let pipeline = Pipeline::new(
            DocumentLoader::new(None),
            ImprovementGenerator::new(Arc::new(OfflineGenerationService), Duration::from_secs(30)),
        );
        build_router(AppState { pipeline })
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(file_name: &str, contents: &str, role: Option<&str>) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"cv_file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{contents}\r\n"
        );
        if let Some(role) = role {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"target_role\"\r\n\r\n{role}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/v1/cv/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cv-pipeline");
    }

    #[tokio::test]
    async fn test_process_returns_record() {
        let response = app()
            .oneshot(json_request("/api/v1/cv/process", json!({ "cv_text": CV })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["complete"], true);
        assert_eq!(body["source_format"], "txt");
        assert_eq!(body["final_quality_score"], 0.7);
        assert_eq!(body["sections"].as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_process_rejects_empty_text() {
        let response = app()
            .oneshot(json_request("/api/v1/cv/process", json!({ "cv_text": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_summary_endpoint() {
        let response = app()
            .oneshot(json_request(
                "/api/v1/cv/summary",
                json!({ "cv_text": CV, "target_industry": "technology" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let summary = body["summary"].as_str().unwrap();
        assert!(summary.starts_with("Overall CV Score:"));
        assert!(summary.contains("improvement areas"));
    }

    #[tokio::test]
    async fn test_upload_text_file() {
        let response = app()
            .oneshot(multipart_request("resume.txt", CV, Some("data scientist")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["source_format"], "txt");
        assert_eq!(body["target_role"], "data scientist");
        assert!(body["source_input"].as_str().unwrap().ends_with(".txt"));
        assert_eq!(body["sections"].as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_extension() {
        let response = app()
            .oneshot(multipart_request("resume.exe", CV, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

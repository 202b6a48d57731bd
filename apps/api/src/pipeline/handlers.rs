//! Axum route handlers for the CV pipeline.

use std::path::Path;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::loader::CvInput;
use crate::models::ProcessingRecord;
use crate::pipeline::{improvement_summary, ProcessRequest};
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProcessCvRequest {
    pub cv_text: String,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub target_industry: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

impl ProcessCvRequest {
    /// The text is always treated as résumé content, never as a path.
    fn into_process_request(self) -> Result<ProcessRequest, AppError> {
        if self.cv_text.trim().is_empty() {
            return Err(AppError::Validation("cv_text cannot be empty".to_string()));
        }
        Ok(ProcessRequest {
            input: CvInput::Text(self.cv_text),
            target_role: non_blank(self.target_role),
            target_industry: non_blank(self.target_industry),
            job_description: non_blank(self.job_description),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/process
pub async fn handle_process(
    State(state): State<AppState>,
    Json(request): Json<ProcessCvRequest>,
) -> Result<Json<ProcessingRecord>, AppError> {
    let request = request.into_process_request()?;
    Ok(Json(state.pipeline.process_request(request).await))
}

/// POST /api/v1/cv/summary
///
/// Same input as `/process`; returns only the human-readable report.
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(request): Json<ProcessCvRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let request = request.into_process_request()?;
    let record = state.pipeline.process_request(request).await;
    Ok(Json(SummaryResponse {
        summary: improvement_summary(&record),
    }))
}

/// POST /api/v1/cv/upload
///
/// Multipart body: `cv_file` plus optional `target_role`, `target_industry`
/// and `job_description` text fields. The file is written to a temp file that
/// keeps its extension and lives until the pipeline finishes.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessingRecord>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut target_role = None;
    let mut target_industry = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::PayloadTooLarge(format!(
                        "cv_file exceeds {} MB",
                        MAX_UPLOAD_BYTES / (1024 * 1024)
                    )));
                }
                upload = Some((file_name, bytes.to_vec()));
            }
            "target_role" => target_role = non_blank(Some(field.text().await?)),
            "target_industry" => target_industry = non_blank(Some(field.text().await?)),
            "job_description" => job_description = non_blank(Some(field.text().await?)),
            _ => {}
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("cv_file is required".to_string()))?;
    let extension = upload_extension(&file_name)?;

    let file = tempfile::Builder::new()
        .prefix("cv-upload-")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .context("failed to create upload temp file")?;
    tokio::fs::write(file.path(), &bytes)
        .await
        .context("failed to persist uploaded CV")?;

    info!(file_name = %file_name, bytes = bytes.len(), "CV uploaded");

    let record = state
        .pipeline
        .process_request(ProcessRequest {
            input: CvInput::Path(file.path().to_path_buf()),
            target_role,
            target_industry,
            job_description,
        })
        .await;

    Ok(Json(record))
}

fn upload_extension(file_name: &str) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AppError::Validation(format!(
            "Unsupported file type '{file_name}'; expected one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_extension_is_case_insensitive() {
        assert_eq!(upload_extension("Resume.PDF").unwrap(), "pdf");
        assert_eq!(upload_extension("cv.docx").unwrap(), "docx");
    }

    #[test]
    fn test_upload_extension_rejects_others() {
        assert!(matches!(upload_extension("cv.exe"), Err(AppError::Validation(_))));
        assert!(matches!(upload_extension("cv"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_blank_cv_text_is_rejected() {
        let request = ProcessCvRequest {
            cv_text: "   ".to_string(),
            target_role: None,
            target_industry: None,
            job_description: None,
        };
        assert!(matches!(
            request.into_process_request(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_text_that_looks_like_a_path_stays_text() {
        let request = ProcessCvRequest {
            cv_text: "/etc/passwd".to_string(),
            target_role: Some(" ".to_string()),
            target_industry: Some("technology".to_string()),
            job_description: None,
        };
        let request = request.into_process_request().unwrap();
        assert_eq!(request.input, CvInput::Text("/etc/passwd".to_string()));
        assert_eq!(request.target_role, None);
        assert_eq!(request.target_industry.as_deref(), Some("technology"));
    }
}

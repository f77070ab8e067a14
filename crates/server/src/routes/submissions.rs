//! Feature submission routes. Each one appends a record tied to a `featureId`.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json as ResponseJson,
    routing::post,
};
use db::models::{
    form_submission::{CreateFormSubmission, FormSubmission},
    reminder::{CreateReminder, Reminder},
    upload::Upload,
};
use deployment::Deployment;
use services::services::submission::IncomingFile;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

/// POST /api/reminders
pub async fn create_reminder(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateReminder>,
) -> Result<ResponseJson<ApiResponse<Reminder>>, ApiError> {
    let reminder = deployment.submissions().create_reminder(payload).await?;
    Ok(ResponseJson(ApiResponse::success(reminder)))
}

/// POST /api/forms
pub async fn create_form_submission(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateFormSubmission>,
) -> Result<ResponseJson<ApiResponse<FormSubmission>>, ApiError> {
    let submission = deployment
        .submissions()
        .create_form_submission(payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(submission)))
}

/// POST /api/uploads
/// Multipart body with a `featureId` text field and a `file` field
pub async fn create_upload(
    State(deployment): State<DeploymentImpl>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Upload>>, ApiError> {
    let mut feature_id = String::new();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("featureId") | Some("feature_id") => {
                feature_id = field.text().await?;
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                file = Some(IncomingFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let upload = deployment
        .submissions()
        .create_upload(&feature_id, file)
        .await?;
    Ok(ResponseJson(ApiResponse::success(upload)))
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new()
        .route("/reminders", post(create_reminder))
        .route("/forms", post(create_form_submission))
        .route(
            "/uploads",
            post(create_upload).layer(DefaultBodyLimit::max(deployment.config().max_upload_bytes)),
        )
}

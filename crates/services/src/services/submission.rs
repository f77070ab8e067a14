//! Append-only user submissions (reminders, uploads, form entries) keyed by a
//! catalog feature id. The feature id is the only required field and it is not
//! checked against the catalog.

use std::path::{Path, PathBuf};

use db::models::{
    form_submission::{CreateFormSubmission, FormSubmission},
    reminder::{CreateReminder, Reminder},
    upload::{CreateUpload, Upload},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("featureId is required")]
    MissingFeatureId,
    #[error("a file is required")]
    MissingFile,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received from a client, before it is stored
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Everything submitted against one feature, newest first
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSubmissions {
    pub feature_id: String,
    pub reminders: Vec<Reminder>,
    pub uploads: Vec<Upload>,
    pub forms: Vec<FormSubmission>,
}

pub struct SubmissionService {
    pool: SqlitePool,
    upload_dir: PathBuf,
}

impl SubmissionService {
    pub fn new(pool: SqlitePool, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            upload_dir: upload_dir.into(),
        }
    }

    pub async fn create_reminder(&self, data: CreateReminder) -> Result<Reminder, SubmissionError> {
        require_feature_id(&data.feature_id)?;
        let reminder = Reminder::create(&self.pool, Uuid::new_v4(), &data).await?;
        info!(reminder_id = %reminder.id, feature_id = %reminder.feature_id, "Created reminder");
        Ok(reminder)
    }

    pub async fn create_form_submission(
        &self,
        data: CreateFormSubmission,
    ) -> Result<FormSubmission, SubmissionError> {
        require_feature_id(&data.feature_id)?;
        let submission = FormSubmission::create(&self.pool, Uuid::new_v4(), &data).await?;
        info!(
            submission_id = %submission.id,
            feature_id = %submission.feature_id,
            "Created form submission"
        );
        Ok(submission)
    }

    /// Write the file under the upload directory and record its metadata
    pub async fn create_upload(
        &self,
        feature_id: &str,
        file: Option<IncomingFile>,
    ) -> Result<Upload, SubmissionError> {
        require_feature_id(feature_id)?;
        let file = file.ok_or(SubmissionError::MissingFile)?;

        let id = Uuid::new_v4();
        let original_name = file
            .file_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("upload")
            .to_string();
        let stored_path = self
            .upload_dir
            .join(format!("{id}-{}", sanitize_file_name(&original_name)));

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(&stored_path, &file.bytes).await?;

        let data = CreateUpload {
            feature_id: feature_id.to_string(),
            original_name,
            content_type: file.content_type,
            size_bytes: file.bytes.len() as i64,
            sha256: hex::encode(Sha256::digest(&file.bytes)),
            stored_path: stored_path.to_string_lossy().into_owned(),
        };

        let upload = match Upload::create(&self.pool, id, &data).await {
            Ok(upload) => upload,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&stored_path).await {
                    warn!(
                        path = %stored_path.display(),
                        error = %cleanup,
                        "Failed to remove upload after its record could not be saved"
                    );
                }
                return Err(e.into());
            }
        };

        info!(
            upload_id = %upload.id,
            feature_id = %upload.feature_id,
            size_bytes = upload.size_bytes,
            "Stored upload"
        );
        Ok(upload)
    }

    pub async fn list_for_feature(
        &self,
        feature_id: &str,
    ) -> Result<FeatureSubmissions, SubmissionError> {
        require_feature_id(feature_id)?;
        let feature_id = feature_id.trim();
        Ok(FeatureSubmissions {
            feature_id: feature_id.to_string(),
            reminders: Reminder::find_by_feature_id(&self.pool, feature_id).await?,
            uploads: Upload::find_by_feature_id(&self.pool, feature_id).await?,
            forms: FormSubmission::find_by_feature_id(&self.pool, feature_id).await?,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}

fn require_feature_id(feature_id: &str) -> Result<(), SubmissionError> {
    if feature_id.trim().is_empty() {
        return Err(SubmissionError::MissingFeatureId);
    }
    Ok(())
}

/// Keep letters (any script), digits, `.`, `-` and `_`; replace the rest.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    async fn service(dir: &TempDir) -> SubmissionService {
        let db = DBService::new_in_memory().await.unwrap();
        SubmissionService::new(db.pool, dir.path().join("uploads"))
    }

    #[tokio::test]
    async fn test_blank_feature_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;

        let reminder = CreateReminder {
            feature_id: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            service.create_reminder(reminder).await,
            Err(SubmissionError::MissingFeatureId)
        ));

        let form = CreateFormSubmission {
            feature_id: String::new(),
            fields: json!({}),
        };
        assert!(matches!(
            service.create_form_submission(form).await,
            Err(SubmissionError::MissingFeatureId)
        ));
    }

    #[tokio::test]
    async fn test_upload_is_written_and_recorded() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;
        let file = IncomingFile {
            file_name: Some("../תעודת זהות.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.7 test".to_vec(),
        };

        let upload = service.create_upload("id-card", Some(file)).await.unwrap();

        assert_eq!(upload.original_name, "../תעודת זהות.pdf");
        assert_eq!(upload.size_bytes, 13);
        assert_eq!(upload.sha256.len(), 64);
        let stored = PathBuf::from(&upload.stored_path);
        assert!(stored.starts_with(service.upload_dir()));
        assert!(stored.to_string_lossy().ends_with("תעודת_זהות.pdf"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"%PDF-1.7 test");
    }

    #[tokio::test]
    async fn test_failed_upload_insert_removes_stored_file() {
        let dir = TempDir::new().unwrap();
        let db = DBService::new_in_memory().await.unwrap();
        sqlx::query("DROP TABLE uploads")
            .execute(&db.pool)
            .await
            .unwrap();
        let service = SubmissionService::new(db.pool, dir.path().join("uploads"));
        let file = IncomingFile {
            file_name: Some("lease.pdf".to_string()),
            content_type: None,
            bytes: b"contract".to_vec(),
        };

        let result = service.create_upload("lease", Some(file)).await;

        assert!(matches!(result, Err(SubmissionError::Database(_))));
        let leftovers = std::fs::read_dir(service.upload_dir()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;
        assert!(matches!(
            service.create_upload("id-card", None).await,
            Err(SubmissionError::MissingFile)
        ));
    }

    #[tokio::test]
    async fn test_list_for_feature_collects_every_kind() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;

        service
            .create_reminder(CreateReminder {
                feature_id: "car-test".to_string(),
                title: Some("טסט שנתי".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        service
            .create_form_submission(CreateFormSubmission {
                feature_id: "car-test".to_string(),
                fields: json!({ "garage": "מוסך השרון" }),
            })
            .await
            .unwrap();
        service
            .create_reminder(CreateReminder {
                feature_id: "other".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let listing = service.list_for_feature(" car-test ").await.unwrap();
        assert_eq!(listing.feature_id, "car-test");
        assert_eq!(listing.reminders.len(), 1);
        assert_eq!(listing.forms.len(), 1);
        assert!(listing.uploads.is_empty());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report 2026.pdf"), "report_2026.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("..."), "upload");
        assert_eq!(sanitize_file_name("חשבונית.png"), "חשבונית.png");
    }
}

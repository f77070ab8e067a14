use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Metadata for a file uploaded against a catalog feature. The bytes live on disk
/// at `stored_path`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: Uuid,
    pub feature_id: String,
    pub original_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub sha256: String,
    pub stored_path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUpload {
    pub feature_id: String,
    pub original_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub sha256: String,
    pub stored_path: String,
}

impl Upload {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateUpload,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Upload>(
            r#"
            INSERT INTO uploads
                (id, feature_id, original_name, content_type, size_bytes, sha256, stored_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id, feature_id, original_name, content_type, size_bytes, sha256, stored_path, created_at
            "#,
        )
        .bind(id)
        .bind(data.feature_id.trim())
        .bind(&data.original_name)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .bind(&data.sha256)
        .bind(&data.stored_path)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_feature_id(
        pool: &SqlitePool,
        feature_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Upload>(
            r#"
            SELECT id, feature_id, original_name, content_type, size_bytes, sha256, stored_path, created_at
            FROM uploads
            WHERE feature_id = $1
            ORDER BY rowid DESC
            "#,
        )
        .bind(feature_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    #[tokio::test]
    async fn test_create_and_find_upload() {
        let db = DBService::new_in_memory().await.unwrap();
        let data = CreateUpload {
            feature_id: "insurance-policy".to_string(),
            original_name: "פוליסה.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            size_bytes: 1024,
            sha256: "ab".repeat(32),
            stored_path: "uploads/x-policy.pdf".to_string(),
        };

        let created = Upload::create(&db.pool, Uuid::new_v4(), &data).await.unwrap();
        assert_eq!(created.original_name, "פוליסה.pdf");
        assert_eq!(created.size_bytes, 1024);

        let found = Upload::find_by_feature_id(&db.pool, "insurance-policy")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
        assert!(
            Upload::find_by_feature_id(&db.pool, "missing")
                .await
                .unwrap()
                .is_empty()
        );
    }
}

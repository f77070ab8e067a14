use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

/// Free-form field values a user submitted through a `form` feature
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub id: Uuid,
    pub feature_id: String,
    #[sqlx(json)]
    pub fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormSubmission {
    #[serde(default)]
    pub feature_id: String,
    #[serde(default = "empty_object")]
    pub fields: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl FormSubmission {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateFormSubmission,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FormSubmission>(
            r#"
            INSERT INTO form_submissions (id, feature_id, fields, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, feature_id, fields, created_at
            "#,
        )
        .bind(id)
        .bind(data.feature_id.trim())
        .bind(Json(&data.fields))
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_feature_id(
        pool: &SqlitePool,
        feature_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, FormSubmission>(
            r#"
            SELECT id, feature_id, fields, created_at
            FROM form_submissions
            WHERE feature_id = $1
            ORDER BY rowid DESC
            "#,
        )
        .bind(feature_id)
        .fetch_all(pool)
        .await
    }
}

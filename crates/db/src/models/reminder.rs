use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A reminder a user attached to a catalog feature
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub feature_id: String,
    pub title: Option<String>,
    pub remind_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a reminder
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminder {
    #[serde(default)]
    pub feature_id: String,
    pub title: Option<String>,
    pub remind_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Reminder {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateReminder,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (id, feature_id, title, remind_at, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, feature_id, title, remind_at, notes, created_at
            "#,
        )
        .bind(id)
        .bind(data.feature_id.trim())
        .bind(&data.title)
        .bind(data.remind_at)
        .bind(&data.notes)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_feature_id(
        pool: &SqlitePool,
        feature_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"
            SELECT id, feature_id, title, remind_at, notes, created_at
            FROM reminders
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
    use chrono::TimeZone;

    use super::*;
    use crate::DBService;

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let db = DBService::new_in_memory().await.unwrap();
        let remind_at = Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap();
        let data = CreateReminder {
            feature_id: "  renew-license ".to_string(),
            title: Some("חידוש רישיון".to_string()),
            remind_at: Some(remind_at),
            notes: None,
        };

        let id = Uuid::new_v4();
        let reminder = Reminder::create(&db.pool, id, &data).await.unwrap();

        assert_eq!(reminder.id, id);
        assert_eq!(reminder.feature_id, "renew-license");
        assert_eq!(reminder.remind_at, Some(remind_at));
        assert!(reminder.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_find_by_feature_id_is_newest_first() {
        let db = DBService::new_in_memory().await.unwrap();
        let first = CreateReminder {
            feature_id: "f1".to_string(),
            title: Some("first".to_string()),
            ..Default::default()
        };
        let second = CreateReminder {
            feature_id: "f1".to_string(),
            title: Some("second".to_string()),
            ..Default::default()
        };
        let other = CreateReminder {
            feature_id: "f2".to_string(),
            ..Default::default()
        };
        Reminder::create(&db.pool, Uuid::new_v4(), &first).await.unwrap();
        Reminder::create(&db.pool, Uuid::new_v4(), &second).await.unwrap();
        Reminder::create(&db.pool, Uuid::new_v4(), &other).await.unwrap();

        let found = Reminder::find_by_feature_id(&db.pool, "f1").await.unwrap();
        let titles: Vec<_> = found.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }
}

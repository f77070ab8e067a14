//! Built-in categories served when no catalog file could be loaded.

use super::model::{Category, Feature, FeatureKind, Subcategory};

const FALLBACK: [(&str, &str, &str); 6] = [
    ("בריאות", "heart", "מסמכים רפואיים, בדיקות, מרשמים וביטוח בריאות"),
    ("פיננסים", "wallet", "חשבונות בנק, השקעות, הלוואות ודוחות מס"),
    ("רכב", "car", "רישיון רכב, ביטוח, טיפולים ותחזוקה"),
    ("דיור", "home", "חוזי שכירות, משכנתא, ארנונה וחשבונות בית"),
    ("ביטוחים", "shield", "פוליסות ביטוח, חידושים ותביעות"),
    ("משפחה", "users", "תעודות, מסמכי ילדים ואירועים משפחתיים"),
];

pub fn fallback_categories() -> Vec<Category> {
    FALLBACK
        .iter()
        .enumerate()
        .map(|(index, (name, icon, description))| Category {
            id: index as i64 + 1,
            name: (*name).to_string(),
            icon: (*icon).to_string(),
            description: (*description).to_string(),
            smart_features: None,
            includes: None,
            subcategories: vec![Subcategory {
                id: "1".to_string(),
                name: "מסמכים כלליים".to_string(),
                features: vec![
                    Feature {
                        id: "1".to_string(),
                        kind: FeatureKind::Upload,
                        label: FeatureKind::Upload.default_label().to_string(),
                        url: None,
                    },
                    Feature {
                        id: "2".to_string(),
                        kind: FeatureKind::Reminder,
                        label: FeatureKind::Reminder.default_label().to_string(),
                        url: None,
                    },
                ],
            }],
        })
        .collect()
}

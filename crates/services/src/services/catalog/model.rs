use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

/// What a feature does when the user activates it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureKind {
    Upload,
    Reminder,
    ExternalLink,
    Form,
}

impl FeatureKind {
    /// Label used when the source data leaves one out
    pub fn default_label(self) -> &'static str {
        match self {
            FeatureKind::Upload => "העלאת מסמך",
            FeatureKind::Reminder => "הגדרת תזכורת",
            FeatureKind::ExternalLink => "קישור חיצוני",
            FeatureKind::Form => "מילוי טופס",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub features: Vec<Feature>,
}

impl Subcategory {
    pub fn feature(&self, feature_id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == feature_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_features: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<String>,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn subcategory(&self, subcategory_id: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == subcategory_id)
    }

    /// Case-insensitive substring match on name and description.
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_feature_kind_wire_names() {
        assert_eq!(FeatureKind::ExternalLink.to_string(), "external_link");
        assert_eq!(FeatureKind::from_str("form").unwrap(), FeatureKind::Form);
        assert!(FeatureKind::from_str("video").is_err());

        let json = serde_json::to_string(&FeatureKind::ExternalLink).unwrap();
        assert_eq!(json, r#""external_link""#);
    }

    #[test]
    fn test_feature_serializes_type_field_and_omits_missing_url() {
        let feature = Feature {
            id: "1".to_string(),
            kind: FeatureKind::Upload,
            label: "העלאת מסמך".to_string(),
            url: None,
        };
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["type"], "upload");
        assert!(json.get("url").is_none());
    }
}

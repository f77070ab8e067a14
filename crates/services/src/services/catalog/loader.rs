//! Startup loading of the category catalog.
//!
//! Candidate files are tried in order and the first one that parses to a
//! non-empty category list wins. Source data is duck-typed, so every entry is
//! parsed on its own and normalized into the strict model types here, once.
//! If nothing usable is found the built-in fallback set is served instead.

use std::{
    collections::HashSet,
    fs,
    hash::Hash,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    Catalog, CatalogSource,
    fallback::fallback_categories,
    model::{Category, Feature, FeatureKind, Subcategory},
};

pub const DEFAULT_ICON: &str = "folder";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a list of categories or an object with a `categories` list")]
    UnsupportedShape,
    #[error("no usable categories")]
    Empty,
}

pub struct CatalogLoader {
    candidates: Vec<PathBuf>,
}

impl CatalogLoader {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Load the catalog. Never fails: falls back to the built-in categories.
    pub fn load(&self) -> Catalog {
        for path in &self.candidates {
            if !path.exists() {
                debug!(path = %path.display(), "Catalog candidate does not exist, skipping");
                continue;
            }
            match load_file(path) {
                Ok(categories) => {
                    info!(
                        path = %path.display(),
                        categories = categories.len(),
                        "Loaded category catalog"
                    );
                    return Catalog::new(categories, CatalogSource::File(path.clone()));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load catalog candidate");
                }
            }
        }

        warn!(
            candidates = self.candidates.len(),
            "No catalog source could be loaded, serving built-in fallback categories"
        );
        Catalog::new(fallback_categories(), CatalogSource::Fallback)
    }
}

pub fn load_file(path: &Path) -> Result<Vec<Category>, LoadError> {
    let raw = fs::read_to_string(path)?;
    parse_catalog(&raw)
}

/// Parse and normalize catalog JSON. Accepts `{"categories": [...]}` or a bare list.
pub fn parse_catalog(raw: &str) -> Result<Vec<Category>, LoadError> {
    let document: Value = serde_json::from_str(raw)?;
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("categories") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(LoadError::UnsupportedShape),
        },
        _ => return Err(LoadError::UnsupportedShape),
    };

    let categories = normalize_categories(entries);
    if categories.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(categories)
}

/// Integer category id from a number (`3`, `3.0`) or a numeric string (`"3"`)
fn int_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String id for subcategories and features. Integral numbers render without a fraction.
fn key_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(_) => int_id(value)
            .map(|n| n.to_string())
            .or_else(|| Some(value.to_string())),
        Value::String(s) => non_blank(s),
        _ => None,
    }
}

/// Hands out ids in load order within one level of the catalog.
///
/// Every usable explicit id is reserved up front, so an entry without one
/// never takes a number that a later entry states explicitly. Explicit ids
/// are first come, first served.
struct IdAllocator<K> {
    reserved: HashSet<K>,
    taken: HashSet<K>,
}

impl<K: Eq + Hash + Clone> IdAllocator<K> {
    fn new(explicit: impl IntoIterator<Item = K>) -> Self {
        Self {
            reserved: explicit.into_iter().collect(),
            taken: HashSet::new(),
        }
    }

    /// False when an earlier entry already claimed `id`
    fn claim(&mut self, id: K) -> bool {
        self.taken.insert(id)
    }

    /// The entry's 1-based position, or the next free number after it
    fn positional(&mut self, position: usize, to_key: impl Fn(usize) -> K) -> K {
        let mut n = position;
        loop {
            let key = to_key(n);
            if !self.reserved.contains(&key) && self.taken.insert(key.clone()) {
                return key;
            }
            n += 1;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawText {
    One(String),
    Many(Vec<String>),
}

impl RawText {
    fn into_text(self) -> Option<String> {
        match self {
            RawText::One(s) => non_blank(&s),
            RawText::Many(items) => {
                let items: Vec<_> = items.iter().filter_map(|s| non_blank(s)).collect();
                (!items.is_empty()).then(|| items.join("\n"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    id: Option<Value>,
    #[serde(alias = "title")]
    name: Option<String>,
    icon: Option<String>,
    description: Option<String>,
    smart_features: Option<RawText>,
    includes: Option<RawText>,
    #[serde(default)]
    subcategories: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSubcategory {
    id: Option<Value>,
    #[serde(alias = "title")]
    name: Option<String>,
    #[serde(default)]
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    id: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(alias = "name", alias = "title")]
    label: Option<String>,
    url: Option<String>,
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn placeholder_description(name: &str) -> String {
    format!("כל המסמכים, התזכורות והמידע בנושא {name} במקום אחד")
}

fn normalize_categories(entries: Vec<Value>) -> Vec<Category> {
    let raws: Vec<(usize, RawCategory)> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(raw) => Some((index, raw)),
            Err(e) => {
                warn!(position = index + 1, error = %e, "Skipping malformed category entry");
                None
            }
        })
        .collect();

    let mut ids = IdAllocator::new(raws.iter().filter_map(|(_, raw)| raw.id.as_ref().and_then(int_id)));
    let mut categories = Vec::with_capacity(raws.len());

    for (index, raw) in raws {
        let id = match raw.id.as_ref().and_then(int_id) {
            Some(id) => {
                if !ids.claim(id) {
                    warn!(category_id = id, "Skipping category with duplicate id");
                    continue;
                }
                id
            }
            None => {
                let id = ids.positional(index + 1, |n| n as i64);
                if raw.id.is_some() || id != index as i64 + 1 {
                    warn!(
                        position = index + 1,
                        raw_id = ?raw.id,
                        category_id = id,
                        "Assigned id to category without a usable one"
                    );
                }
                id
            }
        };

        let name = raw
            .name
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| format!("קטגוריה {id}"));
        let description = raw
            .description
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| placeholder_description(&name));
        let icon = raw
            .icon
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_ICON.to_string());

        categories.push(Category {
            id,
            subcategories: normalize_subcategories(id, raw.subcategories),
            name,
            icon,
            description,
            smart_features: raw.smart_features.and_then(RawText::into_text),
            includes: raw.includes.and_then(RawText::into_text),
        });
    }

    categories
}

fn normalize_subcategories(category_id: i64, entries: Vec<Value>) -> Vec<Subcategory> {
    let raws: Vec<(usize, RawSubcategory)> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(raw) => Some((index, raw)),
            Err(e) => {
                warn!(category_id, position = index + 1, error = %e, "Skipping malformed subcategory");
                None
            }
        })
        .collect();

    let mut ids = IdAllocator::new(raws.iter().filter_map(|(_, raw)| raw.id.as_ref().and_then(key_id)));
    let mut subcategories = Vec::with_capacity(raws.len());

    for (index, raw) in raws {
        let id = match raw.id.as_ref().and_then(key_id) {
            Some(id) => {
                if !ids.claim(id.clone()) {
                    warn!(category_id, subcategory_id = %id, "Skipping subcategory with duplicate id");
                    continue;
                }
                id
            }
            None => {
                let id = ids.positional(index + 1, |n| n.to_string());
                if raw.id.is_some() || id != (index + 1).to_string() {
                    warn!(
                        category_id,
                        position = index + 1,
                        raw_id = ?raw.id,
                        subcategory_id = %id,
                        "Assigned id to subcategory without a usable one"
                    );
                }
                id
            }
        };

        let name = raw
            .name
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| format!("תת-קטגוריה {id}"));

        subcategories.push(Subcategory {
            features: normalize_features(category_id, &id, raw.features),
            id,
            name,
        });
    }

    subcategories
}

fn normalize_features(category_id: i64, subcategory_id: &str, entries: Vec<Value>) -> Vec<Feature> {
    let raws: Vec<(usize, RawFeature, FeatureKind)> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let raw: RawFeature = match serde_json::from_value(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(category_id, subcategory_id, error = %e, "Skipping malformed feature");
                    return None;
                }
            };
            match raw
                .kind
                .as_deref()
                .and_then(|k| FeatureKind::from_str(k.trim()).ok())
            {
                Some(kind) => Some((index, raw, kind)),
                None => {
                    warn!(
                        category_id,
                        subcategory_id,
                        kind = ?raw.kind,
                        "Skipping feature with unknown type"
                    );
                    None
                }
            }
        })
        .collect();

    let mut ids = IdAllocator::new(raws.iter().filter_map(|(_, raw, _)| raw.id.as_ref().and_then(key_id)));
    let mut features = Vec::with_capacity(raws.len());

    for (index, raw, kind) in raws {
        let id = match raw.id.as_ref().and_then(key_id) {
            Some(id) => {
                if !ids.claim(id.clone()) {
                    warn!(category_id, subcategory_id, feature_id = %id, "Skipping feature with duplicate id");
                    continue;
                }
                id
            }
            None => {
                let id = ids.positional(index + 1, |n| n.to_string());
                if raw.id.is_some() || id != (index + 1).to_string() {
                    warn!(
                        category_id,
                        subcategory_id,
                        position = index + 1,
                        raw_id = ?raw.id,
                        feature_id = %id,
                        "Assigned id to feature without a usable one"
                    );
                }
                id
            }
        };

        let url = match kind {
            FeatureKind::ExternalLink => {
                let url = raw.url.as_deref().and_then(non_blank);
                if url.is_none() {
                    warn!(category_id, subcategory_id, feature_id = %id, "External link feature has no url");
                }
                url
            }
            _ => None,
        };

        let label = raw
            .label
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| kind.default_label().to_string());

        features.push(Feature {
            id,
            kind,
            label,
            url,
        });
    }

    features
}

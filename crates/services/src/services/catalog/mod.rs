//! Read-only category catalog: categories → subcategories → features.
//!
//! The catalog is built once at startup by [`loader::CatalogLoader`] and shared
//! behind an `Arc` for the rest of the process. Nothing mutates it afterwards.

use std::{collections::HashMap, fmt, path::PathBuf};

use thiserror::Error;

pub mod fallback;
pub mod loader;
pub mod model;
pub mod pagination;

pub use loader::CatalogLoader;
pub use model::{Category, Feature, FeatureKind, Subcategory};
pub use pagination::{Page, PageRequest, paginate};

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("category not found: {0}")]
    CategoryNotFound(i64),
    #[error("subcategory {subcategory_id} not found in category {category_id}")]
    SubcategoryNotFound {
        category_id: i64,
        subcategory_id: String,
    },
    #[error("feature {feature_id} not found in subcategory {subcategory_id} of category {category_id}")]
    FeatureNotFound {
        category_id: i64,
        subcategory_id: String,
        feature_id: String,
    },
}

/// Where the loaded catalog came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Fallback,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    positions: HashMap<i64, usize>,
    source: CatalogSource,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, source: CatalogSource) -> Self {
        let mut positions = HashMap::with_capacity(categories.len());
        for (index, category) in categories.iter().enumerate() {
            positions.entry(category.id).or_insert(index);
        }
        Self {
            categories,
            positions,
            source,
        }
    }

    pub fn fallback() -> Self {
        Self::new(fallback::fallback_categories(), CatalogSource::Fallback)
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// All categories in load order
    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn paginate(&self, page: usize, page_size: usize) -> Page<&Category> {
        let all: Vec<&Category> = self.categories.iter().collect();
        paginate(&all, page, page_size)
    }

    pub fn get_by_id(&self, id: i64) -> Result<&Category, CatalogError> {
        self.positions
            .get(&id)
            .map(|&index| &self.categories[index])
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub fn subcategory(
        &self,
        category_id: i64,
        subcategory_id: &str,
    ) -> Result<&Subcategory, CatalogError> {
        self.get_by_id(category_id)?
            .subcategory(subcategory_id)
            .ok_or_else(|| CatalogError::SubcategoryNotFound {
                category_id,
                subcategory_id: subcategory_id.to_string(),
            })
    }

    pub fn feature(
        &self,
        category_id: i64,
        subcategory_id: &str,
        feature_id: &str,
    ) -> Result<&Feature, CatalogError> {
        self.subcategory(category_id, subcategory_id)?
            .feature(feature_id)
            .ok_or_else(|| CatalogError::FeatureNotFound {
                category_id,
                subcategory_id: subcategory_id.to_string(),
                feature_id: feature_id.to_string(),
            })
    }

    /// Case-insensitive substring search over name and description, in load order.
    /// The term is matched as given; an empty or all-whitespace term matches every category.
    pub fn search(&self, term: &str) -> Vec<&Category> {
        if term.trim().is_empty() {
            return self.categories.iter().collect();
        }
        let needle = term.to_lowercase();
        self.categories
            .iter()
            .filter(|category| category.matches(&needle))
            .collect()
    }
}

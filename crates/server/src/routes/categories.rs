//! Read-only catalog routes: paginated listing with search, and nested lookups.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use services::services::catalog::{Category, Feature, PageRequest, Subcategory, paginate};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

/// `page` is 1-based. `limit` may also be sent as `pageSize`.
/// Signed so that negative values clamp instead of failing to parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryQuery {
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl CategoryQuery {
    fn page_request(&self) -> PageRequest {
        let non_negative = |v: i64| v.max(0) as usize;
        PageRequest {
            page: self.page.map(non_negative),
            page_size: self.limit.map(non_negative),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub categories: Vec<Category>,
}

/// GET /api/categories
pub async fn list_categories(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<CategoryQuery>,
) -> Result<ResponseJson<ApiResponse<CategoryPage>>, ApiError> {
    let config = deployment.config();
    let (page, page_size) = query
        .page_request()
        .resolve(config.default_page_size, config.max_page_size);

    let matches = deployment
        .catalog()
        .search(query.search.as_deref().unwrap_or_default());
    let result = paginate(&matches, page, page_size).map(Category::clone);

    Ok(ResponseJson(ApiResponse::success(CategoryPage {
        total: result.total,
        page: result.page,
        limit: result.page_size,
        total_pages: result.total_pages,
        categories: result.items,
    })))
}

/// GET /api/categories/{category_id}
pub async fn get_category(
    State(deployment): State<DeploymentImpl>,
    Path(category_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category = deployment.catalog().get_by_id(category_id)?;
    Ok(ResponseJson(ApiResponse::success(category.clone())))
}

/// GET /api/categories/{category_id}/subcategories/{subcategory_id}
pub async fn get_subcategory(
    State(deployment): State<DeploymentImpl>,
    Path((category_id, subcategory_id)): Path<(i64, String)>,
) -> Result<ResponseJson<ApiResponse<Subcategory>>, ApiError> {
    let subcategory = deployment
        .catalog()
        .subcategory(category_id, &subcategory_id)?;
    Ok(ResponseJson(ApiResponse::success(subcategory.clone())))
}

/// GET /api/categories/{category_id}/subcategories/{subcategory_id}/features/{feature_id}
pub async fn get_feature(
    State(deployment): State<DeploymentImpl>,
    Path((category_id, subcategory_id, feature_id)): Path<(i64, String, String)>,
) -> Result<ResponseJson<ApiResponse<Feature>>, ApiError> {
    let feature = deployment
        .catalog()
        .feature(category_id, &subcategory_id, &feature_id)?;
    Ok(ResponseJson(ApiResponse::success(feature.clone())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/categories",
        Router::new()
            .route("/", get(list_categories))
            .route("/{category_id}", get(get_category))
            .route(
                "/{category_id}/subcategories/{subcategory_id}",
                get(get_subcategory),
            )
            .route(
                "/{category_id}/subcategories/{subcategory_id}/features/{feature_id}",
                get(get_feature),
            ),
    )
}

/// Page-style paths used by the dashboard links
pub fn page_router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new()
        .route("/category/{category_id}", get(get_category))
        .route(
            "/subcategory/{category_id}/{subcategory_id}",
            get(get_subcategory),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use services::services::catalog::{Catalog, CatalogSource};
    use tempfile::TempDir;

    use super::*;
    use crate::routes::test_support::{app, get};

    fn numbered(n: i64) -> Catalog {
        let categories = (1..=n)
            .map(|id| Category {
                id,
                name: format!("קטגוריה {id}"),
                icon: "folder".to_string(),
                description: if id % 2 == 0 {
                    "Even DOCUMENTS".to_string()
                } else {
                    "odd".to_string()
                },
                smart_features: None,
                includes: None,
                subcategories: vec![],
            })
            .collect();
        Catalog::new(categories, CatalogSource::Fallback)
    }

    fn ids(body: &serde_json::Value) -> Vec<i64> {
        body["data"]["categories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_default_page_uses_default_size() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(app(&dir, numbered(72)).await, "/api/categories").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total"], 72);
        assert_eq!(body["data"]["page"], 1);
        assert_eq!(body["data"]["limit"], 12);
        assert_eq!(body["data"]["totalPages"], 6);
        assert_eq!(ids(&body), (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_out_of_range_pages_clamp() {
        let dir = TempDir::new().unwrap();

        let (_, last) = get(app(&dir, numbered(72)).await, "/api/categories?page=6&limit=12").await;
        assert_eq!(ids(&last), (61..=72).collect::<Vec<_>>());

        let (status, beyond) =
            get(app(&dir, numbered(72)).await, "/api/categories?page=7&pageSize=12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(beyond["data"]["page"], 6);
        assert_eq!(ids(&beyond), ids(&last));

        let (_, negative) = get(app(&dir, numbered(72)).await, "/api/categories?page=-3").await;
        assert_eq!(negative["data"]["page"], 1);
    }

    #[tokio::test]
    async fn test_non_numeric_page_is_a_client_error() {
        let dir = TempDir::new().unwrap();
        let (status, _) = get(app(&dir, numbered(3)).await, "/api/categories?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_paginated() {
        let dir = TempDir::new().unwrap();
        let (_, body) = get(
            app(&dir, numbered(30)).await,
            "/api/categories?search=documents&limit=5&page=2",
        )
        .await;

        assert_eq!(body["data"]["total"], 15);
        assert_eq!(body["data"]["totalPages"], 3);
        assert_eq!(ids(&body), vec![12, 14, 16, 18, 20]);
    }

    #[tokio::test]
    async fn test_lookups_and_not_found() {
        let dir = TempDir::new().unwrap();

        let (status, body) = get(app(&dir, Catalog::fallback()).await, "/api/categories/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "פיננסים");

        let (status, body) = get(app(&dir, Catalog::fallback()).await, "/api/categories/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, body) = get(
            app(&dir, Catalog::fallback()).await,
            "/api/categories/1/subcategories/1/features/2",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["type"], "reminder");

        let (status, _) = get(
            app(&dir, Catalog::fallback()).await,
            "/api/categories/1/subcategories/7",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_style_paths() {
        let dir = TempDir::new().unwrap();

        let (status, body) = get(app(&dir, Catalog::fallback()).await, "/category/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], 3);

        let (status, body) = get(app(&dir, Catalog::fallback()).await, "/subcategory/3/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["features"].as_array().unwrap().len(), 2);

        let (status, _) = get(app(&dir, Catalog::fallback()).await, "/subcategory/3/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

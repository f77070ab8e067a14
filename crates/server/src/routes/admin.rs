//! Admin-only routes, guarded by HTTP Basic credentials checked through the
//! deployment's `CredentialVerifier`.

use axum::{
    Router,
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts},
    response::Json as ResponseJson,
    routing::get,
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use deployment::Deployment;
use serde::Deserialize;
use services::services::submission::FeatureSubmissions;
use tracing::{info, warn};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

/// Proof that the request carried valid admin credentials
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub username: String,
}

impl FromRequestParts<DeploymentImpl> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        deployment: &DeploymentImpl,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic_credentials)
            .ok_or(ApiError::Unauthorized)?;

        let verifier = deployment.credentials().clone();
        if !verifier.is_enabled() {
            warn!(username = %username, "Admin login attempted while admin access is disabled");
            return Err(ApiError::Unauthorized);
        }
        let candidate = username.clone();
        let verified = tokio::task::spawn_blocking(move || verifier.verify(&candidate, &password))
            .await
            .unwrap_or(false);

        if !verified {
            warn!(username = %username, "Rejected admin credentials");
            return Err(ApiError::Unauthorized);
        }
        Ok(AdminAuth { username })
    }
}

fn parse_basic_credentials(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuery {
    #[serde(default, alias = "feature_id")]
    pub feature_id: String,
}

/// GET /api/admin/submissions?featureId=...
pub async fn list_submissions(
    admin: AdminAuth,
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<SubmissionQuery>,
) -> Result<ResponseJson<ApiResponse<FeatureSubmissions>>, ApiError> {
    let submissions = deployment
        .submissions()
        .list_for_feature(&query.feature_id)
        .await?;
    info!(
        admin = %admin.username,
        feature_id = %submissions.feature_id,
        "Listed feature submissions"
    );
    Ok(ResponseJson(ApiResponse::success(submissions)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/admin",
        Router::new().route("/submissions", get(list_submissions)),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use services::services::catalog::Catalog;
    use tempfile::TempDir;

    use super::*;
    use crate::routes::{
        self,
        test_support::{ADMIN_PASSWORD, ADMIN_USER, deployment, post_json, send},
    };

    fn authorized(uri: &str, username: &str, password: &str) -> Request<Body> {
        let token = BASE64_STANDARD.encode(format!("{username}:{password}"));
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Basic {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_parse_basic_credentials() {
        let token = BASE64_STANDARD.encode("admin:pass:with:colons");
        assert_eq!(
            parse_basic_credentials(&format!("basic {token}")),
            Some(("admin".to_string(), "pass:with:colons".to_string()))
        );
        assert_eq!(parse_basic_credentials("Bearer abc"), None);
        assert_eq!(parse_basic_credentials("Basic !!!"), None);
    }

    #[tokio::test]
    async fn test_requires_valid_credentials() {
        let dir = TempDir::new().unwrap();
        let app = routes::router(deployment(&dir, Catalog::fallback(), true).await);

        let anonymous = Request::builder()
            .uri("/api/admin/submissions?featureId=1")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.clone(), anonymous).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let wrong = authorized("/api/admin/submissions?featureId=1", ADMIN_USER, "guess");
        let (status, _) = send(app, wrong).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_disabled_admin_rejects_everyone() {
        let dir = TempDir::new().unwrap();
        let app = routes::router(deployment(&dir, Catalog::fallback(), false).await);
        let request = authorized("/api/admin/submissions?featureId=1", ADMIN_USER, ADMIN_PASSWORD);
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_lists_submissions_for_feature() {
        let dir = TempDir::new().unwrap();
        let app = routes::router(deployment(&dir, Catalog::fallback(), true).await);

        post_json(
            app.clone(),
            "/api/reminders",
            json!({ "featureId": "tax-report", "title": "הגשת דוח" }),
        )
        .await;
        post_json(
            app.clone(),
            "/api/forms",
            json!({ "featureId": "tax-report", "fields": { "year": 2025 } }),
        )
        .await;

        let request = authorized(
            "/api/admin/submissions?featureId=tax-report",
            ADMIN_USER,
            ADMIN_PASSWORD,
        );
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["featureId"], "tax-report");
        assert_eq!(body["data"]["reminders"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["forms"].as_array().unwrap().len(), 1);

        let request = authorized("/api/admin/submissions", ADMIN_USER, ADMIN_PASSWORD);
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::DeploymentImpl;

pub mod admin;
pub mod categories;
pub mod health;
pub mod submissions;

pub fn router(deployment: DeploymentImpl) -> Router {
    let api_routes = Router::new()
        .merge(health::router(&deployment))
        .merge(categories::router(&deployment))
        .merge(submissions::router(&deployment))
        .merge(admin::router(&deployment));

    Router::new()
        .merge(categories::page_router(&deployment))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(deployment)
}

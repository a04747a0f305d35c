// Application bundle endpoints

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use tracing::error;

use super::common::{ApiResponse, ApiResult, BundleRequest};
use crate::web::AppState;

#[derive(Serialize)]
pub struct BundleSummary {
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: usize,
}

/// Inject a bundle URL through the single-flight loader
pub async fn load_bundle(
    State(state): State<AppState>,
    Json(request): Json<BundleRequest>,
) -> ApiResult<BundleSummary> {
    match state.loader.inject(&request.url).await {
        Ok(bundle) => Ok(Json(ApiResponse::success(BundleSummary {
            url: bundle.url.clone(),
            content_type: bundle.content_type.clone(),
            size_bytes: bundle.size_bytes(),
        }))),
        Err(e) => {
            error!("Bundle injection failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::error(e.to_string())),
            ))
        }
    }
}

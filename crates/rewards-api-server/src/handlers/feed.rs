use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{VideoCatalog, VideoDescriptor};
use crate::utils::error::ApiError;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub creator: Option<String>,
    pub tag: Option<String>,
    // Kept as a raw string: a non-numeric limit falls back to the default
    // instead of rejecting the request.
    pub limit: Option<String>,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub videos: Vec<VideoDescriptor>,
}

/// GET /feed — filtered, capped slice of the catalog in catalog order.
pub async fn feed_handler(
    State(catalog): State<Arc<VideoCatalog>>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let mut videos = catalog.load_enabled().await?;

    if let Some(creator) = &params.creator {
        videos.retain(|v| v.creator == *creator);
    }
    if let Some(tag) = &params.tag {
        videos.retain(|v| v.tags.iter().any(|t| t == tag));
    }

    videos.truncate(effective_limit(params.limit.as_deref()));
    Ok(Json(FeedResponse { videos }))
}

/// Missing, non-numeric, or non-positive limits fall back to the default;
/// anything above the hard maximum is capped.
fn effective_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| (n as usize).min(MAX_LIMIT))
        .unwrap_or(DEFAULT_LIMIT)
}

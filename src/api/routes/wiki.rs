//! Static wiki routes.

use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use crate::api::{ok, ApiError, OkEnvelope};
use crate::content::{self, GuideEntry};

#[derive(Debug, Serialize)]
pub struct WikiIndexEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub guides: Vec<WikiIndexEntry>,
}

pub async fn index() -> Json<OkEnvelope<IndexResponse>> {
    let guides = content::GUIDES
        .iter()
        .map(|g| WikiIndexEntry {
            slug: g.slug,
            title: g.title,
            summary: g.summary,
        })
        .collect();
    ok(IndexResponse { guides })
}

#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub guide: &'static GuideEntry,
}

pub async fn by_slug(
    Path(slug): Path<String>,
) -> Result<Json<OkEnvelope<GuideResponse>>, ApiError> {
    let guide = content::guide(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("no guide '{slug}'")))?;
    Ok(ok(GuideResponse { guide }))
}

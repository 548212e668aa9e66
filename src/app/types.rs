// src/app/types.rs
use eframe::egui::TextureHandle;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

use crate::error::CatalogError;

// ---- catalog data ----
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
}

fn empty_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

// ---- query pipeline ----
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryKind {
    Popular,
    Search(String),
    /// Comma-joined provider genre ids.
    Discover(String),
}

impl QueryKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Search(_) => "search",
            Self::Discover(_) => "discover",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryRequest {
    pub seq: u64,
    pub kind: QueryKind,
}

/// Worker -> UI thread: one catalog response, tagged with the request epoch.
#[derive(Debug)]
pub struct CatalogMsg {
    pub seq: u64,
    pub result: Result<Vec<MovieSummary>, CatalogError>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorReason {
    SearchFailed,
    RecommendationFailed,
    PopularLoadFailed,
    NoGenresSelected,
}

impl ErrorReason {
    pub const fn for_kind(kind: &QueryKind) -> Self {
        match kind {
            QueryKind::Popular => Self::PopularLoadFailed,
            QueryKind::Search(_) => Self::SearchFailed,
            QueryKind::Discover(_) => Self::RecommendationFailed,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::SearchFailed => "Failed to search movies. Please try again later.",
            Self::RecommendationFailed => "Failed to get recommendations. Please try again later.",
            Self::PopularLoadFailed => "Failed to load movies. Please try again later.",
            Self::NoGenresSelected => "Please select at least one genre first!",
        }
    }
}

// ---- posters ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PosterState {
    Pending, // queued or downloading
    Cached,  // file present on disk (ready to upload)
    Ready,   // texture uploaded
    Failed,  // paint the built-in placeholder
}

pub struct PosterSlot {
    pub state: PosterState,
    pub path: Option<PathBuf>,
    pub tex: Option<TextureHandle>, // UI thread only
}

impl PosterSlot {
    pub const fn pending() -> Self {
        Self {
            state: PosterState::Pending,
            path: None,
            tex: None,
        }
    }
}

pub struct PosterJob {
    pub movie_id: u64,
    pub url: String,
    pub fallback_url: String,
}

pub struct PosterDone {
    pub movie_id: u64,
    pub result: Result<PathBuf, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_summary_tolerates_sparse_provider_json() {
        let raw = r#"{
            "id": 438631, "title": "Dune", "poster_path": null,
            "release_date": "", "adult": false, "genre_ids": [878, 12]
        }"#;
        let m: MovieSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(m.id, 438631);
        assert_eq!(m.title, "Dune");
        assert!(m.poster_path.is_none());
        assert!(m.vote_average.is_none());
        assert!(m.release_date.is_none());
    }

    #[test]
    fn error_reason_follows_request_kind() {
        assert_eq!(
            ErrorReason::for_kind(&QueryKind::Search("x".into())),
            ErrorReason::SearchFailed
        );
        assert_eq!(
            ErrorReason::for_kind(&QueryKind::Discover("27".into())),
            ErrorReason::RecommendationFailed
        );
        assert_eq!(
            ErrorReason::for_kind(&QueryKind::Popular),
            ErrorReason::PopularLoadFailed
        );
    }
}

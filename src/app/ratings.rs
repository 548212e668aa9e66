// src/app/ratings.rs
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;

pub const MAX_RATING: u8 = 5;

/// Personal star ratings, written through to a JSON slot on every change.
///
/// A missing key means "unrated"; a stored value is always 1..=5.
#[derive(Debug)]
pub struct RatingStore {
    path: PathBuf,
    ratings: BTreeMap<u64, u8>,
}

impl RatingStore {
    /// Best-effort load: a missing or unreadable slot yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ratings = match fs::read(&path) {
            Ok(bytes) => parse_slot(&bytes, &path),
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!("Failed to read ratings {}: {err}", path.display());
                }
                BTreeMap::new()
            }
        };
        debug!("Loaded {} ratings from {}", ratings.len(), path.display());
        Self { path, ratings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, movie_id: u64) -> Option<u8> {
        self.ratings.get(&movie_id).copied()
    }

    /// Selector value: 0 when unrated.
    pub fn rating_or_zero(&self, movie_id: u64) -> u8 {
        self.get(movie_id).unwrap_or(0)
    }

    /// 1..=5 stores, 0 clears. The slot is rewritten before this returns.
    pub fn set(&mut self, movie_id: u64, rating: u8) -> Result<(), AppError> {
        if rating > MAX_RATING {
            return Err(AppError::InvalidRating(rating));
        }
        if rating == 0 {
            self.ratings.remove(&movie_id);
        } else {
            self.ratings.insert(movie_id, rating);
        }
        if let Err(err) = self.persist() {
            warn!("Failed to persist ratings to {}: {err}", self.path.display());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.ratings.iter().map(|(k, v)| (*k, *v))
    }

    fn persist(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        let data = serde_json::to_vec_pretty(&self.ratings).map_err(io::Error::other)?;
        fs::write(&tmp, data)?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

/// Keeps every well-formed `"id": 1..=5` entry and drops the rest.
fn parse_slot(bytes: &[u8], path: &Path) -> BTreeMap<u64, u8> {
    let obj = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(obj)) => obj,
        Ok(Value::Null) => return BTreeMap::new(),
        Ok(other) => {
            warn!(
                "Ratings slot {} holds {} instead of an object; starting empty.",
                path.display(),
                json_kind(&other)
            );
            return BTreeMap::new();
        }
        Err(err) => {
            warn!("Ratings slot {} is corrupt ({err}); starting empty.", path.display());
            return BTreeMap::new();
        }
    };

    let mut out = BTreeMap::new();
    let mut dropped = 0usize;
    for (key, val) in obj {
        let id = key.trim().parse::<u64>().ok();
        let rating = val
            .as_u64()
            .or_else(|| val.as_str().and_then(|s| s.trim().parse().ok()))
            .filter(|r| (1..=u64::from(MAX_RATING)).contains(r));
        match (id, rating) {
            (Some(id), Some(r)) => {
                out.insert(id, r as u8);
            }
            // explicit 0 is the old "unrated" marker; nothing to keep
            (Some(_), None) if val.as_u64() == Some(0) => {}
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!("Dropped {dropped} malformed rating entries from {}", path.display());
    }
    out
}

const fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

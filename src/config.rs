use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const RATINGS_FILE: &str = "ratedMovies.json";
pub const POSTER_DIR: &str = "posters";

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_PLACEHOLDER_POSTER_URL: &str =
    "https://via.placeholder.com/300x450?text=No+Poster";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_DATA_DIR: &str = ".movierec";

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_POSTER_WORKERS: usize = 6;

const ENV_API_KEY: &str = "MOVIEREC_API_KEY";
const ENV_DATA_DIR: &str = "MOVIEREC_DATA_DIR";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub language: String,
    pub api_base_url: String,
    pub image_base_url: String,
    pub placeholder_poster_url: String,
    pub data_dir: PathBuf,
    pub search_debounce_ms: u64,
    pub http_timeout_secs: u64,
    pub poster_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: DEFAULT_LANGUAGE.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            placeholder_poster_url: DEFAULT_PLACEHOLDER_POSTER_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            poster_workers: DEFAULT_POSTER_WORKERS,
        }
    }
}

impl AppConfig {
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Single storage slot holding the serialized rating map.
    pub fn ratings_path(&self) -> PathBuf {
        self.data_dir.join(RATINGS_FILE)
    }

    pub fn poster_dir(&self) -> PathBuf {
        self.data_dir.join(POSTER_DIR)
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "tmdb_api_key")]
    api_key: Option<String>,
    language: Option<String>,
    api_base_url: Option<String>,
    image_base_url: Option<String>,
    placeholder_poster_url: Option<String>,
    data_dir: Option<String>,
    search_debounce_ms: Option<u64>,
    http_timeout_secs: Option<u64>,
    poster_workers: Option<usize>,
}

/// `config.json` from the working directory, then environment overrides.
pub fn load_config() -> AppConfig {
    let mut cfg = load_config_from(Path::new(CONFIG_FILE));
    apply_env_overrides(&mut cfg);
    if cfg.api_key.is_none() {
        warn!("No TMDB api_key configured (config.json or {ENV_API_KEY}); catalog requests will fail.");
    }
    cfg
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                apply_raw(&mut cfg, parsed);
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Using defaults.",
                    cfg_path.display(),
                    err
                );
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
        }
    }

    cfg
}

fn apply_raw(cfg: &mut AppConfig, parsed: RawConfig) {
    if let Some(key) = parsed.api_key.and_then(non_blank) {
        cfg.api_key = Some(key);
    }
    if let Some(lang) = parsed.language.and_then(non_blank) {
        cfg.language = lang;
    }
    if let Some(url) = parsed.api_base_url.and_then(non_blank) {
        cfg.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = parsed.image_base_url.and_then(non_blank) {
        cfg.image_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = parsed.placeholder_poster_url.and_then(non_blank) {
        cfg.placeholder_poster_url = url;
    }
    if let Some(dir) = parsed.data_dir.and_then(non_blank) {
        cfg.data_dir = PathBuf::from(dir);
    }
    if let Some(ms) = parsed.search_debounce_ms {
        cfg.search_debounce_ms = ms.clamp(10, 2_000);
    }
    if let Some(secs) = parsed.http_timeout_secs {
        cfg.http_timeout_secs = secs.clamp(1, 120);
    }
    if let Some(n) = parsed.poster_workers {
        cfg.poster_workers = n.clamp(1, 16);
    }
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Some(key) = env::var(ENV_API_KEY).ok().and_then(non_blank) {
        cfg.api_key = Some(key);
    }
    if let Some(dir) = env::var(ENV_DATA_DIR).ok().and_then(non_blank) {
        cfg.data_dir = PathBuf::from(dir);
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.json"));
        assert_eq!(cfg.language, DEFAULT_LANGUAGE);
        assert_eq!(cfg.search_debounce(), Duration::from_millis(100));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn overlays_present_fields_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "tmdb_api_key": " abc ", "api_base_url": "http://localhost:9000/3/",
                 "search_debounce_ms": 1, "poster_workers": 64, "data_dir": "state" }"#,
        )
        .unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.api_base_url, "http://localhost:9000/3");
        assert_eq!(cfg.search_debounce_ms, 10);
        assert_eq!(cfg.poster_workers, 16);
        assert_eq!(cfg.ratings_path(), PathBuf::from("state").join(RATINGS_FILE));
        assert_eq!(cfg.image_base_url, DEFAULT_IMAGE_BASE_URL);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let cfg = load_config_from(&path);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    }
}

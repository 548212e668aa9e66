use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use reqwest::blocking::Client;
use tracing::{debug, warn};

pub const RESIZE_MAX_W: u32 = 320;
pub const RESIZE_QUALITY: u8 = 75;

const POSTER_RETENTION_DAYS: u64 = 14;
const POSTER_RETENTION_SECS: u64 = POSTER_RETENTION_DAYS * 24 * 60 * 60;

/// On-disk poster store, one resized JPEG per source URL.
#[derive(Clone, Debug)]
pub struct PosterCache {
    dir: PathBuf,
}

impl PosterCache {
    /// Creates the directory and prunes stale files once.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("failed to create poster cache dir {}: {e}", dir.display());
        }
        match prune_older_than(&dir, Duration::from_secs(POSTER_RETENTION_SECS)) {
            Ok(0) => {}
            Ok(n) => debug!("pruned {n} stale posters from {}", dir.display()),
            Err(err) => warn!("poster cache prune failed: {err}"),
        }
        Self { dir }
    }

    pub fn key_for(url: &str) -> String {
        format!("{:x}", md5::compute(url.as_bytes()))
    }

    pub fn path_for_key(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.jpg"))
    }

    pub fn find(&self, url: &str) -> Option<PathBuf> {
        let p = self.path_for_key(&Self::key_for(url));
        p.exists().then_some(p)
    }

    /// Download `url`, shrink to `RESIZE_MAX_W` and store as JPEG. Cache hits skip the network.
    pub fn fetch_resized(&self, client: &Client, url: &str) -> Result<PathBuf, String> {
        if let Some(hit) = self.find(url) {
            return Ok(hit);
        }
        let dest = self.path_for_key(&Self::key_for(url));

        let bytes = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|e| format!("download bytes: {e}"))?;

        let img = image::load_from_memory(&bytes).map_err(|e| format!("decode {url}: {e}"))?;
        let jpeg = encode_resized(&img, RESIZE_MAX_W, RESIZE_QUALITY)?;

        let tmp = dest.with_extension("jpg.part");
        {
            let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
            f.write_all(&jpeg).map_err(|e| format!("write: {e}"))?;
        }
        fs::rename(&tmp, &dest).map_err(|e| format!("rename: {e}"))?;
        Ok(dest)
    }
}

fn encode_resized(img: &DynamicImage, max_width: u32, quality: u8) -> Result<Vec<u8>, String> {
    let (w, h) = img.dimensions();
    let out: DynamicImage = if w > max_width {
        let new_h = ((h as f32) * (max_width as f32 / w as f32))
            .round()
            .max(1.0) as u32;
        img.resize_exact(max_width, new_h, FilterType::CatmullRom)
    } else {
        img.clone()
    };

    // JPEG has no alpha channel
    let rgb = out.to_rgb8();
    let mut jpeg_bytes: Vec<u8> = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| format!("jpeg encode: {e}"))?;
    Ok(jpeg_bytes)
}

fn prune_older_than(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_poster = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "part"))
            .unwrap_or(false);
        if !is_poster {
            continue;
        }
        let modified = entry.metadata()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if modified < cutoff {
            let _ = fs::remove_file(&path);
            removed += 1;
        }
    }
    Ok(removed)
}

/// Return (width, height, RGBA8 bytes) for a cached poster file.
pub fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    let mut raw = Vec::new();
    fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut raw))
        .map_err(|e| format!("open {}: {e}", path.display()))?;
    let img = image::load_from_memory(&raw).map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().into_raw()))
}

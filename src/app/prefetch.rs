// src/app/prefetch.rs
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::cache::PosterCache;
use super::types::{PosterDone, PosterJob};

/// Fixed pool of poster download threads fed through one shared queue.
pub struct PosterPool {
    work_tx: Sender<PosterJob>,
    done_rx: Receiver<PosterDone>,
}

impl PosterPool {
    pub fn start(cache: PosterCache, workers: usize, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .user_agent("movierec/posters")
            .timeout(timeout)
            .pool_max_idle_per_host(workers.max(1))
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            })
            .build()
            .map_err(|e| format!("http client build failed: {e}"))?;
        let client = Arc::new(client);
        let cache = Arc::new(cache);

        let (work_tx, work_rx) = mpsc::channel::<PosterJob>();
        let (done_tx, done_rx) = mpsc::channel::<PosterDone>();
        let work_rx = Arc::new(Mutex::new(work_rx));

        for _ in 0..workers.max(1) {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            let cache = Arc::clone(&cache);

            std::thread::spawn(move || loop {
                let job = {
                    let Ok(rx) = work_rx.lock() else { break };
                    rx.recv()
                };
                let Ok(job) = job else { break };

                let result = fetch_with_fallback(&job.url, &job.fallback_url, |url| {
                    cache.fetch_resized(&client, url)
                });
                if done_tx
                    .send(PosterDone {
                        movie_id: job.movie_id,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            });
        }

        Ok(Self { work_tx, done_rx })
    }

    pub fn queue(&self, job: PosterJob) {
        let _ = self.work_tx.send(job);
    }

    pub fn try_recv(&self) -> Option<PosterDone> {
        self.done_rx.try_recv().ok()
    }
}

/// Try the poster, then the placeholder image once.
pub(crate) fn fetch_with_fallback<F>(url: &str, fallback: &str, mut fetch: F) -> Result<PathBuf, String>
where
    F: FnMut(&str) -> Result<PathBuf, String>,
{
    match fetch(url) {
        Ok(p) => Ok(p),
        Err(e) if url != fallback && !fallback.is_empty() => {
            debug!("poster {url} failed ({e}); trying placeholder");
            fetch(fallback).map_err(|e2| format!("{e}; placeholder: {e2}"))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_placeholder_once() {
        let mut calls = Vec::new();
        let got = fetch_with_fallback("poster", "placeholder", |u| {
            calls.push(u.to_string());
            if u == "placeholder" {
                Ok(PathBuf::from("ph.jpg"))
            } else {
                Err("404".into())
            }
        });
        assert_eq!(got, Ok(PathBuf::from("ph.jpg")));
        assert_eq!(calls, vec!["poster", "placeholder"]);
    }

    #[test]
    fn placeholder_failure_is_not_retried() {
        let mut calls = 0;
        let got = fetch_with_fallback("placeholder", "placeholder", |_| {
            calls += 1;
            Err("offline".into())
        });
        assert!(got.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn both_failures_are_reported() {
        let got = fetch_with_fallback("a", "b", |u| Err(format!("{u} down")));
        assert_eq!(got, Err("a down; placeholder: b down".into()));
    }
}

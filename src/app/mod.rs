// src/app/mod.rs: frame loop, catalog replies and the search timer

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use eframe::egui as eg;
use tracing::{info, warn};

pub mod cache;
pub mod catalog;
pub mod coordinator;
pub mod debounce;
pub mod genres;
pub mod gfx;
pub mod prefetch;
pub mod ratings;
pub mod results;
pub mod types;
pub mod ui;
pub mod utils;

use self::cache::PosterCache;
use self::catalog::{spawn_fetch, Catalog, OfflineCatalog, TmdbCatalog};
use self::coordinator::{CoordinatorEvent, QueryCoordinator};
use self::prefetch::PosterPool;
use self::ratings::RatingStore;
use self::types::{CatalogMsg, PosterJob, PosterSlot, PosterState};
use crate::config::AppConfig;
use crate::error::AppError;

// ---- Tunables ----
const MAX_REPLIES_PER_FRAME: usize = 8;
const MAX_POSTERS_PER_FRAME: usize = 12;
pub(crate) const MAX_UPLOADS_PER_FRAME: usize = 4;

pub struct MovieRecApp {
    cfg: AppConfig,

    // core state
    coordinator: QueryCoordinator,
    ratings: RatingStore,

    // catalog plumbing
    catalog: Arc<dyn Catalog>,
    catalog_tx: Sender<CatalogMsg>,
    catalog_rx: Receiver<CatalogMsg>,

    // search box echo (coordinator sees every edit)
    search_input: String,

    // posters for the cards on screen
    poster_pool: Option<PosterPool>,
    posters: HashMap<u64, PosterSlot>,
    posters_for_revision: u64,

    // one-time init guard
    did_init: bool,
}

impl MovieRecApp {
    pub fn new(cfg: AppConfig) -> Self {
        let catalog: Arc<dyn Catalog> = match TmdbCatalog::new(&cfg) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("catalog client unavailable: {e}");
                Arc::new(OfflineCatalog::new(e.to_string()))
            }
        };
        Self::with_catalog(cfg, catalog)
    }

    pub fn with_catalog(cfg: AppConfig, catalog: Arc<dyn Catalog>) -> Self {
        let ratings = RatingStore::load(cfg.ratings_path());
        info!(
            "{} stored ratings in {}",
            ratings.len(),
            ratings.path().display()
        );

        let poster_pool = match PosterPool::start(
            PosterCache::open(cfg.poster_dir()),
            cfg.poster_workers,
            cfg.http_timeout(),
        ) {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("poster downloads disabled: {e}");
                None
            }
        };

        let (catalog_tx, catalog_rx) = mpsc::channel();
        Self {
            coordinator: QueryCoordinator::new(cfg.search_debounce()),
            ratings,
            catalog,
            catalog_tx,
            catalog_rx,
            search_input: String::new(),
            poster_pool,
            posters: HashMap::new(),
            posters_for_revision: 0,
            did_init: false,
            cfg,
        }
    }

    // ---- query pipeline ----

    /// Feed one event to the coordinator and dispatch whatever request it issues.
    /// Also wakes the frame loop at the search deadline, since keystrokes arrive mid-frame.
    pub(crate) fn dispatch(&mut self, ctx: &eg::Context, event: CoordinatorEvent) {
        let outcome = self.coordinator.handle(event, Instant::now());
        self.schedule_search_wake(ctx);
        match outcome {
            Ok(Some(request)) => {
                spawn_fetch(Arc::clone(&self.catalog), request, self.catalog_tx.clone());
            }
            Ok(None) => {}
            // already surfaced through the coordinator's error slot
            Err(AppError::NoGenresSelected) => {}
            Err(e) => warn!("ignored UI event: {e}"),
        }
    }

    fn poll_catalog(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;
        while drained < MAX_REPLIES_PER_FRAME {
            match self.catalog_rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    self.dispatch(ctx, CoordinatorEvent::Resolved(msg));
                }
                Err(_) => break,
            }
        }
        if drained > 0 {
            ctx.request_repaint();
        }
    }

    fn drive_search_timer(&mut self, ctx: &eg::Context) {
        self.dispatch(ctx, CoordinatorEvent::Tick);
    }

    fn schedule_search_wake(&self, ctx: &eg::Context) {
        if let Some(deadline) = self.coordinator.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }

    // ---- ratings ----
    pub(crate) fn rate_movie(&mut self, movie_id: u64, value: u8) {
        match self.ratings.set(movie_id, value) {
            Ok(()) => info!("rated movie {movie_id}: {value}"),
            Err(e) => warn!("rating rejected for {movie_id}: {e}"),
        }
    }

    // ---- posters ----

    /// Queue downloads for a freshly applied result set; drop slots no longer shown.
    fn sync_posters(&mut self) {
        let results = self.coordinator.results();
        if results.revision() == self.posters_for_revision {
            return;
        }
        self.posters_for_revision = results.revision();

        let shown: HashSet<u64> = results.movies().iter().map(|m| m.id).collect();
        self.posters.retain(|id, _| shown.contains(id));

        for movie in results.movies() {
            if self.posters.contains_key(&movie.id) {
                continue;
            }
            let mut slot = PosterSlot::pending();
            let fallback = self.cfg.placeholder_poster_url.clone();
            let url = utils::poster_url(&self.cfg.image_base_url, movie.poster_path.as_deref())
                .unwrap_or_else(|| fallback.clone());
            match &self.poster_pool {
                Some(pool) => pool.queue(PosterJob {
                    movie_id: movie.id,
                    url,
                    fallback_url: fallback,
                }),
                None => slot.state = PosterState::Failed,
            }
            self.posters.insert(movie.id, slot);
        }
    }

    fn poll_posters(&mut self, ctx: &eg::Context) {
        let Some(pool) = &self.poster_pool else {
            return;
        };
        let mut drained = 0usize;
        while drained < MAX_POSTERS_PER_FRAME {
            let Some(done) = pool.try_recv() else { break };
            drained += 1;
            // movie may have scrolled out of the result set meanwhile
            let Some(slot) = self.posters.get_mut(&done.movie_id) else {
                continue;
            };
            match done.result {
                Ok(path) => {
                    slot.path = Some(path);
                    slot.state = PosterState::Cached;
                }
                Err(e) => {
                    warn!("poster for {} failed: {e}", done.movie_id);
                    slot.state = PosterState::Failed;
                }
            }
        }
        if drained > 0 {
            ctx.request_repaint();
        }
    }

    /// Upload a cached poster to the GPU. Returns true when an upload happened.
    pub(crate) fn try_lazy_upload(&mut self, ctx: &eg::Context, movie_id: u64) -> bool {
        let Some(slot) = self.posters.get_mut(&movie_id) else {
            return false;
        };
        if slot.state != PosterState::Cached {
            return false;
        }
        let Some(path) = slot.path.as_deref() else {
            slot.state = PosterState::Failed;
            return false;
        };
        match gfx::load_texture_from_path(ctx, path, &format!("poster_{movie_id}")) {
            Ok(tex) => {
                slot.tex = Some(tex);
                slot.state = PosterState::Ready;
                true
            }
            Err(e) => {
                warn!("poster texture for {movie_id} rejected: {e}");
                slot.state = PosterState::Failed;
                false
            }
        }
    }
}

// ========== App impl ==========
impl eframe::App for MovieRecApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        if !self.did_init {
            self.did_init = true;
            self.dispatch(ctx, CoordinatorEvent::PopularRequested);
        }

        self.poll_catalog(ctx);
        self.drive_search_timer(ctx);
        self.sync_posters();
        self.poll_posters(ctx);

        // in-flight requests and downloads report through channels; keep polling
        if self.coordinator.is_loading()
            || self
                .posters
                .values()
                .any(|p| matches!(p.state, PosterState::Pending | PosterState::Cached))
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        eg::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.ui_render_topbar(ui);
        });

        eg::CentralPanel::default().show(ctx, |ui| {
            self.ui_render_status(ui);
            self.ui_render_grid(ui, ctx);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::{MovieSummary, QueryKind};
    use crate::error::CatalogError;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    /// Replies with one movie per query kind; search is slower than discover.
    struct ScriptedCatalog;

    impl Catalog for ScriptedCatalog {
        fn fetch(&self, kind: &QueryKind) -> Result<Vec<MovieSummary>, CatalogError> {
            let (delay_ms, id) = match kind {
                QueryKind::Popular => (0, 1),
                QueryKind::Search(_) => (250, 2),
                QueryKind::Discover(_) => (20, 3),
            };
            thread::sleep(Duration::from_millis(delay_ms));
            Ok(vec![MovieSummary {
                id,
                title: format!("movie {id}"),
                poster_path: None,
                vote_average: None,
                release_date: None,
            }])
        }
    }

    fn test_app(dir: &Path, debounce_ms: u64) -> MovieRecApp {
        let cfg = AppConfig {
            data_dir: dir.to_path_buf(),
            search_debounce_ms: debounce_ms,
            poster_workers: 1,
            ..AppConfig::default()
        };
        MovieRecApp::with_catalog(cfg, Arc::new(ScriptedCatalog))
    }

    fn shown_ids(app: &MovieRecApp) -> Vec<u64> {
        app.coordinator.results().movies().iter().map(|m| m.id).collect()
    }

    /// Run headless frames that drain replies until `done` holds or two seconds pass.
    fn pump_until(app: &mut MovieRecApp, ctx: &eg::Context, done: impl Fn(&MovieRecApp) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !done(app) && Instant::now() < deadline {
            let _ = ctx.run(eg::RawInput::default(), |ctx| app.poll_catalog(ctx));
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn keystroke_schedules_a_repaint_at_the_search_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path(), 100);
        let ctx = eg::Context::default();

        let _ = ctx.run(eg::RawInput::default(), |ctx| {
            app.dispatch(ctx, CoordinatorEvent::PopularRequested)
        });
        pump_until(&mut app, &ctx, |app| !app.coordinator.is_loading());
        for _ in 0..5 {
            let _ = ctx.run(eg::RawInput::default(), |_| {});
        }

        // same order as update: timers first, then the text box reports an edit
        let out = ctx.run(eg::RawInput::default(), |ctx| {
            app.poll_catalog(ctx);
            app.drive_search_timer(ctx);
            app.dispatch(ctx, CoordinatorEvent::SearchTextChanged("dune".into()));
        });

        assert!(app.coordinator.search_pending());
        let delay = out
            .viewport_output
            .get(&eg::ViewportId::ROOT)
            .map(|v| v.repaint_delay)
            .unwrap();
        assert!(delay <= Duration::from_millis(100), "repaint delay {delay:?}");
    }

    #[test]
    fn late_search_reply_does_not_replace_newer_discover() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path(), 10);
        let ctx = eg::Context::default();

        let _ = ctx.run(eg::RawInput::default(), |ctx| {
            app.dispatch(ctx, CoordinatorEvent::PopularRequested)
        });
        pump_until(&mut app, &ctx, |app| !app.coordinator.is_loading());
        assert_eq!(shown_ids(&app), vec![1]);

        let _ = ctx.run(eg::RawInput::default(), |ctx| {
            app.dispatch(ctx, CoordinatorEvent::SearchTextChanged("dune".into()))
        });
        thread::sleep(Duration::from_millis(30));
        let _ = ctx.run(eg::RawInput::default(), |ctx| {
            app.drive_search_timer(ctx);
            app.dispatch(ctx, CoordinatorEvent::GenreToggled("Horror".into()));
            app.dispatch(ctx, CoordinatorEvent::RecommendationsRequested);
        });
        assert_eq!(app.coordinator.latest_seq(), 3);

        // both replies are queued by now; the search one arrives last
        thread::sleep(Duration::from_millis(400));
        let _ = ctx.run(eg::RawInput::default(), |ctx| app.poll_catalog(ctx));

        assert_eq!(shown_ids(&app), vec![3]);
        assert!(!app.coordinator.is_loading());
        assert_eq!(app.coordinator.error(), None);
    }
}

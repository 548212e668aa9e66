// src/app/coordinator.rs
//! Reconciles popular / search / discover intents into one result stream.
//!
//! Every issued request gets the next epoch number. A response is applied only
//! when its epoch is still the latest one issued; anything older is dropped on
//! arrival, success or failure alike. The network is never touched from here:
//! operations hand back the `QueryRequest` the caller must dispatch.
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::genres::GenreSelection;
use super::results::{DisplayState, ResultSet};
use super::types::{CatalogMsg, ErrorReason, QueryKind, QueryRequest};
use crate::config::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::error::AppError;

#[derive(Debug)]
pub enum CoordinatorEvent {
    SearchTextChanged(String),
    GenreToggled(String),
    RecommendationsRequested,
    PopularRequested,
    Tick,
    Resolved(CatalogMsg),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Superseded,
}

pub struct QueryCoordinator {
    search_text: String,
    genres: GenreSelection,
    results: ResultSet,
    error: Option<ErrorReason>,
    latest_seq: u64,
    in_flight: Option<QueryRequest>,
    search_timer: Debouncer<String>,
}

impl Default for QueryCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS))
    }
}

impl QueryCoordinator {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            search_text: String::new(),
            genres: GenreSelection::default(),
            results: ResultSet::default(),
            error: None,
            latest_seq: 0,
            in_flight: None,
            search_timer: Debouncer::new(quiet_period),
        }
    }

    // ---- views ----
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub const fn genres(&self) -> &GenreSelection {
        &self.genres
    }

    pub const fn results(&self) -> &ResultSet {
        &self.results
    }

    pub const fn error(&self) -> Option<ErrorReason> {
        self.error
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(ErrorReason::message)
    }

    /// True from issuing the latest request until that request resolves.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn display_state(&self) -> DisplayState {
        self.results.display_state(self.is_loading())
    }

    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn search_pending(&self) -> bool {
        self.search_timer.is_pending()
    }

    /// When the frame loop should wake up to fire the search timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search_timer.deadline()
    }

    // ---- transitions ----
    pub fn handle(
        &mut self,
        event: CoordinatorEvent,
        now: Instant,
    ) -> Result<Option<QueryRequest>, AppError> {
        match event {
            CoordinatorEvent::SearchTextChanged(text) => {
                self.set_search_text(text, now);
                Ok(None)
            }
            CoordinatorEvent::GenreToggled(name) => {
                self.toggle_genre(&name)?;
                Ok(None)
            }
            CoordinatorEvent::RecommendationsRequested => self.request_recommendations().map(Some),
            CoordinatorEvent::PopularRequested => Ok(Some(self.load_popular())),
            CoordinatorEvent::Tick => Ok(self.poll_timers(now)),
            CoordinatorEvent::Resolved(msg) => {
                self.resolve(msg);
                Ok(None)
            }
        }
    }

    /// Empty text cancels any pending search and keeps the current results.
    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        self.search_text = text.into();
        self.search_timer.cancel();
        if self.search_text.is_empty() {
            return;
        }
        self.search_timer.trigger(now, self.search_text.clone());
    }

    pub fn poll_timers(&mut self, now: Instant) -> Option<QueryRequest> {
        let text = self.search_timer.poll(now)?;
        Some(self.issue(QueryKind::Search(text)))
    }

    pub fn toggle_genre(&mut self, name: &str) -> Result<bool, AppError> {
        let selected = self.genres.toggle_by_name(name)?;
        debug!("genre {name} -> {}", if selected { "on" } else { "off" });
        Ok(selected)
    }

    pub fn request_recommendations(&mut self) -> Result<QueryRequest, AppError> {
        if self.genres.is_empty() {
            info!("recommendations requested with no genres selected");
            self.error = Some(ErrorReason::NoGenresSelected);
            return Err(AppError::NoGenresSelected);
        }
        Ok(self.issue(QueryKind::Discover(self.genres.joined_ids())))
    }

    pub fn load_popular(&mut self) -> QueryRequest {
        self.issue(QueryKind::Popular)
    }

    pub fn resolve(&mut self, msg: CatalogMsg) -> Resolution {
        let current = match &self.in_flight {
            Some(req) if req.seq == msg.seq => req.kind.clone(),
            _ => {
                debug!(
                    "dropping superseded response #{} (latest #{})",
                    msg.seq, self.latest_seq
                );
                return Resolution::Superseded;
            }
        };
        self.in_flight = None;

        match msg.result {
            Ok(movies) => {
                debug!("#{} {} applied ({} movies)", msg.seq, current.label(), movies.len());
                self.results.replace(movies);
            }
            Err(err) => {
                warn!("#{} {} failed: {err}", msg.seq, current.label());
                self.error = Some(ErrorReason::for_kind(&current));
            }
        }
        Resolution::Applied
    }

    fn issue(&mut self, kind: QueryKind) -> QueryRequest {
        self.latest_seq += 1;
        self.error = None;
        let req = QueryRequest {
            seq: self.latest_seq,
            kind,
        };
        debug!("issuing #{} {}", req.seq, req.kind.label());
        self.in_flight = Some(req.clone());
        req
    }
}

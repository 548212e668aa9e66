// src/app/debounce.rs
//! Cancellable one-shot timers driven by the frame loop.
//!
//! Nothing here sleeps or spawns: callers pass `now` in and collect whatever
//! became due. That keeps the frame loop the only thread touching UI state.
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Armed<T> {
    handle: TimerHandle,
    deadline: Instant,
    payload: T,
}

pub struct Timers<T> {
    next_id: u64,
    armed: Vec<Armed<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            armed: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn arm(&mut self, now: Instant, delay: Duration, payload: T) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.armed.push(Armed {
            handle,
            deadline: now + delay,
            payload,
        });
        handle
    }

    /// Idempotent: returns false for handles that already fired or were canceled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.armed.len();
        self.armed.retain(|a| a.handle != handle);
        self.armed.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.armed.iter().any(|a| a.handle == handle)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.iter().map(|a| a.deadline).min()
    }

    /// Remove and return every payload whose deadline is at or before `now`, earliest first.
    pub fn fire_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.armed.drain(..).partition(|a| a.deadline <= now);
        self.armed = rest;
        due.sort_by_key(|a| (a.deadline, a.handle.0));
        due.into_iter().map(|a| a.payload).collect()
    }
}

/// Trailing-edge debounce: each trigger cancels the previous one.
pub struct Debouncer<T> {
    quiet: Duration,
    timers: Timers<T>,
    last: Option<TimerHandle>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            timers: Timers::default(),
            last: None,
        }
    }

    pub fn trigger(&mut self, now: Instant, payload: T) -> TimerHandle {
        self.cancel();
        let handle = self.timers.arm(now, self.quiet, payload);
        self.last = Some(handle);
        handle
    }

    pub fn cancel(&mut self) -> bool {
        match self.last.take() {
            Some(h) => self.timers.cancel(h),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last.is_some_and(|h| self.timers.is_pending(h))
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let fired = self.timers.fire_due(now).pop();
        if fired.is_some() {
            self.last = None;
        }
        fired
    }
}

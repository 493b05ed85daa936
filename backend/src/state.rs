//! Application state shared by every worker.
//!
//! `AppState` is built once in `main.rs` (or by a test) and registered as
//! `web::Data`, so each worker holds an `Arc` to the same store handle, limiter
//! tables and configuration. Nothing in here is mutated by handlers except the
//! rate limiter counters, which sit behind their own short-lived locks.

use std::time::Instant;

use crate::config::AppConfig;
use crate::middleware::rate_limit::RateLimiters;
use crate::store::Store;

pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub limiters: RateLimiters,
    /// Process start, reported as `uptime` by `GET /health`.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> AppState {
        let limiters = RateLimiters::new(&config.rate_limits);
        AppState {
            config,
            store,
            limiters,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

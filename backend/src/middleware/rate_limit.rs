//! # Rate Limiting
//!
//! Fixed-window request counters keyed by client address. Two independent limiters
//! exist: `general` covers everything under `/api`, and `quotes` additionally covers
//! the quote-serving scopes. Both are plain `from_fn` middleware that read their
//! limiter from the shared [`AppState`].
//!
//! Every counted response carries `RateLimit-Limit`, `RateLimit-Remaining` and
//! `RateLimit-Reset` (seconds). A rejected request gets `429` with `Retry-After`
//! and the usual `{success:false, error}` body.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpResponse};
use log::warn;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::{RateLimit, RateLimitSettings};
use crate::response::ErrorBody;
use crate::state::AppState;

const GENERAL_MESSAGE: &str = "Too many requests from this IP, please try again later.";
const QUOTES_MESSAGE: &str = "Too many quote requests, please try again later.";

const LIMIT_HEADER: &str = "ratelimit-limit";
const REMAINING_HEADER: &str = "ratelimit-remaining";
const RESET_HEADER: &str = "ratelimit-reset";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32, reset: Duration },
    Limited { retry_after: Duration },
}

struct Window {
    started: Instant,
    hits: u32,
}

struct Windows {
    by_client: HashMap<String, Window>,
    last_prune: Instant,
}

pub struct FixedWindowLimiter {
    limit: RateLimit,
    windows: Mutex<Windows>,
}

impl FixedWindowLimiter {
    pub fn new(limit: RateLimit) -> FixedWindowLimiter {
        FixedWindowLimiter {
            limit,
            windows: Mutex::new(Windows {
                by_client: HashMap::new(),
                last_prune: Instant::now(),
            }),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    pub fn check(&self, client: &str) -> Decision {
        self.check_at(client, Instant::now())
    }

    /// Counts one request from `client` at `now`.
    pub fn check_at(&self, client: &str, now: Instant) -> Decision {
        let window_len = self.limit.window;
        let mut windows = match self.windows.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };

        if now.saturating_duration_since(windows.last_prune) >= window_len {
            windows
                .by_client
                .retain(|_, w| now.saturating_duration_since(w.started) < window_len);
            windows.last_prune = now;
        }

        let window = windows
            .by_client
            .entry(client.to_string())
            .or_insert(Window {
                started: now,
                hits: 0,
            });
        if now.saturating_duration_since(window.started) >= window_len {
            window.started = now;
            window.hits = 0;
        }

        let reset = window_len.saturating_sub(now.saturating_duration_since(window.started));
        if window.hits >= self.limit.max_requests {
            return Decision::Limited { retry_after: reset };
        }
        window.hits += 1;
        Decision::Allowed {
            remaining: self.limit.max_requests - window.hits,
            reset,
        }
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().map(|w| w.by_client.len()).unwrap_or(0)
    }
}

pub struct RateLimiters {
    pub general: FixedWindowLimiter,
    pub quotes: FixedWindowLimiter,
}

impl RateLimiters {
    pub fn new(settings: &RateLimitSettings) -> RateLimiters {
        RateLimiters {
            general: FixedWindowLimiter::new(settings.general),
            quotes: FixedWindowLimiter::new(settings.quotes),
        }
    }
}

#[derive(Clone, Copy)]
enum Tier {
    General,
    Quotes,
}

/// Limits every request under `/api`.
pub async fn general_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    enforce(Tier::General, req, next).await
}

/// Limits the quote-serving endpoints.
pub async fn quote_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    enforce(Tier::Quotes, req, next).await
}

async fn enforce<B: MessageBody + 'static>(
    tier: Tier,
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    };
    let (limiter, message) = match tier {
        Tier::General => (&state.limiters.general, GENERAL_MESSAGE),
        Tier::Quotes => (&state.limiters.quotes, QUOTES_MESSAGE),
    };

    let client = client_key(&req, state.config.trust_proxy);
    match limiter.check(&client) {
        Decision::Allowed { remaining, reset } => {
            let mut res = next.call(req).await?;
            // The innermost limiter is the most specific one, so it wins.
            let headers = res.headers_mut();
            if !headers.contains_key(LIMIT_HEADER) {
                set_headers(headers, limiter.limit().max_requests, remaining, reset);
            }
            Ok(res.map_into_left_body())
        }
        Decision::Limited { retry_after } => {
            warn!("Rate limit exceeded for {} on {}", client, req.path());
            let mut response = HttpResponse::TooManyRequests().json(ErrorBody::new(message));
            let headers = response.headers_mut();
            set_headers(headers, limiter.limit().max_requests, 0, retry_after);
            headers.insert(RETRY_AFTER, HeaderValue::from(ceil_secs(retry_after)));
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

fn set_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset: Duration) {
    headers.insert(HeaderName::from_static(LIMIT_HEADER), HeaderValue::from(limit));
    headers.insert(HeaderName::from_static(REMAINING_HEADER), HeaderValue::from(remaining));
    headers.insert(HeaderName::from_static(RESET_HEADER), HeaderValue::from(ceil_secs(reset)));
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// The socket peer address, or the forwarded client address behind a trusted proxy.
fn client_key(req: &ServiceRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = req.connection_info().realip_remote_addr() {
            return ip.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

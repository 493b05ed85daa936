//! Cross-cutting request handling: rate limits, body size cap, security headers,
//! CORS and the top-level error handler.

pub mod errors;
pub mod rate_limit;
pub mod security;

//! Shared data types for the sloka API.
//!
//! The `model` module holds the records and response fragments that the server
//! serialises, and `requests` holds the raw query-string shapes the handlers accept.

pub mod model;
pub mod requests;

// crates/rhtmx-resp/src/lib.rs
//! Response construction for RHTMX handlers.
//!
//! A [`ResponseBuilder`] wraps one output [`Sink`], collects status, header
//! and cookie mutations (directly or as [`ResponseOption`]s), then finishes
//! with exactly one emitter: `json`, `jsonp`, `string`, `html`, `stream`,
//! `serve_file`, `serve_file_as_download`, `redirect`, `no_content` or
//! `error`.
//!
//! ```ignore
//! use rhtmx_resp::*;
//!
//! let mut sink = BufferedSink::new();
//! ResponseBuilder::with_options(&mut sink, [with_status(StatusCode::CREATED), add_etag("\"v7\"")])
//!     .json(&json!({"id": 7}))?;
//! let response = sink.into_response();
//! ```

pub mod assemble;
pub mod builder;
pub mod config;
pub mod constants;
pub mod cookies;
pub mod emit;
pub mod encoder;
pub mod envelope;
pub mod error;
pub mod file_server;
pub mod options;
pub mod policy;
pub mod pool;
pub mod shortcuts;
pub mod sink;
pub mod status;

pub use assemble::{http_date, Link, RetryAfter, StrictTransportSecurity, Warning};
pub use builder::ResponseBuilder;
pub use config::RespConfig;
pub use constants::*;
pub use cookies::CookieStore;
pub use encoder::{JsonEncoder, PrettyJsonEncoder};
pub use envelope::ErrorEnvelope;
pub use error::{RespError, Result};
pub use file_server::{FileServer, StaticFileServer};
pub use options::*;
pub use shortcuts::*;
pub use sink::{copy_to_sink, BufferedSink, Sink, WireSink};
pub use status::status_text;

// Re-export the primitives handlers need alongside the builder
pub use axum;
pub use axum::http::StatusCode;
pub use axum::response::IntoResponse;
pub use cookie::Cookie;
pub use serde_json::json;

/// Ad-hoc JSON object payload.
pub type R = serde_json::Map<String, serde_json::Value>;

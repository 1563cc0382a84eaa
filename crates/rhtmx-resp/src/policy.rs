//! Header classification: single-valued vs. multi-valued.
//!
//! Single-valued headers keep only the first value passed to a set/add call.
//! Every other header is a list and supports both comma-joined `set` and
//! line-per-value `add`. Adding a header here is a table edit.

use std::collections::HashSet;

use axum::http::header::{self, HeaderName};
use once_cell::sync::Lazy;

use crate::constants::{HEADER_CONTENT_DPR, HEADER_DPR, HEADER_VIEWPORT_WIDTH, HEADER_WIDTH};

static SINGLE_VALUED: [HeaderName; 24] = [
    header::CONTENT_TYPE,
    header::ETAG,
    header::LAST_MODIFIED,
    header::CONTENT_LENGTH,
    header::USER_AGENT,
    header::HOST,
    header::REFERER,
    header::SERVER,
    header::DATE,
    header::LOCATION,
    header::RETRY_AFTER,
    header::CONTENT_DISPOSITION,
    header::CONTENT_ENCODING,
    header::CONTENT_LANGUAGE,
    header::CONTENT_LOCATION,
    header::IF_MODIFIED_SINCE,
    header::IF_UNMODIFIED_SINCE,
    header::IF_RANGE,
    header::STRICT_TRANSPORT_SECURITY,
    header::UPGRADE_INSECURE_REQUESTS,
    header::X_CONTENT_TYPE_OPTIONS,
    header::X_FRAME_OPTIONS,
    header::X_XSS_PROTECTION,
    header::CONTENT_RANGE,
];

const SINGLE_VALUED_EXTRA: &[&str] = &[
    HEADER_CONTENT_DPR,
    HEADER_DPR,
    HEADER_VIEWPORT_WIDTH,
    HEADER_WIDTH,
];

static SINGLE_VALUED_SET: Lazy<HashSet<HeaderName>> = Lazy::new(|| {
    SINGLE_VALUED
        .iter()
        .cloned()
        .chain(SINGLE_VALUED_EXTRA.iter().map(|name| HeaderName::from_static(*name)))
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Single,
    Multi,
}

pub fn classify(name: &HeaderName) -> HeaderKind {
    if SINGLE_VALUED_SET.contains(name) {
        HeaderKind::Single
    } else {
        HeaderKind::Multi
    }
}

pub fn is_single_valued(name: &HeaderName) -> bool {
    classify(name) == HeaderKind::Single
}

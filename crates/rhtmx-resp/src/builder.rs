// crates/rhtmx-resp/src/builder.rs — per-request response state: pending status, headers, cookies

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use cookie::Cookie;

use crate::cookies::{self, cookie_name, CookieStore};
use crate::encoder::JsonEncoder;
use crate::options::ResponseOption;
use crate::policy;
use crate::sink::{header_value, Sink};

/// Accumulates status, header and cookie mutations for one response, then
/// hands them to the sink exactly once through an emitter (`json`, `html`,
/// `redirect`, ...).
///
/// ```ignore
/// let mut sink = BufferedSink::new();
/// ResponseBuilder::with_options(&mut sink, [with_status(StatusCode::CREATED)])
///     .json(&json!({"id": 7}))?;
/// ```
pub struct ResponseBuilder<S: Sink> {
    pub(crate) sink: S,
    pub(crate) status: Option<StatusCode>,
    pub(crate) headers: HeaderMap,
    /// Names whose sink lines are dropped at flush: set, deleted or
    /// single-valued. Every other pending line is appended.
    pub(crate) replace: HashSet<HeaderName>,
    pub(crate) cookies: CookieStore,
    pub(crate) json_encoder: Option<Arc<dyn JsonEncoder>>,
}

impl<S: Sink> ResponseBuilder<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            status: None,
            headers: HeaderMap::new(),
            replace: HashSet::new(),
            cookies: CookieStore::new(),
            json_encoder: None,
        }
    }

    /// New builder with `options` applied in order.
    pub fn with_options<I>(sink: S, options: I) -> Self
    where
        I: IntoIterator<Item = ResponseOption>,
    {
        let mut builder = Self::new(sink);
        builder.apply_all(options);
        builder
    }

    pub fn apply(&mut self, option: ResponseOption) -> &mut Self {
        option.apply(self);
        self
    }

    pub fn apply_all<I>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = ResponseOption>,
    {
        for option in options {
            option.apply(self);
        }
        self
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// Pending status; `None` until set explicitly or by an emitter default.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Fills in defaults without overriding caller choices: the content type
    /// only when none is pending or already on the sink, the status only while
    /// still unset.
    pub fn prepare(&mut self, default_status: StatusCode, default_content_type: Option<&str>) {
        if let Some(content_type) = default_content_type {
            let present = self.headers.contains_key(header::CONTENT_TYPE)
                || self.sink.headers().contains_key(header::CONTENT_TYPE);
            if !present {
                if let Some(value) = header_value(content_type) {
                    self.headers.insert(header::CONTENT_TYPE, value);
                    self.replace.insert(header::CONTENT_TYPE);
                }
            }
        }

        if self.status.is_none() {
            self.status = Some(default_status);
        }
    }

    // ------------------------------------------------------------------
    // Headers
    // ------------------------------------------------------------------

    /// Replaces `key`. Single-valued headers keep the first value only; list
    /// headers are joined with `,` into one line.
    pub fn set_header<I, V>(&mut self, key: impl AsRef<str>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let Some(name) = parse_name(key.as_ref()) else {
            return self;
        };
        let values: Vec<String> = values.into_iter().map(|v| v.as_ref().to_owned()).collect();

        let line = match values.first() {
            Some(first) if policy::is_single_valued(&name) => first.clone(),
            _ => values.join(","),
        };
        if let Some(value) = header_value(&line) {
            self.headers.insert(name.clone(), value);
            self.replace.insert(name);
        }
        self
    }

    /// Appends to `key`, one line per value. Single-valued headers degrade to
    /// [`set_header`](Self::set_header) with the first value.
    pub fn add_header<I, V>(&mut self, key: impl AsRef<str>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let Some(name) = parse_name(key.as_ref()) else {
            return self;
        };

        if policy::is_single_valued(&name) {
            if let Some(first) = values.into_iter().next() {
                if let Some(value) = header_value(first.as_ref()) {
                    self.headers.insert(name.clone(), value);
                    self.replace.insert(name);
                }
            }
            return self;
        }

        for v in values {
            if let Some(value) = header_value(v.as_ref()) {
                self.headers.append(name.clone(), value);
            }
        }
        self
    }

    /// Removes `key` from the pending headers and from the sink at flush.
    pub fn del_header(&mut self, key: impl AsRef<str>) -> &mut Self {
        if let Some(name) = parse_name(key.as_ref()) {
            self.headers.remove(&name);
            self.replace.insert(name);
        }
        self
    }

    /// Drops every pending header. Lines already on the sink are kept.
    pub fn clear_headers(&mut self) -> &mut Self {
        self.headers.clear();
        self.replace.clear();
        self
    }

    /// First pending value of `key`.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)?.to_str().ok()
    }

    /// Every pending value of `key`, one per line.
    pub fn header_values(&self, key: &str) -> Vec<&str> {
        self.headers
            .get_all(key)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    // ------------------------------------------------------------------
    // Cookies
    // ------------------------------------------------------------------

    /// Queues a cookie. Existing cookies with the same name are kept.
    pub fn set_cookie(&mut self, cookie: Cookie<'static>) -> &mut Self {
        self.cookies.push(cookie);
        self
    }

    /// Queues a cookie after dropping every queued cookie with its name.
    pub fn bind_cookie(&mut self, cookie: Cookie<'static>) -> &mut Self {
        let name = cookie.name().to_owned();
        self.del_cookie(&name);
        self.cookies.push(cookie);
        self
    }

    /// Drops every queued cookie named exactly `name`, including raw
    /// `Set-Cookie` lines added through the header API.
    pub fn del_cookie(&mut self, name: &str) -> &mut Self {
        self.cookies.remove(name);

        let kept: Vec<HeaderValue> = self
            .headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter(|line| match line.to_str() {
                Ok(line) => cookie_name(line) != name,
                Err(_) => true,
            })
            .cloned()
            .collect();
        self.headers.remove(header::SET_COOKIE);
        for line in kept {
            self.headers.append(header::SET_COOKIE, line);
        }
        self
    }

    /// Drops every queued cookie and every `Set-Cookie` line, including
    /// those already on the sink.
    pub fn clear_cookies(&mut self) -> &mut Self {
        self.cookies.clear();
        self.headers.remove(header::SET_COOKIE);
        self.replace.insert(header::SET_COOKIE);
        self
    }

    /// Queues a directive telling the client to delete `name`.
    pub fn expired_cookie(&mut self, name: impl Into<String>) -> &mut Self {
        self.cookies.push(cookies::expired(name));
        self
    }

    pub fn cookies(&self) -> &CookieStore {
        &self.cookies
    }

    // ------------------------------------------------------------------
    // JSON encoder
    // ------------------------------------------------------------------

    pub fn set_json_encoder(&mut self, encoder: Arc<dyn JsonEncoder>) -> &mut Self {
        self.json_encoder = Some(encoder);
        self
    }

    pub fn json_encoder(&self) -> Option<&Arc<dyn JsonEncoder>> {
        self.json_encoder.as_ref()
    }

    // ------------------------------------------------------------------
    // Sink
    // ------------------------------------------------------------------

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Moves pending headers and cookies onto the sink without committing.
    /// Set, deleted and single-valued names replace the sink's lines; added
    /// list lines and cookies are appended after them.
    pub(crate) fn flush_headers(&mut self) {
        let pending = std::mem::take(&mut self.headers);
        let target = self.sink.headers_mut();

        for name in self.replace.drain() {
            target.remove(&name);
        }
        for (name, value) in pending.iter() {
            target.append(name.clone(), value.clone());
        }

        for cookie in self.cookies.iter() {
            if let Some(value) = header_value(&cookie.to_string()) {
                target.append(header::SET_COOKIE, value);
            }
        }
        self.cookies.clear();
    }

    /// Flushes headers and writes the head with the pending status.
    pub(crate) fn commit(&mut self) -> io::Result<()> {
        let status = self.status.unwrap_or(StatusCode::OK);
        self.flush_headers();
        tracing::debug!(
            %status,
            headers = self.sink.headers().len(),
            "committing response head"
        );
        self.sink.write_head(status)
    }
}

fn parse_name(key: &str) -> Option<HeaderName> {
    match HeaderName::from_bytes(key.as_bytes()) {
        Ok(name) => Some(name),
        Err(_) => {
            tracing::warn!("skipping invalid header name: {:?}", key);
            None
        }
    }
}

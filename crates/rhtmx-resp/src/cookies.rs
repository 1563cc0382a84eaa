// crates/rhtmx-resp/src/cookies.rs — queued Set-Cookie directives with name-keyed replace/delete
use cookie::Cookie;
use time::{Duration, OffsetDateTime};

/// Ordered list of cookies waiting to be emitted as `Set-Cookie` lines.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    cookies: Vec<Cookie<'static>>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends unconditionally; duplicate names are kept.
    pub fn push(&mut self, cookie: Cookie<'static>) {
        self.cookies.push(cookie);
    }

    /// Removes every cookie sharing this cookie's name, then appends it.
    pub fn bind(&mut self, cookie: Cookie<'static>) {
        self.remove(cookie.name());
        self.cookies.push(cookie);
    }

    /// Removes every cookie whose name equals `name` exactly.
    /// Returns how many were dropped.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|c| c.name() != name);
        before - self.cookies.len()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Last queued cookie with this name.
    pub fn get(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().rev().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.cookies.iter()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// A deletion directive: value `deleted`, path `/`, expired at the Unix epoch
/// and `Max-Age=0`.
pub fn expired(name: impl Into<String>) -> Cookie<'static> {
    Cookie::build((name.into(), "deleted"))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(Duration::ZERO)
        .build()
}

/// Name token of a raw `Set-Cookie` line: everything before the first `=`.
pub fn cookie_name(line: &str) -> &str {
    let pair = line.split(';').next().unwrap_or(line);
    match pair.split_once('=') {
        Some((name, _)) => name.trim(),
        None => pair.trim(),
    }
}

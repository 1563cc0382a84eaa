// crates/rhtmx-resp/src/assemble.rs — structured header value builders
//
// Field order is fixed in every grammar here; some clients parse these
// values positionally.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Formats a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

// ============================================================================
// Warning
// ============================================================================

/// One `Warning` directive: `<code>[ <agent>][ "<text>"][ "<date>"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub code: u16,
    pub agent: Option<String>,
    pub text: String,
    pub date: Option<DateTime<Utc>>,
}

impl Warning {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            agent: None,
            text: text.into(),
            date: None,
        }
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(agent) = self.agent.as_deref().filter(|a| !a.is_empty()) {
            write!(f, " {}", agent)?;
        }
        if !self.text.is_empty() {
            write!(f, " \"{}\"", self.text)?;
        }
        if let Some(date) = self.date {
            write!(f, " \"{}\"", http_date(date))?;
        }
        Ok(())
    }
}

// ============================================================================
// Link
// ============================================================================

/// One `Link` directive: `<uri>; rel="..."[; type="..."][; title="..."]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub uri: String,
    pub rel: String,
    pub media_type: Option<String>,
    pub title: Option<String>,
}

impl Link {
    pub fn new(uri: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            rel: rel.into(),
            media_type: None,
            title: None,
        }
    }

    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>; rel=\"{}\"", self.uri, self.rel)?;
        if let Some(media_type) = self.media_type.as_deref().filter(|t| !t.is_empty()) {
            write!(f, "; type=\"{}\"", media_type)?;
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            write!(f, "; title=\"{}\"", title)?;
        }
        Ok(())
    }
}

// ============================================================================
// Content-Disposition
// ============================================================================

/// `attachment; filename="report.pdf"`, or with `utf8` set the RFC 5987 form
/// `attachment; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf`.
pub fn content_disposition(disposition: &str, filename: &str, utf8: bool) -> String {
    if utf8 {
        format!(
            "{}; filename*=UTF-8''{}",
            disposition,
            urlencoding::encode(filename)
        )
    } else {
        format!("{}; filename=\"{}\"", disposition, filename)
    }
}

// ============================================================================
// Strict-Transport-Security
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictTransportSecurity {
    pub max_age: u64,
    pub include_sub_domains: bool,
    pub preload: bool,
}

impl StrictTransportSecurity {
    pub fn new(max_age: u64) -> Self {
        Self {
            max_age,
            include_sub_domains: false,
            preload: false,
        }
    }

    pub fn include_sub_domains(mut self) -> Self {
        self.include_sub_domains = true;
        self
    }

    pub fn preload(mut self) -> Self {
        self.preload = true;
        self
    }
}

impl fmt::Display for StrictTransportSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max-age={}", self.max_age)?;
        if self.include_sub_domains {
            f.write_str("; includeSubDomains")?;
        }
        if self.preload {
            f.write_str("; preload")?;
        }
        Ok(())
    }
}

// ============================================================================
// Retry-After
// ============================================================================

/// A `Retry-After` value. Seconds and durations render as delta-seconds,
/// timestamps as an HTTP-date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAfter {
    Seconds(u64),
    At(DateTime<Utc>),
    After(Duration),
}

impl fmt::Display for RetryAfter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryAfter::Seconds(secs) => write!(f, "{}", secs),
            RetryAfter::At(at) => f.write_str(&http_date(*at)),
            RetryAfter::After(delay) => write!(f, "{}", delay.as_secs()),
        }
    }
}

impl From<u64> for RetryAfter {
    fn from(secs: u64) -> Self {
        RetryAfter::Seconds(secs)
    }
}

impl From<u32> for RetryAfter {
    fn from(secs: u32) -> Self {
        RetryAfter::Seconds(secs.into())
    }
}

impl From<DateTime<Utc>> for RetryAfter {
    fn from(at: DateTime<Utc>) -> Self {
        RetryAfter::At(at)
    }
}

impl From<Duration> for RetryAfter {
    fn from(delay: Duration) -> Self {
        RetryAfter::After(delay)
    }
}

/// `bytes <start>-<end>/<total>`
pub fn content_range(start: u64, end: u64, total: u64) -> String {
    format!("bytes {}-{}/{}", start, end, total)
}

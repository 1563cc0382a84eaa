// crates/rhtmx-resp/src/options.rs — mutation commands applied to a builder before an emitter runs
//
// Options are plain data. `ResponseBuilder::with_options` applies them in
// order, so a later option for the same slot wins.

use std::fmt;
use std::sync::Arc;

use axum::http::header;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use cookie::Cookie;

use crate::assemble::{
    content_disposition, content_range, http_date, Link, RetryAfter, StrictTransportSecurity,
    Warning,
};
use crate::builder::ResponseBuilder;
use crate::constants::*;
use crate::encoder::JsonEncoder;
use crate::sink::Sink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// `add_header` semantics
    Add,
    /// `set_header` semantics
    Set,
}

pub enum ResponseOption {
    Status(StatusCode),
    Header {
        name: String,
        values: Vec<String>,
        mode: HeaderMode,
    },
    Cookie(Cookie<'static>),
    BindCookie(Cookie<'static>),
    JsonEncoder(Arc<dyn JsonEncoder>),
}

impl ResponseOption {
    pub fn apply<S: Sink>(self, builder: &mut ResponseBuilder<S>) {
        match self {
            ResponseOption::Status(status) => {
                builder.set_status(status);
            }
            ResponseOption::Header { name, values, mode } => match mode {
                HeaderMode::Add => {
                    builder.add_header(name, values);
                }
                HeaderMode::Set => {
                    builder.set_header(name, values);
                }
            },
            ResponseOption::Cookie(cookie) => {
                builder.set_cookie(cookie);
            }
            ResponseOption::BindCookie(cookie) => {
                builder.bind_cookie(cookie);
            }
            ResponseOption::JsonEncoder(encoder) => {
                builder.set_json_encoder(encoder);
            }
        }
    }
}

impl fmt::Debug for ResponseOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseOption::Status(status) => f.debug_tuple("Status").field(status).finish(),
            ResponseOption::Header { name, values, mode } => f
                .debug_struct("Header")
                .field("name", name)
                .field("values", values)
                .field("mode", mode)
                .finish(),
            ResponseOption::Cookie(c) => f.debug_tuple("Cookie").field(c).finish(),
            ResponseOption::BindCookie(c) => f.debug_tuple("BindCookie").field(c).finish(),
            ResponseOption::JsonEncoder(_) => f.write_str("JsonEncoder(..)"),
        }
    }
}

// ============================================================================
// Primitives
// ============================================================================

pub fn with_status(status: StatusCode) -> ResponseOption {
    ResponseOption::Status(status)
}

/// Adds header lines (see [`ResponseBuilder::add_header`]).
pub fn with_header<I, V>(key: impl AsRef<str>, values: I) -> ResponseOption
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    ResponseOption::Header {
        name: key.as_ref().to_owned(),
        values: values.into_iter().map(Into::into).collect(),
        mode: HeaderMode::Add,
    }
}

/// Replaces a header (see [`ResponseBuilder::set_header`]).
pub fn set_header<I, V>(key: impl AsRef<str>, values: I) -> ResponseOption
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    ResponseOption::Header {
        name: key.as_ref().to_owned(),
        values: values.into_iter().map(Into::into).collect(),
        mode: HeaderMode::Set,
    }
}

pub fn with_cookie(cookie: Cookie<'static>) -> ResponseOption {
    ResponseOption::Cookie(cookie)
}

pub fn bind_cookie(cookie: Cookie<'static>) -> ResponseOption {
    ResponseOption::BindCookie(cookie)
}

pub fn apply_json_encoder(encoder: impl JsonEncoder + 'static) -> ResponseOption {
    ResponseOption::JsonEncoder(Arc::new(encoder))
}

// ============================================================================
// Plain header options
// ============================================================================

macro_rules! single_value_options {
    ($( $(#[$meta:meta])* $fn_name:ident => $header:expr ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $fn_name(value: impl Into<String>) -> ResponseOption {
                with_header($header, [value])
            }
        )*
    };
}

macro_rules! list_options {
    ($( $(#[$meta:meta])* $fn_name:ident => $header:expr ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $fn_name<I, V>(values: I) -> ResponseOption
            where
                I: IntoIterator<Item = V>,
                V: Into<String>,
            {
                with_header($header, values)
            }
        )*
    };
}

single_value_options! {
    add_content_type => header::CONTENT_TYPE,
    add_etag => header::ETAG,
    add_server => header::SERVER,
    add_location => header::LOCATION,
    add_content_encoding => header::CONTENT_ENCODING,
    add_content_language => header::CONTENT_LANGUAGE,
    add_content_location => header::CONTENT_LOCATION,
    add_referrer_policy => header::REFERRER_POLICY,
    /// Usually `nosniff`.
    add_x_content_type_options => header::X_CONTENT_TYPE_OPTIONS,
    /// `DENY` or `SAMEORIGIN`.
    add_x_frame_options => header::X_FRAME_OPTIONS,
    add_x_xss_protection => header::X_XSS_PROTECTION,
}

list_options! {
    add_www_authenticate => header::WWW_AUTHENTICATE,
    add_proxy_authenticate => header::PROXY_AUTHENTICATE,
    add_cache_control => header::CACHE_CONTROL,
    add_pragma => header::PRAGMA,
    add_vary => header::VARY,
    add_allow => header::ALLOW,
    add_content_security_policy => header::CONTENT_SECURITY_POLICY,
    add_content_security_policy_report_only => header::CONTENT_SECURITY_POLICY_REPORT_ONLY,
    add_access_control_allow_origin => header::ACCESS_CONTROL_ALLOW_ORIGIN,
    add_access_control_allow_headers => header::ACCESS_CONTROL_ALLOW_HEADERS,
    add_access_control_allow_methods => header::ACCESS_CONTROL_ALLOW_METHODS,
    add_access_control_expose_headers => header::ACCESS_CONTROL_EXPOSE_HEADERS,
    add_accept_encoding => header::ACCEPT_ENCODING,
    add_connection => header::CONNECTION,
    add_transfer_encoding => header::TRANSFER_ENCODING,
}

// ============================================================================
// Typed header options
// ============================================================================

pub fn add_last_modified(at: DateTime<Utc>) -> ResponseOption {
    with_header(header::LAST_MODIFIED, [http_date(at)])
}

pub fn add_date(at: DateTime<Utc>) -> ResponseOption {
    with_header(header::DATE, [http_date(at)])
}

pub fn add_content_length(length: u64) -> ResponseOption {
    with_header(header::CONTENT_LENGTH, [length.to_string()])
}

/// Seconds, a [`std::time::Duration`] or an absolute `DateTime<Utc>`.
pub fn add_retry_after(value: impl Into<RetryAfter>) -> ResponseOption {
    with_header(header::RETRY_AFTER, [value.into().to_string()])
}

/// `add_content_disposition("attachment", "report.pdf", false)`
pub fn add_content_disposition(disposition: &str, filename: &str, utf8: bool) -> ResponseOption {
    with_header(
        header::CONTENT_DISPOSITION,
        [content_disposition(disposition, filename, utf8)],
    )
}

pub fn add_strict_transport_security(policy: StrictTransportSecurity) -> ResponseOption {
    with_header(header::STRICT_TRANSPORT_SECURITY, [policy.to_string()])
}

pub fn add_upgrade_insecure_requests(enable: bool) -> ResponseOption {
    let value = if enable { "1" } else { "0" };
    with_header(header::UPGRADE_INSECURE_REQUESTS, [value])
}

pub fn add_content_dpr(ratio: f64) -> ResponseOption {
    with_header(HEADER_CONTENT_DPR, [ratio.to_string()])
}

/// Client hint echoed back for device pixel ratio.
pub fn add_dpr(ratio: f64) -> ResponseOption {
    with_header(HEADER_DPR, [ratio.to_string()])
}

pub fn add_viewport_width(pixels: u32) -> ResponseOption {
    with_header(HEADER_VIEWPORT_WIDTH, [pixels.to_string()])
}

pub fn add_width(pixels: u32) -> ResponseOption {
    with_header(HEADER_WIDTH, [pixels.to_string()])
}

pub fn add_access_control_allow_credentials(enable: bool) -> ResponseOption {
    with_header(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, [enable.to_string()])
}

pub fn add_access_control_max_age(seconds: u64) -> ResponseOption {
    with_header(header::ACCESS_CONTROL_MAX_AGE, [seconds.to_string()])
}

/// Always replaces any pending `Content-Range`.
pub fn add_content_range(start: u64, end: u64, total: u64) -> ResponseOption {
    set_header(header::CONTENT_RANGE, [content_range(start, end, total)])
}

/// One `Warning` line per directive.
pub fn add_warning(warnings: impl IntoIterator<Item = Warning>) -> ResponseOption {
    with_header(header::WARNING, warnings.into_iter().map(|w| w.to_string()))
}

/// One `Link` line per directive.
pub fn add_link(links: impl IntoIterator<Item = Link>) -> ResponseOption {
    with_header(header::LINK, links.into_iter().map(|l| l.to_string()))
}

// ============================================================================
// Content-type shorthands
// ============================================================================

pub fn as_text_xml() -> ResponseOption {
    add_content_type(MIME_TEXT_XML)
}

pub fn as_text_html() -> ResponseOption {
    add_content_type(MIME_TEXT_HTML)
}

pub fn as_text_plain() -> ResponseOption {
    add_content_type(MIME_TEXT_PLAIN)
}

pub fn as_text_javascript() -> ResponseOption {
    add_content_type(MIME_TEXT_JAVASCRIPT)
}

pub fn as_application_xml() -> ResponseOption {
    add_content_type(MIME_APPLICATION_XML)
}

pub fn as_application_json() -> ResponseOption {
    add_content_type(MIME_APPLICATION_JSON)
}

pub fn as_application_javascript() -> ResponseOption {
    add_content_type(MIME_APPLICATION_JAVASCRIPT)
}

pub fn as_application_form() -> ResponseOption {
    add_content_type(MIME_APPLICATION_FORM)
}

pub fn as_octet_stream() -> ResponseOption {
    add_content_type(MIME_OCTET_STREAM)
}

pub fn as_multipart_form() -> ResponseOption {
    add_content_type(MIME_MULTIPART_FORM)
}

pub fn as_text_xml_charset_utf8() -> ResponseOption {
    add_content_type(MIME_TEXT_XML_CHARSET_UTF8)
}

pub fn as_text_html_charset_utf8() -> ResponseOption {
    add_content_type(MIME_TEXT_HTML_CHARSET_UTF8)
}

pub fn as_text_plain_charset_utf8() -> ResponseOption {
    add_content_type(MIME_TEXT_PLAIN_CHARSET_UTF8)
}

pub fn as_text_javascript_charset_utf8() -> ResponseOption {
    add_content_type(MIME_TEXT_JAVASCRIPT_CHARSET_UTF8)
}

pub fn as_application_xml_charset_utf8() -> ResponseOption {
    add_content_type(MIME_APPLICATION_XML_CHARSET_UTF8)
}

pub fn as_application_json_charset_utf8() -> ResponseOption {
    add_content_type(MIME_APPLICATION_JSON_CHARSET_UTF8)
}

pub fn as_application_javascript_charset_utf8() -> ResponseOption {
    add_content_type(MIME_APPLICATION_JAVASCRIPT_CHARSET_UTF8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferedSink;

    fn build(options: Vec<ResponseOption>) -> ResponseBuilder<BufferedSink> {
        ResponseBuilder::with_options(BufferedSink::new(), options)
    }

    #[test]
    fn test_later_status_wins() {
        let r = build(vec![
            with_status(StatusCode::CREATED),
            with_status(StatusCode::ACCEPTED),
        ]);
        assert_eq!(r.status(), Some(StatusCode::ACCEPTED));
    }

    #[test]
    fn test_with_header_adds_lines() {
        let r = build(vec![
            add_vary(["Accept"]),
            add_vary(["Origin", "Cookie"]),
        ]);
        assert_eq!(r.header_values("vary"), vec!["Accept", "Origin", "Cookie"]);
    }

    #[test]
    fn test_single_value_option_overrides() {
        let r = build(vec![as_text_plain(), as_application_json_charset_utf8()]);
        assert_eq!(
            r.header_values("content-type"),
            vec!["application/json; charset=utf-8"]
        );
    }

    #[test]
    fn test_set_header_option_joins() {
        let r = build(vec![set_header("X-Tags", ["a", "b", "c"])]);
        assert_eq!(r.header("x-tags"), Some("a,b,c"));
    }

    #[test]
    fn test_upgrade_insecure_requests() {
        let r = build(vec![add_upgrade_insecure_requests(true)]);
        assert_eq!(r.header("upgrade-insecure-requests"), Some("1"));
        let r = build(vec![add_upgrade_insecure_requests(false)]);
        assert_eq!(r.header("upgrade-insecure-requests"), Some("0"));
    }

    #[test]
    fn test_numeric_options() {
        let r = build(vec![
            add_content_length(512),
            add_content_dpr(2.0),
            add_access_control_max_age(600),
            add_access_control_allow_credentials(true),
        ]);
        assert_eq!(r.header("content-length"), Some("512"));
        assert_eq!(r.header("content-dpr"), Some("2"));
        assert_eq!(r.header("access-control-max-age"), Some("600"));
        assert_eq!(r.header("access-control-allow-credentials"), Some("true"));
    }

    #[test]
    fn test_client_hint_options() {
        let r = build(vec![
            add_dpr(1.5),
            add_viewport_width(1280),
            add_width(640),
            add_width(320),
        ]);
        assert_eq!(r.header("dpr"), Some("1.5"));
        assert_eq!(r.header("viewport-width"), Some("1280"));
        assert_eq!(r.header_values("width"), vec!["640"]);
    }

    #[test]
    fn test_transport_list_options() {
        let r = build(vec![
            add_accept_encoding(["gzip", "br"]),
            add_connection(["keep-alive"]),
            add_transfer_encoding(["chunked"]),
        ]);
        assert_eq!(r.header_values("accept-encoding"), vec!["gzip", "br"]);
        assert_eq!(r.header("connection"), Some("keep-alive"));
        assert_eq!(r.header("transfer-encoding"), Some("chunked"));
    }

    #[test]
    fn test_content_range_replaces() {
        let r = build(vec![add_content_range(0, 9, 100), add_content_range(10, 19, 100)]);
        assert_eq!(r.header_values("content-range"), vec!["bytes 10-19/100"]);
    }

    #[test]
    fn test_warning_and_link_lines() {
        let r = build(vec![
            add_warning([Warning::new(110, "stale"), Warning::new(199, "misc")]),
            add_link([Link::new("/p/2", "next"), Link::new("/p/0", "prev")]),
        ]);
        assert_eq!(
            r.header_values("warning"),
            vec![r#"110 "stale""#, r#"199 "misc""#]
        );
        assert_eq!(
            r.header_values("link"),
            vec![r#"</p/2>; rel="next""#, r#"</p/0>; rel="prev""#]
        );
    }

    #[test]
    fn test_cookie_options() {
        let r = build(vec![
            with_cookie(Cookie::new("a", "1")),
            with_cookie(Cookie::new("a", "2")),
            with_cookie(Cookie::new("b", "3")),
            bind_cookie(Cookie::new("a", "4")),
        ]);
        let pairs: Vec<_> = r.cookies().iter().map(|c| (c.name(), c.value())).collect();
        assert_eq!(pairs, vec![("b", "3"), ("a", "4")]);
    }

    #[test]
    fn test_json_encoder_option() {
        let r = build(vec![apply_json_encoder(crate::encoder::PrettyJsonEncoder)]);
        assert!(r.json_encoder().is_some());
        assert_eq!(
            format!("{:?}", apply_json_encoder(crate::encoder::PrettyJsonEncoder)),
            "JsonEncoder(..)"
        );
    }
}

// crates/rhtmx-resp/src/constants.rs — MIME types used as emitter defaults and header names the http crate does not define

pub const MIME_TEXT_XML: &str = "text/xml";
pub const MIME_TEXT_HTML: &str = "text/html";
pub const MIME_TEXT_PLAIN: &str = "text/plain";
pub const MIME_TEXT_JAVASCRIPT: &str = "text/javascript";
pub const MIME_APPLICATION_XML: &str = "application/xml";
pub const MIME_APPLICATION_JSON: &str = "application/json";
pub const MIME_APPLICATION_JAVASCRIPT: &str = "application/javascript";
pub const MIME_APPLICATION_FORM: &str = "application/x-www-form-urlencoded";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
pub const MIME_MULTIPART_FORM: &str = "multipart/form-data";

pub const MIME_TEXT_XML_CHARSET_UTF8: &str = "text/xml; charset=utf-8";
pub const MIME_TEXT_HTML_CHARSET_UTF8: &str = "text/html; charset=utf-8";
pub const MIME_TEXT_PLAIN_CHARSET_UTF8: &str = "text/plain; charset=utf-8";
pub const MIME_TEXT_JAVASCRIPT_CHARSET_UTF8: &str = "text/javascript; charset=utf-8";
pub const MIME_APPLICATION_XML_CHARSET_UTF8: &str = "application/xml; charset=utf-8";
pub const MIME_APPLICATION_JSON_CHARSET_UTF8: &str = "application/json; charset=utf-8";
pub const MIME_APPLICATION_JAVASCRIPT_CHARSET_UTF8: &str =
    "application/javascript; charset=utf-8";

// Client hint headers
pub const HEADER_CONTENT_DPR: &str = "content-dpr";
pub const HEADER_DPR: &str = "dpr";
pub const HEADER_VIEWPORT_WIDTH: &str = "viewport-width";
pub const HEADER_WIDTH: &str = "width";

// crates/rhtmx-resp/src/shortcuts.rs — one-call helpers: build, apply options, emit
//
//     rhtmx_resp::json(&mut sink, &json!({"ok": true}), [with_status(StatusCode::CREATED)])?;

use std::io::Read;
use std::path::Path;

use axum::http::request::Parts;
use axum::http::StatusCode;
use serde::Serialize;

use crate::builder::ResponseBuilder;
use crate::error::Result;
use crate::options::{with_status, ResponseOption};
use crate::sink::Sink;

pub fn json<S, T, I>(sink: S, data: &T, options: I) -> Result<()>
where
    S: Sink,
    T: Serialize + ?Sized,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, options).json(data)
}

pub fn jsonp<S, T, I>(sink: S, data: &T, callback: &str, options: I) -> Result<()>
where
    S: Sink,
    T: Serialize + ?Sized,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, options).jsonp(data, callback)
}

pub fn string<S, I>(sink: S, text: &str, options: I) -> Result<()>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, options).string(text)
}

pub fn html<S, I>(sink: S, html: &str, options: I) -> Result<()>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, options).html(html)
}

/// Error envelope whose response status is `code` unless an option says
/// otherwise.
pub fn error<S, I>(sink: S, code: StatusCode, message: Option<&str>, options: I) -> Result<()>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    seeded(sink, code, options).error(code, message)
}

pub fn stream<S, R, I>(sink: S, reader: R, options: I) -> Result<()>
where
    S: Sink,
    R: Read,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, options).stream(reader)
}

pub fn serve_file<S, I>(sink: S, request: &Parts, path: impl AsRef<Path>, options: I) -> Result<()>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, options).serve_file(request, path)
}

pub fn serve_file_as_download<S, I>(sink: S, file_name: &str, data: &[u8], options: I) -> Result<()>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, options).serve_file_as_download(file_name, data)
}

/// `302` unless an option picks another redirect status.
pub fn redirect<S, I>(sink: S, url: &str, options: I) -> Result<()>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    seeded(sink, StatusCode::FOUND, options).redirect(url)
}

pub fn no_content<S, I>(sink: S, options: I) -> Result<()>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    seeded(sink, StatusCode::NO_CONTENT, options).no_content()
}

fn seeded<S, I>(sink: S, status: StatusCode, options: I) -> ResponseBuilder<S>
where
    S: Sink,
    I: IntoIterator<Item = ResponseOption>,
{
    ResponseBuilder::with_options(sink, std::iter::once(with_status(status)).chain(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::as_text_plain;
    use crate::sink::BufferedSink;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_shortcut_uses_code_as_status() {
        let mut sink = BufferedSink::new();
        error(&mut sink, StatusCode::NOT_FOUND, Some("not found"), []).unwrap();
        assert_eq!(sink.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(sink.body_text(), "{\"code\":404,\"message\":\"not found\"}\n");
    }

    #[test]
    fn test_caller_options_follow_seed() {
        let mut sink = BufferedSink::new();
        redirect(&mut sink, "/next", [with_status(StatusCode::SEE_OTHER)]).unwrap();
        assert_eq!(sink.status(), Some(StatusCode::SEE_OTHER));
        assert_eq!(sink.header("location"), Some("/next"));
    }

    #[test]
    fn test_string_shortcut_with_option() {
        let mut sink = BufferedSink::new();
        string(&mut sink, "plain", [as_text_plain()]).unwrap();
        assert_eq!(sink.header("content-type"), Some("text/plain"));
        assert_eq!(sink.body_text(), "plain");
    }
}

// crates/rhtmx-resp/src/emit.rs — body emitters: each one prepares, commits once and writes
use std::io::Read;
use std::path::Path;

use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use serde::Serialize;

use crate::assemble::content_disposition;
use crate::builder::ResponseBuilder;
use crate::config;
use crate::constants::*;
use crate::encoder::encode_default;
use crate::envelope::ErrorEnvelope;
use crate::error::{RespError, Result};
use crate::file_server::{FileServer, StaticFileServer};
use crate::pool;
use crate::sink::{copy_to_sink, Sink};

impl<S: Sink> ResponseBuilder<S> {
    // ========================================================================
    // JSON
    // ========================================================================

    /// Sends `data` as JSON. Defaults: `200`,
    /// `application/json; charset=utf-8`.
    ///
    /// The document is encoded before anything is committed, so an encode
    /// error leaves the sink untouched.
    pub fn json<T>(mut self, data: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let mut buf = pool::json_pool().acquire();
        self.encode_json(&mut buf, data)?;

        self.prepare(StatusCode::OK, Some(MIME_APPLICATION_JSON_CHARSET_UTF8));
        self.commit()?;
        self.sink.write_body(&buf)?;
        Ok(())
    }

    /// Sends `callback(<json>);`. Defaults: `200`,
    /// `application/javascript; charset=utf-8`.
    pub fn jsonp<T>(mut self, data: &T, callback: &str) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let mut encoded = pool::json_pool().acquire();
        self.encode_json(&mut encoded, data)?;
        if encoded.last() == Some(&b'\n') {
            encoded.pop();
        }

        let mut body = pool::json_pool().acquire();
        body.extend_from_slice(callback.as_bytes());
        body.push(b'(');
        body.extend_from_slice(&encoded);
        body.extend_from_slice(b");");

        self.prepare(StatusCode::OK, Some(MIME_APPLICATION_JAVASCRIPT_CHARSET_UTF8));
        self.commit()?;
        self.sink.write_body(&body)?;
        Ok(())
    }

    fn encode_json<T>(&self, buf: &mut Vec<u8>, data: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        match &self.json_encoder {
            Some(encoder) => {
                let value = serde_json::to_value(data)?;
                encoder
                    .encode(buf, &value)
                    .map_err(RespError::CustomEncode)
            }
            None => Ok(encode_default(buf, data)?),
        }
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Defaults: `200`, `text/plain; charset=utf-8`.
    pub fn string(self, text: &str) -> Result<()> {
        self.text(text, MIME_TEXT_PLAIN_CHARSET_UTF8)
    }

    /// Defaults: `200`, `text/html; charset=utf-8`.
    pub fn html(self, html: &str) -> Result<()> {
        self.text(html, MIME_TEXT_HTML_CHARSET_UTF8)
    }

    fn text(mut self, text: &str, content_type: &str) -> Result<()> {
        self.prepare(StatusCode::OK, Some(content_type));
        self.commit()?;

        let cfg = config::get();
        if text.len() <= cfg.body.large_string_threshold {
            self.sink.write_body(text.as_bytes())?;
            return Ok(());
        }

        let mut scratch = pool::large_pool().acquire();
        scratch.resize(cfg.chunk_size(), 0);
        copy_to_sink(&mut text.as_bytes(), &mut self.sink, &mut scratch[..])?;
        Ok(())
    }

    // ========================================================================
    // Streams and files
    // ========================================================================

    /// Copies `reader` to the sink in fixed-size chunks. Defaults: `200`,
    /// `application/octet-stream`. Stops at the first read or write error.
    pub fn stream<R: Read>(mut self, mut reader: R) -> Result<()> {
        self.prepare(StatusCode::OK, Some(MIME_OCTET_STREAM));
        self.commit()?;

        let mut scratch = pool::large_pool().acquire();
        scratch.resize(config::get().chunk_size(), 0);
        let copied = copy_to_sink(&mut reader, &mut self.sink, &mut scratch[..])?;
        tracing::trace!(bytes = copied, "stream copied");
        Ok(())
    }

    /// Serves `path` with the built-in [`StaticFileServer`].
    pub fn serve_file(self, request: &Parts, path: impl AsRef<Path>) -> Result<()> {
        self.serve_file_with(&StaticFileServer::default(), request, path)
    }

    /// Hands the response to `server` after flushing pending headers and
    /// cookies. The server writes the status line itself.
    pub fn serve_file_with(
        mut self,
        server: &dyn FileServer,
        request: &Parts,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        // Extensionless paths (directories) are left for the server to sniff
        // from the file it resolves.
        let guessed = mime_guess::from_path(path).first();
        self.prepare(StatusCode::OK, guessed.as_ref().map(|m| m.as_ref()));
        self.flush_headers();

        tracing::debug!(path = %path.display(), method = %request.method, "delegating to file server");
        server.serve(request, path, &mut self.sink)
    }

    /// Sends `data` as an attachment named `file_name`.
    pub fn serve_file_as_download(self, file_name: &str, data: &[u8]) -> Result<()> {
        self.download(file_name, data, false)
    }

    /// Like [`serve_file_as_download`](Self::serve_file_as_download) with an
    /// RFC 5987 encoded file name, for non-ASCII names.
    pub fn serve_file_as_download_utf8(self, file_name: &str, data: &[u8]) -> Result<()> {
        self.download(file_name, data, true)
    }

    fn download(mut self, file_name: &str, data: &[u8], utf8: bool) -> Result<()> {
        self.set_header(
            header::CONTENT_DISPOSITION,
            [content_disposition("attachment", file_name, utf8)],
        );
        self.prepare(StatusCode::OK, Some(MIME_OCTET_STREAM));
        self.commit()?;
        self.sink.write_body(data)?;
        Ok(())
    }

    // ========================================================================
    // Bodiless
    // ========================================================================

    /// Redirects to `url`. Statuses outside `300..=308` become `302`.
    pub fn redirect(mut self, url: &str) -> Result<()> {
        self.prepare(StatusCode::FOUND, None);

        let requested = self.status.unwrap_or(StatusCode::FOUND);
        if !(300..=308).contains(&requested.as_u16()) {
            tracing::debug!(status = %requested, "not a redirect status, using 302");
            self.status = Some(StatusCode::FOUND);
        }

        self.set_header(header::LOCATION, [url]);
        self.commit()?;
        Ok(())
    }

    /// Always `204`, whatever status was set before.
    pub fn no_content(mut self) -> Result<()> {
        self.set_status(StatusCode::NO_CONTENT);
        self.prepare(StatusCode::NO_CONTENT, None);
        self.commit()?;
        Ok(())
    }

    /// Sends `{"code":..,"message":..}` through the JSON path. The response
    /// status is `500` unless one was set already; `code` only goes in the
    /// body.
    pub fn error(mut self, code: StatusCode, message: Option<&str>) -> Result<()> {
        if self.status.is_none() {
            self.status = Some(StatusCode::INTERNAL_SERVER_ERROR);
        }
        self.json(&ErrorEnvelope::new(code.as_u16(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{apply_json_encoder, with_status};
    use crate::sink::BufferedSink;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn emit<F>(f: F) -> BufferedSink
    where
        F: FnOnce(ResponseBuilder<&mut BufferedSink>) -> Result<()>,
    {
        let mut sink = BufferedSink::new();
        f(ResponseBuilder::new(&mut sink)).unwrap();
        sink
    }

    #[test]
    fn test_failing_encoder_leaves_sink_untouched() {
        let mut sink = BufferedSink::new();
        let failing = |_: &mut Vec<u8>, _: &serde_json::Value| -> anyhow::Result<()> {
            anyhow::bail!("encoder exploded")
        };
        let err = ResponseBuilder::with_options(&mut sink, [apply_json_encoder(failing)])
            .json(&json!({"a": 1}))
            .unwrap_err();

        assert!(err.is_encode());
        assert!(!sink.is_committed());
        assert!(sink.headers().is_empty());
    }

    #[test]
    fn test_unserialisable_map_key_is_encode_error() {
        let mut data = std::collections::HashMap::new();
        data.insert((1, 2), "tuple keys are not JSON");

        let mut sink = BufferedSink::new();
        let err = ResponseBuilder::new(&mut sink).json(&data).unwrap_err();
        assert!(matches!(err, RespError::Encode(_)));
        assert!(!sink.is_committed());
    }

    #[test]
    fn test_jsonp_trims_only_encoder_newline() {
        let sink = emit(|r| r.jsonp(&json!(["x"]), "handle"));
        assert_eq!(sink.body_text(), r#"handle(["x"]);"#);
    }

    #[test]
    fn test_error_keeps_explicit_status() {
        let mut sink = BufferedSink::new();
        ResponseBuilder::with_options(&mut sink, [with_status(StatusCode::BAD_REQUEST)])
            .error(StatusCode::UNPROCESSABLE_ENTITY, None)
            .unwrap();
        assert_eq!(sink.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            sink.body_text(),
            "{\"code\":422,\"message\":\"Unprocessable Entity\"}\n"
        );
    }

    #[test]
    fn test_large_string_is_chunked_transparently() {
        let text = "x".repeat(config::get().body.large_string_threshold * 3 + 17);
        let sink = emit(|r| r.string(&text));
        assert_eq!(sink.body().len(), text.len());
        assert_eq!(sink.header("content-type"), Some(MIME_TEXT_PLAIN_CHARSET_UTF8));
    }
}

// crates/rhtmx-resp/src/sink.rs — the per-response output contract and two adapters
use std::io::{self, Read, Write};

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::status::status_text;

/// Receives the head and body of exactly one response.
///
/// `write_head` commits at most once; later calls are ignored. Header
/// mutations after the commit do not reach the client.
pub trait Sink {
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn write_head(&mut self, status: StatusCode) -> io::Result<()>;

    /// Writes body bytes, committing an implicit `200 OK` head first if needed.
    fn write_body(&mut self, buf: &[u8]) -> io::Result<()>;

    fn is_committed(&self) -> bool;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        (**self).write_head(status)
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_body(buf)
    }

    fn is_committed(&self) -> bool {
        (**self).is_committed()
    }
}

/// Copies `reader` into the sink through `scratch`. Stops on the first read or
/// write error; interrupted reads are retried.
pub fn copy_to_sink<R, S>(reader: &mut R, sink: &mut S, scratch: &mut [u8]) -> io::Result<u64>
where
    R: Read + ?Sized,
    S: Sink + ?Sized,
{
    let mut written = 0u64;
    loop {
        let n = match reader.read(scratch) {
            Ok(0) => return Ok(written),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sink.write_body(&scratch[..n])?;
        written += n as u64;
    }
}

// ============================================================================
// BufferedSink
// ============================================================================

/// In-memory sink. Snapshots the headers at commit time and converts into an
/// axum [`Response`].
#[derive(Debug, Default)]
pub struct BufferedSink {
    headers: HeaderMap,
    head: Option<(StatusCode, HeaderMap)>,
    body: Vec<u8>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed status, `None` before commit.
    pub fn status(&self) -> Option<StatusCode> {
        self.head.as_ref().map(|(status, _)| *status)
    }

    /// Headers as committed, `None` before commit.
    pub fn committed_headers(&self) -> Option<&HeaderMap> {
        self.head.as_ref().map(|(_, headers)| headers)
    }

    /// First committed value of `name` as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.committed_headers()?.get(name)?.to_str().ok()
    }

    /// All committed values of `name`, one per header line.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        match self.committed_headers() {
            Some(headers) => headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Sink for BufferedSink {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        if self.head.is_some() {
            tracing::debug!(%status, "superfluous write_head ignored");
            return Ok(());
        }
        self.head = Some((status, self.headers.clone()));
        Ok(())
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.head.is_none() {
            self.write_head(StatusCode::OK)?;
        }
        self.body.extend_from_slice(buf);
        Ok(())
    }

    fn is_committed(&self) -> bool {
        self.head.is_some()
    }
}

impl IntoResponse for BufferedSink {
    fn into_response(self) -> Response {
        let (status, headers) = self.head.unwrap_or((StatusCode::OK, self.headers));
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

// ============================================================================
// WireSink
// ============================================================================

/// Serialises an HTTP/1.1 response onto any writer: status line, header
/// lines, blank line, then raw body bytes.
#[derive(Debug)]
pub struct WireSink<W: Write> {
    writer: W,
    headers: HeaderMap,
    committed: bool,
}

impl<W: Write> WireSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            headers: HeaderMap::new(),
            committed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WireSink<W> {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        if self.committed {
            tracing::debug!(%status, "superfluous write_head ignored");
            return Ok(());
        }
        self.committed = true;

        let reason = status
            .canonical_reason()
            .unwrap_or_else(|| status_text(status.as_u16()));
        let mut head = Vec::with_capacity(256);
        head.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", status.as_u16(), reason).as_bytes());
        for (name, value) in self.headers.iter() {
            head.extend_from_slice(name.as_str().as_bytes());
            head.extend_from_slice(b": ");
            head.extend_from_slice(value.as_bytes());
            head.extend_from_slice(b"\r\n");
        }
        head.extend_from_slice(b"\r\n");
        self.writer.write_all(&head)
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<()> {
        if !self.committed {
            self.write_head(StatusCode::OK)?;
        }
        self.writer.write_all(buf)
    }

    fn is_committed(&self) -> bool {
        self.committed
    }
}

/// Header value from a string, `None` when it contains forbidden bytes.
pub(crate) fn header_value(value: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(value) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("skipping invalid header value: {:?}", value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_buffered_head_commits_once() {
        let mut sink = BufferedSink::new();
        sink.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        sink.write_head(StatusCode::CREATED).unwrap();

        sink.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        sink.write_head(StatusCode::NOT_FOUND).unwrap();

        assert_eq!(sink.status(), Some(StatusCode::CREATED));
        assert_eq!(sink.header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_buffered_implicit_ok() {
        let mut sink = BufferedSink::new();
        sink.write_body(b"hi").unwrap();
        assert_eq!(sink.status(), Some(StatusCode::OK));
        assert_eq!(sink.body(), b"hi");
    }

    #[test]
    fn test_wire_sink_format() {
        let mut sink = WireSink::new(Vec::new());
        sink.headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from_static("2"));
        sink.write_head(StatusCode::OK).unwrap();
        sink.write_body(b"ok").unwrap();
        sink.write_head(StatusCode::NOT_FOUND).unwrap();

        let wire = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(wire, "HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nok");
    }

    #[test]
    fn test_copy_stops_on_write_error() {
        struct Failing;
        impl Sink for Failing {
            fn headers(&self) -> &HeaderMap {
                unreachable!()
            }
            fn headers_mut(&mut self) -> &mut HeaderMap {
                unreachable!()
            }
            fn write_head(&mut self, _: StatusCode) -> io::Result<()> {
                Ok(())
            }
            fn write_body(&mut self, _: &[u8]) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn is_committed(&self) -> bool {
                true
            }
        }

        let mut scratch = [0u8; 4];
        let err = copy_to_sink(&mut &b"abcdefgh"[..], &mut Failing, &mut scratch).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

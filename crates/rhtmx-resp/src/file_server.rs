// crates/rhtmx-resp/src/file_server.rs — static file delegate used by `serve_file`
//
// The delegate owns the status line: it decides between 200, 206, 304, 404,
// 412 and 416 and commits the head itself.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use axum::http::{header, request::Parts, HeaderName, HeaderValue, Method, StatusCode};
use chrono::{DateTime, SubsecRound, Utc};

use crate::assemble::{content_range, http_date};
use crate::config;
use crate::constants::MIME_TEXT_PLAIN_CHARSET_UTF8;
use crate::error::Result;
use crate::pool;
use crate::sink::{copy_to_sink, Sink};

/// Serves a file from disk into a sink, honouring conditional and range
/// request headers.
pub trait FileServer {
    fn serve(&self, request: &Parts, path: &Path, sink: &mut dyn Sink) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct StaticFileServer {
    chunk_size: usize,
    index_file: String,
}

impl StaticFileServer {
    pub fn new() -> Self {
        Self {
            chunk_size: config::get().chunk_size(),
            index_file: "index.html".to_string(),
        }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// File served when the path is a directory (default `index.html`).
    pub fn index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    fn open(&self, path: &Path) -> io::Result<(File, fs::Metadata, PathBuf)> {
        let resolved = if fs::metadata(path)?.is_dir() {
            path.join(&self.index_file)
        } else {
            path.to_path_buf()
        };
        let file = File::open(&resolved)?;
        let meta = file.metadata()?;
        if meta.is_dir() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "index is a directory"));
        }
        Ok((file, meta, resolved))
    }
}

impl Default for StaticFileServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FileServer for StaticFileServer {
    fn serve(&self, request: &Parts, path: &Path, sink: &mut dyn Sink) -> Result<()> {
        let (file, meta, resolved) = match self.open(path) {
            Ok(found) => found,
            Err(err) => return serve_error(sink, path, &err),
        };
        let size = meta.len();
        let modified = meta
            .modified()
            .ok()
            .map(|t| DateTime::<Utc>::from(t).trunc_subsecs(0));

        if let (Some(modified), Some(since)) =
            (modified, request_date(request, &header::IF_UNMODIFIED_SINCE))
        {
            if modified > since {
                sink.write_head(StatusCode::PRECONDITION_FAILED)?;
                return Ok(());
            }
        }

        let cacheable = request.method == Method::GET || request.method == Method::HEAD;
        if cacheable && !request.headers.contains_key(header::IF_NONE_MATCH) {
            if let (Some(modified), Some(since)) =
                (modified, request_date(request, &header::IF_MODIFIED_SINCE))
            {
                if modified <= since {
                    let headers = sink.headers_mut();
                    headers.remove(header::CONTENT_TYPE);
                    headers.remove(header::CONTENT_LENGTH);
                    sink.write_head(StatusCode::NOT_MODIFIED)?;
                    return Ok(());
                }
            }
        }

        let headers = sink.headers_mut();
        if let Some(modified) = modified {
            if !headers.contains_key(header::LAST_MODIFIED) {
                if let Ok(value) = HeaderValue::from_str(&http_date(modified)) {
                    headers.insert(header::LAST_MODIFIED, value);
                }
            }
        }
        if !headers.contains_key(header::CONTENT_TYPE) {
            let guessed = mime_guess::from_path(&resolved).first_or_octet_stream();
            if let Ok(value) = HeaderValue::from_str(guessed.as_ref()) {
                headers.insert(header::CONTENT_TYPE, value);
            }
        }
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

        let range = request
            .headers
            .get(header::RANGE)
            .and_then(|v| v.to_str().ok())
            .map(|v| parse_range(v, size))
            .unwrap_or(ByteRange::Full);

        let (status, start, len) = match range {
            ByteRange::Full => (StatusCode::OK, 0, size),
            ByteRange::Partial { start, end } => {
                if let Ok(value) = HeaderValue::from_str(&content_range(start, end, size)) {
                    headers.insert(header::CONTENT_RANGE, value);
                }
                (StatusCode::PARTIAL_CONTENT, start, end - start + 1)
            }
            ByteRange::Unsatisfiable => {
                if let Ok(value) = HeaderValue::from_str(&format!("bytes */{}", size)) {
                    headers.insert(header::CONTENT_RANGE, value);
                }
                headers.remove(header::CONTENT_TYPE);
                sink.write_head(StatusCode::RANGE_NOT_SATISFIABLE)?;
                return Ok(());
            }
        };
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

        tracing::debug!(path = %resolved.display(), %status, len, "serving file");
        sink.write_head(status)?;
        if request.method == Method::HEAD {
            return Ok(());
        }

        let mut file = file;
        if start > 0 {
            file.seek(SeekFrom::Start(start))?;
        }
        let mut scratch = pool::large_pool().acquire();
        scratch.resize(self.chunk_size, 0);
        copy_to_sink(&mut file.take(len), sink, &mut scratch[..])?;
        Ok(())
    }
}

fn serve_error(sink: &mut dyn Sink, path: &Path, err: &io::Error) -> Result<()> {
    let (status, text) = match err.kind() {
        io::ErrorKind::NotFound => (StatusCode::NOT_FOUND, "404 page not found"),
        io::ErrorKind::PermissionDenied => (StatusCode::FORBIDDEN, "403 Forbidden"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error"),
    };
    tracing::debug!(path = %path.display(), %status, "file not served: {}", err);

    let headers = sink.headers_mut();
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::CONTENT_DISPOSITION);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(MIME_TEXT_PLAIN_CHARSET_UTF8),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    sink.write_head(status)?;
    sink.write_body(format!("{}\n", text).as_bytes())?;
    Ok(())
}

/// Accepts the three HTTP-date forms: IMF-fixdate, RFC 850 and asctime.
fn request_date(request: &Parts, name: &HeaderName) -> Option<DateTime<Utc>> {
    let raw = request.headers.get(name)?.to_str().ok()?;
    httpdate::parse_http_date(raw).ok().map(DateTime::<Utc>::from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteRange {
    Full,
    Partial { start: u64, end: u64 },
    Unsatisfiable,
}

/// Single `bytes=` range. Multi-range and malformed headers fall back to the
/// full body.
fn parse_range(value: &str, size: u64) -> ByteRange {
    let Some(ranges) = value.trim().strip_prefix("bytes=") else {
        return ByteRange::Full;
    };
    if ranges.contains(',') {
        return ByteRange::Full;
    }
    let Some((first, last)) = ranges.split_once('-') else {
        return ByteRange::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        let Ok(suffix) = last.parse::<u64>() else {
            return ByteRange::Full;
        };
        if suffix == 0 || size == 0 {
            return ByteRange::Unsatisfiable;
        }
        let suffix = suffix.min(size);
        return ByteRange::Partial {
            start: size - suffix,
            end: size - 1,
        };
    }

    let Ok(start) = first.parse::<u64>() else {
        return ByteRange::Full;
    };
    if start >= size {
        return ByteRange::Unsatisfiable;
    }
    let end = if last.is_empty() {
        size - 1
    } else {
        match last.parse::<u64>() {
            Ok(end) if end >= start => end.min(size - 1),
            _ => return ByteRange::Full,
        }
    };
    ByteRange::Partial { start, end }
}

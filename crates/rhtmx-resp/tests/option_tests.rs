//! Integration tests for header options and the header policy as seen on the
//! committed response.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rhtmx_resp::*;

fn committed(options: Vec<ResponseOption>) -> BufferedSink {
    let mut sink = BufferedSink::new();
    ResponseBuilder::with_options(&mut sink, options)
        .no_content()
        .unwrap();
    sink
}

#[test]
fn test_single_valued_keeps_first_value() {
    let sink = committed(vec![with_header("ETag", ["\"a\"", "\"b\"", "\"c\""])]);
    assert_eq!(sink.header_values("etag"), vec!["\"a\""]);
}

#[test]
fn test_multi_valued_add_keeps_lines() {
    let sink = committed(vec![
        with_header("X-Trace", ["a"]),
        with_header("X-Trace", ["b"]),
    ]);
    assert_eq!(sink.header_values("x-trace"), vec!["a", "b"]);
}

#[test]
fn test_set_header_replaces_lines() {
    let sink = committed(vec![
        add_vary(["Accept"]),
        add_vary(["Origin"]),
        set_header("Vary", ["Cookie", "Accept-Encoding"]),
    ]);
    assert_eq!(sink.header_values("vary"), vec!["Cookie,Accept-Encoding"]);
}

#[test]
fn test_header_keys_case_insensitive() {
    let sink = committed(vec![
        with_header("x-request-id", ["1"]),
        with_header("X-REQUEST-ID", ["2"]),
    ]);
    assert_eq!(sink.header_values("X-Request-Id"), vec!["1", "2"]);
}

#[test]
fn test_security_headers() {
    let sink = committed(vec![
        add_strict_transport_security(
            StrictTransportSecurity::new(31_536_000)
                .include_sub_domains()
                .preload(),
        ),
        add_content_security_policy(["default-src 'self'", "img-src *"]),
        add_x_frame_options("DENY"),
        add_x_content_type_options("nosniff"),
        add_referrer_policy("no-referrer"),
    ]);

    assert_eq!(
        sink.header("strict-transport-security"),
        Some("max-age=31536000; includeSubDomains; preload")
    );
    assert_eq!(
        sink.header_values("content-security-policy"),
        vec!["default-src 'self'", "img-src *"]
    );
    assert_eq!(sink.header("x-frame-options"), Some("DENY"));
    assert_eq!(sink.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(sink.header("referrer-policy"), Some("no-referrer"));
}

#[test]
fn test_dates_are_http_dates() {
    let at = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
    let sink = committed(vec![add_last_modified(at), add_date(at)]);
    assert_eq!(sink.header("last-modified"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
    assert_eq!(sink.header("date"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
}

#[test]
fn test_retry_after_forms() {
    let at = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();

    let sink = committed(vec![add_retry_after(120u64)]);
    assert_eq!(sink.header("retry-after"), Some("120"));

    let sink = committed(vec![add_retry_after(Duration::from_millis(90_900))]);
    assert_eq!(sink.header("retry-after"), Some("90"));

    let sink = committed(vec![add_retry_after(at)]);
    assert_eq!(sink.header("retry-after"), Some("Wed, 21 Oct 2015 07:28:00 GMT"));
}

#[test]
fn test_warning_and_link_grammar() {
    let at = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
    let sink = committed(vec![
        add_warning([Warning::new(110, "Response is stale")
            .agent("cache.example")
            .date(at)]),
        add_link([Link::new("/style.css", "preload")
            .media_type("text/css")
            .title("main")]),
    ]);

    assert_eq!(
        sink.header("warning"),
        Some(r#"110 cache.example "Response is stale" "Sun, 06 Nov 1994 08:49:37 GMT""#)
    );
    assert_eq!(
        sink.header("link"),
        Some(r#"</style.css>; rel="preload"; type="text/css"; title="main""#)
    );
}

#[test]
fn test_cors_headers() {
    let sink = committed(vec![
        add_access_control_allow_origin(["https://app.example"]),
        add_access_control_allow_methods(["GET", "POST"]),
        add_access_control_allow_headers(["Content-Type"]),
        add_access_control_expose_headers(["X-Total"]),
        add_access_control_allow_credentials(true),
        add_access_control_max_age(86_400),
    ]);

    assert_eq!(
        sink.header("access-control-allow-origin"),
        Some("https://app.example")
    );
    assert_eq!(
        sink.header_values("access-control-allow-methods"),
        vec!["GET", "POST"]
    );
    assert_eq!(sink.header("access-control-allow-headers"), Some("Content-Type"));
    assert_eq!(sink.header("access-control-expose-headers"), Some("X-Total"));
    assert_eq!(sink.header("access-control-allow-credentials"), Some("true"));
    assert_eq!(sink.header("access-control-max-age"), Some("86400"));
}

#[test]
fn test_content_type_shorthand_beats_emitter_default() {
    let mut sink = BufferedSink::new();
    json(&mut sink, &json!({"x": 1}), [as_text_plain_charset_utf8()]).unwrap();
    assert_eq!(sink.header("content-type"), Some("text/plain; charset=utf-8"));
}

#[test]
fn test_download_overrides_disposition_option() {
    let mut sink = BufferedSink::new();
    serve_file_as_download(
        &mut sink,
        "a.txt",
        b"a",
        [add_content_disposition("inline", "ignored.txt", false)],
    )
    .unwrap();
    assert_eq!(
        sink.header_values("content-disposition"),
        vec!["attachment; filename=\"a.txt\""]
    );
}

#[test]
fn test_invalid_header_value_is_skipped() {
    let sink = committed(vec![
        with_header("X-Good", ["fine"]),
        with_header("X-Bad", ["evil\r\nInjected: yes"]),
    ]);
    assert_eq!(sink.header("x-good"), Some("fine"));
    assert_eq!(sink.header("x-bad"), None);
    assert_eq!(sink.header("injected"), None);
}

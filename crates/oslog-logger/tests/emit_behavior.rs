//! Integration tests for `Handler::emit`.
//!
//! These tests cover metadata layering, the cached flattening, threshold
//! changes, sink strategies and concurrent use of one handler.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use oslog_logger::provider::{ThreadLocalProvider, scoped};
use oslog_logger::{
    CallSite, Handler, HandlerConfig, Metadata, MetadataValue, Severity, call_site, metadata,
};
use oslog_sink::{
    CaptureSink, Disclosure, LineMode, PlatformSeverity, Redaction, Sink, SinkError, WriterSink,
};

const SITE: CallSite<'static> = CallSite::new("tests", "emit_behavior.rs", "emit", 1);

fn capture_handler() -> (Handler, CaptureSink) {
    let capture = CaptureSink::new();
    let handler = Handler::new(
        HandlerConfig::new("com.example.tests", "emit"),
        Sink::from(capture.clone()),
    )
    .without_provider();
    (handler, capture)
}

// ============================================================================
// Record Shape Tests
// ============================================================================

/// Verifies the login example: public and private lines, escaping and
/// severity mapping.
#[test]
fn login_example() {
    let (handler, capture) = capture_handler();
    let explicit = metadata! { "pub.user" => "alice", "token" => "abc\ndef" };

    handler
        .emit(Severity::Info, "login", Some(&explicit), call_site!())
        .expect("emit");

    let records = capture.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.severity(), PlatformSeverity::Info);
    assert_eq!(record.disclosure(), Disclosure::Private);

    let segments: Vec<_> = record
        .segments()
        .iter()
        .map(|segment| (segment.disclosure(), segment.text()))
        .collect();
    assert_eq!(
        segments,
        [
            (Disclosure::Public, "login"),
            (Disclosure::Public, "\n  ▷ pub.user: \"alice\""),
            (Disclosure::Public, "\n  ▷ "),
            (Disclosure::Private, "token: \"abc\\ndef\""),
        ]
    );
}

/// Verifies a record without metadata is a single public segment.
#[test]
fn bare_message() {
    let (handler, capture) = capture_handler();
    handler.emit(Severity::Notice, "ready", None, SITE).expect("emit");

    let record = &capture.records()[0];
    assert_eq!(record.severity(), PlatformSeverity::Default);
    assert_eq!(record.segments().len(), 1);
    assert_eq!(record.disclosure(), Disclosure::Public);
}

// ============================================================================
// Metadata Layering Tests
// ============================================================================

/// Verifies explicit metadata beats provided metadata, which beats
/// persistent metadata.
#[test]
fn layer_precedence() {
    let (handler, capture) = capture_handler();
    let handler = handler
        .with_metadata(metadata! { "pub.k" => "persistent", "pub.p" => "persistent" })
        .with_provider(Arc::new(|| metadata! { "pub.k" => "provided", "pub.q" => "provided" }));

    handler
        .emit(Severity::Info, "m", Some(&metadata! { "pub.k" => "explicit" }), SITE)
        .expect("emit");

    assert_eq!(
        capture.records()[0].text(),
        "m\n  ▷ pub.k: \"explicit\"\n  ▷ pub.p: \"persistent\"\n  ▷ pub.q: \"provided\""
    );
}

/// Verifies an empty provider snapshot keeps the persistent flattening.
#[test]
fn empty_provider_uses_persistent_metadata() {
    let (handler, capture) = capture_handler();
    let handler = handler
        .with_metadata(metadata! { "pub.app" => "demo" })
        .with_provider(Arc::new(Metadata::new));

    handler.emit(Severity::Info, "m", None, SITE).expect("emit");
    assert_eq!(capture.records()[0].text(), "m\n  ▷ pub.app: \"demo\"");
}

/// Verifies scoped thread-local metadata reaches records through the
/// thread-local provider.
#[test]
fn thread_local_provider_scopes() {
    let (handler, capture) = capture_handler();
    let handler = handler.with_provider(Arc::new(ThreadLocalProvider));

    scoped(metadata! { "pub.request" => "42" }, || {
        handler.emit(Severity::Info, "inside", None, SITE).expect("emit");
    });
    handler.emit(Severity::Info, "outside", None, SITE).expect("emit");

    let texts: Vec<_> = capture.records().iter().map(|record| record.text()).collect();
    assert_eq!(texts, ["inside\n  ▷ pub.request: \"42\"", "outside"]);
}

/// Verifies per-key updates are visible to the next record.
#[test]
fn per_key_updates() {
    let (handler, capture) = capture_handler();
    handler.set_metadata_value("pub.a", Some(MetadataValue::from("1")));
    handler.emit(Severity::Info, "first", None, SITE).expect("emit");

    handler.set_metadata_value("pub.a", None);
    handler.emit(Severity::Info, "second", None, SITE).expect("emit");

    let texts: Vec<_> = capture.records().iter().map(|record| record.text()).collect();
    assert_eq!(texts, ["first\n  ▷ pub.a: \"1\"", "second"]);
}

// ============================================================================
// Sink Strategy Tests
// ============================================================================

/// Verifies a legacy sink receives the whole record as private when any
/// private line is present, and as public otherwise.
#[test]
fn legacy_sink_classification() {
    let capture = CaptureSink::new();
    let handler = Handler::new(
        HandlerConfig::new("com.example.tests", "legacy"),
        Sink::legacy(capture.clone()),
    )
    .without_provider();

    handler
        .emit(Severity::Info, "a", Some(&metadata! { "pub.k" => "v" }), SITE)
        .expect("emit");
    handler
        .emit(Severity::Info, "b", Some(&metadata! { "pub.k" => "v", "s" => "x" }), SITE)
        .expect("emit");

    let records = capture.records();
    assert_eq!(records[0].disclosure(), Disclosure::Public);
    assert_eq!(records[1].disclosure(), Disclosure::Private);
    assert_eq!(records[1].redacted(), "<private>");
}

/// Shares a byte buffer between the test and a writer sink.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("buffer lock").clone()).expect("utf-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Verifies the writer sink redacts private segments by default.
#[test]
fn writer_sink_end_to_end() {
    let buffer = SharedBuffer::default();
    let sink = WriterSink::new(buffer.clone()).with_label("com.example.tests", "writer");
    let handler = Handler::new(
        HandlerConfig::new("com.example.tests", "writer"),
        Sink::modern(sink),
    )
    .without_provider();

    handler
        .emit(
            Severity::Warning,
            "slow query",
            Some(&metadata! { "pub.ms" => 812_u32, "sql" => "select 1" }),
            SITE,
        )
        .expect("emit");

    assert_eq!(
        buffer.contents(),
        "com.example.tests:writer error: slow query\n  ▷ pub.ms: \"812\"\n  ▷ <private>\n"
    );
}

/// Verifies a revealing writer sink prints private segments.
#[test]
fn writer_sink_reveal() {
    let buffer = SharedBuffer::default();
    let sink = WriterSink::with_line_mode(buffer.clone(), LineMode::WithoutNewline)
        .with_redaction(Redaction::Reveal);
    let handler = Handler::new(HandlerConfig::new("s", "c"), Sink::modern(sink)).without_provider();

    handler
        .emit(Severity::Critical, "m", Some(&metadata! { "k" => "v" }), SITE)
        .expect("emit");
    assert_eq!(buffer.contents(), "fault: m\n  ▷ k: \"v\"");
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Verifies sink failures are returned to the caller unchanged.
#[test]
fn sink_errors_pass_through() {
    let handler = Handler::new(
        HandlerConfig::new("s", "c"),
        Sink::modern(WriterSink::new(BrokenPipe)),
    )
    .without_provider();

    let error = handler
        .emit(Severity::Error, "m", None, SITE)
        .expect_err("write fails");
    assert!(matches!(error, SinkError::Io(ref inner) if inner.kind() == io::ErrorKind::BrokenPipe));

    // Below the threshold the sink is never reached.
    handler
        .emit(Severity::Debug, "m", None, SITE)
        .expect("gated records succeed");
}

// ============================================================================
// Concurrency Tests
// ============================================================================

/// Verifies every record carries a persistent mapping that was set as a
/// whole, never a mix of two.
#[test]
fn concurrent_emit_and_replace() {
    let (handler, capture) = capture_handler();
    let handler = Arc::new(handler.with_metadata(metadata! { "pub.a" => "0", "pub.b" => "0" }));

    let writer = {
        let handler = Arc::clone(&handler);
        thread::spawn(move || {
            for round in 1..=200_u32 {
                let value = round.to_string();
                handler.set_metadata(metadata! {
                    "pub.a" => value.clone(),
                    "pub.b" => value,
                });
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handler = Arc::clone(&handler);
            thread::spawn(move || {
                for _ in 0..200 {
                    handler.emit(Severity::Info, "m", None, SITE).expect("emit");
                }
            })
        })
        .collect();

    writer.join().expect("writer joins");
    for reader in readers {
        reader.join().expect("reader joins");
    }

    let records = capture.records();
    assert_eq!(records.len(), 800);
    for record in records {
        let text = record.text();
        let mut values = text
            .lines()
            .skip(1)
            .map(|line| line.rsplit_once(": ").map(|(_, value)| value.to_owned()));
        let a = values.next().flatten().expect("pub.a line");
        let b = values.next().flatten().expect("pub.b line");
        assert_eq!(a, b, "torn metadata in {text:?}");
    }
}

/// Verifies concurrent per-key updates are all retained.
#[test]
fn concurrent_per_key_updates() {
    let (handler, _capture) = capture_handler();
    let handler = Arc::new(handler);

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let handler = Arc::clone(&handler);
            thread::spawn(move || {
                handler.set_metadata_value(format!("k{worker}"), Some(MetadataValue::from(worker)));
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker joins");
    }

    assert_eq!(handler.metadata().len(), 8);
    assert_eq!(handler.flattened_metadata().private().len(), 8);
}

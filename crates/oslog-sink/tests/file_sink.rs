//! Integration tests for writer sinks backed by real files.

use std::fs::{self, File, OpenOptions};
use std::sync::Arc;
use std::thread;

use oslog_sink::{
    EmissionPayload, LineMode, PlatformSeverity, Redaction, Segment, Sink, WriterSink,
};

fn record(message: &str) -> EmissionPayload {
    EmissionPayload::from(Segment::public(message))
        .with_segment(Segment::public("\n  ▷ "))
        .with_segment(Segment::private("token: \"t\""))
}

#[test]
fn records_are_appended_to_the_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("app.log");
    let file = File::create(&path).expect("create log file");

    let sink = Sink::modern(WriterSink::new(file).with_label("com.example", "file"));
    sink.emit(PlatformSeverity::Info, &record("first")).expect("emit");
    sink.emit(PlatformSeverity::Fault, &record("second")).expect("emit");

    let contents = fs::read_to_string(&path).expect("read log file");
    assert_eq!(
        contents,
        "com.example:file info: first\n  ▷ <private>\n\
         com.example:file fault: second\n  ▷ <private>\n"
    );
}

#[test]
fn replace_writer_redirects_later_records() {
    let temp = tempfile::tempdir().expect("tempdir");
    let first_path = temp.path().join("first.log");
    let second_path = temp.path().join("second.log");

    let sink = WriterSink::new(File::create(&first_path).expect("create first"))
        .with_redaction(Redaction::Reveal);
    let sink = Arc::new(sink);
    let handle = Sink::Modern(sink.clone());

    handle.emit(PlatformSeverity::Error, &record("before")).expect("emit");
    let previous = sink
        .replace_writer(File::create(&second_path).expect("create second"))
        .expect("replace");
    drop(previous);
    handle.emit(PlatformSeverity::Error, &record("after")).expect("emit");
    sink.flush().expect("flush");

    assert_eq!(
        fs::read_to_string(&first_path).expect("read first"),
        "error: before\n  ▷ token: \"t\"\n"
    );
    assert_eq!(
        fs::read_to_string(&second_path).expect("read second"),
        "error: after\n  ▷ token: \"t\"\n"
    );
}

#[test]
fn concurrent_records_are_not_interleaved() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("shared.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .expect("open log file");
    let sink = Sink::modern(WriterSink::new(file));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let sink = sink.clone();
            thread::spawn(move || {
                for index in 0..50 {
                    let payload = EmissionPayload::from(Segment::public(format!(
                        "worker {worker} record {index}"
                    )));
                    sink.emit(PlatformSeverity::Debug, &payload).expect("emit");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker joins");
    }

    let contents = fs::read_to_string(&path).expect("read log file");
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 200);
    assert!(lines.iter().all(|line| line.starts_with("debug: worker ")));
}

#[test]
fn without_newline_mode_concatenates_records() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("raw.log");
    let sink = WriterSink::with_line_mode(
        File::create(&path).expect("create"),
        LineMode::WithoutNewline,
    );
    let sink = Sink::modern(sink);

    for message in ["a", "b", "c"] {
        sink.emit(PlatformSeverity::Info, &EmissionPayload::from(Segment::public(message)))
            .expect("emit");
    }

    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "info: ainfo: binfo: c"
    );
}

use std::time::{Duration, Instant};

use muffle::supervise::{LineAssembler, LineRecord, StreamKind};

fn payloads(records: &[LineRecord]) -> Vec<&[u8]> {
    records.iter().map(|r| r.bytes.as_slice()).collect()
}

#[test]
fn single_terminated_line() {
    let mut assembler = LineAssembler::new(StreamKind::Stdout);
    let records = assembler.feed(b"hello\n");

    assert_eq!(payloads(&records), vec![b"hello" as &[u8]]);
    assert!(assembler.flush().is_none());
}

#[test]
fn chunks_without_newline_accumulate() {
    let mut assembler = LineAssembler::new(StreamKind::Stdout);

    assert!(assembler.feed(b"hel").is_empty());
    assert!(assembler.feed(b"lo").is_empty());

    let trailing = assembler.flush().expect("trailing partial line");
    assert_eq!(trailing.bytes, b"hello");
    assert!(assembler.flush().is_none(), "flush drains the buffer");
}

#[test]
fn newline_only_chunk_completes_pending_partial() {
    let mut assembler = LineAssembler::new(StreamKind::Stdout);

    assert!(assembler.feed(b"abc").is_empty());
    let records = assembler.feed(b"\n");

    assert_eq!(payloads(&records), vec![b"abc" as &[u8]]);
    assert!(assembler.flush().is_none(), "partial buffer is empty again");
}

#[test]
fn interior_lines_emitted_in_order() {
    let mut assembler = LineAssembler::new(StreamKind::Stdout);
    let records = assembler.feed(b"one\ntwo\nthree");

    assert_eq!(payloads(&records), vec![b"one" as &[u8], b"two"]);
    assert_eq!(assembler.flush().expect("tail").bytes, b"three");
}

#[test]
fn empty_lines_are_preserved() {
    let mut assembler = LineAssembler::new(StreamKind::Stdout);
    let records = assembler.feed(b"a\n\nb\n");

    assert_eq!(payloads(&records), vec![b"a" as &[u8], b"", b"b"]);
    assert!(assembler.flush().is_none());
}

#[test]
fn partial_joined_across_chunk_boundary() {
    let mut assembler = LineAssembler::new(StreamKind::Stderr);

    assert!(assembler.feed(b"par").is_empty());
    let records = assembler.feed(b"tial\nrest");

    assert_eq!(payloads(&records), vec![b"partial" as &[u8]]);
    assert_eq!(assembler.flush().expect("tail").bytes, b"rest");
}

#[test]
fn merged_line_keeps_its_opening_timestamp() {
    let mut assembler = LineAssembler::new(StreamKind::Stdout);

    let opened = Instant::now();
    assert!(assembler.feed(b"slow").is_empty());
    std::thread::sleep(Duration::from_millis(60));
    let records = assembler.feed(b" line\n");

    // The record is stamped when its first byte arrived, not when the
    // terminating chunk did.
    let at = records[0].at;
    assert!(at.duration_since(opened) < Duration::from_millis(30));
}

#[test]
fn records_carry_the_stream_kind() {
    let mut out = LineAssembler::new(StreamKind::Stdout);
    let mut err = LineAssembler::new(StreamKind::Stderr);

    assert_eq!(out.feed(b"x\n")[0].kind, StreamKind::Stdout);
    assert_eq!(err.feed(b"y\n")[0].kind, StreamKind::Stderr);
}

#[test]
fn chunk_ending_on_newline_leaves_no_partial() {
    let mut assembler = LineAssembler::new(StreamKind::Stdout);

    assert_eq!(assembler.feed(b"x\n").len(), 1);
    assert_eq!(assembler.feed(b"y\n").len(), 1);
    assert!(assembler.flush().is_none());
}

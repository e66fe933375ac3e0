//! End-to-end scenarios driven through the public API, without a terminal.

use crossbeam_channel::RecvTimeoutError;
use linesift::app::{handle_event, Action, Ctx, CtxOptions, Event};
use linesift::buffer::{LineBuffer, RawLineBuffer};
use linesift::filter::{FilterSet, IGNORE_CASE};
use linesift::worker::{filter_loop, reader_loop, run_query, watcher_loop};
use linesift::LinesiftError;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn ctx_with(options: CtxOptions, lines: &[&str]) -> Arc<Ctx> {
    let ctx = Ctx::new(options, FilterSet::with_builtins());
    for line in lines {
        ctx.add_raw_line(*line);
    }
    ctx
}

fn displays(buffer: &dyn LineBuffer) -> Vec<String> {
    (0..buffer.size())
        .map(|i| buffer.line_at(i).unwrap().display().to_string())
        .collect()
}

fn exit_lines(actions: Vec<Action>) -> Vec<String> {
    for action in actions {
        if let Action::Exit(Ok(lines)) = action {
            return lines;
        }
    }
    panic!("no successful exit action");
}

#[test]
fn case_insensitive_query_keeps_source_order() {
    let ctx = ctx_with(CtxOptions::default(), &["apple", "banana", "Apple Pie"]);
    ctx.set_current_filter_by_name(IGNORE_CASE).unwrap();
    ctx.set_query("apple");
    run_query(&ctx, "apple");

    assert!(ctx.is_filtering());
    assert_eq!(
        displays(ctx.current_line_buffer().as_ref()),
        vec!["apple", "Apple Pie"]
    );
}

#[test]
fn bounded_store_drops_oldest_lines() {
    let store = RawLineBuffer::new(3, false);
    for i in 1..=5 {
        store.append(format!("line {i}"));
    }

    assert_eq!(store.size(), 3);
    assert_eq!(store.line_at(0).unwrap().display(), "line 3");
    assert!(matches!(
        store.line_at(3),
        Err(LinesiftError::OutOfRange { index: 3, size: 3 })
    ));
}

#[test]
fn replay_reemits_retained_lines_in_order() {
    let store = RawLineBuffer::new(2, false);
    let rx = store.subscribe();
    for text in ["a", "b", "c"] {
        store.append(text);
    }
    while rx.try_recv().is_ok() {}

    assert_eq!(store.replay(), 2);
    let replayed: Vec<String> = rx.try_iter().map(|l| l.display().to_string()).collect();
    assert_eq!(replayed, vec!["b", "c"]);
}

#[test]
fn range_mode_selects_rows_between_anchor_and_cursor() {
    let lines: Vec<String> = (0..8).map(|i| format!("row {i}")).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let ctx = ctx_with(CtxOptions::default(), &refs);

    ctx.set_current_line(2);
    handle_event(&ctx, &Event::ToggleRangeMode).unwrap();
    ctx.set_current_line(5);

    for row in 0..8 {
        assert_eq!(ctx.is_row_selected(row), (2..=5).contains(&row), "row {row}");
    }
    assert_eq!(ctx.selection_len(), 0);

    let picked = exit_lines(handle_event(&ctx, &Event::Finish).unwrap());
    assert_eq!(picked, vec!["row 2", "row 3", "row 4", "row 5"]);
}

#[test]
fn rapid_edits_dispatch_once_with_latest_query() {
    let options = CtxOptions {
        query_execution_delay: Duration::from_millis(100),
        ..CtxOptions::default()
    };
    let ctx = ctx_with(options, &["apple"]);

    ctx.set_query("a");
    assert!(ctx.exec_query());
    ctx.set_query("ap");
    assert!(ctx.exec_query());

    let query_rx = ctx.hub().query_rx();
    assert_eq!(query_rx.recv_timeout(Duration::from_secs(2)).unwrap(), "ap");
    assert!(query_rx.recv_timeout(Duration::from_millis(300)).is_err());
    ctx.stop();
}

#[test]
fn selection_round_trip() {
    let ctx = ctx_with(CtxOptions::default(), &["x", "y", "z"]);

    ctx.selection_add(1);
    assert!(ctx.selection_contains(1));
    ctx.selection_remove(1);
    assert!(!ctx.selection_contains(1));

    ctx.selection_add(0);
    ctx.selection_add(2);
    ctx.selection_clear();
    assert_eq!(ctx.selection_len(), 0);
    assert!((0..3).all(|row| !ctx.selection_contains(row)));
}

#[test]
fn rotating_through_every_filter_returns_to_start() {
    let ctx = ctx_with(CtxOptions::default(), &[]);
    let start = ctx.current_filter().name().to_string();
    let count = ctx.filter_names().len();

    let seen: Vec<String> = (0..count).map(|_| ctx.rotate_filter()).collect();
    assert_eq!(seen.last(), Some(&start));
    assert_eq!(seen.len(), count);
}

#[test]
fn loops_ingest_filter_and_shut_down() {
    let ctx = Ctx::new(
        CtxOptions {
            query_execution_delay: Duration::ZERO,
            ..CtxOptions::default()
        },
        FilterSet::with_builtins(),
    );
    let input = Cursor::new(b"alpha\nbeta\ngamma\nalphabet\n".to_vec());

    ctx.spawn_loop("reader", move |ctx| reader_loop(ctx, input)).unwrap();
    ctx.spawn_loop("watcher", watcher_loop).unwrap();
    ctx.spawn_loop("filter", filter_loop).unwrap();

    assert_eq!(
        ctx.input_ready_rx().recv_timeout(Duration::from_secs(5)),
        Err(RecvTimeoutError::Disconnected)
    );
    let deadline = Instant::now() + Duration::from_secs(5);
    while ctx.raw_buffer().size() < 4 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(ctx.raw_buffer().size(), 4);

    ctx.set_query("alpha");
    assert!(ctx.exec_query());
    while !ctx.is_filtering() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(
        displays(ctx.current_line_buffer().as_ref()),
        vec!["alpha", "alphabet"]
    );

    ctx.finish_with(vec!["alpha".into()]);
    ctx.wait_done();
    assert!(ctx.take_error().is_none());
    assert_eq!(ctx.take_result(), Some(vec!["alpha".to_string()]));
}

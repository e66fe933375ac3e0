//! Ingestion loop feeding the line store.
//!
//! Reading blocks, so the actual reads happen on a detached forwarder thread
//! that hands lines over a bounded channel. The registered loop selects on
//! that channel and on stop, which lets it exit promptly even while the
//! source is idle.

use crate::app::Ctx;
use crossbeam_channel::{select, Receiver};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;

/// Lines buffered between the forwarder and the store.
const FORWARD_DEPTH: usize = 256;

/// Reads `source` to the end, appending every line to the store.
///
/// Input readiness is signalled on the first line, or at end of input when
/// the source is empty. A read error ends ingestion and is logged; lines
/// read so far stay usable.
pub fn reader_loop<R>(ctx: Arc<Ctx>, source: R)
where
    R: BufRead + Send + 'static,
{
    let lines = match spawn_forwarder(source) {
        Ok(rx) => rx,
        Err(e) => {
            tracing::error!(error = %e, "failed to start input forwarder");
            ctx.mark_input_ready();
            return;
        }
    };

    let mut count: u64 = 0;
    loop {
        select! {
            recv(ctx.hub().stop_rx()) -> _ => {
                tracing::debug!(count, "reader stopped");
                break;
            }
            recv(lines) -> msg => match msg {
                Ok(line) => {
                    ctx.add_raw_line(line);
                    count += 1;
                    if count == 1 {
                        ctx.mark_input_ready();
                    }
                }
                Err(_) => {
                    tracing::debug!(count, "end of input");
                    ctx.mark_input_ready();
                    break;
                }
            },
        }
    }
}

fn spawn_forwarder<R>(mut source: R) -> std::io::Result<Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(FORWARD_DEPTH);
    thread::Builder::new()
        .name("linesift-read".into())
        .spawn(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match source.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf).into_owned();
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "input read failed");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CtxOptions;
    use crate::buffer::LineBuffer;
    use crate::filter::FilterSet;
    use std::io::Cursor;

    #[test]
    fn ingests_everything_and_signals_ready() {
        let ctx = Ctx::new(CtxOptions::default(), FilterSet::with_builtins());
        reader_loop(Arc::clone(&ctx), Cursor::new(b"one\ntwo\r\nthree".to_vec()));
        assert!(ctx.input_ready_rx().try_recv().is_err());
        let store = ctx.raw_buffer();
        assert_eq!(store.size(), 3);
        assert_eq!(store.line_at(1).unwrap().display(), "two");
        assert_eq!(store.line_at(2).unwrap().display(), "three");
    }

    #[test]
    fn empty_input_still_signals_ready() {
        let ctx = Ctx::new(CtxOptions::default(), FilterSet::with_builtins());
        reader_loop(Arc::clone(&ctx), Cursor::new(Vec::new()));
        assert!(matches!(
            ctx.input_ready_rx().try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        ));
    }
}

//! The view loop: the only writer to the terminal.
//!
//! Draw hints, prompt hints, status messages and paging requests all arrive
//! over the bus. Paging is applied here because only the view knows how many
//! rows fit on a page and how wide a horizontal scroll step is.

use super::layout::Layout;
use super::renderer::{self, Size};
use super::terminal::current_size;
use super::theme::Theme;
use super::viewmodel::{PromptLine, ScreenModel, CHROME_ROWS};
use crate::app::Ctx;
use crate::domain::LinesiftError;
use crossbeam_channel::select;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long the loop sleeps when no status message is waiting to expire.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

struct Status {
    text: String,
    expires: Option<Instant>,
}

/// How frames are painted.
#[derive(Debug, Clone, Default)]
pub struct ViewStyle {
    pub theme: Theme,
    pub layout: Layout,
}

/// Paints the screen on `out` until stop.
///
/// A write error ends the session with [`LinesiftError::Io`].
pub fn view_loop<W: Write>(ctx: Arc<Ctx>, mut out: W, style: ViewStyle) {
    let hub = ctx.hub();
    let mut status: Option<Status> = None;

    if let Err(e) = draw(&ctx, &mut out, &style, status.as_ref()) {
        ctx.exit_with(LinesiftError::Io(e));
        return;
    }

    loop {
        let wait = status
            .as_ref()
            .and_then(|s| s.expires)
            .map_or(IDLE_WAIT, |at| at.saturating_duration_since(Instant::now()));

        let painted = select! {
            recv(hub.stop_rx()) -> _ => break,
            recv(hub.draw_rx()) -> _ => draw(&ctx, &mut out, &style, status.as_ref()),
            recv(hub.prompt_rx()) -> _ => {
                let prompt = PromptLine::compute(&ctx);
                renderer::render_prompt_only(&mut out, &prompt, &style.theme, current_size(), style.layout)
            }
            recv(hub.status_rx()) -> msg => match msg {
                Ok(msg) => {
                    status = Some(Status {
                        expires: msg.clear_after.map(|d| Instant::now() + d),
                        text: msg.text,
                    });
                    paint_status(&ctx, &mut out, &style, status.as_ref())
                }
                Err(_) => break,
            },
            recv(hub.paging_rx()) -> req => match req {
                Ok(req) => {
                    let size = current_size();
                    ctx.set_per_page(size.height.saturating_sub(CHROME_ROWS));
                    ctx.apply_paging(req, (size.width / 2).max(1));
                    draw(&ctx, &mut out, &style, status.as_ref())
                }
                Err(_) => break,
            },
            default(wait) => {
                if status.as_ref().and_then(|s| s.expires).is_some_and(|at| at <= Instant::now()) {
                    status = None;
                    paint_status(&ctx, &mut out, &style, None)
                } else {
                    Ok(())
                }
            }
        };

        if let Err(e) = painted {
            ctx.exit_with(LinesiftError::Io(e));
            break;
        }
    }
}

fn draw<W: Write>(ctx: &Ctx, out: &mut W, style: &ViewStyle, status: Option<&Status>) -> io::Result<()> {
    let size = current_size();
    let vm = ScreenModel::compute(ctx, size.height);
    renderer::render(out, &vm, status.map(|s| s.text.as_str()), &style.theme, size, style.layout)
}

fn paint_status<W: Write>(ctx: &Ctx, out: &mut W, style: &ViewStyle, status: Option<&Status>) -> io::Result<()> {
    let size: Size = current_size();
    renderer::render_status_only(out, status.map(|s| s.text.as_str()), &style.theme, size)?;
    // Restore the caret on the prompt line.
    renderer::render_prompt_only(out, &PromptLine::compute(ctx), &style.theme, size, style.layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CtxOptions;
    use crate::filter::FilterSet;
    use crate::hub::StatusMsg;
    use std::sync::Mutex;
    use std::thread;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contains(&self, needle: &str) -> bool {
            String::from_utf8_lossy(&self.0.lock().unwrap()).contains(needle)
        }
    }

    fn eventually(f: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if f() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn paints_lines_and_status_until_stopped() {
        let ctx = Ctx::new(CtxOptions::default(), FilterSet::with_builtins());
        ctx.add_raw_line("first line");
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let style = ViewStyle {
            theme: Theme::monochrome(),
            layout: Layout::BottomUp,
        };
        ctx.spawn_loop("view", move |ctx| view_loop(ctx, writer, style)).unwrap();

        assert!(eventually(|| buf.contains("first line")));

        ctx.add_raw_line("second line");
        ctx.hub().send_draw();
        assert!(eventually(|| buf.contains("second line")));

        ctx.hub().send_status(StatusMsg::sticky("all good"));
        assert!(eventually(|| buf.contains("all good")));

        ctx.stop();
        ctx.wait_done();
        assert!(ctx.take_error().is_none());
    }
}

// src/render/spinner.rs

//! Wait-loop progress feedback.

use std::io::Write;

use crate::supervise::Progress;

const FRAMES: [char; 4] = ['-', '\\', '|', '/'];

/// Four-frame spinner drawn after the summary while the child runs.
///
/// The first tick emits a leading space, later ticks reposition with a
/// backspace; `finish` erases the spinner so the ok/fail glyph can take
/// its place. Nothing is drawn if the child exits before the first
/// tick. Write errors are ignored: the spinner is decoration.
pub struct Spinner<W: Write> {
    out: W,
    frame: usize,
    ticked: bool,
}

impl<W: Write> Spinner<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame: 0,
            ticked: false,
        }
    }
}

impl<W: Write + Send> Progress for Spinner<W> {
    fn tick(&mut self) {
        if self.ticked {
            let _ = write!(self.out, "\x08");
        } else {
            self.ticked = true;
            let _ = write!(self.out, " ");
        }
        let _ = write!(self.out, "{}", FRAMES[self.frame]);
        self.frame = (self.frame + 1) % FRAMES.len();
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        if self.ticked {
            let _ = write!(self.out, "\x08\x08");
            let _ = self.out.flush();
        }
    }
}

/// Progress callback that does nothing (no summary, or stdout is not a
/// terminal).
pub struct NoopProgress;

impl Progress for NoopProgress {
    fn tick(&mut self) {}
    fn finish(&mut self) {}
}

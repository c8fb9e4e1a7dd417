// src/render/printer.rs

//! Report rendering over any writer.

use std::io::{self, Write};

use crate::supervise::{ProcessResult, StreamKind};

/// How many shell-command lines the report header previews.
const SHELL_PREVIEW_LINES: usize = 4;

/// Raw SGR codes, classic 8-color palette.
mod sgr {
    pub const RESET: u8 = 0;
    /// Red: failures and the fail glyph.
    pub const ERROR: u8 = 31;
    /// Brown: captured output lines.
    pub const OUTPUT: u8 = 33;
    /// Cyan: header/footer on success.
    pub const SYSTEM: u8 = 36;
}

/// Destination for the user-facing summary and report.
///
/// Selected at configuration time: stdout always gets a [`RealSink`];
/// the `--log FILE` fan-out is a second `RealSink` (color off) or a
/// [`NoopSink`] when no log file was requested.
pub trait Sink {
    fn summary(&mut self, summary: &str) -> io::Result<()>;
    fn passed(&mut self) -> io::Result<()>;
    fn failed(&mut self) -> io::Result<()>;
    fn report(&mut self, result: &ProcessResult, info: bool, timestamps: bool) -> io::Result<()>;
}

/// Sink writing the summary and report to a real writer, optionally
/// with ANSI color.
pub struct RealSink<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> RealSink<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    fn color(&mut self, code: u8) -> io::Result<()> {
        if self.color {
            write!(self.writer, "\x1b[{code}m")?;
        }
        Ok(())
    }

    fn status_color(&mut self, errored: bool) -> io::Result<()> {
        self.color(if errored { sgr::ERROR } else { sgr::SYSTEM })
    }

    /// `$ command...` plus a capped preview of the shell text, when any.
    fn header(&mut self, result: &ProcessResult) -> io::Result<()> {
        self.status_color(result.errored)?;
        writeln!(self.writer, "$ {}", result.command.join(" "))?;
        if let Some(raw) = &result.shell_commands {
            let text = String::from_utf8_lossy(raw);
            let lines: Vec<&str> = text.trim_end().split('\n').collect();
            let shown = lines.len().min(SHELL_PREVIEW_LINES);
            for (index, line) in lines[..shown].iter().enumerate() {
                if index + 1 == shown && lines.len() > shown {
                    writeln!(self.writer, "> {line} ...")?;
                } else {
                    writeln!(self.writer, "> {line}")?;
                }
            }
        }
        self.color(sgr::RESET)
    }

    /// The ordered line log; stdout lines get `[n.n]` prefixes, stderr
    /// `{n.n}`, right-aligned to the total duration's width.
    fn body(&mut self, result: &ProcessResult, timestamps: bool) -> io::Result<()> {
        let width = format!("{:.1}", result.duration().as_secs_f64()).len();
        for record in &result.lines {
            self.color(sgr::OUTPUT)?;
            if timestamps {
                let (open, close) = match record.kind {
                    StreamKind::Stdout => ('[', ']'),
                    StreamKind::Stderr => ('{', '}'),
                };
                let elapsed = format!(
                    "{:.1}",
                    record.at.duration_since(result.started).as_secs_f64()
                );
                write!(self.writer, "{open}{elapsed:>width$}{close} ")?;
            }
            writeln!(self.writer, "{}", String::from_utf8_lossy(&record.bytes))?;
            self.color(sgr::RESET)?;
        }
        Ok(())
    }

    fn footer(&mut self, result: &ProcessResult) -> io::Result<()> {
        self.status_color(result.errored)?;
        writeln!(self.writer, "> exit: {}", result.exit_code)?;
        writeln!(
            self.writer,
            "> duration: {:.2}s",
            result.duration().as_secs_f64()
        )?;
        self.color(sgr::RESET)
    }
}

impl<W: Write> Sink for RealSink<W> {
    fn summary(&mut self, summary: &str) -> io::Result<()> {
        // No newline: the spinner and the ok/fail glyph extend this line.
        write!(self.writer, "{summary}")?;
        self.writer.flush()
    }

    fn passed(&mut self) -> io::Result<()> {
        writeln!(self.writer, " \u{2713}")
    }

    fn failed(&mut self) -> io::Result<()> {
        self.color(sgr::ERROR)?;
        writeln!(self.writer, " \u{2717}")?;
        self.color(sgr::RESET)
    }

    fn report(&mut self, result: &ProcessResult, info: bool, timestamps: bool) -> io::Result<()> {
        if info {
            self.header(result)?;
        }
        self.body(result, timestamps)?;
        if info {
            self.footer(result)?;
        }
        Ok(())
    }
}

/// Sink that swallows everything; stands in when no log file is
/// configured.
pub struct NoopSink;

impl Sink for NoopSink {
    fn summary(&mut self, _summary: &str) -> io::Result<()> {
        Ok(())
    }

    fn passed(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn failed(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn report(&mut self, _result: &ProcessResult, _info: bool, _timestamps: bool) -> io::Result<()> {
        Ok(())
    }
}

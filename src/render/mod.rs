// src/render/mod.rs

//! Terminal rendering: summary line, spinner, and the expanded report.
//!
//! The supervision core hands over an immutable `ProcessResult`; this
//! layer decides what of it the user sees. Capability decisions (is
//! stdout a terminal, was a log file requested) are made once by the
//! caller, which then picks the matching [`Sink`]/[`Progress`]
//! implementations.

pub mod printer;
pub mod spinner;

pub use printer::{NoopSink, RealSink, Sink};
pub use spinner::{NoopProgress, Spinner};

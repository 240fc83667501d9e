//! Output module for aggregated articles
//!
//! This module handles:
//! - Writing articles as JSON lines
//! - Rendering per-source traversal statistics

pub mod stats;

pub use stats::{format_statistics, print_statistics};

use crate::article::Article;
use crate::AggregatorError;
use std::io::Write;

/// Writes one JSON object per article per line
///
/// Each line is flushed as soon as it is written, so a consumer reading the
/// stream sees articles while the traversal is still running.
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Serializes an article and terminates the line
    pub fn write(&mut self, article: &Article) -> Result<(), AggregatorError> {
        serde_json::to_writer(&mut self.writer, article)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Number of articles written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

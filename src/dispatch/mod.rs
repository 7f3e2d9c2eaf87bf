//! Batch driver: reads records, computes descriptors in parallel and writes
//! the table in input order.
//!
//! Parse failures are reported to an [`Observer`] and skipped. Any other
//! failure (reading, writing, or a molecule without heavy atoms) stops the
//! batch; rows written before the failure stay in the output.

mod pool;

pub use pool::{PoolConfig, ordered_map};

use crate::calc;
use crate::io::{self, InputRecord, TableWriter};
use crate::toolkit::Toolkit;
use std::io::Write;
use thiserror::Error;
use tracing::{debug, info};

/// Records between progress notifications when progress is enabled.
pub const PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchConfig {
    pub pool: PoolConfig,
    /// Notify the observer every this many processed records.
    pub progress_interval: Option<usize>,
}

/// Receives per-record diagnostics and progress from the writing thread.
pub trait Observer {
    fn on_unparsable(&mut self, _error: &calc::Error) {}
    fn on_progress(&mut self, _processed: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct Silent;

impl Observer for Silent {}

/// Writes diagnostics and an in-place progress counter to a stream.
pub struct StreamObserver<W: Write> {
    out: W,
}

impl<W: Write> StreamObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for StreamObserver<W> {
    fn on_unparsable(&mut self, error: &calc::Error) {
        let _ = writeln!(self.out, "{error}");
    }

    fn on_progress(&mut self, processed: usize) {
        let _ = write!(self.out, "\r{processed} molecules passed");
        let _ = self.out.flush();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Records taken from the reader, including unparsable ones.
    pub processed: usize,
    /// Rows written to the table.
    pub written: usize,
    pub unparsable: usize,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read input")]
    Read(#[source] io::Error),

    #[error("failed to write output")]
    Write(#[source] io::Error),

    #[error("cannot compute descriptors for input line {line}")]
    Descriptor {
        line: usize,
        #[source]
        source: calc::Error,
    },
}

/// Runs the batch over `records`, writing rows to `table`.
pub fn run<T, R, W, O>(
    toolkit: &T,
    records: R,
    config: &DispatchConfig,
    table: &mut TableWriter<W>,
    observer: &mut O,
) -> Result<Summary, Error>
where
    T: Toolkit,
    R: Iterator<Item = Result<InputRecord, io::Error>> + Send,
    W: Write,
    O: Observer + ?Sized,
{
    let mut summary = Summary::default();
    let records = records.map(|r| r.map_err(Error::Read));
    let interval = config.progress_interval.filter(|n| *n > 0);

    ordered_map(
        records,
        &config.pool,
        |record| calc::calculate(toolkit, &record),
        |result| {
            summary.processed += 1;
            match result {
                Ok(row) => {
                    table.write_row(&row).map_err(Error::Write)?;
                    summary.written += 1;
                }
                Err(e) if e.is_recoverable() => {
                    debug!(line = e.line(), "skipping unparsable record");
                    summary.unparsable += 1;
                    observer.on_unparsable(&e);
                }
                Err(e) => {
                    return Err(Error::Descriptor {
                        line: e.line(),
                        source: e,
                    });
                }
            }
            if interval.is_some_and(|n| summary.processed % n == 0) {
                observer.on_progress(summary.processed);
            }
            Ok(())
        },
    )?;

    info!(
        processed = summary.processed,
        written = summary.written,
        unparsable = summary.unparsable,
        "batch complete"
    );
    Ok(summary)
}

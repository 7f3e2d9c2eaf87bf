use std::io::{self, Stderr, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use physchem::CalcError;
use physchem::dispatch::{Observer, StreamObserver};

/// Spinner shown on an interactive terminal while the batch runs.
///
/// Parse-failure lines are printed above the spinner so they are not
/// overwritten by the next tick.
pub struct BatchSpinner {
    bar: ProgressBar,
    start: Instant,
}

impl BatchSpinner {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("invalid template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message("Computing descriptors...");

        Self {
            bar,
            start: Instant::now(),
        }
    }

    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }

    pub fn finish(self, written: usize) {
        self.bar.finish_and_clear();
        print_footer(written, self.start.elapsed());
    }
}

impl Observer for BatchSpinner {
    fn on_unparsable(&mut self, error: &CalcError) {
        self.bar.suspend(|| {
            let _ = writeln!(io::stderr().lock(), "{error}");
        });
    }

    fn on_progress(&mut self, processed: usize) {
        self.bar
            .set_message(format!("Computing descriptors... {processed} molecules passed"));
    }
}

fn print_footer(written: usize, elapsed: Duration) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
    );
    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m {:<30} {:>21}",
        format!("{written} rows written"),
        format!("Total: {:.2}s", elapsed.as_secs_f64())
    );
    let _ = writeln!(stderr);
}

/// Batch observer for the current terminal mode.
///
/// Non-interactive runs write the plain diagnostic lines and the `\r`
/// progress counter straight to stderr.
pub enum Progress {
    Interactive(BatchSpinner),
    Stream(StreamObserver<Stderr>),
}

impl Progress {
    pub fn new(interactive: bool) -> Self {
        if interactive {
            Self::Interactive(BatchSpinner::new())
        } else {
            Self::Stream(StreamObserver::new(io::stderr()))
        }
    }

    /// Removes the spinner line, leaving the terminal ready for tables.
    pub fn clear(&self) {
        if let Self::Interactive(s) = self {
            s.clear();
        }
    }

    pub fn finish(self, written: usize) {
        if let Self::Interactive(s) = self {
            s.finish(written);
        }
    }
}

impl Observer for Progress {
    fn on_unparsable(&mut self, error: &CalcError) {
        match self {
            Self::Interactive(s) => s.on_unparsable(error),
            Self::Stream(s) => s.on_unparsable(error),
        }
    }

    fn on_progress(&mut self, processed: usize) {
        match self {
            Self::Interactive(s) => s.on_progress(processed),
            Self::Stream(s) => s.on_progress(processed),
        }
    }
}

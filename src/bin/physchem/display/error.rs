use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// Gathers hints by walking the error chain and downcasting each layer to
/// the library error types.
struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<physchem::CalcError>() {
                collector.collect_calc_hints(e);
            } else if let Some(e) = cause.downcast_ref::<physchem::IoError>() {
                collector.collect_io_hints(e);
            } else if let Some(e) = cause.downcast_ref::<physchem::ParameterError>() {
                collector.collect_parameter_hints(e);
            } else if let Some(e) = cause.downcast_ref::<io::Error>() {
                collector.collect_std_io_hints(e);
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_calc_hints(&mut self, err: &physchem::CalcError) {
        use physchem::CalcError;

        self.mark_typed();

        match err {
            CalcError::NoHeavyAtoms { line, .. } => {
                self.add(format!(
                    "Line {line} holds a structure without heavy atoms (blank line, [H][H], ...)"
                ));
                self.add("Remove such lines or narrow the window with -p/--startpos and -l/--lines");
                self.add("Rows before that line were written to the output");
            }
            CalcError::Unparsable { line, .. } => {
                self.add(format!("Check the SMILES on line {line}"));
            }
        }
    }

    fn collect_io_hints(&mut self, err: &physchem::IoError) {
        use physchem::IoError;

        self.mark_typed();

        match err {
            // The wrapped io::Error is the next link in the chain.
            IoError::Io { .. } => {}
            IoError::Parse { line, .. } => {
                self.add(format!("Input line {line} could not be decoded"));
                self.add("The reader expects UTF-8 text with one structure per line");
                self.add("Convert the file with `iconv -t UTF-8` or strip binary content");
            }
        }
    }

    fn collect_parameter_hints(&mut self, err: &physchem::ParameterError) {
        use physchem::ParameterError;

        self.mark_typed();

        match err {
            ParameterError::ParameterParse(_) => {
                self.add("The --params file is not valid TOML or misses a required table");
                self.add("Start from resources/default.params.toml and edit the values");
            }
            ParameterError::InvalidParameter { section, .. } => {
                self.add(format!("Fix the [{section}] table of the --params file"));
                self.add("TPSA rules apply to N and O only; QED weights and scales must be positive");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &io::Error) {
        use std::io::ErrorKind;

        self.mark_typed();

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is not truncated or corrupted");
            }

            ErrorKind::WriteZero | ErrorKind::StorageFull => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated before the table was complete");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("stdin") || msg.contains("terminal") {
            self.add("Pipe SMILES into physchem or pass a file with -i/--in");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    for (i, cause) in err.chain().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&cause.to_string());
    }

    text.to_lowercase()
}

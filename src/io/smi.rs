use super::{Error, Format};
use std::io::BufRead;

/// One structure read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// 1-based line number in the source.
    pub line: usize,
    pub name: String,
    pub smiles: String,
}

impl InputRecord {
    /// Splits a line into structure and identifier.
    ///
    /// The line is trimmed first. The first field is the structure and the
    /// second the identifier; with a single field the structure doubles as
    /// the identifier. `None` splits on runs of whitespace.
    pub fn from_line(line: usize, text: &str, separator: Option<&str>) -> Self {
        let text = text.trim();
        let fields: Vec<&str> = match separator {
            Some(sep) if !sep.is_empty() => text.split(sep).collect(),
            _ => text.split_whitespace().collect(),
        };
        let smiles = fields.first().copied().unwrap_or_default().to_string();
        let name = fields.get(1).map_or_else(|| smiles.clone(), |s| s.to_string());
        Self { line, name, smiles }
    }
}

/// Which lines to read and how to split them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field separator; `None` means whitespace.
    pub separator: Option<String>,
    /// First line to read, 1-based. Zero is treated as one.
    pub start: usize,
    /// Maximum number of lines to read from `start`.
    pub count: Option<usize>,
}

impl ReadOptions {
    fn first_line(&self) -> usize {
        self.start.max(1)
    }
}

/// Lazy reader over the lines `[start, start + count)` of a SMILES file.
///
/// Iteration stops at end of input or once the window is exhausted; lines
/// past the window are never read. An I/O or encoding error is yielded once
/// and ends the iteration.
pub struct SmiReader<R> {
    reader: R,
    options: ReadOptions,
    line: usize,
    emitted: usize,
    buf: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> SmiReader<R> {
    pub fn new(reader: R, options: ReadOptions) -> Self {
        Self {
            reader,
            options,
            line: 0,
            emitted: 0,
            buf: Vec::new(),
            finished: false,
        }
    }

    fn window_exhausted(&self) -> bool {
        self.options.count.is_some_and(|count| self.emitted >= count)
    }

    fn read_record(&mut self) -> Result<Option<InputRecord>, Error> {
        let first = self.options.first_line();
        loop {
            if self.window_exhausted() {
                return Ok(None);
            }
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            if self.line < first {
                continue;
            }
            let text = std::str::from_utf8(&self.buf)
                .map_err(|e| Error::parse(Format::Smiles, self.line, format!("invalid UTF-8 ({e})")))?;
            self.emitted += 1;
            return Ok(Some(InputRecord::from_line(
                self.line,
                text,
                self.options.separator.as_deref(),
            )));
        }
    }
}

impl<R: BufRead> Iterator for SmiReader<R> {
    type Item = Result<InputRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.read_record().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.finished = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn read(input: &str, options: ReadOptions) -> Vec<InputRecord> {
        SmiReader::new(Cursor::new(input.as_bytes().to_vec()), options)
            .collect::<Result<_, _>>()
            .unwrap()
    }

    fn pairs(records: &[InputRecord]) -> Vec<(usize, &str, &str)> {
        records
            .iter()
            .map(|r| (r.line, r.smiles.as_str(), r.name.as_str()))
            .collect()
    }

    #[test]
    fn structure_first_then_identifier() {
        let r = InputRecord::from_line(1, "CCO\tethanol\n", None);
        assert_eq!((r.smiles.as_str(), r.name.as_str()), ("CCO", "ethanol"));
    }

    #[test]
    fn single_field_doubles_as_identifier() {
        let r = InputRecord::from_line(3, "  c1ccccc1  \r\n", None);
        assert_eq!((r.smiles.as_str(), r.name.as_str()), ("c1ccccc1", "c1ccccc1"));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let r = InputRecord::from_line(1, "CCO ethanol 46.07", None);
        assert_eq!(r.name, "ethanol");
    }

    #[test]
    fn explicit_separator_splits_on_every_occurrence() {
        let r = InputRecord::from_line(1, "CCO,,ethanol", Some(","));
        assert_eq!((r.smiles.as_str(), r.name.as_str()), ("CCO", ""));
        let r = InputRecord::from_line(1, "CCO my ethanol;id", Some(";"));
        assert_eq!((r.smiles.as_str(), r.name.as_str()), ("CCO my ethanol", "id"));
    }

    #[test]
    fn blank_line_yields_empty_record() {
        let r = InputRecord::from_line(4, "   \n", None);
        assert_eq!((r.smiles.as_str(), r.name.as_str()), ("", ""));
    }

    #[test]
    fn reads_every_line_by_default() {
        let records = read("C a\nCC b\nCCC c\n", ReadOptions::default());
        assert_eq!(pairs(&records), vec![(1, "C", "a"), (2, "CC", "b"), (3, "CCC", "c")]);
    }

    #[test]
    fn window_selects_start_and_count() {
        let input = "C a\nCC b\nCCC c\nCCCC d\n";
        let options = ReadOptions {
            start: 2,
            count: Some(2),
            ..Default::default()
        };
        assert_eq!(pairs(&read(input, options)), vec![(2, "CC", "b"), (3, "CCC", "c")]);

        let options = ReadOptions {
            start: 0,
            count: Some(1),
            ..Default::default()
        };
        assert_eq!(pairs(&read(input, options)), vec![(1, "C", "a")]);
    }

    #[test]
    fn zero_count_and_late_start_yield_nothing() {
        let zero = ReadOptions {
            count: Some(0),
            ..Default::default()
        };
        assert!(read("C\nCC\n", zero).is_empty());
        let late = ReadOptions {
            start: 10,
            ..Default::default()
        };
        assert!(read("C\nCC\n", late).is_empty());
    }

    #[test]
    fn missing_trailing_newline_is_fine() {
        assert_eq!(pairs(&read("C a\nCC b", ReadOptions::default())).len(), 2);
    }

    #[test]
    fn invalid_utf8_is_an_error_naming_the_line() {
        let bytes = b"C a\n\xff\xfe b\nCC c\n".to_vec();
        let mut reader = SmiReader::new(Cursor::new(bytes), ReadOptions::default());
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                format: Format::Smiles,
                line: 2,
                ..
            }
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn stops_reading_after_the_window() {
        let options = ReadOptions {
            count: Some(1),
            ..Default::default()
        };
        let mut reader = SmiReader::new(Cursor::new(b"C\nCC\nCCC\n".to_vec()), options);
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert_eq!(reader.reader.position(), 2);
    }
}

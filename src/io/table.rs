use super::Error;
use crate::calc::{self, Descriptors};
use std::io::Write;

/// Tab-separated descriptor table.
///
/// The header line is written on construction, so an empty batch still
/// produces a well-formed table.
pub struct TableWriter<W: Write> {
    inner: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(mut inner: W) -> Result<Self, Error> {
        writeln!(inner, "{}", calc::header().join("\t"))?;
        Ok(Self { inner })
    }

    pub fn write_row(&mut self, row: &Descriptors) -> Result<(), Error> {
        writeln!(self.inner, "{row}")?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, Error> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(name: &str) -> Descriptors {
        Descriptors {
            name: name.to_string(),
            hba: 1,
            hbd: 1,
            complexity: 2,
            num_rings: 0,
            rotatable_bonds: 0,
            tpsa: 20.23,
            logp: -0.0,
            mr: 12.76,
            mw: 46.07,
            csp3: 1.0,
            fmf: 0.0,
            qed: 0.407,
        }
    }

    #[test]
    fn empty_table_has_only_the_header() {
        let out = TableWriter::new(Vec::new()).unwrap().finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name\tHBA\tHBD\tcomplexity\tNumRings\tRTB\tTPSA\tlogP\tMR\tMW\tCsp3\tfmf\tqed\n"
        );
    }

    #[test]
    fn rows_follow_the_header_in_order() {
        let mut table = TableWriter::new(Vec::new()).unwrap();
        table.write_row(&row("first")).unwrap();
        table.write_row(&row("second")).unwrap();
        let text = String::from_utf8(table.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "first\t1\t1\t2\t0\t0\t20.23\t-0.0\t12.76\t46.07\t1.0\t0.0\t0.407");
        assert!(lines[2].starts_with("second\t"));
    }

    #[test]
    fn write_failures_surface_as_io_errors() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        assert!(matches!(TableWriter::new(Full), Err(Error::Io { .. })));
    }
}

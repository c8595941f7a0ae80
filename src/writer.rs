//! BibTeX writer for serializing references

use crate::error::Result;
use crate::model::Reference;
use std::io::{self, Write};

/// BibTeX writer over any byte sink
#[derive(Debug)]
pub struct Writer<W: Write> {
    writer: W,
}

impl<W: Write> Writer<W> {
    /// Create a new writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single reference
    pub fn write_reference(&mut self, reference: &Reference) -> io::Result<()> {
        write!(self.writer, "{}", reference.to_bibtex())
    }

    /// Write all references in order, separated by blank lines
    pub fn write_all(&mut self, references: &[Reference]) -> io::Result<()> {
        for reference in references {
            self.write_reference(reference)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

/// Render references to a string
pub fn to_string(references: &[Reference]) -> Result<String> {
    let mut buf = Vec::new();
    let mut writer = Writer::new(&mut buf);
    writer.write_all(references)?;
    Ok(String::from_utf8(buf).expect("valid UTF-8"))
}

/// Write references to a `.bib` file
pub fn to_file(references: &[Reference], path: impl AsRef<std::path::Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = Writer::new(io::BufWriter::new(file));
    writer.write_all(references)?;
    Ok(())
}

use std::io::{BufWriter, Write};
use std::path::Path;

use eyre::Result;
use lrkit_core_rs::alignment::Step;
use lrkit_core_rs::loc::Strand;

use super::format::Format;
use super::record::Record;
use crate::compression::encode;
use crate::traits::WriteRecord;

pub struct Writer<W> {
    writer: W,
    format: Format,
}

impl Writer<()> {
    /// Create an overlap file. The format and GZIP compression are inferred from the extension.
    pub fn from_path(
        path: impl AsRef<Path>,
    ) -> Result<Box<dyn WriteRecord<Record = Record> + Send + 'static>> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let stream = encode::infer_from_path(path)?;
        Ok(Box::new(Writer::new(BufWriter::new(stream), format)))
    }
}

impl<W: Write> Writer<W> {
    pub fn new(writer: W, format: Format) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_m4(&mut self, record: &Record) -> Result<()> {
        let (a, b) = (record.a(), record.b());
        write!(
            self.writer,
            "{} {} {} -{} {} {} {} {} {} {} {} {}",
            a.name(),
            b.name(),
            record.identity(),
            record.aligned_length(),
            a.strand().flag(),
            a.start(),
            a.end(),
            a.len(),
            b.strand().flag(),
            b.start(),
            b.end(),
            b.len()
        )?;
        Ok(())
    }

    fn write_paf(&mut self, record: &Record) -> Result<()> {
        let a = record.a().on_strand(Strand::Forward);
        let b = record.b().on_strand(Strand::Forward);
        let block = a.span();
        let matches = (block as f64 * record.identity() / 100.0).round() as usize;
        write!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t0",
            a.name(),
            a.len(),
            a.start(),
            a.end(),
            record.relative_strand(),
            b.name(),
            b.len(),
            b.start(),
            b.end(),
            matches,
            block
        )?;
        Ok(())
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        let script = record.script();
        match self.format {
            Format::M4 => self.write_m4(record)?,
            Format::M4a => {
                self.write_m4(record)?;
                if !script.is_empty() {
                    write!(self.writer, " {}", Step::rle_string(script.iter()))?;
                }
            }
            Format::Paf => {
                self.write_paf(record)?;
                if !script.is_empty() {
                    write!(self.writer, "\tcg:Z:{}", Step::rle_string(script.iter()))?;
                }
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

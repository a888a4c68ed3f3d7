use std::io::BufRead;
use std::path::Path;

use derive_getters::Dissolve;
use eyre::{ensure, Result, WrapErr};

use super::record::Record;
use crate::compression::decode;
use crate::traits::ReadRecord;

/// A strict FASTA reader that reads a single record at a time. Ignores carriage returns at the
/// end of lines and empty sequence lines.
///
/// Returns an error if there are:
/// - Errors while reading from the underlying reader
/// - Extra characters before the first record
/// - Non-alphabetic characters inside the sequence, including start/end of lines
/// - Empty ID or sequence fields in any record
#[derive(Debug, Clone, Eq, PartialEq, Dissolve)]
pub struct Reader<R> {
    reader: R,
}

impl Reader<()> {
    /// Create a new FASTA reader for the given file. GZIP compression is detected from the
    /// file extension.
    pub fn from_path(
        path: impl AsRef<Path>,
    ) -> Result<Box<dyn ReadRecord<Record = Record> + Send + 'static>> {
        let stream = decode::infer_from_path(path.as_ref())?;
        Ok(Box::new(Reader::new(stream.buffered())?))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let buffer = reader.fill_buf()?;
        ensure!(
            buffer.first().is_none_or(|x| *x == b'>'),
            "Expected '>' at the start of the FASTA file"
        );
        Ok(Self { reader })
    }

    fn read_parts(&mut self, record: &mut Record) -> Result<bool> {
        let buffer = self.reader.fill_buf()?;
        if buffer.is_empty() {
            return Ok(false);
        }
        ensure!(
            buffer[0] == b'>',
            "Expected '>' at the start of the FASTA record"
        );
        self.reader.consume(1);

        let (id, seq) = record.fields();

        id.clear();
        let read = self.reader.read_line(id)?;
        ensure!(read > 0, "Unexpected EOF after '>'");
        ensure!(
            id.ends_with('\n'),
            "FASTA ID line is not terminated with a newline: {id}"
        );
        id.pop();
        if id.ends_with('\r') {
            id.pop();
        }
        Record::validate_id(id)?;

        seq.clear();
        loop {
            let buffer = self.reader.fill_buf()?;
            if buffer.is_empty() || buffer[0] == b'>' {
                break;
            }

            let (line, consume) = match memchr::memchr(b'\n', buffer) {
                Some(pos) => {
                    let line = &buffer[..pos];
                    match line.last() {
                        Some(b'\r') => (&line[..pos - 1], pos + 1),
                        _ => (line, pos + 1),
                    }
                }
                None => (buffer, buffer.len()),
            };
            seq.extend_from_slice(line);
            self.reader.consume(consume);
        }
        Record::validate_seq(seq).wrap_err_with(|| format!("Invalid FASTA record {id}"))?;

        Ok(true)
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    /// Parse the next FASTA record into the given buffer. On error, the buffer is left in an
    /// unspecified state but can be reused for the next read.
    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        self.read_parts(into)
    }
}

use std::io::BufRead;
use std::path::Path;

use eyre::{Result, WrapErr};

use super::format::Format;
use super::record::Record;
use crate::compression::decode;
use crate::traits::ReadRecord;

pub mod parse {
    use eyre::{ensure, eyre, OptionExt, Result, WrapErr};
    use lrkit_core_rs::alignment::Step;
    use lrkit_core_rs::loc::Strand;

    use super::super::record::{Record, Side};

    pub fn name<'a>(parts: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<String> {
        parts
            .next()
            .map(str::to_owned)
            .ok_or_else(|| eyre!("Missing {what}"))
    }

    pub fn strand<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Strand> {
        let strand = parts.next().ok_or_eyre("Missing strand")?;
        Strand::try_from(strand).map_err(|_| eyre!("Invalid strand: {strand}"))
    }

    pub fn number<'a, T: std::str::FromStr<Err: std::error::Error + Send + Sync + 'static>>(
        parts: &mut impl Iterator<Item = &'a str>,
        what: &str,
    ) -> Result<T> {
        let value = parts.next().ok_or_else(|| eyre!("Missing {what}"))?;
        value
            .parse()
            .wrap_err_with(|| format!("Invalid {what}: {value}"))
    }

    /// `strand start end len` columns of the M4 family.
    pub fn side<'a>(name: String, parts: &mut impl Iterator<Item = &'a str>) -> Result<Side> {
        let strand = strand(parts)?;
        let start = number(parts, "start")?;
        let end = number(parts, "end")?;
        let len = number(parts, "length")?;
        Side::new(name, strand, start, end, len)
    }

    pub fn script(script: &str) -> Result<Vec<Step<u32>>> {
        Step::parse_rle(script).wrap_err("Invalid edit script")
    }

    pub fn m4<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Record> {
        let mut record = m4a(parts, false)?;
        record.normalize();
        Ok(record)
    }

    pub fn m4a<'a>(parts: &mut impl Iterator<Item = &'a str>, with_script: bool) -> Result<Record> {
        let a = name(parts, "name of read a")?;
        let b = name(parts, "name of read b")?;
        let identity = number(parts, "identity")?;
        let _score: f64 = number(parts, "score")?;
        let a = side(a, parts)?;
        let b = side(b, parts)?;

        let script = match (with_script, parts.next()) {
            (true, Some(x)) => script(x)?,
            _ => Vec::new(),
        };
        Record::new(a, b, identity, script)
    }

    /// PAF coordinates are forward-strand for both reads. The query becomes side `a` and stays
    /// on the forward strand. The target becomes side `b` and takes the relative strand, its
    /// interval is mapped onto that strand. Records therefore follow the same convention as
    /// M4 input after [`Record::normalize`]; the PAF columns are not copied verbatim.
    pub fn paf<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Record> {
        let qname = name(parts, "query name")?;
        let qlen = number(parts, "query length")?;
        let qstart = number(parts, "query start")?;
        let qend = number(parts, "query end")?;
        let relative = strand(parts)?;
        let tname = name(parts, "target name")?;
        let tlen = number(parts, "target length")?;
        let tstart = number(parts, "target start")?;
        let tend = number(parts, "target end")?;
        let matches: usize = number(parts, "number of matches")?;
        let block: usize = number(parts, "alignment block length")?;
        let _mapq: u32 = number(parts, "mapping quality")?;
        ensure!(block > 0, "Alignment block length must be positive");

        let a = Side::new(qname, Strand::Forward, qstart, qend, qlen)?;
        let b = Side::new(tname, Strand::Forward, tstart, tend, tlen)?.on_strand(relative);

        let (mut script, mut repeat) = (Vec::new(), 0usize);
        for tag in parts {
            if let Some(value) = tag.strip_prefix("cg:Z:") {
                match self::script(value) {
                    Ok(x) => script = x,
                    Err(err) => log::warn!("Ignoring malformed cg:Z: tag {value}: {err:#}"),
                }
            } else if let Some(value) = tag.strip_prefix("rl:i:") {
                match value.parse() {
                    Ok(x) => repeat = x,
                    Err(_) => log::warn!("Ignoring malformed rl:i: tag {value}"),
                }
            }
        }

        let mut identity = matches as f64 * 100.0 / block as f64;
        if script.is_empty() && repeat != 0 && *a.len() > 0 {
            let (matches, span) = (matches as f64, a.span() as f64);
            let repeat = repeat as f64 / *a.len() as f64;
            identity = (repeat * (span - matches) + matches) * 100.0 / block as f64;
        }
        Record::new(a, b, identity, script)
    }
}

/// Line-based overlap reader. Empty lines and lines starting with `#` are skipped. Columns are
/// separated by any ASCII whitespace; trailing columns that the format doesn't use are ignored.
pub struct Reader<R> {
    reader: R,
    format: Format,
    buffer: String,
    line: usize,
}

impl Reader<()> {
    /// Open an overlap file. The format and GZIP compression are inferred from the extension.
    pub fn from_path(
        path: impl AsRef<Path>,
    ) -> Result<Box<dyn ReadRecord<Record = Record> + Send + 'static>> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let stream = decode::infer_from_path(path)?;
        Ok(Box::new(Reader::new(stream.buffered(), format)))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R, format: Format) -> Self {
        Self {
            reader,
            format,
            buffer: String::new(),
            line: 0,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(false);
            }
            self.line += 1;

            let line = self.buffer.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_ascii_whitespace();
            let parsed = match self.format {
                Format::M4 => parse::m4(&mut parts),
                Format::M4a => parse::m4a(&mut parts, true),
                Format::Paf => parse::paf(&mut parts),
            };
            *into = parsed.wrap_err_with(|| {
                format!(
                    "Failed to parse {} record at line {}: {line}",
                    self.format, self.line
                )
            })?;
            return Ok(true);
        }
    }
}

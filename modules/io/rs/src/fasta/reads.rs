use ahash::AHashMap;
use eyre::{ensure, Result, WrapErr};
use lrkit_core_rs::seq::{nucleotide, DnaSeq};

use super::Record;
use crate::ReadRecord;

/// Packed reads indexed by their names.
pub type Reads = AHashMap<String, DnaSeq>;

/// Load every record from the reader into a name-indexed map of packed sequences. Reads with
/// bases outside of A/C/G/T can't be packed and are skipped with a warning. Duplicated read names
/// are an error.
pub fn load_reads<R: ReadRecord<Record = Record> + ?Sized>(reader: &mut R) -> Result<Reads> {
    let mut reads = Reads::new();
    let mut record = Record::default();
    let mut skipped = 0usize;

    while reader.read_record(&mut record)? {
        let name = record.name();
        ensure!(!reads.contains_key(name), "Duplicated read name: {name}");

        if !nucleotide::check(record.seq(), false) {
            log::warn!("Skipping read {name}: it has bases other than A/C/G/T");
            skipped += 1;
            continue;
        }
        let seq = DnaSeq::new(record.seq())
            .wrap_err_with(|| format!("Failed to pack read {name}"))?;
        reads.insert(name.to_owned(), seq);
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} reads with unsupported bases");
    }
    log::info!("Loaded {} reads", reads.len());
    Ok(reads)
}

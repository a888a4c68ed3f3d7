use std::fs;
use std::io::Write;
use std::path::PathBuf;

use eyre::Result;
use lrkit_core_rs::loc::Strand;
use lrkit_io_rs::compression::encode;
use lrkit_io_rs::overlap::{Reader, Record, Side, Writer};
use lrkit_io_rs::{fasta, ReadRecord};

/// Fresh directory under the system temp dir, unique per test.
fn scratch(test: &str) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("lrkit-io-{}-{test}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn overlaps() -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (ind, strand) in [Strand::Forward, Strand::Reverse, Strand::Forward]
        .into_iter()
        .enumerate()
    {
        let a = Side::new(format!("read{ind}"), Strand::Forward, ind, 100 + ind, 500)?;
        let b = Side::new(format!("read{}", ind + 1), strand, 0, 120, 800)?;
        records.push(Record::new(a, b, 90.0 + ind as f64, Vec::new())?);
    }
    Ok(records)
}

#[test]
fn test_overlaps_through_files() -> Result<()> {
    let dir = scratch("overlaps")?;
    let expected = overlaps()?;

    for name in ["ovlp.m4", "ovlp.m4a.gz", "ovlp.paf", "ovlp.paf.gz"] {
        let path = dir.join(name);
        {
            let mut writer = Writer::from_path(&path)?;
            writer.write_records(&expected)?;
            writer.flush()?;
        }

        let mut records = Vec::new();
        Reader::from_path(&path)?.read_to_end(&mut records)?;
        assert_eq!(records.len(), expected.len(), "{name}");
        for (record, expected) in records.iter().zip(&expected) {
            assert_eq!(record.a(), expected.a(), "{name}");
            assert_eq!(record.b(), expected.b(), "{name}");
        }
    }

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_unknown_format() -> Result<()> {
    let dir = scratch("unknown")?;
    let path = dir.join("ovlp.txt");
    fs::write(&path, "r1 r2 95 -9 0 0 10 10 0 0 10 10\n")?;

    assert!(Reader::from_path(&path).is_err());
    assert!(Writer::from_path(dir.join("ovlp.bed")).is_err());

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_reads_from_gzip() -> Result<()> {
    let dir = scratch("reads")?;
    let path = dir.join("reads.fa.gz");
    {
        let mut stream = encode::infer_from_path(&path)?;
        stream.write_all(b">r1 sample=1\nACGTACGT\nGG\n>r2\nTTTT\n")?;
        stream.finish()?;
    }

    let reads = fasta::load_reads(&mut *fasta::Reader::from_path(&path)?)?;
    assert_eq!(reads.len(), 2);
    assert_eq!(reads["r1"].to_string(), "ACGTACGTGG");
    assert_eq!(reads["r2"].len(), 4);

    fs::remove_dir_all(&dir)?;
    Ok(())
}

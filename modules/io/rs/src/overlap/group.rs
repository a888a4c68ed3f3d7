use ahash::AHashMap;

use super::record::Record;

/// Overlaps indexed by read name in both directions: `grouped[a][b]` and `grouped[b][a]` point to
/// the same record.
pub type Grouped<'a> = AHashMap<&'a str, AHashMap<&'a str, &'a Record>>;

/// Index overlaps by the names of both reads. When a pair of reads has several overlaps, the one
/// with the largest aligned length is kept (the first one on ties).
pub fn group(records: &[Record]) -> Grouped<'_> {
    let mut grouped = Grouped::new();
    for record in records {
        let (a, b) = (record.a().name().as_str(), record.b().name().as_str());
        for (from, to) in [(a, b), (b, a)] {
            let best = grouped.entry(from).or_default().entry(to).or_insert(record);
            if record.aligned_length() > best.aligned_length() {
                *best = record;
            }
        }
    }
    grouped
}

use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

/// A single FASTA record with the following guarantees:
/// - The ID is a non-empty UTF-8 string without newline characters (CR or LF).
/// - The sequence is non-empty and contains only ASCII alphabetic characters.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Dissolve, Getters)]
pub struct Record {
    id: String,
    seq: Vec<u8>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: "Default ID".to_string(),
            seq: b"ACGT".to_vec(),
        }
    }
}

impl Record {
    pub fn new(id: String, seq: Vec<u8>) -> Result<Self> {
        Self::validate_id(&id)?;
        Self::validate_seq(&seq)?;
        Ok(Self { id, seq })
    }

    /// Read name: the ID up to the first whitespace character. Overlap files refer to reads by it.
    pub fn name(&self) -> &str {
        self.id.split_whitespace().next().unwrap_or(&self.id)
    }

    pub fn validate_id(id: &str) -> Result<()> {
        ensure!(!id.is_empty(), "FASTA ID cannot be empty");
        ensure!(
            !id.contains(['\n', '\r']),
            "Newline characters are not allowed in the FASTA ID: {id}"
        );
        Ok(())
    }

    pub fn validate_seq(seq: &[u8]) -> Result<()> {
        ensure!(!seq.is_empty(), "FASTA sequence cannot be empty");
        for (i, &x) in seq.iter().enumerate() {
            ensure!(
                x.is_ascii_alphabetic(),
                "Non-alphabetic character at index {i} = {:?}",
                char::from(x)
            );
        }
        Ok(())
    }

    /// Mutable access for readers that fill the record in place and validate it afterwards.
    pub(super) fn fields(&mut self) -> (&mut String, &mut Vec<u8>) {
        (&mut self.id, &mut self.seq)
    }
}

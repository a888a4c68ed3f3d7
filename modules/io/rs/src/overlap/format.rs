use std::fmt::{Display, Formatter};
use std::path::Path;

use eyre::{eyre, Result};

use crate::compression;

/// Supported overlap file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// BLASR-like M4: `a b identity score a.strand a.start a.end a.len b.strand b.start b.end b.len`
    M4,
    /// M4 with an optional 13th column holding the edit script.
    M4a,
    /// Pairwise mApping Format, `cg:Z:` and `rl:i:` tags are recognized.
    Paf,
}

impl Format {
    /// Infer the format from the file extension, ignoring the compression one if present.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        compression::content_extension(path)
            .and_then(|ext| Self::try_from(ext).ok())
            .ok_or_else(|| eyre!("Unknown overlap format for file {}", path.display()))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::M4 => "m4",
            Format::M4a => "m4a",
            Format::Paf => "paf",
        }
    }
}

impl TryFrom<&str> for Format {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "m4" => Ok(Format::M4),
            "m4a" => Ok(Format::M4a),
            "paf" => Ok(Format::Paf),
            _ => Err(()),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::M4 => "M4",
            Format::M4a => "M4a",
            Format::Paf => "PAF",
        };
        write!(f, "{name}")
    }
}

//! Transparent (de)compression of text streams. The container is chosen from the file extension:
//! `.gz`/`.gzip` is a (multi-member) GZIP stream, everything else is read and written as-is.

pub mod decode;
pub mod encode;

use std::path::Path;

/// Returns `true` if the path names a GZIP-compressed file.
pub fn is_gzip(path: impl AsRef<Path>) -> bool {
    matches!(
        path.as_ref().extension().and_then(|ext| ext.to_str()),
        Some("gz" | "gzip")
    )
}

/// Extension describing the content of the file, skipping the compression one if present:
/// `ovlp.paf.gz` -> `paf`, `ovlp.m4` -> `m4`.
pub fn content_extension(path: &Path) -> Option<&str> {
    let path = match is_gzip(path) {
        true => Path::new(path.file_stem()?),
        false => path,
    };
    path.extension().and_then(|ext| ext.to_str())
}

use std::fs::File;
use std::io::Write;
use std::path::Path;

use derive_getters::Getters;
use eyre::{ensure, Result, WrapErr};
use flate2::write::GzEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters)]
pub struct Deflate {
    level: u8,
}

impl Deflate {
    pub const FAST: Deflate = Deflate { level: 1 };
    pub const DEFAULT: Deflate = Deflate { level: 6 };
    pub const BEST: Deflate = Deflate { level: 9 };

    pub fn new(level: u8) -> Result<Self> {
        ensure!(level <= 9, "Invalid DEFLATE compression level: {level}");
        Ok(Self { level })
    }
}

impl Default for Deflate {
    fn default() -> Self {
        Deflate::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Config {
    #[default]
    Raw,
    Gzip(Deflate),
}

impl Config {
    pub fn infer_from_path(path: impl AsRef<Path>) -> Self {
        match super::is_gzip(path) {
            true => Config::Gzip(Deflate::default()),
            false => Config::Raw,
        }
    }
}

/// Output stream. The GZIP trailer is written when the stream is dropped.
pub enum Stream<W: Write + Send + 'static> {
    Raw(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write + Send + 'static> Stream<W> {
    pub fn new(inner: W, config: &Config) -> Self {
        match config {
            Config::Raw => Stream::Raw(inner),
            Config::Gzip(params) => Stream::Gzip(GzEncoder::new(
                inner,
                flate2::Compression::new(*params.level() as u32),
            )),
        }
    }

    /// Finish the stream (writing the GZIP trailer if needed) and return the inner writer.
    pub fn finish(self) -> Result<W> {
        match self {
            Stream::Raw(w) => Ok(w),
            Stream::Gzip(w) => Ok(w.finish()?),
        }
    }
}

impl<W: Write + Send + 'static> Write for Stream<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Stream::Raw(w) => w.write(buf),
            Stream::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Stream::Raw(w) => w.flush(),
            Stream::Gzip(w) => w.flush(),
        }
    }
}

/// Create the file and compress it according to its extension.
pub fn infer_from_path(path: impl AsRef<Path>) -> Result<Stream<File>> {
    let path = path.as_ref();
    let file =
        File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    Ok(Stream::new(file, &Config::infer_from_path(path)))
}

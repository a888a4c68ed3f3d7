use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use eyre::{Result, WrapErr};
use flate2::read::MultiGzDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Config {
    #[default]
    Raw,
    Gzip,
}

impl Config {
    pub fn infer_from_path(path: impl AsRef<Path>) -> Self {
        match super::is_gzip(path) {
            true => Config::Gzip,
            false => Config::Raw,
        }
    }
}

pub enum Stream<R: Read + Send + 'static> {
    Raw(R),
    Gzip(MultiGzDecoder<R>),
}

impl<R: Read + Send + 'static> Stream<R> {
    pub fn new(inner: R, config: &Config) -> Self {
        match config {
            Config::Raw => Stream::Raw(inner),
            Config::Gzip => Stream::Gzip(MultiGzDecoder::new(inner)),
        }
    }

    pub fn boxed(self) -> Box<dyn Read + Send + 'static> {
        match self {
            Stream::Raw(r) => Box::new(r),
            Stream::Gzip(r) => Box::new(r),
        }
    }

    pub fn buffered(self) -> Box<dyn BufRead + Send + 'static> {
        match self {
            Stream::Raw(r) => Box::new(BufReader::new(r)),
            Stream::Gzip(r) => Box::new(BufReader::new(r)),
        }
    }
}

impl<R: Read + Send + 'static> Read for Stream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Stream::Raw(r) => r.read(buf),
            Stream::Gzip(r) => r.read(buf),
        }
    }
}

/// Open the file and decompress it according to its extension.
pub fn infer_from_path(path: impl AsRef<Path>) -> Result<Stream<File>> {
    let path = path.as_ref();
    let file = File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    Ok(Stream::new(file, &Config::infer_from_path(path)))
}

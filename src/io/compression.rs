//! Gzip support for dataset archives and JSONL outputs.
//!
//! Two entry points cover reading:
//! - [`gzip_reader`] is strict: the stream must start with the gzip magic
//!   bytes, otherwise it fails naming the path. Dataset archives go through
//!   this one.
//! - [`auto_detect_reader`] decompresses when the path ends in `.gz`/`.gzip`
//!   or the stream starts with the magic bytes, and passes data through
//!   unchanged otherwise.
//!
//! [`auto_detect_writer`] compresses when the output path ends in a gzip
//! extension and buffers the plain writer otherwise. Either way the result
//! must be closed with [`OutputWriter::finish`].

use anyhow::{Result, bail};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Leading bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const GZIP_EXTENSIONS: &[&str] = &[".gz", ".gzip"];

/// Whether `path` carries a gzip extension (case-insensitive).
#[must_use]
pub fn has_gzip_extension(path: impl AsRef<Path>) -> bool {
    let s = path.as_ref().to_string_lossy().to_lowercase();
    GZIP_EXTENSIONS.iter().any(|ext| s.ends_with(ext))
}

/// Peek at the start of `reader` without consuming it.
///
/// # Errors
/// Returns an error if the underlying read fails.
pub fn has_gzip_magic<R: BufRead>(reader: &mut R) -> Result<bool> {
    let buf = reader.fill_buf()?;
    Ok(buf.starts_with(&GZIP_MAGIC))
}

/// Wrap `reader` in a gzip decoder, failing if it is not a gzip stream.
///
/// # Errors
/// Returns an error if the first bytes are not the gzip magic, if peeking
/// fails, or if gzip support is compiled out.
pub fn gzip_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    let path = path_hint.as_ref();
    let mut buf = BufReader::new(reader);
    if !has_gzip_magic(&mut buf)? {
        bail!("{} is not a gzip-compressed file", path.display());
    }
    wrap_gzip_reader(buf, path)
}

/// Decompress when the path or the leading bytes say gzip; pass through
/// otherwise.
///
/// # Errors
/// Returns an error if peeking fails or gzip input is found while gzip
/// support is compiled out.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    let path = path_hint.as_ref();
    let mut buf = BufReader::new(reader);
    if has_gzip_extension(path) || has_gzip_magic(&mut buf)? {
        return wrap_gzip_reader(buf, path);
    }
    Ok(Box::new(buf))
}

/// Output stream returned by [`auto_detect_writer`].
///
/// Call [`finish`](OutputWriter::finish) when done: it flushes the buffer
/// and, for gzip, writes the trailer, reporting any error from either.
pub enum OutputWriter<W: Write> {
    Plain(BufWriter<W>),
    #[cfg(feature = "compression-gzip")]
    Gzip(flate2::write::GzEncoder<BufWriter<W>>),
}

impl<W: Write> OutputWriter<W> {
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        !matches!(self, OutputWriter::Plain(_))
    }

    /// Finish the stream and hand back the underlying writer.
    ///
    /// # Errors
    /// Returns the first I/O error raised while flushing or finishing.
    pub fn finish(self) -> io::Result<W> {
        let buffered = match self {
            OutputWriter::Plain(w) => w,
            #[cfg(feature = "compression-gzip")]
            OutputWriter::Gzip(enc) => enc.finish()?,
        };
        buffered.into_inner().map_err(io::IntoInnerError::into_error)
    }
}

impl<W: Write> Write for OutputWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputWriter::Plain(w) => w.write(buf),
            #[cfg(feature = "compression-gzip")]
            OutputWriter::Gzip(enc) => enc.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Plain(w) => w.flush(),
            #[cfg(feature = "compression-gzip")]
            OutputWriter::Gzip(enc) => enc.flush(),
        }
    }
}

/// Compress when `path_hint` carries a gzip extension; buffer otherwise.
///
/// # Errors
/// Returns an error if a gzip path is given while gzip support is compiled
/// out.
pub fn auto_detect_writer<W: Write>(
    writer: W,
    path_hint: impl AsRef<Path>,
) -> Result<OutputWriter<W>> {
    let path = path_hint.as_ref();
    if has_gzip_extension(path) {
        return wrap_gzip_writer(writer, path);
    }
    Ok(OutputWriter::Plain(BufWriter::new(writer)))
}

#[cfg(feature = "compression-gzip")]
fn wrap_gzip_reader<R: BufRead + 'static>(reader: R, _path: &Path) -> Result<Box<dyn Read>> {
    use flate2::bufread::MultiGzDecoder;
    Ok(Box::new(MultiGzDecoder::new(reader)))
}

#[cfg(not(feature = "compression-gzip"))]
fn wrap_gzip_reader<R: BufRead + 'static>(_reader: R, path: &Path) -> Result<Box<dyn Read>> {
    bail!(
        "{} is gzip-compressed but the `compression-gzip` feature is disabled",
        path.display()
    )
}

#[cfg(feature = "compression-gzip")]
fn wrap_gzip_writer<W: Write>(writer: W, _path: &Path) -> Result<OutputWriter<W>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    Ok(OutputWriter::Gzip(GzEncoder::new(
        BufWriter::new(writer),
        Compression::default(),
    )))
}

#[cfg(not(feature = "compression-gzip"))]
fn wrap_gzip_writer<W: Write>(_writer: W, path: &Path) -> Result<OutputWriter<W>> {
    bail!(
        "cannot write {}: the `compression-gzip` feature is disabled",
        path.display()
    )
}

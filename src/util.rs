use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

pub fn looks_like_gzip<R: Read + Seek>(mut r: R) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let pos = r.stream_position()?;
    let n = r.read(&mut magic)?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}

pub fn open_file(path: &Path) -> io::Result<File> {
    File::open(path)
}

pub(crate) fn has_gz_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Open `path` as a plain byte stream, decoding gzip transparently.
pub(crate) fn open_source(path: &Path) -> io::Result<Box<dyn Read + Send>> {
    let f = open_file(path)?;
    let is_gz = has_gz_extension(path) || looks_like_gzip(&f).unwrap_or(false);

    if is_gz {
        return open_gzip(path, f);
    }
    open_plain(path, f)
}

#[cfg(feature = "gzip")]
fn open_gzip(path: &Path, f: File) -> io::Result<Box<dyn Read + Send>> {
    log::debug!("opening {} as gzip", path.display());
    Ok(Box::new(flate2::read::MultiGzDecoder::new(f)))
}

#[cfg(not(feature = "gzip"))]
fn open_gzip(path: &Path, _f: File) -> io::Result<Box<dyn Read + Send>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{} is gzip-compressed but the `gzip` feature is disabled", path.display()),
    ))
}

#[cfg(feature = "mmap")]
fn open_plain(path: &Path, f: File) -> io::Result<Box<dyn Read + Send>> {
    use memmap2::Mmap;
    log::debug!("opening {} as plain text (mmap)", path.display());
    // Mmap is owned by the cursor, so the mapping lives as long as the reader.
    let mmap = unsafe { Mmap::map(&f) }?;
    Ok(Box::new(io::Cursor::new(mmap)))
}

#[cfg(not(feature = "mmap"))]
fn open_plain(path: &Path, f: File) -> io::Result<Box<dyn Read + Send>> {
    log::debug!("opening {} as plain text", path.display());
    Ok(Box::new(f))
}

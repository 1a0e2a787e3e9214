#![cfg(feature = "async")]

use crate::buffer::{Delim, Terminator, find_marker, trim_cr};
use crate::error::{IoContext, ParseError, SeqError};
use crate::policy::{ErrorPolicy, ReaderOptions};
use crate::record::{RecordFields, RecordRef, SeqRecord};
use crate::util::has_gz_extension;

use async_compression::tokio::bufread::GzipDecoder;
use memchr::memchr;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncSeekExt, BufReader, SeekFrom};

#[derive(Debug)]
pub enum AsyncSource {
    Path(PathBuf),
    Reader,
}

/// Async twin of the sync byte buffer; the refill is the only await point.
struct AsyncByteBuffer<R> {
    inner: R,
    buf: Box<[u8]>,
    begin: usize,
    end: usize,
    is_eof: bool,
    consumed: u64,
}

impl<R: AsyncRead + Unpin> AsyncByteBuffer<R> {
    fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            begin: 0,
            end: 0,
            is_eof: false,
            consumed: 0,
        }
    }

    async fn fill(&mut self) -> io::Result<bool> {
        if self.begin < self.end {
            return Ok(true);
        }
        if self.is_eof {
            return Ok(false);
        }
        self.consumed += self.end as u64;
        self.begin = 0;
        self.end = 0;
        let n = self.inner.read(&mut self.buf).await?;
        if n == 0 {
            self.is_eof = true;
            return Ok(false);
        }
        self.end = n;
        Ok(true)
    }

    async fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.fill().await? {
            return Ok(None);
        }
        let b = self.buf[self.begin];
        self.begin += 1;
        Ok(Some(b))
    }

    async fn read_until(&mut self, delim: Delim, dest: &mut Vec<u8>) -> io::Result<Terminator> {
        loop {
            if !self.fill().await? {
                return Ok(Terminator::Eof);
            }
            let window = &self.buf[self.begin..self.end];
            match delim.find(window) {
                Some(i) => {
                    dest.extend_from_slice(&window[..i]);
                    let b = window[i];
                    self.begin += i + 1;
                    return Ok(Terminator::Byte(b));
                }
                None => {
                    dest.extend_from_slice(window);
                    self.begin = self.end;
                }
            }
        }
    }

    async fn skip_line(&mut self) -> io::Result<Terminator> {
        loop {
            if !self.fill().await? {
                return Ok(Terminator::Eof);
            }
            match memchr(b'\n', &self.buf[self.begin..self.end]) {
                Some(i) => {
                    self.begin += i + 1;
                    return Ok(Terminator::Byte(b'\n'));
                }
                None => self.begin = self.end,
            }
        }
    }

    async fn scan_to_marker(&mut self) -> io::Result<Option<u8>> {
        loop {
            if !self.fill().await? {
                return Ok(None);
            }
            let window = &self.buf[self.begin..self.end];
            match find_marker(window) {
                Some(i) => {
                    let b = window[i];
                    self.begin += i + 1;
                    return Ok(Some(b));
                }
                None => self.begin = self.end,
            }
        }
    }

    fn reset(&mut self) {
        self.consumed += self.end as u64;
        self.begin = 0;
        self.end = 0;
        self.is_eof = false;
    }

    #[inline]
    fn byte_pos(&self) -> u64 {
        self.consumed + self.begin as u64
    }
}

/// Async FASTA/FASTQ reader (plain/.gz), streaming.
pub struct AsyncSeqReader<R> {
    src: AsyncSource,
    buf: AsyncByteBuffer<R>,
    opts: ReaderOptions,
    fields: RecordFields,
    last_char: Option<u8>,
    records_read: u64,
}

impl AsyncSeqReader<Box<dyn AsyncRead + Unpin + Send>> {
    /// Open async from path; `.gz` auto-detect by extension or magic bytes.
    pub async fn from_path<P: AsRef<Path>>(
        path: P,
        opts: ReaderOptions,
    ) -> Result<Self, SeqError> {
        let path = path.as_ref().to_path_buf();
        let mut f = File::open(&path)
            .await
            .map_err(|e| SeqError::io_err(e, IoContext::default()))?;

        let is_gz = has_gz_extension(&path) || looks_like_gzip_async(&mut f).await.unwrap_or(false);

        let inner: Box<dyn AsyncRead + Unpin + Send> = if is_gz {
            log::debug!("opening {} as gzip (async)", path.display());
            let mut gz = GzipDecoder::new(BufReader::with_capacity(256 * 1024, f));
            gz.multiple_members(true);
            Box::new(gz)
        } else {
            log::debug!("opening {} as plain text (async)", path.display());
            Box::new(f)
        };

        let mut reader = Self::with_options(inner, opts);
        reader.src = AsyncSource::Path(path);
        Ok(reader)
    }
}

impl<R: AsyncRead + Unpin> AsyncSeqReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, ReaderOptions::default())
    }

    /// Wrap any `AsyncRead`.
    pub fn with_options(inner: R, opts: ReaderOptions) -> Self {
        Self {
            src: AsyncSource::Reader,
            buf: AsyncByteBuffer::with_capacity(opts.buffer_capacity, inner),
            opts,
            fields: RecordFields::default(),
            last_char: None,
            records_read: 0,
        }
    }

    /// Fetch next record (async), honoring the error policy.
    pub async fn next_record(&mut self) -> Option<Result<SeqRecord, SeqError>> {
        loop {
            match self.read_record().await {
                Ok(Some(rec)) => return Some(Ok(rec)),
                Ok(None) => return None,
                Err(err @ SeqError::Parse { .. })
                    if self.opts.error_policy == ErrorPolicy::Skip =>
                {
                    log::warn!("skipping malformed record: {err}");
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }

    pub async fn read_record(&mut self) -> Result<Option<SeqRecord>, SeqError> {
        if !self.parse_next().await? {
            return Ok(None);
        }
        Ok(Some(self.fields.take(self.opts.reuse_buffers)))
    }

    pub async fn read_record_ref(&mut self) -> Result<Option<RecordRef<'_>>, SeqError> {
        if !self.parse_next().await? {
            return Ok(None);
        }
        Ok(Some(self.fields.view()))
    }

    /// Same contract as the sync `rewind`: no seek is issued.
    pub fn rewind(&mut self) {
        self.last_char = None;
        self.buf.reset();
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    pub fn source(&self) -> &AsyncSource {
        &self.src
    }

    pub fn into_inner(self) -> R {
        self.buf.inner
    }

    async fn parse_next(&mut self) -> Result<bool, SeqError> {
        let res = self.parse_record().await;
        if matches!(res, Ok(true) | Err(SeqError::Parse { .. })) {
            self.records_read += 1;
        }
        res
    }

    async fn parse_record(&mut self) -> Result<bool, SeqError> {
        if self.last_char.take().is_none() {
            let marker = self.buf.scan_to_marker().await.map_err(|e| self.io(e))?;
            if marker.is_none() {
                return Ok(false);
            }
        }
        self.fields.clear();

        if !self.buf.fill().await.map_err(|e| self.io(e))? {
            return Ok(false);
        }
        let term = self
            .buf
            .read_until(Delim::Space, &mut self.fields.name)
            .await
            .map_err(|e| self.io(e))?;
        if term != Terminator::Byte(b'\n') {
            self.buf
                .read_until(Delim::Line, &mut self.fields.comment)
                .await
                .map_err(|e| self.io(e))?;
            trim_cr(&mut self.fields.comment, 0);
        }

        let stop = loop {
            match self.buf.next_byte().await.map_err(|e| self.io(e))? {
                None => break None,
                Some(c @ (b'>' | b'@' | b'+')) => break Some(c),
                Some(b'\n') => continue,
                Some(c) => {
                    let start = self.fields.seq.len();
                    self.fields.seq.push(c);
                    self.buf
                        .read_until(Delim::Line, &mut self.fields.seq)
                        .await
                        .map_err(|e| self.io(e))?;
                    trim_cr(&mut self.fields.seq, start);
                }
            }
        };

        if stop != Some(b'+') {
            self.last_char = stop;
            return self.check_header();
        }

        self.fields.is_fastq = true;
        if self.buf.skip_line().await.map_err(|e| self.io(e))? == Terminator::Eof {
            return Err(self.parse(ParseError::TruncatedQuality {
                seq: self.fields.seq.len(),
                qual: 0,
            }));
        }
        let mut hit_eof = false;
        loop {
            let start = self.fields.qual.len();
            let term = self
                .buf
                .read_until(Delim::Line, &mut self.fields.qual)
                .await
                .map_err(|e| self.io(e))?;
            trim_cr(&mut self.fields.qual, start);
            if term == Terminator::Eof {
                hit_eof = true;
                break;
            }
            if self.fields.qual.len() >= self.fields.seq.len() {
                break;
            }
        }
        self.fields
            .check_quality(hit_eof)
            .map_err(|e| self.parse(e))?;
        self.check_header()
    }

    fn check_header(&self) -> Result<bool, SeqError> {
        self.fields
            .check_header(self.opts.header_policy)
            .map(|()| true)
            .map_err(|e| self.parse(e))
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.buf.byte_pos(),
            record_num: self.records_read,
        }
    }

    fn io(&self, e: io::Error) -> SeqError {
        SeqError::io_err(e, self.ctx())
    }

    fn parse(&self, e: ParseError) -> SeqError {
        SeqError::parse_err(e, self.ctx())
    }
}

async fn looks_like_gzip_async(f: &mut File) -> io::Result<bool> {
    let pos = f.stream_position().await?;
    let mut magic = [0u8; 2];
    let n = f.read(&mut magic).await?;
    f.seek(SeekFrom::Start(pos)).await?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}

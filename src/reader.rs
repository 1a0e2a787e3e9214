use crate::buffer::{ByteBuffer, Delim, Terminator, trim_cr};
use crate::error::{IoContext, ParseError, SeqError};
use crate::policy::{ErrorPolicy, ReaderOptions};
use crate::record::{RecordFields, RecordRef, SeqRecord};
use crate::util::open_source;

use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Source {
    Path(PathBuf),
    Reader,
}

/// Sync FASTA/FASTQ reader (plain/.gz), streaming, kseq record semantics.
///
/// Owns its byte source; it is released when the reader is dropped.
pub struct SeqReader<R> {
    src: Source,
    buf: ByteBuffer<R>,
    opts: ReaderOptions,
    fields: RecordFields,
    // First byte of the next header (`>`/`@`) if it was already consumed.
    last_char: Option<u8>,
    records_read: u64,
}

impl SeqReader<Box<dyn Read + Send>> {
    /// Open from a file path. Auto-detect `.gz` by extension or magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, SeqError> {
        let path = path.as_ref();
        let rdr = open_source(path).map_err(|e| SeqError::io_err(e, IoContext::default()))?;
        let mut reader = Self::with_options(rdr, opts);
        reader.src = Source::Path(path.to_path_buf());
        Ok(reader)
    }
}

impl<R: Read> SeqReader<R> {
    /// Wrap an arbitrary byte source with default options.
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, ReaderOptions::default())
    }

    pub fn with_options(inner: R, opts: ReaderOptions) -> Self {
        Self {
            src: Source::Reader,
            buf: ByteBuffer::with_capacity(opts.buffer_capacity, inner),
            opts,
            fields: RecordFields::default(),
            last_char: None,
            records_read: 0,
        }
    }

    /// Parse the next record and return an owned copy.
    ///
    /// `Ok(None)` is the clean end of the stream.
    pub fn read_record(&mut self) -> Result<Option<SeqRecord>, SeqError> {
        if !self.parse_next()? {
            return Ok(None);
        }
        Ok(Some(self.fields.take(self.opts.reuse_buffers)))
    }

    /// Parse the next record into the reader's own buffers and borrow them.
    pub fn read_record_ref(&mut self) -> Result<Option<RecordRef<'_>>, SeqError> {
        if !self.parse_next()? {
            return Ok(None);
        }
        Ok(Some(self.fields.view()))
    }

    /// Policy-aware `next`: parse errors are skipped under [`ErrorPolicy::Skip`].
    /// I/O errors are always returned.
    pub fn next_record(&mut self) -> Option<Result<SeqRecord, SeqError>> {
        loop {
            match self.read_record() {
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

    /// Forget the peeked header byte and any buffered input.
    ///
    /// No seek is issued: the caller is responsible for repositioning the
    /// byte source (see [`SeqReader::get_mut`]) before reading again.
    pub fn rewind(&mut self) {
        log::trace!("rewinding reader at byte {}", self.buf.byte_pos());
        self.last_char = None;
        self.buf.reset();
    }

    /// Records consumed from the stream so far, including skipped malformed ones.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.opts
    }

    pub fn get_ref(&self) -> &R {
        self.buf.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut R {
        self.buf.get_mut()
    }

    /// Release the byte source. Buffered, unparsed bytes are lost.
    pub fn into_inner(self) -> R {
        self.buf.into_inner()
    }

    fn parse_next(&mut self) -> Result<bool, SeqError> {
        let res = self.parse_record();
        if matches!(res, Ok(true) | Err(SeqError::Parse { .. })) {
            self.records_read += 1;
        }
        res
    }

    fn parse_record(&mut self) -> Result<bool, SeqError> {
        // Header marker: either left over from the previous call or found now.
        if self.last_char.take().is_none() {
            let marker = self.buf.scan_to_marker().map_err(|e| self.io(e))?;
            if marker.is_none() {
                return Ok(false);
            }
        }
        self.fields.clear();

        // A marker at the very end of the stream is not a record.
        if self.buf.at_eof().map_err(|e| self.io(e))? {
            return Ok(false);
        }
        let term = self
            .buf
            .read_until(Delim::Space, &mut self.fields.name)
            .map_err(|e| self.io(e))?;
        if term != Terminator::Byte(b'\n') {
            self.buf
                .read_until(Delim::Line, &mut self.fields.comment)
                .map_err(|e| self.io(e))?;
            trim_cr(&mut self.fields.comment, 0);
        }

        let stop = loop {
            match self.buf.next_byte().map_err(|e| self.io(e))? {
                None => break None,
                Some(c @ (b'>' | b'@' | b'+')) => break Some(c),
                Some(b'\n') => continue,
                Some(c) => {
                    let start = self.fields.seq.len();
                    self.fields.seq.push(c);
                    self.buf
                        .read_until(Delim::Line, &mut self.fields.seq)
                        .map_err(|e| self.io(e))?;
                    trim_cr(&mut self.fields.seq, start);
                }
            }
        };

        if stop != Some(b'+') {
            // FASTA: the stop byte, if any, opens the next record.
            self.last_char = stop;
            self.check_header()?;
            return Ok(true);
        }

        self.fields.is_fastq = true;
        if self.buf.skip_line().map_err(|e| self.io(e))? == Terminator::Eof {
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
        self.check_header()?;
        Ok(true)
    }

    fn check_header(&self) -> Result<(), SeqError> {
        self.fields
            .check_header(self.opts.header_policy)
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

impl<R: Read + Seek> SeqReader<R> {
    /// Seek the byte source back to offset 0 and start over.
    pub fn rewind_to_start(&mut self) -> Result<(), SeqError> {
        self.buf
            .get_mut()
            .seek(SeekFrom::Start(0))
            .map_err(|e| SeqError::io_err(e, IoContext::default()))?;
        self.rewind();
        self.buf.reset_position();
        self.records_read = 0;
        Ok(())
    }
}

impl<R: Read> Iterator for SeqReader<R> {
    type Item = Result<SeqRecord, SeqError>;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

//! Fixed-capacity refillable byte cursor over a byte source.

use memchr::{memchr, memchr2};
use std::io::{self, Read};

/// Delimiter classes understood by [`ByteBuffer::read_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delim {
    /// `\n` only.
    Line,
    /// Any C `isspace` byte: space, `\t`, `\n`, `\v`, `\f`, `\r`.
    Space,
}

impl Delim {
    #[inline]
    pub(crate) fn find(self, window: &[u8]) -> Option<usize> {
        match self {
            Delim::Line => memchr(b'\n', window),
            Delim::Space => window.iter().position(|&b| is_c_space(b)),
        }
    }
}

/// What ended a [`ByteBuffer::read_until`] scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terminator {
    Byte(u8),
    Eof,
}

#[inline]
fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Drop a `\r` left at the end of the bytes appended since `start`.
#[inline]
pub(crate) fn trim_cr(dest: &mut Vec<u8>, start: usize) {
    if dest.len() > start && dest.last() == Some(&b'\r') {
        dest.pop();
    }
}

/// Position of the first `>` or `@` in `window`.
#[inline]
pub(crate) fn find_marker(window: &[u8]) -> Option<usize> {
    memchr2(b'>', b'@', window)
}

/// `0 <= begin <= end <= buf.len()` holds at all times.
pub(crate) struct ByteBuffer<R> {
    inner: R,
    buf: Box<[u8]>,
    begin: usize,
    end: usize,
    is_eof: bool,
    // bytes pulled from `inner` before the current window
    consumed: u64,
}

impl<R: Read> ByteBuffer<R> {
    pub(crate) fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            begin: 0,
            end: 0,
            is_eof: false,
            consumed: 0,
        }
    }

    /// Make sure unread bytes are available. `Ok(false)` means end of stream.
    fn fill(&mut self) -> io::Result<bool> {
        if self.begin < self.end {
            return Ok(true);
        }
        if self.is_eof {
            return Ok(false);
        }
        self.consumed += self.end as u64;
        self.begin = 0;
        self.end = 0;
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(0) => {
                    self.is_eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.end = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub(crate) fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }
        let b = self.buf[self.begin];
        self.begin += 1;
        Ok(Some(b))
    }

    /// True when no byte is left, refilling first if needed.
    pub(crate) fn at_eof(&mut self) -> io::Result<bool> {
        Ok(!self.fill()?)
    }

    /// Append bytes to `dest` up to the first delimiter, which is consumed
    /// but not appended.
    pub(crate) fn read_until(&mut self, delim: Delim, dest: &mut Vec<u8>) -> io::Result<Terminator> {
        loop {
            if !self.fill()? {
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

    /// Consume through the next `\n` without keeping anything.
    pub(crate) fn skip_line(&mut self) -> io::Result<Terminator> {
        loop {
            if !self.fill()? {
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

    /// Consume bytes up to and including the next `>` or `@`.
    pub(crate) fn scan_to_marker(&mut self) -> io::Result<Option<u8>> {
        loop {
            if !self.fill()? {
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

    /// Drop buffered bytes and the end-of-stream flag; the source is not touched.
    pub(crate) fn reset(&mut self) {
        self.consumed += self.end as u64;
        self.begin = 0;
        self.end = 0;
        self.is_eof = false;
    }

    pub(crate) fn reset_position(&mut self) {
        self.reset();
        self.consumed = 0;
    }

    #[inline]
    pub(crate) fn byte_pos(&self) -> u64 {
        self.consumed + self.begin as u64
    }

    pub(crate) fn get_ref(&self) -> &R {
        &self.inner
    }

    pub(crate) fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub(crate) fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most one byte per `read` call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&b, rest)) if !out.is_empty() => {
                    out[0] = b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn next_byte_refills_across_reads() {
        let mut b = ByteBuffer::with_capacity(4, Trickle(b"ab"));
        assert_eq!(b.next_byte().unwrap(), Some(b'a'));
        assert_eq!(b.next_byte().unwrap(), Some(b'b'));
        assert_eq!(b.next_byte().unwrap(), None);
        assert_eq!(b.next_byte().unwrap(), None);
        assert_eq!(b.byte_pos(), 2);
    }

    #[test]
    fn read_until_spans_refills() {
        let mut b = ByteBuffer::with_capacity(3, &b"hello world\nrest"[..]);
        let mut dest = Vec::new();
        assert_eq!(b.read_until(Delim::Space, &mut dest).unwrap(), Terminator::Byte(b' '));
        assert_eq!(dest, b"hello");
        dest.clear();
        assert_eq!(b.read_until(Delim::Line, &mut dest).unwrap(), Terminator::Byte(b'\n'));
        assert_eq!(dest, b"world");
        dest.clear();
        assert_eq!(b.read_until(Delim::Line, &mut dest).unwrap(), Terminator::Eof);
        assert_eq!(dest, b"rest");
    }

    #[test]
    fn space_delimiter_includes_tab_and_cr() {
        let mut b = ByteBuffer::with_capacity(16, &b"id\tx"[..]);
        let mut dest = Vec::new();
        assert_eq!(b.read_until(Delim::Space, &mut dest).unwrap(), Terminator::Byte(b'\t'));
        let mut b = ByteBuffer::with_capacity(16, &b"id\r\n"[..]);
        dest.clear();
        assert_eq!(b.read_until(Delim::Space, &mut dest).unwrap(), Terminator::Byte(b'\r'));
        assert_eq!(dest, b"id");
    }

    #[test]
    fn scan_to_marker_skips_junk() {
        let mut b = ByteBuffer::with_capacity(2, Trickle(b"junk\n@r"));
        assert_eq!(b.scan_to_marker().unwrap(), Some(b'@'));
        assert_eq!(b.next_byte().unwrap(), Some(b'r'));
        assert_eq!(b.scan_to_marker().unwrap(), None);
    }

    #[test]
    fn skip_line_stops_after_newline() {
        let mut b = ByteBuffer::with_capacity(2, &b"+name\n!!"[..]);
        assert_eq!(b.skip_line().unwrap(), Terminator::Byte(b'\n'));
        assert_eq!(b.next_byte().unwrap(), Some(b'!'));
        assert_eq!(b.skip_line().unwrap(), Terminator::Eof);
    }

    #[test]
    fn trim_cr_only_touches_appended_bytes() {
        let mut v = b"AC\r".to_vec();
        trim_cr(&mut v, 3);
        assert_eq!(v, b"AC\r");
        trim_cr(&mut v, 2);
        assert_eq!(v, b"AC");
    }

    #[test]
    fn refill_error_propagates() {
        let mut b = ByteBuffer::with_capacity(8, Failing);
        let err = b.next_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

use crate::error::ParseError;
use crate::policy::HeaderPolicy;

use std::borrow::Cow;

/// One FASTA or FASTQ record, owned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeqRecord {
    pub name: Vec<u8>,
    pub comment: Option<Vec<u8>>,
    pub seq: Vec<u8>,
    /// Present iff the record was FASTQ; same length as `seq`.
    pub qual: Option<Vec<u8>>,
}

impl SeqRecord {
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
    #[inline]
    pub fn is_fastq(&self) -> bool {
        self.qual.is_some()
    }

    pub fn name_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn comment_str(&self) -> Option<Cow<'_, str>> {
        self.comment.as_deref().map(String::from_utf8_lossy)
    }

    pub fn as_record_ref(&self) -> RecordRef<'_> {
        RecordRef {
            name: &self.name,
            comment: self.comment.as_deref(),
            seq: &self.seq,
            qual: self.qual.as_deref(),
        }
    }
}

/// Borrowed view of the record currently held by a reader.
///
/// Valid until the next read call on the same reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRef<'a> {
    pub name: &'a [u8],
    pub comment: Option<&'a [u8]>,
    pub seq: &'a [u8],
    pub qual: Option<&'a [u8]>,
}

impl RecordRef<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
    #[inline]
    pub fn is_fastq(&self) -> bool {
        self.qual.is_some()
    }

    pub fn to_owned_record(&self) -> SeqRecord {
        SeqRecord {
            name: self.name.to_vec(),
            comment: self.comment.map(<[u8]>::to_vec),
            seq: self.seq.to_vec(),
            qual: self.qual.map(<[u8]>::to_vec),
        }
    }
}

/// Field buffers a reader parses into; the kseq `name/comment/seq/qual` quad.
#[derive(Debug, Default)]
pub(crate) struct RecordFields {
    pub(crate) name: Vec<u8>,
    pub(crate) comment: Vec<u8>,
    pub(crate) seq: Vec<u8>,
    pub(crate) qual: Vec<u8>,
    pub(crate) is_fastq: bool,
}

impl RecordFields {
    pub(crate) fn clear(&mut self) {
        self.name.clear();
        self.comment.clear();
        self.seq.clear();
        self.qual.clear();
        self.is_fastq = false;
    }

    /// Quality must end up exactly as long as the sequence.
    pub(crate) fn check_quality(&self, hit_eof: bool) -> Result<(), ParseError> {
        let (seq, qual) = (self.seq.len(), self.qual.len());
        if qual == seq {
            Ok(())
        } else if qual < seq && hit_eof {
            Err(ParseError::TruncatedQuality { seq, qual })
        } else {
            Err(ParseError::QualityLengthMismatch { seq, qual })
        }
    }

    pub(crate) fn check_header(&self, policy: HeaderPolicy) -> Result<(), ParseError> {
        if policy == HeaderPolicy::Strict && self.name.is_empty() {
            return Err(ParseError::MalformedHeader);
        }
        Ok(())
    }

    pub(crate) fn view(&self) -> RecordRef<'_> {
        RecordRef {
            name: &self.name,
            comment: (!self.comment.is_empty()).then_some(self.comment.as_slice()),
            seq: &self.seq,
            qual: self.is_fastq.then_some(self.qual.as_slice()),
        }
    }

    /// Copy out (buffers keep their capacity) or move the buffers out whole.
    pub(crate) fn take(&mut self, reuse_buffers: bool) -> SeqRecord {
        if reuse_buffers {
            return self.view().to_owned_record();
        }
        let comment = std::mem::take(&mut self.comment);
        SeqRecord {
            name: std::mem::take(&mut self.name),
            comment: (!comment.is_empty()).then_some(comment),
            seq: std::mem::take(&mut self.seq),
            qual: self.is_fastq.then(|| std::mem::take(&mut self.qual)),
        }
    }
}

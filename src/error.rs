use std::io;
use thiserror::Error;

/// Where in the stream an error was raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoContext {
    /// Bytes consumed from the byte source so far.
    pub byte_pos: u64,
    /// 0-based index of the record being parsed.
    pub record_num: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("quality ended early: {qual} of {seq} bytes before end of stream")]
    TruncatedQuality { seq: usize, qual: usize },
    #[error("quality length ({qual}) does not match sequence length ({seq})")]
    QualityLengthMismatch { seq: usize, qual: usize },
    #[error("empty record name")]
    MalformedHeader,
}

#[derive(Debug, Error)]
pub enum SeqError {
    #[error("I/O error at {ctx:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("parse error at {ctx:?}: {source}")]
    Parse {
        #[source]
        source: ParseError,
        ctx: IoContext,
    },
}

impl SeqError {
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Io { source, ctx }
    }
    pub(crate) fn parse_err(source: ParseError, ctx: IoContext) -> Self {
        Self::Parse { source, ctx }
    }

    /// The parse error, if this is not an I/O failure.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::Io { .. } => None,
        }
    }

    pub fn context(&self) -> IoContext {
        match self {
            Self::Io { ctx, .. } | Self::Parse { ctx, .. } => *ctx,
        }
    }
}

//! Streaming FASTA/FASTQ reader with klib `kseq` record semantics.
//!
//! - Plain and `.gz` (auto-detect), or any `std::io::Read` byte source.
//! - Pull-based, one record per call, over a fixed-capacity byte buffer.
//! - Multi-line sequence and quality blocks; FASTA and FASTQ may be mixed.
//! - Quality blocks end by length, so `@`/`+` inside quality lines are safe.
//! - Owned records or zero-copy borrowed views of reused buffers.
//! - Optional `mmap` for plain files; `zlib` feature for system-zlib parity.
//! - Optional async API behind `async` feature.

mod buffer;
pub mod error;
pub mod policy;
pub mod reader;
pub mod record;
mod util;

#[cfg(feature = "async")]
pub mod async_reader;

pub use crate::error::{IoContext, ParseError, SeqError};
pub use crate::policy::{DEFAULT_BUFFER_CAPACITY, ErrorPolicy, HeaderPolicy, ReaderOptions};
pub use crate::reader::{SeqReader, Source};
pub use crate::record::{RecordRef, SeqRecord};

#[cfg(feature = "async")]
pub use crate::async_reader::AsyncSeqReader;

/// Default byte buffer size, matching kseq's stream buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 16 * 1024;

/// What to do when a record fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the error and continue with the next record.
    Skip,
    /// Return the first error to the caller.
    Return,
}

/// How strictly record headers are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// A bare `>`/`@` line yields a record with an empty name.
    Lenient,
    /// An empty name is a `MalformedHeader` error.
    Strict,
}

#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub buffer_capacity: usize,
    /// Keep field buffers allocated across calls (kseq semantics). When false,
    /// every owned record takes fresh buffers and nothing is copied.
    pub reuse_buffers: bool,
    pub error_policy: ErrorPolicy,
    pub header_policy: HeaderPolicy,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            reuse_buffers: false,
            error_policy: ErrorPolicy::Return,
            header_policy: HeaderPolicy::Lenient,
        }
    }
}

use std::io;
use std::str;
use thiserror::Error;

/// Possible errors that arise from parsing a BIG4 archive or from
/// converting RefPack data to or from its decompressed form.
#[derive(Debug, Error)]
pub enum BigError {
    #[error("not a BIG4 archive (invalid magic)")]
    BadMagic,

    #[error("entry table truncated after {found} of {expected} entries")]
    TruncatedTable { expected: u32, found: u32 },

    #[error("duplicate entry `{0}` in archive table")]
    DuplicateEntry(String),

    #[error("no entry named `{0}` in archive")]
    NotFound(String),

    #[error("invalid header for refpack data")]
    InvalidHeader,

    #[error("corrupt stream: out of bounds read at byte {0}")]
    CorruptStream(usize),

    #[error("{0}")]
    Utf8Error(#[from] str::Utf8Error),

    #[error("{0}")]
    Io(#[from] io::Error),
}

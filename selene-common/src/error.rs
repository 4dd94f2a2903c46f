//! Errors raised while encoding or decoding SELENE Device files.

/// Encoding/decoding failure for any of the binary formats.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("String of {len} bytes does not fit a u16 length prefix")]
    StringTooLong { len: usize },

    #[error("Unexpected end of data at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid {format} header")]
    InvalidHeader { format: &'static str },

    #[error("{count} trailing bytes after the end of the {format} data")]
    TrailingBytes { format: &'static str, count: usize },
}

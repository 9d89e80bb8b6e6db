//! Errors raised while reading a WAD and decoding its lumps.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WadError {
    /// The header signature is neither `IWAD` nor `PWAD`.
    #[error("invalid WAD signature: {0:02X?}")]
    InvalidFormat([u8; 4]),

    /// A read asked for more bytes than are left.
    #[error("truncated read at offset {offset}: wanted {wanted} bytes, {available} available")]
    Truncated { offset: usize, wanted: usize, available: usize },

    /// An offset lies outside of the buffer or archive.
    #[error("offset {offset} is out of range (length {len})")]
    OutOfRange { offset: i64, len: usize },

    /// Markers carry no payload and cannot be read as a blob.
    #[error("lump `{0}` is a marker and has no data")]
    EmptyEntry(String),

    #[error("lump `{0}` not found")]
    NotFound(String),

    #[error("lump `{name}` is ambiguous ({count} entries share the name)")]
    Ambiguous { name: String, count: usize },

    #[error("start marker `{0}` occurs more than once")]
    DuplicateStartMarker(String),

    #[error("end marker `{0}` occurs more than once")]
    DuplicateEndMarker(String),

    #[error("start marker `{0}` was not found")]
    StartMarkerNotFound(String),

    #[error("end marker `{0}` was not found")]
    EndMarkerNotFound(String),

    #[error("malformed picture: {0}")]
    MalformedPicture(String),

    /// A fixed-layout lump whose size or counts do not fit its record layout.
    #[error("malformed lump: {0}")]
    MalformedLump(String),

    #[error("I/O error: {0}")]
    IoFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WadError>;

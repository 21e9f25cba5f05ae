//! Error types for igwd-frame

use thiserror::Error;

/// Result type alias for igwd-frame operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for igwd-frame
#[derive(Error, Debug)]
pub enum Error {
    /// EOF encountered inside a length-prefixed structure
    #[error("truncated structure at offset {offset}: expected {expected} more bytes")]
    Truncated { offset: u64, expected: u64 },

    /// Per-structure CRC mismatch
    #[error(
        "corrupt structure (class {class_id}) at offset {offset}: expected checksum {expected:#010x}, computed {computed:#010x}"
    )]
    CorruptStructure {
        class_id: u16,
        offset: u64,
        expected: u32,
        computed: u32,
    },

    /// File-wide checksum mismatch at close
    #[error("corrupt file: chkSumFile expected {expected:#010x}, computed {computed:#010x}")]
    CorruptFile { expected: u32, computed: u32 },

    /// classId not found in the type registry, but the structure's length was readable
    #[error("unknown structure class id {class_id} at offset {offset} (skipped)")]
    UnknownStructure { class_id: u16, offset: u64 },

    /// A value fell outside the range a zero-suppress scheme can represent
    #[error("value {value} not representable by zero-suppress word width {word_width}")]
    Uncompressable { value: i64, word_width: u8 },

    /// Requested compression algorithm does not apply to this element type
    #[error("compression mode {mode:#06x} is not valid for element type {data_type:?}")]
    InvalidCompressionForType { mode: u32, data_type: crate::vect::ElementType },

    /// Pointer/reference id left unresolved at end of file
    #[error("broken reference: instance id {0} was never resolved")]
    BrokenReference(u32),

    /// A previous fatal error poisoned this stream handle
    #[error("stream is poisoned by a previous fatal error")]
    StreamPoisoned,

    /// Demote target version cannot represent the present data
    #[error(
        "cannot demote field `{field}` to version {target_version}: value is not representable"
    )]
    DemoteNotRepresentable { field: String, target_version: u8 },

    /// Duplicate registration of a structure name or class id
    #[error("duplicate registry entry for `{0}`")]
    DuplicateRegistration(String),

    /// Lookup of an unregistered structure name
    #[error("no registry entry for structure name `{0}`")]
    UnknownStructureName(String),

    /// Malformed on-disk header (magic/byte-order/float probes mismatch)
    #[error("invalid frame header: {0}")]
    InvalidHeader(String),

    /// Generic invalid/malformed structure content not covered above
    #[error("invalid structure data: {0}")]
    InvalidData(String),

    /// Underlying (de)compression codec failure
    #[error("codec error: {0}")]
    Codec(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

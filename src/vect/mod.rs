//! `FrVect` — the typed, multi-dimensional, compressible array container (C3).
//!
//! Mirrors the teacher's container/compression split (`container.rs` +
//! `compression.rs`): a small set of plain-data structs plus a
//! `Compression`-style codec dispatch, except here the codec family is the
//! one this format actually specifies (raw / gzip / differential / zero
//! suppress / meta-modes) rather than a pluggable trait object, since the
//! set is closed and fixed by the on-disk format.

mod codec;
mod diff;
mod zero_suppress;

pub use codec::{compress, expand};

use crate::error::{Error, Result};
use crate::stream::{PayloadReader, PayloadWriter};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Registered structure name and class id for `FrVect` (spec.md §4.1).
pub const NAME: &str = "FrVect";
pub const CLASS_ID: u16 = 2;

/// Closed set of element kinds a `FrVect` may hold.
///
/// Numeric ids match the historical `FR_VECT_*` ids used on the wire
/// (see `examples/original_source/.../Common/Compression.hh`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementType {
    /// Signed byte
    Char = 0,
    /// INT_2S
    Int2S = 1,
    /// REAL_8
    Real8 = 2,
    /// REAL_4
    Real4 = 3,
    /// INT_4S
    Int4S = 4,
    /// INT_8S
    Int8S = 5,
    /// COMPLEX_8 (two REAL_4)
    Complex8 = 6,
    /// COMPLEX_16 (two REAL_8)
    Complex16 = 7,
    /// Length-prefixed string element
    String = 8,
    /// INT_2U
    Int2U = 9,
    /// INT_4U
    Int4U = 10,
    /// INT_8U
    Int8U = 11,
    /// Unsigned byte
    Char1U = 12,
}

impl ElementType {
    /// Decode the on-disk numeric id.
    pub fn from_id(id: u8) -> Result<Self> {
        use ElementType::*;
        Ok(match id {
            0 => Char,
            1 => Int2S,
            2 => Real8,
            3 => Real4,
            4 => Int4S,
            5 => Int8S,
            6 => Complex8,
            7 => Complex16,
            8 => String,
            9 => Int2U,
            10 => Int4U,
            11 => Int8U,
            12 => Char1U,
            other => return Err(Error::InvalidData(format!("unknown FrVect element type id {other}"))),
        })
    }

    /// The on-disk numeric id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Size in bytes of one element. `None` for `String` (variable length).
    pub fn fixed_byte_size(self) -> Option<u8> {
        use ElementType::*;
        match self {
            Char | Char1U => Some(1),
            Int2S | Int2U => Some(2),
            Int4S | Int4U | Real4 => Some(4),
            Int8S | Int8U | Real8 | Complex8 => Some(8),
            Complex16 => Some(16),
            String => None,
        }
    }

    /// Width, in bytes, of one scalar *word* for byte-swap and
    /// differential/zero-suppress purposes. Complex types decompose into
    /// two words of this width; all other fixed-size types are one word.
    pub fn word_width(self) -> Option<u8> {
        use ElementType::*;
        match self {
            Char | Char1U => Some(1),
            Int2S | Int2U => Some(2),
            Int4S | Int4U | Real4 => Some(4),
            Complex8 => Some(4),
            Int8S | Int8U | Real8 => Some(8),
            Complex16 => Some(8),
            String => None,
        }
    }

    /// Number of scalar words per element (2 for complex types, else 1).
    pub fn words_per_element(self) -> u8 {
        match self {
            ElementType::Complex8 | ElementType::Complex16 => 2,
            _ => 1,
        }
    }

    /// Whether this type is one of the zero-suppress-word-2-eligible types.
    pub fn is_word2(self) -> bool {
        matches!(self, ElementType::Int2S | ElementType::Int2U)
    }

    /// Whether this type is one of the zero-suppress-word-4-eligible types.
    pub fn is_word4(self) -> bool {
        matches!(self, ElementType::Int4S | ElementType::Int4U | ElementType::Real4 | ElementType::Complex8)
    }

    /// Whether this type is one of the zero-suppress-word-8-eligible types.
    pub fn is_word8(self) -> bool {
        matches!(
            self,
            ElementType::Int8S | ElementType::Int8U | ElementType::Real8 | ElementType::Complex16
        )
    }

    /// Whether the differential predictor applies (all fixed-width types).
    pub fn supports_diff(self) -> bool {
        self.word_width().is_some()
    }
}

/// Algorithm family, as resolved on the wire (bits 0-7 of the compression
/// code). Meta-modes never appear here — they are resolved to one of
/// these before the mode word is written (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    Raw = 0,
    Gzip = 1,
    DiffGzip = 2,
    ZeroSuppressWord2 = 3,
    ZeroSuppressWord4 = 4,
    ZeroSuppressWord8 = 5,
}

impl Algorithm {
    pub fn from_id(id: u8) -> Result<Self> {
        use Algorithm::*;
        Ok(match id {
            0 => Raw,
            1 => Gzip,
            2 => DiffGzip,
            3 => ZeroSuppressWord2,
            4 => ZeroSuppressWord4,
            5 => ZeroSuppressWord8,
            other => return Err(Error::InvalidData(format!("unknown compression algorithm id {other}"))),
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// A write-time compression request: either a concrete algorithm or one
/// of the write-only meta-modes that get resolved per element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionRequest {
    Concrete(Algorithm),
    ZeroSuppress2OtherwiseGzip,
    ZeroSuppress24OtherwiseGzip,
    ZeroSuppress248OtherwiseGzip,
    Best,
}

/// The 16-bit compression code stored with a vector: algorithm id in the
/// low byte, stored-endianness in bit 8 (set = little-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressionCode {
    pub algorithm: Algorithm,
    pub little_endian: bool,
}

impl CompressionCode {
    pub fn to_u16(self) -> u16 {
        (self.algorithm.id() as u16) | if self.little_endian { 0x100 } else { 0 }
    }

    pub fn from_u16(code: u16) -> Result<Self> {
        Ok(Self {
            algorithm: Algorithm::from_id((code & 0xff) as u8)?,
            little_endian: (code & 0x100) != 0,
        })
    }

    pub fn host() -> bool {
        cfg!(target_endian = "little")
    }
}

/// One dimension descriptor of a `FrVect`: length, sample step, origin,
/// and a unit label (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimension {
    pub n_x: u64,
    pub d_x: f64,
    pub start_x: f64,
    pub unit_x: String,
}

impl Dimension {
    pub fn new(n_x: u64, d_x: f64, start_x: f64, unit_x: impl Into<String>) -> Self {
        Self { n_x, d_x, start_x, unit_x: unit_x.into() }
    }
}

/// The typed array container itself.
///
/// Invariants upheld by every constructor and mutator here (spec.md §3):
/// `n_bytes == data.len()`; `n_data == product(dims.n_x)`; a `Raw`
/// compression code implies the buffer is host-endian.
#[derive(Debug, Clone)]
pub struct FrVect {
    pub name: String,
    pub unit_y: String,
    pub element_type: ElementType,
    pub compression: CompressionCode,
    pub n_data: u64,
    pub dims: Vec<Dimension>,
    data: Vec<u8>,
}

impl FrVect {
    /// Build a vector from host-endian, uncompressed sample bytes.
    pub fn from_raw(
        name: impl Into<String>,
        unit_y: impl Into<String>,
        element_type: ElementType,
        n_data: u64,
        dims: Vec<Dimension>,
        host_bytes: Vec<u8>,
    ) -> Result<Self> {
        let product: u64 = dims.iter().map(|d| d.n_x).product();
        if !dims.is_empty() && product != n_data {
            return Err(Error::InvalidData(format!(
                "FrVect dimension product {product} does not match nData {n_data}"
            )));
        }
        Ok(Self {
            name: name.into(),
            unit_y: unit_y.into(),
            element_type,
            compression: CompressionCode { algorithm: Algorithm::Raw, little_endian: CompressionCode::host() },
            n_data,
            dims,
            data: host_bytes,
        })
    }

    /// Number of encoded bytes currently owned (`nBytes` on disk).
    pub fn n_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// Borrow the raw (possibly compressed) on-disk buffer.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Construct directly from on-disk fields (used by the stream reader).
    pub fn from_encoded(
        name: impl Into<String>,
        unit_y: impl Into<String>,
        element_type: ElementType,
        compression: CompressionCode,
        n_data: u64,
        dims: Vec<Dimension>,
        encoded_bytes: Vec<u8>,
    ) -> Self {
        Self { name: name.into(), unit_y: unit_y.into(), element_type, compression, n_data, dims, data: encoded_bytes }
    }

    /// Compress `self`'s buffer in place under `request`, replacing the
    /// stored payload and compression code. The buffer must currently be
    /// `Raw` and host-endian; this is the writer-side entry point.
    pub fn compress(&mut self, request: CompressionRequest, level: u32) -> Result<()> {
        if self.compression.algorithm != Algorithm::Raw {
            let raw = self.expand()?;
            self.data = raw;
            self.compression = CompressionCode { algorithm: Algorithm::Raw, little_endian: CompressionCode::host() };
        }
        let (code, bytes) = codec::compress(request, level, self.element_type, self.n_data, &self.data)?;
        self.compression = code;
        self.data = bytes;
        Ok(())
    }

    /// Decode to a fresh, host-endian buffer without mutating `self`
    /// (spec.md §5: "returns a fresh buffer without mutating the source").
    pub fn expand(&self) -> Result<Vec<u8>> {
        codec::expand(self.compression, self.element_type, self.n_data, &self.data)
    }

    /// Decode in place; the buffer becomes `Raw`/host-endian
    /// (spec.md §5: "mutates its buffer in place").
    pub fn expand_in_place(&mut self) -> Result<()> {
        let raw = self.expand()?;
        self.data = raw;
        self.compression = CompressionCode { algorithm: Algorithm::Raw, little_endian: CompressionCode::host() };
        Ok(())
    }

    /// Produce a new vector differing only in its encoded payload and
    /// compression mode (C3 `CloneCompressed`).
    pub fn clone_compressed(&self, request: CompressionRequest, level: u32) -> Result<Self> {
        let mut clone = self.clone();
        clone.compress(request, level)?;
        Ok(clone)
    }

    /// Serialize to an `FrVect` structure payload (spec.md §3, §6).
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_string(&self.unit_y);
        w.write_u8(self.element_type.id());
        w.write_u16(self.compression.to_u16());
        w.write_u64(self.n_data);
        w.write_u64(self.n_bytes());
        w.write_u16(self.dims.len() as u16);
        for dim in &self.dims {
            w.write_u64(dim.n_x);
            w.write_f64(dim.d_x);
            w.write_f64(dim.start_x);
            w.write_string(&dim.unit_x);
        }
        w.write_bytes(&self.data);
        w.into_bytes()
    }

    /// Parse an `FrVect` structure payload written by [`to_payload`].
    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        let name = r.read_string()?;
        let unit_y = r.read_string()?;
        let element_type = ElementType::from_id(r.read_u8()?)?;
        let compression = CompressionCode::from_u16(r.read_u16()?)?;
        let n_data = r.read_u64()?;
        let n_bytes = r.read_u64()?;
        let dim_count = r.read_u16()? as usize;
        let mut dims = Vec::with_capacity(dim_count);
        for _ in 0..dim_count {
            let n_x = r.read_u64()?;
            let d_x = r.read_f64()?;
            let start_x = r.read_f64()?;
            let unit_x = r.read_string()?;
            dims.push(Dimension { n_x, d_x, start_x, unit_x });
        }
        let data = r.read_bytes(n_bytes as usize)?;
        Ok(Self { name, unit_y, element_type, compression, n_data, dims, data })
    }
}

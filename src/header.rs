//! `FrHeader` (spec.md §3, §6): the prefix-free fixed record at the start
//! of every Frame file.
//!
//! Unlike every other structure, `FrHeader` carries no length/classId
//! envelope — it is read and written as a literal, fixed byte sequence
//! so that a reader with no registry yet populated can still determine
//! byte widths, host endianness, and the checksum scheme in force for
//! the rest of the file.

use crate::error::{Error, Result};
use std::f32::consts::PI as PI_F32;
use std::f64::consts::PI as PI_F64;

/// Checksum scheme selected by the one-byte tag in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumScheme {
    /// No checksums are written or verified.
    None,
    /// CRC-32 (the only scheme this crate implements).
    Crc32,
}

impl ChecksumScheme {
    fn to_byte(self) -> u8 {
        match self {
            ChecksumScheme::None => 0,
            ChecksumScheme::Crc32 => 1,
        }
    }

    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(ChecksumScheme::None),
            1 => Ok(ChecksumScheme::Crc32),
            other => Err(Error::InvalidHeader(format!("unknown checksum scheme byte {other}"))),
        }
    }
}

/// One-byte tag identifying the writing library. This crate always
/// writes its own tag; any value is accepted on read (spec.md does not
/// define an enumerated, closed set here).
pub const LIBRARY_TAG: u8 = 0xF0;

/// The on-disk header, decoded into host-usable form. `byte_swap_needed`
/// is the single fact every downstream primitive read depends on.
#[derive(Debug, Clone, Copy)]
pub struct FrHeader {
    pub byte_swap_needed: bool,
    pub checksum_scheme: ChecksumScheme,
    pub library_tag: u8,
}

const ENDIAN_PROBE_2: u16 = 0x1234;
const ENDIAN_PROBE_4: u32 = 0x1234_5678;
const ENDIAN_PROBE_8: u64 = 0x1234_5678_9ABC_DEF0;

impl FrHeader {
    /// Build the header this crate writes: native byte order, CRC-32
    /// checksums, this crate's library tag.
    pub fn native(checksum_scheme: ChecksumScheme) -> Self {
        Self { byte_swap_needed: false, checksum_scheme, library_tag: LIBRARY_TAG }
    }

    /// Serialize the fixed, literal prefix (spec.md §6).
    pub fn to_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(33);
        out.push(2u8); // byte width of a 2-byte integer
        out.push(4u8); // byte width of a 4-byte integer
        out.push(8u8); // byte width of an 8-byte integer
        out.push(4u8); // byte width of a 4-byte float
        out.push(8u8); // byte width of an 8-byte float
        out.extend_from_slice(&ENDIAN_PROBE_2.to_ne_bytes());
        out.extend_from_slice(&ENDIAN_PROBE_4.to_ne_bytes());
        out.extend_from_slice(&ENDIAN_PROBE_8.to_ne_bytes());
        out.extend_from_slice(&(PI_F32).to_ne_bytes());
        out.extend_from_slice(&(PI_F64).to_ne_bytes());
        out.push(self.library_tag);
        out.push(self.checksum_scheme.to_byte());
        out
    }

    /// Number of literal header bytes (fixed, independent of content).
    pub const LEN: usize = 33;

    /// Parse the fixed prefix, determining byte-swap need by comparing
    /// the stored endian probes against host-native order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::LEN {
            return Err(Error::Truncated { offset: 0, expected: (Self::LEN - bytes.len()) as u64 });
        }
        if bytes[0] != 2 || bytes[1] != 4 || bytes[2] != 8 || bytes[3] != 4 || bytes[4] != 8 {
            return Err(Error::InvalidHeader("unexpected byte-width probes".into()));
        }
        let probe2 = &bytes[5..7];
        let probe4 = &bytes[7..11];
        let probe8 = &bytes[11..19];

        let native_probe2 = ENDIAN_PROBE_2.to_ne_bytes();
        let swapped_probe2 = ENDIAN_PROBE_2.swap_bytes().to_ne_bytes();
        let byte_swap_needed = if probe2 == native_probe2 {
            false
        } else if probe2 == swapped_probe2 {
            true
        } else {
            return Err(Error::InvalidHeader("2-byte endian probe did not match either byte order".into()));
        };

        let expected4 = if byte_swap_needed { ENDIAN_PROBE_4.swap_bytes() } else { ENDIAN_PROBE_4 };
        if probe4 != expected4.to_ne_bytes() {
            return Err(Error::InvalidHeader("4-byte endian probe inconsistent with 2-byte probe".into()));
        }
        let expected8 = if byte_swap_needed { ENDIAN_PROBE_8.swap_bytes() } else { ENDIAN_PROBE_8 };
        if probe8 != expected8.to_ne_bytes() {
            return Err(Error::InvalidHeader("8-byte endian probe inconsistent with 2-byte probe".into()));
        }

        let mut float_probe_4 = <[u8; 4]>::try_from(&bytes[19..23]).unwrap();
        let mut float_probe_8 = <[u8; 8]>::try_from(&bytes[23..31]).unwrap();
        if byte_swap_needed {
            float_probe_4.reverse();
            float_probe_8.reverse();
        }
        let read_f32 = f32::from_ne_bytes(float_probe_4);
        let read_f64 = f64::from_ne_bytes(float_probe_8);
        if (read_f32 - PI_F32).abs() > f32::EPSILON * 4.0 {
            return Err(Error::InvalidHeader("4-byte float probe is not pi".into()));
        }
        if (read_f64 - PI_F64).abs() > f64::EPSILON * 4.0 {
            return Err(Error::InvalidHeader("8-byte float probe is not pi".into()));
        }

        let library_tag = bytes[31];
        let checksum_scheme = ChecksumScheme::from_byte(bytes[32])?;

        Ok(Self { byte_swap_needed, checksum_scheme, library_tag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let header = FrHeader::native(ChecksumScheme::Crc32);
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), FrHeader::LEN);
        let parsed = FrHeader::from_bytes(&bytes).unwrap();
        assert!(!parsed.byte_swap_needed);
        assert_eq!(parsed.checksum_scheme, ChecksumScheme::Crc32);
        assert_eq!(parsed.library_tag, LIBRARY_TAG);
    }

    #[test]
    fn rejects_garbage() {
        let bytes = vec![0u8; FrHeader::LEN];
        assert!(FrHeader::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = vec![2, 4, 8, 4, 8];
        assert!(matches!(FrHeader::from_bytes(&bytes), Err(Error::Truncated { .. })));
    }
}

//! Zero-suppress run-length codec (`ZERO_SUPPRESS_WORD_{2,4,8}`).
//!
//! `examples/original_source/.../Common/CompressionZeroSuppress.hh` only
//! retains the declarations of `Compress`/`Expand`/`DiffCompress`/
//! `DiffExpand` in this pack (no algorithm body), but does retain
//! `FrZCompRangeError`/`FrZCompIRangeError`, confirming the real scheme
//! has a literal value it cannot represent. This codec reproduces that
//! contract with a sentinel/run-length scheme: the all-bits-set word of
//! the given width is reserved to introduce a zero run, followed by a
//! LEB128 run length; a literal word equal to the sentinel is therefore
//! unencodable and reported via `Error::Uncompressable`.

use crate::error::{Error, Result};

fn sentinel(width: u8) -> u64 {
    match width {
        1 => u8::MAX as u64,
        2 => u16::MAX as u64,
        4 => u32::MAX as u64,
        8 => u64::MAX,
        other => unreachable!("unsupported zero-suppress word width {other}"),
    }
}

fn read_word(bytes: &[u8], width: u8) -> u64 {
    match width {
        1 => bytes[0] as u64,
        2 => u16::from_le_bytes([bytes[0], bytes[1]]) as u64,
        4 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64,
        8 => u64::from_le_bytes(bytes.try_into().unwrap()),
        other => unreachable!("unsupported zero-suppress word width {other}"),
    }
}

fn write_word(value: u64, width: u8, out: &mut Vec<u8>) {
    match width {
        1 => out.push(value as u8),
        2 => out.extend_from_slice(&(value as u16).to_le_bytes()),
        4 => out.extend_from_slice(&(value as u32).to_le_bytes()),
        8 => out.extend_from_slice(&value.to_le_bytes()),
        other => unreachable!("unsupported zero-suppress word width {other}"),
    }
}

fn write_uvarint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

fn read_uvarint(bytes: &[u8], pos: &mut usize) -> Result<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = *bytes
            .get(*pos)
            .ok_or_else(|| Error::InvalidData("truncated zero-suppress run length".into()))?;
        *pos += 1;
        value |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    Ok(value)
}

/// Encode `words` (host-endian, `width`-byte words) via zero run-length
/// suppression. Returns `Error::Uncompressable` if any non-zero word
/// equals the sentinel value for this width.
pub fn encode(words: &[u8], width: u8) -> Result<Vec<u8>> {
    let sentinel_value = sentinel(width);
    let count = words.len() / (width as usize);
    let mut out = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < count {
        let word = read_word(&words[i * width as usize..(i + 1) * width as usize], width);
        if word == 0 {
            let mut run = 0u64;
            while i < count
                && read_word(&words[i * width as usize..(i + 1) * width as usize], width) == 0
            {
                run += 1;
                i += 1;
            }
            write_word(sentinel_value, width, &mut out);
            write_uvarint(run, &mut out);
        } else {
            if word == sentinel_value {
                return Err(Error::Uncompressable { value: word as i64, word_width: width });
            }
            write_word(word, width, &mut out);
            i += 1;
        }
    }
    Ok(out)
}

/// Inverse of [`encode`]; `expected_words` is `nData` (times the element's
/// word count for complex types), used to size the output buffer exactly.
pub fn decode(bytes: &[u8], width: u8, expected_words: u64) -> Result<Vec<u8>> {
    let sentinel_value = sentinel(width);
    let mut out = Vec::with_capacity(expected_words as usize * width as usize);
    let mut pos = 0usize;
    let w = width as usize;
    while (out.len() / w as usize) < expected_words as usize {
        if pos + w > bytes.len() {
            return Err(Error::Truncated { offset: pos as u64, expected: w as u64 });
        }
        let word = read_word(&bytes[pos..pos + w], width);
        pos += w;
        if word == sentinel_value {
            let run = read_uvarint(bytes, &mut pos)?;
            let remaining = expected_words - (out.len() / w) as u64;
            if run > remaining {
                return Err(Error::InvalidData(format!(
                    "zero-suppress run length {run} exceeds {remaining} remaining word(s)"
                )));
            }
            for _ in 0..run {
                write_word(0, width, &mut out);
            }
        } else {
            write_word(word, width, &mut out);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_fourteen_words_shrinks_under_fifty_six_bytes() {
        let values: [u32; 14] = [0, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 5, 0];
        let mut bytes = Vec::new();
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let encoded = encode(&bytes, 4).unwrap();
        assert!(encoded.len() < 56, "encoded length {} not under 56", encoded.len());
        let decoded = decode(&encoded, 4, 14).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn sentinel_literal_is_rejected() {
        let bytes = u32::MAX.to_le_bytes();
        let err = encode(&bytes, 4).unwrap_err();
        assert!(matches!(err, Error::Uncompressable { .. }));
    }

    #[test]
    fn all_zero_round_trips() {
        let bytes = vec![0u8; 4 * 20];
        let encoded = encode(&bytes, 4).unwrap();
        assert!(encoded.len() < bytes.len());
        let decoded = decode(&encoded, 4, 20).unwrap();
        assert_eq!(decoded, bytes);
    }
}

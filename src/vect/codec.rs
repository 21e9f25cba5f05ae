//! Compression dispatch: resolves a [`CompressionRequest`] to a concrete
//! [`Algorithm`] and drives the encode/decode pipelines.
//!
//! Grounded in the teacher's `compression.rs` dispatcher shape
//! (`get_compression(codec_id) -> Box<dyn Compression>`), adapted here to
//! a closed `match` over a fixed algorithm enum rather than a trait
//! object, since this format's compression family is closed by the wire
//! format rather than pluggable.

use super::{diff, zero_suppress, Algorithm, CompressionCode, CompressionRequest, ElementType};
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression as GzLevel;
use log::warn;
use std::io::{Read, Write};

fn gzip_compress(bytes: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::new(level.min(9)));
    encoder.write_all(bytes).map_err(|e| Error::Codec(e.to_string()))?;
    encoder.finish().map_err(|e| Error::Codec(e.to_string()))
}

fn gzip_expand(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| Error::Codec(e.to_string()))?;
    Ok(out)
}

fn word_count(element_type: ElementType, n_data: u64) -> u64 {
    n_data * element_type.words_per_element() as u64
}

fn zero_suppress_width_for(algorithm: Algorithm) -> u8 {
    match algorithm {
        Algorithm::ZeroSuppressWord2 => 2,
        Algorithm::ZeroSuppressWord4 => 4,
        Algorithm::ZeroSuppressWord8 => 8,
        other => unreachable!("{other:?} is not a zero-suppress algorithm"),
    }
}

/// Whether `algorithm` applies to `element_type`. Per spec.md §7,
/// `InvalidCompressionForType` is not a hard failure for an explicit
/// request: the recovery is to substitute GZIP and update the mode word,
/// which [`resolve_for_encode`] does by consulting this check.
fn applies_to(algorithm: Algorithm, element_type: ElementType) -> bool {
    match algorithm {
        Algorithm::ZeroSuppressWord2 => element_type.is_word2(),
        Algorithm::ZeroSuppressWord4 => element_type.is_word4(),
        Algorithm::ZeroSuppressWord8 => element_type.is_word8(),
        Algorithm::DiffGzip => element_type.supports_diff(),
        Algorithm::Raw | Algorithm::Gzip => true,
    }
}

/// Fall back an explicit-but-inapplicable request to GZIP, logging the
/// substitution (spec.md §7: `InvalidCompressionForType` recovers by
/// substituting GZIP and updating the mode word, it is never returned to
/// the caller of `compress`).
fn resolve_for_encode(algorithm: Algorithm, element_type: ElementType) -> Algorithm {
    if applies_to(algorithm, element_type) {
        algorithm
    } else {
        warn!(
            "compression mode {:?} is not valid for element type {:?}; substituting GZIP",
            algorithm, element_type
        );
        Algorithm::Gzip
    }
}

fn encode_concrete(
    algorithm: Algorithm,
    level: u32,
    element_type: ElementType,
    n_data: u64,
    raw: &[u8],
) -> Result<(Algorithm, Vec<u8>)> {
    let algorithm = resolve_for_encode(algorithm, element_type);
    let encoded = match algorithm {
        Algorithm::Raw => raw.to_vec(),
        Algorithm::Gzip => gzip_compress(raw, level)?,
        Algorithm::DiffGzip => {
            let width = element_type.word_width().expect("resolve_for_encode guarantees applicability");
            let mut words = raw.to_vec();
            diff::encode(&mut words, width);
            gzip_compress(&words, level)?
        }
        Algorithm::ZeroSuppressWord2 | Algorithm::ZeroSuppressWord4 | Algorithm::ZeroSuppressWord8 => {
            let width = zero_suppress_width_for(algorithm);
            let _ = word_count(element_type, n_data);
            zero_suppress::encode(raw, width)?
        }
    };
    Ok((algorithm, encoded))
}

fn decode_concrete(
    algorithm: Algorithm,
    element_type: ElementType,
    n_data: u64,
    encoded: &[u8],
) -> Result<Vec<u8>> {
    match algorithm {
        Algorithm::Raw => Ok(encoded.to_vec()),
        Algorithm::Gzip => gzip_expand(encoded),
        Algorithm::DiffGzip => {
            let width = element_type
                .word_width()
                .ok_or_else(|| Error::InvalidCompressionForType { mode: algorithm.id() as u32, data_type: element_type })?;
            let mut words = gzip_expand(encoded)?;
            diff::decode(&mut words, width);
            Ok(words)
        }
        Algorithm::ZeroSuppressWord2 | Algorithm::ZeroSuppressWord4 | Algorithm::ZeroSuppressWord8 => {
            let width = zero_suppress_width_for(algorithm);
            let words = word_count(element_type, n_data);
            zero_suppress::decode(encoded, width, words)
        }
    }
}

/// Resolve a write-only meta-mode or concrete request to a concrete
/// algorithm and its encoded bytes.
///
/// Tie-break order for `Best` when two schemes tie on output length
/// (spec.md §9, recorded in SPEC_FULL.md): `RAW < GZIP < DIFF_GZIP <
/// ZERO_SUPPRESS_WORD_2 < ZERO_SUPPRESS_WORD_4 < ZERO_SUPPRESS_WORD_8`.
pub fn compress(
    request: CompressionRequest,
    level: u32,
    element_type: ElementType,
    n_data: u64,
    raw: &[u8],
) -> Result<(CompressionCode, Vec<u8>)> {
    let candidates: Vec<Algorithm> = match request {
        CompressionRequest::Concrete(algorithm) => vec![algorithm],
        CompressionRequest::ZeroSuppress2OtherwiseGzip => {
            if element_type.is_word2() {
                vec![Algorithm::ZeroSuppressWord2]
            } else {
                vec![Algorithm::Gzip]
            }
        }
        CompressionRequest::ZeroSuppress24OtherwiseGzip => {
            if element_type.is_word2() {
                vec![Algorithm::ZeroSuppressWord2]
            } else if element_type.is_word4() {
                vec![Algorithm::ZeroSuppressWord4]
            } else {
                vec![Algorithm::Gzip]
            }
        }
        CompressionRequest::ZeroSuppress248OtherwiseGzip => {
            if element_type.is_word2() {
                vec![Algorithm::ZeroSuppressWord2]
            } else if element_type.is_word4() {
                vec![Algorithm::ZeroSuppressWord4]
            } else if element_type.is_word8() {
                vec![Algorithm::ZeroSuppressWord8]
            } else {
                vec![Algorithm::Gzip]
            }
        }
        CompressionRequest::Best => {
            let mut c = vec![Algorithm::Raw, Algorithm::Gzip];
            if element_type.supports_diff() {
                c.push(Algorithm::DiffGzip);
            }
            if element_type.is_word2() {
                c.push(Algorithm::ZeroSuppressWord2);
            }
            if element_type.is_word4() {
                c.push(Algorithm::ZeroSuppressWord4);
            }
            if element_type.is_word8() {
                c.push(Algorithm::ZeroSuppressWord8);
            }
            c
        }
    };

    let is_best = matches!(request, CompressionRequest::Best);
    let mut best: Option<(Algorithm, Vec<u8>)> = None;
    for requested in candidates {
        let (algorithm, encoded) = match encode_concrete(requested, level, element_type, n_data, raw) {
            Ok(pair) => pair,
            Err(Error::Uncompressable { .. }) if is_best => continue,
            Err(e) => return Err(e),
        };
        best = match best {
            None => Some((algorithm, encoded)),
            Some((_, ref best_bytes)) if encoded.len() < best_bytes.len() => Some((algorithm, encoded)),
            Some(existing) => Some(existing),
        };
    }

    let (algorithm, encoded) = match best {
        Some(pair) => pair,
        None => (Algorithm::Raw, raw.to_vec()),
    };

    let code = CompressionCode { algorithm, little_endian: CompressionCode::host() };
    Ok((code, encoded))
}

/// Decode `encoded` to a fresh host-endian buffer, byte-swapping per
/// `element_type`'s word width if the stored endianness differs from the
/// host (spec.md §5: callers must always observe host-endian data).
pub fn expand(
    compression: CompressionCode,
    element_type: ElementType,
    n_data: u64,
    encoded: &[u8],
) -> Result<Vec<u8>> {
    let mut decoded = decode_concrete(compression.algorithm, element_type, n_data, encoded)?;
    if compression.little_endian != CompressionCode::host() {
        swap_words(&mut decoded, element_type.word_width());
    }
    Ok(decoded)
}

fn swap_words(bytes: &mut [u8], word_width: Option<u8>) {
    let width = match word_width {
        Some(w) if w > 1 => w as usize,
        _ => return,
    };
    for chunk in bytes.chunks_exact_mut(width) {
        chunk.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_round_trip() {
        let raw = b"hello hello hello hello hello".repeat(4);
        let (code, encoded) =
            compress(CompressionRequest::Concrete(Algorithm::Gzip), 6, ElementType::Char1U, raw.len() as u64, &raw)
                .unwrap();
        assert_eq!(code.algorithm, Algorithm::Gzip);
        let decoded = expand(code, ElementType::Char1U, raw.len() as u64, &encoded).unwrap();
        assert_eq!(decoded, raw);
    }

    #[test]
    fn zero_suppress_on_wrong_element_type_falls_back_to_gzip() {
        let raw = vec![0u8; 8];
        let (code, _) = compress(
            CompressionRequest::Concrete(Algorithm::ZeroSuppressWord4),
            0,
            ElementType::Real8,
            1,
            &raw,
        )
        .unwrap();
        assert_eq!(code.algorithm, Algorithm::Gzip);
    }
}

//! Differential predictor used by `DIFF_GZIP`.
//!
//! Operates on a flat stream of fixed-width words: for complex element
//! types the stream is the interleaved real/imag components, matching
//! `examples/original_source/.../Common/CompressionDifferential.hh`
//! (`Decode<INT_4S>(Data, NData*2)` for `FR_VECT_8C`, etc). Wrapping
//! arithmetic means signed and unsigned words take the identical code
//! path: only the bit pattern matters.

/// Encode `words` (host-endian, `width`-byte words) into first-differences,
/// in place. `words[0]` is left unchanged (the predictor has no history).
pub fn encode(words: &mut [u8], width: u8) {
    match width {
        1 => encode_n::<1>(words, u8::from_le_bytes_slice, u8::to_le_bytes_slice, <u8 as LeWord>::wrapping_sub),
        2 => encode_n::<2>(words, u16::from_le_bytes_slice, u16::to_le_bytes_slice, <u16 as LeWord>::wrapping_sub),
        4 => encode_n::<4>(words, u32::from_le_bytes_slice, u32::to_le_bytes_slice, <u32 as LeWord>::wrapping_sub),
        8 => encode_n::<8>(words, u64::from_le_bytes_slice, u64::to_le_bytes_slice, <u64 as LeWord>::wrapping_sub),
        other => unreachable!("unsupported diff word width {other}"),
    }
}

/// Inverse of [`encode`]: reconstruct original words from first-differences.
pub fn decode(words: &mut [u8], width: u8) {
    match width {
        1 => decode_n::<1>(words, u8::from_le_bytes_slice, u8::to_le_bytes_slice, <u8 as LeWord>::wrapping_add),
        2 => decode_n::<2>(words, u16::from_le_bytes_slice, u16::to_le_bytes_slice, <u16 as LeWord>::wrapping_add),
        4 => decode_n::<4>(words, u32::from_le_bytes_slice, u32::to_le_bytes_slice, <u32 as LeWord>::wrapping_add),
        8 => decode_n::<8>(words, u64::from_le_bytes_slice, u64::to_le_bytes_slice, <u64 as LeWord>::wrapping_add),
        other => unreachable!("unsupported diff word width {other}"),
    }
}

fn encode_n<const N: usize>(
    words: &mut [u8],
    from_le: fn(&[u8]) -> u64,
    to_le: fn(u64, &mut [u8]),
    sub: fn(u64, u64) -> u64,
) {
    let count = words.len() / N;
    if count < 2 {
        return;
    }
    // Walk backwards so each slot's encode uses the still-original value
    // of its predecessor.
    for i in (1..count).rev() {
        let cur = from_le(&words[i * N..i * N + N]);
        let prev = from_le(&words[(i - 1) * N..(i - 1) * N + N]);
        to_le(sub(cur, prev), &mut words[i * N..i * N + N]);
    }
}

fn decode_n<const N: usize>(
    words: &mut [u8],
    from_le: fn(&[u8]) -> u64,
    to_le: fn(u64, &mut [u8]),
    add: fn(u64, u64) -> u64,
) {
    let count = words.len() / N;
    if count < 2 {
        return;
    }
    let mut prev = from_le(&words[0..N]);
    for i in 1..count {
        let diff = from_le(&words[i * N..i * N + N]);
        let cur = add(diff, prev);
        to_le(cur, &mut words[i * N..i * N + N]);
        prev = cur;
    }
}

/// Helper trait giving each unsigned width a uniform from/to-u64 pair so
/// the generic walk above can stay width-agnostic while arithmetic still
/// wraps at the correct bit width.
trait LeWord: Sized {
    fn from_le_bytes_slice(b: &[u8]) -> u64;
    fn to_le_bytes_slice(v: u64, out: &mut [u8]);
    fn wrapping_sub(a: u64, b: u64) -> u64;
    fn wrapping_add(a: u64, b: u64) -> u64;
}

impl LeWord for u8 {
    fn from_le_bytes_slice(b: &[u8]) -> u64 {
        b[0] as u64
    }
    fn to_le_bytes_slice(v: u64, out: &mut [u8]) {
        out[0] = v as u8;
    }
    fn wrapping_sub(a: u64, b: u64) -> u64 {
        (a as u8).wrapping_sub(b as u8) as u64
    }
    fn wrapping_add(a: u64, b: u64) -> u64 {
        (a as u8).wrapping_add(b as u8) as u64
    }
}

impl LeWord for u16 {
    fn from_le_bytes_slice(b: &[u8]) -> u64 {
        u16::from_le_bytes([b[0], b[1]]) as u64
    }
    fn to_le_bytes_slice(v: u64, out: &mut [u8]) {
        out.copy_from_slice(&(v as u16).to_le_bytes());
    }
    fn wrapping_sub(a: u64, b: u64) -> u64 {
        (a as u16).wrapping_sub(b as u16) as u64
    }
    fn wrapping_add(a: u64, b: u64) -> u64 {
        (a as u16).wrapping_add(b as u16) as u64
    }
}

impl LeWord for u32 {
    fn from_le_bytes_slice(b: &[u8]) -> u64 {
        u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as u64
    }
    fn to_le_bytes_slice(v: u64, out: &mut [u8]) {
        out.copy_from_slice(&(v as u32).to_le_bytes());
    }
    fn wrapping_sub(a: u64, b: u64) -> u64 {
        (a as u32).wrapping_sub(b as u32) as u64
    }
    fn wrapping_add(a: u64, b: u64) -> u64 {
        (a as u32).wrapping_add(b as u32) as u64
    }
}

impl LeWord for u64 {
    fn from_le_bytes_slice(b: &[u8]) -> u64 {
        u64::from_le_bytes(b.try_into().unwrap())
    }
    fn to_le_bytes_slice(v: u64, out: &mut [u8]) {
        out.copy_from_slice(&v.to_le_bytes());
    }
    fn wrapping_sub(a: u64, b: u64) -> u64 {
        a.wrapping_sub(b)
    }
    fn wrapping_add(a: u64, b: u64) -> u64 {
        a.wrapping_add(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_round_trips_width4() {
        let mut words = Vec::new();
        for i in 0..100i32 {
            words.extend_from_slice(&(100 + i).to_le_bytes());
        }
        let original = words.clone();
        encode(&mut words, 4);
        decode(&mut words, 4);
        assert_eq!(words, original);
    }

    #[test]
    fn single_word_untouched() {
        let mut words = 7u32.to_le_bytes().to_vec();
        let original = words.clone();
        encode(&mut words, 4);
        assert_eq!(words, original);
    }
}

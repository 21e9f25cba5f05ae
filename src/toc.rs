//! Table-of-contents indexer (C5, spec.md §4.5): a tail-resident index
//! mapping channel names and frame ordinals to file offsets.
//!
//! The on-disk payload is laid out so the fast path described in
//! spec.md §4.5 — "read only per-channel name list and the tail cache
//! offset... seek and read only the offset array for the channel(s)
//! being accessed" — is a real seek, not a convenience wrapper around a
//! full parse: a directory of (kind, name) → byte offset is written
//! before the bulk per-frame offset arrays, so [`TocCache::read`] can
//! stop before ever touching them.

use crate::error::{Error, Result};
use crate::stream::{PayloadReader, PayloadWriter};
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

pub const NAME: &str = "FrTOC";

/// The channel container kinds the TOC indexes by name (spec.md §4.5:
/// "ADC/proc/sim/ser/event/sim-event"). `Ser` is mapped onto this
/// crate's `FrTable` container — the nearest supplemented structure to
/// the original format's serial-data channel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Adc,
    Proc,
    Sim,
    Ser,
    Event,
    SimEvent,
}

impl ChannelKind {
    const ALL: [ChannelKind; 6] =
        [ChannelKind::Adc, ChannelKind::Proc, ChannelKind::Sim, ChannelKind::Ser, ChannelKind::Event, ChannelKind::SimEvent];

    fn id(self) -> u8 {
        match self {
            ChannelKind::Adc => 0,
            ChannelKind::Proc => 1,
            ChannelKind::Sim => 2,
            ChannelKind::Ser => 3,
            ChannelKind::Event => 4,
            ChannelKind::SimEvent => 5,
        }
    }

    fn from_id(id: u8) -> Result<Self> {
        Ok(match id {
            0 => ChannelKind::Adc,
            1 => ChannelKind::Proc,
            2 => ChannelKind::Sim,
            3 => ChannelKind::Ser,
            4 => ChannelKind::Event,
            5 => ChannelKind::SimEvent,
            other => return Err(Error::InvalidData(format!("unknown TOC channel kind id {other}"))),
        })
    }
}

/// The fully materialized TOC (spec.md §4.5 "read the entire TOC
/// eagerly" path).
#[derive(Debug, Clone, Default)]
pub struct Toc {
    pub run: Vec<i32>,
    pub frame: Vec<u32>,
    pub gtime_s: Vec<u32>,
    pub gtime_n: Vec<u32>,
    pub dt: Vec<f64>,
    pub data_quality: Vec<u32>,
    /// `PositionH(frameIndex)`.
    pub frame_offsets: Vec<u64>,
    /// `PositionDetector(name)`.
    pub detectors: HashMap<String, u64>,
    channels: HashMap<ChannelKind, HashMap<String, Vec<u64>>>,
}

impl Toc {
    pub fn frame_count(&self) -> usize {
        self.frame_offsets.len()
    }

    pub fn position_h(&self, frame_index: usize) -> Option<u64> {
        self.frame_offsets.get(frame_index).copied()
    }

    pub fn position_detector(&self, name: &str) -> Option<u64> {
        self.detectors.get(name).copied()
    }

    /// `PositionADC`/`PositionProc`/... — offset of the named channel's
    /// structure within frame `frame_index`, or `None` if absent
    /// (spec.md §4.5 invariant: zero entries mean "absent").
    pub fn position(&self, kind: ChannelKind, frame_index: usize, channel: &str) -> Option<u64> {
        let offset = *self.channels.get(&kind)?.get(channel)?.get(frame_index)?;
        if offset == 0 {
            None
        } else {
            Some(offset)
        }
    }

    pub fn channel_names(&self, kind: ChannelKind) -> Vec<&str> {
        self.channels.get(&kind).map(|m| m.keys().map(String::as_str).collect()).unwrap_or_default()
    }

    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        let frame_count = self.run.len() as u64;
        w.write_u64(frame_count);
        for v in &self.run {
            w.write_i32(*v);
        }
        for v in &self.frame {
            w.write_u32(*v);
        }
        for v in &self.gtime_s {
            w.write_u32(*v);
        }
        for v in &self.gtime_n {
            w.write_u32(*v);
        }
        for v in &self.dt {
            w.write_f64(*v);
        }
        for v in &self.data_quality {
            w.write_u32(*v);
        }
        for v in &self.frame_offsets {
            w.write_u64(*v);
        }

        w.write_u16(self.detectors.len() as u16);
        for (name, offset) in &self.detectors {
            w.write_string(name);
            w.write_u64(*offset);
        }

        let mut directory: Vec<(u8, String, u64)> = Vec::new();
        let mut arrays_blob = Vec::new();
        for kind in ChannelKind::ALL {
            if let Some(map) = self.channels.get(&kind) {
                for (name, offsets) in map {
                    directory.push((kind.id(), name.clone(), arrays_blob.len() as u64));
                    for o in offsets {
                        arrays_blob.extend_from_slice(&o.to_le_bytes());
                    }
                }
            }
        }
        w.write_u16(directory.len() as u16);
        for (kind_id, name, rel_offset) in &directory {
            w.write_u8(*kind_id);
            w.write_string(name);
            w.write_u64(*rel_offset);
        }
        w.write_u64(arrays_blob.len() as u64);
        w.write_bytes(&arrays_blob);
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        let frame_count = r.read_u64()? as usize;
        let run = read_vec(r, frame_count, |r| r.read_i32())?;
        let frame = read_vec(r, frame_count, |r| r.read_u32())?;
        let gtime_s = read_vec(r, frame_count, |r| r.read_u32())?;
        let gtime_n = read_vec(r, frame_count, |r| r.read_u32())?;
        let dt = read_vec(r, frame_count, |r| r.read_f64())?;
        let data_quality = read_vec(r, frame_count, |r| r.read_u32())?;
        let frame_offsets = read_vec(r, frame_count, |r| r.read_u64())?;

        let detector_count = r.read_u16()? as usize;
        let mut detectors = HashMap::with_capacity(detector_count);
        for _ in 0..detector_count {
            let name = r.read_string()?;
            let offset = r.read_u64()?;
            detectors.insert(name, offset);
        }

        let directory_len = r.read_u16()? as usize;
        let mut directory = Vec::with_capacity(directory_len);
        for _ in 0..directory_len {
            let kind = ChannelKind::from_id(r.read_u8()?)?;
            let name = r.read_string()?;
            let rel_offset = r.read_u64()?;
            directory.push((kind, name, rel_offset));
        }

        let blob_len = r.read_u64()? as usize;
        let blob = r.read_bytes(blob_len)?;

        let mut channels: HashMap<ChannelKind, HashMap<String, Vec<u64>>> = HashMap::new();
        for (kind, name, rel_offset) in directory {
            let start = rel_offset as usize;
            let mut offsets = Vec::with_capacity(frame_count);
            for i in 0..frame_count {
                let at = start + i * 8;
                let bytes: [u8; 8] = blob
                    .get(at..at + 8)
                    .ok_or_else(|| Error::InvalidData(format!("TOC offset array for `{name}` truncated")))?
                    .try_into()
                    .unwrap();
                offsets.push(u64::from_le_bytes(bytes));
            }
            channels.entry(kind).or_default().insert(name, offsets);
        }

        Ok(Self { run, frame, gtime_s, gtime_n, dt, data_quality, frame_offsets, detectors, channels })
    }
}

fn read_vec<T>(r: &mut PayloadReader, n: usize, mut one: impl FnMut(&mut PayloadReader) -> Result<T>) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(one(r)?);
    }
    Ok(out)
}

/// Accumulates TOC entries during a write pass (spec.md §4.5: "the
/// driver records the file offset at which each indexable structure
/// begins").
#[derive(Debug, Default)]
pub struct TocBuilder {
    toc: Toc,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, run: i32, frame: u32, gtime_s: u32, gtime_n: u32, dt: f64, data_quality: u32, offset: u64) {
        self.toc.run.push(run);
        self.toc.frame.push(frame);
        self.toc.gtime_s.push(gtime_s);
        self.toc.gtime_n.push(gtime_n);
        self.toc.dt.push(dt);
        self.toc.data_quality.push(data_quality);
        self.toc.frame_offsets.push(offset);
    }

    /// Records that `name`'s structure for the frame just passed to
    /// [`Self::record_frame`] begins at `offset`. Channels skipped in
    /// between are backfilled with 0 ("absent", spec.md §4.5).
    pub fn record_channel(&mut self, kind: ChannelKind, name: &str, offset: u64) {
        let frame_count = self.toc.frame_offsets.len();
        let offsets = self.toc.channels.entry(kind).or_default().entry(name.to_string()).or_default();
        if offsets.len() < frame_count.saturating_sub(1) {
            offsets.resize(frame_count - 1, 0);
        }
        offsets.push(offset);
    }

    pub fn record_detector(&mut self, name: &str, offset: u64) {
        self.toc.detectors.insert(name.to_string(), offset);
    }

    /// Backfills every channel's offset array up to the total frame
    /// count (spec.md §4.5 invariant: "the frame count equals the
    /// length of every offset array") and returns the finished TOC.
    pub fn finish(mut self) -> Toc {
        let frame_count = self.toc.frame_offsets.len();
        for map in self.toc.channels.values_mut() {
            for offsets in map.values_mut() {
                if offsets.len() < frame_count {
                    offsets.resize(frame_count, 0);
                }
            }
        }
        self.toc
    }
}

/// The lazily-read directory used by the TOC fast path
/// (`CachePositions` then `SeekPositions`, spec.md §4.5): knows where
/// each channel's offset array lives in the file without having parsed
/// it.
pub struct TocCache {
    pub frame_count: u64,
    directory: HashMap<(ChannelKind, String), u64>,
    arrays_blob_offset: u64,
}

impl TocCache {
    /// `CachePositions`: reads the fixed-size per-frame fields, the
    /// detector directory, and the channel directory, but stops before
    /// the per-channel offset arrays. `payload_offset` is the absolute
    /// file offset at which the TOC structure's payload begins.
    pub fn read<R: Read + Seek>(reader: &mut R, payload_offset: u64) -> Result<Self> {
        reader.seek(SeekFrom::Start(payload_offset))?;
        let mut frame_count_bytes = [0u8; 8];
        reader.read_exact(&mut frame_count_bytes)?;
        let frame_count = u64::from_le_bytes(frame_count_bytes);

        // run + frame + gtimeS + gtimeN + dataQuality: 4 bytes each; dt: 8 bytes; frameOffsets: 8 bytes.
        let per_frame_fixed_bytes = frame_count * (4 + 4 + 4 + 4 + 8 + 4 + 8);
        reader.seek(SeekFrom::Current(per_frame_fixed_bytes as i64))?;

        let mut buf16 = [0u8; 2];
        reader.read_exact(&mut buf16)?;
        let detector_count = u16::from_le_bytes(buf16) as usize;
        for _ in 0..detector_count {
            skip_string(reader)?;
            let mut buf8 = [0u8; 8];
            reader.read_exact(&mut buf8)?;
        }

        reader.read_exact(&mut buf16)?;
        let directory_len = u16::from_le_bytes(buf16) as usize;
        let mut directory = HashMap::with_capacity(directory_len);
        for _ in 0..directory_len {
            let mut kind_id = [0u8; 1];
            reader.read_exact(&mut kind_id)?;
            let kind = ChannelKind::from_id(kind_id[0])?;
            let name = read_string(reader)?;
            let mut rel_offset = [0u8; 8];
            reader.read_exact(&mut rel_offset)?;
            directory.insert((kind, name), u64::from_le_bytes(rel_offset));
        }

        let mut blob_len = [0u8; 8];
        reader.read_exact(&mut blob_len)?;
        let arrays_blob_offset = reader.stream_position()?;
        let _ = u64::from_le_bytes(blob_len);

        Ok(Self { frame_count, directory, arrays_blob_offset })
    }

    /// `SeekPositions(channel)`: seeks directly to and reads only the
    /// named channel's offset array, without touching any other
    /// channel's data.
    pub fn seek_positions<R: Read + Seek>(&self, reader: &mut R, kind: ChannelKind, name: &str) -> Result<Vec<u64>> {
        let rel_offset = self
            .directory
            .get(&(kind, name.to_string()))
            .ok_or_else(|| Error::InvalidData(format!("TOC has no channel `{name}` of kind {kind:?}")))?;
        reader.seek(SeekFrom::Start(self.arrays_blob_offset + rel_offset))?;
        let mut offsets = Vec::with_capacity(self.frame_count as usize);
        for _ in 0..self.frame_count {
            let mut buf = [0u8; 8];
            reader.read_exact(&mut buf)?;
            offsets.push(u64::from_le_bytes(buf));
        }
        Ok(offsets)
    }
}

fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let mut len_bytes = [0u8; 2];
    reader.read_exact(&mut len_bytes)?;
    let len = u16::from_le_bytes(len_bytes) as usize;
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("non-UTF-8 TOC directory name: {e}")))
}

fn skip_string<R: Read>(reader: &mut R) -> Result<()> {
    let mut len_bytes = [0u8; 2];
    reader.read_exact(&mut len_bytes)?;
    let len = u16::from_le_bytes(len_bytes) as usize;
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_toc() -> Toc {
        let mut b = TocBuilder::new();
        b.record_frame(0, 0, 100, 0, 1.0, 0, 40);
        b.record_channel(ChannelKind::Adc, "H1:STRAIN", 60);
        b.record_frame(0, 1, 101, 0, 1.0, 0, 200);
        b.record_channel(ChannelKind::Adc, "H1:STRAIN", 220);
        b.record_detector("H1", 10);
        b.finish()
    }

    #[test]
    fn position_h_and_channel_round_trip_through_payload() {
        let toc = sample_toc();
        let bytes = toc.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = Toc::from_payload(&mut r).unwrap();
        assert_eq!(parsed.position_h(1), Some(200));
        assert_eq!(parsed.position(ChannelKind::Adc, 1, "H1:STRAIN"), Some(220));
        assert_eq!(parsed.position_detector("H1"), Some(10));
    }

    #[test]
    fn absent_channel_offset_is_none() {
        let toc = sample_toc();
        assert_eq!(toc.position(ChannelKind::Adc, 0, "L1:STRAIN"), None);
    }

    #[test]
    fn fast_path_seek_positions_matches_eager_read() {
        let toc = sample_toc();
        let payload = toc.to_payload();
        let mut file = Vec::new();
        file.extend_from_slice(&[0u8; 32]); // pretend some preceding file content
        let payload_offset = file.len() as u64;
        file.extend_from_slice(&payload);

        let mut cursor = Cursor::new(file);
        let cache = TocCache::read(&mut cursor, payload_offset).unwrap();
        let seeked = cache.seek_positions(&mut cursor, ChannelKind::Adc, "H1:STRAIN").unwrap();

        let mut r = PayloadReader::new(&payload, 0);
        let eager = Toc::from_payload(&mut r).unwrap();
        assert_eq!(seeked, eager.channels.get(&ChannelKind::Adc).unwrap().get("H1:STRAIN").unwrap().clone());
    }
}

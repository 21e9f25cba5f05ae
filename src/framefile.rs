//! Frame file driver (C6, spec.md §4.6): orchestrates the on-disk
//! sequence `FrHeader, (FrameH … FrEndOfFrame)*, [FrTOC], FrEndOfFile`,
//! owns the reference table and the file handle's poison state, and
//! drives verification.
//!
//! Grounded in the teacher's `container_v2.rs` writer/reader split (a
//! small `Default`-able options struct handed to the writer
//! constructor) and in `src/frame.rs`'s pattern of a driver type owning
//! both the sequencing state and a handle into the registry.

use crate::error::{Error, Result};
use crate::header::{ChecksumScheme, FrHeader};
use crate::registry;
use crate::stream::{self, Handle, PayloadReader, PayloadWriter, RawStructure, RefTable};
use crate::structures::{
    self, adc::FrAdcData, event::FrEvent, proc::FrProcData, sim::FrSimData, sim_event::FrSimEvent, table::FrTable,
    FrDetector, Frame,
};
use crate::toc::{ChannelKind, Toc, TocBuilder};
use crate::vect::{Algorithm, CompressionRequest};
use crc32fast::Hasher;
use std::io::{Read, Seek, SeekFrom, Write};

pub const EOF_NAME: &str = "FrEndOfFile";

/// `OpenWrite` options (spec.md §6 "Environment / config: ... a
/// compression-level default may be supplied at `OpenWrite` time").
#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub compression: CompressionRequest,
    pub level: u32,
    pub write_toc: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        // `Concrete(Raw)` is a no-op for any vector still in `Algorithm::Raw`
        // state, so the default never overrides a caller's own choice; a
        // caller opts into writer-driven compression by supplying a
        // non-Raw request explicitly.
        Self { compression: CompressionRequest::Concrete(Algorithm::Raw), level: 6, write_toc: true }
    }
}

enum Mode {
    Reading { last_nonframe: Option<RawStructure> },
    Writing { options: WriterOptions, toc: TocBuilder, frames_written: u64, next_instance_id: u32 },
}

/// An open Frame file: either a reader positioned after the header, or
/// a writer that has already written the header. `S` must support
/// `Seek` because both the TOC fast path and the end-of-file checksum
/// sequencing need to jump around the file (spec.md §5: single-threaded
/// cooperative per handle, so this is never shared across threads).
pub struct FrameFile<S> {
    stream: S,
    position: u64,
    header: FrHeader,
    header_bytes: [u8; FrHeader::LEN],
    ref_table: RefTable,
    poisoned: Option<String>,
    mode: Mode,
}

/// One of the four independently selectable verification passes
/// (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyLevel {
    StructureChecksums,
    FileChecksum,
    ExpandabilityOfVectors,
    CrossTocConsistency,
}

#[derive(Debug, Clone)]
pub struct VerifyFailure {
    pub offset: u64,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub failures: Vec<VerifyFailure>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<S: Read + Write + Seek> FrameFile<S> {
    pub fn open_read(mut stream: S) -> Result<Self> {
        let mut header_bytes = [0u8; FrHeader::LEN];
        stream.read_exact(&mut header_bytes).map_err(|e| map_header_eof(e))?;
        let header = FrHeader::from_bytes(&header_bytes)?;
        Ok(Self {
            stream,
            position: FrHeader::LEN as u64,
            header,
            header_bytes,
            ref_table: RefTable::new(),
            poisoned: None,
            mode: Mode::Reading { last_nonframe: None },
        })
    }

    pub fn open_write(mut stream: S, options: WriterOptions) -> Result<Self> {
        let header = FrHeader::native(ChecksumScheme::Crc32);
        let header_bytes_vec = header.to_bytes();
        stream.write_all(&header_bytes_vec)?;
        let mut header_bytes = [0u8; FrHeader::LEN];
        header_bytes.copy_from_slice(&header_bytes_vec);
        Ok(Self {
            stream,
            position: FrHeader::LEN as u64,
            header,
            header_bytes,
            ref_table: RefTable::new(),
            poisoned: None,
            mode: Mode::Writing { options, toc: TocBuilder::new(), frames_written: 0, next_instance_id: 1 },
        })
    }

    pub fn header(&self) -> FrHeader {
        self.header
    }

    fn check_not_poisoned(&self) -> Result<()> {
        if self.poisoned.is_some() {
            return Err(Error::StreamPoisoned);
        }
        Ok(())
    }

    fn poison(&mut self, reason: impl Into<String>) {
        self.poisoned = Some(reason.into());
    }

    /// Reads one frame, skipping over the standalone channel structures
    /// `write_frame` emits between consecutive `FrameH` records (spec.md
    /// §4.5: each TOC-indexed channel also gets its own top-level,
    /// independently parseable copy) as well as any standalone
    /// `FrDetector`. Stops — remembering the terminating structure — at
    /// the first `FrTOC` or `FrEndOfFile` (spec.md §4.6 reader state
    /// machine: `ReadingContainedObjects → ReadingEndOfFrame → Done`).
    ///
    /// Every `FrDetector` seen is recorded in the reference table by
    /// offset, and every detector pointer a `Frame` carries is recorded
    /// as a reference, so `close()` can raise `BrokenReference` for a
    /// pointer that never resolves (spec.md §4.2: "a reference to a
    /// not-yet-read id is allowed and resolved after the producer
    /// appears ... dangling reference at end-of-file is an error").
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.check_not_poisoned()?;
        if !matches!(self.mode, Mode::Reading { .. }) {
            return Err(Error::InvalidData("next_frame called on a write handle".into()));
        }
        if let Mode::Reading { last_nonframe: Some(_) } = &self.mode {
            return Ok(None);
        }

        loop {
            let raw = match stream::read_structure(&mut self.stream, &mut self.position) {
                Ok(raw) => raw,
                Err(e) => {
                    self.poison(e.to_string());
                    return Err(e);
                }
            };

            if raw.class_id == structures::CLASS_ID_FRAME {
                let mut r = PayloadReader::new(&raw.payload, raw.offset);
                return match Frame::from_payload(&mut r) {
                    Ok(frame) => {
                        for handle in &frame.detector {
                            self.ref_table.reference(handle.id);
                        }
                        Ok(Some(frame))
                    }
                    Err(e) => {
                        self.poison(e.to_string());
                        Err(e)
                    }
                };
            }

            if raw.class_id == structures::CLASS_ID_TOC || raw.class_id == structures::CLASS_ID_EOF {
                if let Mode::Reading { last_nonframe } = &mut self.mode {
                    *last_nonframe = Some(raw);
                }
                return Ok(None);
            }

            if raw.class_id == structures::CLASS_ID_DETECTOR {
                self.ref_table.define(raw.instance_id, raw.offset);
            }

            // Standalone channel container: already reachable through
            // the frame itself (or the TOC), so skip and keep scanning.
        }
    }

    /// Writes `frame`'s own `FrameH` structure, then a standalone copy
    /// of each TOC-indexed channel container so the TOC can point at a
    /// well-formed, independently parseable structure for it (spec.md
    /// §4.5 invariant). This duplicates the channel bytes that are also
    /// embedded inline in the `FrameH` payload — documented in
    /// DESIGN.md as a simplification traded for not threading a
    /// pointer-resolution pass through every container type.
    pub fn write_frame(&mut self, frame: &mut Frame) -> Result<()> {
        self.check_not_poisoned()?;
        let options = match &self.mode {
            Mode::Writing { options, .. } => options.clone(),
            Mode::Reading { .. } => return Err(Error::InvalidData("write_frame called on a read handle".into())),
        };
        compress_raw_vectors(frame, &options)?;
        for handle in &frame.detector {
            self.ref_table.reference(handle.id);
        }

        let next_id = match &mut self.mode {
            Mode::Writing { next_instance_id, .. } => next_instance_id,
            Mode::Reading { .. } => unreachable!(),
        };

        let instance_id = *next_id;
        *next_id += 1;
        let payload = frame.to_payload();
        let frame_offset = match stream::write_structure(&mut self.stream, &mut self.position, structures::CLASS_ID_FRAME, instance_id, &payload) {
            Ok(offset) => offset,
            Err(e) => {
                self.poison(e.to_string());
                return Err(e);
            }
        };

        let toc = match &mut self.mode {
            Mode::Writing { toc, .. } => toc,
            Mode::Reading { .. } => unreachable!(),
        };
        toc.record_frame(frame.run, frame.frame, frame.gtime.seconds, frame.gtime.nanoseconds, frame.dt, frame.data_quality, frame_offset);

        let frames_written = match &mut self.mode {
            Mode::Writing { frames_written, .. } => frames_written,
            Mode::Reading { .. } => unreachable!(),
        };
        *frames_written += 1;

        write_channel_set(self, ChannelKind::Adc, &frame.adc, structures::CLASS_ID_ADC, |a| &a.name, FrAdcData::to_payload)?;
        write_channel_set(self, ChannelKind::Proc, &frame.proc, structures::CLASS_ID_PROC, |p| &p.name, FrProcData::to_payload)?;
        write_channel_set(self, ChannelKind::Sim, &frame.sim, structures::CLASS_ID_SIM, |s| &s.name, FrSimData::to_payload)?;
        write_channel_set(self, ChannelKind::Ser, &frame.table, structures::CLASS_ID_TABLE, |t| &t.name, FrTable::to_payload)?;
        write_channel_set(self, ChannelKind::Event, &frame.event, structures::CLASS_ID_EVENT, |e| &e.name, FrEvent::to_payload)?;
        write_channel_set(self, ChannelKind::SimEvent, &frame.sim_event, structures::CLASS_ID_SIM_EVENT, |e| &e.name, FrSimEvent::to_payload)?;

        Ok(())
    }

    /// Writes a detector descriptor as its own top-level structure and
    /// returns a handle a `Frame` can reference (spec.md §3: detector
    /// back-links are "by byte offset, not ownership").
    pub fn write_detector(&mut self, detector: &FrDetector) -> Result<Handle<FrDetector>> {
        self.check_not_poisoned()?;
        let next_id = match &mut self.mode {
            Mode::Writing { next_instance_id, .. } => next_instance_id,
            Mode::Reading { .. } => return Err(Error::InvalidData("write_detector called on a read handle".into())),
        };
        let instance_id = *next_id;
        *next_id += 1;
        let payload = detector.to_payload();
        let offset = stream::write_structure(&mut self.stream, &mut self.position, structures::CLASS_ID_DETECTOR, instance_id, &payload)?;
        self.ref_table.define(instance_id, offset);
        if let Mode::Writing { toc, .. } = &mut self.mode {
            toc.record_detector(&detector.name, offset);
        }
        Ok(Handle::new(instance_id))
    }

    /// `Close()`. On a writer this assembles and writes the TOC (if
    /// enabled) and the end-of-file record with its checksum sequencing
    /// (spec.md §4.4 field list). On a reader this re-validates
    /// `chkSumFile` (spec.md §4.6: "asserts `chkSumFile` matches").
    pub fn close(mut self) -> Result<()> {
        self.check_not_poisoned()?;
        match self.mode {
            Mode::Writing { .. } => self.close_writer(),
            Mode::Reading { .. } => {
                self.ref_table.check_complete()?;
                let report = self.verify(VerifyLevel::FileChecksum)?;
                if let Some(failure) = report.failures.into_iter().next() {
                    return Err(Error::InvalidData(failure.detail));
                }
                Ok(())
            }
        }
    }

    fn close_writer(&mut self) -> Result<()> {
        self.ref_table.check_complete()?;
        let (options, toc_builder, frames_written) = match std::mem::replace(
            &mut self.mode,
            Mode::Writing { options: WriterOptions::default(), toc: TocBuilder::new(), frames_written: 0, next_instance_id: 0 },
        ) {
            Mode::Writing { options, toc, frames_written, .. } => (options, toc, frames_written),
            Mode::Reading { .. } => unreachable!(),
        };

        let toc = toc_builder.finish();
        let seek_toc = if options.write_toc {
            let toc_payload = toc.to_payload();
            let toc_offset = stream::write_structure(&mut self.stream, &mut self.position, structures::CLASS_ID_TOC, 0, &toc_payload)?;
            self.position - toc_offset
        } else {
            0
        };

        let n_bytes_before_eof = self.position;
        let chk_sum_fr_header = crc32fast::hash(&self.header_bytes);

        let mut prefix = PayloadWriter::new();
        prefix.write_u64(frames_written);
        prefix.write_u64(n_bytes_before_eof);
        prefix.write_u64(seek_toc);
        prefix.write_u32(chk_sum_fr_header);
        let prefix_bytes = prefix.into_bytes(); // 28 bytes: nFrames, nBytes, seekTOC, chkSumFrHeader

        let header_for_eof = eof_envelope_header(36);
        let mut chk_sum_hasher = Hasher::new();
        chk_sum_hasher.update(&header_for_eof);
        chk_sum_hasher.update(&prefix_bytes);
        let chk_sum = chk_sum_hasher.finalize();

        // chkSumFile: the running checksum over the whole file through
        // the byte just before the chkSumFile field — computed by
        // reading everything written so far back from the start rather
        // than threading a hasher through every write call, since this
        // runs once at close and the file is already fully buffered by
        // the OS/Seek-capable sink either way.
        self.stream.seek(SeekFrom::Start(0))?;
        let mut written_so_far = vec![0u8; n_bytes_before_eof as usize];
        self.stream.read_exact(&mut written_so_far)?;
        self.stream.seek(SeekFrom::Start(n_bytes_before_eof))?;

        let mut file_hasher = Hasher::new();
        file_hasher.update(&written_so_far);
        file_hasher.update(&header_for_eof);
        file_hasher.update(&prefix_bytes);
        file_hasher.update(&chk_sum.to_le_bytes());
        let chk_sum_file = file_hasher.finalize();

        let mut full_payload = prefix_bytes;
        full_payload.extend_from_slice(&chk_sum.to_le_bytes());
        full_payload.extend_from_slice(&chk_sum_file.to_le_bytes());

        stream::write_structure(&mut self.stream, &mut self.position, structures::CLASS_ID_EOF, 0, &full_payload)?;
        self.stream.flush()?;
        Ok(())
    }

    /// Runs one verification pass without consuming the handle, so a
    /// caller can check several levels before deciding to close.
    pub fn verify(&mut self, level: VerifyLevel) -> Result<VerifyReport> {
        let resume_at = self.stream.stream_position()?;
        let mut report = VerifyReport::default();

        match level {
            VerifyLevel::StructureChecksums | VerifyLevel::ExpandabilityOfVectors => {
                self.stream.seek(SeekFrom::Start(FrHeader::LEN as u64))?;
                let mut pos = FrHeader::LEN as u64;
                loop {
                    match stream::read_structure(&mut self.stream, &mut pos) {
                        Ok(raw) => {
                            let is_eof = raw.class_id == structures::CLASS_ID_EOF;
                            if level == VerifyLevel::ExpandabilityOfVectors && raw.class_id == structures::CLASS_ID_FRAME {
                                check_frame_vectors(&raw, &mut report);
                            }
                            if is_eof {
                                break;
                            }
                        }
                        Err(e) => {
                            report.failures.push(VerifyFailure { offset: pos, detail: e.to_string() });
                            break;
                        }
                    }
                }
            }
            VerifyLevel::FileChecksum => {
                self.stream.seek(SeekFrom::Start(0))?;
                let total_len = self.stream.seek(SeekFrom::End(0))?;
                self.stream.seek(SeekFrom::Start(0))?;
                let mut buf = vec![0u8; total_len as usize];
                self.stream.read_exact(&mut buf)?;
                match locate_eof_record(&buf) {
                    Ok((eof_payload_start, eof)) => {
                        let chk_sum_file_offset = eof_payload_start + 32;
                        let computed = crc32fast::hash(&buf[..chk_sum_file_offset]);
                        if computed != eof.chk_sum_file {
                            report.failures.push(VerifyFailure {
                                offset: chk_sum_file_offset as u64,
                                detail: format!("chkSumFile mismatch: expected {:#010x}, computed {computed:#010x}", eof.chk_sum_file),
                            });
                        }
                        let computed_header = crc32fast::hash(&buf[..FrHeader::LEN]);
                        if computed_header != eof.chk_sum_fr_header {
                            report.failures.push(VerifyFailure {
                                offset: 0,
                                detail: format!(
                                    "chkSumFrHeader mismatch: expected {:#010x}, computed {computed_header:#010x}",
                                    eof.chk_sum_fr_header
                                ),
                            });
                        }
                    }
                    Err(e) => report.failures.push(VerifyFailure { offset: buf.len() as u64, detail: e.to_string() }),
                }
            }
            VerifyLevel::CrossTocConsistency => {
                self.stream.seek(SeekFrom::Start(0))?;
                let total_len = self.stream.seek(SeekFrom::End(0))?;
                self.stream.seek(SeekFrom::Start(0))?;
                let mut buf = vec![0u8; total_len as usize];
                self.stream.read_exact(&mut buf)?;
                check_toc_consistency(&buf, &mut report);
            }
        }

        self.stream.seek(SeekFrom::Start(resume_at))?;
        Ok(report)
    }
}

fn map_header_eof(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::Truncated { offset: 0, expected: FrHeader::LEN as u64 }
    } else {
        Error::Io(e)
    }
}

fn eof_envelope_header(payload_len: u64) -> [u8; 14] {
    let mut header = [0u8; 14];
    let length = 18 + payload_len;
    header[0..8].copy_from_slice(&length.to_le_bytes());
    header[8..10].copy_from_slice(&structures::CLASS_ID_EOF.to_le_bytes());
    header[10..14].copy_from_slice(&0u32.to_le_bytes());
    header
}

/// Applies `options.compression`/`options.level` to every vector still in
/// its raw, uncompressed state (spec.md §6: "a compression-level default
/// may be supplied at `OpenWrite` time"). Vectors a caller already
/// compressed explicitly via `FrVect::compress` are left untouched.
fn compress_raw_vectors(frame: &mut Frame, options: &WriterOptions) -> Result<()> {
    let mut compress_all = |vects: &mut [crate::vect::FrVect]| -> Result<()> {
        for v in vects {
            if v.compression.algorithm == Algorithm::Raw {
                v.compress(options.compression, options.level)?;
            }
        }
        Ok(())
    };
    for a in &mut frame.adc {
        compress_all(&mut a.data)?;
        compress_all(&mut a.aux)?;
    }
    for p in &mut frame.proc {
        compress_all(&mut p.data)?;
        compress_all(&mut p.aux)?;
    }
    for s in &mut frame.sim {
        compress_all(&mut s.data)?;
    }
    for e in &mut frame.event {
        compress_all(&mut e.data)?;
    }
    for e in &mut frame.sim_event {
        compress_all(&mut e.data)?;
    }
    Ok(())
}

fn write_channel_set<S: Read + Write + Seek, T>(
    file: &mut FrameFile<S>,
    kind: ChannelKind,
    items: &[T],
    class_id: u16,
    name_of: impl Fn(&T) -> &str,
    to_payload: impl Fn(&T) -> Vec<u8>,
) -> Result<()> {
    for item in items {
        let next_id = match &mut file.mode {
            Mode::Writing { next_instance_id, .. } => next_instance_id,
            Mode::Reading { .. } => return Err(Error::InvalidData("write_channel_set called on a read handle".into())),
        };
        let instance_id = *next_id;
        *next_id += 1;
        let payload = to_payload(item);
        let offset = stream::write_structure(&mut file.stream, &mut file.position, class_id, instance_id, &payload)?;
        if let Mode::Writing { toc, .. } = &mut file.mode {
            toc.record_channel(kind, name_of(item), offset);
        }
    }
    Ok(())
}

/// Parsed end-of-file record (spec.md §3 "End-of-file record").
struct EndOfFile {
    chk_sum_fr_header: u32,
    chk_sum_file: u32,
}

fn locate_eof_record(buf: &[u8]) -> Result<(usize, EndOfFile)> {
    let mut pos = FrHeader::LEN as u64;
    let mut cursor = &buf[FrHeader::LEN..];
    loop {
        let offset_before = pos;
        let raw = stream::read_structure(&mut cursor, &mut pos)?;
        if raw.class_id == structures::CLASS_ID_EOF {
            let payload_start = offset_before as usize + 14;
            let mut r = PayloadReader::new(&raw.payload, offset_before + 14);
            let _n_frames = r.read_u64()?;
            let _n_bytes = r.read_u64()?;
            let _seek_toc = r.read_u64()?;
            let chk_sum_fr_header = r.read_u32()?;
            let _chk_sum = r.read_u32()?;
            let chk_sum_file = r.read_u32()?;
            return Ok((payload_start, EndOfFile { chk_sum_fr_header, chk_sum_file }));
        }
    }
}

fn check_frame_vectors(raw: &RawStructure, report: &mut VerifyReport) {
    let mut r = PayloadReader::new(&raw.payload, raw.offset);
    let frame = match Frame::from_payload(&mut r) {
        Ok(frame) => frame,
        Err(e) => {
            report.failures.push(VerifyFailure { offset: raw.offset, detail: e.to_string() });
            return;
        }
    };
    let mut check_all = |label: &str, vects: Vec<&crate::vect::FrVect>| {
        for v in vects {
            if let Err(e) = v.expand() {
                report.failures.push(VerifyFailure { offset: raw.offset, detail: format!("{label} `{}`: {e}", v.name) });
            }
        }
    };
    check_all("adc", frame.adc.iter().flat_map(|a| a.data.iter().chain(a.aux.iter())).collect());
    check_all("proc", frame.proc.iter().flat_map(|p| p.data.iter().chain(p.aux.iter())).collect());
    check_all("sim", frame.sim.iter().flat_map(|s| s.data.iter()).collect());
    check_all("event", frame.event.iter().flat_map(|e| e.data.iter()).collect());
    check_all("simEvent", frame.sim_event.iter().flat_map(|e| e.data.iter()).collect());
}

fn check_toc_consistency(buf: &[u8], report: &mut VerifyReport) {
    let mut pos = FrHeader::LEN as u64;
    let mut cursor = &buf[FrHeader::LEN..];
    let toc = loop {
        let raw = match stream::read_structure(&mut cursor, &mut pos) {
            Ok(raw) => raw,
            Err(e) => {
                report.failures.push(VerifyFailure { offset: pos, detail: e.to_string() });
                return;
            }
        };
        if raw.class_id == structures::CLASS_ID_TOC {
            let mut r = PayloadReader::new(&raw.payload, raw.offset);
            match Toc::from_payload(&mut r) {
                Ok(toc) => break toc,
                Err(e) => {
                    report.failures.push(VerifyFailure { offset: raw.offset, detail: e.to_string() });
                    return;
                }
            }
        }
        if raw.class_id == structures::CLASS_ID_EOF {
            return; // no TOC present; nothing to cross-check.
        }
    };

    let expectations = [
        (ChannelKind::Adc, structures::CLASS_ID_ADC),
        (ChannelKind::Proc, structures::CLASS_ID_PROC),
        (ChannelKind::Sim, structures::CLASS_ID_SIM),
        (ChannelKind::Ser, structures::CLASS_ID_TABLE),
        (ChannelKind::Event, structures::CLASS_ID_EVENT),
        (ChannelKind::SimEvent, structures::CLASS_ID_SIM_EVENT),
    ];
    for (kind, expected_class_id) in expectations {
        for name in toc.channel_names(kind) {
            for frame_index in 0..toc.frame_count() {
                if let Some(offset) = toc.position(kind, frame_index, name) {
                    let mut slice = &buf[offset as usize..];
                    let mut local_pos = offset;
                    match stream::read_structure(&mut slice, &mut local_pos) {
                        Ok(raw) if raw.class_id == expected_class_id => {}
                        Ok(raw) => report.failures.push(VerifyFailure {
                            offset,
                            detail: format!("TOC entry for `{name}` points at class id {} expected {expected_class_id}", raw.class_id),
                        }),
                        Err(e) => report.failures.push(VerifyFailure { offset, detail: e.to_string() }),
                    }
                }
            }
        }
    }
}

/// Looks up the registered field descriptors for `name`, used by the
/// CLI's `dump-toc` to render human-readable structure shapes.
pub fn describe_structure(name: &str) -> Result<Vec<registry::FieldDescriptor>> {
    let entry = registry::lookup_by_name(name)?;
    Ok(registry::describe(&entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::GpsTime;
    use crate::vect::{Dimension, ElementType, FrVect};
    use std::io::Cursor;

    fn adc_with_vect(name: &str) -> FrAdcData {
        let bytes: Vec<u8> = (0..8i32).flat_map(|v| v.to_ne_bytes()).collect();
        let vect = FrVect::from_raw(name, "counts", ElementType::Int4S, 8, vec![Dimension::new(8, 1.0, 0.0, "s")], bytes).unwrap();
        FrAdcData {
            name: name.into(),
            comment: "".into(),
            channel_group: 0,
            channel_number: 0,
            n_bits: 16,
            bias: 0.0,
            slope: 1.0,
            unit_user: "counts".into(),
            sample_rate: 16384.0,
            time_offset_s: 0,
            time_offset_n: 0,
            f_shift: 0.0,
            phase: 0.0,
            data_valid: 0,
            data: vec![vect],
            aux: vec![],
        }
    }

    #[test]
    fn empty_frame_round_trips_through_a_file() {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = FrameFile::open_write(cursor, WriterOptions::default()).unwrap();
            let mut frame = Frame::new(3, 7, GpsTime::new(1_234_567_890, 500_000_000), 1.0);
            writer.write_frame(&mut frame).unwrap();
            writer.close().unwrap();
        }

        let cursor = Cursor::new(buf);
        let mut reader = FrameFile::open_read(cursor).unwrap();
        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.run, 3);
        assert_eq!(frame.frame, 7);
        assert!(reader.next_frame().unwrap().is_none());
        reader.close().unwrap();
    }

    #[test]
    fn written_file_reads_back_with_matching_checksum() {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = FrameFile::open_write(cursor, WriterOptions::default()).unwrap();
            let mut frame = Frame::new(0, 0, GpsTime::new(100, 0), 1.0);
            frame.adc.push(adc_with_vect("H1:STRAIN"));
            writer.write_frame(&mut frame).unwrap();
            writer.close().unwrap();
        }

        let cursor = Cursor::new(buf);
        let mut reader = FrameFile::open_read(cursor).unwrap();
        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.adc.len(), 1);
        assert!(reader.next_frame().unwrap().is_none());
        reader.close().unwrap();
    }

    #[test]
    fn verify_file_checksum_detects_corruption() {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = FrameFile::open_write(cursor, WriterOptions::default()).unwrap();
            let mut frame = Frame::new(0, 0, GpsTime::new(0, 0), 1.0);
            writer.write_frame(&mut frame).unwrap();
            writer.close().unwrap();
        }
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;

        let cursor = Cursor::new(buf);
        let mut reader = FrameFile::open_read(cursor).unwrap();
        while reader.next_frame().unwrap().is_some() {}
        let report = reader.verify(VerifyLevel::FileChecksum).unwrap();
        assert!(!report.is_ok());
    }
}

//! `Frame`: per-frame metadata plus owned channel containers
//! (spec.md §3, §4.4).

use crate::error::Result;
use crate::stream::{Handle, PayloadReader, PayloadWriter};
use crate::structures::detector::FrDetector;
use crate::structures::event::FrEvent;
use crate::structures::history::FrHistory;
use crate::structures::message::FrMsg;
use crate::structures::sim::FrSimData;
use crate::structures::sim_event::FrSimEvent;
use crate::structures::summary::FrSummary;
use crate::structures::table::FrTable;
use crate::structures::{adc::FrAdcData, proc::FrProcData, GpsTime};

pub const NAME: &str = "FrameH";

/// A single observation-interval record: metadata plus every channel
/// container kind it owns (spec.md §3 "Frame").
#[derive(Debug, Clone)]
pub struct Frame {
    pub run: i32,
    pub frame: u32,
    pub data_quality: u32,
    pub gtime: GpsTime,
    pub dt: f64,
    pub adc: Vec<FrAdcData>,
    pub proc: Vec<FrProcData>,
    pub sim: Vec<FrSimData>,
    pub event: Vec<FrEvent>,
    pub sim_event: Vec<FrSimEvent>,
    pub table: Vec<FrTable>,
    pub summary: Vec<FrSummary>,
    pub history: Vec<FrHistory>,
    pub msg: Vec<FrMsg>,
    /// References to detector descriptors owned elsewhere in the file
    /// (spec.md §3: "back-links from TOC to structures are by byte
    /// offset, not ownership" — detectors follow the same rule from a
    /// frame's point of view).
    pub detector: Vec<Handle<FrDetector>>,
}

impl Frame {
    pub fn new(run: i32, frame: u32, gtime: GpsTime, dt: f64) -> Self {
        Self {
            run,
            frame,
            data_quality: 0,
            gtime,
            dt,
            adc: Vec::new(),
            proc: Vec::new(),
            sim: Vec::new(),
            event: Vec::new(),
            sim_event: Vec::new(),
            table: Vec::new(),
            summary: Vec::new(),
            history: Vec::new(),
            msg: Vec::new(),
            detector: Vec::new(),
        }
    }

    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_i32(self.run);
        w.write_u32(self.frame);
        w.write_u32(self.data_quality);
        w.write_u32(self.gtime.seconds);
        w.write_u32(self.gtime.nanoseconds);
        w.write_f64(self.dt);

        w.write_u16(self.adc.len() as u16);
        for a in &self.adc {
            w.write_bytes(&a.to_payload());
        }
        w.write_u16(self.proc.len() as u16);
        for p in &self.proc {
            w.write_bytes(&p.to_payload());
        }
        w.write_u16(self.sim.len() as u16);
        for s in &self.sim {
            w.write_bytes(&s.to_payload());
        }
        w.write_u16(self.event.len() as u16);
        for e in &self.event {
            w.write_bytes(&e.to_payload());
        }
        w.write_u16(self.sim_event.len() as u16);
        for e in &self.sim_event {
            w.write_bytes(&e.to_payload());
        }
        w.write_u16(self.table.len() as u16);
        for t in &self.table {
            w.write_bytes(&t.to_payload());
        }
        w.write_u16(self.summary.len() as u16);
        for s in &self.summary {
            w.write_bytes(&s.to_payload());
        }
        w.write_u16(self.history.len() as u16);
        for h in &self.history {
            w.write_bytes(&h.to_payload());
        }
        w.write_u16(self.msg.len() as u16);
        for m in &self.msg {
            w.write_bytes(&m.to_payload());
        }
        w.write_u16(self.detector.len() as u16);
        for d in &self.detector {
            w.write_pointer(*d);
        }
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        let run = r.read_i32()?;
        let frame = r.read_u32()?;
        let data_quality = r.read_u32()?;
        let seconds = r.read_u32()?;
        let nanoseconds = r.read_u32()?;
        let dt = r.read_f64()?;

        let adc = read_n(r, FrAdcData::from_payload)?;
        let proc = read_n(r, FrProcData::from_payload)?;
        let sim = read_n(r, FrSimData::from_payload)?;
        let event = read_n(r, FrEvent::from_payload)?;
        let sim_event = read_n(r, FrSimEvent::from_payload)?;
        let table = read_n(r, FrTable::from_payload)?;
        let summary = read_n(r, FrSummary::from_payload)?;
        let history = read_n(r, FrHistory::from_payload)?;
        let msg = read_n(r, FrMsg::from_payload)?;

        let detector_count = r.read_u16()? as usize;
        let mut detector = Vec::with_capacity(detector_count);
        for _ in 0..detector_count {
            detector.push(r.read_pointer()?);
        }

        Ok(Self {
            run,
            frame,
            data_quality,
            gtime: GpsTime::new(seconds, nanoseconds),
            dt,
            adc,
            proc,
            sim,
            event,
            sim_event,
            table,
            summary,
            history,
            msg,
            detector,
        })
    }
}

fn read_n<T>(r: &mut PayloadReader, mut one: impl FnMut(&mut PayloadReader) -> Result<T>) -> Result<Vec<T>> {
    let n = r.read_u16()? as usize;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(one(r)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_round_trips() {
        let frame = Frame::new(3, 7, GpsTime::new(1_234_567_890, 500_000_000), 1.0);
        let bytes = frame.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = Frame::from_payload(&mut r).unwrap();
        assert_eq!(parsed.run, 3);
        assert_eq!(parsed.frame, 7);
        assert_eq!(parsed.gtime, GpsTime::new(1_234_567_890, 500_000_000));
        assert_eq!(parsed.dt, 1.0);
        assert!(parsed.adc.is_empty());
    }

    #[test]
    fn frame_with_adc_channel_round_trips() {
        use crate::structures::adc::FrAdcData;
        use crate::vect::{Dimension, ElementType, FrVect};

        let mut frame = Frame::new(0, 1, GpsTime::new(100, 0), 1.0);
        let bytes: Vec<u8> = [0.0f32, 1.0, 2.0, 3.0].iter().flat_map(|v| v.to_ne_bytes()).collect();
        let vect = FrVect::from_raw(
            "H1:STRAIN",
            "strain",
            ElementType::Real4,
            4,
            vec![Dimension::new(4, 0.25, 0.0, "s")],
            bytes,
        )
        .unwrap();
        frame.adc.push(FrAdcData {
            name: "H1:STRAIN".into(),
            comment: "".into(),
            channel_group: 0,
            channel_number: 0,
            n_bits: 16,
            bias: 0.0,
            slope: 1.0,
            unit_user: "strain".into(),
            sample_rate: 16384.0,
            time_offset_s: 0,
            time_offset_n: 0,
            f_shift: 0.0,
            phase: 0.0,
            data_valid: 0,
            data: vec![vect],
            aux: vec![],
        });

        let payload = frame.to_payload();
        let mut r = PayloadReader::new(&payload, 0);
        let parsed = Frame::from_payload(&mut r).unwrap();
        assert_eq!(parsed.adc.len(), 1);
        let expected: Vec<u8> = [0.0f32, 1.0, 2.0, 3.0].iter().flat_map(|v| v.to_ne_bytes()).collect();
        assert_eq!(parsed.adc[0].data[0].expand().unwrap(), expected);
    }
}

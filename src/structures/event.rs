//! `FrEvent`: a detected/triggered event, grounded in
//! `examples/original_source/.../Version8/FrEvent.hh`.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};
use crate::vect::FrVect;

pub const NAME: &str = "FrEvent";

#[derive(Debug, Clone)]
pub struct FrEvent {
    pub name: String,
    pub comment: String,
    pub inputs: String,
    pub gtime_s: u32,
    pub gtime_n: u32,
    pub time_before: f32,
    pub time_after: f32,
    pub event_status: u32,
    pub amplitude: f32,
    pub probability: f32,
    pub statistics: String,
    pub params: Vec<(String, f64)>,
    pub data: Vec<FrVect>,
}

impl FrEvent {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_string(&self.comment);
        w.write_string(&self.inputs);
        w.write_u32(self.gtime_s);
        w.write_u32(self.gtime_n);
        w.write_f32(self.time_before);
        w.write_f32(self.time_after);
        w.write_u32(self.event_status);
        w.write_f32(self.amplitude);
        w.write_f32(self.probability);
        w.write_string(&self.statistics);
        w.write_u16(self.params.len() as u16);
        for (name, value) in &self.params {
            w.write_string(name);
            w.write_f64(*value);
        }
        w.write_u16(self.data.len() as u16);
        for v in &self.data {
            w.write_bytes(&v.to_payload());
        }
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        Ok(Self {
            name: r.read_string()?,
            comment: r.read_string()?,
            inputs: r.read_string()?,
            gtime_s: r.read_u32()?,
            gtime_n: r.read_u32()?,
            time_before: r.read_f32()?,
            time_after: r.read_f32()?,
            event_status: r.read_u32()?,
            amplitude: r.read_f32()?,
            probability: r.read_f32()?,
            statistics: r.read_string()?,
            params: {
                let n = r.read_u16()? as usize;
                let mut out = Vec::with_capacity(n);
                for _ in 0..n {
                    out.push((r.read_string()?, r.read_f64()?));
                }
                out
            },
            data: {
                let n = r.read_u16()? as usize;
                let mut out = Vec::with_capacity(n);
                for _ in 0..n {
                    out.push(FrVect::from_payload(r)?);
                }
                out
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_parameter_table() {
        let event = FrEvent {
            name: "BURST-TRIGGER".into(),
            comment: "".into(),
            inputs: "H1:STRAIN".into(),
            gtime_s: 1_234_567_890,
            gtime_n: 500_000_000,
            time_before: 0.25,
            time_after: 0.25,
            event_status: 0,
            amplitude: 12.5,
            probability: 0.01,
            statistics: "chisq".into(),
            params: vec![("snr".into(), 9.4), ("chisq".into(), 1.2)],
            data: vec![],
        };
        let bytes = event.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrEvent::from_payload(&mut r).unwrap();
        assert_eq!(parsed.params, event.params);
        assert_eq!(parsed.amplitude, event.amplitude);
    }
}

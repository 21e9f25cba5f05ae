//! `FrSimData`: a simulated channel, grounded in
//! `examples/original_source/.../Version8/FrSimData.hh`.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};
use crate::vect::FrVect;

pub const NAME: &str = "FrSimData";

#[derive(Debug, Clone)]
pub struct FrSimData {
    pub name: String,
    pub comment: String,
    pub sample_rate: f64,
    pub time_offset_s: u32,
    pub time_offset_n: u32,
    pub f_shift: f64,
    pub phase: f32,
    pub data: Vec<FrVect>,
}

impl FrSimData {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_string(&self.comment);
        w.write_f64(self.sample_rate);
        w.write_u32(self.time_offset_s);
        w.write_u32(self.time_offset_n);
        w.write_f64(self.f_shift);
        w.write_f32(self.phase);
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
            sample_rate: r.read_f64()?,
            time_offset_s: r.read_u32()?,
            time_offset_n: r.read_u32()?,
            f_shift: r.read_f64()?,
            phase: r.read_f32()?,
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
    fn round_trips_with_no_data_vectors() {
        let sim = FrSimData {
            name: "H1:SIM-INJECTION".into(),
            comment: "".into(),
            sample_rate: 16384.0,
            time_offset_s: 0,
            time_offset_n: 0,
            f_shift: 0.0,
            phase: 0.0,
            data: vec![],
        };
        let bytes = sim.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrSimData::from_payload(&mut r).unwrap();
        assert_eq!(parsed.name, sim.name);
        assert!(parsed.data.is_empty());
    }
}

//! `FrProcData`: a derived/processed channel (time-series, frequency
//! series, or other), grounded in
//! `examples/original_source/.../Version8/FrProcData.hh`.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};
use crate::structures::history::FrHistory;
use crate::vect::FrVect;

pub const NAME: &str = "FrProcData";

#[derive(Debug, Clone)]
pub struct FrProcData {
    pub name: String,
    pub comment: String,
    pub kind: i16,
    pub sub_type: i16,
    pub time_offset_s: u32,
    pub time_offset_n: u32,
    pub t_range: f64,
    pub f_shift: f64,
    pub phase: f32,
    pub f_range: f64,
    pub bandwidth: f64,
    pub data: Vec<FrVect>,
    pub aux: Vec<FrVect>,
    pub history: Vec<FrHistory>,
}

impl FrProcData {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_string(&self.comment);
        w.write_i16(self.kind);
        w.write_i16(self.sub_type);
        w.write_u32(self.time_offset_s);
        w.write_u32(self.time_offset_n);
        w.write_f64(self.t_range);
        w.write_f64(self.f_shift);
        w.write_f32(self.phase);
        w.write_f64(self.f_range);
        w.write_f64(self.bandwidth);
        w.write_u16(self.data.len() as u16);
        for v in &self.data {
            w.write_bytes(&v.to_payload());
        }
        w.write_u16(self.aux.len() as u16);
        for v in &self.aux {
            w.write_bytes(&v.to_payload());
        }
        w.write_u16(self.history.len() as u16);
        for h in &self.history {
            w.write_bytes(&h.to_payload());
        }
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        Ok(Self {
            name: r.read_string()?,
            comment: r.read_string()?,
            kind: r.read_i16()?,
            sub_type: r.read_i16()?,
            time_offset_s: r.read_u32()?,
            time_offset_n: r.read_u32()?,
            t_range: r.read_f64()?,
            f_shift: r.read_f64()?,
            phase: r.read_f32()?,
            f_range: r.read_f64()?,
            bandwidth: r.read_f64()?,
            data: read_vects(r)?,
            aux: read_vects(r)?,
            history: {
                let n = r.read_u16()? as usize;
                let mut out = Vec::with_capacity(n);
                for _ in 0..n {
                    out.push(FrHistory::from_payload(r)?);
                }
                out
            },
        })
    }
}

fn read_vects(r: &mut PayloadReader) -> Result<Vec<FrVect>> {
    let n = r.read_u16()? as usize;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(FrVect::from_payload(r)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vect::{Dimension, ElementType};

    #[test]
    fn round_trips_through_payload() {
        let bytes: Vec<u8> = (0..4).flat_map(|v: i32| (v as f32).to_ne_bytes()).collect();
        let vect = FrVect::from_raw("PSD", "strain^2/Hz", ElementType::Real4, 4, vec![Dimension::new(4, 1.0, 0.0, "Hz")], bytes).unwrap();
        let proc = FrProcData {
            name: "H1:PSD".into(),
            comment: "".into(),
            kind: 1,
            sub_type: 0,
            time_offset_s: 0,
            time_offset_n: 0,
            t_range: 1.0,
            f_shift: 0.0,
            phase: 0.0,
            f_range: 8192.0,
            bandwidth: 0.25,
            data: vec![vect],
            aux: vec![],
            history: vec![],
        };
        let bytes = proc.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrProcData::from_payload(&mut r).unwrap();
        assert_eq!(parsed.name, proc.name);
        assert_eq!(parsed.data.len(), 1);
    }
}

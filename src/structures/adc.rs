//! `FrAdcData`: a raw digitizer (ADC) channel (SPEC_FULL.md §3.1),
//! grounded in `examples/original_source/.../Version8/FrAdcData.hh`.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};
use crate::vect::FrVect;

pub const NAME: &str = "FrAdcData";

/// One ADC channel: calibration constants, timing offset relative to
/// the owning frame, and its owned data/auxiliary vectors.
#[derive(Debug, Clone)]
pub struct FrAdcData {
    pub name: String,
    pub comment: String,
    pub channel_group: u32,
    pub channel_number: u32,
    pub n_bits: u32,
    pub bias: f32,
    pub slope: f32,
    pub unit_user: String,
    pub sample_rate: f64,
    pub time_offset_s: u32,
    pub time_offset_n: u32,
    pub f_shift: f64,
    pub phase: f32,
    pub data_valid: u16,
    pub data: Vec<FrVect>,
    pub aux: Vec<FrVect>,
}

impl FrAdcData {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_string(&self.comment);
        w.write_u32(self.channel_group);
        w.write_u32(self.channel_number);
        w.write_u32(self.n_bits);
        w.write_f32(self.bias);
        w.write_f32(self.slope);
        w.write_string(&self.unit_user);
        w.write_f64(self.sample_rate);
        w.write_u32(self.time_offset_s);
        w.write_u32(self.time_offset_n);
        w.write_f64(self.f_shift);
        w.write_f32(self.phase);
        w.write_u16(self.data_valid);
        w.write_u16(self.data.len() as u16);
        for v in &self.data {
            w.write_bytes(&v.to_payload());
        }
        w.write_u16(self.aux.len() as u16);
        for v in &self.aux {
            w.write_bytes(&v.to_payload());
        }
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        Ok(Self {
            name: r.read_string()?,
            comment: r.read_string()?,
            channel_group: r.read_u32()?,
            channel_number: r.read_u32()?,
            n_bits: r.read_u32()?,
            bias: r.read_f32()?,
            slope: r.read_f32()?,
            unit_user: r.read_string()?,
            sample_rate: r.read_f64()?,
            time_offset_s: r.read_u32()?,
            time_offset_n: r.read_u32()?,
            f_shift: r.read_f64()?,
            phase: r.read_f32()?,
            data_valid: r.read_u16()?,
            data: {
                let n = r.read_u16()? as usize;
                let mut out = Vec::with_capacity(n);
                for _ in 0..n {
                    out.push(FrVect::from_payload(r)?);
                }
                out
            },
            aux: {
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
    use crate::vect::{Dimension, ElementType};

    fn sample_vect() -> FrVect {
        let bytes: Vec<u8> = (0..8i32).flat_map(|v| v.to_ne_bytes()).collect();
        FrVect::from_raw("H1:STRAIN", "strain", ElementType::Int4S, 8, vec![Dimension::new(8, 1.0, 0.0, "s")], bytes)
            .unwrap()
    }

    #[test]
    fn round_trips_through_payload() {
        let adc = FrAdcData {
            name: "H1:STRAIN".into(),
            comment: "test channel".into(),
            channel_group: 1,
            channel_number: 2,
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
            data: vec![sample_vect()],
            aux: vec![],
        };
        let bytes = adc.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrAdcData::from_payload(&mut r).unwrap();
        assert_eq!(parsed.name, adc.name);
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].expand().unwrap(), adc.data[0].expand().unwrap());
    }
}

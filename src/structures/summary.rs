//! `FrSummary`: summary statistics attached to a frame, grounded in
//! `examples/original_source/.../Version8/FrSummary.hh`.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};
use crate::vect::FrVect;

pub const NAME: &str = "FrSummary";

#[derive(Debug, Clone)]
pub struct FrSummary {
    pub name: String,
    pub comment: String,
    pub test: String,
    pub moments: Vec<FrVect>,
}

impl FrSummary {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_string(&self.comment);
        w.write_string(&self.test);
        w.write_u16(self.moments.len() as u16);
        for v in &self.moments {
            w.write_bytes(&v.to_payload());
        }
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        Ok(Self {
            name: r.read_string()?,
            comment: r.read_string()?,
            test: r.read_string()?,
            moments: {
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
    fn round_trips_with_no_moments() {
        let summary = FrSummary { name: "rms".into(), comment: "".into(), test: "".into(), moments: vec![] };
        let bytes = summary.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrSummary::from_payload(&mut r).unwrap();
        assert_eq!(parsed.name, summary.name);
    }
}

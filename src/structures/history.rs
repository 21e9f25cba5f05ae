//! `FrHistory`: a provenance record. On disk these chain via a `next`
//! pointer (spec.md §4.4, §9); in memory they are flattened to an
//! ordered `Vec<FrHistory>` owned by the parent structure, as the
//! "next-in-list" guidance in spec.md §9 directs.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};

pub const NAME: &str = "FrHistory";

#[derive(Debug, Clone)]
pub struct FrHistory {
    pub name: String,
    pub time: u32,
    pub comment: String,
}

impl FrHistory {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_u32(self.time);
        w.write_string(&self.comment);
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        Ok(Self { name: r.read_string()?, time: r.read_u32()?, comment: r.read_string()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_preserves_order() {
        let chain = vec![
            FrHistory { name: "step1".into(), time: 100, comment: "raw".into() },
            FrHistory { name: "step2".into(), time: 200, comment: "calibrated".into() },
        ];
        let mut w = PayloadWriter::new();
        w.write_u16(chain.len() as u16);
        for h in &chain {
            w.write_bytes(&h.to_payload());
        }
        let bytes = w.into_bytes();

        let mut r = PayloadReader::new(&bytes, 0);
        let n = r.read_u16().unwrap() as usize;
        let mut parsed = Vec::with_capacity(n);
        for _ in 0..n {
            parsed.push(FrHistory::from_payload(&mut r).unwrap());
        }
        assert_eq!(parsed.iter().map(|h| &h.name).collect::<Vec<_>>(), vec!["step1", "step2"]);
    }
}

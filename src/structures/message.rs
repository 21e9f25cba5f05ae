//! `FrMsg`: an alarm/log message attached to a frame, chained via `next`
//! on disk and flattened to `Vec<FrMsg>` in memory, same as `FrHistory`.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};

pub const NAME: &str = "FrMsg";

#[derive(Debug, Clone)]
pub struct FrMsg {
    pub alarm: String,
    pub message: String,
    pub severity: i32,
    pub gtime_s: u32,
    pub gtime_n: u32,
}

impl FrMsg {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.alarm);
        w.write_string(&self.message);
        w.write_i32(self.severity);
        w.write_u32(self.gtime_s);
        w.write_u32(self.gtime_n);
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        Ok(Self {
            alarm: r.read_string()?,
            message: r.read_string()?,
            severity: r.read_i32()?,
            gtime_s: r.read_u32()?,
            gtime_n: r.read_u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let msg = FrMsg { alarm: "CAL".into(), message: "calibration line dropped".into(), severity: 2, gtime_s: 5, gtime_n: 0 };
        let bytes = msg.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrMsg::from_payload(&mut r).unwrap();
        assert_eq!(parsed.message, msg.message);
        assert_eq!(parsed.severity, msg.severity);
    }
}

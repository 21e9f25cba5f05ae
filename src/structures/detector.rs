//! `FrDetector`: a static detector-site descriptor, grounded in
//! `examples/original_source/.../Version8/FrDetector.hh`. Referenced
//! from frames by instance id (spec.md §3: "owned containers ... and
//! detector references"), not owned, so it carries its own
//! `aux`/`history` the way the original keeps calibration provenance
//! attached to the site rather than to each frame.

use crate::error::Result;
use crate::stream::{PayloadReader, PayloadWriter};
use crate::structures::history::FrHistory;

pub const NAME: &str = "FrDetector";

#[derive(Debug, Clone)]
pub struct FrDetector {
    pub name: String,
    pub prefix: [u8; 2],
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f32,
    pub arm_x_azimuth: f32,
    pub arm_y_azimuth: f32,
    pub arm_x_altitude: f32,
    pub arm_y_altitude: f32,
    pub arm_x_midpoint: f32,
    pub arm_y_midpoint: f32,
    pub local_time: i32,
    /// Six calibration constants, as the original keeps a fixed-size
    /// calibration vector per detector.
    pub calibration: [f64; 6],
    pub history: Vec<FrHistory>,
}

impl FrDetector {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_u8(self.prefix[0]);
        w.write_u8(self.prefix[1]);
        w.write_f64(self.latitude);
        w.write_f64(self.longitude);
        w.write_f32(self.elevation);
        w.write_f32(self.arm_x_azimuth);
        w.write_f32(self.arm_y_azimuth);
        w.write_f32(self.arm_x_altitude);
        w.write_f32(self.arm_y_altitude);
        w.write_f32(self.arm_x_midpoint);
        w.write_f32(self.arm_y_midpoint);
        w.write_i32(self.local_time);
        for c in self.calibration {
            w.write_f64(c);
        }
        w.write_u16(self.history.len() as u16);
        for h in &self.history {
            w.write_bytes(&h.to_payload());
        }
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        let name = r.read_string()?;
        let prefix = [r.read_u8()?, r.read_u8()?];
        let latitude = r.read_f64()?;
        let longitude = r.read_f64()?;
        let elevation = r.read_f32()?;
        let arm_x_azimuth = r.read_f32()?;
        let arm_y_azimuth = r.read_f32()?;
        let arm_x_altitude = r.read_f32()?;
        let arm_y_altitude = r.read_f32()?;
        let arm_x_midpoint = r.read_f32()?;
        let arm_y_midpoint = r.read_f32()?;
        let local_time = r.read_i32()?;
        let mut calibration = [0.0f64; 6];
        for c in calibration.iter_mut() {
            *c = r.read_f64()?;
        }
        let history_count = r.read_u16()? as usize;
        let mut history = Vec::with_capacity(history_count);
        for _ in 0..history_count {
            history.push(FrHistory::from_payload(r)?);
        }
        Ok(Self {
            name,
            prefix,
            latitude,
            longitude,
            elevation,
            arm_x_azimuth,
            arm_y_azimuth,
            arm_x_altitude,
            arm_y_altitude,
            arm_x_midpoint,
            arm_y_midpoint,
            local_time,
            calibration,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_calibration_constants() {
        let detector = FrDetector {
            name: "LHO_4k".into(),
            prefix: *b"H1",
            latitude: 0.810_795,
            longitude: -2.084_071,
            elevation: 142.554,
            arm_x_azimuth: 2.199,
            arm_y_azimuth: 3.770,
            arm_x_altitude: -0.000_061,
            arm_y_altitude: 0.000_125,
            arm_x_midpoint: 1997.54,
            arm_y_midpoint: 1997.52,
            local_time: -8,
            calibration: [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            history: vec![],
        };
        let bytes = detector.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrDetector::from_payload(&mut r).unwrap();
        assert_eq!(parsed.prefix, detector.prefix);
        assert_eq!(parsed.calibration, detector.calibration);
    }
}

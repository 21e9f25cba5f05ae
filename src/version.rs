//! Promote/demote (C4, spec.md §4.4): converting already-parsed object
//! model values between the two on-disk generations this crate speaks,
//! version 6 and version 8 (`examples/original_source/` ships
//! `Version6` and `Version8` headers side by side; those are the two
//! generations carried here rather than every historical version).
//!
//! Each structure kind keeps a single Rust type regardless of version
//! (`crate::structures`); fields absent from the older generation are
//! represented by a documented sentinel. Promoting fills the sentinel
//! in; demoting succeeds only if the field is already at that sentinel.

use crate::error::{Error, Result};
use crate::structures::{FrAdcData, FrDetector, FrProcData, Frame};

pub const V6: u8 = 6;
pub const V8: u8 = 8;
pub const SUPPORTED_VERSIONS: [u8; 2] = [V6, V8];
pub const CURRENT_VERSION: u8 = V8;

pub fn is_supported(version: u8) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// A structure kind whose in-memory record carries fields that were
/// added between version 6 and version 8.
pub trait Versioned {
    /// Fails with [`Error::DemoteNotRepresentable`] naming the first
    /// field that is not at its version-6 default.
    fn demote_check(&self, target_version: u8) -> Result<()>;

    /// Resets every field not present at `target_version` to its
    /// documented sentinel. No-op when promoting to a version that
    /// already has every field (there is nothing to fill in).
    fn demote_fill_defaults(&mut self, target_version: u8);
}

impl Versioned for FrAdcData {
    fn demote_check(&self, target_version: u8) -> Result<()> {
        if target_version < V8 {
            if self.f_shift != 0.0 {
                return Err(Error::DemoteNotRepresentable { field: "fShift".into(), target_version });
            }
            if self.phase != 0.0 {
                return Err(Error::DemoteNotRepresentable { field: "phase".into(), target_version });
            }
        }
        Ok(())
    }

    fn demote_fill_defaults(&mut self, target_version: u8) {
        if target_version < V8 {
            self.f_shift = 0.0;
            self.phase = 0.0;
        }
    }
}

impl Versioned for FrProcData {
    fn demote_check(&self, target_version: u8) -> Result<()> {
        if target_version < V8 {
            if self.f_range != 0.0 {
                return Err(Error::DemoteNotRepresentable { field: "fRange".into(), target_version });
            }
            if self.bandwidth != 0.0 {
                return Err(Error::DemoteNotRepresentable { field: "bandwidth".into(), target_version });
            }
        }
        Ok(())
    }

    fn demote_fill_defaults(&mut self, target_version: u8) {
        if target_version < V8 {
            self.f_range = 0.0;
            self.bandwidth = 0.0;
        }
    }
}

impl Versioned for FrDetector {
    fn demote_check(&self, target_version: u8) -> Result<()> {
        if target_version < V8 {
            // Version 6 detectors carried only the first three
            // calibration constants; the rest must be unset (0.0).
            for (i, c) in self.calibration.iter().enumerate().skip(3) {
                if *c != 0.0 {
                    return Err(Error::DemoteNotRepresentable {
                        field: format!("calibration[{i}]"),
                        target_version,
                    });
                }
            }
        }
        Ok(())
    }

    fn demote_fill_defaults(&mut self, target_version: u8) {
        if target_version < V8 {
            for c in self.calibration.iter_mut().skip(3) {
                *c = 0.0;
            }
        }
    }
}

/// Checks every owned channel container in `frame` against
/// `target_version`, returning the first irrepresentable field found.
/// The frame's own fields carry no version-gated additions (spec.md
/// §3's `Frame` shape is unchanged between generations).
pub fn demote_check_frame(frame: &Frame, target_version: u8) -> Result<()> {
    for adc in &frame.adc {
        adc.demote_check(target_version)?;
    }
    for proc in &frame.proc {
        proc.demote_check(target_version)?;
    }
    Ok(())
}

/// Demotes `frame` in place to `target_version`, failing without
/// modifying anything if any contained structure cannot be represented
/// (spec.md §4.4: "object remains at source version").
pub fn demote_frame(frame: &mut Frame, target_version: u8) -> Result<()> {
    demote_check_frame(frame, target_version)?;
    for adc in &mut frame.adc {
        adc.demote_fill_defaults(target_version);
    }
    for proc in &mut frame.proc {
        proc.demote_fill_defaults(target_version);
    }
    Ok(())
}

/// Promoting is always representable: new fields simply take their
/// documented sentinel, already the in-memory default, so this is a
/// no-op kept for symmetry with `demote_frame` and to make call sites
/// explicit about which direction a conversion runs.
pub fn promote_frame(_frame: &mut Frame, _target_version: u8) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::GpsTime;

    fn sample_adc() -> FrAdcData {
        FrAdcData {
            name: "H1:STRAIN".into(),
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
            data: vec![],
            aux: vec![],
        }
    }

    #[test]
    fn demote_succeeds_when_fields_are_at_default() {
        let adc = sample_adc();
        assert!(adc.demote_check(V6).is_ok());
    }

    #[test]
    fn demote_fails_when_field_not_representable() {
        let mut adc = sample_adc();
        adc.f_shift = 12.5;
        let err = adc.demote_check(V6).unwrap_err();
        assert!(matches!(err, Error::DemoteNotRepresentable { .. }));
    }

    #[test]
    fn demote_frame_leaves_frame_untouched_on_failure() {
        let mut frame = Frame::new(0, 0, GpsTime::new(0, 0), 1.0);
        let mut adc = sample_adc();
        adc.phase = 1.0;
        frame.adc.push(adc);
        let err = demote_frame(&mut frame, V6).unwrap_err();
        assert!(matches!(err, Error::DemoteNotRepresentable { .. }));
        assert_eq!(frame.adc[0].phase, 1.0);
    }
}

//! The frame object model (C4): `Frame` and its owned channel
//! containers, plus the provenance/event/detector structures
//! supplemented from `examples/original_source/` (SPEC_FULL.md §3.1).
//!
//! Each structure kind here is a single Rust struct (not one per
//! on-disk version — see `crate::version` for how promote/demote is
//! modeled without duplicating every struct per generation) together
//! with `to_payload`/`from_payload` methods mirroring `FrVect`'s.

pub mod adc;
pub mod detector;
pub mod event;
pub mod frame;
pub mod history;
pub mod message;
pub mod proc;
pub mod sim;
pub mod sim_event;
pub mod summary;
pub mod table;

pub use adc::FrAdcData;
pub use detector::FrDetector;
pub use event::FrEvent;
pub use frame::Frame;
pub use history::FrHistory;
pub use message::FrMsg;
pub use proc::FrProcData;
pub use sim::FrSimData;
pub use sim_event::FrSimEvent;
pub use summary::FrSummary;
pub use table::FrTable;

use crate::registry::{FieldDescriptor, StructureEntry};

/// GPS timestamp: integer seconds plus nanoseconds, used throughout the
/// object model (frame start times, event times, message times).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpsTime {
    pub seconds: u32,
    pub nanoseconds: u32,
}

impl GpsTime {
    pub fn new(seconds: u32, nanoseconds: u32) -> Self {
        Self { seconds, nanoseconds }
    }
}

/// Class ids for every registered structure kind, gathered here so the
/// numbering stays in one place instead of scattered across files.
pub const CLASS_ID_FRAME: u16 = 1;
pub const CLASS_ID_ADC: u16 = 3;
pub const CLASS_ID_PROC: u16 = 4;
pub const CLASS_ID_SIM: u16 = 5;
pub const CLASS_ID_EVENT: u16 = 6;
pub const CLASS_ID_SIM_EVENT: u16 = 7;
pub const CLASS_ID_TABLE: u16 = 8;
pub const CLASS_ID_SUMMARY: u16 = 9;
pub const CLASS_ID_HISTORY: u16 = 10;
pub const CLASS_ID_MESSAGE: u16 = 11;
pub const CLASS_ID_DETECTOR: u16 = 12;
pub const CLASS_ID_TOC: u16 = 13;
pub const CLASS_ID_EOF: u16 = 14;

/// Entries the type registry (C1) pre-registers at process start,
/// mirroring the teacher's `FrameRegistry::new()` seeding its default
/// "ECEF" frame.
pub fn builtin_entries() -> Vec<StructureEntry> {
    vec![
        StructureEntry {
            name: frame::NAME,
            version: 8,
            class_id: CLASS_ID_FRAME,
            fields: vec![
                FieldDescriptor::new("run", "INT_4S"),
                FieldDescriptor::new("frame", "INT_4U"),
                FieldDescriptor::new("dataQuality", "INT_4U"),
                FieldDescriptor::new("gtimeS", "INT_4U"),
                FieldDescriptor::new("gtimeN", "INT_4U"),
                FieldDescriptor::new("dt", "REAL_8"),
                FieldDescriptor::new("adc", "*FrAdcData[nAdc]"),
                FieldDescriptor::new("proc", "*FrProcData[nProc]"),
                FieldDescriptor::new("sim", "*FrSimData[nSim]"),
                FieldDescriptor::new("event", "*FrEvent[nEvent]"),
                FieldDescriptor::new("simEvent", "*FrSimEvent[nSimEvent]"),
                FieldDescriptor::new("table", "*FrTable[nTable]"),
                FieldDescriptor::new("summary", "*FrSummary[nSummary]"),
                FieldDescriptor::new("history", "*FrHistory[nHistory]"),
                FieldDescriptor::new("msg", "*FrMsg[nMsg]"),
                FieldDescriptor::new("detector", "PTR_STRUCT(FrDetector)[nDetector]"),
            ],
        },
        StructureEntry {
            name: crate::vect::NAME,
            version: 8,
            class_id: crate::vect::CLASS_ID,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("unitY", "*STRING"),
                FieldDescriptor::new("type", "INT_1U"),
                FieldDescriptor::new("compress", "INT_2U"),
                FieldDescriptor::new("nData", "INT_8U"),
                FieldDescriptor::new("nBytes", "INT_8U"),
                FieldDescriptor::new("dims", "FrVectDim[nDim]"),
                FieldDescriptor::new("data", "BYTE[nBytes]"),
            ],
        },
        StructureEntry {
            name: adc::NAME,
            version: 8,
            class_id: CLASS_ID_ADC,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("comment", "*STRING"),
                FieldDescriptor::new("channelGroup", "INT_4U"),
                FieldDescriptor::new("channelNumber", "INT_4U"),
                FieldDescriptor::new("nBits", "INT_4U"),
                FieldDescriptor::new("bias", "REAL_4"),
                FieldDescriptor::new("slope", "REAL_4"),
                FieldDescriptor::new("unitUser", "*STRING"),
                FieldDescriptor::new("sampleRate", "REAL_8"),
                FieldDescriptor::with_comment("timeOffsetS", "INT_4U", "seconds relative to frame start"),
                FieldDescriptor::with_comment("timeOffsetN", "INT_4U", "nanoseconds relative to frame start"),
                FieldDescriptor::new("fShift", "REAL_8"),
                FieldDescriptor::new("phase", "REAL_4"),
                FieldDescriptor::new("dataValid", "INT_2U"),
                FieldDescriptor::new("data", "*FrVect[nData]"),
                FieldDescriptor::new("aux", "*FrVect[nAux]"),
            ],
        },
        StructureEntry {
            name: proc::NAME,
            version: 8,
            class_id: CLASS_ID_PROC,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("comment", "*STRING"),
                FieldDescriptor::new("type", "INT_2S"),
                FieldDescriptor::new("subType", "INT_2S"),
                FieldDescriptor::new("timeOffsetS", "INT_4U"),
                FieldDescriptor::new("timeOffsetN", "INT_4U"),
                FieldDescriptor::new("tRange", "REAL_8"),
                FieldDescriptor::new("fShift", "REAL_8"),
                FieldDescriptor::new("phase", "REAL_4"),
                FieldDescriptor::new("fRange", "REAL_8"),
                FieldDescriptor::new("bandwidth", "REAL_8"),
                FieldDescriptor::new("data", "*FrVect[nData]"),
                FieldDescriptor::new("aux", "*FrVect[nAux]"),
                FieldDescriptor::new("history", "*FrHistory[nHistory]"),
            ],
        },
        StructureEntry {
            name: sim::NAME,
            version: 8,
            class_id: CLASS_ID_SIM,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("comment", "*STRING"),
                FieldDescriptor::new("sampleRate", "REAL_8"),
                FieldDescriptor::new("timeOffsetS", "INT_4U"),
                FieldDescriptor::new("timeOffsetN", "INT_4U"),
                FieldDescriptor::new("fShift", "REAL_8"),
                FieldDescriptor::new("phase", "REAL_4"),
                FieldDescriptor::new("data", "*FrVect[nData]"),
            ],
        },
        StructureEntry {
            name: event::NAME,
            version: 8,
            class_id: CLASS_ID_EVENT,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("comment", "*STRING"),
                FieldDescriptor::new("inputs", "*STRING"),
                FieldDescriptor::new("gtimeS", "INT_4U"),
                FieldDescriptor::new("gtimeN", "INT_4U"),
                FieldDescriptor::new("timeBefore", "REAL_4"),
                FieldDescriptor::new("timeAfter", "REAL_4"),
                FieldDescriptor::new("eventStatus", "INT_4U"),
                FieldDescriptor::new("amplitude", "REAL_4"),
                FieldDescriptor::new("probability", "REAL_4"),
                FieldDescriptor::new("statistics", "*STRING"),
                FieldDescriptor::new("paramNames", "*STRING[nParam]"),
                FieldDescriptor::new("paramValues", "REAL_8[nParam]"),
                FieldDescriptor::new("data", "*FrVect[nData]"),
            ],
        },
        StructureEntry {
            name: sim_event::NAME,
            version: 8,
            class_id: CLASS_ID_SIM_EVENT,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("comment", "*STRING"),
                FieldDescriptor::new("inputs", "*STRING"),
                FieldDescriptor::new("gtimeS", "INT_4U"),
                FieldDescriptor::new("gtimeN", "INT_4U"),
                FieldDescriptor::new("timeBefore", "REAL_4"),
                FieldDescriptor::new("timeAfter", "REAL_4"),
                FieldDescriptor::new("amplitude", "REAL_4"),
                FieldDescriptor::new("paramNames", "*STRING[nParam]"),
                FieldDescriptor::new("paramValues", "REAL_8[nParam]"),
                FieldDescriptor::new("data", "*FrVect[nData]"),
            ],
        },
        StructureEntry {
            name: table::NAME,
            version: 8,
            class_id: CLASS_ID_TABLE,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("comment", "*STRING"),
                FieldDescriptor::new("nRow", "INT_4U"),
                FieldDescriptor::new("columnNames", "*STRING[nColumn]"),
                FieldDescriptor::new("columns", "*FrVect[nColumn]"),
            ],
        },
        StructureEntry {
            name: summary::NAME,
            version: 8,
            class_id: CLASS_ID_SUMMARY,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("comment", "*STRING"),
                FieldDescriptor::new("test", "*STRING"),
                FieldDescriptor::new("moments", "*FrVect[nMoment]"),
            ],
        },
        StructureEntry {
            name: history::NAME,
            version: 8,
            class_id: CLASS_ID_HISTORY,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("time", "INT_4U"),
                FieldDescriptor::new("comment", "*STRING"),
            ],
        },
        StructureEntry {
            name: message::NAME,
            version: 8,
            class_id: CLASS_ID_MESSAGE,
            fields: vec![
                FieldDescriptor::new("alarm", "*STRING"),
                FieldDescriptor::new("message", "*STRING"),
                FieldDescriptor::new("severity", "INT_4S"),
                FieldDescriptor::new("gtimeS", "INT_4U"),
                FieldDescriptor::new("gtimeN", "INT_4U"),
            ],
        },
        StructureEntry {
            name: detector::NAME,
            version: 8,
            class_id: CLASS_ID_DETECTOR,
            fields: vec![
                FieldDescriptor::new("name", "*STRING"),
                FieldDescriptor::new("prefix", "CHAR[2]"),
                FieldDescriptor::new("latitude", "REAL_8"),
                FieldDescriptor::new("longitude", "REAL_8"),
                FieldDescriptor::new("elevation", "REAL_4"),
                FieldDescriptor::new("armXazimuth", "REAL_4"),
                FieldDescriptor::new("armYazimuth", "REAL_4"),
                FieldDescriptor::new("armXaltitude", "REAL_4"),
                FieldDescriptor::new("armYaltitude", "REAL_4"),
                FieldDescriptor::new("armXmidpoint", "REAL_4"),
                FieldDescriptor::new("armYmidpoint", "REAL_4"),
                FieldDescriptor::new("localTime", "INT_4S"),
                FieldDescriptor::new("calibration", "REAL_8[6]"),
            ],
        },
        StructureEntry {
            name: crate::toc::NAME,
            version: 8,
            class_id: CLASS_ID_TOC,
            fields: vec![
                FieldDescriptor::new("nFrame", "INT_8U"),
                FieldDescriptor::new("dataQuality", "INT_4U[nFrame]"),
                FieldDescriptor::new("positionH", "INT_8U[nFrame]"),
                FieldDescriptor::with_comment("channelDirectory", "*STRING[nChannel]", "name + kind + byte offset into the trailing offset-array blob"),
            ],
        },
        StructureEntry {
            name: crate::framefile::EOF_NAME,
            version: 8,
            class_id: CLASS_ID_EOF,
            fields: vec![
                FieldDescriptor::new("nFrames", "INT_8U"),
                FieldDescriptor::new("nBytes", "INT_8U"),
                FieldDescriptor::new("seekTOC", "INT_8U"),
                FieldDescriptor::new("chkSumFrHeader", "INT_4U"),
                FieldDescriptor::with_comment("chkSum", "INT_4U", "CRC of this record excluding chkSum and chkSumFile"),
                FieldDescriptor::with_comment("chkSumFile", "INT_4U", "running CRC over the file through the byte before this field"),
            ],
        },
    ]
}

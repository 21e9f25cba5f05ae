//! # igwd-frame
//!
//! Reader/writer for the IGWD Frame file format: the self-describing,
//! length-prefixed, checksummed binary container used by
//! gravitational-wave observatories (LIGO/Virgo `framecpp`) to store
//! time-series channels, events, and provenance.
//!
//! ## Key pieces
//!
//! - **Type registry** ([`registry`]): process-wide, read-only-after-init
//!   map from structure name to its field layout and class id.
//! - **Binary stream** ([`stream`]): length-prefixed, checksummed record
//!   I/O with pointer/reference resolution.
//! - **Vector codec** ([`vect`]): the `FrVect` typed array container and
//!   its compression family (raw, gzip, differential, zero suppress).
//! - **Structures** ([`structures`]): the frame object model — `Frame`,
//!   `FrAdcData`, `FrProcData`, and friends.
//! - **Table of contents** ([`toc`]): the tail-resident index enabling
//!   random access without a full linear scan.
//! - **Frame file driver** ([`framefile`]): ties the above together into
//!   `FrameFile::open_read`/`open_write`.
//!
//! ## Example
//!
//! ```rust
//! use igwd_frame::vect::{Algorithm, CompressionRequest, Dimension, ElementType, FrVect};
//!
//! let samples: Vec<i32> = (0..16).collect();
//! let mut bytes = Vec::new();
//! for s in &samples {
//!     bytes.extend_from_slice(&s.to_ne_bytes());
//! }
//! let mut vect = FrVect::from_raw(
//!     "H1:TEST-CHANNEL",
//!     "counts",
//!     ElementType::Int4S,
//!     samples.len() as u64,
//!     vec![Dimension::new(samples.len() as u64, 1.0, 0.0, "s")],
//!     bytes.clone(),
//! )
//! .unwrap();
//!
//! vect.compress(CompressionRequest::Concrete(Algorithm::DiffGzip), 6).unwrap();
//! assert_eq!(vect.expand().unwrap(), bytes);
//! ```

pub mod error;
pub mod framefile;
pub mod header;
pub mod registry;
pub mod stream;
pub mod structures;
pub mod toc;
pub mod vect;
pub mod version;

pub use crate::error::{Error, Result};
pub use crate::framefile::{FrameFile, WriterOptions};
pub use crate::structures::Frame;
pub use crate::vect::FrVect;

/// Library version, as reported by Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
        assert!(VERSION.chars().any(|c| c.is_ascii_digit()));
    }
}

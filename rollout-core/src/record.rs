//! Types and traits for recording diagnostics.
//!
//! A [`Record`] is a flexible container of key-value pairs. Environments return
//! one alongside every step as auxiliary information, wrappers rewrite it, and
//! [`Recorder`]s send it somewhere (TensorBoard, a buffer, nowhere).
//!
//! # Basic Usage
//!
//! ```rust
//! use rollout_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("diagnostics/fps", RecordValue::Scalar(60.0));
//! record.insert("stats.gauges.diagnostics.lag.action", RecordValue::Array1(vec![0.1, 0.3]));
//!
//! assert_eq!(record.get_scalar("diagnostics/fps").unwrap(), 60.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;

//! Types and traits for recording training statistics.
//!
//! The [`Trainer`](crate::Trainer) writes one [`Record`] per finished trial
//! to its [`Recorder`]. A record holds the fields of [`Stats`](crate::Stats)
//! as scalars plus a timestamp.
//!
//! ```rust
//! use qtab_core::record::{Record, RecordValue};
//!
//! let record = Record::from_slice(&[
//!     ("steps_per_trial", RecordValue::Scalar(12.0)),
//!     ("rewards_per_trial", RecordValue::Scalar(-40.0)),
//! ]);
//! assert_eq!(record.get_scalar("steps_per_trial").unwrap(), 12.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;

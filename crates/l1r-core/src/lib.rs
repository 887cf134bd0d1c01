//! # l1r-core
//!
//! Shared data types and error handling for the L1Rate workspace.
//!
//! One event's worth of trigger objects ([`Event`]) is the unit of work:
//! per-category candidate arrays, the heterogeneous energy-sum
//! collection, and the pileup count used as the auxiliary histogram
//! axis.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Candidate, Event, SumEntry, SumKind};

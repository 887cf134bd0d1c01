//! # l1r-rates
//!
//! Rate-histogram accumulation engine for L1 trigger objects.
//!
//! For each event the engine selects the leading candidates per
//! category, applies region and isolation gating, extracts the global
//! energy sums, and performs a cumulative-threshold fill into 2D
//! (threshold × pileup) histograms. After the event loop the set is
//! normalized once to a rate in Hz.
//!
//! ## Example
//!
//! ```
//! use l1r_core::{Candidate, Event};
//! use l1r_rates::{RateConfig, RateEngine};
//!
//! let mut engine = RateEngine::run3(RateConfig::default()).unwrap();
//! engine.process_event(&Event {
//!     pileup: 42,
//!     jets: vec![Candidate::new(120.0, -1.7)],
//!     ..Event::default()
//! });
//! let report = engine.finalize().unwrap();
//! assert!(report.rates["singleJetRates"].entries > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accumulate;
pub mod engine;
pub mod histogram;
pub mod menu;
pub mod region;
pub mod selector;
pub mod source;
pub mod sums;

pub use l1r_core::error;

pub use accumulate::{fill_cumulative, fill_value};
pub use engine::{fill_events_parallel, RateConfig, RateEngine, RateReport};
pub use histogram::{Binning, Hist2d, N_PILEUP_BINS};
pub use menu::{ObjectCategory, ObjectFillSpec, RateMenu, SumFillSpec};
pub use region::{gate_slots, in_endcap, GatePolicy};
pub use selector::{select_leading, IsolationCut, RankedObject};
pub use source::{EventSource, MemorySource};
pub use sums::{extract_sums, EventSums};

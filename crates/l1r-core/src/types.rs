//! Event-level input types for the rate engine

use serde::{Deserialize, Serialize};

/// One reconstructed trigger object (jet, e/gamma or tau) within an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Transverse energy in GeV.
    pub et: f64,

    /// Pseudorapidity.
    pub eta: f64,

    /// Isolation flag as stored in the ntuple (0 = fails, >=1 = passes;
    /// the exact predicate is category-specific).
    #[serde(default)]
    pub iso: i32,

    /// Bunch-crossing index; 0 is the triggering crossing.
    #[serde(default)]
    pub bx: i32,
}

impl Candidate {
    /// Candidate at the central bunch crossing with no isolation flag.
    pub fn new(et: f64, eta: f64) -> Self {
        Self { et, eta, iso: 0, bx: 0 }
    }
}

/// Kind tag of one entry in an event's energy-sum collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SumKind {
    /// Total transverse energy.
    TotalEt,
    /// Total hadronic transverse energy.
    TotalHt,
    /// Missing transverse energy.
    MissingEt,
    /// Missing transverse energy including the forward calorimeter.
    MissingEtHF,
    /// Missing hadronic transverse energy.
    MissingHt,
}

impl SumKind {
    /// All recognized kinds, in menu order.
    pub const ALL: [SumKind; 5] = [
        SumKind::TotalEt,
        SumKind::TotalHt,
        SumKind::MissingEt,
        SumKind::MissingEtHF,
        SumKind::MissingHt,
    ];
}

/// One entry of an event's heterogeneous sums collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumEntry {
    /// Which global quantity this entry carries.
    pub kind: SumKind,

    /// Bunch-crossing index; only 0 is considered.
    #[serde(default)]
    pub bx: i32,

    /// The scalar value in GeV.
    pub et: f64,
}

/// One event as supplied by the external event source.
///
/// Candidate arrays may be empty; missing ranks surface as absent slots
/// downstream, never as undefined values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    /// Pileup count (reconstructed vertices); auxiliary histogram axis.
    pub pileup: i32,

    /// Jet candidates.
    #[serde(default)]
    pub jets: Vec<Candidate>,

    /// e/gamma candidates.
    #[serde(default)]
    pub egs: Vec<Candidate>,

    /// Tau candidates.
    #[serde(default)]
    pub taus: Vec<Candidate>,

    /// Energy-sum entries.
    #[serde(default)]
    pub sums: Vec<SumEntry>,
}

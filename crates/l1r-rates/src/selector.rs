//! Ranked leading-object selection.
//!
//! Ntuple candidate arrays are not guaranteed to be energy-ordered, so
//! ranking is done with an explicit size-k insertion buffer. Ties keep
//! the earlier-encountered candidate in the higher rank (comparisons
//! are strictly greater, never greater-or-equal).

use l1r_core::Candidate;
use serde::{Deserialize, Serialize};

/// Isolation requirement applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsolationCut {
    /// No isolation requirement.
    Ignore,
    /// Require `iso == 1` (e/gamma isolation flag).
    Flagged,
    /// Require `iso > 0` (tau isolation word).
    Positive,
}

impl IsolationCut {
    fn passes(self, c: &Candidate) -> bool {
        match self {
            IsolationCut::Ignore => true,
            IsolationCut::Flagged => c.iso == 1,
            IsolationCut::Positive => c.iso > 0,
        }
    }
}

/// One ranked candidate: what survives of a [`Candidate`] after selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedObject {
    /// Transverse energy in GeV.
    pub et: f64,
    /// Pseudorapidity.
    pub eta: f64,
}

/// Select the `k` leading candidates by descending transverse energy.
///
/// Returns exactly `k` slots; slot `i` is rank `i + 1` and is `None`
/// when fewer than `i + 1` qualifying candidates exist. Candidates off
/// the central bunch crossing or failing the isolation cut are skipped
/// entirely. Empty input yields all-`None` output.
pub fn select_leading(
    candidates: &[Candidate],
    k: usize,
    iso: IsolationCut,
) -> Vec<Option<RankedObject>> {
    let mut slots: Vec<Option<RankedObject>> = vec![None; k];

    // Absent slots compare as the below-range sentinel, so a candidate
    // with et <= -1.0 is never ranked.
    let slot_et = |s: &Option<RankedObject>| s.map_or(-1.0, |r| r.et);

    for c in candidates {
        if c.bx != 0 || !iso.passes(c) {
            continue;
        }
        for i in 0..k {
            if c.et > slot_et(&slots[i]) {
                for j in (i + 1..k).rev() {
                    slots[j] = slots[j - 1];
                }
                slots[i] = Some(RankedObject { et: c.et, eta: c.eta });
                break;
            }
        }
    }

    slots
}

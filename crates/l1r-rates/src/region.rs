//! Detector-region classification and the gate policies that restrict
//! which ranked candidates count for a histogram variant.

use serde::{Deserialize, Serialize};

use crate::selector::RankedObject;

/// Lower edge of the endcap window in |eta|.
pub const ENDCAP_ETA_MIN: f64 = 1.392;
/// Upper edge (exclusive) of the endcap window in |eta|.
pub const ENDCAP_ETA_MAX: f64 = 3.0;

/// Whether a pseudorapidity falls in the endcap transition window,
/// `1.392 <= |eta| < 3.0`. The half-open interval is physical (detector
/// barrel/endcap boundary) and must not be widened or narrowed.
pub fn in_endcap(eta: f64) -> bool {
    let a = eta.abs();
    (ENDCAP_ETA_MIN..ENDCAP_ETA_MAX).contains(&a)
}

/// Region-gating policy for one histogram variant.
///
/// The per-category asymmetry is intentional and mirrors the trigger
/// menu: jets use the multi-candidate policies, e/gamma and tau use the
/// per-rank one. Keep them distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatePolicy {
    /// No region requirement; every present rank is filled.
    Ungated,
    /// Rank n counts iff ranks 1..=n are all present and all in region.
    /// One failing rank blanks every later rank.
    AllInRegion,
    /// One boolean for the whole event: any selected rank in region.
    /// When false, no rank counts; when true, all present ranks count.
    AnyInRegion,
    /// One boolean for the whole event: leading rank in region.
    LeadInRegion,
    /// Rank n counts iff rank n itself is in region.
    EachInRegion,
}

/// Apply a gate policy to ranked slots, yielding the per-rank energy
/// that feeds the cumulative fill (`None` = excluded this event).
pub fn gate_slots(slots: &[Option<RankedObject>], policy: GatePolicy) -> Vec<Option<f64>> {
    let slot_in_region = |s: &Option<RankedObject>| s.is_some_and(|r| in_endcap(r.eta));

    match policy {
        GatePolicy::Ungated => slots.iter().map(|s| s.map(|r| r.et)).collect(),
        GatePolicy::AllInRegion => {
            let mut chain_ok = true;
            slots
                .iter()
                .map(|s| {
                    chain_ok = chain_ok && slot_in_region(s);
                    if chain_ok {
                        s.map(|r| r.et)
                    } else {
                        None
                    }
                })
                .collect()
        }
        GatePolicy::AnyInRegion => {
            let any = slots.iter().any(|s| slot_in_region(s));
            slots.iter().map(|s| if any { s.map(|r| r.et) } else { None }).collect()
        }
        GatePolicy::LeadInRegion => {
            let lead = slots.first().map(|s| slot_in_region(s)).unwrap_or(false);
            slots.iter().map(|s| if lead { s.map(|r| r.et) } else { None }).collect()
        }
        GatePolicy::EachInRegion => {
            slots.iter().map(|s| s.filter(|r| in_endcap(r.eta)).map(|r| r.et)).collect()
        }
    }
}

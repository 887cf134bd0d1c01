//! Extraction of the per-event global energy sums.

use l1r_core::{SumEntry, SumKind};

/// Global-sum values extracted from one event, central bunch crossing
/// only. `None` means the kind was absent this event; the `-1.0`
/// sentinel is applied only at the fill boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventSums {
    /// Total transverse energy.
    pub total_et: Option<f64>,
    /// Total hadronic transverse energy.
    pub total_ht: Option<f64>,
    /// Missing transverse energy.
    pub missing_et: Option<f64>,
    /// Missing transverse energy including the forward calorimeter.
    pub missing_et_hf: Option<f64>,
    /// Missing hadronic transverse energy.
    pub missing_ht: Option<f64>,
}

impl EventSums {
    /// Value for one sum kind.
    pub fn get(&self, kind: SumKind) -> Option<f64> {
        match kind {
            SumKind::TotalEt => self.total_et,
            SumKind::TotalHt => self.total_ht,
            SumKind::MissingEt => self.missing_et,
            SumKind::MissingEtHF => self.missing_et_hf,
            SumKind::MissingHt => self.missing_ht,
        }
    }
}

/// Scan an event's sums collection and extract each recognized kind.
///
/// Only `bx == 0` entries are considered, and a later entry of the same
/// kind overwrites an earlier one (sequential scan, last match wins).
pub fn extract_sums(entries: &[SumEntry]) -> EventSums {
    let mut out = EventSums::default();
    for e in entries {
        if e.bx != 0 {
            continue;
        }
        match e.kind {
            SumKind::TotalEt => out.total_et = Some(e.et),
            SumKind::TotalHt => out.total_ht = Some(e.et),
            SumKind::MissingEt => out.missing_et = Some(e.et),
            SumKind::MissingEtHF => out.missing_et_hf = Some(e.et),
            SumKind::MissingHt => out.missing_ht = Some(e.et),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: SumKind, bx: i32, et: f64) -> SumEntry {
        SumEntry { kind, bx, et }
    }

    #[test]
    fn absent_kinds_are_none() {
        let sums = extract_sums(&[entry(SumKind::TotalEt, 0, 123.0)]);
        assert_eq!(sums.total_et, Some(123.0));
        assert_eq!(sums.missing_et, None);
        assert_eq!(sums.get(SumKind::MissingHt), None);
    }

    #[test]
    fn off_crossing_entries_ignored() {
        let sums = extract_sums(&[
            entry(SumKind::MissingEt, -1, 99.0),
            entry(SumKind::MissingEt, 2, 77.0),
        ]);
        assert_eq!(sums.missing_et, None);
    }

    #[test]
    fn last_central_entry_wins() {
        let sums = extract_sums(&[
            entry(SumKind::MissingEt, 0, 10.0),
            entry(SumKind::TotalHt, 0, 400.0),
            entry(SumKind::MissingEt, 0, 20.0),
        ]);
        assert_eq!(sums.missing_et, Some(20.0));
        assert_eq!(sums.total_ht, Some(400.0));
    }
}

//! The declarative fill table: which histograms exist, how they are
//! binned, and which (category, rank, isolation, gate) tuple feeds each.
//!
//! The reference analysis spells every fill out longhand; here one
//! generic fill routine walks this table instead.

use l1r_core::SumKind;
use serde::{Deserialize, Serialize};

use crate::histogram::Binning;
use crate::region::GatePolicy;
use crate::selector::IsolationCut;

/// Trigger-object category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectCategory {
    /// Calorimeter jets.
    Jet,
    /// e/gamma candidates.
    Eg,
    /// Hadronic taus.
    Tau,
}

impl ObjectCategory {
    /// How many ranks are selected for this category.
    pub fn depth(self) -> usize {
        match self {
            ObjectCategory::Jet => 4,
            ObjectCategory::Eg | ObjectCategory::Tau => 2,
        }
    }
}

/// One rate histogram fed from ranked trigger objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectFillSpec {
    /// Histogram key, e.g. `doubleJetRatesHEall`.
    pub key: String,
    /// Candidate category.
    pub category: ObjectCategory,
    /// 1-based rank whose energy is tested against the thresholds.
    pub rank: usize,
    /// Isolation requirement applied during selection.
    pub iso: IsolationCut,
    /// Region gate applied to the ranked slots.
    pub gate: GatePolicy,
    /// Threshold-axis binning.
    pub binning: Binning,
}

/// One histogram fed from an extracted global sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SumFillSpec {
    /// Histogram key, e.g. `htSumRates` or `htSum`.
    pub key: String,
    /// Which global sum feeds it.
    pub kind: SumKind,
    /// Threshold- (or value-) axis binning.
    pub binning: Binning,
    /// Cumulative rate fill if true, plain value distribution if false.
    pub cumulative: bool,
}

/// Jet threshold binning, GeV.
pub const JET_BINNING: Binning = Binning::new(400, 0.0, 400.0);
/// e/gamma threshold binning, GeV.
pub const EG_BINNING: Binning = Binning::new(300, 0.0, 300.0);
/// Tau threshold binning, GeV.
pub const TAU_BINNING: Binning = Binning::new(300, 0.0, 300.0);
/// Total-HT binning, GeV.
pub const HT_SUM_BINNING: Binning = Binning::new(1000, 0.0, 1000.0);
/// Missing-HT binning, GeV.
pub const MHT_SUM_BINNING: Binning = Binning::new(300, 0.0, 300.0);
/// Total-ET binning, GeV.
pub const ET_SUM_BINNING: Binning = Binning::new(1000, 0.0, 1000.0);
/// MET binning, GeV.
pub const MET_SUM_BINNING: Binning = Binning::new(300, 0.0, 300.0);
/// MET-HF binning, GeV.
pub const MET_HF_SUM_BINNING: Binning = Binning::new(300, 0.0, 300.0);

const RANK_NAMES: [&str; 4] = ["single", "double", "triple", "quad"];

/// The full set of histograms one engine run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateMenu {
    /// Object-driven rate histograms.
    pub object_fills: Vec<ObjectFillSpec>,
    /// Sum-driven histograms (rates and distributions).
    pub sum_fills: Vec<SumFillSpec>,
}

impl RateMenu {
    /// The Run-3 menu: every histogram of the reference analysis.
    pub fn run3() -> Self {
        let mut object_fills = Vec::new();

        // Jets: four ranks, four region variants, no isolation menu.
        let jet_gates = [
            (GatePolicy::Ungated, ""),
            (GatePolicy::AllInRegion, "HEall"),
            (GatePolicy::AnyInRegion, "HEtag"),
            (GatePolicy::LeadInRegion, "HEtagLead"),
        ];
        for (gate, gate_tag) in jet_gates {
            for rank in 1..=ObjectCategory::Jet.depth() {
                object_fills.push(ObjectFillSpec {
                    key: format!("{}JetRates{gate_tag}", RANK_NAMES[rank - 1]),
                    category: ObjectCategory::Jet,
                    rank,
                    iso: IsolationCut::Ignore,
                    gate,
                    binning: JET_BINNING,
                });
            }
        }

        // EG and tau: two ranks, isolated and non-isolated, with the
        // per-rank region variant.
        let lepton_gates = [(GatePolicy::Ungated, ""), (GatePolicy::EachInRegion, "HEall")];
        let lepton_menus = [
            (ObjectCategory::Eg, "Eg", EG_BINNING, IsolationCut::Flagged),
            (ObjectCategory::Tau, "Tau", TAU_BINNING, IsolationCut::Positive),
        ];
        for (category, cat_tag, binning, iso_cut) in lepton_menus {
            for (gate, gate_tag) in lepton_gates {
                for (iso, iso_tag) in [(IsolationCut::Ignore, ""), (iso_cut, "ISO")] {
                    for rank in 1..=category.depth() {
                        object_fills.push(ObjectFillSpec {
                            key: format!(
                                "{}{iso_tag}{cat_tag}Rates{gate_tag}",
                                RANK_NAMES[rank - 1]
                            ),
                            category,
                            rank,
                            iso,
                            gate,
                            binning,
                        });
                    }
                }
            }
        }

        let sum_menu = [
            ("htSum", SumKind::TotalHt, HT_SUM_BINNING),
            ("mhtSum", SumKind::MissingHt, MHT_SUM_BINNING),
            ("etSum", SumKind::TotalEt, ET_SUM_BINNING),
            ("metSum", SumKind::MissingEt, MET_SUM_BINNING),
            ("metHFSum", SumKind::MissingEtHF, MET_HF_SUM_BINNING),
        ];
        let mut sum_fills = Vec::new();
        for (name, kind, binning) in sum_menu {
            sum_fills.push(SumFillSpec {
                key: format!("{name}Rates"),
                kind,
                binning,
                cumulative: true,
            });
            sum_fills.push(SumFillSpec { key: name.to_string(), kind, binning, cumulative: false });
        }

        Self { object_fills, sum_fills }
    }

    /// The distinct (category, isolation) selections the menu needs.
    pub fn selections(&self) -> Vec<(ObjectCategory, IsolationCut)> {
        let mut out: Vec<(ObjectCategory, IsolationCut)> = Vec::new();
        for f in &self.object_fills {
            if !out.contains(&(f.category, f.iso)) {
                out.push((f.category, f.iso));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run3_menu_shape() {
        let menu = RateMenu::run3();
        // 16 jet + 8 EG + 8 tau rate histograms.
        assert_eq!(menu.object_fills.len(), 32);
        // 5 sum rates + 5 sum distributions.
        assert_eq!(menu.sum_fills.len(), 10);
        assert_eq!(menu.sum_fills.iter().filter(|s| s.cumulative).count(), 5);
    }

    #[test]
    fn run3_keys_unique() {
        let menu = RateMenu::run3();
        let mut keys: Vec<&str> = menu
            .object_fills
            .iter()
            .map(|f| f.key.as_str())
            .chain(menu.sum_fills.iter().map(|s| s.key.as_str()))
            .collect();
        let n = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), n);
    }

    #[test]
    fn run3_reference_keys_present() {
        let menu = RateMenu::run3();
        for key in [
            "singleJetRates",
            "quadJetRatesHEtagLead",
            "doubleJetRatesHEtag",
            "tripleJetRatesHEall",
            "singleISOEgRates",
            "doubleISOTauRatesHEall",
            "singleTauRates",
            "htSumRates",
            "metHFSum",
        ] {
            assert!(
                menu.object_fills.iter().any(|f| f.key == key)
                    || menu.sum_fills.iter().any(|s| s.key == key),
                "missing key {key}"
            );
        }
    }

    #[test]
    fn selections_deduplicated() {
        let menu = RateMenu::run3();
        let sel = menu.selections();
        assert_eq!(sel.len(), 5);
        assert!(sel.contains(&(ObjectCategory::Jet, IsolationCut::Ignore)));
        assert!(sel.contains(&(ObjectCategory::Eg, IsolationCut::Flagged)));
        assert!(sel.contains(&(ObjectCategory::Tau, IsolationCut::Positive)));
    }
}

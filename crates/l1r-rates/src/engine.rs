//! The rate engine: per-event orchestration of selection, region
//! gating, sum extraction and the cumulative fills, plus the one-shot
//! normalization at the end of the run.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use l1r_core::{Candidate, Event};

use crate::accumulate::{fill_cumulative, fill_value};
use crate::error::{Error, Result};
use crate::histogram::Hist2d;
use crate::menu::{ObjectCategory, RateMenu};
use crate::region::gate_slots;
use crate::selector::{select_leading, IsolationCut};
use crate::source::EventSource;
use crate::sums::extract_sums;

/// Absent values reduce to this at the fill boundary, below every axis.
const SENTINEL: f64 = -1.0;

/// Run configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateConfig {
    /// Instantaneous luminosity, Hz/cm^2.
    pub inst_lumi: f64,
    /// Minimum-bias cross section, cm^2.
    pub mb_xsec: f64,
    /// Optional hard cap on processed events.
    pub max_events: Option<u64>,
}

impl Default for RateConfig {
    fn default() -> Self {
        // Run-3 LHC parameters.
        Self { inst_lumi: 2e34, mb_xsec: 6.92e-26, max_events: None }
    }
}

/// The finished, normalized output of one engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateReport {
    /// Normalization constant applied to every rate histogram.
    pub normalization: f64,
    /// Number of events that contributed fills.
    pub processed_events: u64,
    /// Rate histograms by menu key, scaled to Hz.
    pub rates: BTreeMap<String, Hist2d>,
    /// Unscaled value-distribution histograms by menu key.
    pub distributions: BTreeMap<String, Hist2d>,
}

/// Accumulates the full histogram set over an event loop.
///
/// Lifecycle: construct (histograms booked empty), feed events via
/// [`process_event`](Self::process_event) or [`run`](Self::run), then
/// [`finalize`](Self::finalize). Finalization consumes the engine, so
/// the normalization constant cannot be applied twice.
pub struct RateEngine {
    menu: RateMenu,
    config: RateConfig,
    /// Distinct (category, isolation) selections the menu requires.
    selections: Vec<(ObjectCategory, IsolationCut)>,
    /// Index into `selections` for each object fill.
    selection_index: Vec<usize>,
    /// One histogram per `menu.object_fills` entry, same order.
    object_hists: Vec<Hist2d>,
    /// One histogram per `menu.sum_fills` entry, same order.
    sum_hists: Vec<Hist2d>,
    processed: u64,
}

impl RateEngine {
    /// Book the histogram set for a menu.
    pub fn new(menu: RateMenu, config: RateConfig) -> Result<Self> {
        if !(config.inst_lumi > 0.0) || !(config.mb_xsec > 0.0) {
            return Err(Error::Config(format!(
                "normalization parameters must be positive (inst_lumi={}, mb_xsec={})",
                config.inst_lumi, config.mb_xsec
            )));
        }

        let mut seen: Vec<&str> = Vec::new();
        for key in menu
            .object_fills
            .iter()
            .map(|f| f.key.as_str())
            .chain(menu.sum_fills.iter().map(|s| s.key.as_str()))
        {
            if seen.contains(&key) {
                return Err(Error::Config(format!("duplicate histogram key '{key}'")));
            }
            seen.push(key);
        }

        for f in &menu.object_fills {
            if f.rank == 0 || f.rank > f.category.depth() {
                return Err(Error::Config(format!(
                    "rank {} out of range for '{}' (depth {})",
                    f.rank,
                    f.key,
                    f.category.depth()
                )));
            }
        }

        let selections = menu.selections();
        let selection_index = menu
            .object_fills
            .iter()
            .map(|f| {
                selections
                    .iter()
                    .position(|&s| s == (f.category, f.iso))
                    .expect("selections cover every fill")
            })
            .collect();

        let object_hists = menu
            .object_fills
            .iter()
            .map(|f| Hist2d::new(f.key.clone(), f.binning))
            .collect::<Result<Vec<_>>>()?;
        let sum_hists = menu
            .sum_fills
            .iter()
            .map(|s| Hist2d::new(s.key.clone(), s.binning))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { menu, config, selections, selection_index, object_hists, sum_hists, processed: 0 })
    }

    /// Engine over the full Run-3 menu with default parameters.
    pub fn run3(config: RateConfig) -> Result<Self> {
        Self::new(RateMenu::run3(), config)
    }

    /// Events processed so far.
    pub fn processed_events(&self) -> u64 {
        self.processed
    }

    fn candidates<'a>(ev: &'a Event, category: ObjectCategory) -> &'a [Candidate] {
        match category {
            ObjectCategory::Jet => &ev.jets,
            ObjectCategory::Eg => &ev.egs,
            ObjectCategory::Tau => &ev.taus,
        }
    }

    /// Fill every histogram for one event.
    ///
    /// Returns `false` without touching any histogram when the event
    /// cap has been reached (the cap is all-or-nothing per event).
    pub fn process_event(&mut self, ev: &Event) -> bool {
        if let Some(cap) = self.config.max_events {
            if self.processed >= cap {
                return false;
            }
        }
        self.processed += 1;

        let ranked: Vec<_> = self
            .selections
            .iter()
            .map(|&(category, iso)| {
                select_leading(Self::candidates(ev, category), category.depth(), iso)
            })
            .collect();

        for (i, fill) in self.menu.object_fills.iter().enumerate() {
            let gated = gate_slots(&ranked[self.selection_index[i]], fill.gate);
            fill_cumulative(&mut self.object_hists[i], gated[fill.rank - 1], ev.pileup);
        }

        let sums = extract_sums(&ev.sums);
        for (i, fill) in self.menu.sum_fills.iter().enumerate() {
            let value = sums.get(fill.kind);
            if fill.cumulative {
                fill_cumulative(&mut self.sum_hists[i], value, ev.pileup);
            } else {
                fill_value(&mut self.sum_hists[i], value.unwrap_or(SENTINEL), ev.pileup);
            }
        }

        true
    }

    /// Drain an event source, logging progress. Stops early only at the
    /// configured event cap. Returns the number of events processed.
    pub fn run(&mut self, source: &mut dyn EventSource) -> Result<u64> {
        while let Some(ev) = source.next_event()? {
            if !self.process_event(&ev) {
                tracing::info!(cap = self.processed, "event cap reached, stopping");
                break;
            }
            if self.processed % 10_000 == 0 {
                tracing::debug!(events = self.processed, "processed");
            }
        }
        Ok(self.processed)
    }

    /// Fold another engine's accumulated contents into this one.
    ///
    /// Both engines must have been booked from the same menu.
    pub fn merge(&mut self, other: RateEngine) {
        debug_assert_eq!(self.object_hists.len(), other.object_hists.len());
        debug_assert_eq!(self.sum_hists.len(), other.sum_hists.len());
        for (a, b) in self.object_hists.iter_mut().zip(&other.object_hists) {
            a.merge(b);
        }
        for (a, b) in self.sum_hists.iter_mut().zip(&other.sum_hists) {
            a.merge(b);
        }
        self.processed += other.processed;
    }

    /// Normalize and hand the histogram set over.
    ///
    /// Rate histograms are scaled by
    /// `inst_lumi * mb_xsec / processed_events`, exactly once; the
    /// value-distribution histograms are left as raw counts. Zero
    /// processed events is a fatal precondition, never a NaN.
    pub fn finalize(mut self) -> Result<RateReport> {
        if self.processed == 0 {
            return Err(Error::Normalization(
                "no events processed, normalization constant undefined".into(),
            ));
        }
        let norm = self.config.inst_lumi * self.config.mb_xsec / self.processed as f64;

        let mut rates = BTreeMap::new();
        for hist in &mut self.object_hists {
            hist.scale(norm);
        }
        for (hist, fill) in self.sum_hists.iter_mut().zip(&self.menu.sum_fills) {
            if fill.cumulative {
                hist.scale(norm);
            }
        }

        for hist in self.object_hists {
            rates.insert(hist.name.clone(), hist);
        }
        let mut distributions = BTreeMap::new();
        for (hist, fill) in self.sum_hists.into_iter().zip(&self.menu.sum_fills) {
            if fill.cumulative {
                rates.insert(hist.name.clone(), hist);
            } else {
                distributions.insert(hist.name.clone(), hist);
            }
        }

        tracing::info!(
            events = self.processed,
            norm,
            histograms = rates.len() + distributions.len(),
            "run finalized"
        );

        Ok(RateReport {
            normalization: norm,
            processed_events: self.processed,
            rates,
            distributions,
        })
    }
}

/// Fill one engine from a slice of events in parallel.
///
/// Events are partitioned across threads, each partition fills a fresh
/// histogram set, and partitions are merged bin-wise; fills are pure
/// counting increments, so the result is identical to the sequential
/// loop regardless of partitioning. The event cap truncates the input
/// up front.
pub fn fill_events_parallel(
    menu: &RateMenu,
    config: &RateConfig,
    events: &[Event],
) -> Result<RateEngine> {
    let events = match config.max_events {
        Some(cap) => &events[..events.len().min(cap as usize)],
        None => events,
    };
    let part_config = RateConfig { max_events: None, ..*config };

    let merged = events
        .par_chunks(8192)
        .map(|chunk| {
            let mut engine = RateEngine::new(menu.clone(), part_config)?;
            for ev in chunk {
                engine.process_event(ev);
            }
            Ok(engine)
        })
        .try_reduce_with(|mut a, b| {
            a.merge(b);
            Ok(a)
        });

    match merged {
        Some(result) => result,
        None => RateEngine::new(menu.clone(), part_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l1r_core::{SumEntry, SumKind};

    fn jet_event(ets: &[f64], pileup: i32) -> Event {
        Event {
            pileup,
            jets: ets.iter().map(|&et| Candidate::new(et, 0.5)).collect(),
            ..Event::default()
        }
    }

    #[test]
    fn empty_category_contributes_nothing() {
        let mut engine = RateEngine::run3(RateConfig::default()).unwrap();
        engine.process_event(&Event { pileup: 10, ..Event::default() });
        let report = engine.finalize().unwrap();
        for (key, hist) in &report.rates {
            assert_eq!(hist.entries, 0, "{key} filled from an empty event");
        }
        // The sum distributions see the sentinel (under range).
        for hist in report.distributions.values() {
            assert_eq!(hist.under, 1);
        }
    }

    #[test]
    fn cap_is_all_or_nothing_per_event() {
        let config = RateConfig { max_events: Some(2), ..RateConfig::default() };
        let mut engine = RateEngine::run3(config).unwrap();
        assert!(engine.process_event(&jet_event(&[50.0], 10)));
        assert!(engine.process_event(&jet_event(&[50.0], 10)));
        assert!(!engine.process_event(&jet_event(&[900.0], 10)));
        assert_eq!(engine.processed_events(), 2);

        let report = engine.finalize().unwrap();
        let single = &report.rates["singleJetRates"];
        // Two fills at 50 GeV, none from the rejected third event.
        assert_eq!(single.entries, 2 * 51);
    }

    #[test]
    fn finalize_without_events_is_fatal() {
        let engine = RateEngine::run3(RateConfig::default()).unwrap();
        let err = engine.finalize().unwrap_err();
        assert!(matches!(err, Error::Normalization(_)));
    }

    #[test]
    fn normalization_matches_hand_computation() {
        let config = RateConfig { inst_lumi: 1e3, mb_xsec: 1e-2, max_events: None };
        let mut engine = RateEngine::run3(config).unwrap();
        // 4 events, jet at 2.5 GeV: bins 0..=2 get one count each.
        for _ in 0..4 {
            engine.process_event(&jet_event(&[2.5], 0));
        }
        let report = engine.finalize().unwrap();
        let norm = report.normalization;
        assert!((norm - 2.5).abs() < 1e-12);

        let h = &report.rates["singleJetRates"];
        for bin in 0..=2 {
            assert!((h.content(bin, 0) - 4.0 * norm).abs() < 1e-9);
        }
        assert_eq!(h.content(3, 0), 0.0);
    }

    #[test]
    fn sum_rates_and_distributions() {
        let mut engine = RateEngine::run3(RateConfig::default()).unwrap();
        let ev = Event {
            pileup: 50,
            sums: vec![
                SumEntry { kind: SumKind::MissingEt, bx: 0, et: 10.0 },
                SumEntry { kind: SumKind::MissingEt, bx: 0, et: 20.0 },
                SumEntry { kind: SumKind::TotalHt, bx: -2, et: 500.0 },
            ],
            ..Event::default()
        };
        engine.process_event(&ev);
        let report = engine.finalize().unwrap();

        // Last central MissingEt entry wins: 20.0 -> thresholds 0..=20.
        assert_eq!(report.rates["metSumRates"].entries, 21);
        assert_eq!(report.distributions["metSum"].content(20, 50), 1.0);
        // Off-crossing TotalHt is ignored; sentinel lands under range.
        assert_eq!(report.rates["htSumRates"].entries, 0);
        assert_eq!(report.distributions["htSum"].under, 1);
    }

    #[test]
    fn region_variants_disagree_as_designed() {
        let mut engine = RateEngine::run3(RateConfig::default()).unwrap();
        let ev = Event {
            pileup: 1,
            jets: vec![Candidate::new(100.0, 2.0), Candidate::new(80.0, 0.5)],
            ..Event::default()
        };
        engine.process_event(&ev);
        let report = engine.finalize().unwrap();

        // Lead jet in the endcap window, second central.
        assert!(report.rates["singleJetRatesHEall"].entries > 0);
        assert_eq!(report.rates["doubleJetRatesHEall"].entries, 0);
        assert!(report.rates["doubleJetRatesHEtag"].entries > 0);
        assert!(report.rates["doubleJetRatesHEtagLead"].entries > 0);
    }

    #[test]
    fn parallel_fill_matches_sequential() {
        let menu = RateMenu::run3();
        let config = RateConfig::default();
        let events: Vec<Event> = (0..500)
            .map(|i| {
                let mut ev = jet_event(&[(i % 40) as f64 * 3.0, 12.0], (i % 60) as i32);
                ev.sums = vec![SumEntry { kind: SumKind::TotalEt, bx: 0, et: i as f64 }];
                ev
            })
            .collect();

        let mut sequential = RateEngine::new(menu.clone(), config).unwrap();
        for ev in &events {
            sequential.process_event(ev);
        }
        let seq = sequential.finalize().unwrap();
        let par = fill_events_parallel(&menu, &config, &events).unwrap().finalize().unwrap();

        assert_eq!(seq.processed_events, par.processed_events);
        for (key, h) in &seq.rates {
            assert_eq!(h.bin_content, par.rates[key].bin_content, "{key}");
        }
    }

    #[test]
    fn rejects_bad_config() {
        let config = RateConfig { inst_lumi: 0.0, ..RateConfig::default() };
        assert!(matches!(RateEngine::run3(config), Err(Error::Config(_))));
    }
}

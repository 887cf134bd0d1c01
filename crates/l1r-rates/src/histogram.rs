//! 2D (threshold × pileup) histogram accumulator.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of pileup bins on the auxiliary axis (integer pileup 0..=200).
pub const N_PILEUP_BINS: usize = 201;

/// Uniform binning of the threshold axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Number of bins.
    pub n_bins: usize,
    /// Lower edge of the first bin.
    pub lo: f64,
    /// Upper edge of the last bin.
    pub hi: f64,
}

impl Binning {
    /// A uniform binning over `[lo, hi)` with `n_bins` bins.
    pub const fn new(n_bins: usize, lo: f64, hi: f64) -> Self {
        Self { n_bins, lo, hi }
    }

    /// Bin width.
    pub fn width(&self) -> f64 {
        (self.hi - self.lo) / self.n_bins as f64
    }

    /// Lower edge (threshold) of bin `bin`.
    pub fn edge(&self, bin: usize) -> f64 {
        self.lo + bin as f64 * self.width()
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.n_bins == 0 || !(self.hi > self.lo) {
            return Err(Error::Config(format!(
                "invalid binning for '{name}' (n_bins={}, lo={}, hi={})",
                self.n_bins, self.lo, self.hi
            )));
        }
        Ok(())
    }
}

/// A 2D histogram over (threshold variable, pileup count).
///
/// The pileup axis is fixed: 201 integer bins, 0..=200. Contents are
/// stored x-major (`bin_content[x * N_PILEUP_BINS + pu]`). Fills outside
/// the pileup range are dropped and counted in `pileup_dropped`; value
/// fills outside the threshold axis are counted in `under`/`over`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hist2d {
    /// Histogram name (menu key).
    pub name: String,
    /// Threshold-axis binning.
    pub binning: Binning,
    /// Bin contents, x-major, length `n_bins * N_PILEUP_BINS`.
    pub bin_content: Vec<f64>,
    /// Total number of fill increments.
    pub entries: u64,
    /// Value fills below the threshold axis (sentinel values land here).
    pub under: u64,
    /// Value fills at or above the upper edge of the threshold axis.
    pub over: u64,
    /// Fills dropped because the pileup count was outside 0..=200.
    pub pileup_dropped: u64,
}

impl Hist2d {
    /// Create an empty histogram. Fails on a degenerate binning.
    pub fn new(name: impl Into<String>, binning: Binning) -> Result<Self> {
        let name = name.into();
        binning.validate(&name)?;
        Ok(Self {
            bin_content: vec![0.0; binning.n_bins * N_PILEUP_BINS],
            name,
            binning,
            entries: 0,
            under: 0,
            over: 0,
            pileup_dropped: 0,
        })
    }

    /// Pileup-axis bin for a pileup count, `None` if out of range.
    pub fn pileup_bin(pileup: i32) -> Option<usize> {
        if (0..N_PILEUP_BINS as i32).contains(&pileup) {
            Some(pileup as usize)
        } else {
            None
        }
    }

    /// Content of bin (`x_bin`, `pu_bin`).
    pub fn content(&self, x_bin: usize, pu_bin: usize) -> f64 {
        self.bin_content[x_bin * N_PILEUP_BINS + pu_bin]
    }

    /// Increment bin (`x_bin`, `pu_bin`) by one count.
    pub(crate) fn increment(&mut self, x_bin: usize, pu_bin: usize) {
        self.bin_content[x_bin * N_PILEUP_BINS + pu_bin] += 1.0;
        self.entries += 1;
    }

    /// Sum of contents over the pileup axis for one threshold bin.
    pub fn projection(&self, x_bin: usize) -> f64 {
        let start = x_bin * N_PILEUP_BINS;
        self.bin_content[start..start + N_PILEUP_BINS].iter().sum()
    }

    /// Multiply every bin content by `factor`.
    pub(crate) fn scale(&mut self, factor: f64) {
        for c in &mut self.bin_content {
            *c *= factor;
        }
    }

    /// Add another histogram's contents bin-wise. Both must share the
    /// same name and binning (they come from the same menu).
    pub(crate) fn merge(&mut self, other: &Hist2d) {
        debug_assert_eq!(self.name, other.name);
        debug_assert_eq!(self.binning, other.binning);
        for (a, b) in self.bin_content.iter_mut().zip(&other.bin_content) {
            *a += b;
        }
        self.entries += other.entries;
        self.under += other.under;
        self.over += other.over;
        self.pileup_dropped += other.pileup_dropped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binning_edges() {
        let b = Binning::new(400, 0.0, 400.0);
        assert_eq!(b.width(), 1.0);
        assert_eq!(b.edge(0), 0.0);
        assert_eq!(b.edge(399), 399.0);
    }

    #[test]
    fn rejects_degenerate_binning() {
        assert!(Hist2d::new("h", Binning::new(0, 0.0, 1.0)).is_err());
        assert!(Hist2d::new("h", Binning::new(10, 1.0, 1.0)).is_err());
    }

    #[test]
    fn pileup_bin_range() {
        assert_eq!(Hist2d::pileup_bin(0), Some(0));
        assert_eq!(Hist2d::pileup_bin(200), Some(200));
        assert_eq!(Hist2d::pileup_bin(201), None);
        assert_eq!(Hist2d::pileup_bin(-1), None);
    }

    #[test]
    fn merge_adds_binwise() {
        let b = Binning::new(4, 0.0, 4.0);
        let mut h1 = Hist2d::new("h", b).unwrap();
        let mut h2 = Hist2d::new("h", b).unwrap();
        h1.increment(0, 10);
        h2.increment(0, 10);
        h2.increment(3, 0);
        h1.merge(&h2);
        assert_eq!(h1.content(0, 10), 2.0);
        assert_eq!(h1.content(3, 0), 1.0);
        assert_eq!(h1.entries, 3);
    }
}

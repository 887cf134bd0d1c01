//! The cumulative-threshold fill primitive.
//!
//! This is the inner loop of the whole analysis: millions of events,
//! dozens of histograms, hundreds of bins each.

use crate::histogram::Hist2d;

/// Increment every threshold bin whose lower edge is `<= value`.
///
/// Thresholds ascend with the bin index, so the scan exits at the first
/// failing bin; the result is identical to testing every bin. `None`
/// and below-range values produce zero increments. A pileup count
/// outside the axis drops the whole fill (counted on the histogram).
pub fn fill_cumulative(hist: &mut Hist2d, value: Option<f64>, pileup: i32) {
    let Some(value) = value else { return };
    if value < hist.binning.lo {
        return;
    }
    let Some(pu_bin) = Hist2d::pileup_bin(pileup) else {
        hist.pileup_dropped += 1;
        return;
    };

    let lo = hist.binning.lo;
    let width = hist.binning.width();
    for bin in 0..hist.binning.n_bins {
        if value < lo + bin as f64 * width {
            break;
        }
        hist.increment(bin, pu_bin);
    }
}

/// Plain (non-cumulative) fill of an observed value into its bin.
///
/// Used for the sum-distribution histograms, where the `-1.0` sentinel
/// for an absent sum lands in the under-range count, as it would in the
/// underflow bin of the reference histogramming library.
pub fn fill_value(hist: &mut Hist2d, value: f64, pileup: i32) {
    let Some(pu_bin) = Hist2d::pileup_bin(pileup) else {
        hist.pileup_dropped += 1;
        return;
    };
    if value < hist.binning.lo {
        hist.under += 1;
        return;
    }
    if value >= hist.binning.hi {
        hist.over += 1;
        return;
    }
    let bin = ((value - hist.binning.lo) / hist.binning.width()) as usize;
    // Float division can land exactly on n_bins for values just under hi.
    let bin = bin.min(hist.binning.n_bins - 1);
    hist.increment(bin, pu_bin);
}

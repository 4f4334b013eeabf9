//! Fixed-binning weighted histogram with per-bin sum of squared weights.

use crate::config::HistogramParams;
use crate::error::{TauForgeError, TfResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedHistogram {
    pub n_bins: usize,
    pub low: f64,
    pub high: f64,
    /// Sum of weights per bin.
    pub sumw: Vec<f64>,
    /// Sum of squared weights per bin.
    pub sumw2: Vec<f64>,
    pub underflow: f64,
    pub overflow: f64,
    /// In-range fills.
    pub entries: u64,
}

impl WeightedHistogram {
    pub fn new(n_bins: usize, low: f64, high: f64) -> TfResult<Self> {
        if n_bins == 0 {
            return Err(TauForgeError::Config(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(TauForgeError::Config(format!(
                "invalid histogram range [{}, {})",
                low, high
            )));
        }
        Ok(Self {
            n_bins,
            low,
            high,
            sumw: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
        })
    }

    pub fn from_params(params: &HistogramParams) -> TfResult<Self> {
        Self::new(params.hist_bins, params.hist_low, params.hist_high)
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.n_bins as f64
    }

    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        self.low + bin as f64 * self.bin_width()
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.bin_low_edge(bin) + 0.5 * self.bin_width()
    }

    /// Bin covering `x`, or `None` outside [low, high) and for NaN.
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if !(x >= self.low && x < self.high) {
            return None;
        }
        let bin = ((x - self.low) / self.bin_width()) as usize;
        // Guard against round-off right below `high`.
        Some(bin.min(self.n_bins - 1))
    }

    /// Books `weight` at `x`; returns `false` if `x` went to a flow bin.
    pub fn fill(&mut self, x: f64, weight: f64) -> bool {
        match self.find_bin(x) {
            Some(bin) => {
                self.sumw[bin] += weight;
                self.sumw2[bin] += weight * weight;
                self.entries += 1;
                true
            }
            None if x >= self.high => {
                self.overflow += weight;
                false
            }
            None => {
                self.underflow += weight;
                false
            }
        }
    }

    /// Statistical uncertainty of a bin, `sqrt(sum w^2)`.
    pub fn bin_error(&self, bin: usize) -> f64 {
        self.sumw2[bin].sqrt()
    }

    pub fn integral(&self) -> f64 {
        self.sumw.iter().sum()
    }

    pub fn same_binning(&self, other: &Self) -> bool {
        self.n_bins == other.n_bins && self.low == other.low && self.high == other.high
    }

    /// Bin-wise accumulation of `other` into `self`.
    pub fn merge(&mut self, other: &Self) -> TfResult<()> {
        if !self.same_binning(other) {
            return Err(TauForgeError::Config(format!(
                "cannot merge histograms with binning ({}, {}, {}) and ({}, {}, {})",
                self.n_bins, self.low, self.high, other.n_bins, other.low, other.high
            )));
        }
        for (a, b) in self.sumw.iter_mut().zip(&other.sumw) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        Ok(())
    }
}

//! Muon-tau pair search.
//!
//! Muons are tried from hardest to softest, taus from most to least
//! isolated; the first combination that is well separated and of
//! opposite charge wins. Both orderings are stable, so the choice is
//! reproducible when several pairs qualify.

use crate::config::PairingParams;
use crate::kinematics::delta_r;
use crate::selection::{SelectedMuons, SelectedTaus};
use std::cmp::Ordering;

/// Indices into the selected (masked) muon and tau arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    pub muon: usize,
    pub tau: usize,
}

/// Total order on `f64` with every NaN after every number.
fn nan_last(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if descending => b.total_cmp(&a),
        (false, false) => a.total_cmp(&b),
    }
}

/// Indices of `values` sorted ascending; equal values keep input order,
/// NaN entries go last.
pub fn argsort_ascending(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| nan_last(values[a], values[b], false));
    idx
}

/// Indices of `values` sorted descending; equal values keep input order,
/// NaN entries go last.
pub fn argsort_descending(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| nan_last(values[a], values[b], true));
    idx
}

#[derive(Debug, Clone, Default)]
pub struct PairFinder {
    params: PairingParams,
}

impl PairFinder {
    pub fn new(params: PairingParams) -> Self {
        Self { params }
    }

    pub fn min_delta_r(&self) -> f64 {
        self.params.min_delta_r
    }

    #[inline(always)]
    fn accepts(&self, muons: &SelectedMuons, m: usize, taus: &SelectedTaus, t: usize) -> bool {
        let dr = delta_r(muons.eta[m], muons.phi[m], taus.eta[t], taus.phi[t]);
        dr > self.params.min_delta_r && muons.charge[m].signum() * taus.charge[t].signum() < 0
    }

    /// Returns the preferred pair, or `None` if no combination qualifies.
    pub fn find(&self, muons: &SelectedMuons, taus: &SelectedTaus) -> Option<CandidatePair> {
        let muon_order = argsort_descending(&muons.pt);
        let tau_order = argsort_ascending(&taus.rel_iso_all);

        for &m in &muon_order {
            for &t in &tau_order {
                if self.accepts(muons, m, taus, t) {
                    return Some(CandidatePair { muon: m, tau: t });
                }
            }
        }
        None
    }
}

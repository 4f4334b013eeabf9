//! Object quality cuts and event preselection.

use crate::config::SelectionCuts;
use crate::event::{Event, MuonCollection, TauCollection};
use crate::kinematics::PtEtaPhiM;
use strum_macros::{Display, EnumIter};

/// One flag per particle, `true` if it passes the object cuts.
pub type SelectionMask = Vec<bool>;

/// Why an event left the pipeline. Not an error: rejected events are
/// only counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    Trigger,
    NoMuon,
    NoTau,
    NoGoodMuon,
    NoGoodTau,
    NoPair,
}

/// Good muons, in their original relative order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedMuons {
    pub pt: Vec<f64>,
    pub eta: Vec<f64>,
    pub phi: Vec<f64>,
    pub mass: Vec<f64>,
    pub charge: Vec<i32>,
}

/// Good taus, in their original relative order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedTaus {
    pub pt: Vec<f64>,
    pub eta: Vec<f64>,
    pub phi: Vec<f64>,
    pub mass: Vec<f64>,
    pub charge: Vec<i32>,
    pub rel_iso_all: Vec<f64>,
}

impl SelectedMuons {
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }

    pub fn p4(&self, i: usize) -> PtEtaPhiM {
        PtEtaPhiM {
            pt: self.pt[i],
            eta: self.eta[i],
            phi: self.phi[i],
            mass: self.mass[i],
        }
    }
}

impl SelectedTaus {
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }

    pub fn p4(&self, i: usize) -> PtEtaPhiM {
        PtEtaPhiM {
            pt: self.pt[i],
            eta: self.eta[i],
            phi: self.phi[i],
            mass: self.mass[i],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedLeptons {
    pub muons: SelectedMuons,
    pub taus: SelectedTaus,
}

fn masked<T: Copy>(values: &[T], mask: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(mask)
        .filter(|&(_, &keep)| keep)
        .map(|(&v, _)| v)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSelector {
    cuts: SelectionCuts,
}

impl ObjectSelector {
    pub fn new(cuts: SelectionCuts) -> Self {
        Self { cuts }
    }

    pub fn cuts(&self) -> &SelectionCuts {
        &self.cuts
    }

    pub fn muon_mask(&self, muons: &MuonCollection) -> SelectionMask {
        (0..muons.len())
            .map(|i| {
                muons.eta[i].abs() < self.cuts.muon_max_abs_eta
                    && muons.pt[i] > self.cuts.muon_min_pt
                    && muons.tight_id[i]
            })
            .collect()
    }

    pub fn tau_mask(&self, taus: &TauCollection) -> SelectionMask {
        (0..taus.len())
            .map(|i| {
                taus.charge[i] != 0
                    && taus.eta[i].abs() < self.cuts.tau_max_abs_eta
                    && taus.pt[i] > self.cuts.tau_min_pt
                    && taus.id_decay_mode[i]
                    && taus.id_iso_tight[i]
                    && taus.id_anti_ele_tight[i]
                    && taus.id_anti_mu_tight[i]
            })
            .collect()
    }

    /// Trigger and raw multiplicity requirements.
    pub fn baseline(&self, event: &Event) -> Result<(), Rejection> {
        if !event.trigger_fired {
            return Err(Rejection::Trigger);
        }
        if event.n_muon == 0 {
            return Err(Rejection::NoMuon);
        }
        if event.n_tau == 0 {
            return Err(Rejection::NoTau);
        }
        Ok(())
    }

    /// Runs the full preselection and projects the good particles.
    /// Expects an event that already passed `Event::validate`.
    pub fn select(&self, event: &Event) -> Result<SelectedLeptons, Rejection> {
        self.baseline(event)?;

        let mu_mask = self.muon_mask(&event.muons);
        if !mu_mask.iter().any(|&m| m) {
            return Err(Rejection::NoGoodMuon);
        }

        let tau_mask = self.tau_mask(&event.taus);
        if !tau_mask.iter().any(|&m| m) {
            return Err(Rejection::NoGoodTau);
        }

        let mu = &event.muons;
        let tau = &event.taus;

        Ok(SelectedLeptons {
            muons: SelectedMuons {
                pt: masked(&mu.pt, &mu_mask),
                eta: masked(&mu.eta, &mu_mask),
                phi: masked(&mu.phi, &mu_mask),
                mass: masked(&mu.mass, &mu_mask),
                charge: masked(&mu.charge, &mu_mask),
            },
            taus: SelectedTaus {
                pt: masked(&tau.pt, &tau_mask),
                eta: masked(&tau.eta, &tau_mask),
                phi: masked(&tau.phi, &tau_mask),
                mass: masked(&tau.mass, &tau_mask),
                charge: masked(&tau.charge, &tau_mask),
                rel_iso_all: masked(&tau.rel_iso_all, &tau_mask),
            },
        })
    }
}

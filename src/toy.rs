//! Synthetic muon-tau events for demos, benchmarks and tests.

use crate::event::{Event, MuonCollection, TauCollection};
use crate::sample::{Sample, SampleKind};
use std::f64::consts::PI;

const MUON_MASS: f64 = 0.10566;

/// Recipe for one toy sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyRecipe {
    pub name: String,
    pub kind: SampleKind,
    pub cross_section: f64,
    pub events: usize,
    /// Fraction of events carrying a genuine opposite-sign mu-tau pair.
    pub signal_fraction: f64,
    /// Mass of the decaying resonance in GeV.
    pub resonance_mass: f64,
}

/// Samples mirroring the 2012 open-data mu-tau analysis.
pub fn default_recipes(events_per_sample: usize) -> Vec<ToyRecipe> {
    let recipe = |name: &str, kind: SampleKind, xsec: f64, signal: f64, mass: f64| ToyRecipe {
        name: name.to_string(),
        kind,
        cross_section: xsec,
        events: events_per_sample,
        signal_fraction: signal,
        resonance_mass: mass,
    };
    vec![
        recipe("Run2012B_TauPlusX", SampleKind::Data, 1.0, 0.3, 91.2),
        recipe("Run2012C_TauPlusX", SampleKind::Data, 1.0, 0.3, 91.2),
        recipe("GluGluToHToTauTau", SampleKind::Simulation, 19.6, 0.6, 125.0),
        recipe("VBF_HToTauTau", SampleKind::Simulation, 1.55, 0.6, 125.0),
        recipe("DYJetsToLL", SampleKind::Simulation, 3503.7, 0.5, 91.2),
        recipe("TTbar", SampleKind::Simulation, 225.2, 0.1, 150.0),
        recipe("W1JetsToLNu", SampleKind::Simulation, 6381.2, 0.05, 80.4),
    ]
}

impl ToyRecipe {
    pub fn sample(&self) -> Sample {
        Sample {
            name: self.name.clone(),
            cross_section: self.cross_section,
            raw_event_count: self.events as u64,
            kind: self.kind,
        }
    }
}

pub struct ToyGenerator {
    rng: fastrand::Rng,
}

impl ToyGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Self { rng }
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.rng.f64()
    }

    fn charge(&mut self) -> i32 {
        if self.rng.bool() {
            1
        } else {
            -1
        }
    }

    fn push_muon(&mut self, m: &mut MuonCollection, pt: f64, eta: f64, phi: f64, charge: i32) {
        m.pt.push(pt);
        m.eta.push(eta);
        m.phi.push(phi);
        m.mass.push(MUON_MASS);
        m.charge.push(charge);
        m.tight_id.push(self.rng.f64() < 0.85);
    }

    #[allow(clippy::too_many_arguments)]
    fn push_tau(
        &mut self,
        t: &mut TauCollection,
        pt: f64,
        eta: f64,
        phi: f64,
        charge: i32,
        iso: f64,
        good: bool,
    ) {
        t.pt.push(pt);
        t.eta.push(eta);
        t.phi.push(phi);
        t.mass.push(self.uniform(0.14, 1.5));
        t.charge.push(charge);
        t.rel_iso_all.push(iso);
        t.id_decay_mode.push(good || self.rng.f64() < 0.7);
        t.id_iso_tight.push(good || self.rng.f64() < 0.5);
        t.id_anti_ele_tight.push(good || self.rng.f64() < 0.8);
        t.id_anti_mu_tight.push(good || self.rng.f64() < 0.8);
    }

    /// Back-to-back mu-tau pair whose visible mass is a fraction of `mass`.
    fn add_resonance(&mut self, event: &mut Event, mass: f64) {
        let visible = mass * self.uniform(0.45, 0.9);
        let eta_mu = self.uniform(-2.0, 2.0);
        let eta_tau = self.uniform(-2.2, 2.2);
        let deta = eta_mu - eta_tau;
        // m^2 = 2 pt^2 (cosh(deta) - cos(pi)) for massless back-to-back legs
        let pt = visible / (2.0 * (deta.cosh() + 1.0)).sqrt();
        let phi_mu = self.uniform(-PI, PI);
        let phi_tau = if phi_mu > 0.0 { phi_mu - PI } else { phi_mu + PI };
        let q = self.charge();
        let iso = self.uniform(0.0, 0.1);

        self.push_muon(&mut event.muons, pt, eta_mu, phi_mu, q);
        self.push_tau(&mut event.taus, pt, eta_tau, phi_tau, -q, iso, true);
    }

    fn add_fakes(&mut self, event: &mut Event) {
        let n_mu = self.rng.usize(0..3);
        for _ in 0..n_mu {
            let pt = 5.0 + 40.0 * self.rng.f64().powi(2);
            let (eta, phi, q) = (self.uniform(-2.4, 2.4), self.uniform(-PI, PI), self.charge());
            self.push_muon(&mut event.muons, pt, eta, phi, q);
        }
        let n_tau = self.rng.usize(0..3);
        for _ in 0..n_tau {
            let pt = 15.0 + 50.0 * self.rng.f64().powi(2);
            let (eta, phi) = (self.uniform(-2.5, 2.5), self.uniform(-PI, PI));
            let q = if self.rng.f64() < 0.05 { 0 } else { self.charge() };
            let iso = self.uniform(0.0, 1.0);
            self.push_tau(&mut event.taus, pt, eta, phi, q, iso, false);
        }
    }

    pub fn event(&mut self, signal_fraction: f64, resonance_mass: f64) -> Event {
        let mut event = Event {
            trigger_fired: self.rng.f64() < 0.9,
            ..Default::default()
        };
        if self.rng.f64() < signal_fraction {
            self.add_resonance(&mut event, resonance_mass);
        }
        self.add_fakes(&mut event);
        event.n_muon = event.muons.len() as u32;
        event.n_tau = event.taus.len() as u32;
        event
    }

    pub fn events(&mut self, recipe: &ToyRecipe) -> Vec<Event> {
        (0..recipe.events)
            .map(|_| self.event(recipe.signal_fraction, recipe.resonance_mass))
            .collect()
    }
}

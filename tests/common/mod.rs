#![allow(dead_code)]

use tauforge::event::Event;

/// Builder for events to keep the tests readable.
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    /// Triggered event with no particles.
    pub fn new() -> Self {
        Self {
            event: Event {
                trigger_fired: true,
                ..Default::default()
            },
        }
    }

    pub fn trigger(mut self, fired: bool) -> Self {
        self.event.trigger_fired = fired;
        self
    }

    /// Muon passing every quality cut.
    pub fn muon(self, pt: f64, eta: f64, phi: f64, charge: i32) -> Self {
        self.muon_with_id(pt, eta, phi, charge, true)
    }

    pub fn muon_with_id(mut self, pt: f64, eta: f64, phi: f64, charge: i32, tight: bool) -> Self {
        let m = &mut self.event.muons;
        m.pt.push(pt);
        m.eta.push(eta);
        m.phi.push(phi);
        m.mass.push(0.10566);
        m.charge.push(charge);
        m.tight_id.push(tight);
        self.event.n_muon += 1;
        self
    }

    /// Tau passing every quality flag.
    pub fn tau(self, pt: f64, eta: f64, phi: f64, charge: i32, iso: f64) -> Self {
        self.tau_with_flags(pt, eta, phi, charge, iso, [true; 4])
    }

    pub fn tau_with_flags(
        mut self,
        pt: f64,
        eta: f64,
        phi: f64,
        charge: i32,
        iso: f64,
        flags: [bool; 4],
    ) -> Self {
        let t = &mut self.event.taus;
        t.pt.push(pt);
        t.eta.push(eta);
        t.phi.push(phi);
        t.mass.push(1.0);
        t.charge.push(charge);
        t.rel_iso_all.push(iso);
        t.id_decay_mode.push(flags[0]);
        t.id_iso_tight.push(flags[1]);
        t.id_anti_ele_tight.push(flags[2]);
        t.id_anti_mu_tight.push(flags[3]);
        self.event.n_tau += 1;
        self
    }

    pub fn counts(mut self, n_muon: u32, n_tau: u32) -> Self {
        self.event.n_muon = n_muon;
        self.event.n_tau = n_tau;
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}

/// A clean back-to-back opposite-sign pair.
pub fn good_pair_event() -> Event {
    EventBuilder::new()
        .muon(30.0, 0.5, 0.0, -1)
        .tau(35.0, -0.3, 3.0, 1, 0.05)
        .build()
}

use crate::selection::Rejection;
use serde::{Deserialize, Serialize};

/// Number of events surviving each pipeline stage of one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cutflow {
    pub loaded: u64,
    pub trigger: u64,
    pub multiplicity: u64,
    pub good_muon: u64,
    pub good_tau: u64,
    pub paired: u64,
    /// Paired events whose mass fell inside the histogram range.
    pub in_range: u64,
}

impl Cutflow {
    pub fn record_rejection(&mut self, rejection: Rejection) {
        self.loaded += 1;
        match rejection {
            Rejection::Trigger => {}
            Rejection::NoMuon | Rejection::NoTau => {
                self.trigger += 1;
            }
            Rejection::NoGoodMuon => {
                self.trigger += 1;
                self.multiplicity += 1;
            }
            Rejection::NoGoodTau => {
                self.trigger += 1;
                self.multiplicity += 1;
                self.good_muon += 1;
            }
            Rejection::NoPair => {
                self.trigger += 1;
                self.multiplicity += 1;
                self.good_muon += 1;
                self.good_tau += 1;
            }
        }
    }

    pub fn record_accepted(&mut self, in_range: bool) {
        self.loaded += 1;
        self.trigger += 1;
        self.multiplicity += 1;
        self.good_muon += 1;
        self.good_tau += 1;
        self.paired += 1;
        if in_range {
            self.in_range += 1;
        }
    }

    pub fn merge(&mut self, other: &Cutflow) {
        self.loaded += other.loaded;
        self.trigger += other.trigger;
        self.multiplicity += other.multiplicity;
        self.good_muon += other.good_muon;
        self.good_tau += other.good_tau;
        self.paired += other.paired;
        self.in_range += other.in_range;
    }

    /// Stage labels with their counts, in pipeline order.
    pub fn stages(&self) -> [(&'static str, u64); 7] {
        [
            ("loaded", self.loaded),
            ("trigger", self.trigger),
            ("nMuon>0 && nTau>0", self.multiplicity),
            ("good muon", self.good_muon),
            ("good tau", self.good_tau),
            ("mu-tau pair", self.paired),
            ("in range", self.in_range),
        ]
    }
}

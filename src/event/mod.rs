pub mod columns;
pub mod source;

pub use self::columns::{Column, ColumnarFile};
pub use self::source::{EventSource, JsonDirSource, MemorySource};

use crate::error::{TauForgeError, TfResult};
use serde::{Deserialize, Serialize};

/// Reconstructed muons of one event. All vectors are index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuonCollection {
    pub pt: Vec<f64>,
    pub eta: Vec<f64>,
    pub phi: Vec<f64>,
    pub mass: Vec<f64>,
    pub charge: Vec<i32>,
    pub tight_id: Vec<bool>,
}

/// Reconstructed hadronic taus of one event. All vectors are index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TauCollection {
    pub pt: Vec<f64>,
    pub eta: Vec<f64>,
    pub phi: Vec<f64>,
    pub mass: Vec<f64>,
    pub charge: Vec<i32>,
    pub rel_iso_all: Vec<f64>,
    pub id_decay_mode: Vec<bool>,
    pub id_iso_tight: Vec<bool>,
    pub id_anti_ele_tight: Vec<bool>,
    pub id_anti_mu_tight: Vec<bool>,
}

/// One recorded (or simulated) collision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub trigger_fired: bool,
    pub n_muon: u32,
    pub n_tau: u32,
    pub muons: MuonCollection,
    pub taus: TauCollection,
}

fn check_lengths(collection: &str, lens: &[(&str, usize)]) -> TfResult<usize> {
    let expected = lens.first().map(|(_, n)| *n).unwrap_or(0);
    for (attr, n) in lens {
        if *n != expected {
            return Err(TauForgeError::Schema(format!(
                "{} attribute '{}' has {} entries, expected {}",
                collection, attr, n, expected
            )));
        }
    }
    Ok(expected)
}

impl MuonCollection {
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }

    pub fn validate(&self) -> TfResult<usize> {
        check_lengths(
            "Muon",
            &[
                ("pt", self.pt.len()),
                ("eta", self.eta.len()),
                ("phi", self.phi.len()),
                ("mass", self.mass.len()),
                ("charge", self.charge.len()),
                ("tightId", self.tight_id.len()),
            ],
        )
    }
}

impl TauCollection {
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }

    pub fn validate(&self) -> TfResult<usize> {
        check_lengths(
            "Tau",
            &[
                ("pt", self.pt.len()),
                ("eta", self.eta.len()),
                ("phi", self.phi.len()),
                ("mass", self.mass.len()),
                ("charge", self.charge.len()),
                ("relIso_all", self.rel_iso_all.len()),
                ("idDecayMode", self.id_decay_mode.len()),
                ("idIsoTight", self.id_iso_tight.len()),
                ("idAntiEleTight", self.id_anti_ele_tight.len()),
                ("idAntiMuTight", self.id_anti_mu_tight.len()),
            ],
        )
    }
}

impl Event {
    /// Checks that every collection is rectangular.
    pub fn validate(&self) -> TfResult<()> {
        self.muons.validate()?;
        self.taus.validate()?;
        Ok(())
    }
}

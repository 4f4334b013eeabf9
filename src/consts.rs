/// Integrated luminosity of the 2012 open-data runs used here, in pb^-1 (1.1 fb^-1).
pub const DEFAULT_INTEGRATED_LUMINOSITY: f64 = 1.1 * 1000.0;

/// Number of bins of the visible di-tau mass histogram.
pub const DEFAULT_HIST_BINS: usize = 20;

/// Lower edge of the mass histogram in GeV.
pub const DEFAULT_HIST_LOW: f64 = 20.0;

/// Upper edge of the mass histogram in GeV.
pub const DEFAULT_HIST_HIGH: f64 = 120.0;

/// Minimum angular separation between the paired muon and tau.
pub const DEFAULT_MIN_DELTA_R: f64 = 0.5;

/// Sample names containing this token are recorded collision data.
pub const DEFAULT_DATA_PATTERN: &str = "Run2012";

/// Name of the event tree inside a columnar sample file.
pub const EVENTS_TREE: &str = "Events";

pub const AXIS_TITLE_X: &str = "Visible di-tau mass / GeV";
pub const AXIS_TITLE_Y: &str = "N_{Events}";

/// Column names of the NanoAOD-style event schema.
pub mod columns {
    pub const TRIGGER: &str = "HLT_IsoMu17_eta2p1_LooseIsoPFTau20";
    pub const N_MUON: &str = "nMuon";
    pub const N_TAU: &str = "nTau";

    pub const MUON_PT: &str = "Muon_pt";
    pub const MUON_ETA: &str = "Muon_eta";
    pub const MUON_PHI: &str = "Muon_phi";
    pub const MUON_MASS: &str = "Muon_mass";
    pub const MUON_CHARGE: &str = "Muon_charge";
    pub const MUON_TIGHT_ID: &str = "Muon_tightId";

    pub const TAU_PT: &str = "Tau_pt";
    pub const TAU_ETA: &str = "Tau_eta";
    pub const TAU_PHI: &str = "Tau_phi";
    pub const TAU_MASS: &str = "Tau_mass";
    pub const TAU_CHARGE: &str = "Tau_charge";
    pub const TAU_REL_ISO_ALL: &str = "Tau_relIso_all";
    pub const TAU_ID_DECAY_MODE: &str = "Tau_idDecayMode";
    pub const TAU_ID_ISO_TIGHT: &str = "Tau_idIsoTight";
    pub const TAU_ID_ANTI_ELE_TIGHT: &str = "Tau_idAntiEleTight";
    pub const TAU_ID_ANTI_MU_TIGHT: &str = "Tau_idAntiMuTight";
}

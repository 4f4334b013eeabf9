use crate::consts::{
    DEFAULT_DATA_PATTERN, DEFAULT_HIST_BINS, DEFAULT_HIST_HIGH, DEFAULT_HIST_LOW,
    DEFAULT_INTEGRATED_LUMINOSITY, DEFAULT_MIN_DELTA_R,
};
use crate::error::{TauForgeError, TfResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    #[command(flatten)]
    pub histogram: HistogramParams,
    #[command(flatten)]
    pub cuts: SelectionCuts,
    #[command(flatten)]
    pub pairing: PairingParams,
    #[command(flatten)]
    pub normalization: Normalization,
    #[command(flatten)]
    pub run: RunParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramParams {
    #[arg(long, default_value_t = DEFAULT_HIST_BINS)]
    pub hist_bins: usize,
    #[arg(long, default_value_t = DEFAULT_HIST_LOW)]
    pub hist_low: f64,
    #[arg(long, default_value_t = DEFAULT_HIST_HIGH)]
    pub hist_high: f64,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            hist_bins: DEFAULT_HIST_BINS,
            hist_low: DEFAULT_HIST_LOW,
            hist_high: DEFAULT_HIST_HIGH,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionCuts {
    // === MUON ===
    #[arg(long, default_value_t = 2.1)]
    pub muon_max_abs_eta: f64,
    #[arg(long, default_value_t = 17.0)]
    pub muon_min_pt: f64,

    // === TAU ===
    #[arg(long, default_value_t = 2.3)]
    pub tau_max_abs_eta: f64,
    #[arg(long, default_value_t = 20.0)]
    pub tau_min_pt: f64,
}

impl Default for SelectionCuts {
    fn default() -> Self {
        Self {
            muon_max_abs_eta: 2.1,
            muon_min_pt: 17.0,
            tau_max_abs_eta: 2.3,
            tau_min_pt: 20.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingParams {
    #[arg(long, default_value_t = DEFAULT_MIN_DELTA_R)]
    pub min_delta_r: f64,
}

impl Default for PairingParams {
    fn default() -> Self {
        Self {
            min_delta_r: DEFAULT_MIN_DELTA_R,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalization {
    /// Integrated luminosity in pb^-1
    #[arg(long, default_value_t = DEFAULT_INTEGRATED_LUMINOSITY)]
    pub luminosity: f64,
    /// Sample names containing this token are treated as recorded data
    #[arg(long, default_value = DEFAULT_DATA_PATTERN)]
    pub data_pattern: String,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            luminosity: DEFAULT_INTEGRATED_LUMINOSITY,
            data_pattern: DEFAULT_DATA_PATTERN.to_string(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Concurrent,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    #[arg(long, default_value = "concurrent")]
    pub mode: ExecutionMode,
    /// Worker threads for concurrent mode (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Concurrent,
            threads: 0,
        }
    }
}

impl AnalysisConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TauForgeError::Config(format!("cannot read config '{}': {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make the analysis meaningless.
    pub fn validate(&self) -> TfResult<()> {
        let h = &self.histogram;
        if h.hist_bins == 0 {
            return Err(TauForgeError::Config(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if !(h.hist_low.is_finite() && h.hist_high.is_finite()) || h.hist_low >= h.hist_high {
            return Err(TauForgeError::Config(format!(
                "invalid histogram range [{}, {})",
                h.hist_low, h.hist_high
            )));
        }
        if !self.pairing.min_delta_r.is_finite() || self.pairing.min_delta_r < 0.0 {
            return Err(TauForgeError::Config(format!(
                "invalid separation threshold {}",
                self.pairing.min_delta_r
            )));
        }
        let lumi = self.normalization.luminosity;
        if !lumi.is_finite() || lumi <= 0.0 {
            return Err(TauForgeError::Config(format!(
                "integrated luminosity must be positive, got {}",
                lumi
            )));
        }
        if self.normalization.data_pattern.is_empty() {
            return Err(TauForgeError::Config(
                "data pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Overwrites fields with values the user typed on the command line.
    /// Defaults filled in by clap do not override file values.
    pub fn merge_from_cli(&mut self, cli: &AnalysisConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(histogram.hist_bins);
        update_if_present!(histogram.hist_low);
        update_if_present!(histogram.hist_high);

        update_if_present!(cuts.muon_max_abs_eta);
        update_if_present!(cuts.muon_min_pt);
        update_if_present!(cuts.tau_max_abs_eta);
        update_if_present!(cuts.tau_min_pt);

        update_if_present!(pairing.min_delta_r);

        update_if_present!(normalization.luminosity);
        update_if_present!(normalization.data_pattern);

        update_if_present!(run.mode);
        update_if_present!(run.threads);
    }
}

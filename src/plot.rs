//! Plot artifact for the observed vs. simulated comparison.
//!
//! Rendering is left to external tooling; this writes a self-describing
//! JSON document with everything a renderer needs.

use crate::analysis::GroupTotals;
use crate::error::{TauForgeError, TfResult};
use crate::histogram::WeightedHistogram;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub label: String,
    /// `points` (markers with error bars) or `step` (filled histogram).
    pub style: String,
    pub bin_edges: Vec<f64>,
    pub values: Vec<f64>,
    pub errors: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDocument {
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<PlotSeries>,
}

fn series(label: &str, style: &str, h: &WeightedHistogram) -> PlotSeries {
    PlotSeries {
        label: label.to_string(),
        style: style.to_string(),
        bin_edges: (0..=h.n_bins).map(|i| h.bin_low_edge(i)).collect(),
        values: h.sumw.clone(),
        errors: (0..h.n_bins).map(|i| h.bin_error(i)).collect(),
    }
}

impl PlotDocument {
    pub fn new(
        observed: &WeightedHistogram,
        simulated: &WeightedHistogram,
        x_title: &str,
        y_title: &str,
    ) -> Self {
        Self {
            x_title: x_title.to_string(),
            y_title: y_title.to_string(),
            series: vec![
                series("simulation", "step", simulated),
                series("data", "points", observed),
            ],
        }
    }

    pub fn from_totals(totals: &GroupTotals, x_title: &str, y_title: &str) -> TfResult<Self> {
        match (&totals.observed, &totals.simulated) {
            (Some(obs), Some(sim)) => Ok(Self::new(obs, sim, x_title, y_title)),
            (None, _) => Err(TauForgeError::Config(
                "no observed-data sample to plot".to_string(),
            )),
            (_, None) => Err(TauForgeError::Config(
                "no simulated sample to plot".to_string(),
            )),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> TfResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("Plot written to {:?}", path);
        Ok(())
    }
}

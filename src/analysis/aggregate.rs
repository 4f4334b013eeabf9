use super::cutflow::Cutflow;
use crate::error::TfResult;
use crate::histogram::WeightedHistogram;
use crate::sample::{Sample, SampleKind};
use serde::Serialize;

/// Finalized output of one sample's pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SampleResult {
    pub sample: Sample,
    pub weight: f64,
    pub histogram: WeightedHistogram,
    pub cutflow: Cutflow,
}

/// Observed and simulated totals. A group stays `None` until its first
/// sample arrives; later samples accumulate into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTotals {
    pub observed: Option<WeightedHistogram>,
    pub simulated: Option<WeightedHistogram>,
}

impl GroupTotals {
    pub fn add(&mut self, kind: SampleKind, hist: &WeightedHistogram) -> TfResult<()> {
        let slot = match kind {
            SampleKind::Data => &mut self.observed,
            SampleKind::Simulation => &mut self.simulated,
        };
        match slot {
            Some(total) => total.merge(hist)?,
            None => *slot = Some(hist.clone()),
        }
        Ok(())
    }

    /// Merge step run after every sample has finished.
    pub fn from_results(results: &[SampleResult]) -> TfResult<Self> {
        let mut totals = Self::default();
        for r in results {
            totals.add(r.sample.kind, &r.histogram)?;
        }
        Ok(totals)
    }
}

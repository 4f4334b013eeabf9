use super::aggregate::SampleResult;
use super::cutflow::Cutflow;
use crate::config::{AnalysisConfig, ExecutionMode};
use crate::error::{TauForgeError, TfResult};
use crate::event::{Event, EventSource};
use crate::histogram::WeightedHistogram;
use crate::kinematics::invariant_mass;
use crate::pairing::PairFinder;
use crate::sample::Sample;
use crate::selection::{ObjectSelector, Rejection};
use crate::weight::sample_weight;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Selection, pairing and mass reconstruction for one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    config: AnalysisConfig,
    selector: ObjectSelector,
    finder: PairFinder,
}

impl Analysis {
    pub fn new(config: AnalysisConfig) -> TfResult<Self> {
        config.validate()?;
        Ok(Self {
            selector: ObjectSelector::new(config.cuts.clone()),
            finder: PairFinder::new(config.pairing.clone()),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn empty_histogram(&self) -> TfResult<WeightedHistogram> {
        WeightedHistogram::from_params(&self.config.histogram)
    }

    /// Visible di-tau mass of an event, or the stage that rejected it.
    pub fn evaluate(&self, event: &Event) -> Result<f64, Rejection> {
        let leptons = self.selector.select(event)?;
        let pair = self
            .finder
            .find(&leptons.muons, &leptons.taus)
            .ok_or(Rejection::NoPair)?;
        Ok(invariant_mass(
            leptons.muons.p4(pair.muon),
            leptons.taus.p4(pair.tau),
        ))
    }

    fn accumulate(
        &self,
        mut hist: WeightedHistogram,
        mut cutflow: Cutflow,
        event: &Event,
        weight: f64,
    ) -> (WeightedHistogram, Cutflow) {
        match self.evaluate(event) {
            Ok(mass) => {
                let in_range = hist.fill(mass, weight);
                cutflow.record_accepted(in_range);
            }
            Err(rejection) => cutflow.record_rejection(rejection),
        }
        (hist, cutflow)
    }

    /// Fills one histogram from a batch of events sharing `weight`.
    ///
    /// In concurrent mode every rayon task fills its own partial histogram;
    /// partials are summed at the end, so bins are never shared.
    pub fn process_events(
        &self,
        events: &[Event],
        weight: f64,
    ) -> TfResult<(WeightedHistogram, Cutflow)> {
        let empty = self.empty_histogram()?;

        match self.config.run.mode {
            ExecutionMode::Sequential => Ok(events
                .iter()
                .fold((empty, Cutflow::default()), |(h, c), ev| {
                    self.accumulate(h, c, ev, weight)
                })),
            ExecutionMode::Concurrent => events
                .par_iter()
                .fold(
                    || (empty.clone(), Cutflow::default()),
                    |(h, c), ev| self.accumulate(h, c, ev, weight),
                )
                .map(Ok::<_, TauForgeError>)
                .try_reduce(
                    || (empty.clone(), Cutflow::default()),
                    |(mut h1, mut c1), (h2, c2)| {
                        h1.merge(&h2)?;
                        c1.merge(&c2);
                        Ok((h1, c1))
                    },
                ),
        }
    }

    /// Runs the whole chain for one sample. The events are dropped once
    /// the sample's histogram is complete.
    pub fn process_sample(
        &self,
        sample: &Sample,
        source: &dyn EventSource,
    ) -> TfResult<SampleResult> {
        // Fail on bad metadata before touching the event data.
        let weight = sample_weight(sample, self.config.normalization.luminosity)?;

        let start = Instant::now();
        let events = source.load(&sample.name)?;
        debug!("{}: loaded {} events", sample.name, events.len());

        let (histogram, cutflow) = self.process_events(&events, weight)?;
        drop(events);

        info!(
            "{} [{}]: {} / {} events selected, weight {:.4}, yield {:.2} ({:.2?})",
            sample.name,
            sample.kind,
            cutflow.paired,
            cutflow.loaded,
            weight,
            histogram.integral(),
            start.elapsed()
        );

        Ok(SampleResult {
            sample: sample.clone(),
            weight,
            histogram,
            cutflow,
        })
    }

    /// Processes every sample. In concurrent mode samples run in parallel;
    /// results always come back in metadata order.
    pub fn run(&self, samples: &[Sample], source: &dyn EventSource) -> TfResult<Vec<SampleResult>> {
        // Validate every weight up front so a bad row aborts before any work.
        for sample in samples {
            sample_weight(sample, self.config.normalization.luminosity)?;
        }

        match self.config.run.mode {
            ExecutionMode::Sequential => samples
                .iter()
                .map(|s| self.process_sample(s, source))
                .collect(),
            ExecutionMode::Concurrent => samples
                .par_iter()
                .map(|s| self.process_sample(s, source))
                .collect(),
        }
    }
}

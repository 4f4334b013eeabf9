mod common;

use common::{good_pair_event, EventBuilder};
use std::f64::consts::PI;
use tauforge::analysis::{Analysis, Cutflow, GroupTotals, SampleResult};
use tauforge::config::{AnalysisConfig, ExecutionMode};
use tauforge::error::TauForgeError;
use tauforge::event::{ColumnarFile, Event, JsonDirSource, MemorySource};
use tauforge::histogram::WeightedHistogram;
use tauforge::sample::{Sample, SampleKind};
use tauforge::selection::Rejection;
use tauforge::toy::{default_recipes, ToyGenerator};

fn analysis(mode: ExecutionMode) -> Analysis {
    let mut config = AnalysisConfig::default();
    config.run.mode = mode;
    Analysis::new(config).unwrap()
}

fn sample(name: &str, xsec: f64, n: u64, kind: SampleKind) -> Sample {
    Sample {
        name: name.to_string(),
        cross_section: xsec,
        raw_event_count: n,
        kind,
    }
}

/// Back-to-back opposite-sign pair with a visible mass just above 70 GeV.
fn mass70_event() -> Event {
    EventBuilder::new()
        .muon(35.0, 0.0, 0.0, 1)
        .tau(35.0, 0.0, PI, -1, 0.05)
        .build()
}

fn toy_events(n: usize, seed: u64) -> Vec<Event> {
    let recipe = &default_recipes(n)[4];
    ToyGenerator::new(Some(seed)).events(recipe)
}

#[test]
fn test_evaluate_reports_mass_or_rejection() {
    let a = analysis(ExecutionMode::Sequential);

    let mass = a.evaluate(&mass70_event()).unwrap();
    assert!(mass > 70.0 && mass < 70.1, "mass {}", mass);

    let same_sign = EventBuilder::new()
        .muon(30.0, 0.0, 0.0, 1)
        .tau(30.0, 0.0, 2.0, 1, 0.1)
        .build();
    assert_eq!(a.evaluate(&same_sign), Err(Rejection::NoPair));

    let no_trigger = EventBuilder::new().trigger(false).build();
    assert_eq!(a.evaluate(&no_trigger), Err(Rejection::Trigger));
}

#[test]
fn test_data_and_simulation_stay_in_separate_totals() {
    let samples = vec![
        sample("Run2012B_TauPlusX", 1.0, 1, SampleKind::Data),
        sample("DYJetsToLL", 55.3, 1100, SampleKind::Simulation),
    ];
    let source = MemorySource::new()
        .with_sample("Run2012B_TauPlusX", vec![mass70_event()])
        .with_sample("DYJetsToLL", vec![mass70_event()]);

    let results = analysis(ExecutionMode::Concurrent)
        .run(&samples, &source)
        .unwrap();
    assert_eq!(results[0].weight, 1.0);
    assert!((results[1].weight - 55.3).abs() < 1e-9);

    let totals = GroupTotals::from_results(&results).unwrap();
    let observed = totals.observed.unwrap();
    let simulated = totals.simulated.unwrap();
    assert_eq!(observed.sumw[10], 1.0);
    assert!((simulated.sumw[10] - 55.3).abs() < 1e-9);
    assert_eq!(observed.integral(), 1.0);
    assert!((simulated.integral() - 55.3).abs() < 1e-9);
}

#[test]
fn test_same_sign_event_is_counted_but_not_filled() {
    let same_sign = EventBuilder::new()
        .muon(30.0, 0.0, 0.0, -1)
        .tau(30.0, 0.0, 3.0, -1, 0.1)
        .build();
    let (hist, cutflow) = analysis(ExecutionMode::Sequential)
        .process_events(&[same_sign, good_pair_event()], 2.0)
        .unwrap();

    assert_eq!(cutflow.loaded, 2);
    assert_eq!(cutflow.good_tau, 2);
    assert_eq!(cutflow.paired, 1);
    assert_eq!(hist.entries, 1);
    assert_eq!(hist.integral(), 2.0);
}

#[test]
fn test_sequential_and_concurrent_agree() {
    let events = toy_events(5_000, 42);
    let (h_seq, c_seq) = analysis(ExecutionMode::Sequential)
        .process_events(&events, 1.7)
        .unwrap();
    let (h_par, c_par) = analysis(ExecutionMode::Concurrent)
        .process_events(&events, 1.7)
        .unwrap();

    assert_eq!(c_seq, c_par);
    assert_eq!(h_seq.entries, h_par.entries);
    for bin in 0..h_seq.n_bins {
        assert!((h_seq.sumw[bin] - h_par.sumw[bin]).abs() < 1e-6);
        assert!((h_seq.sumw2[bin] - h_par.sumw2[bin]).abs() < 1e-6);
    }
    assert!((h_seq.overflow - h_par.overflow).abs() < 1e-6);
    assert!((h_seq.underflow - h_par.underflow).abs() < 1e-6);
}

#[test]
fn test_cutflow_is_monotone() {
    let (hist, cutflow) = analysis(ExecutionMode::Concurrent)
        .process_events(&toy_events(2_000, 3), 1.0)
        .unwrap();

    let counts: Vec<u64> = cutflow.stages().iter().map(|(_, n)| *n).collect();
    assert_eq!(counts[0], 2_000);
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);
    assert!(cutflow.paired > 0);
    assert_eq!(cutflow.in_range, hist.entries);
}

#[test]
fn test_cutflow_merge() {
    let mut a = Cutflow::default();
    a.record_rejection(Rejection::NoGoodTau);
    a.record_accepted(true);
    let mut b = Cutflow::default();
    b.record_rejection(Rejection::Trigger);
    b.record_accepted(false);

    a.merge(&b);
    assert_eq!(a.loaded, 4);
    assert_eq!(a.trigger, 3);
    assert_eq!(a.good_muon, 3);
    assert_eq!(a.good_tau, 2);
    assert_eq!(a.paired, 2);
    assert_eq!(a.in_range, 1);
}

#[test]
fn test_run_keeps_metadata_order() {
    let recipes = default_recipes(300);
    let mut generator = ToyGenerator::new(Some(11));
    let mut source = MemorySource::new();
    let samples: Vec<Sample> = recipes
        .iter()
        .map(|r| {
            source.insert(&r.name, generator.events(r));
            r.sample()
        })
        .collect();

    let results = analysis(ExecutionMode::Concurrent)
        .run(&samples, &source)
        .unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.sample.name.as_str()).collect();
    let expected: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, expected);
    assert!(results.iter().all(|r| r.cutflow.loaded == 300));
}

#[test]
fn test_bad_weight_aborts_before_loading() {
    // The source has no events at all: the weight check must fire first.
    let samples = vec![
        sample("Run2012B_TauPlusX", 1.0, 1, SampleKind::Data),
        sample("TTbar", 225.2, 0, SampleKind::Simulation),
    ];
    let result = analysis(ExecutionMode::Sequential).run(&samples, &MemorySource::new());
    assert!(matches!(result, Err(TauForgeError::Config(_))));
}

#[test]
fn test_missing_sample_is_an_error() {
    let samples = vec![sample("Run2012B_TauPlusX", 1.0, 1, SampleKind::Data)];
    let result = analysis(ExecutionMode::Concurrent).run(&samples, &MemorySource::new());
    assert!(matches!(result, Err(TauForgeError::Schema(_))));
}

#[test]
fn test_runs_from_json_directory() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonDirSource::new(dir.path());
    let samples = vec![
        sample("Run2012C_TauPlusX", 1.0, 1, SampleKind::Data),
        sample("GluGluToHToTauTau", 19.6, 2, SampleKind::Simulation),
    ];
    ColumnarFile::from_events(&[mass70_event(), good_pair_event()])
        .save_to_file(source.sample_path("Run2012C_TauPlusX"))
        .unwrap();
    ColumnarFile::from_events(&[mass70_event()])
        .save_to_file(source.sample_path("GluGluToHToTauTau"))
        .unwrap();

    let results = analysis(ExecutionMode::Sequential)
        .run(&samples, &source)
        .unwrap();
    let totals = GroupTotals::from_results(&results).unwrap();
    assert_eq!(totals.observed.unwrap().entries, 2);
    let simulated = totals.simulated.unwrap();
    assert!((simulated.sumw[10] - 1100.0 * 19.6 / 2.0).abs() < 1e-6);
}

fn result(name: &str, kind: SampleKind, fills: &[(f64, f64)]) -> SampleResult {
    let mut histogram = WeightedHistogram::new(20, 20.0, 120.0).unwrap();
    for &(x, w) in fills {
        histogram.fill(x, w);
    }
    SampleResult {
        sample: sample(name, 1.0, 1, kind),
        weight: 1.0,
        histogram,
        cutflow: Cutflow::default(),
    }
}

#[test]
fn test_group_totals_start_from_first_sample() {
    let mut totals = GroupTotals::default();
    assert!(totals.observed.is_none() && totals.simulated.is_none());

    let data = result("Run2012B", SampleKind::Data, &[(50.0, 1.0)]);
    totals.add(SampleKind::Data, &data.histogram).unwrap();
    assert_eq!(totals.observed.as_ref(), Some(&data.histogram));
    assert!(totals.simulated.is_none());

    totals.add(SampleKind::Data, &data.histogram).unwrap();
    assert_eq!(totals.observed.unwrap().sumw[6], 2.0);
}

#[test]
fn test_group_totals_do_not_depend_on_order() {
    let results = vec![
        result("A", SampleKind::Simulation, &[(30.0, 0.5), (99.0, 2.0)]),
        result("B", SampleKind::Data, &[(30.0, 1.0)]),
        result("C", SampleKind::Simulation, &[(30.0, 0.25), (130.0, 1.0)]),
    ];
    let mut reversed = results.clone();
    reversed.reverse();

    let forward = GroupTotals::from_results(&results).unwrap();
    let backward = GroupTotals::from_results(&reversed).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(forward.simulated.unwrap().sumw[2], 0.75);
}

#[test]
fn test_group_totals_reject_mismatched_binning() {
    let mut totals = GroupTotals::default();
    totals
        .add(SampleKind::Simulation, &WeightedHistogram::new(20, 20.0, 120.0).unwrap())
        .unwrap();
    let other = WeightedHistogram::new(10, 20.0, 120.0).unwrap();
    assert!(matches!(
        totals.add(SampleKind::Simulation, &other),
        Err(TauForgeError::Config(_))
    ));
}

#[test]
fn test_every_rejection_keeps_cutflow_monotone() {
    use strum::IntoEnumIterator;

    for rejection in Rejection::iter() {
        let mut cutflow = Cutflow::default();
        cutflow.record_rejection(rejection);
        let counts: Vec<u64> = cutflow.stages().iter().map(|(_, n)| *n).collect();
        assert_eq!(counts[0], 1, "{}", rejection);
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{}: {:?}", rejection, counts);
        assert_eq!(cutflow.paired, 0);
    }
}

mod common;

use common::{good_pair_event, EventBuilder};
use serde_json::json;
use std::fs;
use tauforge::consts::columns as col;
use tauforge::error::TauForgeError;
use tauforge::event::{Column, ColumnarFile, EventSource, JsonDirSource, MemorySource};
use tauforge::toy::ToyGenerator;

fn sample_events() -> Vec<tauforge::event::Event> {
    vec![
        good_pair_event(),
        EventBuilder::new().trigger(false).build(),
        EventBuilder::new()
            .muon(22.0, 1.1, -0.4, 1)
            .muon(18.5, -0.2, 2.9, -1)
            .tau(41.0, 0.3, -3.1, -1, 0.12)
            .build(),
    ]
}

fn schema_message<T: std::fmt::Debug>(result: Result<T, TauForgeError>) -> String {
    match result {
        Err(TauForgeError::Schema(msg)) => msg,
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_columnar_layout_restores_events() {
    let events = sample_events();
    let file = ColumnarFile::from_events(&events);

    assert_eq!(file.tree, "Events");
    assert_eq!(file.n_entries().unwrap(), 3);
    assert_eq!(
        file.columns[col::N_MUON],
        Column::Int(vec![1, 0, 2])
    );
    assert_eq!(file.to_events().unwrap(), events);
}

#[test]
fn test_json_file_on_disk_restores_events() {
    let events = ToyGenerator::new(Some(7)).events(&tauforge::toy::default_recipes(50)[4]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DYJetsToLL.json");
    ColumnarFile::from_events(&events).save_to_file(&path).unwrap();

    let loaded = ColumnarFile::load_from_file(&path).unwrap().to_events().unwrap();
    assert_eq!(loaded.len(), events.len());
    for (a, b) in loaded.iter().zip(&events) {
        assert_eq!(a.trigger_fired, b.trigger_fired);
        assert_eq!((a.n_muon, a.n_tau), (b.n_muon, b.n_tau));
        assert_eq!(a.muons.charge, b.muons.charge);
        assert_eq!(a.taus.id_iso_tight, b.taus.id_iso_tight);
        for (x, y) in a.taus.pt.iter().zip(&b.taus.pt) {
            assert!((x - y).abs() < 1e-9);
        }
    }
}

#[test]
fn test_integer_valued_floats_are_accepted() {
    let doc = json!({
        "tree": "Events",
        "columns": {
            (col::TRIGGER): [true],
            (col::N_MUON): [1],
            (col::N_TAU): [1],
            (col::MUON_PT): [[30]],
            (col::MUON_ETA): [[0]],
            (col::MUON_PHI): [[0]],
            (col::MUON_MASS): [[0]],
            (col::MUON_CHARGE): [[-1]],
            (col::MUON_TIGHT_ID): [[true]],
            (col::TAU_PT): [[35.5]],
            (col::TAU_ETA): [[0.1]],
            (col::TAU_PHI): [[3.0]],
            (col::TAU_MASS): [[1.0]],
            (col::TAU_CHARGE): [[1]],
            (col::TAU_REL_ISO_ALL): [[0.05]],
            (col::TAU_ID_DECAY_MODE): [[true]],
            (col::TAU_ID_ISO_TIGHT): [[true]],
            (col::TAU_ID_ANTI_ELE_TIGHT): [[true]],
            (col::TAU_ID_ANTI_MU_TIGHT): [[true]]
        }
    });
    let file = ColumnarFile::read_from(doc.to_string().as_bytes()).unwrap();
    let events = file.to_events().unwrap();
    assert_eq!(events[0].muons.pt, vec![30.0]);
    assert_eq!(events[0].taus.charge, vec![1]);
}

#[test]
fn test_empty_sample_has_no_events() {
    let file = ColumnarFile::from_events(&[]);
    let text = serde_json::to_string(&file).unwrap();
    let parsed = ColumnarFile::read_from(text.as_bytes()).unwrap();
    assert!(parsed.to_events().unwrap().is_empty());
}

#[test]
fn test_events_without_particles_survive_json() {
    let events = vec![EventBuilder::new().build(), EventBuilder::new().trigger(false).build()];
    let text = serde_json::to_string(&ColumnarFile::from_events(&events)).unwrap();
    let parsed = ColumnarFile::read_from(text.as_bytes()).unwrap();
    assert_eq!(parsed.to_events().unwrap(), events);
}

#[test]
fn test_wrong_tree_is_schema_error() {
    let mut file = ColumnarFile::from_events(&sample_events());
    file.tree = "Runs".to_string();
    let text = serde_json::to_string(&file).unwrap();
    let msg = schema_message(ColumnarFile::read_from(text.as_bytes()));
    assert!(msg.contains("Runs"), "{}", msg);
}

#[test]
fn test_missing_column_is_schema_error() {
    let mut file = ColumnarFile::from_events(&sample_events());
    file.columns.remove(col::TAU_REL_ISO_ALL);
    let msg = schema_message(file.to_events());
    assert!(msg.contains("missing column 'Tau_relIso_all'"), "{}", msg);
}

#[test]
fn test_wrong_column_type_is_schema_error() {
    let mut file = ColumnarFile::from_events(&sample_events());
    file.columns
        .insert(col::MUON_PT.to_string(), Column::Bool(vec![true, false, true]));
    let msg = schema_message(file.to_events());
    assert!(msg.contains("Muon_pt"), "{}", msg);
}

#[test]
fn test_column_length_mismatch_is_schema_error() {
    let mut file = ColumnarFile::from_events(&sample_events());
    file.columns
        .insert(col::N_TAU.to_string(), Column::Int(vec![1, 0]));
    let msg = schema_message(file.n_entries());
    assert!(msg.contains("nTau"), "{}", msg);
}

#[test]
fn test_ragged_particle_attributes_are_schema_error() {
    let mut file = ColumnarFile::from_events(&sample_events());
    file.columns.insert(
        col::MUON_ETA.to_string(),
        Column::JaggedFloat(vec![vec![0.5], vec![], vec![1.1]]),
    );
    let msg = schema_message(file.to_events());
    assert!(msg.contains("event 2"), "{}", msg);
    assert!(msg.contains("Muon attribute 'eta'"), "{}", msg);
}

#[test]
fn test_dir_source_reads_named_sample() {
    let dir = tempfile::tempdir().unwrap();
    let events = sample_events();
    let source = JsonDirSource::new(dir.path());
    ColumnarFile::from_events(&events)
        .save_to_file(source.sample_path("TTbar"))
        .unwrap();

    assert_eq!(source.load("TTbar").unwrap(), events);

    let msg = schema_message(source.load("W1JetsToLNu"));
    assert!(msg.contains("W1JetsToLNu"), "{}", msg);
}

#[test]
fn test_dir_source_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Broken.json"), "{ not json").unwrap();
    let source = JsonDirSource::new(dir.path());
    assert!(matches!(source.load("Broken"), Err(TauForgeError::Json(_))));
}

#[test]
fn test_memory_source_validates_events() {
    let mut ragged = good_pair_event();
    ragged.taus.rel_iso_all.clear();

    let source = MemorySource::new()
        .with_sample("good", sample_events())
        .with_sample("ragged", vec![ragged]);

    assert_eq!(source.load("good").unwrap().len(), 3);
    let msg = schema_message(source.load("ragged"));
    assert!(msg.contains("relIso_all"), "{}", msg);
    assert!(source.load("unknown").is_err());
}

#[test]
fn test_mixed_shape_column_is_schema_error() {
    let doc = json!({
        "tree": "Events",
        "columns": {
            (col::TRIGGER): [true, true],
            (col::MUON_PT): [[true], [1]]
        }
    });
    let msg = schema_message(ColumnarFile::read_from(doc.to_string().as_bytes()));
    assert!(msg.contains("Muon_pt"), "{}", msg);
}

#[test]
fn test_dir_source_names_sample_with_bad_column() {
    let dir = tempfile::tempdir().unwrap();
    let doc = json!({
        "tree": "Events",
        "columns": { (col::TRIGGER): [true], (col::TAU_PT): [["30"]] }
    });
    fs::write(dir.path().join("VBF_HToTauTau.json"), doc.to_string()).unwrap();

    let msg = schema_message(JsonDirSource::new(dir.path()).load("VBF_HToTauTau"));
    assert!(msg.contains("VBF_HToTauTau"), "{}", msg);
    assert!(msg.contains("Tau_pt"), "{}", msg);
}

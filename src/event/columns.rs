//! Columnar event files: one JSON document per sample holding named branches.
//!
//! Scalar branches are flat arrays (one value per event); per-particle
//! branches are arrays of arrays (one inner array per event).

use super::{Event, MuonCollection, TauCollection};
use crate::consts::{columns as col, EVENTS_TREE};
use crate::error::{TauForgeError, TfResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Column {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    JaggedBool(Vec<Vec<bool>>),
    JaggedInt(Vec<Vec<i64>>),
    JaggedFloat(Vec<Vec<f64>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Bool(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::JaggedBool(v) => v.len(),
            Column::JaggedInt(v) => v.len(),
            Column::JaggedFloat(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self) -> &'static str {
        match self {
            Column::Bool(_) => "bool",
            Column::Int(_) => "int",
            Column::Float(_) => "float",
            Column::JaggedBool(_) => "jagged bool",
            Column::JaggedInt(_) => "jagged int",
            Column::JaggedFloat(_) => "jagged float",
        }
    }

    // `[]` and `[[], []]` deserialize as the first matching variant, so empty
    // data of any element type must be accepted by every getter.
    fn all_inner_empty(&self) -> bool {
        match self {
            Column::JaggedBool(v) => v.iter().all(|e| e.is_empty()),
            Column::JaggedInt(v) => v.iter().all(|e| e.is_empty()),
            Column::JaggedFloat(v) => v.iter().all(|e| e.is_empty()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnarFile {
    pub tree: String,
    pub columns: BTreeMap<String, Column>,
}

/// On-disk layout before the columns are classified.
#[derive(Deserialize)]
struct RawColumnarFile {
    tree: String,
    columns: BTreeMap<String, serde_json::Value>,
}

fn mismatch(name: &str, wanted: &str, found: &Column) -> TauForgeError {
    TauForgeError::Schema(format!(
        "column '{}' should be {}, found {}",
        name,
        wanted,
        found.kind()
    ))
}

impl ColumnarFile {
    /// Malformed JSON is a `Json` error; a well-formed document with the
    /// wrong tree or a column of unsupported shape is a `Schema` error.
    pub fn read_from<R: Read>(reader: R) -> TfResult<Self> {
        let raw: RawColumnarFile = serde_json::from_reader(reader)?;
        if raw.tree != EVENTS_TREE {
            return Err(TauForgeError::Schema(format!(
                "expected tree '{}', found '{}'",
                EVENTS_TREE, raw.tree
            )));
        }

        let mut columns = BTreeMap::new();
        for (name, value) in raw.columns {
            let column: Column = serde_json::from_value(value).map_err(|_| {
                TauForgeError::Schema(format!(
                    "column '{}' is not a flat or jagged array of bool, int or float",
                    name
                ))
            })?;
            columns.insert(name, column);
        }

        Ok(Self {
            tree: raw.tree,
            columns,
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    pub fn write_to<W: Write>(&self, writer: W) -> TfResult<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> TfResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn get(&self, name: &str) -> TfResult<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| TauForgeError::Schema(format!("missing column '{}'", name)))
    }

    pub fn scalar_bool(&self, name: &str) -> TfResult<Vec<bool>> {
        match self.get(name)? {
            Column::Bool(v) => Ok(v.clone()),
            c if c.is_empty() => Ok(Vec::new()),
            c => Err(mismatch(name, "bool", c)),
        }
    }

    pub fn scalar_u32(&self, name: &str) -> TfResult<Vec<u32>> {
        match self.get(name)? {
            Column::Int(v) => v
                .iter()
                .map(|&x| {
                    u32::try_from(x).map_err(|_| {
                        TauForgeError::Schema(format!("column '{}' has invalid count {}", name, x))
                    })
                })
                .collect(),
            c if c.is_empty() => Ok(Vec::new()),
            c => Err(mismatch(name, "int", c)),
        }
    }

    pub fn jagged_f64(&self, name: &str) -> TfResult<Vec<Vec<f64>>> {
        match self.get(name)? {
            Column::JaggedFloat(v) => Ok(v.clone()),
            Column::JaggedInt(v) => Ok(v
                .iter()
                .map(|e| e.iter().map(|&x| x as f64).collect())
                .collect()),
            c if c.is_empty() => Ok(Vec::new()),
            c if c.all_inner_empty() => Ok(vec![Vec::new(); c.len()]),
            c => Err(mismatch(name, "jagged float", c)),
        }
    }

    pub fn jagged_i32(&self, name: &str) -> TfResult<Vec<Vec<i32>>> {
        match self.get(name)? {
            Column::JaggedInt(v) => v
                .iter()
                .map(|e| {
                    e.iter()
                        .map(|&x| {
                            i32::try_from(x).map_err(|_| {
                                TauForgeError::Schema(format!(
                                    "column '{}' value {} out of range",
                                    name, x
                                ))
                            })
                        })
                        .collect()
                })
                .collect(),
            c if c.is_empty() => Ok(Vec::new()),
            c if c.all_inner_empty() => Ok(vec![Vec::new(); c.len()]),
            c => Err(mismatch(name, "jagged int", c)),
        }
    }

    pub fn jagged_bool(&self, name: &str) -> TfResult<Vec<Vec<bool>>> {
        match self.get(name)? {
            Column::JaggedBool(v) => Ok(v.clone()),
            c if c.is_empty() => Ok(Vec::new()),
            c if c.all_inner_empty() => Ok(vec![Vec::new(); c.len()]),
            c => Err(mismatch(name, "jagged bool", c)),
        }
    }

    /// Number of events; every column must agree on it.
    pub fn n_entries(&self) -> TfResult<usize> {
        let n = self.get(col::TRIGGER)?.len();
        for (name, column) in &self.columns {
            if column.len() != n {
                return Err(TauForgeError::Schema(format!(
                    "column '{}' has {} entries, expected {}",
                    name,
                    column.len(),
                    n
                )));
            }
        }
        Ok(n)
    }

    /// Materializes row-wise events. Fails on the first schema violation.
    pub fn to_events(&self) -> TfResult<Vec<Event>> {
        let n = self.n_entries()?;

        let trigger = self.scalar_bool(col::TRIGGER)?;
        let n_muon = self.scalar_u32(col::N_MUON)?;
        let n_tau = self.scalar_u32(col::N_TAU)?;

        let mut mu_pt = self.jagged_f64(col::MUON_PT)?.into_iter();
        let mut mu_eta = self.jagged_f64(col::MUON_ETA)?.into_iter();
        let mut mu_phi = self.jagged_f64(col::MUON_PHI)?.into_iter();
        let mut mu_mass = self.jagged_f64(col::MUON_MASS)?.into_iter();
        let mut mu_charge = self.jagged_i32(col::MUON_CHARGE)?.into_iter();
        let mut mu_tight = self.jagged_bool(col::MUON_TIGHT_ID)?.into_iter();

        let mut tau_pt = self.jagged_f64(col::TAU_PT)?.into_iter();
        let mut tau_eta = self.jagged_f64(col::TAU_ETA)?.into_iter();
        let mut tau_phi = self.jagged_f64(col::TAU_PHI)?.into_iter();
        let mut tau_mass = self.jagged_f64(col::TAU_MASS)?.into_iter();
        let mut tau_charge = self.jagged_i32(col::TAU_CHARGE)?.into_iter();
        let mut tau_iso = self.jagged_f64(col::TAU_REL_ISO_ALL)?.into_iter();
        let mut tau_dm = self.jagged_bool(col::TAU_ID_DECAY_MODE)?.into_iter();
        let mut tau_iso_tight = self.jagged_bool(col::TAU_ID_ISO_TIGHT)?.into_iter();
        let mut tau_anti_ele = self.jagged_bool(col::TAU_ID_ANTI_ELE_TIGHT)?.into_iter();
        let mut tau_anti_mu = self.jagged_bool(col::TAU_ID_ANTI_MU_TIGHT)?.into_iter();

        // n_entries() guarantees every iterator yields exactly n items.
        let mut events = Vec::with_capacity(n);
        for i in 0..n {
            let event = Event {
                trigger_fired: trigger[i],
                n_muon: n_muon[i],
                n_tau: n_tau[i],
                muons: MuonCollection {
                    pt: mu_pt.next().unwrap_or_default(),
                    eta: mu_eta.next().unwrap_or_default(),
                    phi: mu_phi.next().unwrap_or_default(),
                    mass: mu_mass.next().unwrap_or_default(),
                    charge: mu_charge.next().unwrap_or_default(),
                    tight_id: mu_tight.next().unwrap_or_default(),
                },
                taus: TauCollection {
                    pt: tau_pt.next().unwrap_or_default(),
                    eta: tau_eta.next().unwrap_or_default(),
                    phi: tau_phi.next().unwrap_or_default(),
                    mass: tau_mass.next().unwrap_or_default(),
                    charge: tau_charge.next().unwrap_or_default(),
                    rel_iso_all: tau_iso.next().unwrap_or_default(),
                    id_decay_mode: tau_dm.next().unwrap_or_default(),
                    id_iso_tight: tau_iso_tight.next().unwrap_or_default(),
                    id_anti_ele_tight: tau_anti_ele.next().unwrap_or_default(),
                    id_anti_mu_tight: tau_anti_mu.next().unwrap_or_default(),
                },
            };
            event.validate().map_err(|e| match e {
                TauForgeError::Schema(msg) => {
                    TauForgeError::Schema(format!("event {}: {}", i, msg))
                }
                other => other,
            })?;
            events.push(event);
        }

        Ok(events)
    }

    /// Inverse of [`ColumnarFile::to_events`].
    pub fn from_events(events: &[Event]) -> Self {
        fn jagged<T: Clone, F: Fn(&Event) -> &Vec<T>>(events: &[Event], f: F) -> Vec<Vec<T>> {
            events.iter().map(|e| f(e).clone()).collect()
        }
        fn widen(v: Vec<Vec<i32>>) -> Vec<Vec<i64>> {
            v.into_iter()
                .map(|e| e.into_iter().map(i64::from).collect())
                .collect()
        }

        let mut columns = BTreeMap::new();
        columns.insert(
            col::TRIGGER.to_string(),
            Column::Bool(events.iter().map(|e| e.trigger_fired).collect()),
        );
        columns.insert(
            col::N_MUON.to_string(),
            Column::Int(events.iter().map(|e| i64::from(e.n_muon)).collect()),
        );
        columns.insert(
            col::N_TAU.to_string(),
            Column::Int(events.iter().map(|e| i64::from(e.n_tau)).collect()),
        );

        let floats: [(&str, fn(&Event) -> &Vec<f64>); 9] = [
            (col::MUON_PT, |e| &e.muons.pt),
            (col::MUON_ETA, |e| &e.muons.eta),
            (col::MUON_PHI, |e| &e.muons.phi),
            (col::MUON_MASS, |e| &e.muons.mass),
            (col::TAU_PT, |e| &e.taus.pt),
            (col::TAU_ETA, |e| &e.taus.eta),
            (col::TAU_PHI, |e| &e.taus.phi),
            (col::TAU_MASS, |e| &e.taus.mass),
            (col::TAU_REL_ISO_ALL, |e| &e.taus.rel_iso_all),
        ];
        for (name, f) in floats {
            columns.insert(name.to_string(), Column::JaggedFloat(jagged(events, f)));
        }

        columns.insert(
            col::MUON_CHARGE.to_string(),
            Column::JaggedInt(widen(jagged(events, |e| &e.muons.charge))),
        );
        columns.insert(
            col::TAU_CHARGE.to_string(),
            Column::JaggedInt(widen(jagged(events, |e| &e.taus.charge))),
        );

        let flags: [(&str, fn(&Event) -> &Vec<bool>); 5] = [
            (col::MUON_TIGHT_ID, |e| &e.muons.tight_id),
            (col::TAU_ID_DECAY_MODE, |e| &e.taus.id_decay_mode),
            (col::TAU_ID_ISO_TIGHT, |e| &e.taus.id_iso_tight),
            (col::TAU_ID_ANTI_ELE_TIGHT, |e| &e.taus.id_anti_ele_tight),
            (col::TAU_ID_ANTI_MU_TIGHT, |e| &e.taus.id_anti_mu_tight),
        ];
        for (name, f) in flags {
            columns.insert(name.to_string(), Column::JaggedBool(jagged(events, f)));
        }

        Self {
            tree: EVENTS_TREE.to_string(),
            columns,
        }
    }
}

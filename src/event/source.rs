use super::{ColumnarFile, Event};
use crate::error::{TauForgeError, TfResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the events of one sample, addressed by sample name.
///
/// The returned events are owned by the caller; the source holds no
/// per-sample state after `load` returns.
pub trait EventSource: Send + Sync {
    fn load(&self, sample: &str) -> TfResult<Vec<Event>>;
}

/// Reads `<root>/<sample>.json` columnar files.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    root: PathBuf,
}

impl JsonDirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn sample_path(&self, sample: &str) -> PathBuf {
        self.root.join(format!("{}.json", sample))
    }
}

impl EventSource for JsonDirSource {
    fn load(&self, sample: &str) -> TfResult<Vec<Event>> {
        let path = self.sample_path(sample);
        if !path.exists() {
            return Err(TauForgeError::Schema(format!(
                "sample '{}' not found at {:?}",
                sample, path
            )));
        }
        debug!("Reading columnar file {:?}", path);
        ColumnarFile::load_from_file(&path)
            .and_then(|file| file.to_events())
            .map_err(|e| match e {
                TauForgeError::Schema(msg) => {
                    TauForgeError::Schema(format!("sample '{}': {}", sample, msg))
                }
                other => other,
            })
    }
}

/// Events held in memory, keyed by sample name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    samples: HashMap<String, Vec<Event>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample(mut self, name: &str, events: Vec<Event>) -> Self {
        self.insert(name, events);
        self
    }

    pub fn insert(&mut self, name: &str, events: Vec<Event>) {
        self.samples.insert(name.to_string(), events);
    }
}

impl EventSource for MemorySource {
    fn load(&self, sample: &str) -> TfResult<Vec<Event>> {
        let events = self
            .samples
            .get(sample)
            .ok_or_else(|| TauForgeError::Schema(format!("sample '{}' not found", sample)))?;
        for (i, event) in events.iter().enumerate() {
            event.validate().map_err(|e| {
                TauForgeError::Schema(format!("sample '{}' event {}: {}", sample, i, e))
            })?;
        }
        Ok(events.clone())
    }
}

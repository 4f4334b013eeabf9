use crate::error::{TauForgeError, TfResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use tracing::info;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Recorded collision data, unit weight.
    Data,
    /// Monte Carlo, normalized to the integrated luminosity.
    Simulation,
}

impl SampleKind {
    /// Default rule when the metadata does not say: names containing the
    /// data pattern (e.g. `Run2012`) are data.
    pub fn classify(name: &str, data_pattern: &str) -> Self {
        if name.contains(data_pattern) {
            SampleKind::Data
        } else {
            SampleKind::Simulation
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    /// Cross section in pb.
    pub cross_section: f64,
    /// Events generated before any selection.
    pub raw_event_count: u64,
    pub kind: SampleKind,
}

impl Sample {
    pub fn is_data(&self) -> bool {
        self.kind == SampleKind::Data
    }
}

fn parse_event_count(raw: &str) -> Option<u64> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    // Some tables store counts as floats ("100000.0").
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Some(f as u64)
        }
        _ => None,
    }
}

/// Parses `sample,xsec,num_events[,kind]` rows (header required).
pub fn read_metadata<R: Read>(reader: R, data_pattern: &str) -> TfResult<Vec<Sample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut seen = HashSet::new();

    for (idx, result) in rdr.records().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let row = idx + 2;
        let rec = result?;

        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        if rec.len() < 3 {
            return Err(TauForgeError::Config(format!(
                "metadata row {}: expected 3 or 4 columns, found {}",
                row,
                rec.len()
            )));
        }

        let name = rec[0].to_string();
        if name.is_empty() {
            return Err(TauForgeError::Config(format!(
                "metadata row {}: empty sample name",
                row
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(TauForgeError::Config(format!(
                "metadata row {}: duplicate sample '{}'",
                row, name
            )));
        }

        let cross_section: f64 = rec[1].parse().map_err(|_| {
            TauForgeError::Config(format!(
                "metadata row {}: invalid cross section '{}'",
                row, &rec[1]
            ))
        })?;
        if !cross_section.is_finite() || cross_section < 0.0 {
            return Err(TauForgeError::Config(format!(
                "metadata row {}: cross section must be non-negative, got {}",
                row, cross_section
            )));
        }

        let raw_event_count = parse_event_count(&rec[2]).ok_or_else(|| {
            TauForgeError::Config(format!(
                "metadata row {}: invalid event count '{}'",
                row, &rec[2]
            ))
        })?;

        let kind = match rec.get(3) {
            Some(k) if !k.is_empty() => SampleKind::from_str(k).map_err(|_| {
                TauForgeError::Config(format!(
                    "metadata row {}: unknown sample kind '{}'",
                    row, k
                ))
            })?,
            _ => SampleKind::classify(&name, data_pattern),
        };

        info!(
            "Sample {}: {}, {} ({})",
            name, cross_section, raw_event_count, kind
        );

        samples.push(Sample {
            name,
            cross_section,
            raw_event_count,
            kind,
        });
    }

    if samples.is_empty() {
        return Err(TauForgeError::Config(
            "metadata lists no samples".to_string(),
        ));
    }

    Ok(samples)
}

pub fn load_metadata<P: AsRef<Path>>(path: P, data_pattern: &str) -> TfResult<Vec<Sample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        TauForgeError::Config(format!("cannot open metadata '{}': {}", path.display(), e))
    })?;
    read_metadata(file, data_pattern)
}

pub fn write_metadata<W: Write>(writer: W, samples: &[Sample]) -> TfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["sample", "xsec", "num_events", "kind"])?;
    for s in samples {
        wtr.write_record([
            s.name.clone(),
            s.cross_section.to_string(),
            s.raw_event_count.to_string(),
            s.kind.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

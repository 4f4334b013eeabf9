use crate::error::{TauForgeError, TfResult};
use crate::sample::{Sample, SampleKind};

/// Per-event weight of a sample, constant for all of its events.
///
/// Data events count once. Simulated events are scaled to the expected
/// yield `luminosity * cross_section` spread over the generated events.
pub fn sample_weight(sample: &Sample, luminosity: f64) -> TfResult<f64> {
    match sample.kind {
        SampleKind::Data => Ok(1.0),
        SampleKind::Simulation => {
            if sample.raw_event_count == 0 {
                return Err(TauForgeError::Config(format!(
                    "simulated sample '{}' has zero generated events",
                    sample.name
                )));
            }
            if !sample.cross_section.is_finite() || sample.cross_section < 0.0 {
                return Err(TauForgeError::Config(format!(
                    "simulated sample '{}' has invalid cross section {}",
                    sample.name, sample.cross_section
                )));
            }
            if !luminosity.is_finite() || luminosity <= 0.0 {
                return Err(TauForgeError::Config(format!(
                    "invalid integrated luminosity {}",
                    luminosity
                )));
            }
            Ok(luminosity * sample.cross_section / sample.raw_event_count as f64)
        }
    }
}

//! Registry — the host's composition root for instruments.
//!
//! Instruments are handed over explicitly; `snapshot()` is what the host calls
//! to note every readable value in a measurement file.

use crate::error::{ProbeError, Result};
use crate::instrument::{Instrument, InstrumentDescriptor};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One polled value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub instrument: String,
    pub parameter: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Default)]
pub struct Registry {
    instruments: Vec<Box<dyn Instrument>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, instrument: Box<dyn Instrument>) -> Result<()> {
        let name = instrument.name().to_string();
        if self.position(&name).is_some() {
            return Err(ProbeError::DuplicateInstrument(name));
        }
        info!(
            instrument = %name,
            tags = ?instrument.descriptor().tags,
            "instrument registered"
        );
        self.instruments.push(instrument);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn descriptors(&self) -> Vec<&InstrumentDescriptor> {
        self.instruments.iter().map(|i| i.descriptor()).collect()
    }

    /// Names of instruments carrying `tag`, in registration order.
    pub fn tagged(&self, tag: &str) -> Vec<&str> {
        self.instruments
            .iter()
            .filter(|i| i.descriptor().has_tag(tag))
            .map(|i| i.name())
            .collect()
    }

    pub fn get(&mut self, instrument: &str, parameter: &str) -> Result<f64> {
        self.instrument_mut(instrument)?.get(parameter)
    }

    pub fn set(&mut self, instrument: &str, parameter: &str, value: f64) -> Result<()> {
        self.instrument_mut(instrument)?.set(parameter, value)
    }

    /// Read every gettable parameter of every instrument once.
    /// Stops at the first failing read.
    pub fn snapshot(&mut self) -> Result<Vec<Sample>> {
        let mut samples = Vec::new();
        for instrument in self.instruments.iter_mut() {
            let name = instrument.name().to_string();
            let readable: Vec<(String, Option<String>)> = instrument
                .descriptor()
                .parameters
                .iter()
                .filter(|p| p.access.is_gettable())
                .map(|p| (p.name.clone(), p.unit.clone()))
                .collect();
            for (parameter, unit) in readable {
                let value = instrument.get(&parameter)?;
                samples.push(Sample {
                    instrument: name.clone(),
                    parameter,
                    value,
                    unit,
                });
            }
        }
        Ok(samples)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.instruments.iter().position(|i| i.name() == name)
    }

    fn instrument_mut(&mut self, name: &str) -> Result<&mut Box<dyn Instrument>> {
        match self.position(name) {
            Some(idx) => Ok(&mut self.instruments[idx]),
            None => Err(ProbeError::UnknownInstrument(name.to_string())),
        }
    }
}

//! Virtual UFO temperature instrument.
//!
//! Real hardware on the experiment, exposed as a read-only parameter so the
//! host notes its value in every measurement file. The TIP service reports
//! kelvin; this instrument reports millikelvin rounded to 0.01 mK.

use crate::error::{ProbeError, Result};
use crate::instrument::{Access, Instrument, InstrumentDescriptor, ParameterSpec, ValueType};
use tip_client::{ClientConfig, TemperatureSource, TipClient};
use tracing::debug;

/// Logical name of the TIP session.
pub const TIP_IDENTIFIER: &str = "tip";
/// The lab's TIP Raspberry Pi.
pub const DEFAULT_ADDRESS: &str = "pi-us74";
pub const TEMPERATURE: &str = "temperature";
pub const MILLIKELVIN: &str = "mK";
pub const VIRTUAL_TAG: &str = "virtual";

/// `round(kelvin * 1000, 2)`. No range check.
pub fn kelvin_to_millikelvin(kelvin: f64) -> f64 {
    round_to(kelvin * 1000.0, 2)
}

/// Rounds the exact binary value to `decimals` places, ties to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Registration descriptor for a UFO probe called `name`.
pub fn descriptor(name: impl Into<String>) -> InstrumentDescriptor {
    InstrumentDescriptor::new(name)
        .with_tag(VIRTUAL_TAG)
        .add_parameter(
            ParameterSpec::new(TEMPERATURE, ValueType::Float, Access::Get).with_unit(MILLIKELVIN),
        )
}

pub struct VirtualTemperatureUfo<S = TipClient> {
    descriptor: InstrumentDescriptor,
    source: S,
    validate: bool,
}

impl VirtualTemperatureUfo<TipClient> {
    /// Open the TIP session at `address` (default port and timeout).
    pub fn new(name: &str, address: &str) -> Result<Self> {
        Self::connect_with(name, &ClientConfig::new(address))
    }

    pub fn connect_with(name: &str, config: &ClientConfig) -> Result<Self> {
        let client = TipClient::connect_with(TIP_IDENTIFIER, config)?;
        Ok(Self::with_source(name, client))
    }
}

impl<S: TemperatureSource> VirtualTemperatureUfo<S> {
    pub fn with_source(name: impl Into<String>, source: S) -> Self {
        Self {
            descriptor: descriptor(name),
            source,
            validate: false,
        }
    }

    /// Reject non-finite and negative kelvin readings instead of passing them on.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &InstrumentDescriptor {
        &self.descriptor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// One remote read, converted to mK. Errors from the source pass through untouched.
    pub fn get_temperature(&mut self) -> Result<f64> {
        let raw = self.source.read_kelvin()?;
        if self.validate && !(raw.is_finite() && raw >= 0.0) {
            return Err(ProbeError::Implausible { raw });
        }
        let mk = kelvin_to_millikelvin(raw);
        debug!(instrument = %self.descriptor.name, raw, mk, "temperature");
        Ok(mk)
    }
}

impl<S: TemperatureSource> Instrument for VirtualTemperatureUfo<S> {
    fn descriptor(&self) -> &InstrumentDescriptor {
        &self.descriptor
    }

    fn get(&mut self, parameter: &str) -> Result<f64> {
        self.descriptor.gettable(parameter)?;
        self.get_temperature()
    }

    fn set(&mut self, parameter: &str, _value: f64) -> Result<()> {
        self.descriptor.settable(parameter).and(Err(ProbeError::ReadOnly {
            parameter: parameter.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tip_client::ClientError;

    /// Scripted source that counts requests.
    struct Scripted {
        replies: VecDeque<tip_client::Result<f64>>,
        calls: usize,
    }

    impl Scripted {
        fn new(replies: Vec<tip_client::Result<f64>>) -> Self {
            Self {
                replies: replies.into(),
                calls: 0,
            }
        }
    }

    impl TemperatureSource for Scripted {
        fn read_kelvin(&mut self) -> tip_client::Result<f64> {
            self.calls += 1;
            self.replies
                .pop_front()
                .unwrap_or(Err(ClientError::Disconnected))
        }
    }

    fn probe(replies: Vec<tip_client::Result<f64>>) -> VirtualTemperatureUfo<Scripted> {
        VirtualTemperatureUfo::with_source("ufo", Scripted::new(replies))
    }

    #[test]
    fn converts_and_rounds() {
        assert_eq!(kelvin_to_millikelvin(0.0123456), 12.35);
        assert_eq!(kelvin_to_millikelvin(0.0), 0.0);
        assert_eq!(kelvin_to_millikelvin(-0.001), -1.0);
    }

    #[test]
    fn rounding_near_half_boundaries() {
        // (kelvin, mK) pairs from the reference `round(r * 1000, 2)`
        let table = [
            (0.083735, 83.73),
            (0.228885, 228.88),
            (0.174725, 174.72),
            (0.0146335, 14.63),
            (0.0371245, 37.12),
            (0.1234565, 123.46),
            (0.0565425, 56.54),
            (-0.0020375, -2.04),
            (0.0099995, 10.0),
            (0.0100049, 10.0),
            (0.015, 15.0),
            (4.9e-6, 0.0),
            (4.2, 4200.0),
        ];
        for (kelvin, mk) in table {
            assert_eq!(kelvin_to_millikelvin(kelvin), mk, "{kelvin} K");
        }
    }

    #[test]
    fn rounding_keeps_non_finite() {
        assert!(kelvin_to_millikelvin(f64::NAN).is_nan());
        assert_eq!(kelvin_to_millikelvin(f64::INFINITY), f64::INFINITY);
        assert_eq!(kelvin_to_millikelvin(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn get_temperature_reads_once_per_call() {
        let mut p = probe(vec![Ok(0.0123456), Ok(0.0)]);
        assert_eq!(p.get_temperature().unwrap(), 12.35);
        assert_eq!(p.get_temperature().unwrap(), 0.0);
        assert_eq!(p.source().calls, 2);
    }

    #[test]
    fn negative_reading_passes_without_validation() {
        let mut p = probe(vec![Ok(-0.001)]);
        assert_eq!(p.get_temperature().unwrap(), -1.0);
    }

    #[test]
    fn nan_passes_without_validation() {
        let mut p = probe(vec![Ok(f64::NAN)]);
        assert!(p.get_temperature().unwrap().is_nan());
    }

    #[test]
    fn validation_rejects_implausible_readings() {
        let mut p = probe(vec![Ok(-0.001), Ok(f64::INFINITY), Ok(0.02)]).with_validation(true);
        assert!(matches!(
            p.get_temperature(),
            Err(ProbeError::Implausible { raw }) if raw == -0.001
        ));
        assert!(matches!(
            p.get_temperature(),
            Err(ProbeError::Implausible { .. })
        ));
        assert_eq!(p.get_temperature().unwrap(), 20.0);
    }

    #[test]
    fn read_errors_propagate_unchanged() {
        let mut p = probe(vec![Err(ClientError::Timeout { timeout_ms: 5000 })]);
        match p.get_temperature() {
            Err(ProbeError::Client(ClientError::Timeout { timeout_ms })) => {
                assert_eq!(timeout_ms, 5000)
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(p.source().calls, 1, "no retry");
    }

    #[test]
    fn failure_then_success_is_not_cached() {
        let mut p = probe(vec![Err(ClientError::Disconnected), Ok(0.015)]);
        assert!(p.get_temperature().is_err());
        assert_eq!(p.get_temperature().unwrap(), 15.0);
    }

    #[test]
    fn descriptor_declares_one_read_only_parameter() {
        let p = probe(vec![]);
        let d = p.descriptor();
        assert_eq!(d.name, "ufo");
        assert_eq!(d.tags, vec!["virtual".to_string()]);
        assert_eq!(d.parameters.len(), 1);
        let t = &d.parameters[0];
        assert_eq!(t.name, "temperature");
        assert_eq!(t.value_type, ValueType::Float);
        assert_eq!(t.access, Access::Get);
        assert_eq!(t.unit.as_deref(), Some("mK"));
    }

    #[test]
    fn instrument_get_and_set() {
        let mut p = probe(vec![Ok(0.0123456)]);
        assert_eq!(Instrument::get(&mut p, "temperature").unwrap(), 12.35);
        assert!(matches!(
            p.set("temperature", 10.0),
            Err(ProbeError::ReadOnly { .. })
        ));
        assert!(matches!(
            p.set("heater", 1.0),
            Err(ProbeError::UnknownParameter { .. })
        ));
        assert!(matches!(
            Instrument::get(&mut p, "pressure"),
            Err(ProbeError::UnknownParameter { .. })
        ));
        assert_eq!(p.source().calls, 1, "rejected calls never reach the source");
    }
}

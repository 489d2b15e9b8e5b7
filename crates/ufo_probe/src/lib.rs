//! UFO probe — the TIP temperature reading as a host instrument.
//!
//! # Architecture
//!
//! ```text
//! host composition root
//!   │  Registry::register(Box::new(probe))
//!   ▼
//! VirtualTemperatureUfo  ── descriptor: "temperature", float, get-only, mK
//!   │  get_temperature()
//!   ▼
//! TemperatureSource (TipClient)  ── kelvin
//! ```
//!
//! Each read goes to the remote service. Nothing is cached or retried here.

pub mod error;
pub mod instrument;
pub mod probe;
pub mod registry;

pub use error::{ProbeError, Result};
pub use instrument::{Access, Instrument, InstrumentDescriptor, ParameterSpec, ValueType};
pub use probe::{
    kelvin_to_millikelvin, VirtualTemperatureUfo, DEFAULT_ADDRESS, MILLIKELVIN, TEMPERATURE,
    TIP_IDENTIFIER, VIRTUAL_TAG,
};
pub use registry::{Registry, Sample};

//! TIP client — blocking access to the temperature service on the lab's
//! Raspberry Pi.
//!
//! ```text
//! TipClient::connect("tip", "pi-us74")
//!   │  TCP :9999
//!   ▼
//! get/T\n  ──►  TIP service
//!          ◄──  0.0123456\n   (kelvin)
//! ```
//!
//! Consumers depend on [`TemperatureSource`], not on the transport.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;

pub use client::{TemperatureSource, TipClient};
pub use config::{ClientConfig, DEFAULT_PORT};
pub use error::{ClientError, Result};

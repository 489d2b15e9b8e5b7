//! Host-side instrument contract.
//!
//! An instrument describes itself with an [`InstrumentDescriptor`] and the
//! host composition root registers it explicitly (see [`crate::Registry`]).
//! Nothing registers itself as a side effect of construction.

use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 64-bit float
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Get,
    Set,
    GetSet,
}

impl Access {
    pub fn is_gettable(self) -> bool {
        matches!(self, Access::Get | Access::GetSet)
    }

    pub fn is_settable(self) -> bool {
        matches!(self, Access::Set | Access::GetSet)
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub value_type: ValueType,
    pub access: Access,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, value_type: ValueType, access: Access) -> Self {
        Self {
            name: name.into(),
            value_type,
            access,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// What the host needs to know to register and poll an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDescriptor {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

impl InstrumentDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Declare a parameter. A later declaration with the same name replaces the earlier one.
    pub fn add_parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.retain(|p| p.name != spec.name);
        self.parameters.push(spec);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Look up a parameter the host wants to write, rejecting get-only ones.
    pub fn settable(&self, name: &str) -> Result<&ParameterSpec> {
        let spec = self.lookup(name)?;
        if !spec.access.is_settable() {
            return Err(ProbeError::ReadOnly {
                parameter: name.to_string(),
            });
        }
        Ok(spec)
    }

    pub fn gettable(&self, name: &str) -> Result<&ParameterSpec> {
        let spec = self.lookup(name)?;
        if !spec.access.is_gettable() {
            return Err(ProbeError::UnknownParameter {
                instrument: self.name.clone(),
                parameter: name.to_string(),
            });
        }
        Ok(spec)
    }

    fn lookup(&self, name: &str) -> Result<&ParameterSpec> {
        self.parameter(name).ok_or_else(|| ProbeError::UnknownParameter {
            instrument: self.name.clone(),
            parameter: name.to_string(),
        })
    }
}

/// An instrument as the host framework sees it.
pub trait Instrument {
    fn descriptor(&self) -> &InstrumentDescriptor;

    /// Read a parameter. Blocks until the value is available.
    fn get(&mut self, parameter: &str) -> Result<f64>;

    fn set(&mut self, parameter: &str, value: f64) -> Result<()>;

    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

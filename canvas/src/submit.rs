//! The flat simulation request record and its range checks.
//!
//! The simulation service takes one flat JSON object per job. Path fields use
//! the service's short keys (`h`, `angle`, `a`, `x0`..`y3`); the acceleration
//! model and pitch-shift method are fixed by the editor.

#[cfg(test)]
#[path = "submit_test.rs"]
mod submit_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::{PathKind, PathParameters};

pub const ACCELERATION_MODE: &str = "perfect";
pub const SHIFT_METHOD: &str = "timestretch";

/// Allowed clip length in seconds, checked on every request.
pub const AUDIO_DURATION_RANGE: (f64, f64) = (1.0, 30.0);

/// A simulation job request as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub path: PathKind,
    pub vehicle_type: String,
    pub acceleration_mode: &'static str,
    pub shift_method: &'static str,
    #[serde(flatten)]
    pub fields: BTreeMap<&'static str, f64>,
    pub speed: f64,
    pub audio_duration: f64,
}

impl SimulationRequest {
    #[must_use]
    pub fn new(vehicle_type: impl Into<String>, params: &PathParameters) -> Self {
        Self {
            path: params.kind(),
            vehicle_type: vehicle_type.into(),
            acceleration_mode: ACCELERATION_MODE,
            shift_method: SHIFT_METHOD,
            fields: params.path_fields().into_iter().collect(),
            speed: params.speed(),
            audio_duration: params.duration(),
        }
    }

    /// Value of a request field by its service key.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "speed" => Some(self.speed),
            "audio_duration" => Some(self.audio_duration),
            _ => self.fields.get(name).copied(),
        }
    }

    /// Check the request against the service's parameter catalog.
    ///
    /// Every catalog entry must be present and inside its bounds, and
    /// `audio_duration` must lie in [`AUDIO_DURATION_RANGE`]. Reports the first
    /// violation in catalog order.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] when a catalog entry has no value on
    /// this path, [`ValidationError::OutOfRange`] when a value is out of bounds.
    pub fn validate(&self, specs: &[ParamSpec]) -> Result<(), ValidationError> {
        let duration = ParamSpec::bounded("audio_duration", AUDIO_DURATION_RANGE.0, AUDIO_DURATION_RANGE.1);
        for spec in specs.iter().chain(std::iter::once(&duration)) {
            let value = self.field(&spec.name).ok_or_else(|| ValidationError::MissingField(spec.name.clone()))?;
            if !spec.contains(value) {
                tracing::warn!(name = %spec.name, value, "request field out of range");
                return Err(ValidationError::OutOfRange {
                    name: spec.name.clone(),
                    value,
                    min: spec.min.unwrap_or(f64::NEG_INFINITY),
                    max: spec.max.unwrap_or(f64::INFINITY),
                });
            }
        }
        Ok(())
    }
}

/// One entry of a path's `parameters` list in the service catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ParamSpec {
    #[must_use]
    pub fn bounded(name: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.to_owned(),
            value_type: Some("number".to_owned()),
            unit: None,
            default: None,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether `value` is finite and inside the bounds that are set.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Why a request was rejected before submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("please enter {0}")]
    MissingField(String),
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange { name: String, value: f64, min: f64, max: f64 },
}

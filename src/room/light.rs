//! Point lights attached to rooms.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// A point light. Serialized as-is for the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub radius: f64,
    pub intensity: f64,
}

/// Brightness modifier following `with light`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightModifier {
    Full,
    Dim,
    /// Fraction of full intensity (`50%` → 0.5).
    Percent(f64),
}

impl LightModifier {
    /// Multiplier applied to the base intensity.
    pub fn factor(self, dim_factor: f64) -> f64 {
        match self {
            LightModifier::Full => 1.0,
            LightModifier::Dim => dim_factor,
            LightModifier::Percent(p) => p,
        }
    }
}

//! Tracked raw materials and the alloy composition weights.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw materials whose prices drive the grade 444 surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Chromium,
    Molybdenum,
    Titanium,
}

impl Material {
    /// All tracked materials, in canonical order.
    pub const ALL: [Material; 3] = [Material::Chromium, Material::Molybdenum, Material::Titanium];

    /// Lowercase name, matching history column prefixes and report keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Chromium => "chromium",
            Material::Molybdenum => "molybdenum",
            Material::Titanium => "titanium",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Material::Chromium),
            "molybdenum" => Ok(Material::Molybdenum),
            "titanium" => Ok(Material::Titanium),
            other => Err(format!("unknown material: {other}")),
        }
    }
}

/// Alloy composition: weight percent per material.
///
/// The percentages reflect fractional alloy content and are not required to
/// sum to 100. Defaults are the midpoints of the grade 444 specification
/// ranges (Cr 17.5-19.5%, Mo 1.75-2.5%, Ti 0.3-0.5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    weights: BTreeMap<Material, f64>,
}

impl Composition {
    /// Build a composition from explicit weight percentages.
    pub fn new(weights: BTreeMap<Material, f64>) -> Self {
        Self { weights }
    }

    /// Weight percent for a material, if it is part of the composition.
    pub fn weight(&self, material: Material) -> Option<f64> {
        self.weights.get(&material).copied()
    }

    /// Iterate over (material, weight percent) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Material, f64)> + '_ {
        self.weights.iter().map(|(m, w)| (*m, *w))
    }

    /// Number of weighted materials.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if the composition has no weighted materials.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for Composition {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(Material::Chromium, 18.5);
        weights.insert(Material::Molybdenum, 2.1);
        weights.insert(Material::Titanium, 0.4);
        Self { weights }
    }
}

//! Composite surcharge calculator.
//!
//! Pure and deterministic. The same function turns actual monthly prices
//! into the published surcharge and forecast prices into the forecast
//! surcharge; calling it per forecast step with point, lower and upper
//! series keeps the composite bounds consistent with the per-material
//! bounds.

use crate::core::{Composition, Material};
use crate::error::{Result, SurchargeError};
use std::collections::BTreeMap;

/// Weighted contribution per material plus their sum.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeBreakdown {
    pub contributions: BTreeMap<Material, f64>,
    pub total: f64,
}

impl CompositeBreakdown {
    /// Contribution for one material, if it was weighted.
    pub fn contribution(&self, material: Material) -> Option<f64> {
        self.contributions.get(&material).copied()
    }
}

/// Compute the composite surcharge from per-material prices and weight
/// percentages.
///
/// Contribution is `weight% * price / 100`; the total is the exact sum of
/// contributions. Every material in `weights` must have a price, otherwise
/// the error names the missing material.
pub fn compute_composite(
    prices: &BTreeMap<Material, f64>,
    weights: &Composition,
) -> Result<CompositeBreakdown> {
    let mut contributions = BTreeMap::new();
    let mut total = 0.0;

    for (material, percent) in weights.iter() {
        let price = prices
            .get(&material)
            .copied()
            .ok_or(SurchargeError::MissingPrice(material))?;
        let contribution = percent * price / 100.0;
        total += contribution;
        contributions.insert(material, contribution);
    }

    Ok(CompositeBreakdown {
        contributions,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn prices(cr: f64, mo: f64, ti: f64) -> BTreeMap<Material, f64> {
        let mut p = BTreeMap::new();
        p.insert(Material::Chromium, cr);
        p.insert(Material::Molybdenum, mo);
        p.insert(Material::Titanium, ti);
        p
    }

    #[test]
    fn composite_matches_reference_breakdown() {
        let breakdown =
            compute_composite(&prices(12800.0, 36500.0, 7050.0), &Composition::default()).unwrap();

        assert_relative_eq!(
            breakdown.contribution(Material::Chromium).unwrap(),
            2368.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            breakdown.contribution(Material::Molybdenum).unwrap(),
            766.5,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            breakdown.contribution(Material::Titanium).unwrap(),
            28.2,
            epsilon = 1e-9
        );
        assert_relative_eq!(breakdown.total, 3162.7, epsilon = 1e-9);
    }

    #[test]
    fn total_is_exact_sum_of_contributions() {
        let breakdown =
            compute_composite(&prices(13123.45, 37001.2, 6999.99), &Composition::default())
                .unwrap();
        let sum: f64 = breakdown.contributions.values().sum();
        assert_eq!(breakdown.total, sum);
    }

    #[test]
    fn missing_price_names_the_material() {
        let mut partial = BTreeMap::new();
        partial.insert(Material::Chromium, 12800.0);
        partial.insert(Material::Molybdenum, 36500.0);

        let err = compute_composite(&partial, &Composition::default()).unwrap_err();
        assert!(matches!(
            err,
            SurchargeError::MissingPrice(Material::Titanium)
        ));
    }

    #[test]
    fn extra_prices_are_ignored() {
        // Prices may cover more materials than the composition weights.
        let mut weights = BTreeMap::new();
        weights.insert(Material::Chromium, 18.5);
        let composition = Composition::new(weights);

        let breakdown =
            compute_composite(&prices(10000.0, 36500.0, 7050.0), &composition).unwrap();
        assert_eq!(breakdown.contributions.len(), 1);
        assert_relative_eq!(breakdown.total, 1850.0, epsilon = 1e-9);
    }
}

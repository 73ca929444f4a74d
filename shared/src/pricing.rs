//! Cost calculator for fabricated letters
//!
//! Material and finish scale with letter volume; lighting and installation
//! scale with frontal area; mounting hardware scales with volume.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, OptionRates};
use crate::discount::BulkDiscount;
use crate::error::{QuoteError, QuoteResult};

/// Size of a single letter, in inches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
}

impl Dimensions {
    pub fn new(height: f64, width: f64, depth: f64) -> Self {
        Self {
            height,
            width,
            depth,
        }
    }

    /// Cubic inches per letter
    pub fn volume(&self) -> f64 {
        self.height * self.width * self.depth
    }

    /// Frontal square inches per letter
    pub fn area(&self) -> f64 {
        self.height * self.width
    }

    /// Reject non-finite, zero, and negative values
    pub fn ensure_positive(&self) -> QuoteResult<()> {
        for (field, value) in [
            ("height", self.height),
            ("width", self.width),
            ("depth", self.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(QuoteError::InvalidDimension { field, value });
            }
        }
        Ok(())
    }
}

/// Add-on options; independent of each other
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionSet {
    #[serde(default)]
    pub led_lighting: bool,
    #[serde(default)]
    pub mounting_hardware: bool,
    #[serde(default)]
    pub installation: bool,
}

/// Per-option cost for one letter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionCosts {
    pub led_lighting: f64,
    pub mounting_hardware: f64,
    pub installation: f64,
}

impl OptionCosts {
    pub fn total(&self) -> f64 {
        self.led_lighting + self.mounting_hardware + self.installation
    }

    fn scaled(&self, units: f64) -> Self {
        Self {
            led_lighting: self.led_lighting * units,
            mounting_hardware: self.mounting_hardware * units,
            installation: self.installation * units,
        }
    }
}

/// Option cost for a single letter of the given size
pub fn option_costs_per_unit(
    rates: &OptionRates,
    dimensions: Dimensions,
    options: OptionSet,
) -> OptionCosts {
    let area = dimensions.area();
    let volume = dimensions.volume();

    OptionCosts {
        led_lighting: if options.led_lighting {
            area * rates.led_rate * rates.led_multiplier
        } else {
            0.0
        },
        mounting_hardware: if options.mounting_hardware {
            volume * rates.mounting_rate
        } else {
            0.0
        },
        installation: if options.installation {
            area * rates.installation_rate
        } else {
            0.0
        },
    }
}

/// Itemized price of an order.
///
/// Values keep full floating-point precision; round only when presenting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdown {
    pub material_cost: f64,
    /// Only the cost the finish adds on top of the material
    pub finish_cost: f64,
    pub options_cost: f64,
    pub subtotal: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub discount_percentage: u32,
    pub tax: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Subtotal minus the bulk discount; the tax base
    pub fn after_discount(&self) -> f64 {
        self.subtotal - self.discount_amount
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percentage > 0
    }

    /// Apply a bulk discount and recompute tax on the discounted subtotal
    pub fn with_discount(self, discount: &BulkDiscount, tax_rate: f64) -> Self {
        let taxable = discount.adjusted_subtotal;
        let tax = taxable * tax_rate;
        Self {
            discount_amount: discount.amount,
            discount_percentage: discount.percentage,
            tax,
            total: taxable + tax,
            ..self
        }
    }
}

/// Price `total_units` letters of one size, material, finish and option set.
///
/// Discount fields are left at zero and tax is charged on the full
/// subtotal; `CostBreakdown::with_discount` applies the bulk tier.
pub fn compute_costs(
    catalog: &Catalog,
    material_rate: f64,
    dimensions: Dimensions,
    total_units: u32,
    finish: &str,
    options: OptionSet,
) -> QuoteResult<CostBreakdown> {
    dimensions.ensure_positive()?;
    if total_units == 0 {
        return Err(QuoteError::InvalidQuantity(total_units));
    }
    if !material_rate.is_finite() || material_rate <= 0.0 {
        return Err(QuoteError::InvalidCatalog(format!(
            "material rate {} must be positive",
            material_rate
        )));
    }

    let units = f64::from(total_units);
    let material_per_unit = dimensions.volume() * material_rate;
    let finish_per_unit = material_per_unit * (catalog.finish_multiplier(finish) - 1.0);
    let options_per_unit = option_costs_per_unit(&catalog.options, dimensions, options).total();

    let options_total = options_per_unit * units;
    let subtotal = (material_per_unit + finish_per_unit) * units + options_total;
    let tax = subtotal * catalog.tax_rate;

    Ok(CostBreakdown {
        material_cost: material_per_unit * units,
        finish_cost: finish_per_unit * units,
        options_cost: options_total,
        subtotal,
        discount_amount: 0.0,
        discount_percentage: 0,
        tax,
        total: subtotal + tax,
    })
}

/// Derived figures behind a breakdown, for detailed cost displays
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostDetails {
    pub volume_per_letter: f64,
    pub area_per_letter: f64,
    pub total_volume: f64,
    pub total_area: f64,
    pub material_rate: f64,
    pub material_cost_per_letter: f64,
    pub finish_multiplier: f64,
    /// Totals across all letters
    pub option_costs: OptionCosts,
    pub subtotal_after_discount: f64,
}

pub fn cost_details(
    catalog: &Catalog,
    material_rate: f64,
    dimensions: Dimensions,
    total_units: u32,
    finish: &str,
    options: OptionSet,
    costs: &CostBreakdown,
) -> CostDetails {
    let units = f64::from(total_units);
    let volume = dimensions.volume();
    let area = dimensions.area();

    CostDetails {
        volume_per_letter: volume,
        area_per_letter: area,
        total_volume: volume * units,
        total_area: area * units,
        material_rate,
        material_cost_per_letter: volume * material_rate,
        finish_multiplier: catalog.finish_multiplier(finish),
        option_costs: option_costs_per_unit(&catalog.options, dimensions, options).scaled(units),
        subtotal_after_discount: costs.after_discount(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn wood_rate() -> f64 {
        0.030
    }

    #[test]
    fn test_volume_and_area() {
        let dims = Dimensions::new(12.0, 8.0, 2.0);
        assert!(close(dims.volume(), 192.0));
        assert!(close(dims.area(), 96.0));
    }

    #[test]
    fn test_scenario_wood_abc_single_set() {
        let catalog = Catalog::default();
        let costs = compute_costs(
            &catalog,
            wood_rate(),
            Dimensions::new(12.0, 8.0, 2.0),
            3,
            "Standard",
            OptionSet::default(),
        )
        .unwrap();

        assert!(close(costs.material_cost, 17.28));
        assert_eq!(costs.finish_cost, 0.0);
        assert_eq!(costs.options_cost, 0.0);
        assert!(close(costs.subtotal, 17.28));
        assert!(close(costs.tax, 1.728));
        assert!(close(costs.total, 19.008));
        assert_eq!(costs.discount_percentage, 0);
        assert_eq!(costs.discount_amount, 0.0);
    }

    #[test]
    fn test_finish_cost_is_only_the_added_cost() {
        let catalog = Catalog::default();
        let costs = compute_costs(
            &catalog,
            wood_rate(),
            Dimensions::new(12.0, 8.0, 2.0),
            2,
            "Painted",
            OptionSet::default(),
        )
        .unwrap();

        // 5.76 per letter * 0.25 * 2 letters
        assert!(close(costs.finish_cost, 2.88));
        assert!(close(costs.subtotal, 11.52 + 2.88));
    }

    #[test]
    fn test_unknown_finish_prices_as_standard() {
        let catalog = Catalog::default();
        let dims = Dimensions::new(10.0, 10.0, 1.0);
        let standard =
            compute_costs(&catalog, 0.045, dims, 4, "Standard", OptionSet::default()).unwrap();
        let unknown =
            compute_costs(&catalog, 0.045, dims, 4, "Hammered Copper", OptionSet::default())
                .unwrap();
        assert_eq!(standard, unknown);
    }

    #[test]
    fn test_option_costs_per_unit() {
        let rates = OptionRates::default();
        let dims = Dimensions::new(12.0, 8.0, 2.0);
        let all = OptionSet {
            led_lighting: true,
            mounting_hardware: true,
            installation: true,
        };
        let costs = option_costs_per_unit(&rates, dims, all);

        assert!(close(costs.led_lighting, 96.0 * 15.0 * 1.2));
        assert!(close(costs.mounting_hardware, 192.0 * 2.0));
        assert!(close(costs.installation, 96.0 * 5.0));
        assert!(close(costs.total(), 1728.0 + 384.0 + 480.0));
    }

    #[test]
    fn test_options_scale_with_units() {
        let catalog = Catalog::default();
        let dims = Dimensions::new(12.0, 8.0, 2.0);
        let led_only = OptionSet {
            led_lighting: true,
            ..OptionSet::default()
        };
        let costs = compute_costs(&catalog, wood_rate(), dims, 5, "Standard", led_only).unwrap();

        assert!(close(costs.options_cost, 1728.0 * 5.0));
        assert!(close(costs.subtotal, 5.76 * 5.0 + 1728.0 * 5.0));
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let catalog = Catalog::default();
        for dims in [
            Dimensions::new(0.0, 8.0, 2.0),
            Dimensions::new(12.0, -1.0, 2.0),
            Dimensions::new(12.0, 8.0, f64::NAN),
            Dimensions::new(f64::INFINITY, 8.0, 2.0),
        ] {
            let result = compute_costs(&catalog, 0.03, dims, 1, "Standard", OptionSet::default());
            assert!(matches!(result, Err(QuoteError::InvalidDimension { .. })));
        }
    }

    #[test]
    fn test_rejects_zero_units() {
        let catalog = Catalog::default();
        let result = compute_costs(
            &catalog,
            0.03,
            Dimensions::new(1.0, 1.0, 1.0),
            0,
            "Standard",
            OptionSet::default(),
        );
        assert_eq!(result, Err(QuoteError::InvalidQuantity(0)));
    }

    #[test]
    fn test_with_discount_recomputes_tax() {
        let breakdown = CostBreakdown {
            material_cost: 1000.0,
            subtotal: 1000.0,
            tax: 100.0,
            total: 1100.0,
            ..CostBreakdown::default()
        };
        let discount = BulkDiscount {
            percentage: 10,
            amount: 100.0,
            adjusted_subtotal: 900.0,
        };
        let discounted = breakdown.with_discount(&discount, 0.10);

        assert_eq!(discounted.subtotal, 1000.0);
        assert_eq!(discounted.discount_percentage, 10);
        assert!(close(discounted.tax, 90.0));
        assert!(close(discounted.total, 990.0));
        assert!(close(discounted.after_discount(), 900.0));
    }

    #[test]
    fn test_cost_details() {
        let catalog = Catalog::default();
        let dims = Dimensions::new(12.0, 8.0, 2.0);
        let options = OptionSet {
            mounting_hardware: true,
            ..OptionSet::default()
        };
        let costs = compute_costs(&catalog, wood_rate(), dims, 3, "Matte", options).unwrap();
        let details = cost_details(&catalog, wood_rate(), dims, 3, "Matte", options, &costs);

        assert!(close(details.total_volume, 576.0));
        assert!(close(details.total_area, 288.0));
        assert!(close(details.material_cost_per_letter, 5.76));
        assert_eq!(details.finish_multiplier, 1.20);
        assert!(close(details.option_costs.mounting_hardware, 384.0 * 3.0));
        assert_eq!(details.option_costs.led_lighting, 0.0);
        assert!(close(details.subtotal_after_discount, costs.subtotal));
    }
}

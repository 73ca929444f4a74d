//! Pricing catalog: material rates, finish multipliers, option rates,
//! bulk-discount tiers and the flat tax rate.
//!
//! The catalog is plain data. `Catalog::default()` carries the standard
//! price list; deployments may replace it wholesale from configuration, in
//! which case `Catalog::validate` must pass before it is used.

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, QuoteResult};

/// Multiplier applied when a finish name is not in the catalog
pub const DEFAULT_FINISH_MULTIPLIER: f64 = 1.0;

/// Flat sales tax rate applied after discounts
pub const DEFAULT_TAX_RATE: f64 = 0.10;

/// Maximum number of characters in a quoted text
pub const DEFAULT_MAX_LETTERS: usize = 20;

/// Font used when none is given
pub const DEFAULT_FONT: &str = "helvetiker_bold";

/// A material and its price per cubic inch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialSpec {
    pub name: String,
    /// Currency per cubic inch
    pub rate: f64,
    #[serde(default)]
    pub description: String,
}

/// Surface treatment and its multiplier on material cost
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinishSpec {
    pub name: String,
    pub multiplier: f64,
    #[serde(default)]
    pub description: String,
}

/// Rates for the add-on options.
///
/// Lighting is `area * led_rate * led_multiplier`; the multiplier is a
/// separate surcharge and must not be folded into the base rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptionRates {
    /// Per square inch of frontal area
    pub led_rate: f64,
    pub led_multiplier: f64,
    /// Per cubic inch of letter volume
    pub mounting_rate: f64,
    /// Per square inch of frontal area
    pub installation_rate: f64,
}

impl Default for OptionRates {
    fn default() -> Self {
        Self {
            led_rate: 15.0,
            led_multiplier: 1.2,
            mounting_rate: 2.0,
            installation_rate: 5.0,
        }
    }
}

/// Bulk discount tier: orders of at least `min_units` letters get `percentage` off
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountTier {
    pub min_units: u32,
    pub percentage: u32,
}

/// Named color offered in the configurator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedColor {
    pub name: String,
    pub hex: String,
}

/// Complete price list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Catalog {
    pub materials: Vec<MaterialSpec>,
    pub finishes: Vec<FinishSpec>,
    pub options: OptionRates,
    /// Ascending by `min_units`, percentages non-decreasing
    pub discount_tiers: Vec<DiscountTier>,
    pub tax_rate: f64,
    pub colors: Vec<NamedColor>,
    pub fonts: Vec<String>,
    pub max_letters: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            materials: vec![
                material("Wood", 0.030, "Natural material with a warm grain"),
                material("Acrylic", 0.0375, "Lightweight, weather resistant plastic"),
                material("Metal", 0.045, "Durable metal for long-lasting signage"),
                material("Foam", 0.020, "Economical lightweight foam for indoor use"),
            ],
            finishes: vec![
                finish("Standard", 1.0, "Basic finish included with all materials"),
                finish("Painted", 1.25, "Custom color applied to the surface"),
                finish("High Gloss", 1.35, "Smooth, highly reflective coating"),
                finish("Matte", 1.20, "Flat, low-glare coating"),
            ],
            options: OptionRates::default(),
            discount_tiers: vec![
                DiscountTier { min_units: 100, percentage: 5 },
                DiscountTier { min_units: 250, percentage: 10 },
                DiscountTier { min_units: 500, percentage: 15 },
                DiscountTier { min_units: 1000, percentage: 20 },
            ],
            tax_rate: DEFAULT_TAX_RATE,
            colors: [
                ("Blue", "#2b5876"),
                ("Red", "#b22222"),
                ("Green", "#228b22"),
                ("Black", "#000000"),
                ("White", "#ffffff"),
                ("Gold", "#ffd700"),
                ("Silver", "#c0c0c0"),
                ("Bronze", "#cd7f32"),
                ("Purple", "#800080"),
                ("Orange", "#ffa500"),
            ]
            .into_iter()
            .map(|(name, hex)| NamedColor {
                name: name.to_string(),
                hex: hex.to_string(),
            })
            .collect(),
            fonts: [
                DEFAULT_FONT,
                "helvetiker_regular",
                "optimer_bold",
                "optimer_regular",
                "gentilis_bold",
                "gentilis_regular",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_letters: DEFAULT_MAX_LETTERS,
        }
    }
}

fn material(name: &str, rate: f64, description: &str) -> MaterialSpec {
    MaterialSpec {
        name: name.to_string(),
        rate,
        description: description.to_string(),
    }
}

fn finish(name: &str, multiplier: f64, description: &str) -> FinishSpec {
    FinishSpec {
        name: name.to_string(),
        multiplier,
        description: description.to_string(),
    }
}

impl Catalog {
    /// Look up a material by exact name
    pub fn material(&self, name: &str) -> QuoteResult<&MaterialSpec> {
        self.materials
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| QuoteError::UnknownMaterial(name.to_string()))
    }

    /// Multiplier for a finish; unknown names price as the standard finish
    pub fn finish_multiplier(&self, name: &str) -> f64 {
        self.finishes
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.multiplier)
            .unwrap_or(DEFAULT_FINISH_MULTIPLIER)
    }

    /// First palette entry, used when a request names no color
    pub fn default_color(&self) -> NamedColor {
        self.colors.first().cloned().unwrap_or_else(|| NamedColor {
            name: "Blue".to_string(),
            hex: "#2b5876".to_string(),
        })
    }

    /// Check the invariants every costing function relies on
    pub fn validate(&self) -> QuoteResult<()> {
        if self.materials.is_empty() {
            return Err(QuoteError::InvalidCatalog(
                "at least one material is required".to_string(),
            ));
        }
        for m in &self.materials {
            if !m.rate.is_finite() || m.rate <= 0.0 {
                return Err(QuoteError::InvalidCatalog(format!(
                    "material '{}' has non-positive rate {}",
                    m.name, m.rate
                )));
            }
        }
        for f in &self.finishes {
            if !f.multiplier.is_finite() || f.multiplier < 1.0 {
                return Err(QuoteError::InvalidCatalog(format!(
                    "finish '{}' multiplier {} is below 1.0",
                    f.name, f.multiplier
                )));
            }
        }

        let rates = [
            ("led_rate", self.options.led_rate),
            ("led_multiplier", self.options.led_multiplier),
            ("mounting_rate", self.options.mounting_rate),
            ("installation_rate", self.options.installation_rate),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(QuoteError::InvalidCatalog(format!(
                    "option rate {} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        let mut previous: Option<&DiscountTier> = None;
        for tier in &self.discount_tiers {
            if tier.percentage > 100 {
                return Err(QuoteError::InvalidCatalog(format!(
                    "discount tier at {} units exceeds 100%",
                    tier.min_units
                )));
            }
            if let Some(prev) = previous {
                if tier.min_units <= prev.min_units || tier.percentage < prev.percentage {
                    return Err(QuoteError::InvalidCatalog(
                        "discount tiers must be ascending with non-decreasing percentages"
                            .to_string(),
                    ));
                }
            }
            previous = Some(tier);
        }

        if !self.tax_rate.is_finite() || self.tax_rate < 0.0 {
            return Err(QuoteError::InvalidCatalog(format!(
                "tax rate {} must be non-negative",
                self.tax_rate
            )));
        }
        if self.max_letters == 0 {
            return Err(QuoteError::InvalidCatalog(
                "max_letters must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

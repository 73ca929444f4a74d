//! Quotation record and its portable form
//!
//! A `Quotation` is built once from validated inputs and a computed
//! breakdown and is read-only afterwards. Re-deriving a quote (for example
//! duplicating a saved one) builds a new record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::DEFAULT_FONT;
use crate::delivery::estimated_completion;
use crate::error::{QuoteError, QuoteResult};
use crate::formatting::format_dimensions;
use crate::pricing::{CostBreakdown, Dimensions, OptionSet};
use crate::validation::letter_count;

/// Font recorded when a portable form has none
pub const PORTABLE_DEFAULT_FONT: &str = "default";

/// Delivery estimate recorded when a portable form has none
pub const PORTABLE_DEFAULT_DELIVERY_DAYS: u32 = 7;

const FALLBACK_COLOR_NAME: &str = "Blue";
const FALLBACK_COLOR_HEX: &str = "#2b5876";

/// A display color
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorInfo {
    pub name: String,
    pub hex: String,
}

impl ColorInfo {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hex: hex.into(),
        }
    }
}

/// How colors map onto letters.
///
/// Per-letter maps are keyed by position in the trimmed text, since the
/// same character may appear twice in different colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorAssignment {
    Single(ColorInfo),
    PerLetter(BTreeMap<usize, ColorInfo>),
}

impl Default for ColorAssignment {
    fn default() -> Self {
        ColorAssignment::Single(ColorInfo::new(FALLBACK_COLOR_NAME, FALLBACK_COLOR_HEX))
    }
}

impl ColorAssignment {
    pub fn is_multi_color(&self) -> bool {
        matches!(self, ColorAssignment::PerLetter(_))
    }

    /// Per-letter maps must cover exactly positions `0..letter_count`
    pub fn check_covers(&self, letter_count: usize) -> QuoteResult<()> {
        let ColorAssignment::PerLetter(colors) = self else {
            return Ok(());
        };
        let exact = colors.len() == letter_count && colors.keys().copied().eq(0..letter_count);
        if exact {
            Ok(())
        } else {
            Err(QuoteError::ColorAssignmentMismatch {
                expected: letter_count,
                actual: colors.len(),
            })
        }
    }

    /// Position → hex for the preview renderer, whichever mode is in use
    pub fn letter_color_map(&self, letter_count: usize) -> BTreeMap<usize, String> {
        match self {
            ColorAssignment::Single(color) => (0..letter_count)
                .map(|i| (i, color.hex.clone()))
                .collect(),
            ColorAssignment::PerLetter(colors) => colors
                .iter()
                .map(|(i, color)| (*i, color.hex.clone()))
                .collect(),
        }
    }
}

/// Descriptive half of a quotation, as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationDetails {
    pub letters: String,
    pub font: String,
    pub material: String,
    pub dimensions: Dimensions,
    /// Number of sets
    pub quantity: u32,
    pub finish: String,
    pub options: OptionSet,
    pub colors: ColorAssignment,
}

/// An immutable priced quotation
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    id: Uuid,
    created_at: DateTime<Utc>,
    letters: String,
    font: String,
    material: String,
    dimensions: Dimensions,
    quantity: u32,
    total_units: u32,
    finish: String,
    options: OptionSet,
    colors: ColorAssignment,
    costs: CostBreakdown,
    estimated_delivery_days: u32,
}

/// Assemble a quotation with a fresh id and the current time
pub fn build_quotation(
    details: QuotationDetails,
    costs: CostBreakdown,
    delivery_days: u32,
) -> QuoteResult<Quotation> {
    build_quotation_at(details, costs, delivery_days, Uuid::new_v4(), Utc::now())
}

/// Assemble a quotation with a caller-chosen identity
pub fn build_quotation_at(
    details: QuotationDetails,
    costs: CostBreakdown,
    delivery_days: u32,
    id: Uuid,
    created_at: DateTime<Utc>,
) -> QuoteResult<Quotation> {
    let letters = details.letters.trim().to_string();
    let count = letter_count(&letters);
    if count == 0 {
        return Err(QuoteError::EmptyText);
    }
    if details.quantity == 0 {
        return Err(QuoteError::InvalidQuantity(details.quantity));
    }
    details.colors.check_covers(count)?;

    let total_units = u32::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(details.quantity))
        .ok_or(QuoteError::InvalidQuantity(details.quantity))?;

    Ok(Quotation {
        id,
        created_at,
        letters,
        font: details.font,
        material: details.material,
        dimensions: details.dimensions,
        quantity: details.quantity,
        total_units,
        finish: details.finish,
        options: details.options,
        colors: details.colors,
        costs,
        estimated_delivery_days: delivery_days,
    })
}

impl Quotation {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn letters(&self) -> &str {
        &self.letters
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Letters per set times sets
    pub fn total_units(&self) -> u32 {
        self.total_units
    }

    pub fn letter_count(&self) -> usize {
        letter_count(&self.letters)
    }

    pub fn finish(&self) -> &str {
        &self.finish
    }

    pub fn options(&self) -> OptionSet {
        self.options
    }

    pub fn colors(&self) -> &ColorAssignment {
        &self.colors
    }

    pub fn costs(&self) -> &CostBreakdown {
        &self.costs
    }

    pub fn estimated_delivery_days(&self) -> u32 {
        self.estimated_delivery_days
    }

    pub fn volume_per_letter(&self) -> f64 {
        self.dimensions.volume()
    }

    pub fn dimensions_label(&self) -> String {
        format_dimensions(
            self.dimensions.height,
            self.dimensions.width,
            self.dimensions.depth,
        )
    }

    pub fn estimated_delivery_date(&self) -> DateTime<Utc> {
        estimated_completion(self.created_at, self.estimated_delivery_days)
    }

    /// Descriptive fields, for re-deriving a new quotation from this one
    pub fn details(&self) -> QuotationDetails {
        QuotationDetails {
            letters: self.letters.clone(),
            font: self.font.clone(),
            material: self.material.clone(),
            dimensions: self.dimensions,
            quantity: self.quantity,
            finish: self.finish.clone(),
            options: self.options,
            colors: self.colors.clone(),
        }
    }

    pub fn to_portable_form(&self) -> PortableQuotation {
        let (color, color_hex, letter_colors) = match &self.colors {
            ColorAssignment::Single(c) => (Some(c.name.clone()), Some(c.hex.clone()), None),
            ColorAssignment::PerLetter(map) => (None, None, Some(map.clone())),
        };

        PortableQuotation {
            id: self.id,
            created_at: self.created_at,
            letters: self.letters.clone(),
            font: self.font.clone(),
            material: self.material.clone(),
            dimensions: self.dimensions_label(),
            height: self.dimensions.height,
            width: self.dimensions.width,
            depth: self.dimensions.depth,
            quantity: self.quantity,
            total_letters: Some(self.total_units),
            finish: self.finish.clone(),
            volume_per_letter: self.volume_per_letter(),
            led_lighting: self.options.led_lighting,
            mounting_hardware: self.options.mounting_hardware,
            installation: self.options.installation,
            multi_color: self.colors.is_multi_color(),
            color,
            color_hex,
            letter_colors,
            material_cost: self.costs.material_cost,
            finish_cost: self.costs.finish_cost,
            options_cost: self.costs.options_cost,
            subtotal: self.costs.subtotal,
            discount_amount: self.costs.discount_amount,
            discount_percentage: self.costs.discount_percentage,
            tax: self.costs.tax,
            total: self.costs.total,
            estimated_delivery_days: self.estimated_delivery_days,
        }
    }

    /// Rebuild a quotation from its portable form.
    ///
    /// Missing discount fields read as no discount, a missing font as
    /// `"default"`, a missing delivery estimate as 7 days.
    pub fn from_portable_form(form: PortableQuotation) -> QuoteResult<Quotation> {
        let colors = if form.multi_color {
            ColorAssignment::PerLetter(form.letter_colors.unwrap_or_default())
        } else {
            ColorAssignment::Single(ColorInfo::new(
                form.color.unwrap_or_else(|| FALLBACK_COLOR_NAME.to_string()),
                form.color_hex.unwrap_or_else(|| FALLBACK_COLOR_HEX.to_string()),
            ))
        };

        let details = QuotationDetails {
            letters: form.letters,
            font: form.font,
            material: form.material,
            dimensions: Dimensions::new(form.height, form.width, form.depth),
            quantity: form.quantity,
            finish: form.finish,
            options: OptionSet {
                led_lighting: form.led_lighting,
                mounting_hardware: form.mounting_hardware,
                installation: form.installation,
            },
            colors,
        };
        let costs = CostBreakdown {
            material_cost: form.material_cost,
            finish_cost: form.finish_cost,
            options_cost: form.options_cost,
            subtotal: form.subtotal,
            discount_amount: form.discount_amount,
            discount_percentage: form.discount_percentage,
            tax: form.tax,
            total: form.total,
        };

        let quotation = build_quotation_at(
            details,
            costs,
            form.estimated_delivery_days,
            form.id,
            form.created_at,
        )
        .map_err(|e| QuoteError::MalformedPortableForm(e.to_string()))?;

        if let Some(recorded) = form.total_letters {
            if recorded != quotation.total_units {
                return Err(QuoteError::MalformedPortableForm(format!(
                    "total_letters is {} but letters and quantity give {}",
                    recorded, quotation.total_units
                )));
            }
        }
        Ok(quotation)
    }
}

/// Flat, serialization-ready form of a quotation.
///
/// `dimensions` and `volume_per_letter` are derived values kept for
/// exporters; they are ignored when reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortableQuotation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub letters: String,
    #[serde(default = "default_font")]
    pub font: String,
    pub material: String,
    #[serde(default)]
    pub dimensions: String,
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_letters: Option<u32>,
    pub finish: String,
    #[serde(default)]
    pub volume_per_letter: f64,
    #[serde(default)]
    pub led_lighting: bool,
    #[serde(default)]
    pub mounting_hardware: bool,
    #[serde(default)]
    pub installation: bool,
    #[serde(default)]
    pub multi_color: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_colors: Option<BTreeMap<usize, ColorInfo>>,
    pub material_cost: f64,
    pub finish_cost: f64,
    pub options_cost: f64,
    pub subtotal: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub discount_percentage: u32,
    pub tax: f64,
    pub total: f64,
    #[serde(default = "default_delivery_days")]
    pub estimated_delivery_days: u32,
}

fn default_font() -> String {
    PORTABLE_DEFAULT_FONT.to_string()
}

fn default_delivery_days() -> u32 {
    PORTABLE_DEFAULT_DELIVERY_DAYS
}

impl PortableQuotation {
    pub fn to_json(&self) -> QuoteResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QuoteError::MalformedPortableForm(e.to_string()))
    }

    pub fn from_json(json: &str) -> QuoteResult<Self> {
        serde_json::from_str(json).map_err(|e| QuoteError::MalformedPortableForm(e.to_string()))
    }
}

impl From<&Quotation> for PortableQuotation {
    fn from(quotation: &Quotation) -> Self {
        quotation.to_portable_form()
    }
}

impl TryFrom<PortableQuotation> for Quotation {
    type Error = QuoteError;

    fn try_from(form: PortableQuotation) -> QuoteResult<Self> {
        Quotation::from_portable_form(form)
    }
}

/// Font to record when the caller gives none
pub fn font_or_default(font: Option<&str>) -> String {
    match font.map(str::trim) {
        Some(f) if !f.is_empty() => f.to_string(),
        _ => DEFAULT_FONT.to_string(),
    }
}

//! Quote engine: raw request in, priced quotation out
//!
//! Order of operations: sanitize and check letters, check dimensions and
//! quantity, resolve the material, price, apply the bulk tier (tax is
//! recomputed on the discounted subtotal), estimate delivery, build.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::delivery::estimate_delivery_days;
use crate::discount::apply_bulk_discount;
use crate::error::{QuoteError, QuoteResult};
use crate::pricing::{compute_costs, cost_details, CostBreakdown, CostDetails, Dimensions, OptionSet};
use crate::quotation::{
    build_quotation, font_or_default, ColorAssignment, ColorInfo, Quotation, QuotationDetails,
};
use crate::validation::{is_valid_hex_color, letter_count, validate_dimensions, validate_letters};

/// What a caller submits to get a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteRequest {
    pub letters: String,
    #[serde(default)]
    pub font: Option<String>,
    pub material: String,
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    /// Number of sets
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_finish")]
    pub finish: String,
    /// `led_lighting`, `mounting_hardware` and `installation` at top level
    #[serde(flatten)]
    pub options: OptionSet,
    /// Defaults to the first catalog color for every letter
    #[serde(default)]
    pub color: Option<ColorAssignment>,
}

fn default_quantity() -> u32 {
    1
}

fn default_finish() -> String {
    "Standard".to_string()
}

/// Live estimate shown before a quote is saved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteEstimate {
    pub total_units: u32,
    pub costs: CostBreakdown,
    pub details: CostDetails,
    pub estimated_delivery_days: u32,
}

struct PricedRequest {
    details: QuotationDetails,
    estimate: QuoteEstimate,
}

fn price_request(catalog: &Catalog, request: &QuoteRequest) -> QuoteResult<PricedRequest> {
    let letters = validate_letters(&request.letters, catalog.max_letters)?;
    let dimensions = Dimensions::new(request.height, request.width, request.depth);
    validate_dimensions(&dimensions)?;
    if request.quantity == 0 {
        return Err(QuoteError::InvalidQuantity(request.quantity));
    }
    let material = catalog.material(&request.material)?;

    let count = letter_count(&letters);
    let total_units = u32::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(request.quantity))
        .ok_or(QuoteError::InvalidQuantity(request.quantity))?;

    let colors = match &request.color {
        Some(assignment) => assignment.clone(),
        None => {
            let color = catalog.default_color();
            ColorAssignment::Single(ColorInfo::new(color.name, color.hex))
        }
    };
    colors.check_covers(count)?;
    check_hex_colors(&colors)?;

    let base = compute_costs(
        catalog,
        material.rate,
        dimensions,
        total_units,
        &request.finish,
        request.options,
    )?;
    let discount = apply_bulk_discount(&catalog.discount_tiers, base.subtotal, total_units);
    let costs = base.with_discount(&discount, catalog.tax_rate);

    let details = cost_details(
        catalog,
        material.rate,
        dimensions,
        total_units,
        &request.finish,
        request.options,
        &costs,
    );
    let estimated_delivery_days = estimate_delivery_days(
        total_units,
        dimensions.volume(),
        request.options.led_lighting,
        request.options.installation,
    );

    Ok(PricedRequest {
        details: QuotationDetails {
            letters,
            font: font_or_default(request.font.as_deref()),
            material: material.name.clone(),
            dimensions,
            quantity: request.quantity,
            finish: request.finish.clone(),
            options: request.options,
            colors,
        },
        estimate: QuoteEstimate {
            total_units,
            costs,
            details,
            estimated_delivery_days,
        },
    })
}

fn check_hex_colors(colors: &ColorAssignment) -> QuoteResult<()> {
    let invalid = match colors {
        ColorAssignment::Single(color) => (!is_valid_hex_color(&color.hex)).then_some(color),
        ColorAssignment::PerLetter(map) => map.values().find(|c| !is_valid_hex_color(&c.hex)),
    };
    match invalid {
        Some(color) => Err(QuoteError::InvalidColor(color.hex.clone())),
        None => Ok(()),
    }
}

/// Price a request without building a record
pub fn estimate(catalog: &Catalog, request: &QuoteRequest) -> QuoteResult<QuoteEstimate> {
    price_request(catalog, request).map(|priced| priced.estimate)
}

/// Validate, price and build a quotation
pub fn prepare_quotation(catalog: &Catalog, request: &QuoteRequest) -> QuoteResult<Quotation> {
    let priced = price_request(catalog, request)?;
    build_quotation(
        priced.details,
        priced.estimate.costs,
        priced.estimate.estimated_delivery_days,
    )
}

impl From<&Quotation> for QuoteRequest {
    fn from(quotation: &Quotation) -> Self {
        let dimensions = quotation.dimensions();
        QuoteRequest {
            letters: quotation.letters().to_string(),
            font: Some(quotation.font().to_string()),
            material: quotation.material().to_string(),
            height: dimensions.height,
            width: dimensions.width,
            depth: dimensions.depth,
            quantity: quotation.quantity(),
            finish: quotation.finish().to_string(),
            options: quotation.options(),
            color: Some(quotation.colors().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request(letters: &str, quantity: u32) -> QuoteRequest {
        QuoteRequest {
            letters: letters.to_string(),
            font: None,
            material: "Wood".to_string(),
            height: 12.0,
            width: 8.0,
            depth: 2.0,
            quantity,
            finish: "Standard".to_string(),
            options: OptionSet::default(),
            color: None,
        }
    }

    #[test]
    fn test_prepare_quotation_scenario() {
        let catalog = Catalog::default();
        let q = prepare_quotation(&catalog, &request("ABC", 1)).unwrap();

        assert_eq!(q.total_units(), 3);
        assert!((q.costs().subtotal - 17.28).abs() < 1e-9);
        assert!((q.costs().tax - 1.728).abs() < 1e-9);
        assert!((q.costs().total - 19.008).abs() < 1e-9);
        assert_eq!(q.estimated_delivery_days(), 3);
        assert_eq!(q.font(), "helvetiker_bold");
        assert_eq!(
            q.colors(),
            &ColorAssignment::Single(ColorInfo::new("Blue", "#2b5876"))
        );
    }

    #[test]
    fn test_bulk_order_gets_discount_and_taxed_after() {
        let catalog = Catalog::default();
        // 5 letters x 30 sets = 150 units
        let q = prepare_quotation(&catalog, &request("HELLO", 30)).unwrap();
        let costs = q.costs();

        assert_eq!(q.total_units(), 150);
        assert_eq!(costs.discount_percentage, 5);
        assert!((costs.discount_amount - costs.subtotal * 0.05).abs() < 1e-9);
        assert!((costs.tax - (costs.subtotal - costs.discount_amount) * 0.10).abs() < 1e-9);
        assert_eq!(q.estimated_delivery_days(), 14);
    }

    #[test]
    fn test_letters_are_sanitized() {
        let catalog = Catalog::default();
        let q = prepare_quotation(&catalog, &request("  <b>EAT</b>  ", 1)).unwrap();
        assert_eq!(q.letters(), "EAT");
        assert_eq!(q.total_units(), 3);
    }

    #[test]
    fn test_rejections() {
        let catalog = Catalog::default();

        assert_eq!(
            estimate(&catalog, &request("<br>", 1)),
            Err(QuoteError::EmptyText)
        );

        let mut tall = request("A", 1);
        tall.height = 120.01;
        assert!(matches!(
            estimate(&catalog, &tall),
            Err(QuoteError::InvalidDimension { field: "height", .. })
        ));

        assert_eq!(
            estimate(&catalog, &request("A", 0)),
            Err(QuoteError::InvalidQuantity(0))
        );

        let mut unknown = request("A", 1);
        unknown.material = "Granite".to_string();
        assert_eq!(
            estimate(&catalog, &unknown),
            Err(QuoteError::UnknownMaterial("Granite".to_string()))
        );
    }

    #[test]
    fn test_validation_runs_before_material_lookup() {
        let catalog = Catalog::default();
        let mut req = request("", 1);
        req.material = "Granite".to_string();
        assert_eq!(estimate(&catalog, &req), Err(QuoteError::EmptyText));
    }

    #[test]
    fn test_per_letter_colors_follow_positions() {
        let catalog = Catalog::default();
        let mut req = request("AA", 1);
        let colors: BTreeMap<usize, ColorInfo> = [
            (0, ColorInfo::new("Red", "#b22222")),
            (1, ColorInfo::new("Gold", "#ffd700")),
        ]
        .into_iter()
        .collect();
        req.color = Some(ColorAssignment::PerLetter(colors));

        let q = prepare_quotation(&catalog, &req).unwrap();
        let map = q.colors().letter_color_map(q.letter_count());
        assert_eq!(map[&0], "#b22222");
        assert_eq!(map[&1], "#ffd700");
    }

    #[test]
    fn test_invalid_hex_color() {
        let catalog = Catalog::default();
        let mut req = request("A", 1);
        req.color = Some(ColorAssignment::Single(ColorInfo::new("Red", "red")));
        assert_eq!(
            estimate(&catalog, &req),
            Err(QuoteError::InvalidColor("red".to_string()))
        );
    }

    #[test]
    fn test_request_round_trips_through_quotation() {
        let catalog = Catalog::default();
        let mut original = request("SIGN", 2);
        original.finish = "Painted".to_string();
        original.options.installation = true;

        let q = prepare_quotation(&catalog, &original).unwrap();
        let again = prepare_quotation(&catalog, &QuoteRequest::from(&q)).unwrap();

        assert_ne!(again.id(), q.id());
        assert_eq!(again.costs(), q.costs());
        assert_eq!(again.details(), q.details());
    }

    #[test]
    fn test_request_json_defaults() {
        let json = r#"{ "letters": "OPEN", "material": "Foam", "height": 10, "width": 6, "depth": 1 }"#;
        let req: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.quantity, 1);
        assert_eq!(req.finish, "Standard");
        assert_eq!(req.options, OptionSet::default());
        assert!(req.color.is_none());
    }

    #[test]
    fn test_request_json_flat_options_and_color() {
        let json = r##"{
            "letters": "AB",
            "material": "Metal",
            "height": 10,
            "width": 6,
            "depth": 1,
            "led_lighting": true,
            "installation": true,
            "color": { "per_letter": {
                "0": { "name": "Red", "hex": "#b22222" },
                "1": { "name": "Gold", "hex": "#ffd700" }
            } }
        }"##;
        let req: QuoteRequest = serde_json::from_str(json).unwrap();
        assert!(req.options.led_lighting);
        assert!(!req.options.mounting_hardware);
        assert!(req.options.installation);
        assert!(matches!(req.color, Some(ColorAssignment::PerLetter(ref m)) if m.len() == 2));
    }
}

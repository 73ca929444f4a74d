//! WebAssembly module for the letter quotation configurator
//!
//! Provides client-side computation for:
//! - Live price estimates while the customer edits a sign
//! - Input validation and text sanitization
//! - Delivery estimates and price formatting

use serde::Serialize;
use shared::{
    estimate, estimate_delivery_days, format_currency, format_percentage, is_valid_hex_color,
    sanitize_text, validate_inputs, Catalog, QuoteEstimate, QuoteRequest,
};
use wasm_bindgen::prelude::*;

/// Estimate with display strings for the summary panel
#[derive(Serialize)]
struct EstimateView {
    #[serde(flatten)]
    estimate: QuoteEstimate,
    subtotal_display: String,
    discount_display: Option<String>,
    tax_display: String,
    total_display: String,
}

fn log_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

fn estimate_json(request_json: &str) -> Result<String, String> {
    let request: QuoteRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;
    let estimate = estimate(&Catalog::default(), &request).map_err(|e| e.to_string())?;

    let costs = estimate.costs;
    let view = EstimateView {
        subtotal_display: format_currency(costs.subtotal),
        discount_display: costs.has_discount().then(|| {
            format!(
                "-{} ({})",
                format_currency(costs.discount_amount),
                format_percentage(costs.discount_percentage)
            )
        }),
        tax_display: format_currency(costs.tax),
        total_display: format_currency(costs.total),
        estimate,
    };
    serde_json::to_string(&view).map_err(|e| format!("Serialization failed: {}", e))
}

/// Price a quote request (JSON) against the standard catalog
#[wasm_bindgen]
pub fn estimate_quote(request_json: &str) -> Result<String, JsValue> {
    estimate_json(request_json).map_err(|e| {
        log_error(&e);
        JsValue::from_str(&e)
    })
}

/// Dimensions in range and text not blank
#[wasm_bindgen]
pub fn validate_letter_inputs(height: f64, width: f64, depth: f64, letters: &str) -> bool {
    validate_inputs(height, width, depth, letters)
}

/// Strip markup and disallowed characters
#[wasm_bindgen]
pub fn sanitize_letters(text: &str) -> String {
    sanitize_text(text)
}

#[wasm_bindgen]
pub fn is_hex_color(hex: &str) -> bool {
    is_valid_hex_color(hex)
}

/// Production lead time in business days
#[wasm_bindgen]
pub fn delivery_days(
    total_units: u32,
    volume_per_letter: f64,
    led_lighting: bool,
    installation: bool,
) -> u32 {
    estimate_delivery_days(total_units, volume_per_letter, led_lighting, installation)
}

#[wasm_bindgen]
pub fn format_price(amount: f64) -> String {
    format_currency(amount)
}

/// Standard catalog as JSON, for populating the configurator
#[wasm_bindgen]
pub fn catalog_json() -> String {
    serde_json::to_string(&Catalog::default()).unwrap_or_else(|e| {
        log_error(&format!("Catalog serialization failed: {}", e));
        "{}".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_estimate_json() {
        let json = estimate_json(
            r#"{ "letters": "ABC", "material": "Wood", "height": 12, "width": 8, "depth": 2 }"#,
        )
        .unwrap();
        let view: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(view["total_units"], 3);
        assert_eq!(view["total_display"], "$19.01");
        assert_eq!(view["subtotal_display"], "$17.28");
        assert!(view["discount_display"].is_null());
    }

    #[test]
    fn test_estimate_json_with_discount() {
        let json = estimate_json(
            r#"{ "letters": "HELLO", "material": "Foam", "height": 6, "width": 4, "depth": 1, "quantity": 20 }"#,
        )
        .unwrap();
        let view: Value = serde_json::from_str(&json).unwrap();
        assert!(view["discount_display"].as_str().unwrap().ends_with("(5%)"));
    }

    #[test]
    fn test_estimate_json_errors() {
        assert!(estimate_json("{").unwrap_err().starts_with("Invalid request JSON"));

        let err = estimate_json(
            r#"{ "letters": "ABC", "material": "Granite", "height": 12, "width": 8, "depth": 2 }"#,
        )
        .unwrap_err();
        assert!(err.contains("Granite"));
    }

    #[test]
    fn test_validate_letter_inputs() {
        assert!(validate_letter_inputs(120.0, 120.0, 24.0, "A"));
        assert!(!validate_letter_inputs(120.01, 10.0, 1.0, "A"));
        assert!(!validate_letter_inputs(10.0, 10.0, 0.0, "A"));
        assert!(!validate_letter_inputs(10.0, 10.0, 1.0, "  "));
    }

    #[test]
    fn test_sanitize_and_colors() {
        assert_eq!(sanitize_letters("<b>OPEN</b> 24/7"), "OPEN 247");
        assert!(is_hex_color("#ffd700"));
        assert!(!is_hex_color("gold"));
    }

    #[test]
    fn test_delivery_and_price() {
        assert_eq!(delivery_days(120, 600.0, true, true), 19);
        assert_eq!(format_price(1234.5), "$1,234.50");
    }

    #[test]
    fn test_catalog_json() {
        let catalog: Value = serde_json::from_str(&catalog_json()).unwrap();
        assert_eq!(catalog["tax_rate"], 0.1);
        assert_eq!(catalog["discount_tiers"].as_array().unwrap().len(), 4);
    }
}

//! Quotation exports: CSV row, printable text document, portable JSON

use serde::Serialize;
use shared::{format_currency, format_percentage, ColorAssignment, Quotation};

use crate::config::CompanyConfig;
use crate::error::{AppError, AppResult};

/// Download formats offered for a saved quotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Document,
    Json,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Document => "text/plain; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Document => "txt",
            ExportFormat::Json => "json",
        }
    }
}

/// Flattened CSV row
#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Quotation Date")]
    date: String,
    #[serde(rename = "Letters")]
    letters: &'a str,
    #[serde(rename = "Font")]
    font: &'a str,
    #[serde(rename = "Material")]
    material: &'a str,
    #[serde(rename = "Dimensions")]
    dimensions: String,
    #[serde(rename = "Sets of Letters")]
    sets: u32,
    #[serde(rename = "Total Letters")]
    total_letters: u32,
    #[serde(rename = "Finish")]
    finish: &'a str,
    #[serde(rename = "Material Cost")]
    material_cost: f64,
    #[serde(rename = "Finish Cost")]
    finish_cost: f64,
    #[serde(rename = "Options Cost")]
    options_cost: f64,
    #[serde(rename = "LED Lighting")]
    led_lighting: bool,
    #[serde(rename = "Mounting Hardware")]
    mounting_hardware: bool,
    #[serde(rename = "Installation")]
    installation: bool,
    #[serde(rename = "Subtotal")]
    subtotal: f64,
    #[serde(rename = "Discount Percentage")]
    discount_percentage: String,
    #[serde(rename = "Discount Amount")]
    discount_amount: f64,
    #[serde(rename = "Tax")]
    tax: f64,
    #[serde(rename = "Total")]
    total: f64,
    #[serde(rename = "Color Mode")]
    color_mode: &'static str,
    #[serde(rename = "Color")]
    color: Option<&'a str>,
    #[serde(rename = "Letter Colors")]
    letter_colors: Option<String>,
    #[serde(rename = "Estimated Delivery Days")]
    delivery_days: u32,
}

/// One header row and one data row
pub fn to_csv(quotation: &Quotation) -> AppResult<String> {
    let costs = quotation.costs();
    let options = quotation.options();
    let (color_mode, color, letter_colors) = match quotation.colors() {
        ColorAssignment::Single(c) => ("Single Color", Some(c.name.as_str()), None),
        ColorAssignment::PerLetter(map) => {
            let json = serde_json::to_string(map)
                .map_err(|e| AppError::Internal(format!("Color serialization error: {}", e)))?;
            ("Multi-Color", None, Some(json))
        }
    };

    let row = CsvRow {
        date: quotation.created_at().format("%Y-%m-%d").to_string(),
        letters: quotation.letters(),
        font: quotation.font(),
        material: quotation.material(),
        dimensions: quotation.dimensions_label(),
        sets: quotation.quantity(),
        total_letters: quotation.total_units(),
        finish: quotation.finish(),
        material_cost: costs.material_cost,
        finish_cost: costs.finish_cost,
        options_cost: costs.options_cost,
        led_lighting: options.led_lighting,
        mounting_hardware: options.mounting_hardware,
        installation: options.installation,
        subtotal: costs.subtotal,
        discount_percentage: format_percentage(costs.discount_percentage),
        discount_amount: costs.discount_amount,
        tax: costs.tax,
        total: costs.total,
        color_mode,
        color,
        letter_colors,
        delivery_days: quotation.estimated_delivery_days(),
    };

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.serialize(row)
        .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}

const LABEL_WIDTH: usize = 26;

fn line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{:<width$}{}\n", label, value, width = LABEL_WIDTH));
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.chars().count()));
    out.push('\n');
}

fn yes_no(selected: bool) -> &'static str {
    if selected {
        "Yes"
    } else {
        "No"
    }
}

/// Printable quotation. Amounts are rounded to cents here only.
pub fn to_document(quotation: &Quotation, company: &CompanyConfig) -> String {
    let costs = quotation.costs();
    let options = quotation.options();
    let mut out = String::new();

    out.push_str(&format!("{}\n", company.name));
    out.push_str(&format!("{} | {}\n\n", company.email, company.phone));
    out.push_str("3D LETTER QUOTATION\n");
    out.push_str("===================\n");
    line(&mut out, "Quotation:", &quotation.id().to_string());
    line(
        &mut out,
        "Date:",
        &quotation.created_at().format("%B %d, %Y").to_string(),
    );

    section(&mut out, "Order Information");
    line(&mut out, "Letters:", quotation.letters());
    line(&mut out, "Font:", quotation.font());
    line(&mut out, "Material:", quotation.material());
    line(&mut out, "Dimensions:", &quotation.dimensions_label());
    line(&mut out, "Sets of Letters:", &quotation.quantity().to_string());
    line(&mut out, "Total Letters:", &quotation.total_units().to_string());
    line(&mut out, "Finish:", quotation.finish());
    match quotation.colors() {
        ColorAssignment::Single(color) => {
            line(&mut out, "Color:", &format!("{} ({})", color.name, color.hex));
        }
        ColorAssignment::PerLetter(map) => {
            line(&mut out, "Color Mode:", "Multi-Color");
            let letters: Vec<char> = quotation.letters().chars().collect();
            for (position, color) in map {
                let letter = letters.get(*position).copied().unwrap_or(' ');
                line(
                    &mut out,
                    &format!("  Letter {} '{}':", position + 1, letter),
                    &format!("{} ({})", color.name, color.hex),
                );
            }
        }
    }

    section(&mut out, "Selected Options");
    line(&mut out, "LED Lighting:", yes_no(options.led_lighting));
    line(&mut out, "Mounting Hardware:", yes_no(options.mounting_hardware));
    line(&mut out, "Installation:", yes_no(options.installation));

    section(&mut out, "Cost Breakdown");
    line(&mut out, "Material Cost:", &format_currency(costs.material_cost));
    line(&mut out, "Finish Cost:", &format_currency(costs.finish_cost));
    line(&mut out, "Options Cost:", &format_currency(costs.options_cost));
    line(&mut out, "Subtotal:", &format_currency(costs.subtotal));
    if costs.has_discount() {
        line(
            &mut out,
            &format!(
                "Bulk Discount ({}):",
                format_percentage(costs.discount_percentage)
            ),
            &format!("-{}", format_currency(costs.discount_amount)),
        );
    }
    line(&mut out, "Tax:", &format_currency(costs.tax));
    line(&mut out, "Total:", &format_currency(costs.total));

    section(&mut out, "Delivery Information");
    line(
        &mut out,
        "Production Time:",
        &format!("{} business days", quotation.estimated_delivery_days()),
    );
    line(
        &mut out,
        "Estimated Completion:",
        &quotation
            .estimated_delivery_date()
            .format("%B %d, %Y")
            .to_string(),
    );

    out.push_str("\nThank you for your business!\n");
    out
}

pub fn to_json(quotation: &Quotation) -> AppResult<String> {
    Ok(quotation.to_portable_form().to_json()?)
}

/// `quotation_<letters>.<ext>` with whitespace and unsafe characters replaced
pub fn file_name(quotation: &Quotation, format: ExportFormat) -> String {
    let stem: String = quotation
        .letters()
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' && c != '/' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("quotation_{}.{}", stem, format.extension())
}

/// Rendered body for a format
pub fn render(
    quotation: &Quotation,
    format: ExportFormat,
    company: &CompanyConfig,
) -> AppResult<String> {
    match format {
        ExportFormat::Csv => to_csv(quotation),
        ExportFormat::Document => Ok(to_document(quotation, company)),
        ExportFormat::Json => to_json(quotation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{prepare_quotation, Catalog, ColorInfo, OptionSet, QuoteRequest};
    use std::collections::BTreeMap;

    fn quote(letters: &str, quantity: u32) -> Quotation {
        let request = QuoteRequest {
            letters: letters.to_string(),
            font: None,
            material: "Wood".to_string(),
            height: 12.0,
            width: 8.0,
            depth: 2.0,
            quantity,
            finish: "Standard".to_string(),
            options: OptionSet {
                led_lighting: true,
                mounting_hardware: false,
                installation: false,
            },
            color: None,
        };
        prepare_quotation(&Catalog::default(), &request).unwrap()
    }

    #[test]
    fn test_csv_has_header_and_one_row() {
        let csv = to_csv(&quote("EAT HERE", 1)).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Quotation Date");
        assert_eq!(&headers[5], "Sets of Letters");
        assert!(headers.iter().any(|h| h == "Estimated Delivery Days"));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "EAT HERE");
        assert_eq!(&rows[0][6], "8");
        assert_eq!(&rows[0][11], "true");
    }

    #[test]
    fn test_csv_multi_color_as_json() {
        let colors: BTreeMap<usize, ColorInfo> = [
            (0, ColorInfo::new("Red", "#b22222")),
            (1, ColorInfo::new("Gold", "#ffd700")),
        ]
        .into_iter()
        .collect();
        let request = QuoteRequest {
            color: Some(ColorAssignment::PerLetter(colors)),
            ..QuoteRequest::from(&quote("OK", 1))
        };
        let q = prepare_quotation(&Catalog::default(), &request).unwrap();

        let csv = to_csv(&q).unwrap();
        assert!(csv.contains("Multi-Color"));
        assert!(csv.contains("#ffd700"));
    }

    #[test]
    fn test_document_sections() {
        let doc = to_document(&quote("ABC", 1), &CompanyConfig::default());
        assert!(doc.starts_with("SignCraft 3D\n"));
        for heading in [
            "Order Information",
            "Selected Options",
            "Cost Breakdown",
            "Delivery Information",
        ] {
            assert!(doc.contains(heading), "missing {}", heading);
        }
        assert!(doc.contains("Thank you for your business!"));
        assert!(!doc.contains("Bulk Discount"));
    }

    #[test]
    fn test_document_shows_discount_when_applied() {
        // 5 letters x 20 sets = 100 units
        let doc = to_document(&quote("HELLO", 20), &CompanyConfig::default());
        assert!(doc.contains("Bulk Discount (5%):"));
    }

    #[test]
    fn test_document_amounts_are_currency() {
        let request = QuoteRequest {
            options: OptionSet::default(),
            ..QuoteRequest::from(&quote("ABC", 1))
        };
        let q = prepare_quotation(&Catalog::default(), &request).unwrap();
        let doc = to_document(&q, &CompanyConfig::default());
        assert!(doc.contains("$17.28"));
        assert!(doc.contains("$19.01"));
    }

    #[test]
    fn test_file_names() {
        let q = quote("EAT HERE", 1);
        assert_eq!(file_name(&q, ExportFormat::Csv), "quotation_EAT_HERE.csv");
        assert_eq!(file_name(&q, ExportFormat::Document), "quotation_EAT_HERE.txt");
        assert_eq!(file_name(&q, ExportFormat::Json), "quotation_EAT_HERE.json");
    }

    #[test]
    fn test_json_export_reads_back() {
        let q = quote("JSON", 2);
        let json = to_json(&q).unwrap();
        let form = shared::PortableQuotation::from_json(&json).unwrap();
        assert_eq!(Quotation::from_portable_form(form).unwrap(), q);
    }
}

//! Domain errors for quotation pricing

use thiserror::Error;

/// Failures raised by validation, costing, and record (de)construction.
///
/// Every variant is a pure value: no operation in this crate mutates
/// anything before returning one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Invalid {field}: {value} is outside the allowed range")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("Letters must not be empty")]
    EmptyText,

    #[error("Letters exceed the maximum of {max} characters ({actual} given)")]
    TextTooLong { max: usize, actual: usize },

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    #[error("Color assignment covers {actual} positions but the text has {expected} letters")]
    ColorAssignmentMismatch { expected: usize, actual: usize },

    #[error("Invalid color value: {0}")]
    InvalidColor(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Malformed portable quotation: {0}")]
    MalformedPortableForm(String),
}

impl QuoteError {
    /// Stable machine-readable code, used by API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            QuoteError::InvalidDimension { .. } => "INVALID_DIMENSION",
            QuoteError::EmptyText => "EMPTY_TEXT",
            QuoteError::TextTooLong { .. } => "TEXT_TOO_LONG",
            QuoteError::UnknownMaterial(_) => "UNKNOWN_MATERIAL",
            QuoteError::InvalidQuantity(_) => "INVALID_QUANTITY",
            QuoteError::ColorAssignmentMismatch { .. } => "COLOR_ASSIGNMENT_MISMATCH",
            QuoteError::InvalidColor(_) => "INVALID_COLOR",
            QuoteError::InvalidCatalog(_) => "INVALID_CATALOG",
            QuoteError::MalformedPortableForm(_) => "MALFORMED_QUOTATION",
        }
    }

    /// Input field the error refers to, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            QuoteError::InvalidDimension { field, .. } => Some(*field),
            QuoteError::EmptyText | QuoteError::TextTooLong { .. } => Some("letters"),
            QuoteError::UnknownMaterial(_) => Some("material"),
            QuoteError::InvalidQuantity(_) => Some("quantity"),
            QuoteError::ColorAssignmentMismatch { .. } | QuoteError::InvalidColor(_) => {
                Some("color")
            }
            QuoteError::InvalidCatalog(_) | QuoteError::MalformedPortableForm(_) => None,
        }
    }

    /// Whether the caller can fix this by correcting the request
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            QuoteError::InvalidCatalog(_) | QuoteError::MalformedPortableForm(_)
        )
    }
}

/// Result alias for domain operations
pub type QuoteResult<T> = Result<T, QuoteError>;

//! Pricing domain for fabricated 3D letter signage
//!
//! Everything here is pure: catalog data, validation, costing, discounts,
//! delivery estimates and the quotation record. The backend and the WASM
//! bindings both build on this crate.

pub mod catalog;
pub mod delivery;
pub mod discount;
pub mod engine;
pub mod error;
pub mod formatting;
pub mod pricing;
pub mod quotation;
pub mod validation;

pub use catalog::*;
pub use delivery::*;
pub use discount::*;
pub use engine::*;
pub use error::*;
pub use formatting::*;
pub use pricing::*;
pub use quotation::*;
pub use validation::*;

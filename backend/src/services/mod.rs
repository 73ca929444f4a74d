//! Business logic services for the letter quotation server

pub mod auth;
pub mod export;
pub mod quotation;

pub use auth::AuthService;
pub use quotation::QuotationService;

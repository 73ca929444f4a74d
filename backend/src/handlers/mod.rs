//! HTTP handlers

pub mod auth;
pub mod catalog;
pub mod health;
pub mod quotation;

pub use auth::{change_password, login, register};
pub use catalog::get_catalog;
pub use health::health_check;
pub use quotation::{
    create_quote, delete_quote, duplicate_quote, estimate_quote, export_quote, get_quote,
    list_quotes,
};

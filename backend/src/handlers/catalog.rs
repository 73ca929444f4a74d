//! Catalog handler: the price list the configurator renders

use axum::{extract::State, Json};
use shared::Catalog;

use crate::AppState;

/// Materials, finishes, options, tiers, colors and fonts in effect
pub async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.quotes.catalog().clone())
}

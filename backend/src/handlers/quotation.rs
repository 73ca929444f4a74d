//! Quotation handlers: live estimates, saved quotes and exports

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{PortableQuotation, QuoteEstimate, QuoteRequest};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::export::{self, ExportFormat};
use crate::AppState;

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>, // "csv", "document" or "json"
}

fn parse_format(format: Option<&str>) -> AppResult<ExportFormat> {
    match format {
        None | Some("csv") => Ok(ExportFormat::Csv),
        Some("document") | Some("pdf") => Ok(ExportFormat::Document),
        Some("json") => Ok(ExportFormat::Json),
        Some(other) => Err(AppError::Validation {
            field: "format".to_string(),
            message: format!("Unsupported export format: {}", other),
        }),
    }
}

/// Price a request without saving it
pub async fn estimate_quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteRequest>,
) -> AppResult<Json<QuoteEstimate>> {
    Ok(Json(state.quotes.estimate(&body)?))
}

/// Price and save a quotation
pub async fn create_quote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<QuoteRequest>,
) -> AppResult<(StatusCode, Json<PortableQuotation>)> {
    let quotation = state.quotes.create(&user.username, &body).await?;
    Ok((StatusCode::CREATED, Json(quotation.to_portable_form())))
}

/// Saved quotations, oldest first
pub async fn list_quotes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<PortableQuotation>> {
    let quotes = state.quotes.list(&user.username).await;
    Json(quotes.iter().map(PortableQuotation::from).collect())
}

pub async fn get_quote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PortableQuotation>> {
    let quotation = state.quotes.get(&user.username, id).await?;
    Ok(Json(quotation.to_portable_form()))
}

pub async fn delete_quote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.quotes.delete(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Re-price a saved quotation into a new one
pub async fn duplicate_quote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<PortableQuotation>)> {
    let copy = state.quotes.duplicate(&user.username, id).await?;
    Ok((StatusCode::CREATED, Json(copy.to_portable_form())))
}

/// Download a saved quotation
pub async fn export_quote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let format = parse_format(query.format.as_deref())?;
    let quotation = state.quotes.get(&user.username, id).await?;
    let body = export::render(&quotation, format, &state.config.company)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::file_name(&quotation, format)
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

//! Quotation service: pricing requests and keeping each user's saved quotes

use std::collections::HashMap;
use std::sync::Arc;

use shared::{estimate, prepare_quotation, Catalog, QuoteEstimate, QuoteRequest, Quotation};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Prices requests against one catalog and owns every saved quotation.
///
/// Saved lists are per user and keep insertion order.
#[derive(Clone)]
pub struct QuotationService {
    catalog: Arc<Catalog>,
    saved: Arc<RwLock<HashMap<String, Vec<Quotation>>>>,
}

impl QuotationService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            saved: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Live estimate; nothing is stored
    pub fn estimate(&self, request: &QuoteRequest) -> AppResult<QuoteEstimate> {
        let result = estimate(&self.catalog, request)?;
        tracing::debug!(
            "Estimated {} units at {:.4}",
            result.total_units,
            result.costs.total
        );
        Ok(result)
    }

    /// Price a request and save the resulting quotation
    pub async fn create(&self, username: &str, request: &QuoteRequest) -> AppResult<Quotation> {
        let quotation = prepare_quotation(&self.catalog, request)?;
        tracing::info!(
            "Created quotation {} for {} ({} units, total {:.4})",
            quotation.id(),
            username,
            quotation.total_units(),
            quotation.costs().total
        );
        self.save(username, quotation.clone()).await;
        Ok(quotation)
    }

    pub async fn save(&self, username: &str, quotation: Quotation) {
        self.saved
            .write()
            .await
            .entry(username.to_string())
            .or_default()
            .push(quotation);
    }

    pub async fn list(&self, username: &str) -> Vec<Quotation> {
        self.saved
            .read()
            .await
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn get(&self, username: &str, id: Uuid) -> AppResult<Quotation> {
        self.saved
            .read()
            .await
            .get(username)
            .and_then(|quotes| quotes.iter().find(|q| q.id() == id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Quotation {}", id)))
    }

    pub async fn delete(&self, username: &str, id: Uuid) -> AppResult<()> {
        let mut saved = self.saved.write().await;
        let quotes = saved
            .get_mut(username)
            .ok_or_else(|| AppError::NotFound(format!("Quotation {}", id)))?;
        let before = quotes.len();
        quotes.retain(|q| q.id() != id);
        if quotes.len() == before {
            return Err(AppError::NotFound(format!("Quotation {}", id)));
        }

        tracing::info!("Deleted quotation {} for {}", id, username);
        Ok(())
    }

    /// Re-price a saved quotation's inputs into a new saved quotation
    pub async fn duplicate(&self, username: &str, id: Uuid) -> AppResult<Quotation> {
        let original = self.get(username, id).await?;
        let copy = self.create(username, &QuoteRequest::from(&original)).await?;
        tracing::info!("Duplicated quotation {} as {}", id, copy.id());
        Ok(copy)
    }
}

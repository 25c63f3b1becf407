use thiserror::Error;

use super::types::{InvoiceId, LineItemId, Scope};

/// Errors surfaced by invoice creation, numbering, and totals operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FakturoError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A concurrent allocation for the same scope won the race.
    /// Recoverable: retry the whole creation transaction.
    #[error("concurrent allocation conflict: {0}")]
    ConcurrencyConflict(String),

    /// The per-scope ordinal ceiling was reached. Not retryable without
    /// opening a new scope.
    #[error("numbering scope exhausted for {0}")]
    ScopeExhausted(Scope),

    /// Invoice number parsing or sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// The referenced invoice does not exist.
    #[error("invoice {0} not found")]
    NotFound(InvoiceId),

    /// The referenced line item does not exist on the invoice.
    #[error("line item {item_id} not found on invoice {invoice_id}")]
    LineItemNotFound {
        invoice_id: InvoiceId,
        item_id: LineItemId,
    },

    /// Underlying store unavailable or a constraint violated unexpectedly.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "items[2].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

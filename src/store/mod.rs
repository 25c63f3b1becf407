//! Persistence collaborator seam.
//!
//! The core never talks to a database directly; it works against
//! [`InvoiceStore`], which must provide (i) a max-ordinal query per scope,
//! (ii) an atomic invoice-plus-items insert, and (iii) uniqueness
//! enforcement on `(company, year, month, ordinal)` and on the rendered
//! invoice number. Any backend honoring those three obligations — a SQL
//! store with a unique index, a serializable-isolation transaction, or the
//! in-memory reference implementation here — preserves the no-duplicate
//! ordinal invariant.

mod memory;

pub use memory::MemoryStore;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::{
    CompanyId, CompanySnapshot, FakturoError, Invoice, InvoiceId, InvoiceNumber, InvoiceStatus,
    InvoiceTotals, LineItem, Scope, UserId,
};

/// Errors reported by a store backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A unique constraint or serialization check failed at commit.
    /// The enclosing transaction took no effect and may be retried whole.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// The backend failed for any other reason.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for FakturoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => FakturoError::ConcurrencyConflict(msg),
            StoreError::Unavailable(msg) => FakturoError::Persistence(msg),
        }
    }
}

/// Insert payload for one invoice with its items. Row ids are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub number: InvoiceNumber,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub currency: String,
    pub tax: Decimal,
    pub discount: Decimal,
    pub amount: Decimal,
    pub total: Decimal,
    pub issuer: CompanySnapshot,
    pub client: CompanySnapshot,
    pub items: Vec<NewLineItem>,
}

/// Insert payload for one line item.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Operations available inside one transaction.
///
/// Everything performed through one `InvoiceTx` commits or rolls back
/// together; a conflict at commit discards all of it.
pub trait InvoiceTx {
    /// Highest committed ordinal in `scope`, if any invoice exists there.
    fn max_ordinal(&mut self, scope: Scope) -> Result<Option<u32>, StoreError>;

    /// Stage the invoice and all of its items for insertion.
    fn insert_invoice(&mut self, invoice: NewInvoice) -> Result<Invoice, StoreError>;

    /// Read a committed invoice with its items.
    fn load_invoice(&mut self, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// Stage a full-row line item update.
    fn update_line_item(&mut self, invoice_id: InvoiceId, item: LineItem) -> Result<(), StoreError>;

    /// Stage new amount/total columns for an invoice.
    fn update_invoice_totals(
        &mut self,
        invoice_id: InvoiceId,
        totals: InvoiceTotals,
    ) -> Result<(), StoreError>;

    /// Stage a status change.
    fn update_status(
        &mut self,
        invoice_id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<(), StoreError>;
}

/// A store backend capable of running atomic transactions.
pub trait InvoiceStore {
    /// Run `f` inside one transaction. An `Err` from the closure or a
    /// commit failure rolls back every staged write; commit errors are
    /// converted through `E: From<StoreError>`.
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut dyn InvoiceTx) -> Result<T, E>;
}

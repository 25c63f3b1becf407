//! Invoice creation and maintenance use cases.
//!
//! [`InvoiceService`] ties the numbering allocator, the totals calculator,
//! and the store together. Creation runs the read-max / insert sequence in
//! one transaction and retries the whole transaction on a write conflict,
//! so the gapless-per-scope numbering invariant only depends on the store
//! honoring its commit contract.

use tracing::{debug, warn};

use crate::core::{
    self, FakturoError, Invoice, InvoiceDraft, InvoiceId, InvoiceNumber, InvoiceStatus,
    InvoiceTotals, LineItem, LineItemId, LineItemPatch, Scope, UserId,
};
use crate::store::{InvoiceStore, InvoiceTx, NewInvoice, NewLineItem};

/// Default number of allocation attempts before a conflict is surfaced.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// The invoicing use-case layer.
///
/// Every operation takes the acting [`UserId`] explicitly; verifying that
/// the user owns the referenced company or invoice is the authorization
/// collaborator's job and must happen before these are called.
pub struct InvoiceService<S> {
    store: S,
    max_attempts: u32,
}

impl<S: InvoiceStore> InvoiceService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the conflict retry budget (minimum 1). Stress scenarios
    /// with many writers on one scope may need more than the default.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an invoice: validate, allocate the next ordinal for the
    /// scope, compute totals, and insert invoice plus items — all inside
    /// one transaction.
    ///
    /// On a write conflict the whole transaction is retried with a fresh
    /// read of the scope's maximum ordinal. Validation failures are
    /// detected before any allocation or insert is attempted.
    pub fn create_invoice(
        &self,
        user_id: UserId,
        draft: InvoiceDraft,
    ) -> Result<Invoice, FakturoError> {
        core::ensure_valid(&draft)?;

        let scope = Scope::for_date(draft.company_id, draft.invoice_date);
        let totals = core::invoice_totals(&draft.items, draft.tax, draft.discount);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self.store.transaction(|tx| {
                let number = allocate_number(tx, scope)?;
                let invoice = tx.insert_invoice(assemble(user_id, &draft, number, totals))?;
                Ok(invoice)
            });

            match result {
                Ok(invoice) => {
                    debug!(
                        user_id,
                        number = %invoice.number,
                        attempt,
                        "invoice created"
                    );
                    return Ok(invoice);
                }
                Err(FakturoError::ConcurrencyConflict(reason)) if attempt < self.max_attempts => {
                    warn!(user_id, %scope, attempt, %reason, "allocation conflict, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Apply a patch to one line item, recomputing that line's total.
    ///
    /// The parent invoice's amount/total are left untouched — the
    /// documented asymmetry of the system. Callers wanting the invoice to
    /// reflect its items again run [`Self::recompute_totals`].
    pub fn update_line_item(
        &self,
        user_id: UserId,
        invoice_id: InvoiceId,
        item_id: LineItemId,
        patch: LineItemPatch,
    ) -> Result<LineItem, FakturoError> {
        core::ensure_valid_patch(&patch)?;

        let item = self.store.transaction::<_, FakturoError, _>(|tx| {
            let invoice = tx
                .load_invoice(invoice_id)?
                .ok_or(FakturoError::NotFound(invoice_id))?;
            let mut item = invoice
                .items
                .into_iter()
                .find(|i| i.id == item_id)
                .ok_or(FakturoError::LineItemNotFound {
                    invoice_id,
                    item_id,
                })?;

            if let Some(description) = patch.description {
                item.description = description;
            }
            if let Some(quantity) = patch.quantity {
                item.quantity = quantity;
            }
            if let Some(unit_price) = patch.unit_price {
                item.unit_price = unit_price;
            }
            item.total = core::line_total(item.quantity, item.unit_price);

            tx.update_line_item(invoice_id, item.clone())?;
            Ok(item)
        })?;

        debug!(user_id, invoice_id, item_id, "line item updated");
        Ok(item)
    }

    /// Recompute an invoice's amount/total from its current line items.
    ///
    /// The explicit reconciliation operation for callers that edited line
    /// items and want the invoice columns consistent again.
    pub fn recompute_totals(
        &self,
        user_id: UserId,
        invoice_id: InvoiceId,
    ) -> Result<InvoiceTotals, FakturoError> {
        let totals = self.store.transaction::<_, FakturoError, _>(|tx| {
            let invoice = tx
                .load_invoice(invoice_id)?
                .ok_or(FakturoError::NotFound(invoice_id))?;
            let inputs: Vec<_> = invoice
                .items
                .iter()
                .map(|i| core::LineItemInput::new(i.description.clone(), i.quantity, i.unit_price))
                .collect();
            let totals = core::invoice_totals(&inputs, invoice.tax, invoice.discount);
            tx.update_invoice_totals(invoice_id, totals)?;
            Ok(totals)
        })?;

        debug!(user_id, invoice_id, "invoice totals recomputed");
        Ok(totals)
    }

    /// Apply an externally decided status transition.
    pub fn set_status(
        &self,
        user_id: UserId,
        invoice_id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<(), FakturoError> {
        self.store.transaction(|tx| {
            if tx.load_invoice(invoice_id)?.is_none() {
                return Err(FakturoError::NotFound(invoice_id));
            }
            tx.update_status(invoice_id, status)?;
            Ok(())
        })?;

        debug!(user_id, invoice_id, status = status.as_str(), "status updated");
        Ok(())
    }

    /// Read one invoice with its items.
    pub fn get_invoice(
        &self,
        _user_id: UserId,
        invoice_id: InvoiceId,
    ) -> Result<Invoice, FakturoError> {
        self.store.transaction(|tx| {
            tx.load_invoice(invoice_id)?
                .ok_or(FakturoError::NotFound(invoice_id))
        })
    }
}

/// Allocate the next invoice number for `scope`.
///
/// Reads the scope's committed maximum ordinal and renders the successor.
/// Must run in the same transaction as the insert that uses the number;
/// the store's commit-time uniqueness check turns a lost race into a
/// conflict instead of a duplicate.
pub fn allocate_number(tx: &mut dyn InvoiceTx, scope: Scope) -> Result<InvoiceNumber, FakturoError> {
    let prior_max = tx.max_ordinal(scope)?;
    let ordinal = core::next_ordinal(scope, prior_max)?;
    Ok(InvoiceNumber::new(scope, ordinal))
}

fn assemble(
    user_id: UserId,
    draft: &InvoiceDraft,
    number: InvoiceNumber,
    totals: InvoiceTotals,
) -> NewInvoice {
    NewInvoice {
        user_id,
        company_id: draft.company_id,
        number,
        invoice_date: draft.invoice_date,
        due_date: draft.due_date,
        status: InvoiceStatus::Pending,
        currency: draft.currency.clone(),
        tax: draft.tax,
        discount: draft.discount,
        amount: totals.amount,
        total: totals.total,
        issuer: draft.issuer.clone(),
        client: draft.client.clone(),
        items: draft
            .items
            .iter()
            .map(|item| NewLineItem {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: core::line_total(item.quantity, item.unit_price),
            })
            .collect(),
    }
}

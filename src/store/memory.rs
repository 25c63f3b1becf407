//! In-memory reference store.
//!
//! Transactions are optimistic: reads see committed state, writes are
//! buffered, and commit re-checks the uniqueness constraints under one
//! lock. A commit that would duplicate a `(company, year, month, ordinal)`
//! tuple or a rendered number fails with [`StoreError::Conflict`] and
//! leaves nothing behind — the same contract a relational backend provides
//! through a unique index, so callers exercise the identical retry path.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{Invoice, InvoiceId, InvoiceStatus, InvoiceTotals, LineItem, Scope};

use super::{InvoiceStore, InvoiceTx, NewInvoice, StoreError};

#[derive(Default)]
struct Shared {
    invoices: Vec<Invoice>,
}

impl Shared {
    fn find(&mut self, id: InvoiceId) -> Option<&mut Invoice> {
        self.invoices.iter_mut().find(|inv| inv.id == id)
    }
}

/// Thread-safe in-memory [`InvoiceStore`].
#[derive(Default)]
pub struct MemoryStore {
    shared: Mutex<Shared>,
    next_invoice_id: AtomicU64,
    next_item_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Ids come from a shared sequence, like a database sequence: unique
    // even when the allocating transaction later aborts.
    fn next_invoice_id(&self) -> InvoiceId {
        self.next_invoice_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn next_item_id(&self) -> u64 {
        self.next_item_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

enum Pending {
    Insert(Invoice),
    SetLineItem {
        invoice_id: InvoiceId,
        item: LineItem,
    },
    SetTotals {
        invoice_id: InvoiceId,
        totals: InvoiceTotals,
    },
    SetStatus {
        invoice_id: InvoiceId,
        status: InvoiceStatus,
    },
}

/// One open transaction against a [`MemoryStore`].
pub struct MemoryTx<'a> {
    store: &'a MemoryStore,
    pending: Vec<Pending>,
}

impl MemoryTx<'_> {
    fn commit(self) -> Result<(), StoreError> {
        let mut shared = lock(&self.store.shared)?;

        // Constraint checks first so a failing commit applies nothing.
        // Inserts staged earlier in this transaction count as existing rows,
        // the same way rows written inside an open SQL transaction do.
        let mut staged: Vec<&Invoice> = Vec::new();
        for op in &self.pending {
            match op {
                Pending::Insert(invoice) => {
                    for existing in shared.invoices.iter().chain(staged.iter().copied()) {
                        if existing.number == invoice.number {
                            return Err(StoreError::Conflict(format!(
                                "invoice number {} already allocated",
                                invoice.number
                            )));
                        }
                        if existing.scope() == invoice.scope() && existing.ordinal == invoice.ordinal
                        {
                            return Err(StoreError::Conflict(format!(
                                "ordinal {} already taken for {}",
                                invoice.ordinal,
                                invoice.scope()
                            )));
                        }
                    }
                    staged.push(invoice);
                }
                Pending::SetLineItem { invoice_id, item } => {
                    let Some(invoice) = shared.find(*invoice_id) else {
                        return Err(missing(*invoice_id));
                    };
                    if !invoice.items.iter().any(|i| i.id == item.id) {
                        return Err(StoreError::Unavailable(format!(
                            "line item {} missing on invoice {} at commit",
                            item.id, invoice_id
                        )));
                    }
                }
                Pending::SetTotals { invoice_id, .. } | Pending::SetStatus { invoice_id, .. } => {
                    if shared.find(*invoice_id).is_none() {
                        return Err(missing(*invoice_id));
                    }
                }
            }
        }

        for op in self.pending {
            match op {
                Pending::Insert(invoice) => shared.invoices.push(invoice),
                Pending::SetLineItem { invoice_id, item } => {
                    let invoice = shared.find(invoice_id).expect("checked above");
                    let slot = invoice
                        .items
                        .iter_mut()
                        .find(|i| i.id == item.id)
                        .expect("checked above");
                    *slot = item;
                }
                Pending::SetTotals { invoice_id, totals } => {
                    let invoice = shared.find(invoice_id).expect("checked above");
                    invoice.amount = totals.amount;
                    invoice.total = totals.total;
                }
                Pending::SetStatus { invoice_id, status } => {
                    shared.find(invoice_id).expect("checked above").status = status;
                }
            }
        }

        Ok(())
    }
}

impl InvoiceTx for MemoryTx<'_> {
    fn max_ordinal(&mut self, scope: Scope) -> Result<Option<u32>, StoreError> {
        let shared = lock(&self.store.shared)?;
        Ok(shared
            .invoices
            .iter()
            .filter(|inv| inv.scope() == scope)
            .map(|inv| inv.ordinal)
            .max())
    }

    fn insert_invoice(&mut self, new: NewInvoice) -> Result<Invoice, StoreError> {
        let items = new
            .items
            .into_iter()
            .map(|item| LineItem {
                id: self.store.next_item_id(),
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.total,
            })
            .collect();

        let invoice = Invoice {
            id: self.store.next_invoice_id(),
            user_id: new.user_id,
            company_id: new.company_id,
            ordinal: new.number.ordinal(),
            number: new.number,
            invoice_date: new.invoice_date,
            due_date: new.due_date,
            status: new.status,
            currency: new.currency,
            tax: new.tax,
            discount: new.discount,
            amount: new.amount,
            total: new.total,
            issuer: new.issuer,
            client: new.client,
            items,
        };

        self.pending.push(Pending::Insert(invoice.clone()));
        Ok(invoice)
    }

    fn load_invoice(&mut self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let mut shared = lock(&self.store.shared)?;
        Ok(shared.find(id).map(|inv| inv.clone()))
    }

    fn update_line_item(&mut self, invoice_id: InvoiceId, item: LineItem) -> Result<(), StoreError> {
        self.pending.push(Pending::SetLineItem { invoice_id, item });
        Ok(())
    }

    fn update_invoice_totals(
        &mut self,
        invoice_id: InvoiceId,
        totals: InvoiceTotals,
    ) -> Result<(), StoreError> {
        self.pending.push(Pending::SetTotals { invoice_id, totals });
        Ok(())
    }

    fn update_status(
        &mut self,
        invoice_id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<(), StoreError> {
        self.pending.push(Pending::SetStatus { invoice_id, status });
        Ok(())
    }
}

impl InvoiceStore for MemoryStore {
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut dyn InvoiceTx) -> Result<T, E>,
    {
        let mut tx = MemoryTx {
            store: self,
            pending: Vec::new(),
        };
        let value = f(&mut tx)?;
        tx.commit().map_err(E::from)?;
        Ok(value)
    }
}

fn lock<'a>(mutex: &'a Mutex<Shared>) -> Result<std::sync::MutexGuard<'a, Shared>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
}

fn missing(id: InvoiceId) -> StoreError {
    StoreError::Unavailable(format!("invoice {id} missing at commit"))
}

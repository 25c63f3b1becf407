use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Acting principal — the user on whose behalf an operation runs.
pub type UserId = u64;
/// Issuing company identifier.
pub type CompanyId = u64;
/// Invoice row identifier.
pub type InvoiceId = u64;
/// Line item row identifier.
pub type LineItemId = u64;

/// Invoice payment status. The core sets `Pending` at creation and applies
/// externally decided transitions verbatim — no transition logic here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    /// Wire/storage code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }

    /// Parse from the storage code.
    pub fn from_str_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// The (company, year, month) triple bounding one independent ordinal
/// sequence. Derived from the invoice date, never from wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub company_id: CompanyId,
    pub year: i32,
    pub month: u32,
}

impl Scope {
    /// Scope for an invoice issued by `company_id` on `invoice_date`.
    pub fn for_date(company_id: CompanyId, invoice_date: NaiveDate) -> Self {
        Self {
            company_id,
            year: invoice_date.year(),
            month: invoice_date.month(),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "company {} in {:04}-{:02}",
            self.company_id, self.year, self.month
        )
    }
}

/// Issuer or client data copied onto the invoice at creation time.
///
/// A snapshot is a value: later edits to the live company master record
/// never propagate back into invoices already issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    /// Legal company name.
    pub company_name: String,
    /// Street address.
    pub address: String,
    pub street_number: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    /// Commercial register number.
    pub company_number: Option<String>,
    pub tax_number: Option<String>,
    pub contact_person: Option<String>,
}

/// A line item as submitted by the caller, before totals are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// What was delivered or performed.
    pub description: String,
    /// Invoiced quantity (minimum 0.01).
    pub quantity: Decimal,
    /// Net price per unit (minimum 0).
    pub unit_price: Decimal,
}

impl LineItemInput {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }
}

/// A persisted line item, owned exclusively by one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// quantity × unit_price, rounded half-up to 2 places.
    pub total: Decimal,
}

/// Patch applied to a single line item. Absent fields keep their value.
///
/// Applying a patch recomputes that line's total but deliberately does not
/// cascade into the parent invoice's amount/total; callers wanting
/// consistency run the explicit recomputation operation afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemPatch {
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

/// What the caller submits to create an invoice: scope inputs, rates, and
/// the issuer/client snapshots. Construct via [`super::InvoiceDraftBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub company_id: CompanyId,
    pub invoice_date: NaiveDate,
    /// Must be on or after `invoice_date`.
    pub due_date: NaiveDate,
    /// ISO 4217 3-letter code.
    pub currency: String,
    /// Tax percentage, 0–100.
    pub tax: Decimal,
    /// Absolute discount amount, ≥ 0.
    pub discount: Decimal,
    pub issuer: CompanySnapshot,
    pub client: CompanySnapshot,
    pub items: Vec<LineItemInput>,
}

/// Computed invoice totals.
///
/// `tax_amount` is exposed separately so the rendering collaborator can
/// print its tax-breakdown line without recomputing anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Pre-tax, pre-discount sum of line totals.
    pub amount: Decimal,
    /// amount × tax / 100, rounded half-up to 2 places.
    pub tax_amount: Decimal,
    /// amount + amount × tax / 100 − discount, rounded half-up to 2 places.
    /// May be negative when the discount exceeds amount plus tax.
    pub total: Decimal,
}

/// A persisted invoice with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub user_id: UserId,
    pub company_id: CompanyId,
    /// Globally unique, a pure rendering of (company, year, month, ordinal).
    pub number: super::InvoiceNumber,
    /// Position within the invoice's scope, starting at 1.
    pub ordinal: u32,
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
    pub items: Vec<LineItem>,
}

impl Invoice {
    /// The ordinal scope this invoice was numbered in.
    pub fn scope(&self) -> Scope {
        Scope::for_date(self.company_id, self.invoice_date)
    }
}

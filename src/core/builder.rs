use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::FakturoError;
use super::types::*;
use super::validation;

/// Builder for a creation draft.
///
/// ```
/// use chrono::NaiveDate;
/// use fakturo::core::*;
/// use rust_decimal_macros::dec;
///
/// let draft = InvoiceDraftBuilder::new(7, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
///     .due_date(NaiveDate::from_ymd_opt(2024, 4, 14).unwrap())
///     .issuer(CompanySnapshotBuilder::new("ACME GmbH", "Hauptstr. 1").city("Berlin").build())
///     .client(CompanySnapshotBuilder::new("Kunde AG", "Marktplatz 2").build())
///     .tax(dec!(19))
///     .add_item(LineItemInput::new("Beratung", dec!(10), dec!(150)))
///     .build()
///     .unwrap();
/// ```
pub struct InvoiceDraftBuilder {
    company_id: CompanyId,
    invoice_date: NaiveDate,
    due_date: Option<NaiveDate>,
    currency: String,
    tax: Decimal,
    discount: Decimal,
    issuer: Option<CompanySnapshot>,
    client: Option<CompanySnapshot>,
    items: Vec<LineItemInput>,
}

impl InvoiceDraftBuilder {
    pub fn new(company_id: CompanyId, invoice_date: NaiveDate) -> Self {
        Self {
            company_id,
            invoice_date,
            due_date: None,
            currency: "EUR".to_string(),
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            issuer: None,
            client: None,
            items: Vec::new(),
        }
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn tax(mut self, percent: Decimal) -> Self {
        self.tax = percent;
        self
    }

    pub fn discount(mut self, amount: Decimal) -> Self {
        self.discount = amount;
        self
    }

    pub fn issuer(mut self, snapshot: CompanySnapshot) -> Self {
        self.issuer = Some(snapshot);
        self
    }

    pub fn client(mut self, snapshot: CompanySnapshot) -> Self {
        self.client = Some(snapshot);
        self
    }

    pub fn add_item(mut self, item: LineItemInput) -> Self {
        self.items.push(item);
        self
    }

    /// Build the draft, running every creation rule.
    /// Returns all validation failures joined into one error.
    pub fn build(self) -> Result<InvoiceDraft, FakturoError> {
        let draft = self.assemble()?;
        validation::ensure_valid(&draft)?;
        Ok(draft)
    }

    /// Build without rule validation — useful for testing the downstream
    /// checks or importing externally validated data. Structurally required
    /// fields (issuer, client, due date) are still enforced.
    pub fn build_unchecked(self) -> Result<InvoiceDraft, FakturoError> {
        self.assemble()
    }

    fn assemble(self) -> Result<InvoiceDraft, FakturoError> {
        let issuer = self
            .issuer
            .ok_or_else(|| FakturoError::Validation("issuer snapshot is required".into()))?;
        let client = self
            .client
            .ok_or_else(|| FakturoError::Validation("client snapshot is required".into()))?;
        let due_date = self
            .due_date
            .ok_or_else(|| FakturoError::Validation("due date is required".into()))?;

        Ok(InvoiceDraft {
            company_id: self.company_id,
            invoice_date: self.invoice_date,
            due_date,
            currency: self.currency,
            tax: self.tax,
            discount: self.discount,
            issuer,
            client,
            items: self.items,
        })
    }
}

/// Builder for the issuer/client snapshot captured at creation time.
pub struct CompanySnapshotBuilder {
    company_name: String,
    address: String,
    street_number: Option<String>,
    city: Option<String>,
    country: Option<String>,
    email: Option<String>,
    company_number: Option<String>,
    tax_number: Option<String>,
    contact_person: Option<String>,
}

impl CompanySnapshotBuilder {
    pub fn new(company_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            address: address.into(),
            street_number: None,
            city: None,
            country: None,
            email: None,
            company_number: None,
            tax_number: None,
            contact_person: None,
        }
    }

    pub fn street_number(mut self, value: impl Into<String>) -> Self {
        self.street_number = Some(value.into());
        self
    }

    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.city = Some(value.into());
        self
    }

    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn company_number(mut self, value: impl Into<String>) -> Self {
        self.company_number = Some(value.into());
        self
    }

    pub fn tax_number(mut self, value: impl Into<String>) -> Self {
        self.tax_number = Some(value.into());
        self
    }

    pub fn contact_person(mut self, value: impl Into<String>) -> Self {
        self.contact_person = Some(value.into());
        self
    }

    pub fn build(self) -> CompanySnapshot {
        CompanySnapshot {
            company_name: self.company_name,
            address: self.address,
            street_number: self.street_number,
            city: self.city,
            country: self.country,
            email: self.email,
            company_number: self.company_number,
            tax_number: self.tax_number,
            contact_person: self.contact_person,
        }
    }
}

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::{FakturoError, ValidationError};
use super::types::{CompanySnapshot, InvoiceDraft, LineItemInput, LineItemPatch};

const MAX_DESCRIPTION_LEN: usize = 255;
const MIN_QUANTITY: Decimal = dec!(0.01);

/// Validate a draft against every creation rule.
/// Returns all validation errors found (not just the first).
pub fn validate_draft(draft: &InvoiceDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Invoice numbers render the year as exactly four digits; dates chrono
    // accepts outside that range would produce numbers that cannot be
    // parsed back.
    if !(1000..=9999).contains(&draft.invoice_date.year()) {
        errors.push(ValidationError::new(
            "invoice_date",
            "invoice date year must be four digits",
        ));
    }

    if draft.due_date < draft.invoice_date {
        errors.push(ValidationError::new(
            "due_date",
            "due date must be on or after the invoice date",
        ));
    }

    if draft.tax < Decimal::ZERO || draft.tax > dec!(100) {
        errors.push(ValidationError::new(
            "tax",
            "tax percentage must be between 0 and 100",
        ));
    }

    if draft.discount < Decimal::ZERO {
        errors.push(ValidationError::new("discount", "discount must not be negative"));
    }

    if draft.currency.len() != 3 {
        errors.push(ValidationError::new(
            "currency",
            "currency code must be 3 characters (ISO 4217)",
        ));
    } else if !super::currencies::is_known_currency_code(&draft.currency) {
        errors.push(ValidationError::new(
            "currency",
            format!("currency code '{}' is not a known ISO 4217 code", draft.currency),
        ));
    }

    validate_snapshot(&draft.issuer, "issuer", &mut errors);
    validate_snapshot(&draft.client, "client", &mut errors);

    if draft.items.is_empty() {
        errors.push(ValidationError::new(
            "items",
            "invoice must have at least one line item",
        ));
    }
    for (i, item) in draft.items.iter().enumerate() {
        validate_item(item, i, &mut errors);
    }

    errors
}

/// Validate a draft, collapsing any failures into a single error.
/// Runs before any ordinal is allocated or row inserted.
pub fn ensure_valid(draft: &InvoiceDraft) -> Result<(), FakturoError> {
    collapse(validate_draft(draft))
}

/// Validate a line-item patch. Absent fields are not checked.
pub fn validate_patch(patch: &LineItemPatch) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(description) = &patch.description {
        validate_description(description, "description", &mut errors);
    }
    if let Some(quantity) = patch.quantity {
        validate_quantity(quantity, "quantity", &mut errors);
    }
    if let Some(unit_price) = patch.unit_price {
        validate_unit_price(unit_price, "unit_price", &mut errors);
    }
    errors
}

/// Validate a patch, collapsing any failures into a single error.
pub fn ensure_valid_patch(patch: &LineItemPatch) -> Result<(), FakturoError> {
    collapse(validate_patch(patch))
}

fn collapse(errors: Vec<ValidationError>) -> Result<(), FakturoError> {
    if errors.is_empty() {
        return Ok(());
    }
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(FakturoError::Validation(msg))
}

fn validate_snapshot(snapshot: &CompanySnapshot, prefix: &str, errors: &mut Vec<ValidationError>) {
    if snapshot.company_name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.company_name"),
            "company name must not be empty",
        ));
    }
    if snapshot.address.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.address"),
            "address must not be empty",
        ));
    }
}

fn validate_item(item: &LineItemInput, index: usize, errors: &mut Vec<ValidationError>) {
    validate_description(&item.description, &format!("items[{index}].description"), errors);
    validate_quantity(item.quantity, &format!("items[{index}].quantity"), errors);
    validate_unit_price(item.unit_price, &format!("items[{index}].unit_price"), errors);
}

fn validate_description(description: &str, field: &str, errors: &mut Vec<ValidationError>) {
    if description.trim().is_empty() {
        errors.push(ValidationError::new(field, "description must not be empty"));
    } else if description.len() > MAX_DESCRIPTION_LEN {
        errors.push(ValidationError::new(
            field,
            format!("description must not exceed {MAX_DESCRIPTION_LEN} characters"),
        ));
    }
}

fn validate_quantity(quantity: Decimal, field: &str, errors: &mut Vec<ValidationError>) {
    if quantity < MIN_QUANTITY {
        errors.push(ValidationError::new(field, "quantity must be at least 0.01"));
    }
}

fn validate_unit_price(unit_price: Decimal, field: &str, errors: &mut Vec<ValidationError>) {
    if unit_price < Decimal::ZERO {
        errors.push(ValidationError::new(field, "unit price must not be negative"));
    }
}

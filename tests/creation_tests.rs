//! End-to-end creation, update, and status tests against the in-memory store.

use chrono::NaiveDate;
use fakturo::InvoiceService;
use fakturo::core::*;
use fakturo::store::MemoryStore;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn issuer() -> CompanySnapshot {
    CompanySnapshotBuilder::new("ACME GmbH", "Hauptstr. 1")
        .city("Berlin")
        .country("DE")
        .tax_number("DE123456789")
        .contact_person("M. Mustermann")
        .build()
}

fn client() -> CompanySnapshot {
    CompanySnapshotBuilder::new("Kunde AG", "Marktplatz 2")
        .city("München")
        .build()
}

fn draft(company_id: CompanyId, invoice_date: NaiveDate) -> InvoiceDraft {
    InvoiceDraftBuilder::new(company_id, invoice_date)
        .due_date(invoice_date + chrono::Days::new(30))
        .issuer(issuer())
        .client(client())
        .tax(dec!(20))
        .discount(dec!(10))
        .add_item(LineItemInput::new("Consulting", dec!(2), dec!(100)))
        .add_item(LineItemInput::new("Support", dec!(1), dec!(50)))
        .build()
        .unwrap()
}

fn service() -> InvoiceService<MemoryStore> {
    InvoiceService::new(MemoryStore::new())
}

#[test]
fn first_invoice_in_scope_gets_ordinal_one() {
    let service = service();
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();

    assert_eq!(invoice.ordinal, 1);
    assert_eq!(invoice.number.to_string(), "INV-202403-7-0001");
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.user_id, 1);
    assert_eq!(invoice.amount, dec!(250.00));
    assert_eq!(invoice.total, dec!(290.00));

    assert_eq!(invoice.items.len(), 2);
    assert_eq!(invoice.items[0].total, dec!(200.00));
    assert_eq!(invoice.items[1].total, dec!(50.00));
}

#[test]
fn second_invoice_continues_the_sequence() {
    let service = service();
    service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();
    let second = service.create_invoice(1, draft(7, date(2024, 3, 20))).unwrap();

    assert_eq!(second.ordinal, 2);
    assert_eq!(second.number.to_string(), "INV-202403-7-0002");
}

#[test]
fn invalid_draft_is_rejected_before_any_allocation() {
    let service = service();
    let mut bad = draft(7, date(2024, 3, 15));
    bad.due_date = date(2024, 3, 1);

    let err = service.create_invoice(1, bad).unwrap_err();
    assert!(matches!(err, FakturoError::Validation(_)));

    // Nothing was allocated or persisted: the next creation starts at 1.
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();
    assert_eq!(invoice.ordinal, 1);
}

#[test]
fn snapshots_are_frozen_at_creation() {
    let service = service();
    let first = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();

    // The company master record changes; a new invoice sees the new data.
    let renamed = InvoiceDraftBuilder::new(7, date(2024, 3, 20))
        .due_date(date(2024, 4, 19))
        .issuer(CompanySnapshotBuilder::new("ACME Holding GmbH", "Neue Str. 9").build())
        .client(client())
        .add_item(LineItemInput::new("Consulting", dec!(1), dec!(100)))
        .build()
        .unwrap();
    service.create_invoice(1, renamed).unwrap();

    // The historical invoice still carries the data captured at creation.
    let reloaded = service.get_invoice(1, first.id).unwrap();
    assert_eq!(reloaded.issuer.company_name, "ACME GmbH");
    assert_eq!(reloaded.issuer.address, "Hauptstr. 1");
}

#[test]
fn line_item_edit_does_not_cascade_into_invoice_totals() {
    let service = service();
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();
    let item_id = invoice.items[0].id;

    let patch = LineItemPatch {
        quantity: Some(dec!(5)),
        ..Default::default()
    };
    let updated = service.update_line_item(1, invoice.id, item_id, patch).unwrap();
    assert_eq!(updated.quantity, dec!(5));
    assert_eq!(updated.total, dec!(500.00));

    // The line changed but the parent columns are stale until the caller
    // explicitly recomputes.
    let reloaded = service.get_invoice(1, invoice.id).unwrap();
    assert_eq!(reloaded.items[0].total, dec!(500.00));
    assert_eq!(reloaded.amount, dec!(250.00));
    assert_eq!(reloaded.total, dec!(290.00));

    let totals = service.recompute_totals(1, invoice.id).unwrap();
    assert_eq!(totals.amount, dec!(550.00));
    // 550 + 20% tax - 10 discount
    assert_eq!(totals.total, dec!(650.00));

    let reconciled = service.get_invoice(1, invoice.id).unwrap();
    assert_eq!(reconciled.amount, dec!(550.00));
    assert_eq!(reconciled.total, dec!(650.00));
}

#[test]
fn invalid_patch_is_rejected_without_touching_the_item() {
    let service = service();
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();
    let item_id = invoice.items[0].id;

    let patch = LineItemPatch {
        quantity: Some(dec!(0)),
        ..Default::default()
    };
    let err = service.update_line_item(1, invoice.id, item_id, patch).unwrap_err();
    assert!(matches!(err, FakturoError::Validation(_)));

    let reloaded = service.get_invoice(1, invoice.id).unwrap();
    assert_eq!(reloaded.items[0].quantity, dec!(2));
}

#[test]
fn unknown_invoice_and_item_are_not_found() {
    let service = service();
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();

    assert!(matches!(
        service.get_invoice(1, 999).unwrap_err(),
        FakturoError::NotFound(999)
    ));
    assert!(matches!(
        service
            .update_line_item(1, invoice.id, 999, LineItemPatch::default())
            .unwrap_err(),
        FakturoError::LineItemNotFound { item_id: 999, .. }
    ));
    assert!(matches!(
        service.set_status(1, 999, InvoiceStatus::Paid).unwrap_err(),
        FakturoError::NotFound(999)
    ));
}

#[test]
fn status_transitions_are_applied_verbatim() {
    let service = service();
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();

    service.set_status(1, invoice.id, InvoiceStatus::Paid).unwrap();
    assert_eq!(
        service.get_invoice(1, invoice.id).unwrap().status,
        InvoiceStatus::Paid
    );

    // No transition rules in the core: any externally decided move is fine.
    service.set_status(1, invoice.id, InvoiceStatus::Overdue).unwrap();
    assert_eq!(
        service.get_invoice(1, invoice.id).unwrap().status,
        InvoiceStatus::Overdue
    );
}

#[test]
fn oversized_discount_yields_a_negative_total() {
    let service = service();
    let draft = InvoiceDraftBuilder::new(7, date(2024, 3, 15))
        .due_date(date(2024, 4, 14))
        .issuer(issuer())
        .client(client())
        .tax(dec!(10))
        .discount(dec!(500))
        .add_item(LineItemInput::new("Consulting", dec!(1), dec!(100)))
        .build()
        .unwrap();

    // Not clamped; whether a negative payable is acceptable is the
    // caller's policy decision.
    let invoice = service.create_invoice(1, draft).unwrap();
    assert_eq!(invoice.total, dec!(-390.00));
}

#[test]
fn created_invoice_round_trips_through_serde() {
    let service = service();
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();

    let json = serde_json::to_string(&invoice).unwrap();
    assert!(json.contains("\"INV-202403-7-0001\""), "{json}");
    assert!(json.contains("\"pending\""), "{json}");

    let back: Invoice = serde_json::from_str(&json).unwrap();
    assert_eq!(back, invoice);
}

#[test]
fn rendered_amounts_use_two_places_and_currency_suffix() {
    let service = service();
    let invoice = service.create_invoice(1, draft(7, date(2024, 3, 15))).unwrap();

    assert_eq!(format_money(invoice.amount, &invoice.currency), "250.00 EUR");
    let tax_line = invoice.amount * invoice.tax / dec!(100);
    assert_eq!(format_money(tax_line, &invoice.currency), "50.00 EUR");
    assert_eq!(format_money(invoice.total, &invoice.currency), "290.00 EUR");
}

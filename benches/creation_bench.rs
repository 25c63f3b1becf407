use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use fakturo::InvoiceService;
use fakturo::core::*;
use fakturo::store::MemoryStore;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn items(n: usize) -> Vec<LineItemInput> {
    (1..=n)
        .map(|i| LineItemInput::new(format!("Service item {i}"), dec!(5), dec!(120)))
        .collect()
}

fn draft(n_items: usize) -> InvoiceDraft {
    let mut builder = InvoiceDraftBuilder::new(7, test_date())
        .due_date(test_date())
        .issuer(CompanySnapshotBuilder::new("Benchmark GmbH", "Hauptstr. 1").build())
        .client(CompanySnapshotBuilder::new("Kunde AG", "Leopoldstr. 42").build())
        .tax(dec!(19))
        .discount(dec!(25));
    for item in items(n_items) {
        builder = builder.add_item(item);
    }
    builder.build().unwrap()
}

fn bench_totals(c: &mut Criterion) {
    let small = items(10);
    let large = items(1000);

    c.bench_function("invoice_totals_10_lines", |b| {
        b.iter(|| invoice_totals(black_box(&small), dec!(19), dec!(25)))
    });

    c.bench_function("invoice_totals_1000_lines", |b| {
        b.iter(|| invoice_totals(black_box(&large), dec!(19), dec!(25)))
    });
}

fn bench_validation(c: &mut Criterion) {
    let draft = draft(10);

    c.bench_function("validate_draft_10_lines", |b| {
        b.iter(|| validate_draft(black_box(&draft)))
    });
}

fn bench_creation(c: &mut Criterion) {
    c.bench_function("create_invoice_10_lines", |b| {
        b.iter_batched(
            || (InvoiceService::new(MemoryStore::new()), draft(10)),
            |(service, draft)| service.create_invoice(1, draft).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_totals, bench_validation, bench_creation);
criterion_main!(benches);

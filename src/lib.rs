//! # fakturo
//!
//! Multi-tenant invoicing core: unique, gapless-per-scope invoice
//! numbering and decimal-safe totals calculation.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating
//! point. A *scope* is one (issuing company, year, month) triple; each
//! scope carries its own ordinal sequence starting at 1, rendered as
//! `INV-{YYYYMM}-{companyId}-{ordinal:04}`. Allocation and the invoice
//! insert run inside one store transaction so two concurrent creations
//! for the same scope can never commit the same ordinal.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fakturo::InvoiceService;
//! use fakturo::core::*;
//! use fakturo::store::MemoryStore;
//! use rust_decimal_macros::dec;
//!
//! let service = InvoiceService::new(MemoryStore::new());
//!
//! let draft = InvoiceDraftBuilder::new(7, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
//!     .due_date(NaiveDate::from_ymd_opt(2024, 4, 14).unwrap())
//!     .issuer(CompanySnapshotBuilder::new("ACME GmbH", "Hauptstr. 1")
//!         .city("Berlin").tax_number("DE123456789").build())
//!     .client(CompanySnapshotBuilder::new("Kunde AG", "Marktplatz 2").build())
//!     .tax(dec!(20))
//!     .discount(dec!(10))
//!     .add_item(LineItemInput::new("Consulting", dec!(2), dec!(100)))
//!     .add_item(LineItemInput::new("Support", dec!(1), dec!(50)))
//!     .build()
//!     .unwrap();
//!
//! let invoice = service.create_invoice(1, draft).unwrap();
//! assert_eq!(invoice.number.to_string(), "INV-202403-7-0001");
//! assert_eq!(invoice.amount, dec!(250.00));
//! assert_eq!(invoice.total, dec!(290.00));
//! ```

pub mod core;
pub mod service;
pub mod store;

// Re-export the main entry points at the crate root for convenience
pub use crate::core::{FakturoError, Invoice, InvoiceDraft, InvoiceNumber};
pub use crate::service::InvoiceService;

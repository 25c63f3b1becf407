use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::FakturoError;
use super::types::{CompanyId, Scope};

/// Highest ordinal representable in the 4-digit number field.
///
/// The rendered format pads ordinals to 4 digits and the field is never
/// widened, so each (company, year, month) scope holds at most 9999
/// invoices. [`next_ordinal`] refuses to allocate past this ceiling.
pub const MAX_ORDINAL: u32 = 9_999;

/// A structured invoice number: `INV-{YYYYMM}-{companyId}-{ordinal:04}`.
///
/// The string form is a pure rendering of its components; parsing it back
/// recovers the same scope and ordinal. The year renders as exactly four
/// digits, so draft validation rejects invoice dates outside 1000–9999
/// before a number is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvoiceNumber {
    company_id: CompanyId,
    year: i32,
    month: u32,
    ordinal: u32,
}

impl InvoiceNumber {
    /// Number for the given scope and ordinal.
    pub fn new(scope: Scope, ordinal: u32) -> Self {
        Self {
            company_id: scope.company_id,
            year: scope.year,
            month: scope.month,
            ordinal,
        }
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// The scope this number was allocated in.
    pub fn scope(&self) -> Scope {
        Scope {
            company_id: self.company_id,
            year: self.year,
            month: self.month,
        }
    }
}

impl std::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "INV-{:04}{:02}-{}-{:04}",
            self.year, self.month, self.company_id, self.ordinal
        )
    }
}

impl FromStr for InvoiceNumber {
    type Err = FakturoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |why: &str| FakturoError::Numbering(format!("invalid invoice number '{s}': {why}"));

        let mut parts = s.split('-');
        let (Some("INV"), Some(period), Some(company), Some(ordinal), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(bad("expected INV-YYYYMM-COMPANY-NNNN"));
        };

        if period.len() != 6 || !period.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad("period must be six digits (YYYYMM)"));
        }
        let year: i32 = period[..4].parse().map_err(|_| bad("unparseable year"))?;
        let month: u32 = period[4..].parse().map_err(|_| bad("unparseable month"))?;
        if !(1..=12).contains(&month) {
            return Err(bad("month out of range"));
        }

        let company_id: CompanyId = company.parse().map_err(|_| bad("unparseable company id"))?;
        let ordinal: u32 = ordinal.parse().map_err(|_| bad("unparseable ordinal"))?;
        if ordinal == 0 {
            return Err(bad("ordinal must be at least 1"));
        }

        Ok(Self {
            company_id,
            year,
            month,
            ordinal,
        })
    }
}

// Serialized as the rendered string: that is what the storage layer keys
// its global uniqueness constraint on.
impl Serialize for InvoiceNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InvoiceNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Next ordinal for a scope given the highest one already committed.
///
/// The read of `prior_max` and the insert using the returned ordinal must
/// happen inside one serialized transaction; otherwise two concurrent
/// creations can both observe the same maximum.
pub fn next_ordinal(scope: Scope, prior_max: Option<u32>) -> Result<u32, FakturoError> {
    match prior_max {
        None => Ok(1),
        Some(max) if max < MAX_ORDINAL => Ok(max + 1),
        Some(_) => Err(FakturoError::ScopeExhausted(scope)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn scope() -> Scope {
        Scope::for_date(7, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn renders_zero_padded() {
        assert_eq!(
            InvoiceNumber::new(scope(), 1).to_string(),
            "INV-202403-7-0001"
        );
        assert_eq!(
            InvoiceNumber::new(scope(), 42).to_string(),
            "INV-202403-7-0042"
        );
        assert_eq!(
            InvoiceNumber::new(scope(), 9999).to_string(),
            "INV-202403-7-9999"
        );
    }

    #[test]
    fn parse_round_trips() {
        let number = InvoiceNumber::new(scope(), 17);
        let parsed: InvoiceNumber = number.to_string().parse().unwrap();
        assert_eq!(parsed, number);
        assert_eq!(parsed.scope(), scope());
        assert_eq!(parsed.ordinal(), 17);
    }

    #[test]
    fn parse_rejects_malformed() {
        for input in [
            "",
            "INV-202403-7",
            "INV-202403-7-0001-extra",
            "RE-202403-7-0001",
            "INV-20243-7-0001",
            "INV-202413-7-0001",
            "INV-2024ab-7-0001",
            "INV-202403-x-0001",
            "INV-202403-7-0000",
            "INV-202403-7-x",
        ] {
            assert!(input.parse::<InvoiceNumber>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn first_allocation_starts_at_one() {
        assert_eq!(next_ordinal(scope(), None).unwrap(), 1);
    }

    #[test]
    fn allocation_increments_prior_max() {
        assert_eq!(next_ordinal(scope(), Some(1)).unwrap(), 2);
        assert_eq!(next_ordinal(scope(), Some(41)).unwrap(), 42);
        assert_eq!(next_ordinal(scope(), Some(MAX_ORDINAL - 1)).unwrap(), MAX_ORDINAL);
    }

    #[test]
    fn allocation_refuses_past_ceiling() {
        let err = next_ordinal(scope(), Some(MAX_ORDINAL)).unwrap_err();
        assert!(matches!(err, FakturoError::ScopeExhausted(s) if s == scope()));
    }

    #[test]
    fn serde_uses_string_form() {
        let number = InvoiceNumber::new(scope(), 3);
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"INV-202403-7-0003\"");
        let back: InvoiceNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, number);
    }
}

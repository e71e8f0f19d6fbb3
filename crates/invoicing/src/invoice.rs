use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoicedesk_core::{DomainError, Entity, InvoiceId};

use crate::money::AmountCents;
use crate::schema::{InvoiceInput, Violation};

/// Invoice status. Stored and submitted in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Accepted spellings, in declaration order.
    pub const ALLOWED: [&'static str; 2] = ["pending", "paid"];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Exact match against [`InvoiceStatus::ALLOWED`]; no case folding.
    pub fn parse(raw: &str) -> Result<Self, Violation> {
        match raw {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            _ => Err(Violation::NotInEnum {
                allowed: Self::ALLOWED.to_vec(),
            }),
        }
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map_err(|_| DomainError::validation(format!("unknown invoice status: {s}")))
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the billed customer. Non-empty, whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn parse(raw: &str) -> Result<Self, Violation> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Violation::Empty);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::str::FromStr for CustomerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map_err(|_| DomainError::validation("customer_id must not be empty"))
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the `invoices` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    /// Amount in smallest currency unit (cents).
    pub amount: AmountCents,
    pub status: InvoiceStatus,
    /// Creation date (UTC); set once.
    pub date: NaiveDate,
}

impl Invoice {
    /// Build a new row from validated input. `id` and `date` are supplied by
    /// the server, never by the form.
    pub fn create(id: InvoiceId, input: &InvoiceInput, date: NaiveDate) -> Self {
        Self {
            id,
            customer_id: input.customer_id.clone(),
            amount: input.amount.to_cents(),
            status: input.status,
            date,
        }
    }

    /// Overwrite the mutable columns. `id` and `date` are left alone.
    pub fn apply(&mut self, changes: &InvoiceChanges) {
        self.customer_id = changes.customer_id.clone();
        self.amount = changes.amount;
        self.status = changes.status;
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The columns an update writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

impl From<&InvoiceInput> for InvoiceChanges {
    fn from(input: &InvoiceInput) -> Self {
        Self {
            customer_id: input.customer_id.clone(),
            amount: input.amount.to_cents(),
            status: input.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Amount;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn input(customer: &str, amount: &str, status: InvoiceStatus) -> InvoiceInput {
        InvoiceInput {
            customer_id: CustomerId::parse(customer).unwrap(),
            amount: Amount::parse(amount).unwrap(),
            status,
        }
    }

    #[test]
    fn status_accepts_exactly_pending_and_paid() {
        assert_eq!(InvoiceStatus::parse("pending"), Ok(InvoiceStatus::Pending));
        assert_eq!(InvoiceStatus::parse("paid"), Ok(InvoiceStatus::Paid));
        for bad in ["cancelled", "PAID", "Pending", " paid", ""] {
            assert_eq!(
                InvoiceStatus::parse(bad),
                Err(Violation::NotInEnum {
                    allowed: vec!["pending", "paid"]
                }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn status_round_trips_through_json_in_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
        assert_eq!(
            serde_json::from_str::<InvoiceStatus>("\"pending\"").unwrap(),
            InvoiceStatus::Pending
        );
    }

    #[test]
    fn customer_id_is_trimmed_and_required() {
        assert_eq!(CustomerId::parse("  cust_1 ").unwrap().as_str(), "cust_1");
        assert_eq!(CustomerId::parse("   "), Err(Violation::Empty));
        assert!("".parse::<CustomerId>().is_err());
    }

    #[test]
    fn create_converts_amount_and_uses_server_fields() {
        let id = InvoiceId::new();
        let invoice = Invoice::create(id, &input("cust_1", "45.00", InvoiceStatus::Pending), test_date());

        assert_eq!(invoice.id, id);
        assert_eq!(invoice.customer_id.as_str(), "cust_1");
        assert_eq!(invoice.amount.value(), 4500);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.date.to_string(), "2024-03-09");
    }

    #[test]
    fn apply_leaves_id_and_date_untouched() {
        let id = InvoiceId::new();
        let mut invoice = Invoice::create(id, &input("cust_1", "45.00", InvoiceStatus::Pending), test_date());

        let before = invoice.clone();
        let changes = InvoiceChanges::from(&input("cust_2", "12.34", InvoiceStatus::Paid));
        invoice.apply(&changes);

        assert_eq!(invoice.id, id);
        assert!(invoice.same_entity(&before));
        assert_ne!(invoice, before);
        assert_eq!(invoice.date, test_date());
        assert_eq!(invoice.customer_id.as_str(), "cust_2");
        assert_eq!(invoice.amount.value(), 1234);
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }
}

//! Validation of submitted invoice forms.
//!
//! The full invoice shape is described once, as a set of fields each with
//! its own constraint. Per-operation schemas are derived from it by omitting
//! the fields the operation does not accept (create and update both leave out
//! the server-owned `id` and `date`). Parsing checks every field in the set
//! and reports all violations together.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use invoicedesk_core::InvoiceId;

use crate::form::FormData;
use crate::invoice::{CustomerId, InvoiceStatus};
use crate::money::Amount;

/// Fields of the full invoice shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceField {
    Id,
    CustomerId,
    Amount,
    Status,
    Date,
}

impl InvoiceField {
    pub const ALL: [InvoiceField; 5] = [
        InvoiceField::Id,
        InvoiceField::CustomerId,
        InvoiceField::Amount,
        InvoiceField::Status,
        InvoiceField::Date,
    ];

    /// Canonical form key.
    pub fn name(self) -> &'static str {
        match self {
            InvoiceField::Id => "id",
            InvoiceField::CustomerId => "customer_id",
            InvoiceField::Amount => "amount",
            InvoiceField::Status => "status",
            InvoiceField::Date => "date",
        }
    }

    /// Alternative keys accepted for the same field (camelCase form names).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            InvoiceField::CustomerId => &["customerId"],
            _ => &[],
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    fn lookup(self, form: &FormData) -> Option<&str> {
        form.get(self.name())
            .or_else(|| self.aliases().iter().find_map(|alias| form.get(alias)))
    }
}

impl core::fmt::Display for InvoiceField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A subset of [`InvoiceField`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self::empty()
            .with(InvoiceField::Id)
            .with(InvoiceField::CustomerId)
            .with(InvoiceField::Amount)
            .with(InvoiceField::Status)
            .with(InvoiceField::Date)
    }

    pub const fn with(self, field: InvoiceField) -> Self {
        Self(self.0 | field.bit())
    }

    pub const fn omit(self, field: InvoiceField) -> Self {
        Self(self.0 & !field.bit())
    }

    pub const fn contains(self, field: InvoiceField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = InvoiceField> {
        InvoiceField::ALL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The key was not present in the submission.
    Missing,
    /// Present but blank.
    Empty,
    NotANumber,
    Negative,
    OutOfRange,
    NotInEnum { allowed: Vec<&'static str> },
    InvalidId,
    /// Not a `YYYY-MM-DD` calendar date.
    InvalidDate,
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Violation::Missing => f.write_str("is required"),
            Violation::Empty => f.write_str("must not be empty"),
            Violation::NotANumber => f.write_str("must be a number"),
            Violation::Negative => f.write_str("must not be negative"),
            Violation::OutOfRange => f.write_str("is too large"),
            Violation::NotInEnum { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
            Violation::InvalidId => f.write_str("must be a valid identifier"),
            Violation::InvalidDate => f.write_str("must be a date formatted YYYY-MM-DD"),
        }
    }
}

/// A violation attached to the field it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: InvoiceField,
    #[serde(flatten)]
    pub violation: Violation,
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.field, self.violation)
    }
}

/// A form failed validation. Carries every offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid invoice form: {}", join_errors(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The violation recorded for `field`, if any.
    pub fn violation(&self, field: InvoiceField) -> Option<&Violation> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.violation)
    }

    pub fn fields(&self) -> impl Iterator<Item = InvoiceField> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}

/// Values extracted by an [`InvoiceSchema`]; a field is `Some` only when it
/// was part of the schema and passed its constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFields {
    pub id: Option<InvoiceId>,
    pub customer_id: Option<CustomerId>,
    pub amount: Option<Amount>,
    pub status: Option<InvoiceStatus>,
    pub date: Option<NaiveDate>,
}

impl ParsedFields {
    /// Narrow to the user-editable fields, reporting any that are absent.
    pub fn into_input(self) -> Result<InvoiceInput, ValidationError> {
        match (self.customer_id, self.amount, self.status) {
            (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceInput {
                customer_id,
                amount,
                status,
            }),
            (customer_id, amount, status) => {
                let absent = [
                    (InvoiceField::CustomerId, customer_id.is_none()),
                    (InvoiceField::Amount, amount.is_none()),
                    (InvoiceField::Status, status.is_none()),
                ];
                Err(ValidationError {
                    errors: absent
                        .into_iter()
                        .filter(|(_, missing)| *missing)
                        .map(|(field, _)| FieldError {
                            field,
                            violation: Violation::Missing,
                        })
                        .collect(),
                })
            }
        }
    }
}

/// A set of field constraints applied to a [`FormData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceSchema {
    fields: FieldSet,
}

impl InvoiceSchema {
    pub const fn new(fields: FieldSet) -> Self {
        Self { fields }
    }

    /// Every field of the invoice shape.
    pub const fn full() -> Self {
        Self::new(FieldSet::all())
    }

    pub const fn omit(self, field: InvoiceField) -> Self {
        Self::new(self.fields.omit(field))
    }

    pub fn fields(&self) -> FieldSet {
        self.fields
    }

    /// Check every field in the schema. Keys outside the schema are ignored.
    pub fn parse(&self, form: &FormData) -> Result<ParsedFields, ValidationError> {
        let mut parsed = ParsedFields::default();
        let mut errors = Vec::new();

        for field in self.fields.iter() {
            let Some(raw) = field.lookup(form) else {
                errors.push(FieldError {
                    field,
                    violation: Violation::Missing,
                });
                continue;
            };

            let checked = match field {
                InvoiceField::Id => raw
                    .parse::<InvoiceId>()
                    .map(|v| parsed.id = Some(v))
                    .map_err(|_| Violation::InvalidId),
                InvoiceField::CustomerId => {
                    CustomerId::parse(raw).map(|v| parsed.customer_id = Some(v))
                }
                InvoiceField::Amount => Amount::parse(raw).map(|v| parsed.amount = Some(v)),
                InvoiceField::Status => {
                    InvoiceStatus::parse(raw).map(|v| parsed.status = Some(v))
                }
                InvoiceField::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map(|v| parsed.date = Some(v))
                    .map_err(|_| Violation::InvalidDate),
            };

            if let Err(violation) = checked {
                errors.push(FieldError { field, violation });
            }
        }

        if errors.is_empty() {
            Ok(parsed)
        } else {
            Err(ValidationError { errors })
        }
    }
}

/// Validated, typed form input shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: CustomerId,
    /// Major units, as submitted.
    pub amount: Amount,
    pub status: InvoiceStatus,
}

/// Schema for creating an invoice: the full shape minus `id` and `date`.
#[derive(Debug, Clone, Copy)]
pub struct CreateInvoice;

impl CreateInvoice {
    pub const SCHEMA: InvoiceSchema = InvoiceSchema::full()
        .omit(InvoiceField::Id)
        .omit(InvoiceField::Date);

    pub fn parse(form: &FormData) -> Result<InvoiceInput, ValidationError> {
        Self::SCHEMA.parse(form)?.into_input()
    }
}

/// Schema for updating an invoice: the full shape minus `id` and `date`.
#[derive(Debug, Clone, Copy)]
pub struct UpdateInvoice;

impl UpdateInvoice {
    pub const SCHEMA: InvoiceSchema = InvoiceSchema::full()
        .omit(InvoiceField::Id)
        .omit(InvoiceField::Date);

    pub fn parse(form: &FormData) -> Result<InvoiceInput, ValidationError> {
        Self::SCHEMA.parse(form)?.into_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_form() -> FormData {
        FormData::new()
            .with("customer_id", "cust_1")
            .with("amount", "45.00")
            .with("status", "pending")
    }

    #[test]
    fn create_parses_a_valid_form() {
        let input = CreateInvoice::parse(&valid_form()).unwrap();
        assert_eq!(input.customer_id.as_str(), "cust_1");
        assert_eq!(input.amount.to_cents().value(), 4500);
        assert_eq!(input.status, InvoiceStatus::Pending);
    }

    #[test]
    fn create_and_update_omit_server_owned_fields() {
        for schema in [CreateInvoice::SCHEMA, UpdateInvoice::SCHEMA] {
            let fields: Vec<_> = schema.fields().iter().collect();
            assert_eq!(
                fields,
                vec![
                    InvoiceField::CustomerId,
                    InvoiceField::Amount,
                    InvoiceField::Status
                ]
            );
        }
    }

    #[test]
    fn submitted_id_and_date_are_ignored() {
        let form = valid_form()
            .with("id", "not-a-uuid")
            .with("date", "yesterday")
            .with("unrelated", "x");
        assert!(CreateInvoice::parse(&form).is_ok());
        assert!(UpdateInvoice::parse(&form).is_ok());
    }

    #[test]
    fn camel_case_customer_key_is_accepted() {
        let form = FormData::new()
            .with("customerId", "cust_9")
            .with("amount", "1")
            .with("status", "paid");
        let input = UpdateInvoice::parse(&form).unwrap();
        assert_eq!(input.customer_id.as_str(), "cust_9");
        assert_eq!(input.status, InvoiceStatus::Paid);
    }

    #[test]
    fn reports_every_invalid_field() {
        let form = FormData::new()
            .with("customer_id", "")
            .with("amount", "abc")
            .with("status", "pending");
        let err = CreateInvoice::parse(&form).unwrap_err();

        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec![InvoiceField::CustomerId, InvoiceField::Amount]
        );
        assert_eq!(err.violation(InvoiceField::CustomerId), Some(&Violation::Empty));
        assert_eq!(err.violation(InvoiceField::Amount), Some(&Violation::NotANumber));
        assert_eq!(err.violation(InvoiceField::Status), None);
    }

    #[test]
    fn missing_fields_are_reported_as_missing() {
        let err = CreateInvoice::parse(&FormData::new()).unwrap_err();
        assert_eq!(err.errors().len(), 3);
        assert!(err.errors().iter().all(|e| e.violation == Violation::Missing));
    }

    #[test]
    fn unknown_status_lists_allowed_values() {
        let form = valid_form().with("status", "cancelled");
        let err = UpdateInvoice::parse(&form).unwrap_err();
        assert_eq!(
            err.violation(InvoiceField::Status),
            Some(&Violation::NotInEnum {
                allowed: vec!["pending", "paid"]
            })
        );
        assert_eq!(
            err.to_string(),
            "invalid invoice form: status must be one of: pending, paid"
        );
    }

    #[test]
    fn full_schema_requires_id_and_date() {
        let err = InvoiceSchema::full().parse(&valid_form()).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec![InvoiceField::Id, InvoiceField::Date]
        );

        let id = InvoiceId::new();
        let form = valid_form()
            .with("id", id.to_string())
            .with("date", "2024-03-09");
        let parsed = InvoiceSchema::full().parse(&form).unwrap();
        assert_eq!(parsed.id, Some(id));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 9));
    }

    #[test]
    fn full_schema_rejects_malformed_id_and_date() {
        let form = valid_form().with("id", "nope").with("date", "09/03/2024");
        let err = InvoiceSchema::full().parse(&form).unwrap_err();
        assert_eq!(err.violation(InvoiceField::Id), Some(&Violation::InvalidId));
        assert_eq!(err.violation(InvoiceField::Date), Some(&Violation::InvalidDate));
    }

    #[test]
    fn into_input_requires_editable_fields() {
        let parsed = InvoiceSchema::new(FieldSet::empty().with(InvoiceField::Amount))
            .parse(&valid_form())
            .unwrap();
        let err = parsed.into_input().unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec![InvoiceField::CustomerId, InvoiceField::Status]
        );
    }

    #[test]
    fn field_errors_serialize_flat() {
        let err = CreateInvoice::parse(&valid_form().with("amount", "-3")).unwrap_err();
        let json = serde_json::to_value(err.errors()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "amount", "kind": "negative" }])
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any status other than `pending` / `paid` fails validation
        /// and is the only reported field.
        #[test]
        fn only_enumerated_statuses_validate(status in "\\PC*") {
            prop_assume!(status != "pending" && status != "paid");
            let form = valid_form().with("status", status);
            let err = CreateInvoice::parse(&form).unwrap_err();
            prop_assert_eq!(err.fields().collect::<Vec<_>>(), vec![InvoiceField::Status]);
        }

        /// Property: any non-blank customer reference validates, trimmed.
        #[test]
        fn non_blank_customer_ids_validate(customer in "[a-zA-Z0-9_-]{1,32}") {
            let form = valid_form().with("customer_id", format!(" {customer} "));
            let input = CreateInvoice::parse(&form).unwrap();
            prop_assert_eq!(input.customer_id.as_str(), customer.as_str());
        }
    }
}
